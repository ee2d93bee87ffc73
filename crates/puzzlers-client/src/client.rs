use crate::error::ClientError;
use crate::inflight::InFlightRegistry;
use crate::session::AuthBackend;
use crate::types::ClientConfig;
use async_trait::async_trait;
use puzzlers_types::{
    AdminUserSummary, LoginRequest, LoginResponse, NewPuzzle, PuzzleItem, RegisterRequest,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use url::Url;
use validator::Validate;

const ACCOUNT: &[&str] = &["api", "Account"];
const PUZZLES: &[&str] = &["api", "Puzzels"];

pub struct PuzzlersClient {
    client: Client,
    config: ClientConfig,
    base: Url,
    in_flight: InFlightRegistry,
}

impl PuzzlersClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base = Url::parse(config.base_url.trim())
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(config.base_url.clone()));
        }
        let client = Client::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;
        Ok(Self { client, config, base, in_flight: InFlightRegistry::new() })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Base URL plus `segments`, each percent-encoded as one path segment.
    pub fn endpoint(&self, prefix: &[&str], segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ClientError::InvalidUrl(self.config.base_url.clone()))?;
            path.pop_if_empty().extend(prefix).extend(segments);
        }
        Ok(url)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        let url = self.endpoint(ACCOUNT, &["Login"])?;
        tracing::debug!("POST {}", url);
        let body = read_text(self.client.post(url).json(request).send().await?).await?;
        serde_json::from_str(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    pub async fn register(
        &self,
        request: &RegisterRequest,
        token: Option<&str>,
    ) -> Result<String, ClientError> {
        request
            .validate()
            .map_err(|_| ClientError::Validation("Name and password are required".to_string()))?;
        let url = self.endpoint(ACCOUNT, &["Register"])?;
        tracing::debug!("POST {}", url);
        read_text(authorize(self.client.post(url), token).json(request).send().await?).await
    }

    pub async fn get_all_users(
        &self,
        token: Option<&str>,
    ) -> Result<Vec<AdminUserSummary>, ClientError> {
        let url = self.endpoint(ACCOUNT, &["GetAllUsers"])?;
        tracing::debug!("GET {}", url);
        let body = read_text(authorize(self.client.get(url), token).send().await?).await?;
        Ok(AdminUserSummary::list_from_backend(&lenient_json(&body)))
    }

    pub async fn delete_user(&self, id: &str, token: Option<&str>) -> Result<String, ClientError> {
        let url = self.endpoint(ACCOUNT, &["DeleteUser", id])?;
        tracing::debug!("DELETE {}", url);
        read_text(authorize(self.client.delete(url), token).send().await?).await
    }

    pub async fn get_all_puzzles(&self, token: Option<&str>) -> Result<Vec<PuzzleItem>, ClientError> {
        let url = self.endpoint(PUZZLES, &["GetAllPuzzles"])?;
        self.fetch_puzzles(url, token).await
    }

    /// Puzzles owned by `creator_id`. An empty id yields an empty list without a request.
    pub async fn get_puzzles_by_creator(
        &self,
        creator_id: &str,
        token: Option<&str>,
    ) -> Result<Vec<PuzzleItem>, ClientError> {
        if creator_id.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.endpoint(PUZZLES, &["GetPuzzelsByCreatorId", creator_id])?;
        self.fetch_puzzles(url, token).await
    }

    async fn fetch_puzzles(&self, url: Url, token: Option<&str>) -> Result<Vec<PuzzleItem>, ClientError> {
        tracing::debug!("GET {}", url);
        let body = read_text(authorize(self.client.get(url), token).send().await?).await?;
        Ok(PuzzleItem::list_from_backend(&lenient_json(&body)))
    }

    /// Multipart upload. A second create for the same name is refused while
    /// the first is still in flight.
    pub async fn create_puzzle(
        &self,
        puzzle: &NewPuzzle,
        token: Option<&str>,
    ) -> Result<String, ClientError> {
        let puzzle = puzzle.trimmed();
        puzzle
            .validate()
            .map_err(|_| ClientError::Validation("Name and solution are required".to_string()))?;

        let _guard = self
            .in_flight
            .try_acquire(format!("create_puzzle:{}", puzzle.name))
            .ok_or_else(|| ClientError::InFlight(format!("Creating puzzle '{}'", puzzle.name)))?;

        let mut form = Form::new()
            .text("Name", puzzle.name.clone())
            .text("Solution", puzzle.solution.clone())
            .text("DifficultyLevel", puzzle.difficulty.as_str())
            .text("CreatorId", puzzle.creator_id.clone());
        if let Some(image) = puzzle.image {
            let size = image.bytes.len();
            let part = Part::bytes(image.bytes).file_name(image.file_name).mime_str(&image.mime_type)?;
            form = form.part("Image", part);
            tracing::debug!(bytes = size, "attaching puzzle image");
        }

        let url = self.endpoint(PUZZLES, &["CreatePuzzle"])?;
        tracing::debug!("POST {}", url);
        read_text(authorize(self.client.post(url), token).multipart(form).send().await?).await
    }

    pub async fn delete_puzzle(&self, id: &str, token: Option<&str>) -> Result<String, ClientError> {
        let url = self.endpoint(PUZZLES, &["DeletePuzzle", id])?;
        tracing::debug!("DELETE {}", url);
        read_text(authorize(self.client.delete(url), token).send().await?).await
    }
}

#[async_trait]
impl AuthBackend for PuzzlersClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        PuzzlersClient::login(self, request).await
    }
}

fn authorize(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) if !token.is_empty() => builder.bearer_auth(token),
        _ => builder,
    }
}

async fn read_text(resp: Response) -> Result<String, ClientError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        tracing::debug!("Request rejected with {}", status);
        return Err(ClientError::Rejected { status: status.as_u16(), message: body });
    }
    Ok(body)
}

/// Non-JSON bodies (e.g. a plain "No puzzles found") become a JSON string.
fn lenient_json(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}
