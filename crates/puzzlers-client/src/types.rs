/// Connection settings for [`PuzzlersClient`](crate::PuzzlersClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root; endpoint paths such as `/api/Account/Login` are appended to it
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: "http://127.0.0.1:8045/api-proxy".to_string(), timeout_secs: 30 }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }
}
