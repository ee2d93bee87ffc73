use std::sync::Arc;

use anyhow::{Context, Result};
use puzzlers_client::{
    ClientConfig, FileTokenStore, LogNavigator, PuzzlersClient, SessionManager, TokenStore,
};
use puzzlers_core::modules::config as core_config;
use puzzlers_types::AppConfig;

use crate::cli::{ConfigCommands, PuzzleCommands, UserCommands};
use crate::{config_commands, puzzle_commands, user_commands};

/// API client plus a session persisted in the data directory.
pub struct CliContext {
    pub config: AppConfig,
    pub client: Arc<PuzzlersClient>,
    pub session: SessionManager,
}

impl CliContext {
    pub fn load(config: AppConfig) -> Result<Self> {
        let data_dir = core_config::get_data_dir().context("Failed to get data directory")?;
        let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::in_dir(data_dir));

        let client = Arc::new(
            PuzzlersClient::new(ClientConfig {
                base_url: config.api_url.clone(),
                timeout_secs: config.client_timeout,
            })
            .context("Failed to create API client")?,
        );
        let session = SessionManager::new(client.clone(), Some(store), Arc::new(LogNavigator));

        Ok(Self { config, client, session })
    }

    /// Bearer token of the stored session, failing when nobody is logged in.
    pub fn require_login(&self) -> Result<String> {
        self.session
            .auth_token()
            .filter(|_| self.session.is_authenticated())
            .context("Not logged in. Run `puzzlers login` first.")
    }

    pub fn require_admin(&self) -> Result<String> {
        let token = self.require_login()?;
        if !self.session.is_admin() {
            anyhow::bail!("This command requires the Admin role");
        }
        Ok(token)
    }

    pub fn require_creator(&self) -> Result<String> {
        let token = self.require_login()?;
        if !self.session.can_manage_puzzles() {
            anyhow::bail!("This command requires the PUZZLE_CREATOR role");
        }
        Ok(token)
    }
}

pub async fn handle_user_command(ctx: &CliContext, cmd: UserCommands) -> Result<()> {
    match cmd {
        UserCommands::List { json } => user_commands::list_users(ctx, json).await,
        UserCommands::Register { name, password, role } => {
            user_commands::register_user(ctx, name, password, role).await
        },
        UserCommands::Delete { id } => user_commands::delete_user(ctx, &id).await,
    }
}

pub async fn handle_puzzle_command(ctx: &CliContext, cmd: PuzzleCommands) -> Result<()> {
    match cmd {
        PuzzleCommands::List { mine, creator, json } => {
            puzzle_commands::list_puzzles(ctx, mine, creator, json).await
        },
        PuzzleCommands::Create { name, solution, difficulty, image } => {
            puzzle_commands::create_puzzle(ctx, name, solution, difficulty, image).await
        },
        PuzzleCommands::Delete { id } => puzzle_commands::delete_puzzle(ctx, &id).await,
    }
}

pub fn handle_config_command(
    config: &AppConfig,
    path: Option<&std::path::Path>,
    cmd: ConfigCommands,
) -> Result<()> {
    match cmd {
        ConfigCommands::Show { json } => config_commands::show_config(config, json),
        ConfigCommands::Init { force } => config_commands::init_config(config, path, force),
    }
}
