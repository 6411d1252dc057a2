use std::sync::Arc;

use agora_client::{
    AgoraClient, ClientConfig, ClientError, FileSessionStore, NavigationPort, Screen, ScreenTracker,
};
use anyhow::{Context, Result};
use colored::Colorize;
use tracing::debug;

use crate::cli::{Cli, Commands, ProfileCommands};
use crate::{auth_commands, feed_commands, profile_commands};

/// Navigation for a one-shot terminal session: there is no screen to switch back to, so
/// session expiry is reported instead.
struct TerminalNavigation {
    screens: ScreenTracker,
}

impl NavigationPort for TerminalNavigation {
    fn is_at_entry(&self) -> bool {
        self.screens.is_at_entry()
    }

    fn go_to_entry(&self) {
        eprintln!("{}", "Your session has expired. Run `agora login` to sign in again.".yellow());
        self.screens.go_to_entry();
    }
}

pub struct App {
    pub client: AgoraClient,
    navigation: Arc<TerminalNavigation>,
}

impl App {
    pub fn new(cli: &Cli) -> Result<Self> {
        let config = ClientConfig {
            base_url: cli.url.clone(),
            timeout_secs: cli.timeout,
            data_dir: cli.data_dir.clone(),
        };
        let data_dir = config.data_dir().context("Failed to prepare data directory")?;
        debug!(url = %config.base_url, data_dir = %data_dir.display(), "Starting client");
        let store = Arc::new(FileSessionStore::in_dir(data_dir));

        // Restoring happens inside the client; start at the entry screen and move on once the
        // session is known.
        let navigation = Arc::new(TerminalNavigation { screens: ScreenTracker::new(Screen::Login) });
        let client = AgoraClient::new(config, store, navigation.clone()).map_err(report)?;
        if client.is_authenticated() {
            navigation.screens.show(Screen::Profile);
        }
        Ok(Self { client, navigation })
    }

    pub fn show(&self, screen: Screen) {
        self.navigation.screens.show(screen);
    }

    pub fn require_session(&self) -> Result<()> {
        if !self.client.is_authenticated() {
            anyhow::bail!("Not signed in. Run `agora login` first.");
        }
        Ok(())
    }
}

/// Turn a client error into the text the user should see.
pub fn report(err: ClientError) -> anyhow::Error {
    anyhow::anyhow!(err.user_message())
}

pub async fn dispatch(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::Login { email, password } => auth_commands::login(app, email, password).await,
        Commands::Signup { name, email, password, confirm_password, dob, picture } => {
            let confirm_password = confirm_password.unwrap_or_else(|| password.clone());
            auth_commands::signup(
                app,
                auth_commands::SignupArgs { name, email, password, confirm_password, dob, picture },
            )
            .await
        }
        Commands::Logout => auth_commands::logout(app),
        Commands::Profile(ProfileCommands::Show { json }) => {
            profile_commands::show_profile(app, json).await
        }
        Commands::Profile(ProfileCommands::Edit { name, dob, picture }) => {
            profile_commands::edit_profile(app, name, dob, picture).await
        }
        Commands::Feed { json } => feed_commands::show_feed(app, json).await,
        Commands::Post { text, image } => feed_commands::create_post(app, text, image).await,
        Commands::Delete { id } => feed_commands::delete_post(app, id).await,
        Commands::Like { id } => feed_commands::react(app, id, agora_client::ReactionKind::Like).await,
        Commands::Dislike { id } => {
            feed_commands::react(app, id, agora_client::ReactionKind::Dislike).await
        }
    }
}
