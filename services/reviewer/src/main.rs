use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod credentials;
mod error;
mod matcher;
mod models;
mod page;
mod session;
mod validation;
mod view;

use common::{clock::SystemClock, storage::FileStore};

use crate::{
    config::{DEFAULT_ERROR_MESSAGE, ReviewerConfig},
    credentials::CredentialTable,
    matcher::CredentialMatcher,
    models::LoginAttempt,
    page::PageModel,
    session::SessionManager,
    view::ViewController,
};

/// Client-side gate for the reviewer area
#[derive(Parser, Debug)]
#[command(name = "reviewer", version)]
struct Cli {
    /// Configuration file (default: ./reviewer.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a page; on the login page, submit the form if a username is given
    Open {
        /// Page identity marker: login, center, or anything else
        view: String,
        #[arg(long)]
        username: Option<String>,
        #[arg(long, env = "REVIEWER_LOGIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Keep the session for the full lifetime
        #[arg(long)]
        remember: bool,
    },
    /// Activate a logout control
    Logout {
        #[arg(long, default_value = "center")]
        view: String,
    },
    /// Show the stored session
    Status,
    /// Print the dataset record for a username and password
    Hash {
        username: String,
        #[arg(long, env = "REVIEWER_LOGIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ReviewerConfig::load(cli.config.as_deref())?;

    // Initialize logging
    init_tracing(&config.log_level);

    info!("Starting reviewer gate");

    match cli.command {
        Command::Hash { username, password } => {
            let matcher = CredentialMatcher::sha256(CredentialTable::default());
            let Some(record) = matcher.hash_record(&username, &password)? else {
                anyhow::bail!("Username and password must both be non-empty");
            };
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Status => {
            let sessions = open_sessions(&config).await?;
            let session = sessions.read().await;
            if sessions.is_active(session.as_ref()) {
                println!("{}", serde_json::to_string_pretty(&session)?);
            } else {
                println!("no active session");
            }
        }
        Command::Logout { view } => {
            let mut page = PageModel::new(Some(view.as_str()));
            let mut controller = controller_for(&config, &page, open_sessions(&config).await?);
            page.apply_all(controller.logout().await);
            print!("{page}");
        }
        Command::Open {
            view,
            username,
            password,
            remember,
        } => {
            let mut page = PageModel::new(Some(view.as_str()))
                .with_error_text(&config.default_error)
                .with_username_slots(1)
                .with_hidden_field();
            let mut controller = controller_for(&config, &page, open_sessions(&config).await?);

            page.apply_all(controller.load().await);

            if let Some(username) = username {
                if page.can_submit() {
                    let attempt =
                        LoginAttempt::new(username, password.unwrap_or_default(), remember);
                    page.apply_all(controller.submit(attempt).await);
                } else {
                    warn!("No login form to submit on this page");
                }
            }

            print!("{page}");
        }
    }

    Ok(())
}

async fn open_sessions(config: &ReviewerConfig) -> Result<SessionManager<FileStore, SystemClock>> {
    let store = FileStore::open(&config.storage_dir).await?;
    Ok(SessionManager::new(store, SystemClock, config.session_policy()))
}

fn controller_for<S, C>(
    config: &ReviewerConfig,
    page: &PageModel,
    sessions: SessionManager<S, C>,
) -> ViewController<S, C, matcher::Sha256Digest>
where
    S: common::storage::KeyValueStore,
    C: common::clock::Clock,
{
    let table = CredentialTable::load_or_empty(&config.credentials_path);

    ViewController::new(
        page.page(),
        CredentialMatcher::sha256(table),
        sessions,
        config.routes(),
        page.default_error().unwrap_or(DEFAULT_ERROR_MESSAGE),
    )
}
