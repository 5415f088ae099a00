use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, Subcommand};
use inquire::validator::Validation;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hackhub::auth::{
    CredentialHasher, DEFAULT_ACCESS_TTL_MINUTES, DEFAULT_REFRESH_TTL_DAYS, TokenIssuer,
};
use hackhub::config::{Secrets, ServerConfig};
use hackhub::server::validation::{validate_email, validate_password, validate_username};
use hackhub::server::{AppState, create_router};
use hackhub::store::{SqliteStore, Store};
use hackhub::types::SystemRole;

#[derive(Parser)]
#[command(name = "hackhub")]
#[command(about = "A hackathon management server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory (database and token secrets)
    Init {
        /// Data directory for the database and secrets
        #[arg(long, default_value = "./data", env = "HACKHUB_DATA_DIR")]
        data_dir: PathBuf,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1", env = "HACKHUB_HOST")]
        host: String,

        /// Port to bind to
        #[arg(long, short, default_value = "8080", env = "HACKHUB_PORT")]
        port: u16,

        /// Data directory for the database and secrets
        #[arg(long, default_value = "./data", env = "HACKHUB_DATA_DIR")]
        data_dir: PathBuf,

        /// Access token lifetime in minutes
        #[arg(long, default_value_t = DEFAULT_ACCESS_TTL_MINUTES)]
        access_ttl_minutes: i64,

        /// Refresh token lifetime in days
        #[arg(long, default_value_t = DEFAULT_REFRESH_TTL_DAYS)]
        refresh_ttl_days: i64,
    },
}

fn run_init(data_dir: PathBuf, non_interactive: bool) -> anyhow::Result<()> {
    let config = ServerConfig {
        data_dir,
        ..ServerConfig::default()
    };
    fs::create_dir_all(&config.data_dir)?;

    let store = SqliteStore::new(config.db_path())?;
    store.initialize()?;

    let secrets_path = config.secrets_path();
    if secrets_path.exists() {
        bail!(
            "Server already initialized. Secrets exist at: {}",
            secrets_path.display()
        );
    }

    Secrets::generate().save(&secrets_path)?;

    println!();
    println!("Database created at: {}", config.db_path().display());
    println!("Token secrets written to: {}", secrets_path.display());
    println!();

    if !non_interactive {
        create_first_user_prompt(&store)?;
    }

    Ok(())
}

fn validator(
    check: fn(&str) -> Result<(), hackhub::server::response::ApiError>,
) -> impl Fn(&str) -> Result<Validation, inquire::CustomUserError> + Clone {
    move |input: &str| {
        Ok(match check(input.trim()) {
            Ok(()) => Validation::Valid,
            Err(e) => Validation::Invalid(e.message.into()),
        })
    }
}

fn create_first_user_prompt(store: &SqliteStore) -> anyhow::Result<()> {
    let create_user = inquire::Confirm::new("Would you like to create a first user?")
        .with_default(false)
        .prompt()?;

    if !create_user {
        return Ok(());
    }

    let username = inquire::Text::new("Username:")
        .with_validator(validator(validate_username))
        .prompt()?;
    let email = inquire::Text::new("Email:")
        .with_validator(validator(validate_email))
        .prompt()?;
    let password = inquire::Password::new("Password:")
        .with_validator(validator(validate_password))
        .prompt()?;

    let hash = CredentialHasher::new().hash(&password)?;
    let principal = store.create_principal(
        username.trim(),
        &email.trim().to_lowercase(),
        &hash,
        SystemRole::Normal,
    )?;

    println!();
    println!("Created user '{}' (id {})", principal.username, principal.id);
    println!();

    Ok(())
}

fn load_secrets(path: &Path) -> anyhow::Result<Secrets> {
    if !path.exists() {
        bail!("Server not initialized. Run 'hackhub init' first to create the database and secrets.");
    }
    Ok(Secrets::load(path)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("hackhub=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            data_dir,
            non_interactive,
        } => {
            run_init(data_dir, non_interactive)?;
        }
        Commands::Serve {
            host,
            port,
            data_dir,
            access_ttl_minutes,
            refresh_ttl_days,
        } => {
            let config = ServerConfig {
                host,
                port,
                data_dir,
                access_ttl_minutes,
                refresh_ttl_days,
            };

            let secrets = load_secrets(&config.secrets_path())?;
            let tokens = TokenIssuer::new(
                secrets.access_secret.as_bytes(),
                secrets.refresh_secret.as_bytes(),
                config.access_ttl(),
                config.refresh_ttl(),
            )?;

            let store = Arc::new(SqliteStore::new(config.db_path())?);
            store.initialize()?;

            let state = Arc::new(AppState::new(store.clone(), store, tokens));

            let app = create_router(state);
            let addr = config.socket_addr()?;

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
