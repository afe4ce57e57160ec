use anyhow::anyhow;
use clap::Parser;

use taskdeck::cli::{Cli, Commands, access, assign};
use taskdeck::logging;
use taskdeck::utils::errors::AppError;
use taskdeck_api::{AccessBackend, ApiClient};
use taskdeck_config::{ApiConfig, SessionConfig};
use taskdeck_core::ActorContext;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    logging::init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let api_config = ApiConfig::from_env();
    let session = SessionConfig::from_env();
    let client = ApiClient::new(&api_config).map_err(AppError::api)?;

    let actor_email = cli
        .as_user
        .clone()
        .or(session.actor_email)
        .ok_or_else(|| {
            AppError::validation(anyhow!("set TASKDECK_ACTOR_EMAIL or pass --as-user <email>"))
        })?;
    let ctx = resolve_actor(&client, &actor_email).await?;

    match cli.command {
        Commands::Access(command) => access::run(client, ctx, command).await,
        Commands::Assign(command) => assign::run(client, ctx, command).await,
    }
}

/// Resolve the acting user by email and load their permission overrides so
/// client-side authorization checks can run without further fetches.
async fn resolve_actor(client: &ApiClient, email: &str) -> Result<ActorContext, AppError> {
    let users = client
        .assignable_users(None)
        .await
        .map_err(AppError::api)?;
    let mut actor = users
        .into_iter()
        .find(|u| u.email.as_str().eq_ignore_ascii_case(email.trim()))
        .ok_or_else(|| AppError::not_found(anyhow!("no user with email {}", email)))?;

    let overrides = client
        .user_permissions(&actor.id)
        .await
        .map_err(AppError::api)?;
    actor.permissions = Some(overrides);
    Ok(ActorContext::new(actor))
}
