use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::{Input, Password};
use std::sync::Arc;

use newsline_client::api;
use newsline_client::auth::SessionContext;
use newsline_client::config::{self, CliArgs, ClientConfig, Command};
use newsline_client::store::{CredentialStore, SqliteBackend};
use newsline_client::transport::ApiClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists, so CLI env defaults can pick it up
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();

    // Initialize logging with the configured level
    let log_level = args.log_level.to_lowercase();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let mut client_config = ClientConfig::from_env();
    client_config.base_url = args.api_url.clone();
    client_config.request_timeout = args.http_timeout;

    tracing::debug!("API base URL: {}", client_config.base_url);

    // Open the durable credential store
    let db_path = config::resolve_db_path(args.db_file.as_deref())?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let store = Arc::new(CredentialStore::new(SqliteBackend::open(&db_path)?));

    let client = Arc::new(ApiClient::new(&client_config, Arc::clone(&store))?);
    let session = SessionContext::new(Arc::clone(&client), Arc::clone(&store));
    session.bootstrap().await;

    match args.command {
        Command::Login { email } => {
            let email = prompt_if_absent(email, "Email")?;
            let password = Password::new()
                .with_prompt("Password")
                .interact()
                .context("Failed to read password")?;

            session.login(&email, &password).await?;
            match session.user().await {
                Some(user) => println!("Logged in as {} <{}>", user.name, user.email),
                None => anyhow::bail!("Login succeeded but the session could not be established"),
            }
        }

        Command::Register { name, email } => {
            let name = prompt_if_absent(name, "Name")?;
            let email = prompt_if_absent(email, "Email")?;
            let password = Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()
                .context("Failed to read password")?;

            session.register(&name, &email, &password).await?;
            match session.user().await {
                Some(user) => {
                    println!("Registered and logged in as {} <{}>", user.name, user.email)
                }
                None => {
                    anyhow::bail!("Registration succeeded but the session could not be established")
                }
            }
        }

        Command::Me => match session.user().await {
            Some(user) => println!("{}", serde_json::to_string_pretty(&user)?),
            None => anyhow::bail!("Not logged in"),
        },

        Command::Sessions => {
            let sessions = api::auth::sessions(&client).await?;
            if sessions.is_empty() {
                println!("No active sessions");
            }
            for s in sessions {
                println!(
                    "{}...  created {}  {}",
                    s.token_prefix,
                    s.created_at.to_rfc3339(),
                    s.user_agent.as_deref().unwrap_or("-")
                );
            }
        }

        Command::Logout => {
            session.logout().await;
            println!("Logged out");
        }

        Command::LogoutAll => {
            session.logout_all().await;
            println!("Logged out on all devices");
        }

        Command::News { skip, limit } => {
            let items = api::news::list(
                &client,
                api::news::ListParams {
                    skip: Some(skip),
                    limit: Some(limit),
                },
            )
            .await?;

            for item in items {
                println!(
                    "#{}  {}  {}",
                    item.id,
                    item.publication_date.format("%Y-%m-%d %H:%M"),
                    item.title
                );
            }
        }

        Command::Comments { news_id } => {
            let comments = api::comments::list_by_news(&client, news_id).await?;
            for comment in comments {
                let author = comment
                    .author
                    .map(|a| a.name)
                    .unwrap_or_else(|| format!("user {}", comment.author_id));
                println!(
                    "[{}] {}: {}",
                    comment.publication_date.format("%Y-%m-%d %H:%M"),
                    author,
                    comment.text
                );
            }
        }
    }

    Ok(())
}

fn prompt_if_absent(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Input::new()
            .with_prompt(prompt)
            .interact_text()
            .with_context(|| format!("Failed to read {}", prompt.to_lowercase())),
    }
}
