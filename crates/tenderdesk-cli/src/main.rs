mod auth;
mod cli;
mod commands;
mod config;
mod output;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use tenderdesk_backend::{DynPortalBackend, HttpBackend, PortalConfig};
use tenderdesk_core::UserId;
use tenderdesk_feed::FeedConfig;
use tenderdesk_portal::PortalSession;

use cli::{Cli, Commands};
use output::print_error;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();
    let profile = &cli.profile;
    let format = cli.format.unwrap_or_default();

    match &cli.command {
        Commands::Login(args) => {
            let server = config::resolve_server(&cli.server, profile)?;
            let session = open_session(&cli, false).await?;
            commands::account::login(&session, &server, args, profile).await?;
        }
        Commands::Logout => {
            commands::account::logout(profile)?;
        }
        Commands::Whoami => {
            let session = open_session(&cli, true).await?;
            commands::account::whoami(&session)?;
        }
        Commands::Config(args) => match &args.command {
            cli::ConfigCommands::Show => {
                let cfg = config::load_profile(profile)?;
                println!("{}: {}", "Profile".cyan(), profile);
                println!(
                    "{}: {}",
                    "Server".cyan(),
                    cfg.server.as_deref().unwrap_or("(not set)")
                );
                println!(
                    "{}: {}",
                    "Anon key".cyan(),
                    cfg.anon_key.as_deref().map(|_| "(set)").unwrap_or("(not set)")
                );
                println!(
                    "{}: {}",
                    "Format".cyan(),
                    cfg.format.as_deref().unwrap_or("table")
                );
            }
            cli::ConfigCommands::Set(set_args) => {
                let mut cfg = config::load_profile(profile)?;
                match set_args.key.as_str() {
                    "server" => cfg.server = Some(set_args.value.clone()),
                    "anon-key" => cfg.anon_key = Some(set_args.value.clone()),
                    "format" => cfg.format = Some(set_args.value.clone()),
                    other => {
                        anyhow::bail!(
                            "Unknown config key: {other}. Valid keys: server, anon-key, format"
                        )
                    }
                }
                config::save_profile(profile, &cfg)?;
                output::print_success(&format!("Set {} = {}", set_args.key, set_args.value));
            }
        },
        Commands::Tenders(args) => {
            let session = open_session(&cli, true).await?;
            commands::tenders::list(&session, args, format).await?;
        }
        Commands::Options(args) => {
            let session = open_session(&cli, true).await?;
            commands::tenders::options(&session, args, format).await?;
        }
        Commands::Keywords(args) => {
            let session = open_session(&cli, true).await?;
            commands::account::keywords(&session, &args.command, format).await?;
        }
        Commands::Bid(args) => {
            let session = open_session(&cli, true).await?;
            commands::bids::run(&session, &args.command, format).await?;
        }
        Commands::Docs(args) => {
            let session = open_session(&cli, true).await?;
            commands::documents::run(&session, &args.command, format).await?;
        }
        Commands::Admin(args) => {
            let session = open_session(&cli, true).await?;
            commands::admin::run(&session, &args.command, format).await?;
        }
    }

    Ok(())
}

/// Builds the session for this invocation. With `sign_in` set, stored
/// credentials are required and the user is signed in before returning.
async fn open_session(cli: &Cli, sign_in: bool) -> Result<PortalSession> {
    let server = config::resolve_server(&cli.server, &cli.profile)?;
    let anon_key = config::resolve_anon_key(&cli.profile)?;
    let portal_config = PortalConfig::new(server, anon_key);
    portal_config.validate()?;

    let credentials = auth::load_credentials(&cli.profile)?;
    let mut backend = HttpBackend::new(&portal_config);
    if let Some(token) = credentials.as_ref().and_then(|c| c.token.clone()) {
        backend = backend.with_bearer(token);
    }
    let backend: DynPortalBackend = Arc::new(backend);
    let session = PortalSession::new(backend, FeedConfig::from(&portal_config));

    if sign_in {
        let Some(credentials) = credentials else {
            anyhow::bail!("Not signed in. Run: tenderdesk login <user-id>");
        };
        let user: UserId = credentials.user_id.parse()?;
        session.sign_in(user).await?;
    }

    Ok(session)
}
