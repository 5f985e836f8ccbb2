use anyhow::Result;
use colored::Colorize;

use tenderdesk_core::UserId;
use tenderdesk_portal::PortalSession;

use crate::auth::{self, StoredCredentials};
use crate::cli::{KeywordsCommands, LoginArgs, OutputFormat};
use crate::output;

pub async fn login(
    session: &PortalSession,
    server: &str,
    args: &LoginArgs,
    profile: &str,
) -> Result<()> {
    let user: UserId = args.user_id.parse()?;
    let profile_info = session.sign_in(user).await?;

    auth::save_credentials(
        profile,
        &StoredCredentials {
            server: server.to_string(),
            user_id: user.to_string(),
            token: args.token.clone(),
        },
    )?;
    output::print_success(&format!(
        "Signed in as {} ({})",
        profile_info.email, profile_info.role
    ));
    Ok(())
}

pub fn logout(profile: &str) -> Result<()> {
    if auth::remove_credentials(profile)? {
        output::print_success("Signed out");
    } else {
        println!("No stored credentials for profile '{profile}'");
    }
    Ok(())
}

pub fn whoami(session: &PortalSession) -> Result<()> {
    match session.current_user() {
        Some(user) => {
            println!("{}: {}", "User".cyan(), user.email);
            println!("{}: {}", "Id".cyan(), user.id);
            println!("{}: {}", "Role".cyan(), user.role);
        }
        None => println!("Not signed in."),
    }
    Ok(())
}

pub async fn keywords(
    session: &PortalSession,
    command: &KeywordsCommands,
    format: OutputFormat,
) -> Result<()> {
    match command {
        KeywordsCommands::Show => {
            let words = session.keywords().await?;
            output::print_string_list(&words, format);
        }
        KeywordsCommands::Set { words } => {
            session.set_keywords(words.clone()).await?;
            output::print_success(&format!("Saved {} keywords", words.len()));
        }
    }
    Ok(())
}
