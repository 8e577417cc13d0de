// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

use crate::auth::{
    validate_login, validate_registration, FileSessionStore, Session, SessionManager,
};
use crate::controller::{DeleteOutcome, ViewController, ViewState};
use crate::core::{AnalysisApi, ConfigManager, ServiceClient};
use crate::display;
use crate::pipeline::{FilterCategory, SortKey, ViewQuery};
use crate::types::response::{LoginRequest, RegisterRequest};
use crate::types::UserProfile;
use crate::utils::JOB_DESCRIPTION_CHAR_LIMIT;

#[derive(Parser)]
#[command(name = "job-analyzer")]
#[command(about = "Analyze job descriptions and browse your past analyses")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Analysis API base URL (overrides config.yaml)
    #[arg(long, global = true, env = "JOB_ANALYZER_API_URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Job role shown on the profile
        #[arg(long, default_value = "")]
        role: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Log in and remember the session
    Login {
        #[arg(long)]
        username: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user's profile
    Whoami,
    /// Submit a job description for analysis (reads stdin without TEXT or --file)
    Analyze {
        text: Option<String>,
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },
    /// Browse saved analyses
    List {
        #[arg(long, default_value = "all")]
        filter: FilterCategory,
        #[arg(long, default_value = "newest")]
        sort: SortKey,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show analysis statistics
    Stats,
    /// Show the ten most recent analyses
    History,
    /// Delete a saved analysis
    Delete { id: String },
}

pub async fn handle_command(cli: Cli, config: ConfigManager) -> Result<()> {
    let store = FileSessionStore::new(config.session_path.clone());
    let mut session = SessionManager::init(Box::new(store)).await?;
    let client = ServiceClient::new(&config.service)?;
    info!("Using analysis API at {}", client.base_url());

    match cli.command {
        Command::Register {
            username,
            name,
            email,
            role,
            password,
        } => {
            let request = RegisterRequest {
                username,
                name,
                email,
                password: resolve_password(password)?,
                role,
            };
            validate_registration(&request)?;

            let response = client.register(&request).await?;
            if !response.message.is_empty() {
                info!("Register response: {}", response.message);
            }
            println!("Registration successful! Please login.");
        }

        Command::Login { username, password } => {
            let request = LoginRequest {
                username,
                password: resolve_password(password)?,
            };
            validate_login(&request)?;

            let response = client.login(&request).await?;
            session
                .establish(Session {
                    token: response.access_token,
                    username: request.username.clone(),
                })
                .await?;
            println!("Logged in as {}", request.username);
        }

        Command::Logout => {
            if !session.is_authenticated() {
                println!("No active session");
            }
            session.teardown().await?;
            println!("Logged out");
        }

        Command::Whoami => {
            let token = session.require_token()?;
            let profile = match client.current_user(token).await {
                Ok(profile) => profile,
                Err(err) => {
                    warn!("Failed to fetch user details: {}", err);
                    UserProfile::fallback(session.username().unwrap_or_default())
                }
            };
            println!("{}", display::render_profile(&profile));
        }

        Command::Analyze { text, file } => {
            let token = session.require_token()?;
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => {
                    let mut buffer = String::new();
                    tokio::io::stdin()
                        .read_to_string(&mut buffer)
                        .await
                        .context("Failed to read job description from stdin")?;
                    buffer
                }
            };
            if text.chars().count() > JOB_DESCRIPTION_CHAR_LIMIT {
                eprintln!(
                    "Note: job description truncated to {} characters",
                    JOB_DESCRIPTION_CHAR_LIMIT
                );
            }

            let result = client.analyze(token, &text).await?;
            println!("{}", display::render_result(&result));
        }

        Command::List {
            filter,
            sort,
            page,
            json,
        } => {
            let mut controller =
                ViewController::new(client, session).with_query(ViewQuery { page, sort, filter });
            controller.mount().await;
            if controller.query().page != page {
                eprintln!(
                    "Page {} is out of range, showing page {}",
                    page,
                    controller.query().page
                );
            }

            match controller.state() {
                ViewState::Error(err) => return Err(err.clone().into()),
                _ => {
                    if let Some(view) = controller.view() {
                        if json {
                            println!("{}", serde_json::to_string_pretty(view)?);
                        } else {
                            print!("{}", display::render_list(view, controller.remote_stats()));
                        }
                    }
                }
            }
        }

        Command::Stats => {
            let token = session.require_token()?;
            let stats = client.fetch_stats(token).await?;
            println!("Total Analyses: {}", stats.total_analyses);
            println!("Role Types ({}):", stats.role_type_count());
            for (role, count) in &stats.role_distribution {
                println!("  {:<40} {}", role, count);
            }
            println!("Experience Levels ({}):", stats.experience_level_count());
            for (level, count) in &stats.experience_distribution {
                println!("  {:<40} {}", level, count);
            }
        }

        Command::History => {
            let token = session.require_token()?;
            let records = client.history(token).await?;
            if records.is_empty() {
                println!("No analyses yet");
            }
            for record in &records {
                println!("{}\n", display::render_card(record));
            }
        }

        Command::Delete { id } => {
            let mut controller = ViewController::new(client, session);
            match controller.delete(&id).await {
                DeleteOutcome::Deleted => {
                    info!("List refreshed {} time(s)", controller.refresh_counter());
                    println!(
                        "Deleted analysis {} ({} remaining)",
                        id,
                        controller.store().len()
                    );
                    if let Some(view) = controller.view() {
                        println!("{}", display::results_line(view));
                    }
                }
                DeleteOutcome::Failed(err) => {
                    eprintln!("Could not delete analysis {}: {}", id, err);
                }
            }
        }
    }

    Ok(())
}

fn resolve_password(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()
            .context("Failed to read password"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_parses_filter_and_sort() {
        let cli = Cli::try_parse_from([
            "job-analyzer",
            "list",
            "--filter",
            "backend",
            "--sort",
            "oldest",
            "--page",
            "2",
        ])
        .unwrap();
        match cli.command {
            Command::List {
                filter, sort, page, ..
            } => {
                assert_eq!(filter, FilterCategory::Backend);
                assert_eq!(sort, SortKey::Oldest);
                assert_eq!(page, 2);
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_unknown_filter_is_rejected() {
        assert!(Cli::try_parse_from(["job-analyzer", "list", "--filter", "qa"]).is_err());
    }

    #[test]
    fn test_api_url_flag_and_env() {
        let cli = Cli::try_parse_from([
            "job-analyzer",
            "stats",
            "--api-url",
            "http://flag.example:8000",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://flag.example:8000"));

        std::env::set_var("JOB_ANALYZER_API_URL", "http://env.example:8000");
        let from_env = Cli::try_parse_from(["job-analyzer", "stats"]);
        std::env::remove_var("JOB_ANALYZER_API_URL");
        assert_eq!(
            from_env.unwrap().api_url.as_deref(),
            Some("http://env.example:8000")
        );
    }
}
