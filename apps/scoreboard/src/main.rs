use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{HttpScoreboardApi, Pager, ScoreboardClient, SetupGate, SetupPage};
use shared::domain::ParticipantId;
use tracing_subscriber::EnvFilter;

mod config;
mod render;
mod watch;

use config::{load_settings, normalize_backend_url};
use render::{render_page, render_participants};

#[derive(Parser, Debug)]
#[command(name = "scoreboard", about = "Live hackathon scoreboard client")]
struct Cli {
    /// Settings file; defaults to ./scoreboard.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    backend_url: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Live board with keyboard-style line commands.
    Watch {
        /// Start with auto-refresh on.
        #[arg(long)]
        auto: bool,
    },
    /// Trigger a rank recompute, then print the board.
    Update {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    Show {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    Register {
        name: String,
        project: String,
    },
    Participants {
        #[arg(long)]
        password: String,
    },
    Delete {
        id: i64,
        #[arg(long)]
        password: String,
    },
}

fn print_board(client: &ScoreboardClient, page: usize) {
    let mut pager = Pager::new();
    pager.jump_to_page(page);
    print!("{}", render_page(&client.render(&pager)));
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(url) = cli.backend_url {
        settings.backend_url = url;
    }
    let backend_url = normalize_backend_url(&settings.backend_url)?;
    let api = HttpScoreboardApi::new(backend_url, settings.request_timeout())
        .context("failed to build http client")?;
    let client = ScoreboardClient::new(Arc::new(api));
    let gate = SetupGate::new(settings.setup_password.clone());

    match cli.command.unwrap_or(Command::Watch { auto: false }) {
        Command::Watch { auto } => watch::run(client, auto).await?,
        Command::Update { page } => {
            let report = client.refresh.manual_update().await;
            println!("{}", watch::manual_update_message(&report));
            if let Err(err) = &report.fetch {
                println!("Could not fetch scores: {err}");
            }
            print_board(&client, page);
        }
        Command::Show { page } => {
            if let Err(err) = client.initial_load().await {
                println!("Could not fetch scores: {err}");
            }
            print_board(&client, page);
        }
        Command::Register { name, project } => {
            let message = client.registration.submit(&name, &project).await;
            println!("{}", message.text());
            if message.is_success() {
                print_board(&client, 1);
            }
        }
        Command::Participants { password } => {
            let access = gate.unlock(&password)?;
            let mut setup = SetupPage::new(access, Arc::clone(&client.registration));
            if setup.reload().await {
                print!("{}", render_participants(setup.participants()));
            } else {
                println!("Could not load participants.");
            }
        }
        Command::Delete { id, password } => {
            let access = gate.unlock(&password)?;
            let mut setup = SetupPage::new(access, Arc::clone(&client.registration));
            setup.reload().await;
            println!("{}", setup.delete(ParticipantId(id)).await.text());
            print!("{}", render_participants(setup.participants()));
        }
    }

    Ok(())
}
