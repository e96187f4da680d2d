//! Live board: one task handles input lines, board changes and events in turn.

use std::str::FromStr;

use anyhow::Result;
use chrono::Local;
use client_core::{CycleReport, Pager, ScoreboardClient, ScoreboardEvent};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
};
use tracing::debug;

use crate::render::render_page;

const HELP: &str = "commands: n next | p prev | g <page> jump | a toggle auto-refresh | u update | q quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchCommand {
    Next,
    Prev,
    Jump(usize),
    ToggleAuto,
    Update,
    Help,
    Quit,
}

impl FromStr for WatchCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let command = match parts.next() {
            Some("n") | Some("next") => WatchCommand::Next,
            Some("p") | Some("prev") => WatchCommand::Prev,
            Some("g") | Some("goto") => {
                let page = parts
                    .next()
                    .ok_or_else(|| "usage: g <page>".to_string())?
                    .parse::<usize>()
                    .map_err(|err| format!("invalid page number: {err}"))?;
                WatchCommand::Jump(page)
            }
            Some("a") | Some("auto") => WatchCommand::ToggleAuto,
            Some("u") | Some("update") => WatchCommand::Update,
            Some("q") | Some("quit") => WatchCommand::Quit,
            Some("h") | Some("help") | None => WatchCommand::Help,
            Some(other) => return Err(format!("unknown command '{other}'")),
        };
        Ok(command)
    }
}

pub fn manual_update_message(report: &CycleReport) -> String {
    match &report.recompute {
        Ok(()) => "Ranks update triggered successfully! Scores will now refresh.".to_string(),
        Err(err) => format!("Failed to update ranks: {err}"),
    }
}

struct WatchScreen {
    pager: Pager,
    status: String,
    last_refresh: Option<String>,
}

impl WatchScreen {
    fn draw(&self, client: &ScoreboardClient) {
        let page = client.render(&self.pager);
        let auto = if client.refresh.is_active() { "on" } else { "off" };
        let refreshed = self.last_refresh.as_deref().unwrap_or("never");
        print!("\x1b[2J\x1b[H");
        print!("{}", render_page(&page));
        println!();
        println!("auto refresh: {auto} | last refresh: {refreshed}");
        if !self.status.is_empty() {
            println!("{}", self.status);
        }
        println!("{HELP}");
    }
}

pub async fn run(mut client: ScoreboardClient, auto: bool) -> Result<()> {
    let mut board = client.store.subscribe();
    let mut events = client.store.subscribe_events();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut screen = WatchScreen {
        pager: Pager::new(),
        status: String::new(),
        last_refresh: None,
    };

    if let Err(err) = client.initial_load().await {
        screen.status = format!("Could not fetch scores: {err}");
    }
    if auto {
        client.refresh.start();
    }
    screen.draw(&client);

    loop {
        tokio::select! {
            changed = board.changed() => {
                if changed.is_err() {
                    break;
                }
                screen.last_refresh = Some(Local::now().format("%H:%M:%S").to_string());
            }
            event = events.recv() => match event {
                Ok(ScoreboardEvent::RecomputeFailed(message)) => {
                    screen.status = format!("Failed to trigger rank update: {message}");
                }
                Ok(ScoreboardEvent::FetchFailed(message)) => {
                    screen.status = format!("Could not fetch scores: {message}");
                }
                Ok(other) => {
                    debug!(?other, "watch: event");
                    continue;
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "watch: event stream lagged");
                    continue;
                }
                Err(RecvError::Closed) => break,
            },
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match line.parse::<WatchCommand>() {
                    Ok(WatchCommand::Quit) => break,
                    Ok(command) => apply(&mut client, &mut screen, command).await,
                    Err(message) => screen.status = message,
                }
            }
        }
        screen.draw(&client);
    }

    client.dispose();
    Ok(())
}

async fn apply(client: &mut ScoreboardClient, screen: &mut WatchScreen, command: WatchCommand) {
    let total_pages = client.render(&screen.pager).total_pages;
    match command {
        WatchCommand::Next => screen.pager.next_page(total_pages),
        WatchCommand::Prev => screen.pager.prev_page(),
        WatchCommand::Jump(page) if (1..=total_pages).contains(&page) => {
            screen.pager.jump_to_page(page);
        }
        WatchCommand::Jump(page) => screen.status = format!("There is no page {page}."),
        WatchCommand::ToggleAuto => {
            client.refresh.toggle_auto_refresh();
            screen.status.clear();
        }
        WatchCommand::Update => {
            let report = client.refresh.manual_update().await;
            screen.status = manual_update_message(&report);
        }
        WatchCommand::Help => screen.status = HELP.to_string(),
        WatchCommand::Quit => {}
    }
}
