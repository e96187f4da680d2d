//! Plain-text rendering of a scoreboard page.

use std::fmt::Write as _;

use client_core::{Badge, RankedRow, ScoreboardPage};
use shared::domain::Participant;

pub const EMPTY_BOARD: &str = "No scores to display.";

fn medal(badge: Badge) -> &'static str {
    match badge {
        Badge::Gold => "gold",
        Badge::Silver => "silver",
        Badge::Bronze => "bronze",
        Badge::Plain => "",
    }
}

fn row_line(row: &RankedRow) -> String {
    let name = match row.avatar {
        Some(initial) => format!("({initial}) {}", row.entry.participant),
        None => row.entry.participant.clone(),
    };
    format!(
        "{:>4}  {:<6}  {:<24}  {:<16}  {:>8}  {}",
        row.rank,
        medal(row.badge),
        name,
        row.entry.project,
        row.entry.score,
        row.entry.last_updated
    )
}

fn pagination_line(page: &ScoreboardPage) -> String {
    let mut line = String::new();
    line.push_str(if page.prev_enabled { "< prev " } else { "  ---- " });
    for button in page.page_buttons() {
        if button.is_current {
            let _ = write!(line, " [{}]", button.number);
        } else {
            let _ = write!(line, "  {} ", button.number);
        }
    }
    line.push_str(if page.next_enabled { "  next >" } else { "  ----" });
    line
}

pub fn render_page(page: &ScoreboardPage) -> String {
    if page.is_empty() {
        return format!("{EMPTY_BOARD}\n");
    }

    let mut out = String::new();
    let _ = writeln!(out, "Scoreboard");
    let _ = writeln!(out, "Total Participants: {}", page.total_participants);
    let _ = writeln!(
        out,
        "{:>4}  {:<6}  {:<24}  {:<16}  {:>8}  {}",
        "Rank", "", "Participant", "Project", "Score", "Last Updated"
    );
    for row in &page.rows {
        let _ = writeln!(out, "{}", row_line(row));
    }
    if page.show_pagination() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", pagination_line(page));
    }
    out
}

pub fn render_participants(participants: &[Participant]) -> String {
    if participants.is_empty() {
        return "No participants registered yet.\n".to_string();
    }
    let mut out = String::from("Registered Participants\n");
    for participant in participants {
        let _ = writeln!(
            out,
            "{:>6}  {:<24}  {}",
            participant.id.0, participant.participant, participant.project
        );
    }
    out
}
