//! Pure transform from a snapshot and a page cursor to a ranked page.

use shared::domain::ScoreEntry;

use crate::snapshot::Snapshot;

pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Gold,
    Silver,
    Bronze,
    Plain,
}

impl Badge {
    pub fn for_rank(rank: usize) -> Self {
        match rank {
            1 => Badge::Gold,
            2 => Badge::Silver,
            3 => Badge::Bronze,
            _ => Badge::Plain,
        }
    }

    pub fn is_podium(self) -> bool {
        self != Badge::Plain
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    /// Positional rank, 1-based across the whole board.
    pub rank: usize,
    pub badge: Badge,
    /// Podium rows only.
    pub avatar: Option<char>,
    pub entry: ScoreEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageButton {
    pub number: usize,
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreboardPage {
    pub rows: Vec<RankedRow>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_participants: usize,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl ScoreboardPage {
    /// Nothing to rank at all, as opposed to an out-of-range page.
    pub fn is_empty(&self) -> bool {
        self.total_participants == 0
    }

    pub fn show_pagination(&self) -> bool {
        self.total_pages > 1
    }

    pub fn page_buttons(&self) -> Vec<PageButton> {
        (1..=self.total_pages)
            .map(|number| PageButton {
                number,
                is_current: number == self.current_page,
            })
            .collect()
    }
}

/// Page cursor. Not reset when the board shrinks under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    current_page: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self { current_page: 1 }
    }
}

impl Pager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn next_page(&mut self, total_pages: usize) {
        self.current_page = (self.current_page + 1).min(total_pages).max(1);
    }

    pub fn prev_page(&mut self) {
        self.current_page = self.current_page.saturating_sub(1).max(1);
    }

    /// Sets the page as given; callers only offer valid page numbers.
    pub fn jump_to_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }
}

pub fn total_pages(entries: usize) -> usize {
    entries.div_ceil(PAGE_SIZE)
}

/// Score descending; equal scores keep snapshot order.
pub fn rank_entries(entries: &[ScoreEntry]) -> Vec<&ScoreEntry> {
    let mut ranked: Vec<&ScoreEntry> = entries.iter().collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

fn avatar_initial(participant: &str) -> char {
    participant
        .chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('?')
}

pub struct ScoreboardView;

impl ScoreboardView {
    pub fn render(snapshot: &Snapshot, pager: &Pager) -> ScoreboardPage {
        let ranked = rank_entries(snapshot.entries());
        let total_participants = ranked.len();
        let total_pages = total_pages(total_participants);
        let current_page = pager.current_page();
        let offset = (current_page - 1).saturating_mul(PAGE_SIZE);

        let rows = ranked
            .into_iter()
            .enumerate()
            .skip(offset)
            .take(PAGE_SIZE)
            .map(|(index, entry)| {
                let rank = index + 1;
                let badge = Badge::for_rank(rank);
                RankedRow {
                    rank,
                    badge,
                    avatar: badge
                        .is_podium()
                        .then(|| avatar_initial(&entry.participant)),
                    entry: entry.clone(),
                }
            })
            .collect();

        ScoreboardPage {
            rows,
            current_page,
            total_pages,
            total_participants,
            prev_enabled: current_page > 1,
            next_enabled: current_page < total_pages,
        }
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
