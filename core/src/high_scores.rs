//! Capped leaderboard of finished games.

use serde::{Deserialize, Serialize};

/// Number of entries retained by a [`HighScoreTable`].
pub const HIGH_SCORE_SLOTS: usize = 5;

/// Maximum number of characters kept from a player name.
pub const MAX_PLAYER_NAME_CHARS: usize = 15;

const ANONYMOUS_PLAYER: &str = "Player";

/// Single leaderboard row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player name, at most [`MAX_PLAYER_NAME_CHARS`] characters.
    pub name: String,
    /// Final score of the game.
    pub score: u32,
}

/// Leaderboard sorted by descending score and truncated to the top slots.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreTable {
    #[serde(default)]
    entries: Vec<HighScoreEntry>,
}

impl HighScoreTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builds a table from arbitrary entries, restoring the table invariants.
    #[must_use]
    pub fn from_entries(entries: Vec<HighScoreEntry>) -> Self {
        let mut table = Self { entries };
        table.normalize();
        table
    }

    /// Records a finished game.
    ///
    /// Earlier entries win ties, so a new score only displaces strictly
    /// lower ones.
    pub fn submit(&mut self, name: &str, score: u32) {
        self.entries.push(HighScoreEntry {
            name: truncate_player_name(name),
            score,
        });
        self.normalize();
    }

    /// Rows in ranking order.
    #[must_use]
    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    /// Highest recorded score, if any.
    #[must_use]
    pub fn best(&self) -> Option<&HighScoreEntry> {
        self.entries.first()
    }

    /// Reports whether no game has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn normalize(&mut self) {
        for entry in &mut self.entries {
            entry.name = truncate_player_name(&entry.name);
        }
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(HIGH_SCORE_SLOTS);
    }
}

/// Trims surrounding whitespace and keeps the first
/// [`MAX_PLAYER_NAME_CHARS`] characters; blank names become a placeholder.
#[must_use]
pub fn truncate_player_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return String::from(ANONYMOUS_PLAYER);
    }
    trimmed.chars().take(MAX_PLAYER_NAME_CHARS).collect()
}
