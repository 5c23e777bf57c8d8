use serde::{Deserialize, Serialize};

use crate::catalog::record::Difficulty;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadgeTier {
    Gold,
    Silver,
    Bronze,
    None,
}

impl BadgeTier {
    pub fn label(self) -> &'static str {
        match self {
            BadgeTier::Gold => "Gold Medal!",
            BadgeTier::Silver => "Silver Medal!",
            BadgeTier::Bronze => "Bronze Medal!",
            BadgeTier::None => "Practice makes perfect!",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            BadgeTier::Gold => "🥇",
            BadgeTier::Silver => "🥈",
            BadgeTier::Bronze => "🥉",
            BadgeTier::None => "",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BadgeThresholds {
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
}

impl Default for BadgeThresholds {
    fn default() -> Self {
        Self {
            gold: 10,
            silver: 8,
            bronze: 5,
        }
    }
}

impl BadgeThresholds {
    pub fn tier(&self, score: u32) -> BadgeTier {
        if score >= self.gold {
            BadgeTier::Gold
        } else if score >= self.silver {
            BadgeTier::Silver
        } else if score >= self.bronze {
            BadgeTier::Bronze
        } else {
            BadgeTier::None
        }
    }

    /// A strong easy run unlocks the harder follow-up.
    pub fn offers_harder(&self, difficulty: Difficulty, score: u32) -> bool {
        difficulty == Difficulty::Easy && score >= self.silver
    }
}
