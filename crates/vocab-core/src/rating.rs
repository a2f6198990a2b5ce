//! Result ratings shared by quiz and test.

use serde::{Deserialize, Serialize};

/// Share of correct answers in percent. Zero when nothing was asked.
pub fn percentage(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64 * 100.0
    }
}

/// Six-bucket verdict for a result percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Perfect,
    Outstanding,
    VeryGood,
    WellDone,
    RoomToImprove,
    KeepPracticing,
}

impl Rating {
    /// Thresholds are inclusive on their lower bound; first match wins.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 100.0 {
            Self::Perfect
        } else if percentage >= 90.0 {
            Self::Outstanding
        } else if percentage >= 75.0 {
            Self::VeryGood
        } else if percentage >= 50.0 {
            Self::WellDone
        } else if percentage >= 25.0 {
            Self::RoomToImprove
        } else {
            Self::KeepPracticing
        }
    }

    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Perfect => "Perfect",
            Self::Outstanding => "Outstanding",
            Self::VeryGood => "Very good",
            Self::WellDone => "Well done",
            Self::RoomToImprove => "Room to improve",
            Self::KeepPracticing => "Keep practicing",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
