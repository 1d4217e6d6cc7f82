use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Like,
    Dislike,
}

/// A rated movie in the user's watch history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryMovie {
    pub id: u64,
    pub title: String,
    pub rating: Rating,
    pub rated_at: DateTime<Utc>,
}

impl HistoryMovie {
    pub fn new(id: u64, title: impl Into<String>, rating: Rating) -> Self {
        Self {
            id,
            title: title.into(),
            rating,
            rated_at: Utc::now(),
        }
    }
}
