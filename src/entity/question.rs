use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A poll prompt with a scheduled or actual publication instant.
///
/// Questions own their choices: deleting a question removes every choice
/// that belongs to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub sequence_number: u32,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn new(question_text: String, sequence_number: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            sequence_number,
            question_text,
            pub_date: now,
            created_at: now,
        }
    }

    /// Whether `pub_date` falls within the 24 hours leading up to `now`.
    ///
    /// The window is half-open: published exactly at `now` is recent,
    /// published exactly 24 hours before `now` is not, and a future
    /// `pub_date` is never recent.
    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        self.pub_date <= now && now - self.pub_date < Duration::hours(24)
    }

    /// Whether the question is visible to the public surface at `now`.
    /// Future-dated questions are embargoed.
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        self.pub_date <= now
    }
}
