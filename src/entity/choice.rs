use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A selectable answer belonging to exactly one question, with a vote tally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub id: Uuid,
    pub sequence_number: u32,
    pub question_id: Uuid,
    pub choice_text: String,
    pub votes: u32,
    pub created_at: DateTime<Utc>,
}

impl Choice {
    pub fn new(question_id: Uuid, choice_text: String, sequence_number: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence_number,
            question_id,
            choice_text,
            votes: 0,
            created_at: Utc::now(),
        }
    }
}
