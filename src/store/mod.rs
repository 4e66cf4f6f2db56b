mod sqlite_store;

pub use sqlite_store::{ChoiceUpdate, QuestionSearchResult, QuestionUpdate, SqliteStore};
