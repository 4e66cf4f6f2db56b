use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::entity::{validate_text, Choice, Question};
use crate::error::{PollboxError, Result};

const POLLBOX_DIR: &str = ".pollbox";
const POLLS_DB: &str = "polls.db";
const BUSY_TIMEOUT: StdDuration = StdDuration::from_secs(5);

/// Update payload for a question
#[derive(Default)]
pub struct QuestionUpdate {
    pub question_text: Option<String>,
    pub pub_date: Option<DateTime<Utc>>,
}

/// Update payload for a choice
#[derive(Default)]
pub struct ChoiceUpdate {
    pub choice_text: Option<String>,
}

/// SQLite-backed repository for questions, choices and vote tallies.
///
/// All reads that feed the public surface take `now` explicitly so the
/// embargo rule (`pub_date <= now`) stays deterministic and testable.
pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
}

impl SqliteStore {
    /// Initialize a new pollbox project
    pub fn init(root: &Path) -> Result<Self> {
        let pollbox_dir = root.join(POLLBOX_DIR);

        if pollbox_dir.exists() {
            return Err(PollboxError::AlreadyInitialized);
        }

        fs::create_dir_all(&pollbox_dir)?;

        let path = pollbox_dir.join(POLLS_DB);
        let conn = Connection::open(&path)?;

        let store = Self { conn, path };
        store.configure()?;
        store.init_schema()?;
        Ok(store)
    }

    /// Open an existing pollbox project
    pub fn open(root: &Path) -> Result<Self> {
        let path = root.join(POLLBOX_DIR).join(POLLS_DB);

        if !path.exists() {
            return Err(PollboxError::NotInitialized);
        }

        let conn = Connection::open(&path)?;
        let store = Self { conn, path };
        store.configure()?;
        Ok(store)
    }

    /// Path to the database file
    pub fn db_path(&self) -> &Path {
        &self.path
    }

    /// Connection-level settings. WAL and a busy timeout let multiple
    /// handles (CLI, server, concurrent voters) share the database.
    fn configure(&self) -> Result<()> {
        self.conn.pragma_update(None, "journal_mode", "WAL")?;
        self.conn.pragma_update(None, "foreign_keys", true)?;
        self.conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(())
    }

    /// Initialize the database schema
    fn init_schema(&self) -> Result<()> {
        // Metadata table for sequence counters
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS questions (
                id TEXT PRIMARY KEY,
                sequence_number INTEGER NOT NULL,
                question_text TEXT NOT NULL,
                pub_date TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        // Choices are owned by their question: deleting the question
        // cascades to its choices.
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS choices (
                id TEXT PRIMARY KEY,
                sequence_number INTEGER NOT NULL,
                question_id TEXT NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
                choice_text TEXT NOT NULL,
                votes INTEGER NOT NULL DEFAULT 0 CHECK (votes >= 0),
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_choices_question ON choices(question_id)",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_questions_pub_date ON questions(pub_date)",
            [],
        )?;

        // FTS5 virtual table for full-text search on question text
        self.conn.execute(
            "CREATE VIRTUAL TABLE IF NOT EXISTS questions_fts USING fts5(
                id,
                question_text,
                content='questions',
                content_rowid='rowid'
            )",
            [],
        )?;

        // Triggers to keep FTS in sync with the questions table
        self.conn.execute_batch(
            "
            CREATE TRIGGER IF NOT EXISTS questions_ai AFTER INSERT ON questions BEGIN
                INSERT INTO questions_fts(rowid, id, question_text)
                VALUES (new.rowid, new.id, new.question_text);
            END;

            CREATE TRIGGER IF NOT EXISTS questions_ad AFTER DELETE ON questions BEGIN
                INSERT INTO questions_fts(questions_fts, rowid, id, question_text)
                VALUES ('delete', old.rowid, old.id, old.question_text);
            END;

            CREATE TRIGGER IF NOT EXISTS questions_au AFTER UPDATE ON questions BEGIN
                INSERT INTO questions_fts(questions_fts, rowid, id, question_text)
                VALUES ('delete', old.rowid, old.id, old.question_text);
                INSERT INTO questions_fts(rowid, id, question_text)
                VALUES (new.rowid, new.id, new.question_text);
            END;
            ",
        )?;

        Ok(())
    }

    /// Get the next sequence number for a given entity kind
    pub fn next_sequence_number(&self, kind: &str) -> Result<u32> {
        let key = format!("{}_seq", kind);
        let n: u32 = self.conn.query_row(
            "INSERT INTO meta (key, value) VALUES (?1, '1')
             ON CONFLICT(key) DO UPDATE SET value = CAST(value AS INTEGER) + 1
             RETURNING CAST(value AS INTEGER)",
            [&key],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    // ---- questions ----

    pub fn add_question(&self, question: &Question) -> Result<()> {
        validate_text("question_text", &question.question_text)?;

        self.conn.execute(
            "INSERT INTO questions (id, sequence_number, question_text, pub_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                question.id.to_string(),
                question.sequence_number,
                question.question_text,
                question.pub_date.to_rfc3339(),
                question.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    /// All questions regardless of publication state, newest first.
    /// This is the administrative listing.
    pub fn list_questions(&self) -> Result<Vec<Question>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, sequence_number, question_text, pub_date, created_at
             FROM questions ORDER BY pub_date DESC",
        )?;

        let questions = stmt
            .query_map([], question_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(questions)
    }

    /// Questions visible at `now`, most recently published first.
    /// Future-dated questions are excluded entirely, not merely flagged.
    pub fn list_published(&self, now: DateTime<Utc>) -> Result<Vec<Question>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, sequence_number, question_text, pub_date, created_at
             FROM questions WHERE pub_date <= ?1 ORDER BY pub_date DESC",
        )?;

        let questions = stmt
            .query_map([now.to_rfc3339()], question_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(questions)
    }

    /// Administrative lookup, no embargo.
    pub fn get_question(&self, id: &Uuid) -> Result<Question> {
        self.conn
            .query_row(
                "SELECT id, sequence_number, question_text, pub_date, created_at
                 FROM questions WHERE id = ?1",
                [id.to_string()],
                question_from_row,
            )
            .optional()?
            .ok_or_else(|| PollboxError::QuestionNotFound(id.to_string()))
    }

    /// Public lookup under the embargo rule: a future-dated question is
    /// indistinguishable from a nonexistent one.
    pub fn get_published(&self, id: &Uuid, now: DateTime<Utc>) -> Result<Question> {
        self.conn
            .query_row(
                "SELECT id, sequence_number, question_text, pub_date, created_at
                 FROM questions WHERE id = ?1 AND pub_date <= ?2",
                params![id.to_string(), now.to_rfc3339()],
                question_from_row,
            )
            .optional()?
            .ok_or_else(|| PollboxError::QuestionNotFound(id.to_string()))
    }

    pub fn update_question(&self, id: &Uuid, updates: QuestionUpdate) -> Result<Question> {
        let mut question = self.get_question(id)?;

        if let Some(text) = updates.question_text {
            validate_text("question_text", &text)?;
            question.question_text = text;
        }
        if let Some(pub_date) = updates.pub_date {
            question.pub_date = pub_date;
        }

        self.conn.execute(
            "UPDATE questions SET question_text = ?2, pub_date = ?3 WHERE id = ?1",
            params![
                question.id.to_string(),
                question.question_text,
                question.pub_date.to_rfc3339(),
            ],
        )?;

        Ok(question)
    }

    pub fn delete_question(&self, id: &Uuid) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM questions WHERE id = ?1", [id.to_string()])?;

        if changed == 0 {
            return Err(PollboxError::QuestionNotFound(id.to_string()));
        }
        Ok(())
    }

    // ---- choices ----

    pub fn add_choice(&self, choice: &Choice) -> Result<()> {
        validate_text("choice_text", &choice.choice_text)?;

        // Resolve the owner first so a bad question id reports as not-found
        // instead of a foreign key failure.
        self.get_question(&choice.question_id)?;

        self.conn.execute(
            "INSERT INTO choices (id, sequence_number, question_id, choice_text, votes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                choice.id.to_string(),
                choice.sequence_number,
                choice.question_id.to_string(),
                choice.choice_text,
                choice.votes,
                choice.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    /// Choices of a question in creation order.
    pub fn choices_for(&self, question_id: &Uuid) -> Result<Vec<Choice>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, sequence_number, question_id, choice_text, votes, created_at
             FROM choices WHERE question_id = ?1 ORDER BY sequence_number",
        )?;

        let choices = stmt
            .query_map([question_id.to_string()], choice_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(choices)
    }

    pub fn get_choice(&self, id: &Uuid) -> Result<Choice> {
        self.conn
            .query_row(
                "SELECT id, sequence_number, question_id, choice_text, votes, created_at
                 FROM choices WHERE id = ?1",
                [id.to_string()],
                choice_from_row,
            )
            .optional()?
            .ok_or_else(|| PollboxError::ChoiceNotFound(id.to_string()))
    }

    pub fn update_choice(&self, id: &Uuid, updates: ChoiceUpdate) -> Result<Choice> {
        let mut choice = self.get_choice(id)?;

        if let Some(text) = updates.choice_text {
            validate_text("choice_text", &text)?;
            choice.choice_text = text;
        }

        self.conn.execute(
            "UPDATE choices SET choice_text = ?2 WHERE id = ?1",
            params![choice.id.to_string(), choice.choice_text],
        )?;

        Ok(choice)
    }

    pub fn delete_choice(&self, id: &Uuid) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM choices WHERE id = ?1", [id.to_string()])?;

        if changed == 0 {
            return Err(PollboxError::ChoiceNotFound(id.to_string()));
        }
        Ok(())
    }

    // ---- voting ----

    /// Record one vote for `choice_id` on `question_id`.
    ///
    /// The question must be published at `now` (embargoed questions report
    /// as not found). The tally is bumped with a single in-place UPDATE so
    /// concurrent votes serialize in the database and none are lost; the
    /// affected-row count distinguishes a choice that does not belong to
    /// the question, which mutates nothing.
    pub fn cast_vote(
        &self,
        question_id: &Uuid,
        choice_id: &Uuid,
        now: DateTime<Utc>,
    ) -> Result<Choice> {
        self.get_published(question_id, now)?;

        let changed = self.conn.execute(
            "UPDATE choices SET votes = votes + 1 WHERE id = ?1 AND question_id = ?2",
            params![choice_id.to_string(), question_id.to_string()],
        )?;

        if changed == 0 {
            return Err(PollboxError::InvalidChoice {
                question_id: question_id.to_string(),
                choice_id: choice_id.to_string(),
            });
        }

        self.get_choice(choice_id)
    }

    // ---- search ----

    /// Full-text search over question text
    pub fn search_questions(&self, query: &str) -> Result<Vec<QuestionSearchResult>> {
        let mut stmt = self.conn.prepare(
            "SELECT q.id, q.sequence_number, q.question_text, q.pub_date,
                    highlight(questions_fts, 1, '<mark>', '</mark>') as text_highlight
             FROM questions_fts f
             JOIN questions q ON q.id = f.id
             WHERE questions_fts MATCH ?1
             ORDER BY rank
             LIMIT 50",
        )?;

        let results = stmt
            .query_map([query], |row| {
                Ok(QuestionSearchResult {
                    id: row.get(0)?,
                    sequence_number: row.get(1)?,
                    question_text: row.get(2)?,
                    pub_date: row.get(3)?,
                    text_highlight: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(results)
    }
}

/// Search result from full-text search
#[derive(Debug, Clone)]
pub struct QuestionSearchResult {
    pub id: String,
    pub sequence_number: u32,
    pub question_text: String,
    pub pub_date: String,
    pub text_highlight: Option<String>,
}

fn question_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Question> {
    Ok(Question {
        id: parse_uuid(0, row.get(0)?)?,
        sequence_number: row.get(1)?,
        question_text: row.get(2)?,
        pub_date: parse_datetime(3, row.get(3)?)?,
        created_at: parse_datetime(4, row.get(4)?)?,
    })
}

fn choice_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Choice> {
    Ok(Choice {
        id: parse_uuid(0, row.get(0)?)?,
        sequence_number: row.get(1)?,
        question_id: parse_uuid(2, row.get(2)?)?,
        choice_text: row.get(3)?,
        votes: row.get(4)?,
        created_at: parse_datetime(5, row.get(5)?)?,
    })
}

fn parse_uuid(idx: usize, value: String) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(&value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_datetime(idx: usize, value: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

// Implement From for rusqlite::Error
impl From<rusqlite::Error> for PollboxError {
    fn from(e: rusqlite::Error) -> Self {
        PollboxError::Storage(format!("SQLite error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn add_question_at(store: &SqliteStore, text: &str, pub_date: DateTime<Utc>) -> Question {
        let seq = store.next_sequence_number("question").unwrap();
        let mut q = Question::new(text.to_string(), seq);
        q.pub_date = pub_date;
        store.add_question(&q).unwrap();
        q
    }

    fn add_choice(store: &SqliteStore, question: &Question, text: &str) -> Choice {
        let seq = store.next_sequence_number("choice").unwrap();
        let c = Choice::new(question.id, text.to_string(), seq);
        store.add_choice(&c).unwrap();
        c
    }

    #[test]
    fn test_init_creates_db() {
        let tmp = TempDir::new().unwrap();
        let _store = SqliteStore::init(tmp.path()).unwrap();
        assert!(tmp.path().join(".pollbox/polls.db").exists());
    }

    #[test]
    fn test_init_twice_fails() {
        let tmp = TempDir::new().unwrap();
        let _store = SqliteStore::init(tmp.path()).unwrap();
        assert!(matches!(
            SqliteStore::init(tmp.path()),
            Err(PollboxError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_open_uninitialized_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            SqliteStore::open(tmp.path()),
            Err(PollboxError::NotInitialized)
        ));
    }

    #[test]
    fn test_sequence_numbers_are_monotonic_per_kind() {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::init(tmp.path()).unwrap();

        assert_eq!(store.next_sequence_number("question").unwrap(), 1);
        assert_eq!(store.next_sequence_number("question").unwrap(), 2);
        assert_eq!(store.next_sequence_number("choice").unwrap(), 1);
        assert_eq!(store.next_sequence_number("question").unwrap(), 3);
    }

    #[test]
    fn test_add_question_rejects_empty_text() {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::init(tmp.path()).unwrap();

        let q = Question::new("   ".to_string(), 1);
        assert!(matches!(
            store.add_question(&q),
            Err(PollboxError::Validation { field, .. }) if field == "question_text"
        ));
    }

    #[test]
    fn test_add_question_rejects_overlong_text() {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::init(tmp.path()).unwrap();

        let q = Question::new("x".repeat(201), 1);
        assert!(store.add_question(&q).is_err());

        let q = Question::new("x".repeat(200), 2);
        assert!(store.add_question(&q).is_ok());
    }

    #[test]
    fn test_list_published_empty_when_only_future_questions() {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::init(tmp.path()).unwrap();
        let now = Utc::now();

        add_question_at(&store, "Scheduled for next month", now + Duration::days(30));

        assert!(store.list_published(now).unwrap().is_empty());
    }

    #[test]
    fn test_list_published_orders_newest_first_and_excludes_future() {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::init(tmp.path()).unwrap();
        let now = Utc::now();

        let old = add_question_at(&store, "One hundred days old", now - Duration::days(100));
        let newer = add_question_at(&store, "Twenty days old", now - Duration::days(20));
        add_question_at(&store, "Future", now + Duration::days(5));

        let published = store.list_published(now).unwrap();
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].id, newer.id);
        assert_eq!(published[1].id, old.id);
    }

    #[test]
    fn test_get_published_hides_future_question() {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::init(tmp.path()).unwrap();
        let now = Utc::now();

        let future = add_question_at(&store, "Not yet", now + Duration::days(1));

        // Embargoed on the public path, visible on the admin path.
        assert!(matches!(
            store.get_published(&future.id, now),
            Err(PollboxError::QuestionNotFound(_))
        ));
        assert!(store.get_question(&future.id).is_ok());
    }

    #[test]
    fn test_update_question() {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::init(tmp.path()).unwrap();
        let now = Utc::now();

        let q = add_question_at(&store, "Original", now);
        let new_date = now - Duration::days(3);

        let updated = store
            .update_question(
                &q.id,
                QuestionUpdate {
                    question_text: Some("Edited".to_string()),
                    pub_date: Some(new_date),
                },
            )
            .unwrap();
        assert_eq!(updated.question_text, "Edited");

        let fetched = store.get_question(&q.id).unwrap();
        assert_eq!(fetched.question_text, "Edited");
        assert_eq!(fetched.pub_date, new_date);
    }

    #[test]
    fn test_delete_question_cascades_to_choices() {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::init(tmp.path()).unwrap();
        let now = Utc::now();

        let q = add_question_at(&store, "Doomed", now);
        let c = add_choice(&store, &q, "Also doomed");

        store.delete_question(&q.id).unwrap();

        assert!(matches!(
            store.get_question(&q.id),
            Err(PollboxError::QuestionNotFound(_))
        ));
        assert!(matches!(
            store.get_choice(&c.id),
            Err(PollboxError::ChoiceNotFound(_))
        ));
    }

    #[test]
    fn test_add_choice_requires_existing_question() {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::init(tmp.path()).unwrap();

        let orphan = Choice::new(Uuid::new_v4(), "No owner".to_string(), 1);
        assert!(matches!(
            store.add_choice(&orphan),
            Err(PollboxError::QuestionNotFound(_))
        ));
    }

    #[test]
    fn test_choices_listed_in_creation_order() {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::init(tmp.path()).unwrap();
        let now = Utc::now();

        let q = add_question_at(&store, "Pick one", now);
        let first = add_choice(&store, &q, "First");
        let second = add_choice(&store, &q, "Second");

        let choices = store.choices_for(&q.id).unwrap();
        assert_eq!(choices.len(), 2);
        assert_eq!(choices[0].id, first.id);
        assert_eq!(choices[1].id, second.id);
        assert!(choices.iter().all(|c| c.votes == 0));
    }

    #[test]
    fn test_cast_vote_increments_only_the_chosen_tally() {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::init(tmp.path()).unwrap();
        let now = Utc::now();

        let q = add_question_at(&store, "Favorite color?", now - Duration::hours(1));
        let red = add_choice(&store, &q, "Red");
        let blue = add_choice(&store, &q, "Blue");

        let updated = store.cast_vote(&q.id, &red.id, now).unwrap();
        assert_eq!(updated.votes, 1);

        assert_eq!(store.get_choice(&red.id).unwrap().votes, 1);
        assert_eq!(store.get_choice(&blue.id).unwrap().votes, 0);
    }

    #[test]
    fn test_cast_vote_on_embargoed_question_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::init(tmp.path()).unwrap();
        let now = Utc::now();

        let q = add_question_at(&store, "Tomorrow's poll", now + Duration::days(1));
        let c = add_choice(&store, &q, "Too early");

        assert!(matches!(
            store.cast_vote(&q.id, &c.id, now),
            Err(PollboxError::QuestionNotFound(_))
        ));
        assert_eq!(store.get_choice(&c.id).unwrap().votes, 0);
    }

    #[test]
    fn test_cast_vote_rejects_foreign_choice() {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::init(tmp.path()).unwrap();
        let now = Utc::now();

        let q1 = add_question_at(&store, "First question", now);
        let q2 = add_question_at(&store, "Second question", now);
        let c1 = add_choice(&store, &q1, "Belongs to q1");

        // A choice from another question, and a choice that does not exist.
        assert!(matches!(
            store.cast_vote(&q2.id, &c1.id, now),
            Err(PollboxError::InvalidChoice { .. })
        ));
        assert!(matches!(
            store.cast_vote(&q1.id, &Uuid::new_v4(), now),
            Err(PollboxError::InvalidChoice { .. })
        ));

        assert_eq!(store.get_choice(&c1.id).unwrap().votes, 0);
    }

    #[test]
    fn test_concurrent_votes_are_not_lost() {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::init(tmp.path()).unwrap();
        let now = Utc::now();

        let q = add_question_at(&store, "Contended poll", now - Duration::hours(1));
        let c = add_choice(&store, &q, "Hot choice");

        let root = tmp.path().to_path_buf();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let root = root.clone();
                let (qid, cid) = (q.id, c.id);
                std::thread::spawn(move || {
                    let store = SqliteStore::open(&root).unwrap();
                    let now = Utc::now();
                    for _ in 0..25 {
                        store.cast_vote(&qid, &cid, now).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get_choice(&c.id).unwrap().votes, 100);
    }

    #[test]
    fn test_search_questions() {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::init(tmp.path()).unwrap();
        let now = Utc::now();

        add_question_at(&store, "Best programming language?", now);
        add_question_at(&store, "Best pizza topping?", now);

        let results = store.search_questions("programming").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].question_text, "Best programming language?");

        let results = store.search_questions("best").unwrap();
        assert_eq!(results.len(), 2);

        let results = store.search_questions("nonexistent").unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_search_reflects_updates_and_deletes() {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::init(tmp.path()).unwrap();
        let now = Utc::now();

        let q = add_question_at(&store, "Original wording", now);
        store
            .update_question(
                &q.id,
                QuestionUpdate {
                    question_text: Some("Rewritten entirely".to_string()),
                    pub_date: None,
                },
            )
            .unwrap();

        assert!(store.search_questions("original").unwrap().is_empty());
        assert_eq!(store.search_questions("rewritten").unwrap().len(), 1);

        store.delete_question(&q.id).unwrap();
        assert!(store.search_questions("rewritten").unwrap().is_empty());
    }
}
