use std::env;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::entity::{Choice, Question};
use crate::error::{PollboxError, Result};
use crate::store::{ChoiceUpdate, QuestionUpdate, SqliteStore};

/// Find the project root by looking for .pollbox/ or .git/
fn find_project_root() -> PathBuf {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let mut current = cwd.as_path();
    loop {
        if current.join(".pollbox").exists() || current.join(".git").exists() {
            return current.to_path_buf();
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return cwd,
        }
    }
}

/// Parse a publication instant: RFC 3339, or YYYY-MM-DD for midnight UTC.
fn parse_pub_date(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(DateTime::from_naive_utc_and_offset(dt, Utc));
        }
    }

    Err(PollboxError::Validation {
        field: "pub_date".to_string(),
        message: format!("'{}' is not RFC 3339 or YYYY-MM-DD", s),
    })
}

/// Resolve a question by sequence number or UUID prefix.
fn resolve_question(store: &SqliteStore, id: &str) -> Result<Question> {
    let questions = store.list_questions()?;

    let question = if let Ok(seq) = id.parse::<u32>() {
        questions.iter().find(|q| q.sequence_number == seq)
    } else {
        questions
            .iter()
            .find(|q| q.id.to_string().starts_with(id))
    };

    question
        .cloned()
        .ok_or_else(|| PollboxError::QuestionNotFound(id.to_string()))
}

/// Resolve a choice among `choices` by sequence number or UUID prefix.
fn find_choice<'a>(choices: &'a [Choice], id: &str) -> Option<&'a Choice> {
    if let Ok(seq) = id.parse::<u32>() {
        choices.iter().find(|c| c.sequence_number == seq)
    } else {
        choices.iter().find(|c| c.id.to_string().starts_with(id))
    }
}

/// Resolve a choice across every question.
fn resolve_choice(store: &SqliteStore, id: &str) -> Result<Choice> {
    for question in store.list_questions()? {
        let choices = store.choices_for(&question.id)?;
        if let Some(choice) = find_choice(&choices, id) {
            return Ok(choice.clone());
        }
    }
    Err(PollboxError::ChoiceNotFound(id.to_string()))
}

/// Publication state label for listings: the admin view shows whether a
/// question is scheduled, freshly published, or older than a day.
fn publication_label(question: &Question, now: DateTime<Utc>) -> &'static str {
    if !question.is_published(now) {
        "scheduled"
    } else if question.was_published_recently(now) {
        "recent"
    } else {
        "published"
    }
}

pub fn handle_init() -> Result<()> {
    let root = env::current_dir()?;

    let _store = SqliteStore::init(&root)?;

    println!("Initialized pollbox project in {}", root.display());

    Ok(())
}

pub fn handle_add_question(text: String, pub_date: Option<String>, json: bool) -> Result<()> {
    let root = find_project_root();
    let store = SqliteStore::open(&root)?;

    let seq = store.next_sequence_number("question")?;
    let mut question = Question::new(text, seq);

    if let Some(raw) = pub_date {
        question.pub_date = parse_pub_date(&raw)?;
    }

    store.add_question(&question)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&question)?);
    } else {
        println!(
            "Created question {:03} ({}) - {}",
            question.sequence_number,
            &question.id.to_string()[..7],
            question.question_text
        );
    }

    Ok(())
}

pub fn handle_add_choice(text: String, question_id: String, json: bool) -> Result<()> {
    let root = find_project_root();
    let store = SqliteStore::open(&root)?;

    let question = resolve_question(&store, &question_id)?;

    let seq = store.next_sequence_number("choice")?;
    let choice = Choice::new(question.id, text, seq);

    store.add_choice(&choice)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&choice)?);
    } else {
        println!(
            "Created choice {:03} ({}) under question {:03} - {}",
            choice.sequence_number,
            &choice.id.to_string()[..7],
            question.sequence_number,
            choice.choice_text
        );
    }

    Ok(())
}

pub fn handle_list(published: bool, json: bool) -> Result<()> {
    let root = find_project_root();
    let store = SqliteStore::open(&root)?;

    let now = Utc::now();
    let questions = if published {
        store.list_published(now)?
    } else {
        store.list_questions()?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&questions)?);
    } else if questions.is_empty() {
        println!("No questions found.");
    } else {
        println!("Questions:\n");
        for q in questions {
            println!(
                "  {:03} ({}) [{}] {} - {}",
                q.sequence_number,
                &q.id.to_string()[..7],
                publication_label(&q, now),
                q.pub_date.format("%Y-%m-%d %H:%M"),
                q.question_text
            );
        }
    }

    Ok(())
}

pub fn handle_get(id: String, json: bool) -> Result<()> {
    let root = find_project_root();
    let store = SqliteStore::open(&root)?;

    let question = resolve_question(&store, &id)?;
    let choices = store.choices_for(&question.id)?;

    if json {
        let payload = serde_json::json!({
            "question": question,
            "choices": choices,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        let now = Utc::now();
        println!("Question {:03} ({})", question.sequence_number, question.id);
        println!("Text: {}", question.question_text);
        println!(
            "Published: {} ({})",
            question.pub_date.format("%Y-%m-%d %H:%M"),
            publication_label(&question, now)
        );
        println!("Created: {}", question.created_at.format("%Y-%m-%d %H:%M"));

        if choices.is_empty() {
            println!("\nNo choices yet.");
        } else {
            println!("\nChoices:");
            for c in choices {
                println!(
                    "  {:03} ({}) {} - {} votes",
                    c.sequence_number,
                    &c.id.to_string()[..7],
                    c.choice_text,
                    c.votes
                );
            }
        }
    }

    Ok(())
}

pub fn handle_update(
    id: String,
    text: Option<String>,
    pub_date: Option<String>,
    json: bool,
) -> Result<()> {
    let root = find_project_root();
    let store = SqliteStore::open(&root)?;

    let question = resolve_question(&store, &id)?;

    let updates = QuestionUpdate {
        question_text: text,
        pub_date: pub_date.as_deref().map(parse_pub_date).transpose()?,
    };

    let updated = store.update_question(&question.id, updates)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&updated)?);
    } else {
        println!(
            "Updated question {:03} ({}) - {}",
            updated.sequence_number,
            &updated.id.to_string()[..7],
            updated.question_text
        );
    }

    Ok(())
}

/// Confirm a deletion on a TTY; refuse in non-interactive mode without --force.
fn confirm_delete(prompt: String, force: bool) -> Result<bool> {
    if force {
        return Ok(true);
    }

    eprintln!("{} [y/N] ", prompt);

    if atty::is(atty::Stream::Stdin) {
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(false);
        }
        Ok(true)
    } else {
        Err(PollboxError::Storage(
            "Use --force to delete in non-interactive mode".to_string(),
        ))
    }
}

pub fn handle_delete(id: String, force: bool) -> Result<()> {
    let root = find_project_root();
    let store = SqliteStore::open(&root)?;

    let question = resolve_question(&store, &id)?;
    let choices = store.choices_for(&question.id)?;

    let prompt = format!(
        "Delete question {:03} ({}) - {} and its {} choice(s)?",
        question.sequence_number,
        &question.id.to_string()[..7],
        question.question_text,
        choices.len()
    );
    if !confirm_delete(prompt, force)? {
        return Ok(());
    }

    store.delete_question(&question.id)?;

    println!(
        "Deleted question {:03} ({}) - {}",
        question.sequence_number,
        &question.id.to_string()[..7],
        question.question_text
    );

    Ok(())
}

pub fn handle_update_choice(id: String, text: String, json: bool) -> Result<()> {
    let root = find_project_root();
    let store = SqliteStore::open(&root)?;

    let choice = resolve_choice(&store, &id)?;

    let updated = store.update_choice(
        &choice.id,
        ChoiceUpdate {
            choice_text: Some(text),
        },
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&updated)?);
    } else {
        println!(
            "Updated choice {:03} ({}) - {}",
            updated.sequence_number,
            &updated.id.to_string()[..7],
            updated.choice_text
        );
    }

    Ok(())
}

pub fn handle_delete_choice(id: String, force: bool) -> Result<()> {
    let root = find_project_root();
    let store = SqliteStore::open(&root)?;

    let choice = resolve_choice(&store, &id)?;

    let prompt = format!(
        "Delete choice {:03} ({}) - {}?",
        choice.sequence_number,
        &choice.id.to_string()[..7],
        choice.choice_text
    );
    if !confirm_delete(prompt, force)? {
        return Ok(());
    }

    store.delete_choice(&choice.id)?;

    println!(
        "Deleted choice {:03} ({}) - {}",
        choice.sequence_number,
        &choice.id.to_string()[..7],
        choice.choice_text
    );

    Ok(())
}

pub fn handle_vote(question_id: String, choice_id: String, json: bool) -> Result<()> {
    let root = find_project_root();
    let store = SqliteStore::open(&root)?;

    let question = resolve_question(&store, &question_id)?;
    let choices = store.choices_for(&question.id)?;
    let choice = find_choice(&choices, &choice_id).ok_or_else(|| PollboxError::InvalidChoice {
        question_id: question.id.to_string(),
        choice_id: choice_id.clone(),
    })?;

    let updated = store.cast_vote(&question.id, &choice.id, Utc::now())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&updated)?);
    } else {
        println!(
            "Vote recorded: {} now has {} vote(s)",
            updated.choice_text, updated.votes
        );
    }

    Ok(())
}

pub fn handle_results(id: String, json: bool) -> Result<()> {
    let root = find_project_root();
    let store = SqliteStore::open(&root)?;

    let question = resolve_question(&store, &id)?;
    let choices = store.choices_for(&question.id)?;

    if json {
        let payload = serde_json::json!({
            "question": question,
            "choices": choices,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!(
            "Results for question {:03} - {}\n",
            question.sequence_number, question.question_text
        );
        if choices.is_empty() {
            println!("No choices yet.");
        } else {
            let total: u32 = choices.iter().map(|c| c.votes).sum();
            for c in &choices {
                println!("  {} - {} vote(s)", c.choice_text, c.votes);
            }
            println!("\nTotal: {} vote(s)", total);
        }
    }

    Ok(())
}

pub fn handle_search(query: String, json: bool) -> Result<()> {
    let root = find_project_root();
    let store = SqliteStore::open(&root)?;

    let results = store.search_questions(&query)?;

    if json {
        #[derive(serde::Serialize)]
        struct SearchResultJson {
            id: String,
            sequence_number: u32,
            question_text: String,
            pub_date: String,
        }

        let json_results: Vec<SearchResultJson> = results
            .into_iter()
            .map(|r| SearchResultJson {
                id: r.id,
                sequence_number: r.sequence_number,
                question_text: r.question_text,
                pub_date: r.pub_date,
            })
            .collect();

        println!("{}", serde_json::to_string_pretty(&json_results)?);
    } else if results.is_empty() {
        println!("No results found for '{}'.", query);
    } else {
        println!("Search results for '{}':\n", query);
        for r in results {
            let text = r
                .text_highlight
                .unwrap_or_else(|| r.question_text.clone())
                .replace("<mark>", "\x1b[1m")
                .replace("</mark>", "\x1b[0m");
            println!(
                "  {:03} ({}) {}",
                r.sequence_number,
                &r.id[..7.min(r.id.len())],
                text
            );
        }
    }

    Ok(())
}

pub fn handle_serve(bind: SocketAddr) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let root = find_project_root();
    let store = SqliteStore::open(&root)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(crate::http::serve(store, bind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_pub_date_rfc3339() {
        let dt = parse_pub_date("2026-08-07T12:30:00Z").unwrap();
        assert_eq!(dt.hour(), 12);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_parse_pub_date_date_only() {
        let dt = parse_pub_date("2026-08-07").unwrap();
        assert_eq!(dt.year(), 2026);
        assert_eq!(dt.month(), 8);
        assert_eq!(dt.day(), 7);
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_parse_pub_date_invalid() {
        assert!(matches!(
            parse_pub_date("next tuesday"),
            Err(PollboxError::Validation { field, .. }) if field == "pub_date"
        ));
    }
}
