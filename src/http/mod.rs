//! JSON API for the public polling surface.
//!
//! Handlers read the wall clock once at the request boundary and pass it
//! into the repository, so the embargo and recency rules never consult
//! time on their own. Tallies only appear on the results and vote
//! responses; the detail view is the voting form's data.

pub mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::entity::{Choice, Question};
use crate::store::SqliteStore;
use error::ApiError;

/// Shared server state: the repository behind an async mutex.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<SqliteStore>>,
}

impl AppState {
    pub fn new(store: SqliteStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}

/// A question as rendered on the public listing.
#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub id: Uuid,
    pub sequence_number: u32,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    pub was_published_recently: bool,
}

impl QuestionView {
    fn new(question: &Question, now: DateTime<Utc>) -> Self {
        Self {
            id: question.id,
            sequence_number: question.sequence_number,
            question_text: question.question_text.clone(),
            pub_date: question.pub_date,
            was_published_recently: question.was_published_recently(now),
        }
    }
}

/// A choice on the voting form. No tally here: results are a separate view.
#[derive(Debug, Serialize)]
pub struct ChoiceView {
    pub id: Uuid,
    pub choice_text: String,
}

/// A choice with its tally, for results and vote receipts.
#[derive(Debug, Serialize)]
pub struct TallyView {
    pub id: Uuid,
    pub choice_text: String,
    pub votes: u32,
}

impl TallyView {
    fn new(choice: &Choice) -> Self {
        Self {
            id: choice.id,
            choice_text: choice.choice_text.clone(),
            votes: choice.votes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuestionDetail {
    #[serde(flatten)]
    pub question: QuestionView,
    pub choices: Vec<ChoiceView>,
}

#[derive(Debug, Serialize)]
pub struct QuestionResults {
    #[serde(flatten)]
    pub question: QuestionView,
    pub choices: Vec<TallyView>,
}

#[derive(Debug, Deserialize)]
pub struct VotePayload {
    #[serde(default)]
    pub choice_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct VoteReceipt {
    pub question_id: Uuid,
    pub choice: TallyView,
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/questions", get(list_questions))
        .route("/api/questions/{id}", get(question_detail))
        .route("/api/questions/{id}/results", get(question_results))
        .route("/api/questions/{id}/vote", post(cast_vote))
        .with_state(state)
}

/// Run the API server until ctrl-c.
pub async fn serve(store: SqliteStore, bind: SocketAddr) -> crate::Result<()> {
    info!(db = %store.db_path().display(), "opening store");

    let app = router(AppState::new(store));
    let listener = TcpListener::bind(bind).await?;
    info!(addr = %bind, "pollbox listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

async fn list_questions(State(state): State<AppState>) -> Result<Json<Vec<QuestionView>>, ApiError> {
    let now = Utc::now();
    let store = state.store.lock().await;

    let questions = store.list_published(now)?;
    debug!(count = questions.len(), "listed published questions");

    Ok(Json(
        questions.iter().map(|q| QuestionView::new(q, now)).collect(),
    ))
}

async fn question_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuestionDetail>, ApiError> {
    let now = Utc::now();
    let store = state.store.lock().await;

    let question = store.get_published(&id, now)?;
    let choices = store
        .choices_for(&question.id)?
        .iter()
        .map(|c| ChoiceView {
            id: c.id,
            choice_text: c.choice_text.clone(),
        })
        .collect();

    Ok(Json(QuestionDetail {
        question: QuestionView::new(&question, now),
        choices,
    }))
}

async fn question_results(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuestionResults>, ApiError> {
    let now = Utc::now();
    let store = state.store.lock().await;

    let question = store.get_published(&id, now)?;
    let choices = store
        .choices_for(&question.id)?
        .iter()
        .map(TallyView::new)
        .collect();

    Ok(Json(QuestionResults {
        question: QuestionView::new(&question, now),
        choices,
    }))
}

async fn cast_vote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VotePayload>,
) -> Result<Json<VoteReceipt>, ApiError> {
    let now = Utc::now();

    let choice_id = match payload.choice_id {
        Some(choice_id) => choice_id,
        None => {
            warn!(question_id = %id, "vote without a choice");
            return Err(ApiError::NoChoiceSelected);
        }
    };

    let store = state.store.lock().await;
    match store.cast_vote(&id, &choice_id, now) {
        Ok(choice) => {
            info!(question_id = %id, choice_id = %choice_id, votes = choice.votes, "vote recorded");
            Ok(Json(VoteReceipt {
                question_id: id,
                choice: TallyView::new(&choice),
            }))
        }
        Err(e) => {
            warn!(question_id = %id, choice_id = %choice_id, error = %e, "vote rejected");
            Err(e.into())
        }
    }
}
