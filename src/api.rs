//! api.rs — HTTP surface over the moderation core.
//!
//! One route per interaction kind: free-text turns while a session is open,
//! menu events once it is locked, transcript reads for display. Session state
//! lives behind a per-session async mutex so turns stay strictly sequential
//! within a conversation while distinct conversations proceed concurrently.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::contact_log::ContactSink;
use crate::error::{MenuError, TurnError};
use crate::lockmenu::{self, MenuEvent};
use crate::router::process_turn;
use crate::services::Services;
use crate::session::{LockMenuState, SessionState, TranscriptEntry};

type SessionMap = HashMap<Uuid, Arc<Mutex<SessionState>>>;

#[derive(Clone)]
pub struct AppState {
    sessions: Arc<RwLock<SessionMap>>,
    services: Services,
    contact_log: Arc<dyn ContactSink>,
}

impl AppState {
    pub fn new(services: Services, contact_log: Arc<dyn ContactSink>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            services,
            contact_log,
        }
    }

    fn session(&self, id: Uuid) -> Option<Arc<Mutex<SessionState>>> {
        self.sessions
            .read()
            .expect("session map poisoned")
            .get(&id)
            .cloned()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/session", post(create_session))
        .route("/session/{id}/message", post(post_message))
        .route("/session/{id}/menu", post(post_menu))
        .route("/session/{id}/transcript", get(get_transcript))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

// ---- request/response shapes ----

#[derive(serde::Serialize)]
struct SessionCreated {
    session_id: Uuid,
    transcript: Vec<TranscriptEntry>,
}

#[derive(serde::Deserialize)]
struct MessageReq {
    text: String,
}

#[derive(serde::Serialize)]
struct MessageResp {
    reply: String,
    locked: bool,
    strike_count: u8,
}

#[derive(serde::Serialize)]
struct MenuResp {
    menu_state: LockMenuState,
    reply: String,
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "unknown session")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<TurnError> for ApiError {
    fn from(e: TurnError) -> Self {
        match e {
            TurnError::SessionLocked => Self::new(StatusCode::CONFLICT, e.to_string()),
            TurnError::Generation(_) => Self::new(StatusCode::BAD_GATEWAY, e.to_string()),
        }
    }
}

impl From<MenuError> for ApiError {
    fn from(e: MenuError) -> Self {
        let status = match e {
            MenuError::NotLocked | MenuError::InvalidTransition { .. } => StatusCode::CONFLICT,
            MenuError::EmptyPhoneNumber => StatusCode::UNPROCESSABLE_ENTITY,
            MenuError::ContactLog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

// ---- handlers ----

async fn create_session(State(state): State<AppState>) -> Json<SessionCreated> {
    let id = Uuid::new_v4();
    let session = SessionState::new();
    let transcript = session.transcript.clone();
    state
        .sessions
        .write()
        .expect("session map poisoned")
        .insert(id, Arc::new(Mutex::new(session)));
    tracing::info!(session_id = %id, "session created");
    Json(SessionCreated {
        session_id: id,
        transcript,
    })
}

async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<MessageReq>,
) -> Result<Json<MessageResp>, ApiError> {
    let session = state.session(id).ok_or_else(ApiError::not_found)?;
    // Held for the whole turn: one message fully resolved before the next.
    let mut guard = session.lock().await;
    let reply = process_turn(&mut guard, &body.text, &state.services).await?;
    Ok(Json(MessageResp {
        reply,
        locked: guard.session_lock,
        strike_count: guard.strike_count,
    }))
}

async fn post_menu(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(event): Json<MenuEvent>,
) -> Result<Json<MenuResp>, ApiError> {
    let session = state.session(id).ok_or_else(ApiError::not_found)?;
    let mut guard = session.lock().await;
    let reply = lockmenu::handle_event(&mut guard, &event, state.contact_log.as_ref())?;
    Ok(Json(MenuResp {
        menu_state: guard.lock_menu_state,
        reply: reply.to_string(),
    }))
}

async fn get_transcript(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TranscriptEntry>>, ApiError> {
    let session = state.session(id).ok_or_else(ApiError::not_found)?;
    let guard = session.lock().await;
    Ok(Json(guard.transcript.clone()))
}
