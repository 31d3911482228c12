use axum::{extract::State, Json};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::dialogue;
use crate::chat::prompts::{INITIAL_GREETING, SESSION_RESTARTED_NOTICE};
use crate::errors::AppError;
use crate::models::transcript::Transcript;
use crate::session::{session_cookie, session_id_from};
use crate::state::AppState;

#[derive(Serialize)]
pub struct StartSessionResponse {
    pub initial_message: String,
}

#[derive(Deserialize)]
pub struct ChatTurnRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct ChatTurnResponse {
    pub bot_response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_of_quiz_phase_reached: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_restarted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// GET /api/start_session
///
/// Discards whatever session the cookie pointed at and opens a fresh one
/// whose transcript starts with the scripted greeting.
pub async fn handle_start_session(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Json<StartSessionResponse>), AppError> {
    if !state.gateway.is_available() {
        return Err(AppError::AiUnavailable);
    }

    // Starting over discards the caller's previous conversation, if any.
    if let Some(previous) = session_id_from(&jar) {
        state.sessions.remove(previous).await;
    }

    let session_id = Uuid::new_v4();
    state.sessions.start(session_id, INITIAL_GREETING).await;
    info!("started session {session_id}");

    let jar = jar.add(session_cookie(session_id));
    Ok((
        jar,
        Json(StartSessionResponse {
            initial_message: INITIAL_GREETING.to_string(),
        }),
    ))
}

/// POST /api/chat
///
/// One interview exchange. A missing or stale session is not an error here:
/// the conversation restarts transparently and the response says so through
/// `session_restarted`. Model failures are absorbed by the dialogue manager,
/// so this handler only fails on bad input or an unconfigured gateway.
pub async fn handle_chat(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Json(req): Json<ChatTurnRequest>,
) -> Result<(SignedCookieJar, Json<ChatTurnResponse>), AppError> {
    if !state.gateway.is_available() {
        return Err(AppError::AiUnavailable);
    }

    let message = match req.message.as_deref().map(str::trim) {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => return Err(AppError::Validation("Mensagem não fornecida.".into())),
    };

    let Some((session_id, mut transcript)) = current_transcript(&state, &jar).await else {
        warn!("chat request without a live session, restarting");
        let session_id = Uuid::new_v4();
        state.sessions.start(session_id, INITIAL_GREETING).await;
        let jar = jar.add(session_cookie(session_id));
        return Ok((
            jar,
            Json(ChatTurnResponse {
                bot_response: INITIAL_GREETING.to_string(),
                end_of_quiz_phase_reached: None,
                session_restarted: Some(true),
                error_message: Some(SESSION_RESTARTED_NOTICE.to_string()),
            }),
        ));
    };

    let outcome = dialogue::advance(&state.gateway, &mut transcript, &message).await;

    if !state.sessions.save_transcript(session_id, transcript).await {
        warn!("session {session_id} vanished mid-exchange, turns dropped");
    }

    Ok((
        jar,
        Json(ChatTurnResponse {
            bot_response: outcome.reply,
            end_of_quiz_phase_reached: outcome.offers_summary.then_some(true),
            session_restarted: None,
            error_message: None,
        }),
    ))
}

/// Resolves the caller's session from the signed cookie and clones out its
/// transcript. None when the cookie is absent, unsigned, malformed, or points
/// at a session this process no longer holds.
async fn current_transcript(
    state: &AppState,
    jar: &SignedCookieJar,
) -> Option<(Uuid, Transcript)> {
    let session_id = session_id_from(jar)?;
    let session = state.sessions.snapshot(session_id).await?;
    Some((session_id, session.transcript))
}
