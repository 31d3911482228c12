use axum::{extract::State, response::Html, Json};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::models::profile::{Profile, EXPECTED_PROFILE_KEYS};
use crate::profile::extractor;
use crate::profile::prompts::PROFILE_READY_MESSAGE;
use crate::profile::store;
use crate::session::session_id_from;
use crate::state::AppState;

/// Page served when no profile exists for the caller yet. Plain 200 like the
/// report itself: for a browser hitting this URL early, the situation is a
/// dead end to navigate out of, not an API failure.
const REPORT_NOT_FOUND_PAGE: &str = "Resultado da análise não encontrado. \
Por favor, complete o questionário primeiro. <a href=\"/\">Voltar ao início</a>";

#[derive(Serialize)]
pub struct GenerateProfileResponse {
    pub message: String,
    pub profile_generation_complete: bool,
}

/// POST /api/generate_profile
///
/// Runs extraction over the caller's transcript, records the profile on the
/// session, and saves it to SQLite. Unlike /api/chat there is no transparent
/// restart: without a live session this fails loudly, because extracting
/// from a fresh transcript would produce an empty profile.
pub async fn handle_generate_profile(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Json<GenerateProfileResponse>, AppError> {
    if !state.gateway.is_available() {
        return Err(AppError::AiUnavailable);
    }

    let Some(session_id) = session_id_from(&jar) else {
        return Err(AppError::SessionMissing);
    };
    let Some(session) = state.sessions.snapshot(session_id).await else {
        return Err(AppError::SessionMissing);
    };

    let profile = extractor::extract(&state.gateway, &session.transcript).await?;

    if !state.sessions.set_profile(session_id, profile.clone()).await {
        warn!("session {session_id} vanished mid-extraction, profile not cached");
    }

    // Persistence is best-effort: the profile already lives on the session
    // and the report can render it, so a write failure is logged and the
    // request still succeeds.
    match store::upsert_profile(&state.db, session_id, &profile).await {
        Ok(()) => info!("profile saved for session {session_id}"),
        Err(e) => error!("failed to save profile for session {session_id}: {e}"),
    }

    Ok(Json(GenerateProfileResponse {
        message: PROFILE_READY_MESSAGE.to_string(),
        profile_generation_complete: true,
    }))
}

/// GET /report
///
/// Renders the extracted profile as a standalone HTML page. The session copy
/// is preferred; the database covers callers whose session map entry is gone
/// (for example after a deploy) but whose cookie survived.
pub async fn handle_report(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Html<String>, AppError> {
    match saved_profile(&state, &jar).await? {
        Some(profile) => Ok(Html(render_profile_page(&profile))),
        None => Ok(Html(REPORT_NOT_FOUND_PAGE.to_string())),
    }
}

async fn saved_profile(
    state: &AppState,
    jar: &SignedCookieJar,
) -> Result<Option<Profile>, AppError> {
    let Some(session_id) = session_id_from(jar) else {
        return Ok(None);
    };

    if let Some(session) = state.sessions.snapshot(session_id).await {
        if let Some(profile) = session.profile {
            return Ok(Some(profile));
        }
    }

    let Some(row) = store::fetch_profile(&state.db, session_id).await? else {
        return Ok(None);
    };
    match serde_json::from_str(&row.profile_json) {
        Ok(profile) => Ok(Some(profile)),
        Err(e) => {
            error!("stored profile for session {session_id} is unreadable: {e}");
            Ok(None)
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Report rendering
// ────────────────────────────────────────────────────────────────────────────

/// Renders the profile document as a full HTML page: expected fields first in
/// schema order, then whatever extra fields the model volunteered.
fn render_profile_page(profile: &Profile) -> String {
    let mut body = String::new();

    for key in EXPECTED_PROFILE_KEYS {
        if let Some(value) = profile.get(key) {
            render_section(key, value, &mut body);
        }
    }
    for (key, value) in profile.fields() {
        if !EXPECTED_PROFILE_KEYS.contains(&key.as_str()) {
            render_section(key, value, &mut body);
        }
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Seu Perfil de Carreira | Norte</title>\n</head>\n<body>\n\
         <h1>Seu Perfil de Carreira</h1>\n{body}\
         <p><a href=\"/\">Voltar ao início</a></p>\n</body>\n</html>\n"
    )
}

fn render_section(key: &str, value: &Value, out: &mut String) {
    if value.is_null() {
        return;
    }
    out.push_str("<section>\n<h2>");
    out.push_str(&escape_html(&title_case(key)));
    out.push_str("</h2>\n");
    render_value(value, out);
    out.push_str("</section>\n");
}

fn render_value(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => {
            out.push_str("<p>");
            out.push_str(&escape_html(s));
            out.push_str("</p>\n");
        }
        Value::Array(items) => {
            out.push_str("<ul>\n");
            for item in items {
                out.push_str("<li>");
                render_inline(item, out);
                out.push_str("</li>\n");
            }
            out.push_str("</ul>\n");
        }
        Value::Object(fields) => {
            out.push_str("<ul>\n");
            for (key, value) in fields {
                if value.is_null() {
                    continue;
                }
                out.push_str("<li><strong>");
                out.push_str(&escape_html(&title_case(key)));
                out.push_str("</strong>: ");
                render_inline(value, out);
                out.push_str("</li>\n");
            }
            out.push_str("</ul>\n");
        }
        Value::Null => {}
        other => {
            out.push_str("<p>");
            out.push_str(&escape_html(&other.to_string()));
            out.push_str("</p>\n");
        }
    }
}

/// Renders a value inside a list item. The skill/evidence pair gets its own
/// layout; anything else degrades to escaped text.
fn render_inline(value: &Value, out: &mut String) {
    if let Value::Object(fields) = value {
        if let (Some(Value::String(skill)), Some(Value::String(evidence))) =
            (fields.get("skill"), fields.get("evidencia"))
        {
            out.push_str("<strong>");
            out.push_str(&escape_html(skill));
            out.push_str("</strong>: ");
            out.push_str(&escape_html(evidence));
            return;
        }
    }
    match value {
        Value::String(s) => out.push_str(&escape_html(s)),
        other => out.push_str(&escape_html(&other.to_string())),
    }
}

/// "soft_skills_faltantes_para_area" → "Soft Skills Faltantes Para Area".
fn title_case(key: &str) -> String {
    key.replace('_', " ")
        .split_whitespace()
        .map(|w| {
            let mut c = w.chars();
            match c.next() {
                None => String::new(),
                Some(f) => f.to_uppercase().to_string() + c.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Profile text comes from a language model; it is escaped like any other
/// untrusted input.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(value: Value) -> Profile {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("interesses_principais"), "Interesses Principais");
        assert_eq!(
            title_case("soft_skills_faltantes_para_area"),
            "Soft Skills Faltantes Para Area"
        );
    }

    #[test]
    fn test_escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_report_renders_strings_arrays_and_skill_pairs() {
        let page = render_profile_page(&profile(json!({
            "interesses_principais": "dados e automação",
            "hard_skills_mencionadas_ou_desejadas": ["Python", "SQL"],
            "soft_skills_identificadas_com_evidencia": [
                {"skill": "curiosidade", "evidencia": "fez muitas perguntas"}
            ],
        })));

        assert!(page.contains("<h2>Interesses Principais</h2>"));
        assert!(page.contains("<p>dados e automação</p>"));
        assert!(page.contains("<li>Python</li>"));
        assert!(page.contains("<strong>curiosidade</strong>: fez muitas perguntas"));
    }

    #[test]
    fn test_report_puts_expected_fields_before_extras() {
        let page = render_profile_page(&profile(json!({
            "aspiracoes_declaradas": {"empresa_sonhos_mencionada": "Embraer"},
            "interesses_principais": "aviação",
        })));

        let interests = page.find("Interesses Principais").unwrap();
        let aspirations = page.find("Aspiracoes Declaradas").unwrap();
        assert!(interests < aspirations);
        assert!(page.contains("<strong>Empresa Sonhos Mencionada</strong>: Embraer"));
    }

    #[test]
    fn test_report_skips_null_fields_and_subfields() {
        let page = render_profile_page(&profile(json!({
            "interesses_principais": "música",
            "objetivos_carreira_inferidos": null,
            "aspiracoes_declaradas": {
                "empresa_sonhos_mencionada": "Spotify",
                "cargo_desejado_mencionado": null,
            },
        })));

        assert!(!page.contains("Objetivos Carreira Inferidos"));
        assert!(!page.contains("Cargo Desejado Mencionado"));
        assert!(page.contains("Spotify"));
    }

    #[test]
    fn test_model_text_is_escaped_in_the_page() {
        let page = render_profile_page(&profile(json!({
            "observacoes_gerais_sobre_interacao": "<script>alert('xss')</script>",
        })));

        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;"));
    }
}
