//! Profile extractor: runs the extraction call over a finished transcript
//! and decodes the model's JSON into a [`Profile`].
//!
//! Unlike the dialogue manager, failures here are surfaced, not absorbed:
//! the caller asked for a document and must learn when there is none.

use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};

use crate::llm_client::{GatewayError, GenerationConfig, ModelGateway};
use crate::models::profile::Profile;
use crate::models::transcript::Transcript;
use crate::profile::prompts::{JSON_EXTRACTOR_SYSTEM, PROFILE_SCHEMA_PROMPT};

#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Nothing to extract from. Checked before any model call.
    #[error("transcript is empty, nothing to extract")]
    EmptyTranscript,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The model's output was not a JSON object even after fence cleanup.
    /// Both texts are kept for the log trail.
    #[error("model output is not a JSON object")]
    MalformedOutput { raw: String, cleaned: String },

    /// The model returned well-formed JSON that declares its own failure
    /// through an `error` key instead of profile fields.
    #[error("model reported an extraction failure: {0}")]
    ModelReportedError(String),
}

/// Turns the transcript into a structured profile with one extraction call.
/// The summary-offer state is deliberately not consulted: extraction works
/// on any non-empty transcript.
pub async fn extract(
    gateway: &ModelGateway,
    transcript: &Transcript,
) -> Result<Profile, ExtractionError> {
    if transcript.is_empty() {
        return Err(ExtractionError::EmptyTranscript);
    }

    let raw = gateway
        .generate(
            JSON_EXTRACTOR_SYSTEM,
            transcript,
            PROFILE_SCHEMA_PROMPT,
            &GenerationConfig::EXTRACTION,
        )
        .await?;

    let cleaned = strip_code_fences(&raw);

    // Profile is a transparent JSON object, so a bare array, a scalar, or
    // prose all fail the same way here.
    let profile: Profile = serde_json::from_str(cleaned).map_err(|e| {
        error!("extraction output is not decodable JSON: {e}; cleaned text: {cleaned:?}");
        ExtractionError::MalformedOutput {
            raw: raw.clone(),
            cleaned: cleaned.to_string(),
        }
    })?;

    if let Some(reported) = profile.get("error") {
        let message = match reported {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(ExtractionError::ModelReportedError(message));
    }

    let missing = profile.missing_expected_keys();
    if !missing.is_empty() {
        warn!("extracted profile is missing expected keys: {missing:?}");
    }

    Ok(profile)
}

/// Strips a leading ```json or ``` fence and a trailing ``` fence. The
/// extraction prompt forbids fences, yet models add them often enough that
/// decoding without this cleanup would reject good documents.
fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest.trim_start();
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest.trim_start();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::ChatModel;
    use crate::models::transcript::Turn;
    use async_trait::async_trait;
    use std::sync::Arc;

    const FULL_PROFILE_JSON: &str = r#"{
        "interesses_principais": "dados e automação",
        "objetivos_carreira_inferidos": "atuar com engenharia de dados",
        "soft_skills_identificadas_com_evidencia": [
            {"skill": "curiosidade", "evidencia": "fez perguntas sobre a área"}
        ],
        "soft_skills_faltantes_para_area": [
            {"skill": "comunicação", "evidencia": "respostas muito curtas"}
        ],
        "hard_skills_mencionadas_ou_desejadas": ["Python", "SQL"],
        "areas_de_potencial_desenvolvimento_sugeridas": "estatística aplicada",
        "sugestoes_de_carreira_inicial_exploratoria": ["analista de dados"],
        "observacoes_gerais_sobre_interacao": "aluno engajado"
    }"#;

    struct ScriptedModel(String);

    impl ScriptedModel {
        fn new(output: impl Into<String>) -> Self {
            Self(output.into())
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn generate(
            &self,
            _system: &str,
            _transcript: &Transcript,
            _new_input: &str,
            _config: &GenerationConfig,
        ) -> Result<String, GatewayError> {
            Ok(self.0.clone())
        }
    }

    struct PanickingModel;

    #[async_trait]
    impl ChatModel for PanickingModel {
        async fn generate(
            &self,
            _system: &str,
            _transcript: &Transcript,
            _new_input: &str,
            _config: &GenerationConfig,
        ) -> Result<String, GatewayError> {
            panic!("extraction must not reach the model for an empty transcript");
        }
    }

    fn interview_transcript() -> Transcript {
        let mut transcript = Transcript::seeded("Olá! Me conte seu curso.");
        transcript.push(Turn::user("Ciência da Computação, 4º período"));
        transcript.push(Turn::assistant("Qual matéria você mais gosta?"));
        transcript.push(Turn::user("Banco de dados"));
        transcript
    }

    #[test]
    fn test_strip_code_fences_variants() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
        // Unterminated fences still get the opening stripped.
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }

    #[tokio::test]
    async fn test_extract_decodes_a_fenced_document() {
        let gateway = ModelGateway::with_model(Arc::new(ScriptedModel::new(format!(
            "```json\n{FULL_PROFILE_JSON}\n```"
        ))));

        let profile = extract(&gateway, &interview_transcript()).await.unwrap();
        assert!(profile.missing_expected_keys().is_empty());
        assert_eq!(
            profile.get("interesses_principais").and_then(|v| v.as_str()),
            Some("dados e automação")
        );
    }

    #[tokio::test]
    async fn test_empty_transcript_short_circuits_before_the_model() {
        let gateway = ModelGateway::with_model(Arc::new(PanickingModel));
        let result = extract(&gateway, &Transcript::new()).await;
        assert!(matches!(result, Err(ExtractionError::EmptyTranscript)));
    }

    #[tokio::test]
    async fn test_prose_output_is_malformed_and_keeps_both_texts() {
        let gateway = ModelGateway::with_model(Arc::new(ScriptedModel::new(
            "```\nAqui está um resumo do aluno em texto corrido.\n```",
        )));
        let result = extract(&gateway, &interview_transcript()).await;
        match result {
            Err(ExtractionError::MalformedOutput { raw, cleaned }) => {
                assert!(raw.starts_with("```"));
                assert_eq!(cleaned, "Aqui está um resumo do aluno em texto corrido.");
            }
            other => panic!("expected MalformedOutput, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_object_json_is_malformed() {
        let gateway = ModelGateway::with_model(Arc::new(ScriptedModel::new("[1, 2, 3]")));
        let result = extract(&gateway, &interview_transcript()).await;
        assert!(matches!(result, Err(ExtractionError::MalformedOutput { .. })));
    }

    #[tokio::test]
    async fn test_in_band_error_key_is_surfaced() {
        let gateway = ModelGateway::with_model(Arc::new(ScriptedModel::new(
            r#"{"error": "Falha crítica ao gerar o resumo do perfil via IA."}"#,
        )));
        let result = extract(&gateway, &interview_transcript()).await;
        match result {
            Err(ExtractionError::ModelReportedError(message)) => {
                assert!(message.contains("Falha crítica"));
            }
            other => panic!("expected ModelReportedError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unavailable_gateway_is_surfaced() {
        let gateway = ModelGateway::unavailable();
        let result = extract(&gateway, &interview_transcript()).await;
        assert!(matches!(
            result,
            Err(ExtractionError::Gateway(GatewayError::Unavailable))
        ));
    }
}
