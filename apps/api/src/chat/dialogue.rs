//! Dialogue manager: advances the interview by one exchange and watches for
//! the summary offer.

use tracing::{error, warn};

use crate::chat::prompts::{
    CAREER_GUIDE_SYSTEM, FALLBACK_REQUEST_FAILED, FALLBACK_UNAVAILABLE, SUMMARY_TRIGGER_PHRASE,
};
use crate::llm_client::{GatewayError, GenerationConfig, ModelGateway};
use crate::models::transcript::{Transcript, Turn};

/// Result of one dialogue exchange: the assistant's reply and whether it
/// contained the summary offer.
pub struct TurnOutcome {
    pub reply: String,
    pub offers_summary: bool,
}

/// Advances the interview by one exchange. The user turn and the assistant
/// turn are both appended before returning, so the transcript grows by
/// exactly two turns on every call. Infallible by contract: when the gateway
/// fails, the recorded assistant turn is a fixed fallback and the summary
/// flag stays false. The caller owns writing the transcript back to wherever
/// it lives between requests.
pub async fn advance(
    gateway: &ModelGateway,
    transcript: &mut Transcript,
    user_input: &str,
) -> TurnOutcome {
    let outcome = match gateway
        .generate(
            CAREER_GUIDE_SYSTEM,
            transcript,
            user_input,
            &GenerationConfig::CONVERSATIONAL,
        )
        .await
    {
        Ok(reply) => {
            let offers_summary = offers_summary(&reply);
            TurnOutcome {
                reply,
                offers_summary,
            }
        }
        Err(GatewayError::Unavailable) => {
            warn!("chat turn requested while the model gateway is unavailable");
            TurnOutcome {
                reply: FALLBACK_UNAVAILABLE.to_string(),
                offers_summary: false,
            }
        }
        Err(GatewayError::RequestFailed(detail)) => {
            error!("chat model call failed: {detail}");
            TurnOutcome {
                reply: FALLBACK_REQUEST_FAILED.to_string(),
                offers_summary: false,
            }
        }
    };

    transcript.push(Turn::user(user_input));
    transcript.push(Turn::assistant(outcome.reply.clone()));
    outcome
}

/// True when the assistant's reply contains the summary-offer question,
/// regardless of casing or surrounding text.
pub fn offers_summary(reply: &str) -> bool {
    reply.to_lowercase().contains(SUMMARY_TRIGGER_PHRASE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::ChatModel;
    use crate::models::transcript::Speaker;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct ScriptedModel(&'static str);

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn generate(
            &self,
            _system: &str,
            _transcript: &Transcript,
            _new_input: &str,
            _config: &GenerationConfig,
        ) -> Result<String, GatewayError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingModel;

    #[async_trait]
    impl ChatModel for FailingModel {
        async fn generate(
            &self,
            _system: &str,
            _transcript: &Transcript,
            _new_input: &str,
            _config: &GenerationConfig,
        ) -> Result<String, GatewayError> {
            Err(GatewayError::RequestFailed("status 500: boom".into()))
        }
    }

    #[test]
    fn test_offers_summary_matches_any_casing() {
        assert!(offers_summary("gostaria de ver um resumo agora?"));
        assert!(offers_summary("Gostaria De Ver Um Resumo AGORA?"));
        assert!(offers_summary(
            "Ok, acho que temos informações valiosas para começar a traçar um perfil. \
             Gostaria de ver um resumo agora?"
        ));
    }

    #[test]
    fn test_offers_summary_requires_the_whole_question() {
        assert!(!offers_summary("gostaria de ver um resumo"));
        assert!(!offers_summary("Que matéria você mais gosta?"));
        assert!(!offers_summary(""));
    }

    #[tokio::test]
    async fn test_advance_passes_the_reply_through_and_flags_the_offer() {
        let gateway = ModelGateway::with_model(Arc::new(ScriptedModel(
            "Ok, acho que temos informações valiosas para começar a traçar um perfil. \
             Gostaria de ver um resumo agora?",
        )));
        let mut transcript = Transcript::seeded("Oi");
        let outcome = advance(&gateway, &mut transcript, "quero concluir").await;
        assert!(outcome.offers_summary);
        assert!(outcome.reply.contains("traçar um perfil"));
    }

    #[tokio::test]
    async fn test_advance_appends_both_turns_in_order() {
        let gateway =
            ModelGateway::with_model(Arc::new(ScriptedModel("E qual matéria você prefere?")));
        let mut transcript = Transcript::seeded("Oi");
        let outcome = advance(&gateway, &mut transcript, "Engenharia, 3º").await;

        assert!(!outcome.offers_summary);
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.turns()[1].speaker, Speaker::User);
        assert_eq!(transcript.turns()[1].text(), "Engenharia, 3º");
        assert_eq!(transcript.turns()[2].speaker, Speaker::Assistant);
        assert_eq!(transcript.turns()[2].text(), "E qual matéria você prefere?");
    }

    #[tokio::test]
    async fn test_advance_absorbs_an_unavailable_gateway() {
        let gateway = ModelGateway::unavailable();
        let mut transcript = Transcript::seeded("Oi");
        let outcome = advance(&gateway, &mut transcript, "olá").await;
        assert_eq!(outcome.reply, FALLBACK_UNAVAILABLE);
        assert!(!outcome.offers_summary);
        // The exchange is still recorded in full.
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.turns()[2].text(), FALLBACK_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_advance_absorbs_a_failed_request() {
        let gateway = ModelGateway::with_model(Arc::new(FailingModel));
        let mut transcript = Transcript::seeded("Oi");
        let outcome = advance(&gateway, &mut transcript, "olá").await;
        assert_eq!(outcome.reply, FALLBACK_REQUEST_FAILED);
        assert!(!outcome.offers_summary);
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.turns()[2].text(), FALLBACK_REQUEST_FAILED);
    }
}
