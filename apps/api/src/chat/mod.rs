// Conversation phase: session start, multi-turn dialogue, summary-offer
// detection. All model calls go through llm_client; no provider calls here.

pub mod dialogue;
pub mod handlers;
pub mod prompts;
