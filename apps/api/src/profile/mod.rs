// Profile phase: finished transcript → structured career profile → SQLite,
// plus the HTML report. Extraction calls the model through llm_client.

pub mod extractor;
pub mod handlers;
pub mod prompts;
pub mod store;
