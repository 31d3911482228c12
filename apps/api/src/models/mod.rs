// Shared data types: the conversation transcript and the extracted profile.
// Pure data; behavior lives in the chat and profile modules.

pub mod profile;
pub mod transcript;
