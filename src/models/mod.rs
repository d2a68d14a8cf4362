// Persisted document models
pub mod chat_config;
