// Event-driven workflows and the state they share
pub mod chat_store;
pub mod detection;
pub mod event_handler;
pub mod language_store;
pub mod reactions;
pub mod scheduler;
pub mod translation;
