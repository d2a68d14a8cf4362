// External API clients
pub mod translate;
