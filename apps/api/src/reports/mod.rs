pub mod aggregate;
pub mod classify;
pub mod handlers;
pub mod narrative;
pub mod prompts;
pub mod queries;
