pub mod analysis;
pub mod common;
pub mod health;
pub mod image;
pub mod llm;
pub mod metrics;
pub mod prompt;
