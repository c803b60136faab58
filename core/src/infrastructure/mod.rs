pub mod analysis;
pub mod db;
pub mod health;
pub mod llm;
pub mod metrics;
pub mod prompt;
