pub mod analysis;
pub mod analytics;
pub mod health;
pub mod prompt;
pub mod server;
