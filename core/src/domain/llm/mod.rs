pub mod client;
pub mod entities;
pub mod ports;
pub mod pricing;
pub mod prompt_builder;

pub use entities::*;
pub use ports::*;
