pub mod entities;
pub mod normalizer;

pub use entities::*;
