pub mod entities;
pub mod fingerprint;
pub mod ports;
pub mod services;
pub mod store;
pub mod value_objects;

pub use entities::*;
pub use ports::*;
pub use value_objects::*;
