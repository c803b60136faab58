pub mod handlers;
pub mod nutrition;
pub mod router;
pub mod validators;
