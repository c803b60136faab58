pub mod cache;
pub mod mappers;
pub mod repositories;
