pub mod prompt_repository;
