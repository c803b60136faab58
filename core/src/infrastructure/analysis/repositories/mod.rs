pub mod analysis_repository;
