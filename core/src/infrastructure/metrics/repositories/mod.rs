pub mod usage_metric_repository;
