pub mod prompt_version;
