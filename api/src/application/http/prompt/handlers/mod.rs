pub mod activate_prompt;
pub mod create_prompt;
pub mod get_active_prompt;
pub mod get_prompt;
pub mod get_prompts;
