//! LLM-backed helpers: keyword recommendations and CV evaluation.

pub mod cv;
pub mod handlers;
pub mod keywords;
pub mod prompts;
pub mod resume;
pub mod wiki;
