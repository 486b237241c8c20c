//! Aurora Chat Analyst
//!
//! A small backend that:
//! - Fetches a paginated collection of chat messages once at startup
//! - Caches them to a single JSON file on disk
//! - Answers free-text questions by sending the whole corpus to Gemini
//!
//! STARTUP:
//! CACHE HIT → SERVE
//! CACHE MISS → FETCH ALL PAGES → SAVE → SERVE

pub mod answer;
pub mod api;
pub mod cache;
pub mod config;
pub mod context;
pub mod corpus;
pub mod error;
pub mod fetcher;
pub mod gemini;
pub mod models;
pub mod retry;

pub use error::Result;

// Re-export common types
pub use answer::AnswerService;
pub use corpus::Corpus;
pub use models::*;
