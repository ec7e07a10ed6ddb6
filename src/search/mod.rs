//! Search orchestration: query variants, provider fan-out, extraction, and ranking.

pub(crate) mod engine;
pub(crate) mod extract;
pub(crate) mod provider;
pub(crate) mod rank;
pub(crate) mod types;
mod variants;

pub use engine::ProfileSearch;
pub use types::SearchResult;
