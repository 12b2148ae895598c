//! Session-scoped job-posting context: each session identifier owns exactly
//! one freshly built in-memory vector index over the posting's text chunks.

pub mod chunker;
pub mod handlers;
pub mod store;

pub use store::SessionRegistry;
