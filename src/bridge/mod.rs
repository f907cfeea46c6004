//! Host-facing side of the filter.
//!
//! ## Module Structure
//!
//! - `sources`: which announcer speaks which grammar
//! - `router`: decision to host action translation
//! - `orchestrator`: per-line entry point (`Bridge` struct)
//! - `feed`: stdin/stdout adapter driving a `Bridge`

pub mod feed;
pub mod orchestrator;
pub mod router;
pub mod sources;

pub use feed::run_feed;
pub use orchestrator::Bridge;
pub use router::BufferResolver;
