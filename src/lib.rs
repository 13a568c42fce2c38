// reldist: relational-distance document vectors over SQLite
//
// This is the library root. Each module corresponds to a stage of the
// pipeline: frequency maps become weighted vectors, vectors and document
// metadata land in the store, and prompts are ranked against it.

pub mod config;
pub mod db;
pub mod error;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod ranking;
pub mod status;
pub mod vector;
