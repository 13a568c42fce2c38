// Document metadata: deterministic identities and chunk statistics for the
// source files behind each document.

pub mod identity;
pub mod resolver;
