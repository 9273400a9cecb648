// ── Socratic Atoms ─────────────────────────────────────────────────────────
// Leaf-level building blocks: core types, the canonical error enum, and
// service constants. Nothing in here performs I/O.

pub mod constants;
pub mod error;
pub mod types;
