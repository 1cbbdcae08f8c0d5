// src/resolver/mod.rs
// =============================================================================
// This module contains the name resolution logic.
//
// Submodules:
// - engine: The decision tree that classifies a name as an individual
//   or an organization and gathers its emails
//
// This file (mod.rs) is the module root - it re-exports the public API
// that other parts of our application can use.
// =============================================================================

mod engine;

// Re-export public items from submodules
pub use engine::{resolve_name, resolve_names, EntityKind, ResolvedEntity, ResolvedUser};
