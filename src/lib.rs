//! Stimband workspace-level test utilities.
//!
//! This crate exists solely to support the workspace-level integration tests
//! in `tests/`.
//!
//! The actual stimband functionality is in the workspace member crates:
//! - `stimband-types`: Shared data contracts and schema constants
//! - `stimband-domain`: Pure banding and quadrant-grouping logic
//! - `stimband-ingest`: Stat-dictionary parsing and mean derivation
//! - `stimband-render`: Plain-text report rendering
//! - `stimband-app`: Application use cases
//! - `stimband` (stimband-cli): CLI interface
