//! utapack End-to-End Test Infrastructure
//!
//! This crate provides integration tests for complete voicebank builds:
//!
//! - Build: voicebank folder -> packed output folder
//! - Validation: problems found without writing output
//! - **Determinism**: byte-identical output for a fixed seed
//! - Properties of the OTO codec, batch planner and coordinate resolution
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p utapack-tests
//! ```

pub mod determinism;
pub mod fixtures;

// Re-export commonly used items
pub use determinism::{hash_tree, TreeHash};
pub use fixtures::VoicebankFixture;
