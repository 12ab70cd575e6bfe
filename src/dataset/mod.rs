//! Dataset Module
//!
//! Produces the fixed student dataset that every backend is seeded with.
//!
//! ## Determinism
//! Names and departments are picked by a ChaCha20 generator seeded from a `u64`,
//! one draw for the name then one for the department, in record order. For a
//! given `(count, base, seed)` the output is identical across runs and machines.
//!
//! ## Submodules
//! - **`generator`**: The `generate` entry point and the fixed name/department pools.
//! - **`types`**: The `StudentRecord` entity shared by all stores and the HTTP layer.

pub mod generator;
pub mod types;

pub use generator::{DEPARTMENTS, NAMES, generate};
pub use types::StudentRecord;
