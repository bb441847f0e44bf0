//! Core deterministic primitives.
//!
//! Everything in this module is pure and platform-independent. It forms
//! the foundation the replay-based anti-cheat design depends on.

pub mod geom;
pub mod hash;
pub mod rng;

// Re-export core types
pub use geom::{Aabb, Vec2};
pub use hash::{compute_state_hash, StateHash};
pub use rng::{derive_session_seed, Xorshift32};
