//! Shared value types used across the runner crates.

mod types;

pub use types::{Aabb, PlayerId};
