//! Table analysis engine.
//!
//! Stateless functions over a [`crate::Table`]. Each call rescans the rows
//! it needs and allocates its own result; nothing is cached between calls,
//! and no function mutates its input.

pub mod correlation;
pub mod dates;
pub mod distribution;
pub mod numeric;
pub mod outliers;
pub mod profile;
pub mod quality;
