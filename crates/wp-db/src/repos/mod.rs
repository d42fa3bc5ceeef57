//! Repository modules for all Waypoint entities.
//!
//! Each module adds methods to `WpService` via `impl WpService` blocks.

pub mod assessments;
pub mod audit;
pub mod chat;
pub mod questions;
pub mod users;
