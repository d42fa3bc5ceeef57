//! # wp-core
//!
//! Core types, ID prefixes, and error types for Waypoint.
//!
//! This crate provides the foundational types shared across all Waypoint crates:
//! - Entity structs for all domain objects (questions, assessments, chat sessions, etc.)
//! - Status enums with state machine transitions
//! - Fixed-shape score maps for the four scoring categories
//! - ID prefix constants
//! - Cross-cutting error types
//! - CLI response types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod responses;
pub mod scores;
