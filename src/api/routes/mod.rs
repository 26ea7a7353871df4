//! API Routes
//!
//! Route handlers organized by functionality.

pub mod data;
pub mod health;
pub mod statistics;
