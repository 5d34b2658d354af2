//! Routes
//!
//! Route handlers organized by functionality.

pub mod charts;
pub mod health;
pub mod pages;
pub mod upload;
