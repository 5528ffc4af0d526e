//! API Routes
//!
//! Route handlers organized by functionality.

pub mod auth;
pub mod catalog;
pub mod chat;
pub mod community;
pub mod dashboard;
pub mod health;
pub mod navigation;
pub mod nutrition;
pub mod progress;
pub mod workouts;
