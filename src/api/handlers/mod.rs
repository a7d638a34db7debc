//! HTTP request handlers for API endpoints.
//!
//! This module contains all request handlers organized by resource type.

pub mod firebase;
pub mod health;
pub mod messages;
pub mod ui;
