//! HTTP handlers for the Tournaments domain

pub mod enrollments;
pub mod matches;
pub mod players;
pub mod results;
pub mod teams;
pub mod tournaments;
