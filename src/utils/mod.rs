//! Helpers not tied to any peripheral

pub mod poll;
