//! Shared types used across features

pub mod limits;
pub mod models;
