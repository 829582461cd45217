// src/services/mod.rs

pub mod auth;
pub mod progress;
