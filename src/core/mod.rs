//! Core client module

pub mod chunker;
pub mod client;
pub mod config;
pub mod disposition;
pub mod errors;
pub mod models;
pub mod storage;
