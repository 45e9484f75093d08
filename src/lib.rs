// src/lib.rs

pub mod config;
pub mod error;
pub mod llm;
pub mod persona;
pub mod relay;
pub mod server;

pub use error::{RelayError, Result};
