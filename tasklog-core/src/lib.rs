//! Tasklog Core
//!
//! Core types and abstractions for remote task-log access.
//!
//! This crate contains:
//! - Domain types: the command envelope and its wire-visible command types
//! - DTOs: JSON request/response bodies exchanged between nodes
//! - Codec: binary framing of commands over a byte stream

pub mod codec;
pub mod domain;
pub mod dto;
pub mod error;

pub use error::{ProtocolError, Result};
