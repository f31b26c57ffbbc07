//! Core domain types
//!
//! This module contains the envelope exchanged between nodes. It is shared
//! between the worker (which answers commands) and clients (which issue them).

pub mod command;
