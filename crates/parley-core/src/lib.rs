//! # parley-core
//!
//! Shared wire-protocol types for the Q&A relay:
//!
//! - [`frames`] — the JSON frame envelope exchanged over the WebSocket
//! - [`replies`] — the fixed user-facing reply strings

#![deny(unsafe_code)]

pub mod frames;
pub mod replies;

pub use frames::{ClientFrame, ServerFrame};
