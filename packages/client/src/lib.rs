//! Hiroba interactive chat client.
//!
//! Joins the hub over WebSocket, prints every broadcast with its local time,
//! and sends each line typed at the prompt as a chat message.

pub mod command;
pub mod domain;
pub mod error;
pub mod formatter;
pub mod runner;
mod session;
mod ui;

pub use runner::run_client;
