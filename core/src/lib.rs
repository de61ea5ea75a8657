//! Core of the stdio tap: byte-exact relays between a client and a child
//! process, a framing-aware frame log, and child lifecycle handling.

pub mod config;
pub mod error;
pub mod frame;
pub mod runner;
pub mod state;
pub mod util;
