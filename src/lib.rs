//! Dotfiles merge-and-link engine.
//!
//! Overlays a shared configuration tree and a profile-specific tree into a
//! target directory using symlinks, records what was linked, and can undo
//! the installation later from that record.
//!
//! The public API is organised into layers:
//!
//! - **[`merge`]**: list both source trees and reconcile them into link candidates
//! - **[`link`]**: create the symlinks, never overwriting existing entries
//! - **[`mapping`]**: persist what was linked
//! - **[`uninstall`]**: remove an installation recorded in a mapping
//! - **[`commands`]**: `install` and `clean` orchestration used by the binary
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fsops;
pub mod link;
pub mod logging;
pub mod mapping;
pub mod merge;
pub mod uninstall;
