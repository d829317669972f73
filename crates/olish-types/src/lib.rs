//! Foundation types for oli-shell.
//!
//! This crate holds the types shared by every oli-shell crate: the error
//! taxonomy and the session configuration used to seed the virtual
//! filesystem and environment table.

pub mod config;
pub mod error;
