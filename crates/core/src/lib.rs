//! Volta Core - Shared types and content logic.
//!
//! This crate provides the types used by the Volta Generators site:
//! - `site` - The public marketing site and its admin dashboard
//! - `integration-tests` - End-to-end tests against a mock CMS
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - IDs, emails, roles, the API envelope, sections, settings and users
//! - [`content`] - Shape detection and editing for setting values

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod content;
pub mod types;

pub use content::{ContentShape, EditorKind, SettingContent};
pub use types::*;
