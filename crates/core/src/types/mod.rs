//! Core types for the Volta site.
//!
//! This module provides type-safe wrappers for the CMS domain concepts.

pub mod email;
pub mod envelope;
pub mod id;
pub mod role;
pub mod section;
pub mod user;

pub use email::{Email, EmailError};
pub use envelope::{ApiEnvelope, ApiErrorBody};
pub use id::*;
pub use role::Role;
pub use section::{
    CreateSectionPayload, CreateSettingPayload, SectionRef, SiteSection, SiteSetting, find_section,
    UpdateSectionPayload, UpdateSettingPayload, UploadedFile,
};
pub use user::{
    CreateUserPayload, LoginPayload, LoginResponseData, RegisterPayload, UpdateUserPayload, User,
};
