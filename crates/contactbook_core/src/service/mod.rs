//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validated contacts and the persistence collaborator into
//!   use-case level APIs.
//! - Keep front-ends decoupled from storage details.

pub mod contact_manager;
