//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical contact record and its field-level validation.
//!
//! # Invariants
//! - A `Contact` value is always valid; there is no unchecked constructor.
//! - The normalized email is the identity of a contact.

pub mod contact;
