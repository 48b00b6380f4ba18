//! Contact domain model.
//!
//! # Responsibility
//! - Define the validated contact record owned by the collection manager.
//! - Provide the partial-update request type and its atomic apply step.
//! - Define the storage-neutral serialized shape (`ContactRecord`).
//!
//! # Invariants
//! - `first_name` / `last_name` are trimmed, non-empty and contain only
//!   ASCII letters, whitespace, hyphens and apostrophes.
//! - `email` is trimmed, lowercase and matches the address pattern.
//! - `created_at <= updated_at`.
//!
//! # See also
//! - `crate::service::contact_manager` for collection-wide invariants.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z\s\-']+$").expect("valid name regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

const NAIVE_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// UTC instant used for record creation/modification times.
pub type Timestamp = DateTime<Utc>;

/// Which name attribute a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    First,
    Last,
}

impl NameField {
    /// Serialized attribute name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "first_name",
            Self::Last => "last_name",
        }
    }
}

impl Display for NameField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation error raised by construction, update and decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    /// Name is empty or whitespace-only.
    EmptyName(NameField),
    /// Name contains characters outside the allowed set.
    InvalidName { field: NameField, value: String },
    /// Email is empty or whitespace-only.
    EmptyEmail,
    /// Email does not match `local@domain.tld`.
    InvalidEmail(String),
    /// Timestamp is not ISO-8601. Only `parse_timestamp` reports this;
    /// record decoding falls back to decode time instead.
    InvalidTimestamp { field: &'static str, value: String },
}

impl ContactValidationError {
    /// Returns the attribute name that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName(field) => field.as_str(),
            Self::InvalidName { field, .. } => field.as_str(),
            Self::EmptyEmail | Self::InvalidEmail(_) => "email",
            Self::InvalidTimestamp { field, .. } => *field,
        }
    }
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName(field) => write!(f, "{field} cannot be empty"),
            Self::InvalidName { field, value } => {
                write!(f, "{field} contains invalid characters: `{value}`")
            }
            Self::EmptyEmail => write!(f, "email cannot be empty"),
            Self::InvalidEmail(value) => write!(f, "invalid email format: `{value}`"),
            Self::InvalidTimestamp { field, value } => {
                write!(f, "{field} is not an ISO-8601 timestamp: `{value}`")
            }
        }
    }
}

impl Error for ContactValidationError {}

/// Validated contact record.
///
/// Fields are private so every mutation goes through [`Contact::apply_update`]
/// and re-validation. Serde goes through [`ContactRecord`], so decoding
/// re-applies the same rules as construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ContactRecord", into = "ContactRecord")]
pub struct Contact {
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    company: String,
    notes: String,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Contact {
    /// Creates a contact with empty phone/company/notes.
    ///
    /// # Errors
    /// - Returns `ContactValidationError` naming the first offending field.
    pub fn new(
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<Self, ContactValidationError> {
        let first_name = validate_name(NameField::First, first_name)?;
        let last_name = validate_name(NameField::Last, last_name)?;
        let email = normalize_email(email)?;
        let now = Utc::now();

        Ok(Self {
            first_name,
            last_name,
            email,
            phone: String::new(),
            company: String::new(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Sets the phone number during construction.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    /// Sets the company during construction.
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    /// Sets free-form notes during construction.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Normalized (trimmed, lowercase) email; the collection key.
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Returns `"First Last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Applies a partial update.
    ///
    /// # Invariants
    /// - Touched name/email fields are validated before any field is written;
    ///   on error the contact is left untouched.
    /// - `updated_at` is refreshed even when the update touches no field.
    pub fn apply_update(&mut self, update: &ContactUpdate) -> Result<(), ContactValidationError> {
        let first_name = update
            .first_name
            .as_deref()
            .map(|value| validate_name(NameField::First, value))
            .transpose()?;
        let last_name = update
            .last_name
            .as_deref()
            .map(|value| validate_name(NameField::Last, value))
            .transpose()?;
        let email = update.email.as_deref().map(normalize_email).transpose()?;

        if let Some(value) = first_name {
            self.first_name = value;
        }
        if let Some(value) = last_name {
            self.last_name = value;
        }
        if let Some(value) = email {
            self.email = value;
        }
        if let Some(value) = &update.phone {
            self.phone.clone_from(value);
        }
        if let Some(value) = &update.company {
            self.company.clone_from(value);
        }
        if let Some(value) = &update.notes {
            self.notes.clone_from(value);
        }

        self.updated_at = Utc::now().max(self.created_at);
        Ok(())
    }

    /// Converts into the storage-neutral record shape.
    pub fn to_record(&self) -> ContactRecord {
        ContactRecord::from(self.clone())
    }
}

impl Display for Contact {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} <{}>", self.first_name, self.last_name, self.email)
    }
}

/// Partial update request.
///
/// `None` leaves a field unchanged. For phone/company/notes, `Some("")`
/// clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
}

impl ContactUpdate {
    pub fn with_first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn with_last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn with_email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    pub fn with_phone(mut self, value: impl Into<String>) -> Self {
        self.phone = Some(value.into());
        self
    }

    pub fn with_company(mut self, value: impl Into<String>) -> Self {
        self.company = Some(value.into());
        self
    }

    pub fn with_notes(mut self, value: impl Into<String>) -> Self {
        self.notes = Some(value.into());
        self
    }

    /// Returns whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.company.is_none()
            && self.notes.is_none()
    }
}

/// Serialized contact shape shared by all stores.
///
/// Optional text fields default to `""` when absent or `null`; missing,
/// blank or unparseable timestamps default to decode time. Unknown fields
/// are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub phone: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub company: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub notes: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl From<Contact> for ContactRecord {
    fn from(value: Contact) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            phone: value.phone,
            company: value.company,
            notes: value.notes,
            created_at: Some(format_timestamp(value.created_at)),
            updated_at: Some(format_timestamp(value.updated_at)),
        }
    }
}

impl TryFrom<ContactRecord> for Contact {
    type Error = ContactValidationError;

    fn try_from(value: ContactRecord) -> Result<Self, Self::Error> {
        let first_name = validate_name(NameField::First, &value.first_name)?;
        let last_name = validate_name(NameField::Last, &value.last_name)?;
        let email = normalize_email(&value.email)?;

        let now = Utc::now();
        let created_at = decode_timestamp("created_at", value.created_at.as_deref(), now);
        let updated_at = decode_timestamp("updated_at", value.updated_at.as_deref(), now);

        Ok(Self {
            first_name,
            last_name,
            email,
            phone: value.phone,
            company: value.company,
            notes: value.notes,
            created_at,
            updated_at: updated_at.max(created_at),
        })
    }
}

/// Validates and trims one name field.
pub fn validate_name(field: NameField, raw: &str) -> Result<String, ContactValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ContactValidationError::EmptyName(field));
    }
    if !NAME_RE.is_match(trimmed) {
        return Err(ContactValidationError::InvalidName {
            field,
            value: raw.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Validates an email address and returns its normalized form.
pub fn normalize_email(raw: &str) -> Result<String, ContactValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ContactValidationError::EmptyEmail);
    }
    if !EMAIL_RE.is_match(trimmed) {
        return Err(ContactValidationError::InvalidEmail(raw.to_string()));
    }
    Ok(trimmed.to_lowercase())
}

/// Lookup key for an arbitrary, unvalidated email string.
pub fn email_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Formats a timestamp as RFC 3339 in UTC, keeping every significant digit.
pub fn format_timestamp(value: Timestamp) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses RFC 3339, falling back to offset-less ISO-8601 read as UTC.
pub fn parse_timestamp(
    field: &'static str,
    raw: &str,
) -> Result<Timestamp, ContactValidationError> {
    let trimmed = raw.trim();
    if let Ok(value) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(value.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| ContactValidationError::InvalidTimestamp {
            field,
            value: raw.to_string(),
        })
}

/// Lenient decode: blank or unparseable values fall back to `fallback`.
fn decode_timestamp(field: &'static str, raw: Option<&str>, fallback: Timestamp) -> Timestamp {
    match raw.map(str::trim) {
        None | Some("") => fallback,
        Some(raw) => parse_timestamp(field, raw).unwrap_or_else(|err| {
            warn!("event=contact_decode module=model status=defaulted field={field} error={err}");
            fallback
        }),
    }
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::{email_key, parse_timestamp, validate_name, NameField};

    #[test]
    fn validate_name_trims_and_accepts_punctuation() {
        assert_eq!(
            validate_name(NameField::Last, "  O'Brien-Smith ").unwrap(),
            "O'Brien-Smith"
        );
        assert_eq!(validate_name(NameField::First, "Mary Ann").unwrap(), "Mary Ann");
    }

    #[test]
    fn email_key_trims_and_lowercases_without_validation() {
        assert_eq!(email_key("  Foo@Bar "), "foo@bar");
    }

    #[test]
    fn parse_timestamp_accepts_naive_iso_as_utc() {
        let parsed = parse_timestamp("created_at", "2024-01-15T10:30:00.123456").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-01-15T10:30:00.123456+00:00");
    }

    #[test]
    fn parse_timestamp_accepts_space_separated_naive_form() {
        let parsed = parse_timestamp("created_at", "2024-01-15 10:30:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-01-15T10:30:00+00:00");
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        let err = parse_timestamp("updated_at", "yesterday").unwrap_err();
        assert_eq!(err.field(), "updated_at");
    }
}
