//! Contact collection manager.
//!
//! # Responsibility
//! - Own the in-memory contact collection and its CRUD/search/stats APIs.
//! - Persist the full collection through a `ContactStore` after every
//!   successful mutation.
//!
//! # Invariants
//! - No two contacts share a normalized email, including after updates and
//!   under persistence failure.
//! - Duplicate / not-found outcomes are `bool` or `Option`, never errors.
//! - Save failures never roll back the in-memory mutation; they are logged
//!   and kept in `last_save_error()`.
//! - Startup never fails: missing or corrupt stored data yields an empty
//!   collection.

use crate::model::contact::{email_key, Contact, ContactUpdate, ContactValidationError};
use crate::store::{ContactStore, StoreError, StoreResult};
use log::{debug, error, info, warn};
use std::collections::{BTreeSet, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Aggregate counters over the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactStats {
    pub total_contacts: usize,
    /// Distinct non-empty company values.
    pub unique_companies: usize,
    /// Sorted distinct non-empty company values.
    pub companies: Vec<String>,
}

/// Rejected update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    /// A touched name/email field failed validation.
    Invalid(ContactValidationError),
    /// The new email already belongs to another contact.
    EmailTaken(String),
}

impl Display for UpdateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::EmailTaken(email) => write!(f, "email already in use: {email}"),
        }
    }
}

impl Error for UpdateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::EmailTaken(_) => None,
        }
    }
}

impl From<ContactValidationError> for UpdateError {
    fn from(value: ContactValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// Contact collection keyed by normalized email.
pub struct ContactManager<S: ContactStore> {
    store: S,
    contacts: Vec<Contact>,
    last_save_error: Option<StoreError>,
}

impl<S: ContactStore> ContactManager<S> {
    /// Loads the collection from `store`.
    ///
    /// Falls back to an empty collection when the store has no data (info)
    /// or cannot produce a valid collection (error).
    pub fn open(store: S) -> Self {
        let contacts = match load_contacts(&store) {
            Ok(contacts) => {
                info!(
                    "event=contacts_load module=service status=ok backend={} count={}",
                    store.backend(),
                    contacts.len()
                );
                contacts
            }
            Err(err) if err.is_no_data() => {
                info!(
                    "event=contacts_load module=service status=empty backend={}",
                    store.backend()
                );
                Vec::new()
            }
            Err(err) => {
                error!(
                    "event=contacts_load module=service status=error backend={} error_code=load_failed error={}",
                    store.backend(),
                    err
                );
                Vec::new()
            }
        };

        Self {
            store,
            contacts,
            last_save_error: None,
        }
    }

    /// Adds a contact unless its email is already present.
    ///
    /// Returns `false` without mutating or saving on duplicates.
    pub fn add(&mut self, contact: Contact) -> bool {
        if self.position(contact.email()).is_some() {
            debug!(
                "event=contact_add module=service status=duplicate domain={}",
                email_domain(contact.email())
            );
            return false;
        }

        let domain = email_domain(contact.email()).to_string();
        self.contacts.push(contact);
        self.persist("contact_add");
        info!("event=contact_add module=service status=ok domain={domain}");
        true
    }

    /// Finds a contact by email (trimmed, case-insensitive).
    pub fn find_by_email(&self, email: &str) -> Option<&Contact> {
        self.position(&email_key(email))
            .map(|index| &self.contacts[index])
    }

    /// Case-insensitive substring search over names, email and company.
    ///
    /// Results keep collection order. An empty query matches every contact.
    pub fn search(&self, query: &str) -> Vec<&Contact> {
        let needle = query.trim().to_lowercase();
        self.contacts
            .iter()
            .filter(|contact| {
                [
                    contact.first_name(),
                    contact.last_name(),
                    contact.email(),
                    contact.company(),
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Applies `update` to the contact stored under `email`.
    ///
    /// Returns `Ok(false)` when no contact matches.
    ///
    /// # Errors
    /// - `UpdateError::Invalid` when a touched field fails validation.
    /// - `UpdateError::EmailTaken` when the new email belongs to another
    ///   contact.
    ///
    /// On error nothing is mutated or saved.
    pub fn update_by_email(
        &mut self,
        email: &str,
        update: &ContactUpdate,
    ) -> Result<bool, UpdateError> {
        let Some(index) = self.position(&email_key(email)) else {
            return Ok(false);
        };

        let mut candidate = self.contacts[index].clone();
        candidate.apply_update(update)?;

        let taken = self
            .contacts
            .iter()
            .enumerate()
            .any(|(other, contact)| other != index && contact.email() == candidate.email());
        if taken {
            warn!(
                "event=contact_update module=service status=rejected error_code=email_taken domain={}",
                email_domain(candidate.email())
            );
            return Err(UpdateError::EmailTaken(candidate.email().to_string()));
        }

        self.contacts[index] = candidate;
        self.persist("contact_update");
        Ok(true)
    }

    /// Removes the contact stored under `email`; `false` when absent.
    pub fn delete_by_email(&mut self, email: &str) -> bool {
        let Some(index) = self.position(&email_key(email)) else {
            return false;
        };

        self.contacts.remove(index);
        self.persist("contact_delete");
        true
    }

    /// Returns contacts sorted by `(last_name, first_name)`.
    ///
    /// Comparison is case-sensitive on stored values. Storage order is not
    /// changed.
    pub fn get_all(&self) -> Vec<&Contact> {
        let mut sorted: Vec<&Contact> = self.contacts.iter().collect();
        sorted.sort_by(|a, b| {
            (a.last_name(), a.first_name()).cmp(&(b.last_name(), b.first_name()))
        });
        sorted
    }

    pub fn stats(&self) -> ContactStats {
        let companies: BTreeSet<&str> = self
            .contacts
            .iter()
            .map(Contact::company)
            .filter(|company| !company.is_empty())
            .collect();

        ContactStats {
            total_contacts: self.contacts.len(),
            unique_companies: companies.len(),
            companies: companies.into_iter().map(str::to_string).collect(),
        }
    }

    /// Contacts in collection (insertion) order.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Gives mutable access to the store, e.g. to toggle failure modes.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Error from the most recent save, cleared by the next successful save.
    pub fn last_save_error(&self) -> Option<&StoreError> {
        self.last_save_error.as_ref()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.contacts
            .iter()
            .position(|contact| contact.email() == key)
    }

    fn persist(&mut self, event: &str) {
        let records: Vec<_> = self.contacts.iter().map(Contact::to_record).collect();
        match self.store.save(&records) {
            Ok(()) => {
                self.last_save_error = None;
            }
            Err(err) => {
                error!(
                    "event={event} module=service status=error backend={} error_code=save_failed error={err}",
                    self.store.backend()
                );
                self.last_save_error = Some(err);
            }
        }
    }
}

fn load_contacts<S: ContactStore>(store: &S) -> StoreResult<Vec<Contact>> {
    let records = store.load()?;
    let mut seen = HashSet::with_capacity(records.len());
    let mut contacts = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        let contact = Contact::try_from(record)
            .map_err(|err| StoreError::Corrupt(format!("record {index}: {err}")))?;
        if !seen.insert(contact.email().to_string()) {
            return Err(StoreError::Corrupt(format!(
                "record {index}: duplicate email"
            )));
        }
        contacts.push(contact);
    }

    Ok(contacts)
}

/// Part of the address after `@`; keeps local parts out of logs.
fn email_domain(email: &str) -> &str {
    email.rsplit_once('@').map_or("", |(_, domain)| domain)
}

#[cfg(test)]
mod tests {
    use super::email_domain;

    #[test]
    fn email_domain_strips_local_part() {
        assert_eq!(email_domain("jane@example.com"), "example.com");
        assert_eq!(email_domain("no-at-sign"), "");
    }
}
