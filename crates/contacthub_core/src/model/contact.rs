//! Contact domain model and its editable draft.
//!
//! # Responsibility
//! - Define the persisted contact record.
//! - Validate manual-entry drafts before they reach the store.
//! - Provide small display projections (initials, headline).
//!
//! # Invariants
//! - `id`, `created_at` and `avatar_color` are assigned once and survive
//!   every update.
//! - Updates replace all editable fields at once; there are no partial
//!   patches.

use crate::model::id::{ContactId, GroupId};
use crate::model::palette::PaletteColor;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Persisted person record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// `None` means unassigned.
    #[serde(default)]
    pub group_id: Option<GroupId>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub avatar_color: PaletteColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// Editable field set of a contact, used for create and full replace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub prefix: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub group_id: Option<GroupId>,
    pub job_title: String,
    pub company: String,
}

/// Missing required field on manual entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactValidationError {
    MissingFirstName,
    MissingLastName,
    MissingEmail,
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let field = match self {
            Self::MissingFirstName => "first name",
            Self::MissingLastName => "last name",
            Self::MissingEmail => "email",
        };
        write!(f, "{field} is required")
    }
}

impl Error for ContactValidationError {}

impl ContactDraft {
    /// Checks required-field presence. Content is not otherwise validated.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        if self.first_name.trim().is_empty() {
            return Err(ContactValidationError::MissingFirstName);
        }
        if self.last_name.trim().is_empty() {
            return Err(ContactValidationError::MissingLastName);
        }
        if self.email.trim().is_empty() {
            return Err(ContactValidationError::MissingEmail);
        }
        Ok(())
    }
}

impl From<&Contact> for ContactDraft {
    fn from(contact: &Contact) -> Self {
        Self {
            prefix: contact.prefix.clone().unwrap_or_default(),
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            group_id: contact.group_id.clone(),
            job_title: contact.job_title.clone().unwrap_or_default(),
            company: contact.company.clone().unwrap_or_default(),
        }
    }
}

impl Contact {
    /// Builds a new record with a fresh id from `draft`.
    pub fn from_draft(draft: ContactDraft, created_at: i64, avatar_color: PaletteColor) -> Self {
        let mut contact = Self {
            id: ContactId::generate(),
            prefix: None,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            group_id: None,
            created_at,
            avatar_color,
            job_title: None,
            company: None,
        };
        contact.apply_draft(draft);
        contact
    }

    /// Replaces every editable field. Identity fields are untouched.
    pub fn apply_draft(&mut self, draft: ContactDraft) {
        self.prefix = Some(draft.prefix);
        self.first_name = draft.first_name;
        self.last_name = draft.last_name;
        self.email = draft.email;
        self.phone = draft.phone;
        self.group_id = draft.group_id;
        self.job_title = Some(draft.job_title);
        self.company = Some(draft.company);
    }

    /// Up to two uppercase initials, from first then last name.
    pub fn initials(&self) -> String {
        [&self.first_name, &self.last_name]
            .iter()
            .filter_map(|name| name.trim().chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// `prefix first last`, skipping empty parts.
    pub fn display_name(&self) -> String {
        [
            self.prefix.as_deref().unwrap_or_default(),
            self.first_name.as_str(),
            self.last_name.as_str(),
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// `Job at Company`, or whichever half is present.
    pub fn headline(&self) -> String {
        let job = self.job_title.as_deref().unwrap_or_default().trim();
        let company = self.company.as_deref().unwrap_or_default().trim();
        match (job.is_empty(), company.is_empty()) {
            (false, false) => format!("{job} at {company}"),
            (false, true) => job.to_string(),
            (true, false) => company.to_string(),
            (true, true) => String::new(),
        }
    }
}
