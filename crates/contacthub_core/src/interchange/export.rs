//! CSV export.

use crate::interchange::headers::CsvField;
use crate::model::contact::Contact;
use crate::model::group::Group;
use crate::model::id::GroupId;
use chrono::{DateTime, Utc};
use csv::Writer;
use log::info;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Fixed export header, in column order.
pub const EXPORT_HEADER: [&str; 8] = [
    "Prefix",
    "First Name",
    "Last Name",
    "Email",
    "Phone",
    "Job Title",
    "Company",
    "Group",
];

#[derive(Debug)]
pub enum ExportError {
    Csv(csv::Error),
    Io(std::io::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv(err) => write!(f, "failed to write CSV: {err}"),
            Self::Io(err) => write!(f, "failed to write export file: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Renders `contacts` as CSV text, one row per contact in collection order.
///
/// The Group column holds the referenced group's current name, or is empty
/// when the contact is unassigned or the reference dangles.
pub fn export_csv(contacts: &[Contact], groups: &[Group]) -> Result<String, ExportError> {
    let names: HashMap<&GroupId, &str> = groups
        .iter()
        .map(|group| (&group.id, group.name.as_str()))
        .collect();

    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;
    for contact in contacts {
        let group_name = contact
            .group_id
            .as_ref()
            .and_then(|id| names.get(id).copied())
            .unwrap_or_default();
        writer.write_record(CsvField::ALL.map(|field| cell(contact, group_name, field)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))?;
    // Every cell came from a `&str`, so the buffer is valid UTF-8.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn cell<'c>(contact: &'c Contact, group_name: &'c str, field: CsvField) -> &'c str {
    match field {
        CsvField::Prefix => contact.prefix.as_deref().unwrap_or_default(),
        CsvField::FirstName => &contact.first_name,
        CsvField::LastName => &contact.last_name,
        CsvField::Email => &contact.email,
        CsvField::Phone => &contact.phone,
        CsvField::JobTitle => contact.job_title.as_deref().unwrap_or_default(),
        CsvField::Company => contact.company.as_deref().unwrap_or_default(),
        CsvField::Group => group_name,
    }
}

/// `connect_hub_contacts_<YYYY-MM-DD>.csv` for the UTC date of `now`.
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("connect_hub_contacts_{}.csv", now.format("%Y-%m-%d"))
}

/// Writes the export into `dir` under [`export_filename`] and returns the
/// file path. An existing file of the same name is replaced.
pub fn export_to_dir(
    dir: &Path,
    contacts: &[Contact],
    groups: &[Group],
    now: DateTime<Utc>,
) -> Result<PathBuf, ExportError> {
    let text = export_csv(contacts, groups)?;
    let path = dir.join(export_filename(now));
    std::fs::write(&path, text)?;
    info!(
        "event=csv_export module=interchange status=ok contacts={}",
        contacts.len()
    );
    Ok(path)
}
