//! Declarative header-alias table for CSV import.
//!
//! Headers are compared after normalization (trim, lowercase, drop spaces,
//! underscores and hyphens), so `First Name`, `firstname`, `first_name` and
//! `FIRST-NAME` all resolve to [`CsvField::FirstName`]. Only spellings of the
//! export labels are accepted; any other column is ignored.

use csv::StringRecord;
use once_cell::sync::Lazy;
use regex::Regex;

static HEADER_NOISE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s_\-]+").expect("valid header noise regex"));

/// Canonical CSV columns, in export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CsvField {
    Prefix,
    FirstName,
    LastName,
    Email,
    Phone,
    JobTitle,
    Company,
    Group,
}

/// Normalized spellings per field.
const FIELD_ALIASES: &[(CsvField, &[&str])] = &[
    (CsvField::Prefix, &["prefix"]),
    (CsvField::FirstName, &["firstname"]),
    (CsvField::LastName, &["lastname"]),
    (CsvField::Email, &["email"]),
    (CsvField::Phone, &["phone"]),
    (CsvField::JobTitle, &["jobtitle"]),
    (CsvField::Company, &["company"]),
    (CsvField::Group, &["group"]),
];

impl CsvField {
    pub const ALL: [CsvField; 8] = [
        CsvField::Prefix,
        CsvField::FirstName,
        CsvField::LastName,
        CsvField::Email,
        CsvField::Phone,
        CsvField::JobTitle,
        CsvField::Company,
        CsvField::Group,
    ];

    /// Human header label used on export.
    pub fn label(self) -> &'static str {
        match self {
            Self::Prefix => "Prefix",
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::JobTitle => "Job Title",
            Self::Company => "Company",
            Self::Group => "Group",
        }
    }

    /// Resolves one raw header cell, or `None` for unrecognized columns.
    pub fn from_header(raw: &str) -> Option<Self> {
        let normalized = normalize_header(raw);
        FIELD_ALIASES
            .iter()
            .find(|(_, aliases)| aliases.contains(&normalized.as_str()))
            .map(|(field, _)| *field)
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_start_matches('\u{feff}');
    HEADER_NOISE_RE
        .replace_all(&trimmed.to_lowercase(), "")
        .into_owned()
}

/// Column-to-field mapping resolved once per parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMap {
    columns: Vec<Option<CsvField>>,
}

impl HeaderMap {
    pub fn resolve(headers: &StringRecord) -> Self {
        Self {
            columns: headers.iter().map(CsvField::from_header).collect(),
        }
    }

    pub fn recognizes(&self, field: CsvField) -> bool {
        self.columns.contains(&Some(field))
    }

    /// Verbatim value of `field` in `record`.
    ///
    /// When several columns map to the same field, the first non-empty one
    /// wins. Missing cells read as empty.
    pub fn value<'r>(&self, record: &'r StringRecord, field: CsvField) -> &'r str {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, column)| **column == Some(field))
            .filter_map(|(index, _)| record.get(index))
            .find(|value| !value.is_empty())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::{CsvField, HeaderMap};
    use csv::StringRecord;

    #[test]
    fn label_and_compact_variants_resolve_for_every_field() {
        for field in CsvField::ALL {
            assert_eq!(CsvField::from_header(field.label()), Some(field));
            let compact = field.label().replace(' ', "").to_lowercase();
            assert_eq!(CsvField::from_header(&compact), Some(field));
        }
    }

    #[test]
    fn separators_and_case_are_ignored() {
        assert_eq!(CsvField::from_header("first_name"), Some(CsvField::FirstName));
        assert_eq!(CsvField::from_header(" LAST-NAME "), Some(CsvField::LastName));
        assert_eq!(CsvField::from_header("\u{feff}Prefix"), Some(CsvField::Prefix));
        assert_eq!(CsvField::from_header("Notes"), None);
    }

    #[test]
    fn loosely_related_columns_are_not_bound() {
        for header in ["Category", "Role", "Position", "Mail", "First", "Last", "Mobile"] {
            assert_eq!(CsvField::from_header(header), None, "{header}");
        }
    }

    #[test]
    fn duplicate_columns_take_first_non_empty_value() {
        let headers = StringRecord::from(vec!["First Name", "firstname", "Notes"]);
        let map = HeaderMap::resolve(&headers);
        assert!(map.recognizes(CsvField::FirstName));
        assert!(!map.recognizes(CsvField::Email));

        let record = StringRecord::from(vec!["", " Grace ", "ignored"]);
        assert_eq!(map.value(&record, CsvField::FirstName), " Grace ");
        assert_eq!(map.value(&record, CsvField::Email), "");
    }

    #[test]
    fn short_rows_read_missing_cells_as_empty() {
        let headers = StringRecord::from(vec!["First Name", "Last Name", "Group"]);
        let map = HeaderMap::resolve(&headers);
        let record = StringRecord::from(vec!["Ada"]);
        assert_eq!(map.value(&record, CsvField::FirstName), "Ada");
        assert_eq!(map.value(&record, CsvField::Group), "");
    }
}
