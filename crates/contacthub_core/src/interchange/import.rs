//! CSV import planning.
//!
//! # Responsibility
//! - Parse uploaded CSV (first row is the header) into new contacts.
//! - Resolve the Group column against existing groups and groups created
//!   earlier in the same batch, creating each missing name exactly once.
//!
//! # Invariants
//! - Rows with both names blank are skipped silently.
//! - Cell values are kept verbatim; only the blank-name check and the group
//!   match key are trimmed.
//! - New groups keep the file's casing; matching is case-insensitive.
//! - Every planned contact shares one `created_at` (the import moment).
//! - Colors are drawn only once the file is known to yield contacts.

use crate::interchange::headers::{CsvField, HeaderMap};
use crate::model::contact::Contact;
use crate::model::group::{group_name_key, Group};
use crate::model::id::{ContactId, GroupId};
use crate::model::palette::ColorPicker;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Import failure, reported to the user as a terminal message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// The file could not be read as CSV at all.
    Parse(String),
    /// The file parsed but no row carried a first or last name.
    NoValidContacts,
}

impl ImportError {
    /// Message shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Parse(_) => "Failed to parse CSV file.",
            Self::NoValidContacts => "No valid contacts found in CSV. Please check the file format.",
        }
    }
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(detail) => write!(f, "failed to parse CSV: {detail}"),
            Self::NoValidContacts => write!(f, "no valid contacts found in CSV"),
        }
    }
}

impl Error for ImportError {}

impl From<csv::Error> for ImportError {
    fn from(value: csv::Error) -> Self {
        Self::Parse(value.to_string())
    }
}

/// Records to append, groups first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPlan {
    pub groups: Vec<Group>,
    pub contacts: Vec<Contact>,
}

impl ImportPlan {
    pub fn summary(&self) -> ImportSummary {
        ImportSummary {
            contacts_imported: self.contacts.len(),
            groups_created: self.groups.len(),
        }
    }
}

/// Counts reported after a committed import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub contacts_imported: usize,
    pub groups_created: usize,
}

impl ImportSummary {
    /// Message shown to the user.
    pub fn user_message(&self) -> String {
        if self.groups_created > 0 {
            format!(
                "Successfully imported {} contacts and created {} new groups.",
                self.contacts_imported, self.groups_created
            )
        } else {
            format!("Successfully imported {} contacts.", self.contacts_imported)
        }
    }
}

/// Plans an import of `input` against `existing_groups`.
///
/// # Errors
/// - [`ImportError::Parse`] when the bytes are not valid UTF-8 CSV or a
///   quoted field is still open at end of input.
/// - [`ImportError::NoValidContacts`] when no row survives filtering,
///   including header-only and empty files.
pub fn plan_import(
    input: &[u8],
    existing_groups: &[Group],
    imported_at: i64,
    colors: &mut dyn ColorPicker,
) -> Result<ImportPlan, ImportError> {
    let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(input);

    let headers = HeaderMap::resolve(reader.headers()?);
    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    let mut last_record_start = 0;

    while reader.read_record(&mut record)? {
        if let Some(position) = record.position() {
            last_record_start = position.byte();
        }
        let first_name = headers.value(&record, CsvField::FirstName);
        let last_name = headers.value(&record, CsvField::LastName);
        if first_name.trim().is_empty() && last_name.trim().is_empty() {
            continue;
        }
        rows.push(record.clone());
    }

    let tail = usize::try_from(last_record_start)
        .ok()
        .and_then(|start| input.get(start..))
        .unwrap_or_default();
    if ends_inside_quotes(tail) {
        return Err(ImportError::Parse(
            "quoted field is not terminated before end of input".to_string(),
        ));
    }
    if rows.is_empty() {
        return Err(ImportError::NoValidContacts);
    }

    let mut resolver = GroupResolver::new(existing_groups);
    let mut contacts = Vec::with_capacity(rows.len());
    for row in &rows {
        let text = |field| headers.value(row, field).to_string();
        let group_id = resolver.resolve(headers.value(row, CsvField::Group), colors);
        contacts.push(Contact {
            id: ContactId::generate(),
            prefix: Some(text(CsvField::Prefix)),
            first_name: text(CsvField::FirstName),
            last_name: text(CsvField::LastName),
            email: text(CsvField::Email),
            phone: text(CsvField::Phone),
            group_id,
            created_at: imported_at,
            avatar_color: colors.next_color(),
            job_title: Some(text(CsvField::JobTitle)),
            company: Some(text(CsvField::Company)),
        });
    }

    Ok(ImportPlan {
        groups: resolver.created,
        contacts,
    })
}

/// Whether `tail`, read from the start of the final record to end of input,
/// leaves a quoted field open.
///
/// The reader accepts an unterminated quote and swallows the rest of the
/// file into one cell, so this replays RFC-4180 field quoting over the tail.
fn ends_inside_quotes(tail: &[u8]) -> bool {
    let mut quoted = false;
    let mut field_start = true;
    let mut bytes = tail.iter().peekable();
    while let Some(&byte) = bytes.next() {
        if quoted {
            if byte == b'"' {
                if bytes.peek() == Some(&&b'"') {
                    bytes.next();
                } else {
                    quoted = false;
                }
            }
            continue;
        }
        match byte {
            b'"' if field_start => {
                quoted = true;
                field_start = false;
            }
            b',' | b'\r' | b'\n' => field_start = true,
            _ => field_start = false,
        }
    }
    quoted
}

/// Case-insensitive group lookup scoped to one import batch.
struct GroupResolver {
    existing: HashMap<String, GroupId>,
    batch: HashMap<String, GroupId>,
    created: Vec<Group>,
}

impl GroupResolver {
    fn new(existing_groups: &[Group]) -> Self {
        let mut existing = HashMap::new();
        for group in existing_groups {
            existing
                .entry(group_name_key(&group.name))
                .or_insert_with(|| group.id.clone());
        }
        Self {
            existing,
            batch: HashMap::new(),
            created: Vec::new(),
        }
    }

    fn resolve(&mut self, raw_name: &str, colors: &mut dyn ColorPicker) -> Option<GroupId> {
        let key = group_name_key(raw_name);
        if key.is_empty() {
            return None;
        }
        if let Some(id) = self.existing.get(&key).or_else(|| self.batch.get(&key)) {
            return Some(id.clone());
        }

        let group = Group::new(raw_name.trim(), colors.next_color());
        let id = group.id.clone();
        self.batch.insert(key, id.clone());
        self.created.push(group);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::{plan_import, ImportError, ImportSummary};
    use crate::model::group::Group;
    use crate::model::palette::{ColorPicker, PaletteColor, RoundRobinColorPicker, PALETTE};

    fn plan(input: &str, groups: &[Group]) -> Result<super::ImportPlan, ImportError> {
        plan_import(
            input.as_bytes(),
            groups,
            1_700_000_000_000,
            &mut RoundRobinColorPicker::default(),
        )
    }

    #[test]
    fn existing_and_batch_groups_are_reused_case_insensitively() {
        let work = Group::new("Work", PaletteColor::Blue);
        let input = "First Name,Last Name,Group\n\
                     Ann,Lee,Work\n\
                     Bo,Ray, work \n\
                     Cy,Dot,NewTeam\n\
                     Di,Fox,NEWTEAM\n";

        let plan = plan(input, &[work.clone()]).unwrap();

        assert_eq!(plan.groups.len(), 1);
        let new_team = &plan.groups[0];
        assert_eq!(new_team.name, "NewTeam");
        let refs = plan
            .contacts
            .iter()
            .map(|contact| contact.group_id.clone())
            .collect::<Vec<_>>();
        assert_eq!(
            refs,
            [
                Some(work.id.clone()),
                Some(work.id),
                Some(new_team.id.clone()),
                Some(new_team.id.clone())
            ]
        );
    }

    #[test]
    fn cell_values_keep_surrounding_whitespace() {
        let input = "First Name,Last Name,Phone,Company,Group\n Ann ,Lee,\" +1 555 \",Acme , Work \n";
        let work = Group::new("Work", PaletteColor::Blue);

        let plan = plan(input, &[work.clone()]).unwrap();

        let contact = &plan.contacts[0];
        assert_eq!(contact.first_name, " Ann ");
        assert_eq!(contact.phone, " +1 555 ");
        assert_eq!(contact.company.as_deref(), Some("Acme "));
        assert_eq!(contact.group_id, Some(work.id));
        assert!(plan.groups.is_empty());
    }

    #[test]
    fn whitespace_only_names_are_skipped() {
        let input = "First Name,Last Name,Email\n  ,\t,ghost@example.com\nBo,Ray,bo@example.com\n";
        let plan = plan(input, &[]).unwrap();
        assert_eq!(plan.contacts.len(), 1);
        assert_eq!(plan.contacts[0].first_name, "Bo");
    }

    #[test]
    fn unterminated_quote_is_a_parse_failure() {
        let input = "First Name,Last Name,Company\nAnn,Lee,\"Acme\nBo,Ray,X\n";
        let err = plan(input, &[]).unwrap_err();
        assert!(matches!(err, ImportError::Parse(_)));

        let header_only = plan("\"First Name,Last Name\n", &[]).unwrap_err();
        assert!(matches!(header_only, ImportError::Parse(_)));
    }

    #[test]
    fn closed_quotes_spanning_lines_are_accepted() {
        let input = "First Name,Last Name,Company\nAnn,Lee,\"Acme\nLabs \"\"East\"\"\"\n";
        let plan = plan(input, &[]).unwrap();
        assert_eq!(plan.contacts[0].company.as_deref(), Some("Acme\nLabs \"East\""));
    }

    #[test]
    fn rejected_imports_draw_no_colors() {
        let mut colors = RoundRobinColorPicker::default();
        let err = plan_import(b"First Name,Group\n,NewTeam\n", &[], 0, &mut colors).unwrap_err();
        assert_eq!(err, ImportError::NoValidContacts);
        assert_eq!(colors.next_color(), PALETTE[0]);
    }

    #[test]
    fn rows_without_any_name_are_skipped() {
        let input = "firstname,lastname,email\n,,ghost@example.com\nAnn,,ann@example.com\n";
        let plan = plan(input, &[]).unwrap();
        assert_eq!(plan.contacts.len(), 1);
        assert_eq!(plan.contacts[0].first_name, "Ann");
        assert_eq!(plan.contacts[0].last_name, "");
    }

    #[test]
    fn missing_optional_columns_become_empty_strings() {
        let plan = plan("First Name,Last Name\nAnn,Lee\n", &[]).unwrap();
        let contact = &plan.contacts[0];
        assert_eq!(contact.prefix.as_deref(), Some(""));
        assert_eq!(contact.job_title.as_deref(), Some(""));
        assert_eq!(contact.company.as_deref(), Some(""));
        assert_eq!(contact.email, "");
        assert_eq!(contact.group_id, None);
        assert_eq!(contact.created_at, 1_700_000_000_000);
    }

    #[test]
    fn header_only_and_empty_inputs_have_no_valid_contacts() {
        assert_eq!(
            plan("First Name,Last Name,Email\n", &[]).unwrap_err(),
            ImportError::NoValidContacts
        );
        assert_eq!(plan("", &[]).unwrap_err(), ImportError::NoValidContacts);
    }

    #[test]
    fn invalid_utf8_is_a_parse_failure() {
        let err = plan_import(
            b"First Name,Last Name\n\xff\xfe,Lee\n",
            &[],
            0,
            &mut RoundRobinColorPicker::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::Parse(_)));
        assert_eq!(err.user_message(), "Failed to parse CSV file.");
    }

    #[test]
    fn bom_and_quoted_fields_are_handled() {
        let input = "\u{feff}First Name,Last Name,Company\n\"Ann\",Lee,\"Acme, Inc\"\n";
        let plan = plan(input, &[]).unwrap();
        assert_eq!(plan.contacts[0].first_name, "Ann");
        assert_eq!(plan.contacts[0].company.as_deref(), Some("Acme, Inc"));
    }

    #[test]
    fn summary_message_mentions_groups_only_when_created() {
        let only_contacts = ImportSummary {
            contacts_imported: 2,
            groups_created: 0,
        };
        assert_eq!(only_contacts.user_message(), "Successfully imported 2 contacts.");
        let with_groups = ImportSummary {
            contacts_imported: 3,
            groups_created: 1,
        };
        assert_eq!(
            with_groups.user_message(),
            "Successfully imported 3 contacts and created 1 new groups."
        );
    }
}
