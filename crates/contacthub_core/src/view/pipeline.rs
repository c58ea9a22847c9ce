//! Filter/search/sort pipeline.

use crate::model::contact::Contact;
use crate::model::id::GroupId;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Display order for the contact list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortMode {
    /// Ascending by `first_name + last_name`, case-insensitive first.
    #[default]
    Alphabetical,
    /// Oldest first.
    TimeAdded,
    /// Newest first.
    Newest,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alphabetical => "ALPHABETICAL",
            Self::TimeAdded => "TIME_ADDED",
            Self::Newest => "NEWEST",
        }
    }
}

impl Display for SortMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    /// Accepts the stored names and kebab/lowercase spellings.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "ALPHABETICAL" => Ok(Self::Alphabetical),
            "TIME_ADDED" | "OLDEST" => Ok(Self::TimeAdded),
            "NEWEST" => Ok(Self::Newest),
            other => Err(format!(
                "unknown sort mode `{other}`; expected ALPHABETICAL|TIME_ADDED|NEWEST"
            )),
        }
    }
}

/// UI query state feeding [`derive_view`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    /// Exact `group_id` match when set.
    pub group: Option<GroupId>,
    /// Free-text search, as typed.
    pub search: String,
    pub sort: SortMode,
}

impl ViewQuery {
    /// Drops the group filter if it points at a group that was just deleted.
    pub fn on_group_deleted(&mut self, deleted: &GroupId) {
        if self.group.as_ref() == Some(deleted) {
            self.group = None;
        }
    }
}

/// Contacts to display for `query`, in display order.
pub fn derive_view<'a>(contacts: &'a [Contact], query: &ViewQuery) -> Vec<&'a Contact> {
    let needle = (!query.search.trim().is_empty()).then(|| Needle::new(&query.search));

    let mut view = contacts
        .iter()
        .filter(|contact| {
            query
                .group
                .as_ref()
                .map_or(true, |group| contact.group_id.as_ref() == Some(group))
        })
        .filter(|contact| needle.as_ref().map_or(true, |needle| needle.matches(contact)))
        .collect::<Vec<_>>();

    match query.sort {
        SortMode::Alphabetical => view.sort_by_cached_key(|contact| {
            CollationKey::new(&format!("{}{}", contact.first_name, contact.last_name))
        }),
        SortMode::TimeAdded => view.sort_by_key(|contact| contact.created_at),
        SortMode::Newest => view.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
    view
}

/// Search term: names and email match case-insensitively, phone matches
/// the raw text as typed.
struct Needle<'q> {
    raw: &'q str,
    folded: String,
}

impl<'q> Needle<'q> {
    fn new(raw: &'q str) -> Self {
        Self {
            raw,
            folded: raw.to_lowercase(),
        }
    }

    fn matches(&self, contact: &Contact) -> bool {
        [&contact.first_name, &contact.last_name, &contact.email]
            .iter()
            .any(|field| field.to_lowercase().contains(&self.folded))
            || contact.phone.contains(self.raw)
    }
}

/// Approximates locale-aware ordering in three levels: base letters
/// (accents and case ignored), then accents, then case with lowercase first.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct CollationKey {
    base: String,
    folded: String,
    uppercase_mask: Vec<bool>,
}

impl CollationKey {
    fn new(text: &str) -> Self {
        let folded = text.to_lowercase();
        Self {
            base: folded.nfd().filter(|c| !is_combining_mark(*c)).collect(),
            folded: folded.nfc().collect(),
            uppercase_mask: text.chars().map(char::is_uppercase).collect(),
        }
    }
}
