//! Sidebar aggregates and group lookups with display fallbacks.

use crate::model::contact::Contact;
use crate::model::group::Group;
use crate::model::id::GroupId;
use crate::model::palette::PaletteColor;
use std::collections::HashMap;

/// Contact totals for the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCounts {
    /// All contacts, assigned or not.
    pub total: usize,
    /// One entry per group, in group order. Groups with no members count 0.
    pub per_group: Vec<(GroupId, usize)>,
}

impl GroupCounts {
    pub fn count_for(&self, group_id: &GroupId) -> usize {
        self.per_group
            .iter()
            .find(|(id, _)| id == group_id)
            .map_or(0, |(_, count)| *count)
    }
}

pub fn group_counts(contacts: &[Contact], groups: &[Group]) -> GroupCounts {
    let mut tally: HashMap<&GroupId, usize> = HashMap::new();
    for group_id in contacts.iter().filter_map(|contact| contact.group_id.as_ref()) {
        *tally.entry(group_id).or_default() += 1;
    }

    GroupCounts {
        total: contacts.len(),
        per_group: groups
            .iter()
            .map(|group| (group.id.clone(), tally.get(&group.id).copied().unwrap_or(0)))
            .collect(),
    }
}

/// Name of the referenced group; `None` when unassigned or dangling.
pub fn group_name<'g>(groups: &'g [Group], group_id: Option<&GroupId>) -> Option<&'g str> {
    let group_id = group_id?;
    groups
        .iter()
        .find(|group| &group.id == group_id)
        .map(|group| group.name.as_str())
}

/// Color of the referenced group, or the neutral gray fallback.
pub fn group_color(groups: &[Group], group_id: Option<&GroupId>) -> PaletteColor {
    group_id
        .and_then(|id| groups.iter().find(|group| &group.id == id))
        .map_or(PaletteColor::Gray, |group| group.color)
}
