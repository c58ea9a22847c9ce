//! Contact/group store with write-through snapshot persistence.
//!
//! # Responsibility
//! - Expose the only mutation API for contacts and groups.
//! - Persist the touched collection(s) after every mutation.
//! - Enforce the group-delete cascade (`group_id = None`) explicitly.
//!
//! # Invariants
//! - In-memory state changes only after every required snapshot write
//!   succeeded; a failed write leaves the store as it was.
//! - Imports commit groups before contacts.
//! - Deletes are hard deletes; there are no tombstones.

use crate::config::StorageConfig;
use crate::interchange::export::{export_csv, ExportError};
use crate::interchange::import::{plan_import, ImportError, ImportPlan, ImportSummary};
use crate::model::contact::{Contact, ContactDraft, ContactValidationError};
use crate::model::group::{group_name_key, Group};
use crate::model::id::{ContactId, GroupId};
use crate::model::palette::{ColorPicker, RandomColorPicker};
use crate::repo::kv::KeyValueStore;
use crate::repo::snapshot_repo::SnapshotRepository;
use crate::repo::RepoError;
use crate::service::ConfirmPrompt;
use crate::view::{derive_view, ViewQuery};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

pub const CONFIRM_DELETE_CONTACT: &str = "Are you sure you want to delete this contact?";
pub const CONFIRM_DELETE_GROUP: &str =
    "Delete this group? Contacts in this group will be unassigned.";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation failure.
#[derive(Debug)]
pub enum StoreError {
    InvalidContact(ContactValidationError),
    /// Group name is blank after trim.
    InvalidGroupName,
    ContactNotFound(ContactId),
    GroupNotFound(GroupId),
    Import(ImportError),
    Repo(RepoError),
    /// File logging could not be started.
    Logging(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidContact(err) => write!(f, "invalid contact: {err}"),
            Self::InvalidGroupName => write!(f, "group name must not be blank"),
            Self::ContactNotFound(id) => write!(f, "contact not found: {id}"),
            Self::GroupNotFound(id) => write!(f, "group not found: {id}"),
            Self::Import(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Logging(message) => write!(f, "logging setup failed: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidContact(err) => Some(err),
            Self::Import(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ContactValidationError> for StoreError {
    fn from(value: ContactValidationError) -> Self {
        Self::InvalidContact(value)
    }
}

impl From<ImportError> for StoreError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Outcome of [`ContactStore::delete_group`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDeletion {
    pub group: Group,
    /// Contacts whose `group_id` was cleared.
    pub unassigned: usize,
}

/// Unix epoch milliseconds from the system clock.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

/// In-memory owner of both collections.
pub struct ContactStore<S: KeyValueStore> {
    repo: SnapshotRepository<S>,
    contacts: Vec<Contact>,
    groups: Vec<Group>,
    colors: Box<dyn ColorPicker>,
    clock: fn() -> i64,
}

impl<S: KeyValueStore> ContactStore<S> {
    /// Loads persisted state (seeding default groups on first run).
    pub fn open(store: S, config: StorageConfig) -> StoreResult<Self> {
        let mut repo = SnapshotRepository::new(store, config);
        let state = repo.load()?;
        info!(
            "event=store_open module=store status=ok contacts={} groups={} seeded={}",
            state.contacts.len(),
            state.groups.len(),
            state.seeded_defaults
        );
        Ok(Self {
            repo,
            contacts: state.contacts,
            groups: state.groups,
            colors: Box::new(RandomColorPicker::new()),
            clock: now_epoch_ms,
        })
    }

    /// Replaces the avatar/group color policy.
    pub fn with_color_picker(mut self, colors: impl ColorPicker + 'static) -> Self {
        self.colors = Box::new(colors);
        self
    }

    /// Replaces the creation-timestamp source.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn contact(&self, id: &ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|contact| &contact.id == id)
    }

    pub fn group(&self, id: &GroupId) -> Option<&Group> {
        self.groups.iter().find(|group| &group.id == id)
    }

    /// First group whose name matches `name` case-insensitively.
    pub fn group_by_name(&self, name: &str) -> Option<&Group> {
        let key = group_name_key(name);
        self.groups
            .iter()
            .find(|group| group_name_key(&group.name) == key)
    }

    pub fn repository(&self) -> &SnapshotRepository<S> {
        &self.repo
    }

    /// Derived view over the current contacts.
    pub fn view(&self, query: &ViewQuery) -> Vec<&Contact> {
        derive_view(&self.contacts, query)
    }

    /// CSV text of every contact with current group names.
    pub fn export_csv(&self) -> Result<String, ExportError> {
        export_csv(&self.contacts, &self.groups)
    }

    /// Creates a contact from a validated draft.
    pub fn add_contact(&mut self, draft: ContactDraft) -> StoreResult<Contact> {
        draft.validate()?;
        self.warn_on_unknown_group(draft.group_id.as_ref());

        let contact = Contact::from_draft(draft, (self.clock)(), self.colors.next_color());
        let mut contacts = self.contacts.clone();
        contacts.push(contact.clone());
        self.commit(None, Some(contacts))?;

        info!("event=contact_add module=store status=ok contact_id={}", contact.id);
        Ok(contact)
    }

    /// Replaces every editable field of contact `id`.
    pub fn update_contact(&mut self, id: &ContactId, draft: ContactDraft) -> StoreResult<Contact> {
        draft.validate()?;
        let index = self
            .contact_index(id)
            .ok_or_else(|| StoreError::ContactNotFound(id.clone()))?;
        self.warn_on_unknown_group(draft.group_id.as_ref());

        let mut contacts = self.contacts.clone();
        contacts[index].apply_draft(draft);
        let updated = contacts[index].clone();
        self.commit(None, Some(contacts))?;

        info!("event=contact_update module=store status=ok contact_id={id}");
        Ok(updated)
    }

    /// Removes contact `id` and returns it.
    pub fn delete_contact(&mut self, id: &ContactId) -> StoreResult<Contact> {
        let index = self
            .contact_index(id)
            .ok_or_else(|| StoreError::ContactNotFound(id.clone()))?;

        let mut contacts = self.contacts.clone();
        let removed = contacts.remove(index);
        self.commit(None, Some(contacts))?;

        info!("event=contact_delete module=store status=ok contact_id={id}");
        Ok(removed)
    }

    /// Asks `prompt` first; returns `Ok(None)` when the user declines.
    pub fn delete_contact_confirmed(
        &mut self,
        id: &ContactId,
        prompt: &dyn ConfirmPrompt,
    ) -> StoreResult<Option<Contact>> {
        if self.contact(id).is_none() {
            return Err(StoreError::ContactNotFound(id.clone()));
        }
        if !prompt.confirm(CONFIRM_DELETE_CONTACT) {
            return Ok(None);
        }
        self.delete_contact(id).map(Some)
    }

    /// Creates a group with a trimmed name and a palette color.
    pub fn add_group(&mut self, name: &str) -> StoreResult<Group> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidGroupName);
        }

        let group = Group::new(name, self.colors.next_color());
        let mut groups = self.groups.clone();
        groups.push(group.clone());
        self.commit(Some(groups), None)?;

        info!("event=group_add module=store status=ok group_id={}", group.id);
        Ok(group)
    }

    /// Removes group `id` and unassigns every contact that referenced it.
    /// Contacts themselves are never deleted.
    pub fn delete_group(&mut self, id: &GroupId) -> StoreResult<GroupDeletion> {
        let index = self
            .groups
            .iter()
            .position(|group| &group.id == id)
            .ok_or_else(|| StoreError::GroupNotFound(id.clone()))?;

        let mut groups = self.groups.clone();
        let group = groups.remove(index);

        let mut contacts = self.contacts.clone();
        let mut unassigned = 0;
        for contact in contacts.iter_mut().filter(|c| c.group_id.as_ref() == Some(id)) {
            contact.group_id = None;
            unassigned += 1;
        }

        let touched_contacts = (unassigned > 0).then_some(contacts);
        self.commit(Some(groups), touched_contacts)?;

        info!("event=group_delete module=store status=ok group_id={id} unassigned={unassigned}");
        Ok(GroupDeletion { group, unassigned })
    }

    /// Asks `prompt` first; returns `Ok(None)` when the user declines.
    pub fn delete_group_confirmed(
        &mut self,
        id: &GroupId,
        prompt: &dyn ConfirmPrompt,
    ) -> StoreResult<Option<GroupDeletion>> {
        if self.group(id).is_none() {
            return Err(StoreError::GroupNotFound(id.clone()));
        }
        if !prompt.confirm(CONFIRM_DELETE_GROUP) {
            return Ok(None);
        }
        self.delete_group(id).map(Some)
    }

    /// Appends a planned import atomically: groups first, then contacts.
    pub fn import_batch(&mut self, plan: ImportPlan) -> StoreResult<ImportSummary> {
        if plan.contacts.is_empty() {
            return Err(StoreError::Import(ImportError::NoValidContacts));
        }
        let summary = plan.summary();

        let groups = (!plan.groups.is_empty()).then(|| {
            let mut groups = self.groups.clone();
            groups.extend(plan.groups);
            groups
        });
        let mut contacts = self.contacts.clone();
        contacts.extend(plan.contacts);
        self.commit(groups, Some(contacts))?;

        info!(
            "event=csv_import module=store status=ok contacts={} groups_created={}",
            summary.contacts_imported, summary.groups_created
        );
        Ok(summary)
    }

    /// Parses `input` against current groups and commits the result.
    ///
    /// Parse failures and empty results leave the store untouched.
    pub fn import_csv(&mut self, input: &[u8]) -> StoreResult<ImportSummary> {
        let plan = match plan_import(input, &self.groups, (self.clock)(), self.colors.as_mut()) {
            Ok(plan) => plan,
            Err(err) => {
                warn!("event=csv_import module=store status=rejected error={err}");
                return Err(err.into());
            }
        };
        self.import_batch(plan)
    }

    fn contact_index(&self, id: &ContactId) -> Option<usize> {
        self.contacts.iter().position(|contact| &contact.id == id)
    }

    fn warn_on_unknown_group(&self, group_id: Option<&GroupId>) {
        if let Some(group_id) = group_id {
            if self.group(group_id).is_none() {
                warn!("event=contact_write module=store status=dangling_group group_id={group_id}");
            }
        }
    }

    /// Persists the given replacement collections, then swaps them in.
    ///
    /// Groups are written before contacts. If the contacts write fails after
    /// the groups write succeeded, the previous groups snapshot is restored
    /// on a best-effort basis.
    fn commit(
        &mut self,
        groups: Option<Vec<Group>>,
        contacts: Option<Vec<Contact>>,
    ) -> StoreResult<()> {
        if let Some(groups) = &groups {
            self.repo.save_groups(groups)?;
        }
        if let Some(contacts) = &contacts {
            if let Err(err) = self.repo.save_contacts(contacts) {
                if groups.is_some() {
                    if let Err(rollback_err) = self.repo.save_groups(&self.groups) {
                        error!(
                            "event=store_rollback module=store status=error error={rollback_err}"
                        );
                    }
                }
                return Err(err.into());
            }
        }

        if let Some(groups) = groups {
            self.groups = groups;
        }
        if let Some(contacts) = contacts {
            self.contacts = contacts;
        }
        Ok(())
    }
}
