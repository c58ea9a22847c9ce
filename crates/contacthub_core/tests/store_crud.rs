use contacthub_core::{
    ContactDraft, ContactId, ContactStore, ContactValidationError, FixedAnswer, GroupId,
    KeyValueStore, MemoryKeyValueStore, PaletteColor, RoundRobinColorPicker, StorageConfig,
    StoreError,
};

fn fixed_clock() -> i64 {
    1_700_000_000_000
}

fn open(kv: &MemoryKeyValueStore) -> ContactStore<MemoryKeyValueStore> {
    ContactStore::open(kv.clone(), StorageConfig::default())
        .unwrap()
        .with_color_picker(RoundRobinColorPicker::default())
        .with_clock(fixed_clock)
}

fn draft(first: &str, last: &str) -> ContactDraft {
    ContactDraft {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}@example.com", first.to_lowercase()),
        phone: "555-0100".to_string(),
        ..ContactDraft::default()
    }
}

fn persisted_contacts(kv: &MemoryKeyValueStore) -> serde_json::Value {
    let raw = kv.get("nexus_contacts_v1").unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn add_contact_assigns_identity_and_writes_through() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open(&kv);

    let created = store.add_contact(draft("Ada", "Lovelace")).unwrap();

    assert_eq!(created.created_at, fixed_clock());
    assert_eq!(created.avatar_color, PaletteColor::Red);
    assert_eq!(store.contacts(), [created.clone()]);
    let snapshot = persisted_contacts(&kv);
    assert_eq!(snapshot[0]["id"], created.id.as_str());
    assert_eq!(snapshot[0]["firstName"], "Ada");
}

#[test]
fn add_contact_rejects_missing_required_fields_without_writing() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open(&kv);

    let mut invalid = draft("Ada", "Lovelace");
    invalid.email = "  ".to_string();
    let err = store.add_contact(invalid).unwrap_err();

    assert!(matches!(
        err,
        StoreError::InvalidContact(ContactValidationError::MissingEmail)
    ));
    assert!(store.contacts().is_empty());
    assert!(kv.get("nexus_contacts_v1").unwrap().is_none());
}

#[test]
fn update_replaces_fields_but_keeps_identity() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open(&kv);
    let created = store.add_contact(draft("Ada", "Lovelace")).unwrap();

    let mut edit = ContactDraft::from(&created);
    edit.company = "Analytical Engines".to_string();
    edit.phone = String::new();
    let updated = store.update_contact(&created.id, edit).unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.avatar_color, created.avatar_color);
    assert_eq!(updated.company.as_deref(), Some("Analytical Engines"));
    assert_eq!(updated.phone, "");
    assert_eq!(persisted_contacts(&kv)[0]["company"], "Analytical Engines");
}

#[test]
fn update_and_delete_unknown_contact_return_not_found() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open(&kv);
    let missing = ContactId::generate();

    let err = store.update_contact(&missing, draft("No", "One")).unwrap_err();
    assert!(matches!(err, StoreError::ContactNotFound(ref id) if *id == missing));
    let err = store.delete_contact(&missing).unwrap_err();
    assert!(matches!(err, StoreError::ContactNotFound(ref id) if *id == missing));
}

#[test]
fn delete_contact_removes_record_and_keeps_order() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open(&kv);
    let a = store.add_contact(draft("Ann", "A")).unwrap();
    let b = store.add_contact(draft("Bea", "B")).unwrap();
    let c = store.add_contact(draft("Cal", "C")).unwrap();

    let removed = store.delete_contact(&b.id).unwrap();

    assert_eq!(removed.id, b.id);
    let ids = store.contacts().iter().map(|c| c.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids, [a.id, c.id]);
    assert_eq!(persisted_contacts(&kv).as_array().unwrap().len(), 2);
}

#[test]
fn declined_confirmation_leaves_store_untouched() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open(&kv);
    let contact = store.add_contact(draft("Ann", "A")).unwrap();
    let work = store.groups()[0].id.clone();

    assert_eq!(
        store
            .delete_contact_confirmed(&contact.id, &FixedAnswer(false))
            .unwrap(),
        None
    );
    assert_eq!(
        store.delete_group_confirmed(&work, &FixedAnswer(false)).unwrap(),
        None
    );
    assert_eq!(store.contacts().len(), 1);
    assert_eq!(store.groups().len(), 3);

    let deleted = store
        .delete_contact_confirmed(&contact.id, &FixedAnswer(true))
        .unwrap();
    assert_eq!(deleted.map(|c| c.id), Some(contact.id));
}

#[test]
fn add_group_trims_name_and_rejects_blank() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open(&kv);

    let group = store.add_group("  Book Club ").unwrap();
    assert_eq!(group.name, "Book Club");
    assert_eq!(store.groups().len(), 4);
    assert_eq!(store.group_by_name("book club").map(|g| &g.id), Some(&group.id));

    assert!(matches!(
        store.add_group("   ").unwrap_err(),
        StoreError::InvalidGroupName
    ));
    assert_eq!(store.groups().len(), 4);
}

#[test]
fn delete_group_unassigns_members_and_never_deletes_contacts() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open(&kv);
    let family = store.group_by_name("Family").unwrap().id.clone();
    let work = store.group_by_name("Work").unwrap().id.clone();

    let mut members = Vec::new();
    for name in ["Ann", "Bea", "Cal"] {
        let mut d = draft(name, "Kin");
        d.group_id = Some(family.clone());
        members.push(store.add_contact(d).unwrap());
    }
    let mut colleague = draft("Dee", "Desk");
    colleague.group_id = Some(work.clone());
    let colleague = store.add_contact(colleague).unwrap();

    let outcome = store.delete_group(&family).unwrap();

    assert_eq!(outcome.group.id, family);
    assert_eq!(outcome.unassigned, 3);
    assert!(store.group(&family).is_none());
    assert_eq!(store.contacts().len(), 4);
    for before in &members {
        let after = store.contact(&before.id).unwrap();
        assert_eq!(after.group_id, None);
        assert_eq!(after.first_name, before.first_name);
        assert_eq!(after.email, before.email);
        assert_eq!(after.created_at, before.created_at);
    }
    assert_eq!(store.contact(&colleague.id).unwrap().group_id, Some(work));

    let groups_raw = kv.get("nexus_groups_v1").unwrap().unwrap();
    assert!(!groups_raw.contains(family.as_str()));
    let contacts = persisted_contacts(&kv);
    let nulls = contacts
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["groupId"].is_null())
        .count();
    assert_eq!(nulls, 3);
}

#[test]
fn delete_unknown_group_returns_not_found() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open(&kv);
    let missing = GroupId::generate();
    assert!(matches!(
        store.delete_group(&missing).unwrap_err(),
        StoreError::GroupNotFound(ref id) if *id == missing
    ));
}

#[test]
fn reopen_restores_both_collections() {
    let kv = MemoryKeyValueStore::new();
    let (contact, group) = {
        let mut store = open(&kv);
        let group = store.add_group("Climbing").unwrap();
        let mut d = draft("Ann", "Rope");
        d.group_id = Some(group.id.clone());
        (store.add_contact(d).unwrap(), group)
    };

    let reopened = open(&kv);
    assert_eq!(reopened.contacts(), [contact]);
    assert_eq!(reopened.groups().len(), 4);
    assert_eq!(reopened.group(&group.id), Some(&group));
}

#[test]
fn snapshots_with_short_string_ids_load_and_survive_writes() {
    let mut kv = MemoryKeyValueStore::new();
    kv.set(
        "nexus_groups_v1",
        r#"[{"id":"g1x9k2","name":"Work","color":"bg-blue-500"}]"#,
    )
    .unwrap();
    kv.set(
        "nexus_contacts_v1",
        r#"[{"id":"k3j9x2a1b","prefix":"","firstName":"Ann","lastName":"Lee",
             "email":"ann@example.com","phone":"","groupId":"g1x9k2",
             "createdAt":1690000000000,"avatarColor":"bg-red-500",
             "jobTitle":"","company":""}]"#,
    )
    .unwrap();

    let mut store = open(&kv);
    assert_eq!(store.contacts().len(), 1);
    assert_eq!(store.groups().len(), 1);
    let ann = ContactId::from("k3j9x2a1b");
    let work = GroupId::from("g1x9k2");
    assert_eq!(store.contact(&ann).unwrap().group_id, Some(work.clone()));

    store.add_contact(draft("Bo", "Ray")).unwrap();

    let snapshot = persisted_contacts(&kv);
    assert_eq!(snapshot[0]["id"], "k3j9x2a1b");
    assert_eq!(snapshot[0]["groupId"], "g1x9k2");
    assert_eq!(snapshot[1]["firstName"], "Bo");
    assert_eq!(store.delete_group(&work).unwrap().unassigned, 1);
}
