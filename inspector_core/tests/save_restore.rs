// inspector_core/tests/save_restore.rs
use inspector_core::reflect::{HostRef, Reflect as _};
use inspector_core::serialization::*;
use inspector_core::storage::{load_record, save_record};
use inspector_core::Reflect;

#[derive(Reflect, Default, Debug)]
struct Crate {
    pub name: String,
    pub count: i32,
    pub r#ref: Option<HostRef>,
}

#[derive(Reflect, Default, Debug, Clone, PartialEq)]
struct Stats {
    pub hp: u16,
    pub speed: f32,
}

#[derive(Reflect, Default, Debug)]
struct Monster {
    pub label: String,
    pub stats: Stats,
    pub loot: Vec<String>,
    pub target: Option<HostRef>,
    secret: u8,
    #[reflect(serialize)]
    cooldown: f64,
    #[reflect(native)]
    pub mesh: Option<HostRef>,
}

#[derive(Reflect, Default, Debug)]
struct Chain {
    pub next: Option<Box<Chain>>,
}

impl Chain {
    fn len(&self) -> usize {
        1 + self.next.as_ref().map_or(0, |next| next.len())
    }
}

#[test]
fn saves_and_restores_plain_fields() {
    let object = Crate {
        name: "abc".into(),
        count: 5,
        r#ref: None,
    };
    let record = save_state(&object, &JsonSerializer);

    assert_eq!(record.keys, vec!["name", "count", "ref"]);
    assert_eq!(
        record.values,
        vec![Some("\"abc\"".to_string()), Some("5".to_string()), None]
    );
    assert!(record.references.is_empty());

    let mut blank = Crate::default();
    let report = restore_state(&mut blank, &record, &JsonSerializer, &RestoreOptions::default());
    assert!(report.is_clean());
    assert_eq!(blank.name, "abc");
    assert_eq!(blank.count, 5);
    assert!(blank.r#ref.is_none());
}

#[test]
fn nested_objects_lists_and_references_survive_a_round_trip() {
    let target = HostRef::new("player");
    let object = Monster {
        label: "orc".into(),
        stats: Stats { hp: 40, speed: 1.5 },
        loot: vec!["gold".into(), "axe".into()],
        target: Some(target.clone()),
        secret: 7,
        cooldown: 0.25,
        mesh: Some(HostRef::new("mesh")),
    };

    for serializer in [&JsonSerializer as &dyn Serializer, &RonSerializer] {
        let record = save_state(&object, serializer);
        // Private fields stay out unless asked for. Native fields always do.
        assert_eq!(record.keys, vec!["label", "stats", "loot", "target", "cooldown"]);
        assert_eq!(record.references.len(), 1);

        let mut restored = Monster::default();
        let report = restore_state(&mut restored, &record, serializer, &RestoreOptions::default());
        assert!(report.is_clean(), "{report:?}");
        assert_eq!(restored.label, "orc");
        assert_eq!(restored.stats, object.stats);
        assert_eq!(restored.loot, object.loot);
        assert!(restored.target.as_ref().unwrap().ptr_eq(&target));
        assert_eq!(restored.secret, 0);
        assert_eq!(restored.cooldown, 0.25);
        assert!(restored.mesh.is_none());
    }
}

#[test]
fn null_never_overwrites_a_host_reference() {
    let mut record = SerializedRecord::default();
    record.push("target", None);
    record.push("label", Some("\"kept\"".into()));

    let existing = HostRef::new(3u32);
    let mut object = Monster {
        target: Some(existing.clone()),
        ..Default::default()
    };
    let report = restore_state(&mut object, &record, &JsonSerializer, &RestoreOptions::default());

    assert_eq!(report.suppressed_null_references, vec!["target"]);
    assert!(object.target.unwrap().ptr_eq(&existing));
    assert_eq!(object.label, "kept");
}

#[test]
fn destroyed_host_objects_are_skipped_quietly() {
    let mut record = SerializedRecord::default();
    record.push("target", Some("{\"$ref\":0}".into()));
    record.references.push(None);

    let existing = HostRef::new("old");
    let mut object = Monster {
        target: Some(existing.clone()),
        ..Default::default()
    };
    let report = restore_state(&mut object, &record, &JsonSerializer, &RestoreOptions::default());

    assert!(report.failed_keys.is_empty());
    assert_eq!(report.suppressed_null_references, vec!["target"]);
    assert!(object.target.unwrap().ptr_eq(&existing));
}

#[test]
fn bad_entries_are_skipped_and_the_rest_restored() {
    let mut record = SerializedRecord::default();
    record.push("label", Some("\"ok\"".into()));
    record.push("removed_field", Some("1".into()));
    record.push("loot", Some("not json".into()));
    record.push("stats", Some("{\"hp\":-4}".into()));
    record.keys.push("dangling".into());

    let mut object = Monster::default();
    let report = restore_state(&mut object, &record, &JsonSerializer, &RestoreOptions::default());

    assert_eq!(report.length_mismatch, Some((5, 4)));
    assert_eq!(report.restored, vec!["label"]);
    assert_eq!(report.unknown_keys, vec!["removed_field"]);
    assert_eq!(report.failed_keys, vec!["loot", "stats"]);
    assert!(!report.is_clean());
    assert_eq!(object.label, "ok");
}

#[test]
fn empty_record_instantiates_up_to_the_depth_cap() {
    let options = RestoreOptions {
        auto_instantiate_references: true,
        max_instantiation_depth: 5,
    };
    let mut chain = Chain::default();
    let report = restore_state(&mut chain, &SerializedRecord::default(), &JsonSerializer, &options);

    assert!(report.instantiated);
    assert_eq!(chain.len(), 5);

    let mut untouched = Chain::default();
    restore_state(&mut untouched, &SerializedRecord::default(), &JsonSerializer, &RestoreOptions::default());
    assert_eq!(untouched.len(), 1);
}

#[test]
fn records_persist_to_disk() {
    let object = Crate {
        name: "disk".into(),
        count: 2,
        r#ref: None,
    };
    let record = save_state(&object, &RonSerializer);
    let path = std::env::temp_dir().join(format!("{}.ron", uuid::Uuid::new_v4()));

    save_record(&path, &record).unwrap();
    let loaded = load_record(&path).unwrap();
    let mut restored = Crate::default();
    restore_state(&mut restored, &loaded, &RonSerializer, &RestoreOptions::default());

    assert_eq!(restored.name, "disk");
    assert_eq!(restored.count, 2);
    assert_eq!(restored.descriptor().type_name(), std::any::type_name::<Crate>());
    let _ = std::fs::remove_file(path);
}
