// inspector_core/tests/serialization_manager.rs
use inspector_core::modification::ModificationDetector;
use inspector_core::serialization::*;
use inspector_core::Reflect;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Reflect, Default)]
struct Door {
    pub open: bool,
    pub code: i32,
    #[reflect(state)]
    state: SerializedState,
}

#[derive(Reflect, Default)]
#[reflect(always_dirty)]
struct Clock {
    pub ticks: u64,
    #[reflect(state)]
    state: SerializedState,
}

fn manager() -> SerializationManager {
    SerializationManager::new(Box::new(JsonSerializer), RestoreOptions::default())
}

fn door_record(code: i32) -> SerializedRecord {
    let mut record = SerializedRecord::default();
    record.push("open", Some("true".into()));
    record.push("code", Some(code.to_string()));
    record
}

#[test]
fn only_dirty_objects_are_saved() {
    let manager = manager();
    let door = Arc::new(Mutex::new(Door {
        open: true,
        code: 12,
        ..Default::default()
    }));
    let shared: SharedObject = door.clone();
    let id = door.lock().unwrap().instance_id();

    assert!(!manager.submit_serialize(&shared));
    assert!(door.lock().unwrap().state.record.is_empty());

    manager.mark_dirty(id);
    assert!(manager.is_dirty(id));
    assert!(manager.submit_serialize(&shared));
    assert!(!manager.is_dirty(id));

    let guard = door.lock().unwrap();
    assert_eq!(guard.state.record.keys, vec!["open", "code"]);
    assert_eq!(guard.state.record.value_of("code"), Some(Some("12")));
    drop(guard);

    assert!(!manager.submit_serialize(&shared));
}

#[test]
fn always_dirty_objects_save_every_time() {
    let manager = manager();
    let clock = Arc::new(Mutex::new(Clock::default()));
    let shared: SharedObject = clock.clone();

    for tick in 1..=3 {
        clock.lock().unwrap().ticks = tick;
        assert!(manager.submit_serialize(&shared));
        assert_eq!(
            clock.lock().unwrap().state.record.value_of("ticks"),
            Some(Some(tick.to_string().as_str()))
        );
    }
}

#[test]
fn worker_threads_queue_restores_for_the_main_thread() {
    let manager = Arc::new(manager());
    let doors: Vec<_> = (0..4)
        .map(|code| {
            let mut door = Door::default();
            door.state.record = door_record(code);
            Arc::new(Mutex::new(door))
        })
        .collect();

    let workers: Vec<_> = doors
        .iter()
        .map(|door| {
            let manager = manager.clone();
            let shared: SharedObject = door.clone();
            thread::spawn(move || manager.submit_deserialize(shared))
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    // Nothing is touched until the pump runs.
    assert_eq!(manager.pending_count(), 4);
    assert!(doors.iter().all(|door| !door.lock().unwrap().open));

    assert_eq!(manager.run_deserializations(), 4);
    assert_eq!(manager.pending_count(), 0);
    for (code, door) in doors.iter().enumerate() {
        let door = door.lock().unwrap();
        assert!(door.open);
        assert_eq!(door.code, code as i32);
        assert!(door.is_restored());
    }
}

#[test]
fn unmodified_records_are_not_restored_twice() {
    let manager = manager();
    let mut door = Door::default();
    door.state.record = door_record(7);
    let door = Arc::new(Mutex::new(door));
    let shared: SharedObject = door.clone();

    manager.submit_deserialize(shared.clone());
    assert_eq!(manager.run_deserializations(), 1);

    // A live edit that was never saved survives a redundant restore request.
    door.lock().unwrap().code = 99;
    manager.submit_deserialize(shared.clone());
    assert_eq!(manager.run_deserializations(), 0);
    assert_eq!(door.lock().unwrap().code, 99);

    door.lock().unwrap().state.record = door_record(8);
    manager.submit_deserialize(shared.clone());
    assert_eq!(manager.run_deserializations(), 1);
    assert_eq!(door.lock().unwrap().code, 8);

    let id = door.lock().unwrap().instance_id();
    manager.forget(id);
    manager.submit_deserialize(shared);
    assert_eq!(manager.run_deserializations(), 1);
}

#[test]
fn settings_pick_the_serializer() {
    let mut settings = inspector_core::storage::InspectorSettings::default();
    settings.serializer = "ron".into();
    let manager = SerializationManager::from_settings(&settings).unwrap();
    assert_eq!(manager.serializer().name(), "ron");

    settings.serializer = "xml".into();
    assert!(SerializationManager::from_settings(&settings).is_err());
}

#[test]
fn repeated_updates_without_edits_stay_unmodified() {
    let mut detector = ModificationDetector::new();
    let mut door = Door {
        code: 4,
        ..Default::default()
    };
    save_object(&mut door, &JsonSerializer);

    detector.update(&door);
    assert!(!detector.was_modified(&door));
    detector.update(&door);
    assert!(!detector.was_modified(&door));
}

#[test]
fn edits_are_detected_until_reverted() {
    let mut detector = ModificationDetector::new();
    let mut door = Door {
        code: 4,
        ..Default::default()
    };
    save_object(&mut door, &JsonSerializer);
    detector.update(&door);

    door.code = 5;
    save_object(&mut door, &JsonSerializer);
    assert!(detector.was_modified(&door));

    door.code = 4;
    save_object(&mut door, &JsonSerializer);
    assert!(!detector.was_modified(&door));
}
