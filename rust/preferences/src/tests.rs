use super::*;
use assert_approx_eq::assert_approx_eq;

const KEY: &str = "test";

// Don't run these tests under miri
#[cfg(all(not(miri), any(target_os = "macos", target_os = "windows")))]
mod os_store {
    use super::*;

    fn reset(store: &impl Store) {
        store.edit().clear().commit().unwrap();
    }

    #[test]
    fn starts_empty() {
        let store = create_store("com.typed-preferences.test.starts_empty");
        reset(&store);
        assert_eq!(store.get(KEY), None);
        assert!(!store.contains(KEY));
    }

    #[test]
    fn can_set() {
        let store = create_store("com.typed-preferences.test.can_set");
        reset(&store);
        store.edit().put_bool(KEY, true).commit().unwrap();
        assert_eq!(store.get(KEY), Some(Value::Bool(true)));
        store.edit().put_long(KEY, 42).commit().unwrap();
        assert_eq!(store.get(KEY), Some(Value::Long(42)));
        assert!(store.contains(KEY));
    }

    #[test]
    fn can_remove() {
        let store = create_store("com.typed-preferences.test.can_remove");
        reset(&store);
        store.edit().put_int(KEY, 1).commit().unwrap();
        store.edit().remove(KEY).commit().unwrap();
        assert_eq!(store.get(KEY), None);
        // Again, now that it is absent.
        store.edit().remove(KEY).commit().unwrap();
    }

    #[test]
    fn domains_dont_conflict() {
        let store1 = create_store("com.typed-preferences.test.domains_dont_conflict1");
        let store2 = create_store("com.typed-preferences.test.domains_dont_conflict2");
        reset(&store1);
        reset(&store2);
        store1.edit().put_bool(KEY, true).commit().unwrap();
        assert_eq!(store1.get(KEY), Some(Value::Bool(true)));
        assert_eq!(store2.get(KEY), None);
    }

    #[test]
    fn can_reset() {
        let store = create_store("com.typed-preferences.test.can_reset");
        reset(&store);
        store.edit().put_bool(KEY, true).commit().unwrap();
        assert_eq!(store.get(KEY), Some(Value::Bool(true)));
        reset(&store);
        assert_eq!(store.get(KEY), None);
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn rejected_commit_changes_nothing() {
        let store = create_store("com.typed-preferences.test.rejected_commit_changes_nothing");
        reset(&store);
        store.edit().put_bool(KEY, true).commit().unwrap();
        let result = store
            .edit()
            .clear()
            .put_int("other", 1)
            .put_int("bad\0key", 2)
            .commit();
        assert!(matches!(result, Err(StoreError::Backend(_))));
        assert_eq!(store.get(KEY), Some(Value::Bool(true)));
        assert_eq!(store.get("other"), None);
    }

    #[test]
    fn persists() {
        {
            let store = create_store("com.typed-preferences.test.persists");
            reset(&store);
            let set = StringSet::from_iter(["a".to_string(), "b".to_string()]);
            store.edit().put_string_set(KEY, set).commit().unwrap();
        }

        let store = create_store("com.typed-preferences.test.persists");
        assert_eq!(
            store.get_string_set(KEY),
            Ok(Some(StringSet::from_iter(["a".to_string(), "b".to_string()])))
        );
    }
}

#[test]
fn typed_reads_fall_back_to_default() {
    let store = MemoryStore::new();
    assert_eq!(store.get_bool(KEY, true), Ok(true));
    assert_eq!(store.get_int(KEY, 7), Ok(7));
    assert_eq!(store.get_long(KEY, -7), Ok(-7));
    assert_approx_eq!(store.get_float(KEY, 0.25).unwrap(), 0.25);
    assert_eq!(store.get_string(KEY, "fallback"), Ok("fallback".to_string()));
    assert_eq!(store.get_string_set(KEY), Ok(None));
}

#[test]
fn typed_reads_return_stored_values() {
    let store = MemoryStore::from_iter([
        ("bool", Value::Bool(true)),
        ("int", Value::Int(3)),
        ("long", Value::Long(1 << 40)),
        ("float", Value::Float(2.5)),
        ("string", Value::String("hi".to_string())),
    ]);
    assert_eq!(store.get_bool("bool", false), Ok(true));
    assert_eq!(store.get_int("int", 0), Ok(3));
    assert_eq!(store.get_long("long", 0), Ok(1 << 40));
    assert_approx_eq!(store.get_float("float", 0.0).unwrap(), 2.5);
    assert_eq!(store.get_string("string", ""), Ok("hi".to_string()));
}

#[test]
fn typed_read_of_wrong_kind_fails() {
    let store = MemoryStore::from_iter([(KEY, Value::Float(1.0))]);
    assert_eq!(
        store.get_long(KEY, 0),
        Err(StoreError::TypeMismatch {
            key: KEY.to_string(),
            expected: Kind::Long,
            found: Kind::Float,
        })
    );
}

#[test]
fn edits_are_not_applied_until_commit() {
    let store = MemoryStore::new();
    let editor = store.edit().put_int(KEY, 1);
    assert!(!store.contains(KEY));
    editor.commit().unwrap();
    assert_eq!(store.get(KEY), Some(Value::Int(1)));
}

#[test]
fn dropped_editor_writes_nothing() {
    let store = MemoryStore::new();
    drop(store.edit().put_int(KEY, 1));
    assert!(store.is_empty());
}

#[test]
fn changes_apply_in_order() {
    let store = MemoryStore::new();
    store
        .edit()
        .put_int(KEY, 1)
        .remove(KEY)
        .put_string("other", "a")
        .put_string("other", "b")
        .commit()
        .unwrap();
    assert!(!store.contains(KEY));
    assert_eq!(store.get_string("other", ""), Ok("b".to_string()));
}

#[test]
fn clear_happens_before_other_changes() {
    let store = MemoryStore::from_iter([("old", Value::Bool(true))]);
    store
        .edit()
        .put_bool("new", true)
        .clear()
        .commit()
        .unwrap();
    assert!(!store.contains("old"));
    assert_eq!(store.get("new"), Some(Value::Bool(true)));
    assert_eq!(store.len(), 1);
}

#[test]
fn removing_absent_key_succeeds() {
    let store = MemoryStore::new();
    assert_eq!(store.edit().remove(KEY).commit(), Ok(()));
    assert!(store.is_empty());
}

#[test]
fn type_mismatch_names_the_kinds() {
    let error = StoreError::TypeMismatch {
        key: KEY.to_string(),
        expected: Kind::StringSet,
        found: Kind::Int,
    };
    assert_eq!(
        error.to_string(),
        "preference `test` holds a value of kind int, expected string set"
    );
}

/// Holds encoded strings the way the OS services do, and keeps the default `contains`.
struct EncodedStore(std::collections::HashMap<&'static str, &'static str>);

impl Store for EncodedStore {
    fn get(&self, key: &str) -> Option<Value> {
        json::from_json(key, self.0.get(key)?)
    }

    fn commit(&self, _: Edits) -> Result<(), StoreError> {
        Err(StoreError::Backend("read-only".to_string()))
    }
}

#[test]
fn undecodable_entries_are_not_contained() {
    let store = EncodedStore([("good", r#"{"Int":1}"#), ("bad", "not json")].into());
    assert!(store.contains("good"));
    assert_eq!(store.get("bad"), None);
    assert!(!store.contains("bad"));
    assert!(!store.contains("missing"));
}
