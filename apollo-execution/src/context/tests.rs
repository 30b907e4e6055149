use crate::Context;

#[test]
fn test_context_insert() {
    let c = Context::new();
    assert!(c.insert("key1", 1).is_ok());
    assert_eq!(c.get("key1").unwrap(), Some(1));
}

#[test]
fn test_context_overwrite() {
    let c = Context::new();
    assert!(c.insert("overwrite", 2).is_ok());
    assert_eq!(c.insert("overwrite", 3).unwrap(), Some(2));
    assert_eq!(c.get("overwrite").unwrap(), Some(3));
}

#[test]
fn test_context_upsert() {
    let c = Context::new();
    assert!(c.insert("present", 1).is_ok());
    assert!(c.upsert("present", |v: usize| v + 1, || 0).is_ok());
    assert!(c.upsert("not_present", |v: usize| v + 1, || 0).is_ok());
    assert_eq!(c.get("present").unwrap(), Some(2));
    assert_eq!(c.get("not_present").unwrap(), Some(1));
}

#[test]
fn test_context_remove() {
    let c = Context::new();
    assert!(c.insert("key", "value".to_string()).is_ok());
    assert!(c.contains_key("key"));
    assert_eq!(c.remove("key").unwrap(), Some("value".to_string()));
    assert!(!c.contains_key("key"));
    assert_eq!(c.get::<_, String>("key").unwrap(), None);
}

#[test]
fn test_context_clones_share_entries() {
    let c = Context::new();
    let clone = c.clone();
    clone.insert("shared", true).unwrap();
    assert_eq!(c.get("shared").unwrap(), Some(true));
}

#[test]
fn test_context_type_mismatch() {
    let c = Context::new();
    c.insert("number", 1).unwrap();
    assert!(c.get::<_, String>("number").is_err());
}
