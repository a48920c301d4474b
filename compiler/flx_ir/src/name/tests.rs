use super::*;

#[test]
fn test_intern_is_idempotent() {
    let mut interner = StringInterner::new();
    let a = interner.intern("counter");
    let b = interner.intern("counter");
    assert_eq!(a, b);
    assert_eq!(interner.lookup(a), "counter");
}

#[test]
fn test_empty_is_pre_interned() {
    let mut interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert!(interner.is_empty());
}

#[test]
fn test_names_are_case_sensitive() {
    let mut interner = StringInterner::new();
    let lower = interner.intern("len");
    let upper = interner.intern("LEN");
    assert_ne!(lower, upper);
    assert_eq!(interner.get("Len"), None);
}
