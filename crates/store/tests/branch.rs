//! Integration tests for nested context branches

use anyhow::Result;
use chrono::{TimeZone, Utc};
use lsm_store::{BlockHeader, Context, Event, KvStoreExt, MemStore};

fn header() -> BlockHeader {
    BlockHeader::new(10, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
}

#[test]
fn test_inner_failure_keeps_outer_writes() -> Result<()> {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, header());

    let outer: Result<(), String> = ctx.branch(|outer| {
        outer.store_mut().set_json(b"counter", &1u64).map_err(|e| e.to_string())?;
        outer.emit(Event::new("outer"));

        let inner: Result<(), String> = outer.branch(|inner| {
            inner.store_mut().set_json(b"counter", &99u64).map_err(|e| e.to_string())?;
            inner.emit(Event::new("inner"));
            Err("inner failed".into())
        });
        assert!(inner.is_err());
        Ok(())
    });
    assert!(outer.is_ok());

    assert_eq!(ctx.store().get_json::<u64>(b"counter")?, Some(1));
    let kinds: Vec<_> = ctx.events().iter().map(|e| e.kind.as_str()).collect();
    assert_eq!(kinds, vec!["outer"]);
    Ok(())
}

#[test]
fn test_outer_failure_drops_inner_success() -> Result<()> {
    let mut store = MemStore::new();
    {
        let mut ctx = Context::new(&mut store, header());
        let result: Result<(), String> = ctx.branch(|outer| {
            let inner: Result<(), String> = outer.branch(|inner| {
                inner.store_mut().set(b"k", b"v".to_vec());
                Ok(())
            });
            assert!(inner.is_ok());
            assert!(outer.store().has(b"k"));
            Err("outer failed".into())
        });
        assert!(result.is_err());
    }
    assert!(store.is_empty());
    Ok(())
}

#[test]
fn test_branch_sees_parent_state() -> Result<()> {
    let mut store = MemStore::new();
    store.set_json(b"seed", &"hello")?;

    let mut ctx = Context::new(&mut store, header());
    let seen: Result<Option<String>, lsm_store::StoreError> =
        ctx.branch(|child| child.store().get_json::<String>(b"seed"));
    assert_eq!(seen?, Some("hello".to_string()));
    Ok(())
}
