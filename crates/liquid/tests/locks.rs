//! Tokenize share lock lifecycle and the begin-block sweep

mod common;

use chrono::Duration;
use common::*;
use lsm_host::BondStatus;
use lsm_liquid::msgs::{LiquidMsg, MsgDisableTokenizeShares, MsgEnableTokenizeShares};
use lsm_liquid::{LiquidError, LiquidResponse, TokenizeShareLockStatus};
use lsm_store::{Context, MemStore};

fn disable(h: &Harness, ctx: &mut Context<'_>, who: &str) -> Result<(), LiquidError> {
    h.keeper.disable_tokenize_shares(
        ctx,
        &MsgDisableTokenizeShares {
            delegator_address: acc(who),
        },
    )
}

fn enable(h: &Harness, ctx: &mut Context<'_>, who: &str) -> Result<chrono::DateTime<chrono::Utc>, LiquidError> {
    h.keeper.enable_tokenize_shares(
        ctx,
        &MsgEnableTokenizeShares {
            delegator_address: acc(who),
        },
    )
}

#[test]
fn test_lock_lifecycle() {
    let h = Harness::new();
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, header());
    let alice = acc("alice");
    let v = h.create_validator(&mut ctx, "valoper1", BondStatus::Bonded);
    h.delegate(&mut ctx, &alice, &v, 100);

    let info = h.keeper.query_tokenize_share_lock_info(&ctx, &alice).unwrap();
    assert_eq!(info.status, TokenizeShareLockStatus::Unlocked);
    assert!(matches!(
        enable(&h, &mut ctx, "alice"),
        Err(LiquidError::TokenizeSharesAlreadyEnabledForAccount { completion_time: None })
    ));

    disable(&h, &mut ctx, "alice").unwrap();
    assert!(matches!(
        h.tokenize(&mut ctx, &alice, &v, 10, &alice),
        Err(LiquidError::TokenizeSharesDisabledForAccount { unlock_time: None })
    ));
    assert!(matches!(
        disable(&h, &mut ctx, "alice"),
        Err(LiquidError::TokenizeSharesAlreadyDisabledForAccount)
    ));

    let completion = enable(&h, &mut ctx, "alice").unwrap();
    assert_eq!(completion, genesis_time() + Duration::days(21));

    let info = h.keeper.query_tokenize_share_lock_info(&ctx, &alice).unwrap();
    assert_eq!(info.status, TokenizeShareLockStatus::LockExpiring);
    assert_eq!(info.expiration_time, Some(completion));
    match enable(&h, &mut ctx, "alice") {
        Err(LiquidError::TokenizeSharesAlreadyEnabledForAccount { completion_time }) => {
            assert_eq!(completion_time, Some(completion));
        }
        other => panic!("unexpected: {other:?}"),
    }
    match h.tokenize(&mut ctx, &alice, &v, 10, &alice) {
        Err(LiquidError::TokenizeSharesDisabledForAccount { unlock_time }) => {
            assert_eq!(unlock_time, Some(completion));
        }
        other => panic!("unexpected: {other:?}"),
    }

    // one second early
    ctx.next_block(Duration::days(21) - Duration::seconds(1));
    assert!(h.keeper.begin_blocker(&mut ctx).unwrap().is_empty());

    ctx.next_block(Duration::seconds(1));
    assert_eq!(h.keeper.begin_blocker(&mut ctx).unwrap(), vec![alice.clone()]);
    assert!(h.keeper.begin_blocker(&mut ctx).unwrap().is_empty());

    let info = h.keeper.query_tokenize_share_lock_info(&ctx, &alice).unwrap();
    assert_eq!(info.status, TokenizeShareLockStatus::Unlocked);
    h.tokenize(&mut ctx, &alice, &v, 10, &alice).unwrap();
}

#[test]
fn test_disable_while_expiring_cancels_unlock() {
    let h = Harness::new();
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, header());
    let alice = acc("alice");

    disable(&h, &mut ctx, "alice").unwrap();
    let completion = enable(&h, &mut ctx, "alice").unwrap();
    assert_eq!(
        h.keeper
            .pending_tokenize_share_authorizations(&ctx, completion)
            .unwrap()
            .addresses,
        vec![alice.clone()]
    );

    disable(&h, &mut ctx, "alice").unwrap();
    assert!(h
        .keeper
        .pending_tokenize_share_authorizations(&ctx, completion)
        .unwrap()
        .addresses
        .is_empty());

    ctx.next_block(Duration::days(30));
    assert!(h.keeper.begin_blocker(&mut ctx).unwrap().is_empty());
    let (status, _) = h.keeper.tokenize_shares_lock(&ctx, &alice).unwrap();
    assert_eq!(status, TokenizeShareLockStatus::Locked);
}

#[test]
fn test_sweep_unlocks_every_due_bucket() {
    let h = Harness::new();
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, header());

    for who in ["alice", "bob"] {
        disable(&h, &mut ctx, who).unwrap();
        enable(&h, &mut ctx, who).unwrap();
    }
    ctx.next_block(Duration::hours(1));
    disable(&h, &mut ctx, "carol").unwrap();
    enable(&h, &mut ctx, "carol").unwrap();
    disable(&h, &mut ctx, "dave").unwrap();

    ctx.next_block(Duration::days(22));
    let mut unlocked = h.keeper.begin_blocker(&mut ctx).unwrap();
    unlocked.sort();
    assert_eq!(unlocked, vec![acc("alice"), acc("bob"), acc("carol")]);

    let locks = h.keeper.all_tokenize_shares_locks(&ctx).unwrap();
    assert_eq!(locks.len(), 1);
    assert_eq!(locks[0].address, acc("dave"));
    assert_eq!(locks[0].status, TokenizeShareLockStatus::Locked);
}

#[test]
fn test_lock_messages_through_deliver() {
    let h = Harness::new();
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, header());

    let response = h
        .keeper
        .deliver(
            &mut ctx,
            &LiquidMsg::DisableTokenizeShares(MsgDisableTokenizeShares {
                delegator_address: acc("alice"),
            }),
        )
        .unwrap();
    assert_eq!(response, LiquidResponse::DisableTokenizeShares);

    let response = h
        .keeper
        .deliver(
            &mut ctx,
            &LiquidMsg::EnableTokenizeShares(MsgEnableTokenizeShares {
                delegator_address: acc("alice"),
            }),
        )
        .unwrap();
    assert_eq!(
        response,
        LiquidResponse::EnableTokenizeShares {
            completion_time: genesis_time() + Duration::days(21)
        }
    );
}
