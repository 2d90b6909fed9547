//! Record ownership transfer and reward withdrawal

mod common;

use common::*;
use lsm_core::ValAddress;
use lsm_host::mock::keys;
use lsm_host::{BankKeeper, BondStatus};
use lsm_liquid::events::{ATTRIBUTE_KEY_SENDER, ATTRIBUTE_KEY_SHARE_OWNER, EVENT_TYPE_TRANSFER_TOKENIZE_SHARE_RECORD, EVENT_TYPE_WITHDRAW_TOKENIZE_SHARE_REWARD};
use lsm_liquid::msgs::{
    LiquidMsg, MsgTransferTokenizeShareRecord, MsgWithdrawAllTokenizeShareRecordReward,
    MsgWithdrawTokenizeShareRecordReward,
};
use lsm_liquid::{LiquidError, LiquidResponse};
use lsm_store::{Context, MemStore};
use rust_decimal_macros::dec;

/// alice delegates 100 to a bonded validator and tokenizes `amounts`, each
/// record owned by bob
fn setup(h: &Harness, ctx: &mut Context<'_>, amounts: &[u128]) -> ValAddress {
    let alice = acc("alice");
    let v = h.create_validator(ctx, "valoper1", BondStatus::Bonded);
    h.delegate(ctx, &alice, &v, 100);
    for amount in amounts {
        h.tokenize(ctx, &alice, &v, *amount, &acc("bob")).unwrap();
    }
    v
}

fn allocate(h: &Harness, ctx: &mut Context<'_>, record_id: u64, amount: u128) {
    let record = h.keeper.tokenize_share_record(ctx, record_id).unwrap();
    h.host
        .allocate_rewards(ctx, &record.module_address(), &record.validator, &stake_coins(amount))
        .unwrap();
}

#[test]
fn test_transfer_record() {
    let h = Harness::new();
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, header());
    setup(&h, &mut ctx, &[10]);
    let (bob, carol) = (acc("bob"), acc("carol"));

    let transfer = |sender: &str, id: u64| {
        LiquidMsg::TransferTokenizeShareRecord(MsgTransferTokenizeShareRecord {
            tokenize_share_record_id: id,
            sender: acc(sender),
            new_owner: acc("carol"),
        })
    };

    assert!(matches!(
        h.keeper.deliver(&mut ctx, &transfer("alice", 1)),
        Err(LiquidError::NotTokenizeShareRecordOwner { record_id: 1, .. })
    ));
    assert!(matches!(
        h.keeper.deliver(&mut ctx, &transfer("bob", 99)),
        Err(LiquidError::TokenizeShareRecordNotExists(_))
    ));

    let response = h.keeper.deliver(&mut ctx, &transfer("bob", 1)).unwrap();
    assert_eq!(response, LiquidResponse::TransferTokenizeShareRecord);
    assert_eq!(h.keeper.tokenize_share_record(&ctx, 1).unwrap().owner, carol);
    assert!(h.keeper.tokenize_share_records_by_owner(&ctx, &bob).unwrap().is_empty());
    assert_eq!(h.keeper.tokenize_share_records_by_owner(&ctx, &carol).unwrap().len(), 1);

    let event = ctx.events().last().unwrap();
    assert_eq!(event.kind, EVENT_TYPE_TRANSFER_TOKENIZE_SHARE_RECORD);
    assert_eq!(event.attribute(ATTRIBUTE_KEY_SENDER), Some("bob"));
    assert_eq!(event.attribute(ATTRIBUTE_KEY_SHARE_OWNER), Some("carol"));
}

#[test]
fn test_withdraw_single_record_reward() {
    let h = Harness::new();
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, header());
    setup(&h, &mut ctx, &[40]);
    let bob = acc("bob");
    allocate(&h, &mut ctx, 1, 7);

    let pending = h.keeper.query_tokenize_share_record_reward(&ctx, &bob).unwrap();
    assert_eq!(pending.rewards.len(), 1);
    assert_eq!(pending.rewards[0].record_id, 1);
    assert_eq!(pending.total.amount_of("stake"), dec!(7));

    let not_owner = LiquidMsg::WithdrawTokenizeShareRecordReward(MsgWithdrawTokenizeShareRecordReward {
        owner_address: acc("alice"),
        record_id: 1,
    });
    assert!(matches!(
        h.keeper.deliver(&mut ctx, &not_owner),
        Err(LiquidError::NotTokenizeShareRecordOwner { .. })
    ));

    let msg = LiquidMsg::WithdrawTokenizeShareRecordReward(MsgWithdrawTokenizeShareRecordReward {
        owner_address: bob.clone(),
        record_id: 1,
    });
    let response = h.keeper.deliver(&mut ctx, &msg).unwrap();
    assert_eq!(
        response,
        LiquidResponse::WithdrawTokenizeShareRecordReward { amount: stake_coins(7) }
    );
    assert_eq!(h.host.balance(&ctx, &bob, "stake").unwrap().amount, 7);
    assert!(h
        .keeper
        .query_tokenize_share_record_reward(&ctx, &bob)
        .unwrap()
        .total
        .is_empty());
}

#[test]
fn test_withdraw_all_record_rewards() {
    let h = Harness::new();
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, header());
    setup(&h, &mut ctx, &[40, 10]);
    let bob = acc("bob");
    allocate(&h, &mut ctx, 1, 3);
    allocate(&h, &mut ctx, 2, 2);

    let msg = LiquidMsg::WithdrawAllTokenizeShareRecordReward(MsgWithdrawAllTokenizeShareRecordReward {
        owner_address: bob.clone(),
    });
    let response = h.keeper.deliver(&mut ctx, &msg).unwrap();
    assert_eq!(
        response,
        LiquidResponse::WithdrawAllTokenizeShareRecordReward { amount: stake_coins(5) }
    );
    assert_eq!(h.host.balance(&ctx, &bob, "stake").unwrap().amount, 5);

    let event = ctx.events().last().unwrap();
    assert_eq!(event.kind, EVENT_TYPE_WITHDRAW_TOKENIZE_SHARE_REWARD);
    assert_eq!(event.attribute("amount"), Some("5stake"));
}

#[test]
fn test_withdraw_all_continues_past_failing_record() {
    let h = Harness::new();
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, header());
    let v = setup(&h, &mut ctx, &[40, 10]);
    let bob = acc("bob");
    allocate(&h, &mut ctx, 1, 3);
    allocate(&h, &mut ctx, 2, 2);

    // the second custodian's delegation no longer decodes
    let broken = h.keeper.tokenize_share_record(&ctx, 2).unwrap();
    ctx.store_mut()
        .set(&keys::delegation_key(&broken.module_address(), &v), b"garbage".to_vec());

    let withdrawn = h.keeper.withdraw_all_tokenize_share_record_reward(&mut ctx, &bob).unwrap();
    assert_eq!(withdrawn, stake_coins(3));
    assert_eq!(h.host.balance(&ctx, &bob, "stake").unwrap().amount, 3);
}

#[test]
fn test_blocked_owner_cannot_withdraw() {
    let h = Harness::new();
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, header());
    setup(&h, &mut ctx, &[40]);
    let bob = acc("bob");
    allocate(&h, &mut ctx, 1, 7);
    h.host.block_address(&mut ctx, &bob);

    assert!(matches!(
        h.keeper.withdraw_tokenize_share_record_reward(&mut ctx, &bob, 1),
        Err(LiquidError::Unauthorized(_))
    ));
    assert!(matches!(
        h.keeper.withdraw_all_tokenize_share_record_reward(&mut ctx, &bob),
        Err(LiquidError::Unauthorized(_))
    ));
}

#[test]
fn test_final_redeem_pays_rewards_to_owner() {
    let h = Harness::new();
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, header());
    setup(&h, &mut ctx, &[40]);
    let (alice, bob) = (acc("alice"), acc("bob"));
    allocate(&h, &mut ctx, 1, 7);
    let custodian = h.keeper.tokenize_share_record(&ctx, 1).unwrap().module_address();

    let share_token = lsm_core::Coin::new("valoper1/1", 40).unwrap();
    h.redeem(&mut ctx, &alice, share_token).unwrap();

    // the rewards settled into the custodian on unbond and went to the owner
    assert_eq!(h.host.balance(&ctx, &bob, "stake").unwrap().amount, 7);
    assert!(h.host.all_balances(&ctx, &custodian).unwrap().is_empty());
    assert!(h.keeper.tokenize_share_record(&ctx, 1).is_err());
}
