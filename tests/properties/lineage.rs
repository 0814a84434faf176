//! Property-based tests for replacement chains.
//!
//! A chain `h0 -> h1 -> ... -> hN` reported as shuffled replacement events
//! must end up with the same links regardless of delivery order.
use std::sync::Arc;

use proptest::{prelude::*, test_runner::Config};
use tokio::{runtime::Runtime, sync::Mutex};
use watchgod::{
    domain::LineageEngine,
    models::{Network, RecordKey, TransactionEvent, TransactionRecord},
    repositories::{InMemoryTransactionRepository, TransactionRepository},
};

const BURN: &str = "0x9999999999999999999999999999999999999999999999999999999999999999";

fn hash(index: usize) -> String {
    format!("0x{:064x}", index + 1)
}

fn replacement(from: usize, to: usize) -> TransactionEvent {
    TransactionEvent {
        key: RecordKey::new(&hash(from), Network::Main),
        status: "speedup".to_string(),
        from: None,
        to: None,
        data: None,
        block_number: None,
        replace_hash: Some(hash(to)),
    }
}

/// Seeds the root, applies `events` in order and returns every chain record.
async fn run_chain(length: usize, events: Vec<(usize, usize)>) -> Vec<TransactionRecord> {
    let repo = Arc::new(InMemoryTransactionRepository::new());
    let mut root = TransactionRecord::new(&RecordKey::new(&hash(0), Network::Main), "watched", 1);
    root.prev_burn_hash = Some(BURN.to_string());
    repo.upsert(root).await.unwrap();

    let engine = LineageEngine::new(repo.clone(), Arc::new(Mutex::new(())));
    for (from, to) in events {
        engine.apply(replacement(from, to)).await.unwrap();
    }

    let mut records = Vec::with_capacity(length);
    for index in 0..length {
        let key = RecordKey::new(&hash(index), Network::Main);
        records.push(repo.find_by_key(&key).await.unwrap().unwrap());
    }
    records
}

fn shuffled_chain() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (2usize..=6).prop_flat_map(|length| {
        let events: Vec<(usize, usize)> = (0..length - 1).map(|i| (i, i + 1)).collect();
        (Just(length), Just(events).prop_shuffle())
    })
}

proptest! {
  #![proptest_config(Config {
    cases: 64, ..Config::default()
  })]

  #[test]
  fn prop_chain_converges_in_any_order((length, events) in shuffled_chain()) {
      let runtime = Runtime::new().unwrap();
      let records = runtime.block_on(run_chain(length, events));
      let head = hash(length - 1);

      for (index, record) in records.iter().enumerate() {
          prop_assert_eq!(record.prev_burn_hash.as_deref(), Some(BURN));
          if index > 0 {
              prop_assert_eq!(record.old_hash.clone(), Some(hash(index - 1)));
          }
          if index + 1 < length {
              prop_assert_eq!(record.new_hash.as_deref(), Some(head.as_str()));
          }
      }
      prop_assert!(records[length - 1].is_head());
      prop_assert!(records[0].old_hash.is_none());
  }
}
