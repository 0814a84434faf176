//! Property-based tests for request validation and history paging.
use proptest::{prelude::*, test_runner::Config};
use watchgod::{
    constants::MAX_HISTORY_COUNT,
    models::{AppMode, HistoryPage, Network, StatusQuery},
};

fn status_query(hash: String, network: &str) -> StatusQuery {
    StatusQuery {
        hash,
        network: network.to_string(),
    }
}

proptest! {
  #![proptest_config(Config {
    cases: 500, ..Config::default()
  })]

  /// Any 0x-prefixed 64 hex digit hash is accepted and stored lowercase.
  #[test]
  fn prop_well_formed_hash_is_accepted(digits in "[0-9a-fA-F]{64}") {
      let hash = format!("0x{}", digits);
      let key = status_query(hash.clone(), "matic-main")
          .into_key(AppMode::Mainnet)
          .unwrap();

      prop_assert_eq!(key.hash, hash.to_lowercase());
      prop_assert_eq!(key.network, Network::MaticMain);
  }

  #[test]
  fn prop_wrong_length_hash_is_rejected(
    digits in "[0-9a-f]{0,80}".prop_filter("not 64 digits", |d| d.len() != 64)
  ) {
      let result = status_query(format!("0x{}", digits), "main").into_key(AppMode::Mainnet);
      prop_assert!(result.is_err());
  }

  /// Networks outside the running mode are rejected even with a valid hash.
  #[test]
  fn prop_testnet_network_is_rejected_on_mainnet(digits in "[0-9a-f]{64}") {
      let result = status_query(format!("0x{}", digits), "goerli").into_key(AppMode::Mainnet);
      prop_assert!(result.is_err());
  }

  #[test]
  fn prop_history_page_never_exceeds_limit(
    count in proptest::option::of(0usize..10_000),
    skip in proptest::option::of(0usize..10_000)
  ) {
      let page = HistoryPage::new(count, skip);

      prop_assert!(page.count <= MAX_HISTORY_COUNT);
      prop_assert_eq!(page.skip, skip.unwrap_or(0));
      if let Some(count) = count.filter(|c| *c <= MAX_HISTORY_COUNT) {
          prop_assert_eq!(page.count, count);
      }
  }
}
