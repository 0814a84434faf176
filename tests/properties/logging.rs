//! Property-based tests for the rolled log file naming.
//!
//!   Refer to `src/logging/mod.rs` for more details.
use proptest::{prelude::*, test_runner::Config};
use watchgod::logging::compute_rolled_file_path;

proptest! {
  #![proptest_config(Config {
    cases: 500, ..Config::default()
  })]

  /// A trailing ".log" is moved after the date and index.
  #[test]
  fn prop_rolled_path_replaces_log_suffix(
    base in "[a-z/_-]{1,30}",
    date in "[0-9]{4}-[0-9]{2}-[0-9]{2}",
    index in 1u32..1000
  ) {
      let result = compute_rolled_file_path(&format!("{}.log", base), &date, index);
      prop_assert_eq!(result, format!("{}-{}.{}.log", base, date, index));
  }

  /// Any other base keeps its full name in front of the date.
  #[test]
  fn prop_rolled_path_without_log_suffix(
    base in ".*",
    date in "[0-9]{4}-[0-9]{2}-[0-9]{2}"
  ) {
      let base = if base.ends_with(".log") { format!("{}x", base) } else { base };
      let result = compute_rolled_file_path(&base, &date, 1);
      prop_assert!(result.ends_with(".1.log"));
      prop_assert_eq!(result, format!("{}-{}.1.log", base, date));
  }
}
