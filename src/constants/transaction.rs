/// Status given to a freshly registered transaction.
pub const WATCHED_STATUS: &str = "watched";

/// Blockchain identifier sent with every watch request.
pub const NOTIFIER_BLOCKCHAIN: &str = "ethereum";

/// Path of the notifier endpoint that accepts watch requests.
pub const NOTIFIER_WATCH_PATH: &str = "/transaction";

pub const DEFAULT_HISTORY_COUNT: usize = 10;
pub const MAX_HISTORY_COUNT: usize = 20;

/// Query parameters of `/history` that control paging instead of filtering.
pub const HISTORY_PAGINATION_KEYS: &[&str] = &["count", "skip"];

/// Upper bound on the number of forward links followed while resolving the
/// head of a lineage chain.
pub const MAX_LINEAGE_DEPTH: usize = 64;

/// Record fields that may be used as equality filters on `/history`.
pub const FILTERABLE_FIELDS: &[&str] = &[
    "hash",
    "network",
    "status",
    "txType",
    "prevBurnHash",
    "oldHash",
    "newHash",
    "from",
    "to",
    "contractAddress",
    "rootToken",
    "bridgeType",
    "amount",
    "data",
    "blockNumber",
    "timestamp",
];

/// Filterable fields holding hashes or addresses, stored lowercase.
pub const LOWERCASE_FIELDS: &[&str] = &[
    "hash",
    "prevBurnHash",
    "oldHash",
    "newHash",
    "from",
    "to",
    "contractAddress",
    "rootToken",
];
