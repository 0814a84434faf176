use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// A 32-byte transaction digest: `0x` followed by 64 hex characters.
    pub static ref TX_HASH_REGEX: Regex = Regex::new(r"^0x[A-Fa-f0-9]{64}$").unwrap();
    /// A 20-byte account or contract address.
    pub static ref ADDRESS_REGEX: Regex = Regex::new(r"^0x[A-Fa-f0-9]{40}$").unwrap();
    /// Unsigned decimal amount, kept as text.
    pub static ref AMOUNT_REGEX: Regex = Regex::new(r"^[0-9]+(\.[0-9]+)?$").unwrap();
}
