//! Request bodies and query strings accepted by the transaction endpoints,
//! and the validated commands they turn into.
use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    constants::{
        ADDRESS_REGEX, AMOUNT_REGEX, FILTERABLE_FIELDS, HISTORY_PAGINATION_KEYS,
        LOWERCASE_FIELDS, TX_HASH_REGEX,
    },
    models::{
        AppMode, BridgeType, HistoryPage, Network, RecordKey, SecretString, TransactionError,
        TxType,
    },
};

fn validate_tx_hash(value: &str) -> Result<(), ValidationError> {
    if !TX_HASH_REGEX.is_match(value) {
        return Err(ValidationError::new("tx_hash")
            .with_message("must be 0x followed by 64 hex characters".into()));
    }
    Ok(())
}

fn validate_address(value: &str) -> Result<(), ValidationError> {
    if !ADDRESS_REGEX.is_match(value) {
        return Err(ValidationError::new("address")
            .with_message("must be 0x followed by 40 hex characters".into()));
    }
    Ok(())
}

fn validate_amount(value: &str) -> Result<(), ValidationError> {
    if !AMOUNT_REGEX.is_match(value) {
        return Err(ValidationError::new("amount").with_message("must be a decimal number".into()));
    }
    Ok(())
}

fn network_error(mode: AppMode) -> ValidationError {
    let allowed = mode
        .networks()
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    ValidationError::new("network").with_message(format!("must be one of: {}", allowed).into())
}

/// Runs the derived validators and the mode-dependent network check together
/// so the client sees every problem at once.
fn validate_with_network<T: Validate>(
    request: &T,
    network: &str,
    mode: AppMode,
) -> Result<Network, TransactionError> {
    let mut errors = request.validate().err().unwrap_or_else(ValidationErrors::new);
    let parsed = mode.parse_network(network);
    if parsed.is_none() {
        errors.add("network", network_error(mode));
    }
    match parsed {
        Some(network) if errors.errors().is_empty() => Ok(network),
        _ => Err(errors.into()),
    }
}

fn lowercase(value: Option<String>) -> Option<String> {
    value.map(|v| v.to_lowercase())
}

/// Body of `POST /watch`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WatchTransactionRequest {
    #[validate(custom(function = "validate_tx_hash"))]
    #[schema(example = "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060")]
    pub hash: String,
    #[schema(example = "main")]
    pub network: String,
    pub tx_type: Option<TxType>,
    #[validate(custom(function = "validate_tx_hash"))]
    pub prev_burn_hash: Option<String>,
    pub bridge_type: Option<BridgeType>,
    #[validate(custom(function = "validate_address"))]
    pub root_token: Option<String>,
    #[validate(custom(function = "validate_address"))]
    pub contract_address: Option<String>,
    #[validate(custom(function = "validate_amount"))]
    pub amount: Option<String>,
}

/// A registration that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchTransaction {
    pub key: RecordKey,
    pub tx_type: Option<TxType>,
    pub prev_burn_hash: Option<String>,
    pub bridge_type: Option<BridgeType>,
    pub root_token: Option<String>,
    pub contract_address: Option<String>,
    pub amount: Option<String>,
}

impl WatchTransactionRequest {
    pub fn into_command(self, mode: AppMode) -> Result<WatchTransaction, TransactionError> {
        let network = validate_with_network(&self, &self.network, mode)?;
        Ok(WatchTransaction {
            key: RecordKey::new(&self.hash, network),
            tx_type: self.tx_type,
            prev_burn_hash: lowercase(self.prev_burn_hash),
            bridge_type: self.bridge_type,
            root_token: lowercase(self.root_token),
            contract_address: lowercase(self.contract_address),
            amount: self.amount,
        })
    }
}

/// Body the notifier posts to `POST /update`.
///
/// Fields the notifier sends beyond these are ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEventRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub api_key: Option<SecretString>,
    #[validate(custom(function = "validate_tx_hash"))]
    pub hash: String,
    pub network: String,
    #[validate(length(min = 1, message = "cannot be empty"))]
    pub status: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub input: Option<String>,
    pub block_number: Option<u64>,
    #[validate(custom(function = "validate_tx_hash"))]
    pub replace_hash: Option<String>,
}

/// A webhook event that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionEvent {
    pub key: RecordKey,
    pub status: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub data: Option<String>,
    pub block_number: Option<u64>,
    pub replace_hash: Option<String>,
}

impl TransactionEventRequest {
    /// Whether the body carries the expected webhook secret.
    pub fn is_authorized(&self, secret: &SecretString) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|key| key.as_str(|k| secret.matches(k)))
    }

    pub fn into_command(self, mode: AppMode) -> Result<TransactionEvent, TransactionError> {
        let network = validate_with_network(&self, &self.network, mode)?;
        Ok(TransactionEvent {
            key: RecordKey::new(&self.hash, network),
            status: self.status,
            from: lowercase(self.from),
            to: lowercase(self.to),
            data: self.input,
            block_number: self.block_number,
            replace_hash: lowercase(self.replace_hash),
        })
    }
}

/// Query string of `GET /status`.
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusQuery {
    /// Transaction hash
    #[validate(custom(function = "validate_tx_hash"))]
    pub hash: String,
    /// Network the transaction was watched on
    pub network: String,
}

impl StatusQuery {
    pub fn into_key(self, mode: AppMode) -> Result<RecordKey, TransactionError> {
        let network = validate_with_network(&self, &self.network, mode)?;
        Ok(RecordKey::new(&self.hash, network))
    }
}

/// Parsed `GET /history` query: sender, equality filters and page window.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryFilter {
    pub from: String,
    pub filters: BTreeMap<String, String>,
    pub page: HistoryPage,
}

impl HistoryFilter {
    pub fn from_query(mut params: HashMap<String, String>) -> Result<Self, TransactionError> {
        let from = params
            .remove("from")
            .filter(|from| !from.trim().is_empty())
            .ok_or_else(|| TransactionError::ValidationError("from: is required".to_string()))?;

        let count = take_number(&mut params, HISTORY_PAGINATION_KEYS[0])?;
        let skip = take_number(&mut params, HISTORY_PAGINATION_KEYS[1])?;

        let mut filters = BTreeMap::new();
        for (field, value) in params {
            if !FILTERABLE_FIELDS.contains(&field.as_str()) {
                return Err(TransactionError::ValidationError(format!(
                    "{}: unknown filter field",
                    field
                )));
            }
            let value = if LOWERCASE_FIELDS.contains(&field.as_str()) {
                value.to_lowercase()
            } else {
                value
            };
            filters.insert(field, value);
        }

        Ok(Self {
            from: from.to_lowercase(),
            filters,
            page: HistoryPage::new(count, skip),
        })
    }
}

fn take_number(
    params: &mut HashMap<String, String>,
    key: &str,
) -> Result<Option<usize>, TransactionError> {
    params
        .remove(key)
        .map(|raw| {
            raw.parse::<usize>().map_err(|_| {
                TransactionError::ValidationError(format!("{}: must be a non-negative integer", key))
            })
        })
        .transpose()
}
