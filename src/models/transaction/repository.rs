use crate::{
    constants::WATCHED_STATUS,
    models::{Network, RepositoryError, WatchTransaction},
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum TxType {
    Burn,
    Exit,
    Deposit,
    Approve,
    ConfirmWithdraw,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BridgeType {
    Pos,
    Plasma,
    Fx,
}

/// Identity of a record: one row per hash per network.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    pub hash: String,
    pub network: Network,
}

impl RecordKey {
    pub fn new(hash: &str, network: Network) -> Self {
        Self {
            hash: hash.to_lowercase(),
            network,
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.network, self.hash)
    }
}

impl FromStr for RecordKey {
    type Err = RepositoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (network, hash) = s
            .split_once(':')
            .ok_or_else(|| RepositoryError::InvalidData(format!("Malformed record key: {}", s)))?;
        let network = network
            .parse::<Network>()
            .map_err(|_| RepositoryError::InvalidData(format!("Unknown network in key: {}", s)))?;
        Ok(RecordKey::new(hash, network))
    }
}

/// Stored state of one watched transaction.
///
/// `id` and `version` are storage bookkeeping and never leave the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    #[serde(default)]
    pub version: u64,
    pub hash: String,
    pub network: Network,
    pub status: String,
    #[serde(default)]
    pub tx_type: TxType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_burn_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge_type: Option<BridgeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    pub timestamp: i64,
}

/// Field-wise update of a record; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionRecordUpdate {
    pub status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub data: Option<String>,
    pub block_number: Option<u64>,
    pub new_hash: Option<String>,
    pub timestamp: Option<i64>,
}

impl TransactionRecord {
    pub fn new(key: &RecordKey, status: &str, timestamp: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            version: 0,
            hash: key.hash.clone(),
            network: key.network,
            status: status.to_string(),
            tx_type: TxType::default(),
            prev_burn_hash: None,
            old_hash: None,
            new_hash: None,
            from: None,
            to: None,
            contract_address: None,
            root_token: None,
            bridge_type: None,
            amount: None,
            data: None,
            block_number: None,
            timestamp,
        }
    }

    /// Builds the record written by a watch registration.
    ///
    /// An existing record keeps its identity, lineage pointers and any field
    /// the registration does not supply; status goes back to `watched`.
    pub fn registered(existing: Option<Self>, watch: &WatchTransaction, timestamp: i64) -> Self {
        let mut record =
            existing.unwrap_or_else(|| Self::new(&watch.key, WATCHED_STATUS, timestamp));

        record.status = WATCHED_STATUS.to_string();
        record.timestamp = timestamp;
        if let Some(tx_type) = watch.tx_type {
            record.tx_type = tx_type;
        }
        if let Some(prev_burn_hash) = &watch.prev_burn_hash {
            record.prev_burn_hash = Some(prev_burn_hash.clone());
        }
        if let Some(bridge_type) = watch.bridge_type {
            record.bridge_type = Some(bridge_type);
        }
        if let Some(root_token) = &watch.root_token {
            record.root_token = Some(root_token.clone());
        }
        if let Some(contract_address) = &watch.contract_address {
            record.contract_address = Some(contract_address.clone());
        }
        if let Some(amount) = &watch.amount {
            record.amount = Some(amount.clone());
        }
        record
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(&self.hash, self.network)
    }

    /// A record is the head of its chain while nothing has superseded it.
    pub fn is_head(&self) -> bool {
        self.new_hash.is_none()
    }

    pub fn apply_partial_update(&mut self, update: TransactionRecordUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(from) = update.from {
            self.from = Some(from);
        }
        if let Some(to) = update.to {
            self.to = Some(to);
        }
        if let Some(data) = update.data {
            self.data = Some(data);
        }
        if let Some(block_number) = update.block_number {
            self.block_number = Some(block_number);
        }
        if let Some(new_hash) = update.new_hash {
            self.new_hash = Some(new_hash);
        }
        if let Some(timestamp) = update.timestamp {
            self.timestamp = timestamp;
        }
    }

    /// Textual value of a client-visible field, as used by history filters.
    pub fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "hash" => Some(self.hash.clone()),
            "network" => Some(self.network.to_string()),
            "status" => Some(self.status.clone()),
            "txType" => Some(self.tx_type.to_string()),
            "prevBurnHash" => self.prev_burn_hash.clone(),
            "oldHash" => self.old_hash.clone(),
            "newHash" => self.new_hash.clone(),
            "from" => self.from.clone(),
            "to" => self.to.clone(),
            "contractAddress" => self.contract_address.clone(),
            "rootToken" => self.root_token.clone(),
            "bridgeType" => self.bridge_type.map(|b| b.to_string()),
            "amount" => self.amount.clone(),
            "data" => self.data.clone(),
            "blockNumber" => self.block_number.map(|n| n.to_string()),
            "timestamp" => Some(self.timestamp.to_string()),
            _ => None,
        }
    }

    /// Equality match against every `(field, value)` pair.
    pub fn matches<'a, I>(&self, filters: I) -> bool
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        filters
            .into_iter()
            .all(|(field, value)| self.field_value(field).as_deref() == Some(value.as_str()))
    }
}
