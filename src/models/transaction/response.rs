use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{BridgeType, Network, TransactionRecord, TxType};

/// Client view of a tracked transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub hash: String,
    pub network: Network,
    pub status: String,
    pub tx_type: TxType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_burn_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bridge_type: Option<BridgeType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    pub timestamp: i64,
}

impl From<TransactionRecord> for TransactionResponse {
    fn from(record: TransactionRecord) -> Self {
        Self {
            hash: record.hash,
            network: record.network,
            status: record.status,
            tx_type: record.tx_type,
            prev_burn_hash: record.prev_burn_hash,
            old_hash: record.old_hash,
            new_hash: record.new_hash,
            from: record.from,
            to: record.to,
            contract_address: record.contract_address,
            root_token: record.root_token,
            bridge_type: record.bridge_type,
            amount: record.amount,
            data: record.data,
            block_number: record.block_number,
            timestamp: record.timestamp,
        }
    }
}
