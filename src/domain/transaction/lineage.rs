//! Lineage engine for notifier webhook events.
//!
//! A plain status event updates one record in place. A replacement event
//! (`hash` superseded by `replaceHash`) rewrites the neighbourhood of the
//! chain: the predecessor, the successor, older links still pointing at the
//! superseded hash, and any successors of `replaceHash` that were recorded
//! before this event arrived. The whole neighbourhood is read first, the new
//! state is planned in memory and then committed as one batch, so chains
//! converge to the same shape whatever order their events arrive in.
use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};

use log::{debug, info, warn};
use tokio::sync::Mutex;

use crate::{
    constants::MAX_LINEAGE_DEPTH,
    metrics::LINEAGE_EVENTS,
    models::{
        Network, RecordKey, TransactionError, TransactionEvent, TransactionRecord,
        TransactionRecordUpdate,
    },
    repositories::TransactionRepository,
    utils::now_millis,
};

/// What an applied event did to storage.
#[derive(Debug, Clone, PartialEq)]
pub enum LineageOutcome {
    /// No record exists for the reported hash; nothing was written.
    NotTracked,
    Updated(TransactionRecord),
    Replaced { head: String, written: usize },
}

impl LineageOutcome {
    fn kind(&self) -> &'static str {
        match self {
            LineageOutcome::NotTracked => "not_tracked",
            LineageOutcome::Updated(_) => "simple",
            LineageOutcome::Replaced { .. } => "replacement",
        }
    }
}

/// Records around a replacement, read before anything is written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineageSnapshot {
    /// Record of the superseded hash.
    pub predecessor: Option<TransactionRecord>,
    /// Record of the replacement hash, when an earlier event already created it.
    pub successor: Option<TransactionRecord>,
    /// Other records whose `newHash` still names the superseded hash.
    pub stale_links: Vec<TransactionRecord>,
    /// Records reached by following `oldHash` links forward from the replacement hash.
    pub descendants: Vec<TransactionRecord>,
}

/// Record states a replacement commits.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplacementPlan {
    pub head: String,
    pub writes: Vec<TransactionRecord>,
}

/// Newest hash of the chain once `replace_hash` supersedes its predecessor.
pub fn resolve_head(replace_hash: &str, snapshot: &LineageSnapshot) -> String {
    match snapshot.descendants.last() {
        Some(last) => last.new_hash.clone().unwrap_or_else(|| last.hash.clone()),
        None => snapshot
            .successor
            .as_ref()
            .and_then(|successor| successor.new_hash.clone())
            .unwrap_or_else(|| replace_hash.to_string()),
    }
}

/// Computes every record write for `event` superseding its hash with `replace_hash`.
pub fn plan_replacement(
    event: &TransactionEvent,
    replace_hash: &str,
    snapshot: LineageSnapshot,
    timestamp: i64,
) -> Result<ReplacementPlan, TransactionError> {
    let origin = event.key.hash.as_str();
    let head = resolve_head(replace_hash, &snapshot);

    if replace_hash == origin
        || head == origin
        || snapshot.descendants.iter().any(|d| d.hash == origin)
    {
        return Err(TransactionError::LineageCycle(format!(
            "{} cannot be replaced by {}",
            origin, replace_hash
        )));
    }

    let LineageSnapshot {
        predecessor,
        successor,
        stale_links,
        descendants,
    } = snapshot;
    let successor_key = RecordKey::new(replace_hash, event.key.network);
    let mut writes: BTreeMap<RecordKey, TransactionRecord> = BTreeMap::new();

    let inherited_burn_hash = predecessor
        .as_ref()
        .and_then(|p| p.prev_burn_hash.clone())
        .or_else(|| successor.as_ref().and_then(|s| s.prev_burn_hash.clone()));

    let mut next = match successor {
        Some(existing) => existing,
        None => {
            let mut created = TransactionRecord::new(&successor_key, &event.status, timestamp);
            if let Some(p) = &predecessor {
                created.tx_type = p.tx_type;
                created.bridge_type = p.bridge_type;
                created.root_token = p.root_token.clone();
                created.amount = p.amount.clone();
                created.contract_address = p.contract_address.clone();
            }
            created
        }
    };

    if let Some(mut previous) = predecessor {
        previous.status = event.status.clone();
        previous.new_hash = Some(head.clone());
        previous.timestamp = timestamp;
        writes.insert(previous.key(), previous);
    }

    next.old_hash = Some(origin.to_string());
    next.prev_burn_hash = inherited_burn_hash;
    next.apply_partial_update(TransactionRecordUpdate {
        status: Some(event.status.clone()),
        from: event.from.clone(),
        to: event.to.clone(),
        data: event.data.clone(),
        block_number: event.block_number,
        new_hash: (head != replace_hash).then(|| head.clone()),
        timestamp: Some(timestamp),
    });
    let burn_hash = next.prev_burn_hash.clone();
    writes.insert(successor_key.clone(), next);

    for mut link in stale_links {
        let key = link.key();
        if key == event.key || key == successor_key {
            continue;
        }
        link.status = event.status.clone();
        link.new_hash = Some(head.clone());
        link.timestamp = timestamp;
        writes.insert(key, link);
    }

    if let Some(burn_hash) = burn_hash {
        for descendant in descendants {
            if descendant.prev_burn_hash.as_deref() == Some(burn_hash.as_str()) {
                continue;
            }
            let record = writes.entry(descendant.key()).or_insert(descendant);
            record.prev_burn_hash = Some(burn_hash.clone());
            record.timestamp = timestamp;
        }
    }

    Ok(ReplacementPlan {
        head,
        writes: writes.into_values().collect(),
    })
}

pub struct LineageEngine<TR>
where
    TR: TransactionRepository + Send + Sync + 'static,
{
    repository: Arc<TR>,
    guard: Arc<Mutex<()>>,
}

impl<TR> LineageEngine<TR>
where
    TR: TransactionRepository + Send + Sync + 'static,
{
    pub fn new(repository: Arc<TR>, guard: Arc<Mutex<()>>) -> Self {
        Self { repository, guard }
    }

    /// Applies one notifier event while holding the lineage guard.
    pub async fn apply(&self, event: TransactionEvent) -> Result<LineageOutcome, TransactionError> {
        let network: &'static str = event.key.network.into();
        let _guard = self.guard.lock().await;

        let result = match event.replace_hash.clone() {
            Some(replace_hash) => self.apply_replacement(&event, &replace_hash).await,
            None => self.apply_status(event).await,
        };

        let kind = match &result {
            Ok(outcome) => outcome.kind(),
            Err(TransactionError::LineageCycle(_)) => "cycle",
            Err(TransactionError::LineageTooDeep(_)) => "too_deep",
            Err(_) => "failed",
        };
        LINEAGE_EVENTS.with_label_values(&[network, kind]).inc();
        result
    }

    async fn apply_status(
        &self,
        event: TransactionEvent,
    ) -> Result<LineageOutcome, TransactionError> {
        let update = TransactionRecordUpdate {
            status: Some(event.status),
            from: event.from,
            to: event.to,
            data: event.data,
            block_number: event.block_number,
            new_hash: None,
            timestamp: Some(now_millis()),
        };

        match self.repository.partial_update(&event.key, update).await? {
            Some(record) => {
                debug!("Updated {} to status {}", event.key, record.status);
                Ok(LineageOutcome::Updated(record))
            }
            None => {
                debug!("Ignoring event for untracked transaction {}", event.key);
                Ok(LineageOutcome::NotTracked)
            }
        }
    }

    async fn apply_replacement(
        &self,
        event: &TransactionEvent,
        replace_hash: &str,
    ) -> Result<LineageOutcome, TransactionError> {
        if replace_hash == event.key.hash {
            return Err(TransactionError::LineageCycle(format!(
                "{} cannot replace itself",
                replace_hash
            )));
        }

        let snapshot = self.load_snapshot(&event.key, replace_hash).await?;
        let plan = plan_replacement(event, replace_hash, snapshot, now_millis())?;
        let written = plan.writes.len();
        self.repository.save_all(plan.writes).await?;

        info!(
            "Transaction {} replaced by {} on {}, chain head {}",
            event.key.hash, replace_hash, event.key.network, plan.head
        );
        Ok(LineageOutcome::Replaced {
            head: plan.head,
            written,
        })
    }

    /// Reads every record a replacement of `key` by `replace_hash` may touch.
    pub async fn load_snapshot(
        &self,
        key: &RecordKey,
        replace_hash: &str,
    ) -> Result<LineageSnapshot, TransactionError> {
        let predecessor = self.repository.find_by_key(key).await?;
        let successor = self
            .repository
            .find_by_key(&RecordKey::new(replace_hash, key.network))
            .await?;
        let stale_links = self
            .repository
            .find_by_new_hash(key.network, &key.hash)
            .await?
            .into_iter()
            .filter(|r| r.hash != key.hash && r.hash != replace_hash)
            .collect();
        let descendants = self
            .walk_descendants(key.network, replace_hash, &key.hash)
            .await?;

        Ok(LineageSnapshot {
            predecessor,
            successor,
            stale_links,
            descendants,
        })
    }

    /// Follows `oldHash` links forward from `start`, taking the newest record
    /// at each step. Stops at the end of the chain, on a revisit, or when
    /// `origin` is reached. Chains with more than `MAX_LINEAGE_DEPTH` records
    /// after `start` fail with `LineageTooDeep`.
    async fn walk_descendants(
        &self,
        network: Network,
        start: &str,
        origin: &str,
    ) -> Result<Vec<TransactionRecord>, TransactionError> {
        let mut descendants = Vec::new();
        let mut visited: HashSet<String> = HashSet::from([start.to_string()]);
        let mut current = start.to_string();

        loop {
            let next = self
                .repository
                .find_by_old_hash(network, &current)
                .await?
                .into_iter()
                .max_by(|a, b| {
                    a.timestamp
                        .cmp(&b.timestamp)
                        .then_with(|| b.hash.cmp(&a.hash))
                });
            let Some(next) = next else {
                return Ok(descendants);
            };
            if !visited.insert(next.hash.clone()) {
                warn!("Lineage loop at {} on {}", next.hash, network);
                return Ok(descendants);
            }
            if descendants.len() == MAX_LINEAGE_DEPTH {
                warn!(
                    "Lineage from {} on {} is deeper than {} records",
                    start, network, MAX_LINEAGE_DEPTH
                );
                return Err(TransactionError::LineageTooDeep(format!(
                    "{} has more than {} successors",
                    start, MAX_LINEAGE_DEPTH
                )));
            }

            let reached_origin = next.hash == origin;
            current = next.hash.clone();
            descendants.push(next);
            if reached_origin {
                return Ok(descendants);
            }
        }
    }
}
