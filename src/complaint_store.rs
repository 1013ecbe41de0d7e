//! Complaint Store abstraction for bid id idempotency.
//!
//! A bid id is accepted at most once. The store holds the append-only set of
//! recorded bid ids together with the submission that recorded them.
//!
//! # Architecture
//!
//! ```text
//! ComplaintVerifier
//!        |
//!        v
//! ComplaintStore (trait) <-- DynamoComplaintStore, MemoryComplaintStore
//!        |
//!        v
//! DynamoDB (production) / HashMap (development)
//! ```
//!
//! # DynamoDB Schema
//!
//! Table: named by COMPLAINT_STORE_TABLE_NAME; when unset the in-memory store is used
//!
//! | Attribute | Type | Description |
//! |-----------|------|-------------|
//! | pk | S | Partition key: bid id as `0x`-prefixed hex |
//! | domain_name | S | TerminusDID domain of the submitter |
//! | submitter | S | Recovered signer address |
//! | complaint | S | Complaint as JSON |
//! | created_at | N | Unix timestamp when the complaint was recorded |
//!
//! Entries never expire.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use alloy::primitives::Address;

use crate::types::{BidId, Complaint};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during complaint store operations.
#[derive(Debug, thiserror::Error)]
pub enum ComplaintStoreError {
    /// Bid id has already been recorded (replay attempt)
    #[error("Bid id already recorded: {0}")]
    AlreadyRecorded(BidId),

    /// Failed to connect to storage backend
    #[error("Storage connection failed: {0}")]
    ConnectionFailed(String),

    /// Failed to read from storage
    #[error("Read error: {0}")]
    ReadError(String),

    /// Failed to write to storage
    #[error("Write error: {0}")]
    WriteError(String),

    /// Record could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// ============================================================================
// Complaint Record
// ============================================================================

/// An accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintRecord {
    pub bid_id: BidId,
    pub complaint: Complaint,
    pub domain_name: String,
    pub submitter: Address,
    /// Unix timestamp when the record was written
    pub created_at: u64,
}

impl ComplaintRecord {
    pub fn new(bid_id: BidId, complaint: Complaint, domain_name: String, submitter: Address) -> Self {
        Self {
            bid_id,
            complaint,
            domain_name,
            submitter,
            created_at: current_timestamp(),
        }
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

// ============================================================================
// Complaint Store Trait
// ============================================================================

/// Trait for persistent storage of recorded complaints.
///
/// Implementations must be thread-safe and provide an atomic insert-if-absent
/// so that two concurrent submissions of the same complaint cannot both pass
/// the duplicate check.
#[async_trait]
pub trait ComplaintStore: Send + Sync + std::fmt::Debug {
    /// Atomically record `record` unless its bid id is already present.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Bid id was unseen and is now recorded
    /// * `Err(AlreadyRecorded)` - Bid id was recorded before; nothing changed
    /// * `Err(...)` - Storage error; nothing changed
    async fn record_if_absent(&self, record: &ComplaintRecord) -> Result<(), ComplaintStoreError>;

    /// Check if a bid id has been recorded (read-only).
    async fn contains(&self, bid_id: &BidId) -> Result<bool, ComplaintStoreError>;

    /// Check if the store is healthy and accessible.
    async fn health_check(&self) -> Result<(), ComplaintStoreError>;

    /// Get the store type name for logging.
    fn store_type(&self) -> &'static str;
}

// ============================================================================
// In-Memory Store (for development/testing)
// ============================================================================

/// In-memory complaint store for development and testing.
///
/// Does not persist data across restarts, so a complaint accepted before a
/// restart can be accepted again afterwards.
#[derive(Debug, Default)]
pub struct MemoryComplaintStore {
    data: Arc<RwLock<HashMap<BidId, ComplaintRecord>>>,
}

impl MemoryComplaintStore {
    /// Create a new empty in-memory complaint store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the record for a bid id.
    pub async fn get(&self, bid_id: &BidId) -> Option<ComplaintRecord> {
        self.data.read().await.get(bid_id).cloned()
    }

    /// Number of recorded complaints.
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

#[async_trait]
impl ComplaintStore for MemoryComplaintStore {
    async fn record_if_absent(&self, record: &ComplaintRecord) -> Result<(), ComplaintStoreError> {
        let mut data = self.data.write().await;

        if data.contains_key(&record.bid_id) {
            return Err(ComplaintStoreError::AlreadyRecorded(record.bid_id));
        }

        data.insert(record.bid_id, record.clone());
        debug!(bid_id = %record.bid_id, "Recorded complaint (memory)");
        Ok(())
    }

    async fn contains(&self, bid_id: &BidId) -> Result<bool, ComplaintStoreError> {
        Ok(self.data.read().await.contains_key(bid_id))
    }

    async fn health_check(&self) -> Result<(), ComplaintStoreError> {
        Ok(())
    }

    fn store_type(&self) -> &'static str {
        "memory"
    }
}

// ============================================================================
// DynamoDB Store
// ============================================================================

/// DynamoDB-based persistent complaint store for production.
///
/// Uses conditional PutItem for atomic insert-if-absent.
///
/// # Configuration
///
/// Environment variables:
/// - `COMPLAINT_STORE_TABLE_NAME`: DynamoDB table name (required; no default)
/// - `AWS_REGION`: AWS region (uses default from environment)
#[derive(Debug)]
pub struct DynamoComplaintStore {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
}

impl DynamoComplaintStore {
    /// Create a new DynamoDB complaint store.
    pub fn new(client: aws_sdk_dynamodb::Client, table_name: String) -> Self {
        info!(table_name = %table_name, "Initialized DynamoDB complaint store");
        Self { client, table_name }
    }

    /// Create a new DynamoDB complaint store for `table_name` using the
    /// ambient AWS configuration.
    pub async fn from_env(table_name: String) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = aws_sdk_dynamodb::Client::new(&config);

        Self::new(client, table_name)
    }
}

#[async_trait]
impl ComplaintStore for DynamoComplaintStore {
    async fn record_if_absent(&self, record: &ComplaintRecord) -> Result<(), ComplaintStoreError> {
        use aws_sdk_dynamodb::types::AttributeValue;

        let key = record.bid_id.to_string();
        let complaint = serde_json::to_string(&record.complaint)?;

        // Atomic conditional put - fails if the bid id already exists
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .item("pk", AttributeValue::S(key.clone()))
            .item("domain_name", AttributeValue::S(record.domain_name.clone()))
            .item("submitter", AttributeValue::S(record.submitter.to_string()))
            .item("complaint", AttributeValue::S(complaint))
            .item("created_at", AttributeValue::N(record.created_at.to_string()))
            .condition_expression("attribute_not_exists(pk)")
            .send()
            .await;

        match result {
            Ok(_) => {
                debug!(bid_id = %key, "Recorded complaint (DynamoDB)");
                Ok(())
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_conditional_check_failed_exception() {
                    warn!(bid_id = %key, "Replay attempt detected - bid id already recorded");
                    return Err(ComplaintStoreError::AlreadyRecorded(record.bid_id));
                }
                error!(error = %service_err, bid_id = %key, "DynamoDB put_item failed");
                Err(ComplaintStoreError::WriteError(service_err.to_string()))
            }
        }
    }

    async fn contains(&self, bid_id: &BidId) -> Result<bool, ComplaintStoreError> {
        use aws_sdk_dynamodb::types::AttributeValue;

        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("pk", AttributeValue::S(bid_id.to_string()))
            .projection_expression("pk")
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| ComplaintStoreError::ReadError(e.to_string()))?;

        Ok(result.item.is_some())
    }

    async fn health_check(&self) -> Result<(), ComplaintStoreError> {
        self.client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(|e| ComplaintStoreError::ConnectionFailed(e.to_string()))?;
        Ok(())
    }

    fn store_type(&self) -> &'static str {
        "dynamodb"
    }
}

// ============================================================================
// Factory Function
// ============================================================================

/// Create the appropriate complaint store based on configuration.
///
/// - If a table name is configured, uses DynamoDB
/// - Otherwise, falls back to in-memory store (with warning)
pub async fn create_complaint_store(table_name: Option<&str>) -> Arc<dyn ComplaintStore> {
    match table_name {
        Some(table_name) if !table_name.is_empty() => {
            info!(
                table_name = %table_name,
                "Using DynamoDB complaint store for bid id idempotency"
            );
            Arc::new(DynamoComplaintStore::from_env(table_name.to_string()).await)
        }
        _ => {
            warn!("COMPLAINT_STORE_TABLE_NAME not set - using in-memory complaint store");
            warn!("WARNING: In-memory complaint store does not survive restarts - duplicate complaints possible!");
            Arc::new(MemoryComplaintStore::new())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
