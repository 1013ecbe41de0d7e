//! Complaint submission verifier.
//!
//! A submission is accepted when, in order:
//!
//! 1. the signature recovers to some address over `Bid { id: bidId }` under
//!    this deployment's typed-data domain,
//! 2. the submitter domain is registered,
//! 3. the recovered address owns that domain,
//! 4. the bid id has not been recorded before.
//!
//! Only then is the bid id recorded and a [`SubmitComplaint`] published.
//! The duplicate check and the insert are a single store operation, and
//! every earlier failure returns before the store is touched.

use alloy::primitives::Address;
use alloy::sol_types::Eip712Domain;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use crate::bid_id::derive_bid_id;
use crate::complaint_store::{ComplaintRecord, ComplaintStore, ComplaintStoreError};
use crate::config::Config;
use crate::eip712::{recover_signer, reputation_domain};
use crate::registry::{DomainRegistry, RegistryError};
use crate::types::{BidId, Complaint, SubmitComplaint};

const EVENT_CHANNEL_CAPACITY: usize = 1024;

// ============================================================================
// Error Types
// ============================================================================

/// Reasons a submission is rejected.
#[derive(Debug, thiserror::Error)]
pub enum ReputationError {
    /// Submitter domain is not registered
    #[error("Domain not found: {0}")]
    DomainNotFound(String),

    /// Signer does not own the submitter domain
    #[error("Invalid signer {signer}, expected {expected}")]
    InvalidSigner { signer: Address, expected: Address },

    /// Bid id has already been recorded
    #[error("Duplicate bid id: {0}")]
    DuplicateBidId(BidId),

    /// Signature bytes could not be parsed or recovered
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Complaint tag is not set up on the tag type domain
    #[error("Tag {tag} is not defined on {domain}")]
    TagTypeNotReady { domain: String, tag: String },

    #[error(transparent)]
    Registry(RegistryError),

    #[error(transparent)]
    Store(ComplaintStoreError),
}

impl ReputationError {
    /// Stable error code, matching the contract's custom error names.
    pub fn code(&self) -> &'static str {
        match self {
            ReputationError::DomainNotFound(_) => "DomainNoExists",
            ReputationError::InvalidSigner { .. } => "InvalidSigner",
            ReputationError::DuplicateBidId(_) => "DuplicateBidId",
            ReputationError::InvalidSignature(_) => "InvalidSignature",
            ReputationError::TagTypeNotReady { .. } => "TagTypeNotReady",
            ReputationError::Registry(_) => "RegistryUnavailable",
            ReputationError::Store(_) => "StoreUnavailable",
        }
    }
}

impl From<RegistryError> for ReputationError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::DomainNotFound(domain) => ReputationError::DomainNotFound(domain),
            other => ReputationError::Registry(other),
        }
    }
}

impl From<ComplaintStoreError> for ReputationError {
    fn from(err: ComplaintStoreError) -> Self {
        match err {
            ComplaintStoreError::AlreadyRecorded(bid_id) => ReputationError::DuplicateBidId(bid_id),
            other => ReputationError::Store(other),
        }
    }
}

// ============================================================================
// Verifier
// ============================================================================

/// Deployment parameters of the verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierSettings {
    pub chain_id: u64,
    /// Reputation contract the typed-data domain is bound to
    pub reputation: Address,
    pub terminus_did: Address,
    pub tag_type_domain: String,
    pub tag_name: String,
}

impl From<&Config> for VerifierSettings {
    fn from(config: &Config) -> Self {
        Self {
            chain_id: config.chain_id,
            reputation: config.reputation,
            terminus_did: config.terminus_did,
            tag_type_domain: config.tag_type_domain.clone(),
            tag_name: config.tag_name.clone(),
        }
    }
}

#[derive(Debug)]
pub struct ComplaintVerifier {
    settings: VerifierSettings,
    domain: Eip712Domain,
    registry: Arc<dyn DomainRegistry>,
    store: Arc<dyn ComplaintStore>,
    events: broadcast::Sender<SubmitComplaint>,
}

impl ComplaintVerifier {
    pub fn new(
        settings: VerifierSettings,
        registry: Arc<dyn DomainRegistry>,
        store: Arc<dyn ComplaintStore>,
    ) -> Self {
        let domain = reputation_domain(settings.chain_id, settings.reputation);
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        info!(
            chain_id = settings.chain_id,
            reputation = %settings.reputation,
            registry = registry.registry_type(),
            store = store.store_type(),
            "Complaint verifier ready"
        );
        Self {
            settings,
            domain,
            registry,
            store,
            events,
        }
    }

    /// Verify and record a complaint, returning its bid id.
    #[instrument(skip_all, fields(domain_name = %domain_name))]
    pub async fn submit_complaint(
        &self,
        complaint: &Complaint,
        signature: &[u8],
        domain_name: &str,
    ) -> Result<BidId, ReputationError> {
        let bid_id = derive_bid_id(complaint);

        let signer = recover_signer(signature, bid_id, &self.domain)
            .map_err(|e| ReputationError::InvalidSignature(e.to_string()))?;
        debug!(bid_id = %bid_id, signer = %signer, "Recovered complaint signer");

        if !self.registry.is_registered(domain_name).await? {
            warn!(bid_id = %bid_id, "Submitter domain is not registered");
            return Err(ReputationError::DomainNotFound(domain_name.to_string()));
        }

        let owner = self.registry.resolve_owner(domain_name).await?;
        if signer != owner {
            warn!(bid_id = %bid_id, signer = %signer, owner = %owner, "Signer does not own submitter domain");
            return Err(ReputationError::InvalidSigner {
                signer,
                expected: complaint.src_account(),
            });
        }

        let record = ComplaintRecord::new(bid_id, complaint.clone(), domain_name.to_string(), signer);
        self.store.record_if_absent(&record).await?;

        info!(bid_id = %bid_id, submitter = %signer, "SubmitComplaint");
        let event = SubmitComplaint {
            bid_id,
            complaint: record.complaint,
            domain_name: record.domain_name,
            submitter: signer,
        };
        if self.events.send(event).is_err() {
            debug!(bid_id = %bid_id, "No SubmitComplaint subscribers");
        }

        Ok(bid_id)
    }

    /// Whether a bid id has been recorded.
    pub async fn has_complaint(&self, bid_id: &BidId) -> Result<bool, ReputationError> {
        Ok(self.store.contains(bid_id).await?)
    }

    pub fn get_bid_id(&self, complaint: &Complaint) -> BidId {
        derive_bid_id(complaint)
    }

    /// Subscribe to accepted complaints.
    pub fn subscribe(&self) -> broadcast::Receiver<SubmitComplaint> {
        self.events.subscribe()
    }

    /// Check that the complaint tag is defined on the tag type domain.
    pub async fn ensure_tag_ready(&self) -> Result<(), ReputationError> {
        let domain = &self.settings.tag_type_domain;
        let tag = &self.settings.tag_name;
        let not_ready = || ReputationError::TagTypeNotReady {
            domain: domain.clone(),
            tag: tag.clone(),
        };

        if !self.registry.is_registered(domain).await? {
            return Err(not_ready());
        }
        let tags = self.registry.defined_tag_names(domain).await?;
        if !tags.iter().any(|t| t == tag) {
            return Err(not_ready());
        }
        Ok(())
    }

    pub fn domain(&self) -> &Eip712Domain {
        &self.domain
    }

    pub fn settings(&self) -> &VerifierSettings {
        &self.settings
    }

    pub fn terminus_did(&self) -> Address {
        self.settings.terminus_did
    }

    pub fn tag_type_domain(&self) -> &str {
        &self.settings.tag_type_domain
    }

    pub fn tag_name(&self) -> &str {
        &self.settings.tag_name
    }

    pub fn store(&self) -> &Arc<dyn ComplaintStore> {
        &self.store
    }
}

// ============================================================================
// Tests
// ============================================================================
