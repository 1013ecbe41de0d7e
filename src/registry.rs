//! Domain registry abstraction for complaint authorization.
//!
//! Only the owner of a registered TerminusDID domain may submit a complaint.
//! The verifier reaches the registry through [`DomainRegistry`] so the
//! on-chain registry can be swapped for an in-memory one in tests.
//!
//! ```text
//! ComplaintVerifier
//!        |
//!        v
//! DomainRegistry (trait) <-- TerminusDidRegistry, MemoryDomainRegistry
//!        |
//!        v
//! TerminusDID over JSON-RPC (production) / HashMap (development)
//! ```

use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use url::Url;

use crate::abi::ITerminusDID;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during registry lookups.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Domain has no registered owner
    #[error("Domain not found: {0}")]
    DomainNotFound(String),

    /// Registry call failed
    #[error("Registry call failed: {0}")]
    Rpc(String),
}

// ============================================================================
// Domain Registry Trait
// ============================================================================

/// Read access to a DID domain registry.
///
/// Results are never cached: every submission sees the registry as it is at
/// lookup time.
#[async_trait]
pub trait DomainRegistry: Send + Sync + std::fmt::Debug {
    /// Whether `domain` has been registered.
    async fn is_registered(&self, domain: &str) -> Result<bool, RegistryError>;

    /// Current owner of `domain`.
    ///
    /// Fails with [`RegistryError::DomainNotFound`] if the domain is absent.
    async fn resolve_owner(&self, domain: &str) -> Result<Address, RegistryError>;

    /// Tag names defined on `domain`.
    async fn defined_tag_names(&self, domain: &str) -> Result<Vec<String>, RegistryError>;

    /// Registry type name for logging.
    fn registry_type(&self) -> &'static str;
}

// ============================================================================
// In-Memory Registry (for development/testing)
// ============================================================================

#[derive(Debug, Clone, Default)]
struct DomainEntry {
    owner: Address,
    tags: Vec<String>,
}

/// In-memory domain registry for development and testing.
#[derive(Debug, Default)]
pub struct MemoryDomainRegistry {
    domains: Arc<RwLock<HashMap<String, DomainEntry>>>,
}

impl MemoryDomainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `domain` to `owner`, replacing any previous owner.
    pub async fn register(&self, domain: &str, owner: Address) {
        let mut domains = self.domains.write().await;
        domains.entry(domain.to_string()).or_default().owner = owner;
        debug!(domain = %domain, owner = %owner, "Registered domain (memory)");
    }

    /// Define a tag on an already registered domain.
    pub async fn define_tag(&self, domain: &str, tag: &str) -> Result<(), RegistryError> {
        let mut domains = self.domains.write().await;
        let entry = domains
            .get_mut(domain)
            .ok_or_else(|| RegistryError::DomainNotFound(domain.to_string()))?;
        if !entry.tags.iter().any(|t| t == tag) {
            entry.tags.push(tag.to_string());
        }
        Ok(())
    }
}

#[async_trait]
impl DomainRegistry for MemoryDomainRegistry {
    async fn is_registered(&self, domain: &str) -> Result<bool, RegistryError> {
        Ok(self.domains.read().await.contains_key(domain))
    }

    async fn resolve_owner(&self, domain: &str) -> Result<Address, RegistryError> {
        self.domains
            .read()
            .await
            .get(domain)
            .map(|entry| entry.owner)
            .ok_or_else(|| RegistryError::DomainNotFound(domain.to_string()))
    }

    async fn defined_tag_names(&self, domain: &str) -> Result<Vec<String>, RegistryError> {
        self.domains
            .read()
            .await
            .get(domain)
            .map(|entry| entry.tags.clone())
            .ok_or_else(|| RegistryError::DomainNotFound(domain.to_string()))
    }

    fn registry_type(&self) -> &'static str {
        "memory"
    }
}

// ============================================================================
// TerminusDID Registry
// ============================================================================

/// TerminusDID contract reached over JSON-RPC.
#[derive(Debug, Clone)]
pub struct TerminusDidRegistry {
    contract: ITerminusDID::ITerminusDIDInstance<DynProvider>,
}

impl TerminusDidRegistry {
    pub fn new(rpc_url: Url, address: Address) -> Self {
        let provider = ProviderBuilder::new().connect_http(rpc_url).erased();
        info!(terminus_did = %address, "Initialized TerminusDID registry");
        Self {
            contract: ITerminusDID::new(address, provider),
        }
    }

    pub fn address(&self) -> Address {
        *self.contract.address()
    }
}

#[async_trait]
impl DomainRegistry for TerminusDidRegistry {
    async fn is_registered(&self, domain: &str) -> Result<bool, RegistryError> {
        self.contract
            .isRegistered(domain.to_string())
            .call()
            .await
            .map_err(|e| RegistryError::Rpc(e.to_string()))
    }

    async fn resolve_owner(&self, domain: &str) -> Result<Address, RegistryError> {
        if !self.is_registered(domain).await? {
            return Err(RegistryError::DomainNotFound(domain.to_string()));
        }
        let token_id = self
            .contract
            .tokenId(domain.to_string())
            .call()
            .await
            .map_err(|e| RegistryError::Rpc(e.to_string()))?;
        self.contract
            .ownerOf(token_id)
            .call()
            .await
            .map_err(|e| RegistryError::Rpc(e.to_string()))
    }

    async fn defined_tag_names(&self, domain: &str) -> Result<Vec<String>, RegistryError> {
        self.contract
            .getDefinedTagNames(domain.to_string())
            .call()
            .await
            .map_err(|e| RegistryError::Rpc(e.to_string()))
    }

    fn registry_type(&self) -> &'static str {
        "terminus-did"
    }
}

// ============================================================================
// Tests
// ============================================================================
