//! EIP-712 typed-data scheme for complaint authorization.
//!
//! Domain: `{ name: "Otmoic Reputation", version: "1", chainId, verifyingContract }`.
//! Message: `Bid(bytes32 id)` where `id` is the complaint's bid id.
//!
//! Binding the domain to the chain id and the deployed contract address keeps
//! a signature from being replayed against another chain or deployment.

use alloy::primitives::{Address, Signature, B256, U256};
use alloy::signers::SignerSync;
use alloy::sol;
use alloy::sol_types::{Eip712Domain, SolStruct};
use std::borrow::Cow;

use crate::types::BidId;

pub const DOMAIN_NAME: &str = "Otmoic Reputation";
pub const DOMAIN_VERSION: &str = "1";

sol! {
    /// Typed-data message signed by the submitter.
    #[derive(Debug, PartialEq, Eq)]
    struct Bid {
        bytes32 id;
    }
}

/// Errors raised while signing or recovering a bid signature.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// The signature bytes are not a valid 65-byte secp256k1 signature
    #[error("Malformed signature: {0}")]
    Malformed(String),

    /// No public key could be recovered from the signature
    #[error("Signer recovery failed: {0}")]
    Recovery(String),

    /// The local signer refused to sign
    #[error("Signing failed: {0}")]
    Signing(String),
}

/// Build the typed-data domain for one Reputation deployment.
pub fn reputation_domain(chain_id: u64, verifying_contract: Address) -> Eip712Domain {
    Eip712Domain::new(
        Some(Cow::Borrowed(DOMAIN_NAME)),
        Some(Cow::Borrowed(DOMAIN_VERSION)),
        Some(U256::from(chain_id)),
        Some(verifying_contract),
        None,
    )
}

/// Digest a wallet signs for `Bid { id: bid_id }`.
pub fn signing_hash(bid_id: BidId, domain: &Eip712Domain) -> B256 {
    Bid { id: bid_id.0 }.eip712_signing_hash(domain)
}

/// Sign a bid id off-chain.
pub fn sign_bid<S>(signer: &S, bid_id: BidId, domain: &Eip712Domain) -> Result<Signature, SignatureError>
where
    S: SignerSync,
{
    let hash = signing_hash(bid_id, domain);
    signer
        .sign_hash_sync(&hash)
        .map_err(|e| SignatureError::Signing(e.to_string()))
}

/// Recover the address that signed `Bid { id: bid_id }` under `domain`.
///
/// Only canonical signatures are accepted: `v` must be 27 or 28 and `s` must
/// lie in the lower half of the curve order, matching what the contract's
/// signature check admits.
pub fn recover_signer(
    signature: &[u8],
    bid_id: BidId,
    domain: &Eip712Domain,
) -> Result<Address, SignatureError> {
    if signature.len() != 65 {
        return Err(SignatureError::Malformed(format!(
            "expected 65 bytes, got {}",
            signature.len()
        )));
    }
    let v = signature[64];
    if v != 27 && v != 28 {
        return Err(SignatureError::Malformed(format!("invalid v value {v}")));
    }
    let signature =
        Signature::from_raw(signature).map_err(|e| SignatureError::Malformed(e.to_string()))?;
    if signature.normalize_s().is_some() {
        return Err(SignatureError::Malformed("s value in upper half of curve order".to_string()));
    }
    let hash = signing_hash(bid_id, domain);
    signature
        .recover_address_from_prehash(&hash)
        .map_err(|e| SignatureError::Recovery(e.to_string()))
}
