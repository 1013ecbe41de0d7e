//! Otmoic Reputation: verifiable complaints about cross-chain swaps.
//!
//! A complaint is keyed by its bid id, a keccak-256 digest of its fields in a
//! fixed order ([`bid_id`]). The submitter signs `Bid { id }` under the
//! Reputation contract's EIP-712 domain ([`eip712`]) and must own the
//! TerminusDID domain named in the submission ([`registry`]). The
//! [`verifier`] checks all of this and records each bid id at most once
//! ([`complaint_store`]).

pub mod abi;
pub mod bid_id;
pub mod complaint_store;
pub mod config;
pub mod contract;
pub mod eip712;
pub mod handlers;
pub mod network;
pub mod registry;
pub mod types;
pub mod verifier;

pub use bid_id::{bid_id_origin, derive_bid_id};
pub use types::{BidId, Complaint, SubmitComplaint};
pub use verifier::{ComplaintVerifier, ReputationError, VerifierSettings};
