//! Complaint data model.
//!
//! These types are shared by the bid id deriver, the submission verifier and
//! the HTTP layer. JSON field names match the contract struct (camelCase), so
//! the same payload a wallet signs can be posted to the service unchanged.

use alloy::primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

// ============================================================================
// Complaint
// ============================================================================

/// A dispute about a cross-chain swap agreement.
///
/// `src_address` and `dst_address` are account identifiers carried as
/// integers: they enter the bid id as decimal text, not as hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    /// Source chain id
    pub src_chain_id: u64,
    /// Account on the source chain
    pub src_address: U256,
    /// Token on the source chain (address as text)
    pub src_token: String,
    /// Destination chain id
    pub dst_chain_id: u64,
    /// Account on the destination chain
    pub dst_address: U256,
    /// Token on the destination chain (address as text)
    pub dst_token: String,
    /// Decimal amount sent on the source chain
    pub src_amount: String,
    /// Decimal amount expected on the destination chain
    pub dst_amount: String,
    /// Decimal native-token amount expected on the destination chain
    pub dst_native_amount: String,
    /// DID of the liquidity provider
    pub lp_id: String,
    /// Seconds allowed per swap step
    pub step_time_lock: u64,
    /// Unix timestamp at which the agreement was reached
    pub agreement_reached_time: u64,
    /// Counterparty attestation from the user
    pub user_sign: String,
    /// Counterparty attestation from the liquidity provider
    pub lp_sign: String,
}

impl Complaint {
    /// Source account interpreted as an EVM address (low 20 bytes).
    pub fn src_account(&self) -> Address {
        account_from_word(self.src_address)
    }

    /// Destination account interpreted as an EVM address (low 20 bytes).
    pub fn dst_account(&self) -> Address {
        account_from_word(self.dst_address)
    }
}

fn account_from_word(word: U256) -> Address {
    let bytes = word.to_be_bytes::<32>();
    Address::from_slice(&bytes[12..])
}

// ============================================================================
// Bid Id
// ============================================================================

/// Keccak-256 digest identifying one complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BidId(pub B256);

impl BidId {
    pub fn as_b256(&self) -> B256 {
        self.0
    }
}

impl From<B256> for BidId {
    fn from(value: B256) -> Self {
        Self(value)
    }
}

impl Display for BidId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for BidId {
    type Err = alloy::primitives::hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        B256::from_str(s).map(Self)
    }
}

// ============================================================================
// Notification
// ============================================================================

/// Published once for every accepted complaint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitComplaint {
    pub bid_id: BidId,
    pub complaint: Complaint,
    pub domain_name: String,
    /// Address recovered from the typed-data signature
    pub submitter: Address,
}

// ============================================================================
// HTTP Request / Response Types
// ============================================================================

/// Request body for POST /complaints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitComplaintRequest {
    pub complaint: Complaint,
    /// 65-byte `r || s || v` signature over `Bid { id }`
    pub signature: Bytes,
    /// TerminusDID domain owned by the signer
    pub domain_name: String,
}

/// Response from POST /complaints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitComplaintResponse {
    pub bid_id: BidId,
}

/// Response from POST /bid-id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidIdResponse {
    pub bid_id: BidId,
}

/// Response from GET /complaints/{bidId}.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintStatusResponse {
    pub bid_id: BidId,
    pub exists: bool,
}

/// Response from GET /config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfoResponse {
    pub chain_id: u64,
    pub reputation: Address,
    pub terminus_did: Address,
    pub tag_type_domain: String,
    pub tag_name: String,
}

/// Error body returned by every failing route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Stable error code (e.g. `DuplicateBidId`)
    pub error: String,
    /// Human-readable reason
    pub reason: String,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloy::primitives::address;

    /// The complaint used throughout the contract test-suite.
    pub(crate) fn sample_complaint() -> Complaint {
        let account = U256::from_be_slice(
            address!("945e9704D2735b420363071bB935ACf2B9C4b814").as_slice(),
        );
        Complaint {
            src_chain_id: 1,
            src_address: account,
            src_token: "0xdac17f958d2ee523a2206206994597c13d831ec7".to_string(),
            dst_chain_id: 10,
            dst_address: account,
            dst_token: "0xdac17f958d2ee523a2206206994597c13d831ec7".to_string(),
            src_amount: "1000".to_string(),
            dst_amount: "1000".to_string(),
            dst_native_amount: "0".to_string(),
            lp_id: "did:lpId".to_string(),
            step_time_lock: 60,
            agreement_reached_time: 1_717_000_000,
            user_sign: "userSign".to_string(),
            lp_sign: "lpSign".to_string(),
        }
    }

    #[test]
    fn test_complaint_json_uses_contract_field_names() {
        let json = serde_json::json!({
            "srcChainId": 1,
            "srcAddress": "0x945e9704D2735b420363071bB935ACf2B9C4b814",
            "srcToken": "0xdac17f958d2ee523a2206206994597c13d831ec7",
            "dstChainId": 10,
            "dstAddress": "0x945e9704D2735b420363071bB935ACf2B9C4b814",
            "dstToken": "0xdac17f958d2ee523a2206206994597c13d831ec7",
            "srcAmount": "1000",
            "dstAmount": "1000",
            "dstNativeAmount": "0",
            "lpId": "did:lpId",
            "stepTimeLock": 60,
            "agreementReachedTime": 1717000000u64,
            "userSign": "userSign",
            "lpSign": "lpSign"
        });

        let complaint: Complaint = serde_json::from_value(json).unwrap();
        assert_eq!(complaint, sample_complaint());
    }

    #[test]
    fn test_src_account_takes_low_twenty_bytes() {
        let complaint = sample_complaint();
        assert_eq!(
            complaint.src_account(),
            address!("945e9704D2735b420363071bB935ACf2B9C4b814")
        );
        assert_eq!(complaint.src_account(), complaint.dst_account());
    }

    #[test]
    fn test_bid_id_display_round_trips() {
        let id = BidId(B256::repeat_byte(0xab));
        let text = id.to_string();
        assert!(text.starts_with("0x"));
        assert_eq!(text.len(), 66);
        assert_eq!(text.parse::<BidId>().unwrap(), id);
    }
}
