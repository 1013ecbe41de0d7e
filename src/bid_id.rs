//! Bid id derivation.
//!
//! A bid id is `keccak256(utf8(origin))` where `origin` concatenates the
//! complaint fields in this fixed order:
//!
//! ```text
//! agreementReachedTime srcChainId srcAddress srcToken
//! dstChainId dstAddress dstToken srcAmount dstAmount dstNativeAmount
//! lpId stepTimeLock userSign lpSign
//! ```
//!
//! Integers (including both account fields) are written in decimal. The
//! Reputation contract computes the same digest in `getBidId`, so the order
//! and formatting are frozen: changing either orphans every recorded id.
//!
//! # Collisions
//!
//! Fields are joined without delimiters. `srcChainId = 1, srcAddress = 23`
//! and `srcChainId = 12, srcAddress = 3` produce the same origin text, and
//! the same goes for adjacent free-form strings. The encoding is kept as is
//! because on-chain ids must stay reproducible; callers that need collision
//! resistance should not rely on the bid id alone to tell two complaints
//! apart.

use alloy::primitives::keccak256;

use crate::types::{BidId, Complaint};

/// Build the undelimited text the bid id is hashed from.
pub fn bid_id_origin(complaint: &Complaint) -> String {
    format!(
        "{}{}{}{}{}{}{}{}{}{}{}{}{}{}",
        complaint.agreement_reached_time,
        complaint.src_chain_id,
        complaint.src_address,
        complaint.src_token,
        complaint.dst_chain_id,
        complaint.dst_address,
        complaint.dst_token,
        complaint.src_amount,
        complaint.dst_amount,
        complaint.dst_native_amount,
        complaint.lp_id,
        complaint.step_time_lock,
        complaint.user_sign,
        complaint.lp_sign,
    )
}

/// Derive the bid id of a complaint.
pub fn derive_bid_id(complaint: &Complaint) -> BidId {
    BidId(keccak256(bid_id_origin(complaint).as_bytes()))
}
