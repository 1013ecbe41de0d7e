//! Contract ABIs
//!
//! Solidity interface definitions for the Otmoic Reputation contract and the
//! slice of the TerminusDID registry it depends on.

use alloy::sol;

use crate::types::Complaint;

// ============================================================================
// Reputation ABI
// ============================================================================

sol!(
    #[sol(rpc)]
    /// Otmoic Reputation contract.
    ///
    /// Records complaints keyed by bid id. Submissions carry an EIP-712
    /// signature over `Bid { bytes32 id }` from the owner of a TerminusDID
    /// domain.
    interface IReputation {
        /// On-chain layout of a complaint
        struct Complaint {
            uint64 srcChainId;
            uint256 srcAddress;
            string srcToken;
            uint64 dstChainId;
            uint256 dstAddress;
            string dstToken;
            string srcAmount;
            string dstAmount;
            string dstNativeAmount;
            string lpId;
            uint64 stepTimeLock;
            uint64 agreementReachedTime;
            string userSign;
            string lpSign;
        }

        // ============ Errors ============

        error DomainNoExists();
        error InvalidSigner(address signer, address expected);
        error DuplicateBidId(bytes32 bidId);

        // ============ Events ============

        /// Emitted when a complaint is recorded
        event SubmitComplaint(bytes32 bidId, Complaint complaint, string name);

        // ============ Functions ============

        /// Record a complaint
        /// @param complaint The complaint
        /// @param signature EIP-712 signature over Bid { id }
        /// @param name TerminusDID domain owned by the signer
        function submitComplaint(
            Complaint calldata complaint,
            bytes calldata signature,
            string calldata name
        ) external;

        /// Derive the bid id of a complaint
        function getBidId(Complaint calldata complaint) external pure returns (bytes32);

        /// Whether a bid id has been recorded
        function hasComplaint(bytes32 bidId) external view returns (bool);

        function terminusDID() external view returns (address);
        function tagTypeDomain() external view returns (string memory);
        function tagName() external view returns (string memory);
    }
);

// ============================================================================
// TerminusDID ABI
// ============================================================================

sol!(
    #[sol(rpc)]
    /// TerminusDID domain registry.
    ///
    /// ERC-721 registry where each domain is a token; only the read surface
    /// used for complaint authorization is bound here.
    interface ITerminusDID {
        /// Whether a domain has been registered
        function isRegistered(string calldata domain) external view returns (bool);

        /// Token id of a domain
        function tokenId(string calldata domain) external pure returns (uint256);

        /// Owner of a domain token
        function ownerOf(uint256 tokenId) external view returns (address);

        /// Tag names defined on a domain
        function getDefinedTagNames(string calldata domain) external view returns (string[] memory);
    }
);

impl From<&Complaint> for IReputation::Complaint {
    fn from(value: &Complaint) -> Self {
        Self {
            srcChainId: value.src_chain_id,
            srcAddress: value.src_address,
            srcToken: value.src_token.clone(),
            dstChainId: value.dst_chain_id,
            dstAddress: value.dst_address,
            dstToken: value.dst_token.clone(),
            srcAmount: value.src_amount.clone(),
            dstAmount: value.dst_amount.clone(),
            dstNativeAmount: value.dst_native_amount.clone(),
            lpId: value.lp_id.clone(),
            stepTimeLock: value.step_time_lock,
            agreementReachedTime: value.agreement_reached_time,
            userSign: value.user_sign.clone(),
            lpSign: value.lp_sign.clone(),
        }
    }
}

impl From<IReputation::Complaint> for Complaint {
    fn from(value: IReputation::Complaint) -> Self {
        Self {
            src_chain_id: value.srcChainId,
            src_address: value.srcAddress,
            src_token: value.srcToken,
            dst_chain_id: value.dstChainId,
            dst_address: value.dstAddress,
            dst_token: value.dstToken,
            src_amount: value.srcAmount,
            dst_amount: value.dstAmount,
            dst_native_amount: value.dstNativeAmount,
            lp_id: value.lpId,
            step_time_lock: value.stepTimeLock,
            agreement_reached_time: value.agreementReachedTime,
            user_sign: value.userSign,
            lp_sign: value.lpSign,
        }
    }
}
