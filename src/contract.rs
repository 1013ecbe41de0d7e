//! Read-only client for the deployed Reputation contract.
//!
//! Used to confirm that the bid ids this service derives are the ids the
//! contract derives for the same complaint.

use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use tracing::{error, info};
use url::Url;

use crate::abi::IReputation;
use crate::bid_id::derive_bid_id;
use crate::types::{BidId, Complaint};

/// Fixed complaint used to compare derivations at startup.
pub fn parity_probe() -> Complaint {
    Complaint {
        src_chain_id: 1,
        src_address: U256::from(0x945e_9704_u64),
        src_token: "0xdac17f958d2ee523a2206206994597c13d831ec7".to_string(),
        dst_chain_id: 10,
        dst_address: U256::from(0x945e_9704_u64),
        dst_token: "0x94b008aa00579c1307b0ef2c499ad98a8ce58e58".to_string(),
        src_amount: "1000".to_string(),
        dst_amount: "1000".to_string(),
        dst_native_amount: "0".to_string(),
        lp_id: "did:lpId".to_string(),
        step_time_lock: 60,
        agreement_reached_time: 0,
        user_sign: "userSign".to_string(),
        lp_sign: "lpSign".to_string(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("Contract call failed: {0}")]
    Call(#[from] alloy::contract::Error),

    #[error("Bid id mismatch: derived {off_chain}, contract returned {on_chain}")]
    BidIdMismatch { off_chain: BidId, on_chain: BidId },
}

#[derive(Debug, Clone)]
pub struct ReputationContract {
    contract: IReputation::IReputationInstance<DynProvider>,
}

impl ReputationContract {
    pub fn new(rpc_url: Url, address: Address) -> Self {
        let provider = ProviderBuilder::new().connect_http(rpc_url).erased();
        Self {
            contract: IReputation::new(address, provider),
        }
    }

    pub fn address(&self) -> Address {
        *self.contract.address()
    }

    /// Bid id as computed by the contract's `getBidId`.
    pub async fn get_bid_id(&self, complaint: &Complaint) -> Result<BidId, ContractError> {
        let id = self
            .contract
            .getBidId(IReputation::Complaint::from(complaint))
            .call()
            .await?;
        Ok(BidId(id))
    }

    /// Compare the locally derived bid id with the contract's.
    pub async fn verify_bid_id_parity(&self, complaint: &Complaint) -> Result<BidId, ContractError> {
        let off_chain = derive_bid_id(complaint);
        let on_chain = self.get_bid_id(complaint).await?;
        if off_chain != on_chain {
            error!(%off_chain, %on_chain, reputation = %self.address(), "Bid id derivation diverges from contract");
            return Err(ContractError::BidIdMismatch {
                off_chain,
                on_chain,
            });
        }
        info!(bid_id = %off_chain, reputation = %self.address(), "Bid id derivation matches contract");
        Ok(off_chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_contract_address() {
        let url = Url::parse("http://127.0.0.1:8545").unwrap();
        let reputation = address!("E924F7f68D1dcd004720e107F62c6303aF271ed3");
        let contract = ReputationContract::new(url, reputation);
        assert_eq!(contract.address(), reputation);
    }

    #[test]
    fn test_mismatch_error_names_both_ids() {
        let err = ContractError::BidIdMismatch {
            off_chain: BidId(Default::default()),
            on_chain: BidId(alloy::primitives::B256::repeat_byte(1)),
        };
        let message = err.to_string();
        assert!(message.contains("0x0000"));
        assert!(message.contains("0x0101"));
    }
}
