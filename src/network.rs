//! Supported networks and known Reputation deployments.

use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Networks the service knows deployments for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    Optimism,
    OptimismSepolia,
    /// Local fork or devnet; every address must come from the environment
    Local,
}

impl Network {
    pub fn variants() -> &'static [Network] {
        &[Network::Optimism, Network::OptimismSepolia, Network::Local]
    }

    /// Chain id, if fixed for the network.
    pub fn chain_id(&self) -> Option<u64> {
        match self {
            Network::Optimism => Some(10),
            Network::OptimismSepolia => Some(11155420),
            Network::Local => None,
        }
    }

    /// Public JSON-RPC endpoint, if any.
    pub fn default_rpc_url(&self) -> Option<&'static str> {
        match self {
            Network::Optimism => Some("https://mainnet.optimism.io"),
            Network::OptimismSepolia => Some("https://sepolia.optimism.io"),
            Network::Local => None,
        }
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Network::Optimism => "optimism",
            Network::OptimismSepolia => "optimism-sepolia",
            Network::Local => "local",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown network: {0}")]
pub struct UnknownNetwork(String);

impl FromStr for Network {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "optimism" | "op" => Ok(Network::Optimism),
            "optimism-sepolia" | "op_sepolia" | "op-sepolia" => Ok(Network::OptimismSepolia),
            "local" | "hardhat" => Ok(Network::Local),
            other => Err(UnknownNetwork(other.to_string())),
        }
    }
}

// ============================================================================
// Contract Addresses by Network
// ============================================================================

/// Reputation-related contract addresses on one network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    /// TerminusDID proxy
    pub terminus_did: Address,
    /// Reputation proxy
    pub reputation: Address,
}

pub const OPTIMISM_DEPLOYMENT: Deployment = Deployment {
    terminus_did: address!("5DA4Fa8E567d86e52Ef8Da860de1be8f54cae97D"),
    reputation: address!("E924F7f68D1dcd004720e107F62c6303aF271ed3"),
};

pub const OPTIMISM_SEPOLIA_DEPLOYMENT: Deployment = Deployment {
    terminus_did: address!("e2D7c3a9013960E04d4E9F5F9B63fff37eEd97A8"),
    reputation: address!("d9d91A805e074932E3E6FeD399A814207106A69E"),
};

/// Get the known deployment for a network.
pub fn get_deployment(network: &Network) -> Option<Deployment> {
    match network {
        Network::Optimism => Some(OPTIMISM_DEPLOYMENT),
        Network::OptimismSepolia => Some(OPTIMISM_SEPOLIA_DEPLOYMENT),
        Network::Local => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimism_deployment() {
        let deployment = get_deployment(&Network::Optimism).unwrap();
        assert_eq!(deployment.reputation, OPTIMISM_DEPLOYMENT.reputation);
        assert_eq!(Network::Optimism.chain_id(), Some(10));
    }

    #[test]
    fn test_local_has_no_deployment() {
        assert!(get_deployment(&Network::Local).is_none());
        assert!(Network::Local.chain_id().is_none());
    }

    #[test]
    fn test_network_names_round_trip() {
        for network in Network::variants() {
            assert_eq!(network.to_string().parse::<Network>().unwrap(), *network);
        }
        assert_eq!("op_sepolia".parse::<Network>().unwrap(), Network::OptimismSepolia);
        assert!("mainnet".parse::<Network>().is_err());
    }
}
