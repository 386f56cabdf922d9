//! Client configuration: contract deployments, fee policy, claim links.
//!
//! Defaults point at the Polygon mainnet deployment. All settings can be
//! overridden per instance, which is how tests and alternative deployments
//! plug in their own contracts.

use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// Addresses of the fixed contract set the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractAddresses {
    pub registry: Address,
    pub multi_registry: Address,
    pub reverse_mapping: Address,
    /// The "send to anyone" escrow contract.
    pub send_to_anyone: Address,
    pub tipping: Address,
    pub price_oracle: Address,
}

impl Default for ContractAddresses {
    fn default() -> Self {
        Self {
            registry: address!("0x2EcCb53ca2d4ef91A79213FDDF3f8c2332c2a814"),
            multi_registry: address!("0xa179BF6f32483A82d4BD726068EfD93E29f3c930"),
            reverse_mapping: address!("0x561f1b5145897A52A6E94E4dDD4a29Ea5dFF6f64"),
            send_to_anyone: address!("0xf333EDE8D49dD100F02c946809C9F5D9867D10C0"),
            tipping: address!("0xf333EDE8D49dD100F02c946809C9F5D9867D10C0"),
            price_oracle: address!("0xAB594600376Ec9fD91F8e885dADF0CE036862dE0"),
        }
    }
}

/// How protocol fees are quoted for the tipping path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeePolicy {
    /// Treat ERC20 tips as fee-exempt instead of querying the contract.
    ///
    /// The deployed tipping contract takes its ERC20 cut out of the token
    /// amount itself, so no native value is attached. Disable only against
    /// deployments that charge the fee in native currency for every type.
    pub erc20_tips_exempt: bool,
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self {
            erc20_tips_exempt: true,
        }
    }
}

/// Complete client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub contracts: ContractAddresses,
    pub fee_policy: FeePolicy,
    /// Base URL embedded in generated claim links.
    pub claim_url_base: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            contracts: ContractAddresses::default(),
            fee_policy: FeePolicy::default(),
            claim_url_base: "https://idriss.xyz".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert!(config.fee_policy.erc20_tips_exempt);
        assert_eq!(config.claim_url_base, "https://idriss.xyz");
        assert_eq!(
            config.contracts.registry,
            address!("0x2EcCb53ca2d4ef91A79213FDDF3f8c2332c2a814")
        );
    }

    #[test]
    fn test_partial_override_from_json() {
        let config: ClientConfig = serde_json::from_str(
            r#"{
                "claim_url_base": "https://example.org",
                "fee_policy": { "erc20_tips_exempt": false }
            }"#,
        )
        .unwrap();
        assert_eq!(config.claim_url_base, "https://example.org");
        assert!(!config.fee_policy.erc20_tips_exempt);
        assert_eq!(config.contracts, ContractAddresses::default());
    }
}
