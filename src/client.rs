//! Client construction, identifier normalization and registry resolution.
//!
//! [`TagPayClient`] is the entry point of the crate. It owns a chain gateway,
//! a handle lookup service and one contract handle per deployed contract.
//! Resolution fans out one registry lookup per wallet tag, all issued before
//! any is awaited, and swallows per-tag failures: a missing mapping for one
//! tag is expected, not exceptional.

use crate::abi;
use crate::api::twitter::TwitterLookup;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::gateway::{
    self, ChainGateway, ContractHandle, GatewayError, TxOptions, TxReceipt,
};
use crate::hash;
use crate::identifier::{self, IdentifierKind};
use crate::tags::{self, ResolveOptions};
use alloy::dyn_abi::DynSolValue;
use alloy::primitives::Address;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Client for identifier resolution and payments against a fixed contract set.
pub struct TagPayClient {
    pub(crate) gateway: Arc<dyn ChainGateway>,
    pub(crate) twitter: Arc<dyn TwitterLookup>,
    pub(crate) config: ClientConfig,
    pub(crate) registry: Arc<dyn ContractHandle>,
    pub(crate) multi_registry: Arc<dyn ContractHandle>,
    pub(crate) reverse_mapping: Arc<dyn ContractHandle>,
    pub(crate) escrow: Arc<dyn ContractHandle>,
    pub(crate) tipping: Arc<dyn ContractHandle>,
    pub(crate) price_oracle: Arc<dyn ContractHandle>,
}

impl TagPayClient {
    /// Build a client over a gateway and handle lookup service.
    pub fn new(
        gateway: Arc<dyn ChainGateway>,
        twitter: Arc<dyn TwitterLookup>,
        config: ClientConfig,
    ) -> Result<Self> {
        let contracts = config.contracts;
        let registry = gateway.contract(abi::REGISTRY, contracts.registry)?;
        let multi_registry = gateway.contract(abi::MULTI_REGISTRY, contracts.multi_registry)?;
        let reverse_mapping = gateway.contract(abi::REVERSE_MAPPING, contracts.reverse_mapping)?;
        let escrow = gateway.contract(abi::SEND_TO_HASH, contracts.send_to_anyone)?;
        let tipping = gateway.contract(abi::TIPPING, contracts.tipping)?;
        let price_oracle = gateway.contract(abi::PRICE_ORACLE, contracts.price_oracle)?;
        Ok(Self {
            gateway,
            twitter,
            config,
            registry,
            multi_registry,
            reverse_mapping,
            escrow,
            tipping,
            price_oracle,
        })
    }

    /// Normalize raw input into the string that gets hashed.
    ///
    /// Emails keep their canonical form, phones collapse to `+digits`, and
    /// @handles are replaced by their numeric platform ID so the hash stays
    /// stable across handle renames.
    pub async fn normalize_identifier(&self, input: &str) -> Result<String> {
        let kind = identifier::classify(input)?;
        let canonical = identifier::canonicalize(input);
        match kind {
            IdentifierKind::Email => Ok(canonical),
            IdentifierKind::Phone => Ok(identifier::convert_phone(&canonical)),
            IdentifierKind::Twitter => match self.twitter.id_for_handle(&canonical).await? {
                Some(id) => Ok(id),
                None => Err(Error::TwitterHandleNotFound(canonical)),
            },
        }
    }

    /// Resolve an identifier to a mapping of tag name to registered address.
    ///
    /// One registry lookup per tag passing the filter; failed lookups are
    /// logged and dropped, empty registrations are dropped silently.
    pub async fn resolve(
        &self,
        input: &str,
        options: &ResolveOptions,
    ) -> Result<HashMap<String, String>> {
        let identifier = self.normalize_identifier(input).await?;
        let lookups = tags::matching_tags(options).into_iter().map(|tag| {
            let key = hash::derive_lookup_key(&identifier, tag.tag_address);
            let registry = Arc::clone(&self.registry);
            async move {
                (
                    tag.tag_name,
                    registry.call("getIDriss", &[DynSolValue::String(key)]).await,
                )
            }
        });

        let mut resolved = HashMap::new();
        for (tag_name, outcome) in join_all(lookups).await {
            match outcome.and_then(gateway::decode_string) {
                Ok(address) if !address.is_empty() => {
                    resolved.insert(tag_name.to_string(), address);
                }
                Ok(_) => {}
                Err(err) => warn!(tag = tag_name, error = %err, "registry lookup failed"),
            }
        }
        Ok(resolved)
    }

    /// Registry lookup key for an identifier under a single wallet type.
    pub async fn user_hash(&self, wallet_type: &ResolveOptions, input: &str) -> Result<String> {
        let tag = tags::wallet_tag_for(wallet_type)?;
        let identifier = self.normalize_identifier(input).await?;
        Ok(hash::derive_lookup_key(&identifier, tag.tag_address))
    }

    /// Password-salted claim hash for an identifier.
    pub async fn hash_for_identifier(
        &self,
        input: &str,
        wallet_type: &ResolveOptions,
        claim_password: &str,
    ) -> Result<String> {
        let base = self.user_hash(wallet_type, input).await?;
        self.derive_claim_hash(&base, claim_password).await
    }

    /// Salt a base hash with a claim password.
    ///
    /// Computed by the escrow contract itself, never locally: the contract
    /// applies the same derivation when checking claims, and the two sides
    /// must not drift apart.
    pub(crate) async fn derive_claim_hash(
        &self,
        base_hash: &str,
        claim_password: &str,
    ) -> Result<String> {
        let outputs = self
            .escrow
            .call(
                "hashIDrissWithPassword",
                &[
                    DynSolValue::String(base_hash.to_string()),
                    DynSolValue::String(claim_password.to_string()),
                ],
            )
            .await?;
        Ok(gateway::decode_string(outputs)?)
    }

    /// Batch lookup of already-derived hashes through the multi-registry.
    ///
    /// Returns only hashes with a non-empty registration.
    pub async fn lookup_hashes(&self, hashes: &[String]) -> Result<HashMap<String, String>> {
        let arg = DynSolValue::Array(
            hashes.iter().cloned().map(DynSolValue::String).collect(),
        );
        let outputs = self.multi_registry.call("getMultipleIDriss", &[arg]).await?;
        let Some(DynSolValue::Array(entries)) = outputs.into_iter().next() else {
            return Err(Error::Gateway(GatewayError::Decode(
                "expected an array of (hash, address) tuples".to_string(),
            )));
        };

        let mut mapping = HashMap::new();
        for entry in entries {
            if let DynSolValue::Tuple(fields) = entry {
                let mut fields = fields.into_iter();
                if let (Some(DynSolValue::String(hash)), Some(DynSolValue::String(address))) =
                    (fields.next(), fields.next())
                {
                    if !address.is_empty() {
                        mapping.insert(hash, address);
                    }
                }
            }
        }
        Ok(mapping)
    }

    /// Reverse lookup from an address to the identifier it registered.
    ///
    /// Purely numeric results are platform IDs; those are mapped back to a
    /// lowercase `@handle` when the lookup service still knows them.
    pub async fn reverse_resolve(&self, address: Address) -> Result<String> {
        let outputs = self
            .reverse_mapping
            .call("reverseIDriss", &[DynSolValue::Address(address)])
            .await?;
        let result = gateway::decode_string(outputs)?;

        let is_platform_id =
            !result.is_empty() && result.chars().all(|c| c.is_ascii_digit()) && result != "0";
        if is_platform_id {
            if let Some(handle) = self.twitter.handle_for_id(&result).await? {
                return Ok(format!("@{handle}").to_lowercase());
            }
        }
        Ok(result)
    }

    /// Random 32-hex-character claim password.
    pub(crate) fn generate_claim_password(&self) -> String {
        hex::encode(self.gateway.random_bytes(16))
    }

    /// Send a state-changing call, estimating gas opportunistically.
    ///
    /// Estimation failures are logged and suppressed; the send proceeds and
    /// the chain itself rejects if gas truly is insufficient.
    pub(crate) async fn send_with_gas(
        &self,
        contract: &Arc<dyn ContractHandle>,
        function: &str,
        args: &[DynSolValue],
        mut options: TxOptions,
    ) -> Result<TxReceipt> {
        if options.gas.is_none() {
            match contract.estimate_gas(function, args, &options).await {
                Ok(gas) => options.gas = Some(gas),
                Err(err) => warn!(function, error = %err, "could not estimate gas"),
            }
        }
        Ok(contract.send(function, args, &options).await?)
    }
}
