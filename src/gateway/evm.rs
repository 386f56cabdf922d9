//! Alloy-backed gateway implementation.
//!
//! Wraps a wallet-filled provider and exposes contracts through
//! [`ContractInstance`] with dynamically parsed ABI fragments. Receipts are
//! reduced to [`TxReceipt`] before they leave this module.

use crate::gateway::{ChainGateway, ContractHandle, GatewayError, TxOptions, TxReceipt};
use alloy::contract::{ContractInstance, Interface};
use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::JsonAbi;
use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use std::sync::Arc;

/// Gateway over a JSON-RPC endpoint with a local signer.
#[derive(Clone)]
pub struct EvmGateway {
    provider: DynProvider,
    account: Address,
}

impl EvmGateway {
    /// Connect to an RPC endpoint, signing with the given key.
    pub async fn connect(rpc_url: &str, signer: PrivateKeySigner) -> Result<Self, GatewayError> {
        let account = signer.address();
        let wallet = EthereumWallet::from(signer);
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect(rpc_url)
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?
            .erased();
        tracing::info!(rpc = rpc_url, account = %account, "connected gateway");
        Ok(Self { provider, account })
    }

    /// Build a gateway from an already constructed provider.
    pub fn from_provider(provider: DynProvider, account: Address) -> Self {
        Self { provider, account }
    }
}

#[async_trait]
impl ChainGateway for EvmGateway {
    async fn connected_account(&self) -> Result<Address, GatewayError> {
        Ok(self.account)
    }

    async fn transaction_count(&self, account: Address) -> Result<u64, GatewayError> {
        self.provider
            .get_transaction_count(account)
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))
    }

    fn contract(
        &self,
        abi_json: &str,
        address: Address,
    ) -> Result<Arc<dyn ContractHandle>, GatewayError> {
        let abi: JsonAbi =
            serde_json::from_str(abi_json).map_err(|e| GatewayError::Abi(e.to_string()))?;
        let instance =
            ContractInstance::new(address, self.provider.clone(), Interface::new(abi));
        Ok(Arc::new(EvmContract { instance }))
    }
}

struct EvmContract {
    instance: ContractInstance<DynProvider>,
}

impl EvmContract {
    fn builder<'a>(
        &'a self,
        function: &str,
        args: &'a [DynSolValue],
        options: &TxOptions,
    ) -> Result<alloy::contract::DynCallBuilder<&'a DynProvider>, GatewayError> {
        let mut call = self
            .instance
            .function(function, args)
            .map_err(|e| GatewayError::InvalidArguments {
                function: function.to_string(),
                reason: e.to_string(),
            })?;
        if let Some(value) = options.value {
            call = call.value(value);
        }
        if let Some(gas) = options.gas {
            call = call.gas(gas);
        }
        if let Some(gas_price) = options.gas_price {
            call = call.gas_price(gas_price);
        }
        if let Some(nonce) = options.nonce {
            call = call.nonce(nonce);
        }
        if let Some(from) = options.from {
            call = call.from(from);
        }
        Ok(call)
    }
}

#[async_trait]
impl ContractHandle for EvmContract {
    fn address(&self) -> Address {
        *self.instance.address()
    }

    async fn call(
        &self,
        function: &str,
        args: &[DynSolValue],
    ) -> Result<Vec<DynSolValue>, GatewayError> {
        let call = self.builder(function, args, &TxOptions::default())?;
        call.call()
            .await
            .map_err(|e| GatewayError::ContractCall(e.to_string()))
    }

    fn encode(&self, function: &str, args: &[DynSolValue]) -> Result<Vec<u8>, GatewayError> {
        let call = self.builder(function, args, &TxOptions::default())?;
        Ok(call.calldata().to_vec())
    }

    async fn estimate_gas(
        &self,
        function: &str,
        args: &[DynSolValue],
        options: &TxOptions,
    ) -> Result<u64, GatewayError> {
        let call = self.builder(function, args, options)?;
        call.estimate_gas()
            .await
            .map_err(|e| GatewayError::ContractCall(e.to_string()))
    }

    async fn send(
        &self,
        function: &str,
        args: &[DynSolValue],
        options: &TxOptions,
    ) -> Result<TxReceipt, GatewayError> {
        let call = self.builder(function, args, options)?;
        let pending = call
            .send()
            .await
            .map_err(|e| GatewayError::ContractCall(e.to_string()))?;
        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(TxReceipt {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            status: receipt.status(),
            gas_used: receipt.gas_used,
        })
    }
}
