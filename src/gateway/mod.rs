//! Chain access abstraction.
//!
//! The client never talks to a provider directly. It goes through
//! [`ChainGateway`] for account and chain queries and through [`ContractHandle`]
//! for everything contract-shaped: read calls, calldata encoding, gas
//! estimation and state-changing sends. Arguments and return values use
//! [`DynSolValue`] so the same plumbing serves every embedded ABI fragment.
//!
//! The production implementation lives in [`evm`]; tests substitute their own.

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, B256, I256, U256};
use async_trait::async_trait;
use rand::RngCore;
use std::str::FromStr;
use std::sync::Arc;

pub mod evm;

pub use evm::EvmGateway;

/// Errors raised by the chain access layer.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("failed to parse contract ABI: {0}")]
    Abi(String),
    #[error("function {0} not found in contract ABI")]
    UnknownFunction(String),
    #[error("invalid arguments for {function}: {reason}")]
    InvalidArguments { function: String, reason: String },
    #[error("contract call failed: {0}")]
    ContractCall(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("failed to decode return data: {0}")]
    Decode(String),
}

/// Options applied to a state-changing contract call.
#[derive(Debug, Clone, Copy, Default)]
pub struct TxOptions {
    pub value: Option<U256>,
    pub gas: Option<u64>,
    pub gas_price: Option<u128>,
    pub nonce: Option<u64>,
    pub from: Option<Address>,
}

/// Receipt of a mined transaction, reduced to what the client consumes.
#[derive(Debug, Clone)]
pub struct TxReceipt {
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    /// True when the transaction executed successfully.
    pub status: bool,
    pub gas_used: u64,
}

/// One deployed contract the client can interact with.
#[async_trait]
pub trait ContractHandle: Send + Sync {
    /// Deployment address of this contract.
    fn address(&self) -> Address;

    /// Execute a read-only call and return the decoded outputs.
    async fn call(
        &self,
        function: &str,
        args: &[DynSolValue],
    ) -> Result<Vec<DynSolValue>, GatewayError>;

    /// ABI-encode a call without executing it, for batching.
    fn encode(&self, function: &str, args: &[DynSolValue]) -> Result<Vec<u8>, GatewayError>;

    /// Estimate gas for a state-changing call.
    async fn estimate_gas(
        &self,
        function: &str,
        args: &[DynSolValue],
        options: &TxOptions,
    ) -> Result<u64, GatewayError>;

    /// Submit a state-changing call and wait for its receipt.
    async fn send(
        &self,
        function: &str,
        args: &[DynSolValue],
        options: &TxOptions,
    ) -> Result<TxReceipt, GatewayError>;
}

/// Access to accounts, chain state and contract construction.
#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Whether the input parses as a chain address.
    fn is_address(&self, input: &str) -> bool {
        Address::from_str(input).is_ok()
    }

    /// The account transactions are signed with.
    async fn connected_account(&self) -> Result<Address, GatewayError>;

    /// Current transaction count of an account.
    async fn transaction_count(&self, account: Address) -> Result<u64, GatewayError>;

    /// Cryptographically random bytes, used for claim passwords.
    fn random_bytes(&self, len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        rand::thread_rng().fill_bytes(&mut buf);
        buf
    }

    /// Instantiate a contract handle from an ABI fragment and address.
    fn contract(
        &self,
        abi_json: &str,
        address: Address,
    ) -> Result<Arc<dyn ContractHandle>, GatewayError>;
}

fn first(values: Vec<DynSolValue>) -> Result<DynSolValue, GatewayError> {
    values
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::Decode("empty return data".to_string()))
}

/// Decode a single string return value.
pub fn decode_string(values: Vec<DynSolValue>) -> Result<String, GatewayError> {
    match first(values)? {
        DynSolValue::String(s) => Ok(s),
        other => Err(GatewayError::Decode(format!("expected string, got {other:?}"))),
    }
}

/// Decode a single unsigned integer return value.
pub fn decode_uint(values: Vec<DynSolValue>) -> Result<U256, GatewayError> {
    match first(values)? {
        DynSolValue::Uint(v, _) => Ok(v),
        other => Err(GatewayError::Decode(format!("expected uint, got {other:?}"))),
    }
}

/// Decode a single boolean return value.
pub fn decode_bool(values: Vec<DynSolValue>) -> Result<bool, GatewayError> {
    match first(values)? {
        DynSolValue::Bool(b) => Ok(b),
        other => Err(GatewayError::Decode(format!("expected bool, got {other:?}"))),
    }
}

/// Decode a single address return value.
pub fn decode_address(values: Vec<DynSolValue>) -> Result<Address, GatewayError> {
    match first(values)? {
        DynSolValue::Address(a) => Ok(a),
        other => Err(GatewayError::Decode(format!("expected address, got {other:?}"))),
    }
}

/// Decode a signed integer at the given output position.
pub fn decode_int_at(values: &[DynSolValue], index: usize) -> Result<I256, GatewayError> {
    match values.get(index) {
        Some(DynSolValue::Int(v, _)) => Ok(*v),
        other => Err(GatewayError::Decode(format!(
            "expected int at output {index}, got {other:?}"
        ))),
    }
}
