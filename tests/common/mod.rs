//! Shared test doubles: an in-memory chain with scriptable contract behavior
//! and a canned handle lookup.

// not every test binary uses every helper
#![allow(dead_code)]

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, B256, I256, U256};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tagpay::api::TwitterLookup;
use tagpay::gateway::{ChainGateway, ContractHandle, GatewayError, TxOptions, TxReceipt};
use tagpay::{ClientConfig, Error, TagPayClient, WALLET_TAGS};

pub const BASE_FEE: u64 = 1_000;
pub const FEE_THRESHOLD: u64 = 100_000;

/// Flat fee up to the threshold, one percent above it.
pub fn fee_for(amount: U256) -> U256 {
    if amount <= U256::from(FEE_THRESHOLD) {
        U256::from(BASE_FEE)
    } else {
        amount / U256::from(100)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Registry,
    MultiRegistry,
    ReverseMapping,
    Escrow,
    Tipping,
    Oracle,
    Voting,
    Erc20,
    Erc721,
    Erc1155,
}

/// Record of one state-changing send.
#[derive(Debug, Clone)]
pub struct SentTx {
    pub role: Role,
    pub function: String,
    pub value: U256,
    pub gas: Option<u64>,
    pub nonce: Option<u64>,
}

#[derive(Default)]
pub struct ChainState {
    /// lookup key -> registered address string
    pub registry: HashMap<String, String>,
    /// address -> registered identifier (or platform ID)
    pub reverse: HashMap<Address, String>,
    /// (token, owner, spender) -> allowance
    pub erc20_allowances: HashMap<(Address, Address, Address), U256>,
    /// (token, token id) -> approved account
    pub erc721_approvals: HashMap<(Address, U256), Address>,
    /// (token, owner, operator) -> approved
    pub erc1155_operators: HashMap<(Address, Address, Address), bool>,
    /// (salted hash, asset type code, token) -> escrowed amount
    pub escrow_balances: HashMap<(String, u8, Address), U256>,
    pub sent: Vec<SentTx>,
    pub fail_next_send: bool,
    pub fail_registry: bool,
    pub fail_gas_estimation: bool,
    pub oracle_answer: u128,
    pub oracle_decimals: u8,
    next_block: u64,
}

impl ChainState {
    fn next_block(&mut self) -> u64 {
        self.next_block += 1;
        99 + self.next_block
    }
}

pub struct MockChain {
    pub state: Arc<Mutex<ChainState>>,
    pub account: Address,
    password_counter: AtomicU64,
}

impl MockChain {
    pub fn new() -> Self {
        let mut state = ChainState::default();
        state.oracle_answer = 80_000_000; // 0.80 in 8 decimals
        state.oracle_decimals = 8;
        Self {
            state: Arc::new(Mutex::new(state)),
            account: Address::repeat_byte(0xaa),
            password_counter: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl ChainGateway for MockChain {
    async fn connected_account(&self) -> Result<Address, GatewayError> {
        Ok(self.account)
    }

    async fn transaction_count(&self, _account: Address) -> Result<u64, GatewayError> {
        Ok(self.state.lock().unwrap().sent.len() as u64)
    }

    fn random_bytes(&self, len: usize) -> Vec<u8> {
        // deterministic but distinct per call
        let n = self.password_counter.fetch_add(1, Ordering::Relaxed);
        (0..len).map(|i| (n * 31 + i as u64) as u8).collect()
    }

    fn contract(
        &self,
        abi_json: &str,
        address: Address,
    ) -> Result<Arc<dyn ContractHandle>, GatewayError> {
        Ok(Arc::new(MockContract {
            role: role_for(abi_json),
            address,
            state: Arc::clone(&self.state),
        }))
    }
}

fn role_for(abi_json: &str) -> Role {
    if abi_json.contains("getMultipleIDriss") {
        Role::MultiRegistry
    } else if abi_json.contains("getIDriss") {
        Role::Registry
    } else if abi_json.contains("reverseIDriss") {
        Role::ReverseMapping
    } else if abi_json.contains("sendToAnyone") {
        Role::Escrow
    } else if abi_json.contains("sendTokenTo") {
        Role::Tipping
    } else if abi_json.contains("latestRoundData") {
        Role::Oracle
    } else if abi_json.contains("encodedVote") {
        Role::Voting
    } else if abi_json.contains("isApprovedForAll") {
        Role::Erc1155
    } else if abi_json.contains("getApproved") {
        Role::Erc721
    } else {
        Role::Erc20
    }
}

struct MockContract {
    role: Role,
    address: Address,
    state: Arc<Mutex<ChainState>>,
}

fn arg_string(args: &[DynSolValue], index: usize) -> String {
    match &args[index] {
        DynSolValue::String(s) => s.clone(),
        other => panic!("expected string argument, got {other:?}"),
    }
}

fn arg_uint(args: &[DynSolValue], index: usize) -> U256 {
    match &args[index] {
        DynSolValue::Uint(v, _) => *v,
        other => panic!("expected uint argument, got {other:?}"),
    }
}

fn arg_address(args: &[DynSolValue], index: usize) -> Address {
    match &args[index] {
        DynSolValue::Address(a) => *a,
        other => panic!("expected address argument, got {other:?}"),
    }
}

/// The escrow contract's password salting, mirrored for the mock.
pub fn salted_hash(base_hash: &str, claim_password: &str) -> String {
    tagpay::hash::derive_lookup_key(base_hash, claim_password)
}

#[async_trait]
impl ContractHandle for MockContract {
    fn address(&self) -> Address {
        self.address
    }

    async fn call(
        &self,
        function: &str,
        args: &[DynSolValue],
    ) -> Result<Vec<DynSolValue>, GatewayError> {
        let state = self.state.lock().unwrap();
        match (self.role, function) {
            (Role::Registry, "getIDriss") => {
                if state.fail_registry {
                    return Err(GatewayError::ContractCall("registry unavailable".into()));
                }
                let key = arg_string(args, 0);
                let address = state.registry.get(&key).cloned().unwrap_or_default();
                Ok(vec![DynSolValue::String(address)])
            }
            (Role::MultiRegistry, "getMultipleIDriss") => {
                let DynSolValue::Array(hashes) = &args[0] else {
                    panic!("expected array argument");
                };
                let entries = hashes
                    .iter()
                    .map(|hash| {
                        let DynSolValue::String(hash) = hash else {
                            panic!("expected string hash");
                        };
                        let address = state.registry.get(hash).cloned().unwrap_or_default();
                        DynSolValue::Tuple(vec![
                            DynSolValue::String(hash.clone()),
                            DynSolValue::String(address),
                        ])
                    })
                    .collect();
                Ok(vec![DynSolValue::Array(entries)])
            }
            (Role::ReverseMapping, "reverseIDriss") => {
                let address = arg_address(args, 0);
                let result = state.reverse.get(&address).cloned().unwrap_or_default();
                Ok(vec![DynSolValue::String(result)])
            }
            (Role::Escrow, "hashIDrissWithPassword") => Ok(vec![DynSolValue::String(
                salted_hash(&arg_string(args, 0), &arg_string(args, 1)),
            )]),
            (Role::Escrow | Role::Tipping, "getPaymentFee") => {
                Ok(vec![DynSolValue::Uint(fee_for(arg_uint(args, 0)), 256)])
            }
            (Role::Escrow, "balanceOf") => {
                let key = (
                    arg_string(args, 0),
                    arg_uint(args, 1).to::<u8>(),
                    arg_address(args, 2),
                );
                let balance = state.escrow_balances.get(&key).copied().unwrap_or_default();
                Ok(vec![DynSolValue::Uint(balance, 256)])
            }
            (Role::Oracle, "latestRoundData") => Ok(vec![
                DynSolValue::Uint(U256::from(1), 80),
                DynSolValue::Int(I256::try_from(state.oracle_answer).unwrap(), 256),
                DynSolValue::Uint(U256::ZERO, 256),
                DynSolValue::Uint(U256::ZERO, 256),
                DynSolValue::Uint(U256::from(1), 80),
            ]),
            (Role::Oracle, "decimals") => Ok(vec![DynSolValue::Uint(
                U256::from(state.oracle_decimals),
                8,
            )]),
            (Role::Erc20, "allowance") => {
                let key = (self.address, arg_address(args, 0), arg_address(args, 1));
                let allowance = state.erc20_allowances.get(&key).copied().unwrap_or_default();
                Ok(vec![DynSolValue::Uint(allowance, 256)])
            }
            (Role::Erc721, "getApproved") => {
                let key = (self.address, arg_uint(args, 0));
                let approved = state.erc721_approvals.get(&key).copied().unwrap_or_default();
                Ok(vec![DynSolValue::Address(approved)])
            }
            (Role::Erc1155, "isApprovedForAll") => {
                let key = (self.address, arg_address(args, 0), arg_address(args, 1));
                let approved = state.erc1155_operators.get(&key).copied().unwrap_or_default();
                Ok(vec![DynSolValue::Bool(approved)])
            }
            (role, function) => panic!("unexpected call {function} on {role:?}"),
        }
    }

    fn encode(&self, function: &str, args: &[DynSolValue]) -> Result<Vec<u8>, GatewayError> {
        Ok(format!("{:?}:{}:{}", self.role, function, args.len()).into_bytes())
    }

    async fn estimate_gas(
        &self,
        _function: &str,
        _args: &[DynSolValue],
        _options: &TxOptions,
    ) -> Result<u64, GatewayError> {
        if self.state.lock().unwrap().fail_gas_estimation {
            return Err(GatewayError::ContractCall("execution reverted".into()));
        }
        Ok(100_000)
    }

    async fn send(
        &self,
        function: &str,
        args: &[DynSolValue],
        options: &TxOptions,
    ) -> Result<TxReceipt, GatewayError> {
        let mut state = self.state.lock().unwrap();
        let status = !state.fail_next_send;
        state.fail_next_send = false;

        if status {
            match (self.role, function) {
                (Role::Escrow, "sendToAnyone") => {
                    let key = (
                        arg_string(args, 0),
                        arg_uint(args, 2).to::<u8>(),
                        arg_address(args, 3),
                    );
                    let amount = arg_uint(args, 1);
                    *state.escrow_balances.entry(key).or_default() += amount;
                }
                (Role::Escrow, "claim") => {
                    let key = (
                        salted_hash(&arg_string(args, 0), &arg_string(args, 1)),
                        arg_uint(args, 2).to::<u8>(),
                        arg_address(args, 3),
                    );
                    state.escrow_balances.remove(&key);
                }
                (Role::Escrow, "revertPayment") => {
                    let key = (
                        arg_string(args, 0),
                        arg_uint(args, 1).to::<u8>(),
                        arg_address(args, 2),
                    );
                    state.escrow_balances.remove(&key);
                }
                (Role::Erc20, "approve") => {
                    // the mock owner is fixed, spender comes from the args
                    let key = (self.address, Address::repeat_byte(0xaa), arg_address(args, 0));
                    state.erc20_allowances.insert(key, arg_uint(args, 1));
                }
                (Role::Erc721, "approve") => {
                    let key = (self.address, arg_uint(args, 1));
                    state.erc721_approvals.insert(key, arg_address(args, 0));
                }
                (Role::Erc1155, "setApprovalForAll") => {
                    let key = (self.address, Address::repeat_byte(0xaa), arg_address(args, 0));
                    state.erc1155_operators.insert(key, true);
                }
                _ => {}
            }
        }

        let block = state.next_block();
        state.sent.push(SentTx {
            role: self.role,
            function: function.to_string(),
            value: options.value.unwrap_or_default(),
            gas: options.gas,
            nonce: options.nonce,
        });

        Ok(TxReceipt {
            transaction_hash: B256::repeat_byte((block % 251) as u8),
            block_number: Some(block),
            status,
            gas_used: 50_000,
        })
    }
}

/// Canned handle lookup with bidirectional fixtures.
#[derive(Default)]
pub struct MockTwitter {
    pub ids: HashMap<String, String>,
    pub handles: HashMap<String, String>,
}

impl MockTwitter {
    pub fn with_handle(handle: &str, id: &str) -> Self {
        let mut lookup = Self::default();
        lookup.ids.insert(handle.to_string(), id.to_string());
        lookup
            .handles
            .insert(id.to_string(), handle.trim_start_matches('@').to_string());
        lookup
    }
}

#[async_trait]
impl TwitterLookup for MockTwitter {
    async fn id_for_handle(&self, handle: &str) -> Result<Option<String>, Error> {
        Ok(self.ids.get(handle).cloned())
    }

    async fn handle_for_id(&self, id: &str) -> Result<Option<String>, Error> {
        Ok(self.handles.get(id).cloned())
    }
}

/// Seed a registration for an already-normalized identifier under a tag name.
pub fn register(state: &Arc<Mutex<ChainState>>, identifier: &str, tag_name: &str, address: &str) {
    let tag = WALLET_TAGS
        .iter()
        .find(|t| t.tag_name == tag_name)
        .unwrap_or_else(|| panic!("unknown tag {tag_name}"));
    let key = tagpay::hash::derive_lookup_key(identifier, tag.tag_address);
    state.lock().unwrap().registry.insert(key, address.to_string());
}

/// Client over a fresh mock chain and an empty handle lookup.
pub fn test_client() -> (TagPayClient, Arc<Mutex<ChainState>>) {
    test_client_with(MockTwitter::default(), ClientConfig::default())
}

pub fn test_client_with(
    twitter: MockTwitter,
    config: ClientConfig,
) -> (TagPayClient, Arc<Mutex<ChainState>>) {
    let chain = MockChain::new();
    let state = Arc::clone(&chain.state);
    let client = TagPayClient::new(Arc::new(chain), Arc::new(twitter), config).unwrap();
    (client, state)
}
