//! Client library for identifier-based crypto payments.
//!
//! Human-readable identifiers (email, phone number, @handle or a raw address)
//! are resolved to wallet addresses through an on-chain registry, keyed by
//! salted SHA-256 hashes so the registry never stores the identifiers
//! themselves. Transfers route automatically: registered recipients are paid
//! through a tipping contract, unregistered ones have funds escrowed behind a
//! password-protected hash they can claim after registering.
//!
//! The entry point is [`TagPayClient`], generic over a [`gateway::ChainGateway`]
//! for chain access and a [`api::TwitterLookup`] for handle resolution.
//!
//! ```no_run
//! use std::sync::Arc;
//! use tagpay::api::HttpTwitterLookup;
//! use tagpay::gateway::EvmGateway;
//! use tagpay::{ClientConfig, ResolveOptions, TagPayClient};
//!
//! # async fn run(signer: alloy::signers::local::PrivateKeySigner) -> tagpay::Result<()> {
//! let gateway = EvmGateway::connect("https://polygon-rpc.com", signer).await?;
//! let client = TagPayClient::new(
//!     Arc::new(gateway),
//!     Arc::new(HttpTwitterLookup::hosted()?),
//!     ClientConfig::default(),
//! )?;
//! let addresses = client.resolve("hello@idriss.xyz", &ResolveOptions::default()).await?;
//! # Ok(())
//! # }
//! ```

pub mod abi;
pub mod api;
pub mod asset;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod hash;
pub mod identifier;
pub mod payment;
pub mod tags;

mod allowance;
mod pricing;

pub use asset::{AssetLiability, AssetType};
pub use client::TagPayClient;
pub use config::{ClientConfig, ContractAddresses, FeePolicy};
pub use error::{Error, Result};
pub use payment::{
    ClaimRecord, MultiTransferReceipt, PaymentIntent, TransferReceipt,
};
pub use tags::{Coin, ResolveOptions, TagNetwork, WalletTag, WALLET_TAGS};
