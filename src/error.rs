//! Error types surfaced by the client library.
//!
//! Validation errors (identifier shape, asset address, network mismatch) are raised
//! before any network call. Chain-level failures are wrapped in [`Error::Gateway`]
//! and propagate unmodified; this library performs no retries of its own.

use crate::asset::AssetType;
use crate::gateway::GatewayError;
use crate::tags::TagNetwork;
use alloy::primitives::Address;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors the client can return.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input does not start with a valid phone number, email or @handle.
    #[error("not a valid identifier: input must start with a valid phone number, email or @handle")]
    InvalidIdentifier,

    /// The handle lookup service does not know this handle.
    #[error("Twitter handle {0} not found")]
    TwitterHandleNotFound(String),

    /// A wallet-type filter narrowed the tag table to something other than one entry.
    #[error("wallet filter matched {0} tags, expected exactly one")]
    AmbiguousWalletTag(usize),

    /// Wallet-type lookups require coin, network and tag name to all be set.
    #[error("wallet type must specify coin, network and wallet tag")]
    MissingWalletType,

    /// Non-native assets must carry a contract address.
    #[error("asset contract address is required for {0} transfers")]
    AssetAddressMissing(AssetType),

    /// An approval transaction was mined but reverted.
    #[error("setting asset allowance failed for token {0}, check your asset balance")]
    AllowanceSettingFailed(Address),

    /// Payments are only supported on EVM-family networks.
    #[error("transfers on network {0} are not supported")]
    UnsupportedNetwork(TagNetwork),

    /// Voting rounds take native contributions only.
    #[error("voting supports native assets only, got {0}")]
    UnsupportedVoteAsset(AssetType),

    /// The authorization service rejected the one-time password.
    #[error("one-time password rejected: {0}")]
    WrongOtp(String),

    /// Any non-success HTTP response without a more specific meaning.
    #[error("remote service returned status {status}: {message}")]
    RemoteService { status: u16, message: String },

    /// HTTP transport failure talking to an external service.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Chain access failure (contract call, transaction, decoding).
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
