//! Static wallet tag table.
//!
//! Every registered identifier is stored under one or more wallet tags. A tag
//! pairs a human-readable name ("Metamask ETH") with a fixed salt string that
//! diversifies the lookup hash per wallet type, plus the coin and network the
//! tag belongs to. The table is append-only in practice: salts are baked into
//! on-chain registrations and must never change.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Network family a wallet tag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagNetwork {
    #[serde(rename = "evm")]
    Evm,
    #[serde(rename = "btc")]
    Btc,
    #[serde(rename = "sol")]
    Sol,
}

impl Display for TagNetwork {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TagNetwork::Evm => write!(f, "evm"),
            TagNetwork::Btc => write!(f, "btc"),
            TagNetwork::Sol => write!(f, "sol"),
        }
    }
}

/// Coin a wallet tag is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coin {
    #[serde(rename = "ETH")]
    Eth,
    #[serde(rename = "BNB")]
    Bnb,
    #[serde(rename = "USDT")]
    Usdt,
    #[serde(rename = "USDC")]
    Usdc,
    #[serde(rename = "ELA")]
    Ela,
    #[serde(rename = "MATIC")]
    Matic,
    #[serde(rename = "ERC20")]
    Erc20,
    #[serde(rename = "BTC")]
    Btc,
    #[serde(rename = "SOL")]
    Sol,
}

impl Display for Coin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Coin::Eth => write!(f, "ETH"),
            Coin::Bnb => write!(f, "BNB"),
            Coin::Usdt => write!(f, "USDT"),
            Coin::Usdc => write!(f, "USDC"),
            Coin::Ela => write!(f, "ELA"),
            Coin::Matic => write!(f, "MATIC"),
            Coin::Erc20 => write!(f, "ERC20"),
            Coin::Btc => write!(f, "BTC"),
            Coin::Sol => write!(f, "SOL"),
        }
    }
}

/// One entry of the wallet tag table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletTag {
    pub tag_name: &'static str,
    /// Salt mixed into the lookup hash for this tag.
    pub tag_address: &'static str,
    pub coin: Coin,
    pub network: TagNetwork,
}

/// Filter narrowing which wallet tags participate in a resolution.
///
/// An unset field places no restriction. Wallet-type lookups that need a single
/// salt must set all three fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    pub coin: Option<Coin>,
    pub network: Option<TagNetwork>,
    pub wallet_tag: Option<String>,
}

impl ResolveOptions {
    pub fn coin(coin: Coin) -> Self {
        Self {
            coin: Some(coin),
            ..Self::default()
        }
    }

    /// A fully specified wallet type.
    pub fn wallet_type(network: TagNetwork, coin: Coin, wallet_tag: impl Into<String>) -> Self {
        Self {
            coin: Some(coin),
            network: Some(network),
            wallet_tag: Some(wallet_tag.into()),
        }
    }

    fn matches(&self, tag: &WalletTag) -> bool {
        self.coin.map_or(true, |c| c == tag.coin)
            && self.network.map_or(true, |n| n == tag.network)
            && self
                .wallet_tag
                .as_deref()
                .map_or(true, |t| t.trim() == tag.tag_name)
    }
}

/// Return the tags matching a filter, in table order.
pub fn matching_tags(options: &ResolveOptions) -> Vec<&'static WalletTag> {
    WALLET_TAGS.iter().filter(|tag| options.matches(tag)).collect()
}

/// Resolve a fully specified wallet type to its single tag.
///
/// Fails with [`Error::MissingWalletType`] when any field is unset and with
/// [`Error::AmbiguousWalletTag`] when the filter does not narrow to exactly
/// one entry.
pub fn wallet_tag_for(options: &ResolveOptions) -> Result<&'static WalletTag, Error> {
    if options.coin.is_none() || options.network.is_none() || options.wallet_tag.is_none() {
        return Err(Error::MissingWalletType);
    }
    let matched = matching_tags(options);
    match matched.as_slice() {
        [tag] => Ok(tag),
        other => Err(Error::AmbiguousWalletTag(other.len())),
    }
}

macro_rules! tag {
    ($name:literal, $salt:literal, $coin:ident, $network:ident) => {
        WalletTag {
            tag_name: $name,
            tag_address: $salt,
            coin: Coin::$coin,
            network: TagNetwork::$network,
        }
    };
}

/// The full tag table. Salt strings are fixed by existing registrations.
pub static WALLET_TAGS: [WalletTag; 39] = [
    tag!("Metamask ETH", "5d181abc9dcb7e79ce50e93db97addc1caf9f369257f61585889870555f8c321", Eth, Evm),
    tag!("Binance ETH", "4b118a4f0f3f149e641c6c43dd70283fcc07eacaa624efc762aa3843d85b2aba", Eth, Evm),
    tag!("Coinbase ETH", "92c7f97fb58ddbcb06c0d5a7cb720d74bc3c3aa52a0d706e477562cba68eeb73", Eth, Evm),
    tag!("Exchange ETH", "ec72020f224c088671cfd623235b59c239964a95542713390a2b6ba07dd1151c", Eth, Evm),
    tag!("Private ETH", "005ba8fbc4c85a25534ac36354d779ef35e0ee31f4f8732b02b61c25ee406edb", Eth, Evm),
    tag!("Essentials ETH", "3ea9415b82f0ee7db933aab0be377ee1c1a405969d8b8c2454bcce7372a161c2", Eth, Evm),
    tag!("Rainbow ETH", "992335db5f54ef94a5f23be8b925ed2529b044537c19b59643d39696936b6d6c", Eth, Evm),
    tag!("Argent ETH", "682614f9b037714bbf001db3a8d6e894fbdcf75cbbb9dea5a42edce33e880072", Eth, Evm),
    tag!("Tally ETH", "f368de8673a59b860b71f54c7ba8ab17f0b9648ad014797e5f8d8fa9f7f1d11a", Eth, Evm),
    tag!("Trust ETH", "df3d3f0233e396b2b27c3943269b10ecf2e7c1070a485e1b6b8f2201cb23cb52", Eth, Evm),
    tag!("Public ETH", "9306eda974cb89b82c0f38ab407f55b6d124159d1fa7779f2e088b2b786573c1", Eth, Evm),
    tag!("Metamask BNB", "3bee8eefc6afe6b4f7dbcc024eb3ad4ceaa5e458d34b7877319f2fe9f676e983", Bnb, Evm),
    tag!("Essentials BNB", "639c9abb5605a14a557957fa72e146e9abf727be32e5149dca377b647317ebb9", Bnb, Evm),
    tag!("Metamask USDT", "74a3d8986c81769ed3bb99b773d66b60852f7ee3fa0d55a6a144523116c671c1", Usdt, Evm),
    tag!("Binance USDT", "77c27c19cc85e24b1d4650800cc4b1bc607986dd3e78608435cececd31c35015", Usdt, Evm),
    tag!("Coinbase USDT", "f2faabf9d133f31a13873ba8a15e676e063a730898ffadfcb0077f723260f563", Usdt, Evm),
    tag!("Exchange USDT", "683e7b694b374ce0d81ba525361fa0c27fff7237eb12ec41b6e225449d5702b9", Usdt, Evm),
    tag!("Private USDT", "8c9a306a7dc200c52d32e3c1fcbf2f65e8037a68127b81807e8e58428004bc57", Usdt, Evm),
    tag!("Essentials USDT", "74dcb573a5c63382484f597ae8034a6153c011e291c01eb3da40e9d83c436a9a", Usdt, Evm),
    tag!("Metamask USDC", "6f763fea691b1a723ef116e98c02fae07a4397e1a2b4b4c749d06845fa2ff5e4", Usdc, Evm),
    tag!("Binance USDC", "7d2b0e0ee27a341da84ce56e95eb557988f9d4ff95fe452297fc765265bb27a2", Usdc, Evm),
    tag!("Coinbase USDC", "6fe7c1a2fdd154e0b35283598724adee9a5d3b2e6523787d8b6de7cd441f15ca", Usdc, Evm),
    tag!("Exchange USDC", "8c4a231c47a4cfa7530ba4361b6926da4acd87f569167b8ba55b268bf99640d0", Usdc, Evm),
    tag!("Private USDC", "54c9da06ab3d7c6c7f813f36491b22b7f312ae8f3b8d12866d35b5d325895e3e", Usdc, Evm),
    tag!("Essentials USDC", "23a66df178daf25111083ee1610fb253baf3d12bd74c6c2aae96077558e3737a", Usdc, Evm),
    tag!("Essentials ELA SC", "c17c556467fe7c9fe5667dde7ca8cdbca8a24d0473b9e9c1c2c8166c1f355f6c", Ela, Evm),
    tag!("Essentials MATIC", "336fb6cdd7fec196c6e66966bd1c326072538a94e700b8bc1111d1574b8357ba", Matic, Evm),
    tag!("ERC20", "63d95e64e7caff988f97fdf32de5f16624f971149749c90fbc7bbe44244d3ced", Erc20, Evm),
    tag!("Binance BTC", "450efeca15651e50995ed494ac24a945e61d67f60bed0dbb3b2d8d7df122a8ca", Btc, Btc),
    tag!("Coinbase BTC", "b3c77df93f865dd21a6196266d5c291adad15c7db9c81ddc78409a22f36ebe84", Btc, Btc),
    tag!("Exchange BTC", "a3f104cace8d66ed9971b19f749a821ae4397349155ea1a8724451c3e680335b", Btc, Btc),
    tag!("Private BTC", "a7d3f51b26dad11f5f4842d29f2fc419a48e3471bdec0a2c713c7d18d3143d65", Btc, Btc),
    tag!("Essentials BTC", "39d18497a64591bb1b061940309c453495398d00f9d9deab8b2c1e0979e4cbe7", Btc, Btc),
    tag!("Essentials ELA", "35ae820c72397977701524ee610e7ef2ca3d64539ccdc65e5198470d8e49eccb", Ela, Btc),
    tag!("Solana SOL", "62994eac84217f90c44d7acf962861f044a5f2e653400c154a8bcbf114da16fb", Sol, Sol),
    tag!("Coinbase SOL", "b5a72b6402de8a0fa649e23c81ae165dcfcce22c960a4a67a218243a73f49b1f", Sol, Sol),
    tag!("Trust SOL", "70190458e6435ad1e8f575ac60a7d8542ae5a4927aba336789de377a47b839d4", Sol, Sol),
    tag!("Binance SOL", "19cd4e6feb1efb40eb6506fb448a22cefeb63690ecaa35fee65914607adee606", Sol, Sol),
    tag!("Phantom SOL", "88f5c6ddb68a1cee77543f2de2788ade913b87bbac1c38d354707bc8ee3a0328", Sol, Sol),
];
