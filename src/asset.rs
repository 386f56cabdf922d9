//! Asset model for transfers.
//!
//! An [`AssetLiability`] describes one thing to move: native coin, an ERC20
//! amount, a single ERC721 token or an ERC1155 position. The numeric type
//! codes are part of the escrow and tipping contract ABIs and must not change.

use crate::error::Error;
use alloy::primitives::{Address, U256};
use std::fmt::{Display, Formatter};

/// Contract-level asset type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetType {
    Native,
    Erc20,
    Erc721,
    Erc1155,
}

impl AssetType {
    /// The uint8 code passed to contract calls.
    pub fn code(&self) -> u8 {
        match self {
            AssetType::Native => 0,
            AssetType::Erc20 => 1,
            AssetType::Erc721 => 2,
            AssetType::Erc1155 => 3,
        }
    }
}

impl Display for AssetType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetType::Native => write!(f, "native"),
            AssetType::Erc20 => write!(f, "ERC20"),
            AssetType::Erc721 => write!(f, "ERC721"),
            AssetType::Erc1155 => write!(f, "ERC1155"),
        }
    }
}

/// A single asset liability to transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetLiability {
    Native { amount: U256 },
    Erc20 { amount: U256, token: Address },
    Erc721 { token: Address, token_id: U256 },
    Erc1155 { amount: U256, token: Address, token_id: U256 },
}

impl AssetLiability {
    pub fn asset_type(&self) -> AssetType {
        match self {
            AssetLiability::Native { .. } => AssetType::Native,
            AssetLiability::Erc20 { .. } => AssetType::Erc20,
            AssetLiability::Erc721 { .. } => AssetType::Erc721,
            AssetLiability::Erc1155 { .. } => AssetType::Erc1155,
        }
    }

    /// Amount passed as the contract argument. An ERC721 always moves one token.
    pub fn amount(&self) -> U256 {
        match self {
            AssetLiability::Native { amount }
            | AssetLiability::Erc20 { amount, .. }
            | AssetLiability::Erc1155 { amount, .. } => *amount,
            AssetLiability::Erc721 { .. } => U256::from(1),
        }
    }

    /// Token contract address, zero for native.
    pub fn token(&self) -> Address {
        match self {
            AssetLiability::Native { .. } => Address::ZERO,
            AssetLiability::Erc20 { token, .. }
            | AssetLiability::Erc721 { token, .. }
            | AssetLiability::Erc1155 { token, .. } => *token,
        }
    }

    /// Token ID, zero where the asset class has none.
    pub fn token_id(&self) -> U256 {
        match self {
            AssetLiability::Erc721 { token_id, .. } | AssetLiability::Erc1155 { token_id, .. } => {
                *token_id
            }
            _ => U256::ZERO,
        }
    }

    /// Whether moving this asset through a spender contract needs an approval.
    pub fn requires_allowance(&self) -> bool {
        !matches!(self, AssetLiability::Native { .. })
    }

    /// Fail fast when a non-native asset is missing its contract address.
    pub fn validate(&self) -> Result<(), Error> {
        if self.requires_allowance() && self.token() == Address::ZERO {
            return Err(Error::AssetAddressMissing(self.asset_type()));
        }
        Ok(())
    }
}
