//! Allowance management for spender contracts.
//!
//! Before a transfer moves a non-native asset through the tipping or escrow
//! contract, the spender needs an on-chain approval. Each standard has its own
//! shape: ERC20 allowances are amounts, ERC721 approvals are per token ID and
//! ERC1155 only supports operator approval for all tokens. Approvals already
//! in place are left untouched.

use crate::abi;
use crate::asset::{AssetLiability, AssetType};
use crate::client::TagPayClient;
use crate::error::{Error, Result};
use crate::gateway::{self, TxOptions};
use alloy::dyn_abi::DynSolValue;
use alloy::primitives::Address;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

impl TagPayClient {
    /// Merge an asset into an aggregation map, one entry per approval unit.
    ///
    /// ERC721 approvals are granted per token ID, so those key on
    /// `(token, id)`; everything else keys on the token alone with amounts
    /// summed. Native assets are skipped.
    pub(crate) fn aggregate_allowance(
        map: &mut HashMap<String, AssetLiability>,
        asset: &AssetLiability,
    ) {
        if !asset.requires_allowance() {
            return;
        }
        let key = match asset.asset_type() {
            AssetType::Erc721 => format!("{}-{}", asset.token(), asset.token_id()),
            _ => asset.token().to_string(),
        };
        match map.entry(key) {
            Entry::Occupied(mut slot) => {
                let merged = match (slot.get(), asset) {
                    (
                        AssetLiability::Erc20 { amount, token },
                        AssetLiability::Erc20 { amount: add, .. },
                    ) => AssetLiability::Erc20 {
                        amount: *amount + *add,
                        token: *token,
                    },
                    (
                        AssetLiability::Erc1155 { amount, token, token_id },
                        AssetLiability::Erc1155 { amount: add, .. },
                    ) => AssetLiability::Erc1155 {
                        amount: *amount + *add,
                        token: *token,
                        token_id: *token_id,
                    },
                    (existing, _) => existing.clone(),
                };
                slot.insert(merged);
            }
            Entry::Vacant(slot) => {
                slot.insert(asset.clone());
            }
        }
    }

    /// Ensure on-chain approvals cover the given assets for a spender.
    ///
    /// Fails with [`Error::AllowanceSettingFailed`] when an approval
    /// transaction is mined but reverts.
    pub(crate) async fn ensure_allowances(
        &self,
        assets: &[AssetLiability],
        spender: Address,
        options: TxOptions,
    ) -> Result<()> {
        // value and nonce belong to the payment transaction, not the approvals
        let options = TxOptions { value: None, nonce: None, ..options };
        let owner = self.gateway.connected_account().await?;
        for asset in assets {
            asset.validate()?;
            match asset.asset_type() {
                AssetType::Native => {}
                AssetType::Erc20 => self.authorize_erc20(owner, spender, asset, options).await?,
                AssetType::Erc721 => self.authorize_erc721(spender, asset, options).await?,
                AssetType::Erc1155 => {
                    self.authorize_erc1155(owner, spender, asset, options).await?
                }
            }
        }
        Ok(())
    }

    async fn authorize_erc20(
        &self,
        owner: Address,
        spender: Address,
        asset: &AssetLiability,
        options: TxOptions,
    ) -> Result<()> {
        let token = self.gateway.contract(abi::ERC20, asset.token())?;
        let allowance = gateway::decode_uint(
            token
                .call(
                    "allowance",
                    &[DynSolValue::Address(owner), DynSolValue::Address(spender)],
                )
                .await?,
        )?;
        // equality still re-approves; only a strictly larger allowance is skipped
        if allowance > asset.amount() {
            debug!(token = %asset.token(), "ERC20 allowance already sufficient");
            return Ok(());
        }

        let args = [
            DynSolValue::Address(spender),
            DynSolValue::Uint(asset.amount(), 256),
        ];
        let receipt = self.send_with_gas(&token, "approve", &args, options).await?;
        if !receipt.status {
            return Err(Error::AllowanceSettingFailed(asset.token()));
        }
        Ok(())
    }

    async fn authorize_erc721(
        &self,
        spender: Address,
        asset: &AssetLiability,
        options: TxOptions,
    ) -> Result<()> {
        let token = self.gateway.contract(abi::ERC721, asset.token())?;
        let approved = gateway::decode_address(
            token
                .call("getApproved", &[DynSolValue::Uint(asset.token_id(), 256)])
                .await?,
        )?;
        if approved == spender {
            debug!(token = %asset.token(), "ERC721 token already approved");
            return Ok(());
        }

        let args = [
            DynSolValue::Address(spender),
            DynSolValue::Uint(asset.token_id(), 256),
        ];
        let receipt = self.send_with_gas(&token, "approve", &args, options).await?;
        if !receipt.status {
            return Err(Error::AllowanceSettingFailed(asset.token()));
        }
        Ok(())
    }

    async fn authorize_erc1155(
        &self,
        owner: Address,
        spender: Address,
        asset: &AssetLiability,
        options: TxOptions,
    ) -> Result<()> {
        let token = self.gateway.contract(abi::ERC1155, asset.token())?;
        let approved = gateway::decode_bool(
            token
                .call(
                    "isApprovedForAll",
                    &[DynSolValue::Address(owner), DynSolValue::Address(spender)],
                )
                .await?,
        )?;
        if approved {
            debug!(token = %asset.token(), "ERC1155 operator already approved");
            return Ok(());
        }

        // the standard has no granular approvals, operator-for-all is the only option
        let args = [DynSolValue::Address(spender), DynSolValue::Bool(true)];
        let receipt = self
            .send_with_gas(&token, "setApprovalForAll", &args, options)
            .await?;
        if !receipt.status {
            return Err(Error::AllowanceSettingFailed(asset.token()));
        }
        Ok(())
    }
}
