//! Payment orchestration.
//!
//! A transfer walks one decision procedure: a beneficiary that is already a
//! chain address is tipped directly; an identifier that resolves to a
//! registered address is tipped at that address; anything else is escrowed in
//! the "send to anyone" contract under a password-salted hash, and the caller
//! gets back a claim password plus a claim URL for the recipient. Batch
//! variants pack many payments into one `batch(bytes[])` call per contract.
//!
//! Value attachment rules differ per path and must match the deployed
//! contracts exactly: tips attach `amount` for native assets and the quoted
//! fee otherwise, escrowed sends attach `amount + fee` for native assets and
//! the fee otherwise. In the escrow batch the native amount argument itself
//! carries `amount + fee`.

use crate::asset::{AssetLiability, AssetType};
use crate::client::TagPayClient;
use crate::error::{Error, Result};
use crate::gateway::{self, GatewayError, TxOptions, TxReceipt};
use crate::tags::{self, ResolveOptions, TagNetwork};
use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, U256};
use std::collections::HashMap;

/// Placeholder in claim URLs until the batch is mined and the block is known.
const BLOCK_PLACEHOLDER: &str = "$TBD$";

/// One payment order inside a batch.
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    pub beneficiary: String,
    pub wallet_type: ResolveOptions,
    pub asset: AssetLiability,
    pub message: String,
}

/// Claim data handed back for an escrowed payment.
#[derive(Debug, Clone)]
pub struct ClaimRecord {
    /// Registry hash the funds are held under, before password salting.
    pub beneficiary_hash: String,
    /// 32 hex characters, needed to claim.
    pub claim_password: String,
    pub claim_url: String,
}

/// Result of a single transfer.
#[derive(Debug, Clone)]
pub enum TransferReceipt {
    /// Sent through the tipping contract to a known address.
    Tipped(TxReceipt),
    /// Escrowed for an unregistered recipient.
    Escrowed { receipt: TxReceipt, claim: ClaimRecord },
}

/// Result of a batch transfer, split by contract path.
#[derive(Debug, Clone, Default)]
pub struct MultiTransferReceipt {
    pub tipping_receipt: Option<TxReceipt>,
    pub escrow_receipt: Option<TxReceipt>,
    /// One record per escrowed payment, in intent order.
    pub claims: Vec<ClaimRecord>,
}

enum Routed<'a> {
    Tip {
        intent: &'a PaymentIntent,
        destination: Address,
    },
    Escrow {
        intent: &'a PaymentIntent,
        base_hash: String,
    },
}

impl TagPayClient {
    /// Transfer one asset to a beneficiary identifier or address.
    ///
    /// `options` seeds the submitted transactions with caller-chosen gas,
    /// gas price, nonce or sender; the attached value is always computed
    /// here and overrides whatever the caller set.
    pub async fn transfer(
        &self,
        beneficiary: &str,
        wallet_type: &ResolveOptions,
        asset: &AssetLiability,
        message: &str,
        options: TxOptions,
    ) -> Result<TransferReceipt> {
        require_evm(wallet_type)?;
        asset.validate()?;

        if self.gateway.is_address(beneficiary) {
            let destination = parse_destination(beneficiary)?;
            let receipt = self.send_tip(destination, asset, message, options).await?;
            return Ok(TransferReceipt::Tipped(receipt));
        }

        let tag = tags::wallet_tag_for(wallet_type)?;
        let base_hash = self.user_hash(wallet_type, beneficiary).await?;
        let resolved = self.resolve(beneficiary, wallet_type).await?;

        if let Some(address) = resolved.get(tag.tag_name) {
            let destination = parse_destination(address)?;
            let receipt = self.send_tip(destination, asset, message, options).await?;
            return Ok(TransferReceipt::Tipped(receipt));
        }

        let (receipt, claim) = self
            .send_to_anyone(&base_hash, beneficiary, asset, message, options)
            .await?;
        Ok(TransferReceipt::Escrowed { receipt, claim })
    }

    /// Transfer many assets at once, one batch call per contract path.
    ///
    /// All allowances are aggregated and settled up front, then registered
    /// recipients go into a tipping batch and unregistered ones into an
    /// escrow batch. Claim URLs carry a placeholder block number until the
    /// escrow batch is mined.
    pub async fn multitransfer(
        &self,
        intents: &[PaymentIntent],
        options: TxOptions,
    ) -> Result<MultiTransferReceipt> {
        let mut tipping_allowances = HashMap::new();
        let mut escrow_allowances = HashMap::new();
        let mut routed = Vec::with_capacity(intents.len());

        for intent in intents {
            intent.asset.validate()?;

            if self.gateway.is_address(&intent.beneficiary) {
                let destination = parse_destination(&intent.beneficiary)?;
                Self::aggregate_allowance(&mut tipping_allowances, &intent.asset);
                routed.push(Routed::Tip { intent, destination });
                continue;
            }

            require_evm(&intent.wallet_type)?;
            let tag = tags::wallet_tag_for(&intent.wallet_type)?;
            let base_hash = self.user_hash(&intent.wallet_type, &intent.beneficiary).await?;
            let resolved = self.resolve(&intent.beneficiary, &intent.wallet_type).await?;

            if let Some(address) = resolved.get(tag.tag_name) {
                let destination = parse_destination(address)?;
                Self::aggregate_allowance(&mut tipping_allowances, &intent.asset);
                routed.push(Routed::Tip { intent, destination });
            } else {
                Self::aggregate_allowance(&mut escrow_allowances, &intent.asset);
                routed.push(Routed::Escrow { intent, base_hash });
            }
        }

        let escrow_assets: Vec<AssetLiability> = escrow_allowances.into_values().collect();
        self.ensure_allowances(&escrow_assets, self.escrow.address(), options).await?;
        let tipping_assets: Vec<AssetLiability> = tipping_allowances.into_values().collect();
        self.ensure_allowances(&tipping_assets, self.tipping.address(), options).await?;

        let mut tip_calls = Vec::new();
        let mut tip_value = U256::ZERO;
        let mut escrow_calls = Vec::new();
        let mut escrow_value = U256::ZERO;
        let mut claims = Vec::new();

        for entry in &routed {
            match entry {
                Routed::Tip { intent, destination } => {
                    let fee = self
                        .tipping_payment_fee(intent.asset.amount(), intent.asset.asset_type())
                        .await?;
                    tip_value += match &intent.asset {
                        AssetLiability::Native { amount } => *amount,
                        _ => fee,
                    };
                    let (function, args) = tipping_call(*destination, &intent.asset, &intent.message);
                    tip_calls.push(DynSolValue::Bytes(self.tipping.encode(function, &args)?));
                }
                Routed::Escrow { intent, base_hash } => {
                    let fee = self
                        .escrow_payment_fee(intent.asset.amount(), intent.asset.asset_type())
                        .await?;
                    // the native amount argument absorbs the fee in the batch path
                    let (amount_arg, value_add) = match &intent.asset {
                        AssetLiability::Native { amount } => (*amount + fee, *amount + fee),
                        other => (other.amount(), fee),
                    };
                    escrow_value += value_add;

                    let claim_password = self.generate_claim_password();
                    let salted = self.derive_claim_hash(base_hash, &claim_password).await?;
                    let args =
                        send_to_anyone_args(&salted, amount_arg, &intent.asset, &intent.message);
                    escrow_calls.push(DynSolValue::Bytes(self.escrow.encode("sendToAnyone", &args)?));

                    let claim_url = self.claim_url(
                        &intent.beneficiary,
                        &intent.asset,
                        BLOCK_PLACEHOLDER,
                        &claim_password,
                    );
                    claims.push(ClaimRecord {
                        beneficiary_hash: base_hash.clone(),
                        claim_password,
                        claim_url,
                    });
                }
            }
        }

        let mut result = MultiTransferReceipt::default();
        if !tip_calls.is_empty() {
            let args = [DynSolValue::Array(tip_calls)];
            let batch_options = TxOptions { value: Some(tip_value), ..options };
            let receipt = self
                .send_with_gas(&self.tipping, "batch", &args, batch_options)
                .await?;
            result.tipping_receipt = Some(receipt);
        }
        if !escrow_calls.is_empty() {
            let args = [DynSolValue::Array(escrow_calls)];
            let batch_options = TxOptions { value: Some(escrow_value), ..options };
            let receipt = self
                .send_with_gas(&self.escrow, "batch", &args, batch_options)
                .await?;
            if let Some(block) = receipt.block_number {
                for claim in &mut claims {
                    claim.claim_url = claim.claim_url.replace(BLOCK_PLACEHOLDER, &block.to_string());
                }
            }
            result.escrow_receipt = Some(receipt);
            result.claims = claims;
        }
        Ok(result)
    }

    /// Claim an escrowed payment for a beneficiary identifier.
    ///
    /// When the caller leaves the nonce unset it is filled from the account's
    /// transaction count; claims are frequently the first transaction of a
    /// fresh wallet.
    pub async fn claim(
        &self,
        beneficiary: &str,
        claim_password: &str,
        wallet_type: &ResolveOptions,
        asset: &AssetLiability,
        mut options: TxOptions,
    ) -> Result<TxReceipt> {
        require_evm(wallet_type)?;
        asset.validate()?;

        let base_hash = self.user_hash(wallet_type, beneficiary).await?;
        if options.nonce.is_none() {
            let signer = self.gateway.connected_account().await?;
            options.nonce = Some(self.gateway.transaction_count(signer).await?);
        }

        let args = [
            DynSolValue::String(base_hash),
            DynSolValue::String(claim_password.to_string()),
            DynSolValue::Uint(U256::from(asset.asset_type().code()), 8),
            DynSolValue::Address(asset.token()),
        ];
        self.send_with_gas(&self.escrow, "claim", &args, options).await
    }

    /// Revert an escrowed-but-unclaimed payment.
    ///
    /// Pass-through to the escrow contract; contract-side failures surface
    /// unmodified.
    pub async fn revert_payment(
        &self,
        beneficiary_hash: &str,
        asset_type: AssetType,
        asset_address: Option<Address>,
        options: TxOptions,
    ) -> Result<TxReceipt> {
        let args = [
            DynSolValue::String(beneficiary_hash.to_string()),
            DynSolValue::Uint(U256::from(asset_type.code()), 8),
            DynSolValue::Address(asset_address.unwrap_or(Address::ZERO)),
        ];
        self.send_with_gas(&self.escrow, "revertPayment", &args, options).await
    }

    /// Cast an encoded vote through a funding round contract.
    ///
    /// The round contract only accepts native contributions; the asset's
    /// amount is attached as the transaction value.
    pub async fn vote(
        &self,
        encoded_vote: &[u8],
        asset: &AssetLiability,
        round_contract: Address,
        options: TxOptions,
    ) -> Result<TxReceipt> {
        let AssetLiability::Native { amount } = asset else {
            return Err(Error::UnsupportedVoteAsset(asset.asset_type()));
        };
        let round = self.gateway.contract(crate::abi::VOTING, round_contract)?;
        let args = [DynSolValue::Bytes(encoded_vote.to_vec())];
        let options = TxOptions { value: Some(*amount), ..options };
        self.send_with_gas(&round, "vote", &args, options).await
    }

    /// Balance currently escrowed under a hash for one asset.
    pub async fn escrow_balance(
        &self,
        beneficiary_hash: &str,
        asset_type: AssetType,
        asset_address: Option<Address>,
    ) -> Result<U256> {
        let outputs = self
            .escrow
            .call(
                "balanceOf",
                &[
                    DynSolValue::String(beneficiary_hash.to_string()),
                    DynSolValue::Uint(U256::from(asset_type.code()), 8),
                    DynSolValue::Address(asset_address.unwrap_or(Address::ZERO)),
                ],
            )
            .await?;
        Ok(gateway::decode_uint(outputs)?)
    }

    /// Fee quoted by the tipping contract for one payment.
    ///
    /// ERC20 tips are fee-exempt under the default policy: the deployed
    /// contract takes its cut from the token amount itself.
    pub async fn tipping_payment_fee(&self, amount: U256, asset_type: AssetType) -> Result<U256> {
        if asset_type == AssetType::Erc20 && self.config.fee_policy.erc20_tips_exempt {
            return Ok(U256::ZERO);
        }
        let outputs = self
            .tipping
            .call(
                "getPaymentFee",
                &[
                    DynSolValue::Uint(amount, 256),
                    DynSolValue::Uint(U256::from(asset_type.code()), 8),
                ],
            )
            .await?;
        Ok(gateway::decode_uint(outputs)?)
    }

    /// Fee quoted by the escrow contract for one payment.
    pub async fn escrow_payment_fee(&self, amount: U256, asset_type: AssetType) -> Result<U256> {
        let outputs = self
            .escrow
            .call(
                "getPaymentFee",
                &[
                    DynSolValue::Uint(amount, 256),
                    DynSolValue::Uint(U256::from(asset_type.code()), 8),
                ],
            )
            .await?;
        Ok(gateway::decode_uint(outputs)?)
    }

    async fn send_tip(
        &self,
        destination: Address,
        asset: &AssetLiability,
        message: &str,
        options: TxOptions,
    ) -> Result<TxReceipt> {
        let fee = self
            .tipping_payment_fee(asset.amount(), asset.asset_type())
            .await?;
        let value = match asset {
            AssetLiability::Native { amount } => *amount,
            _ => fee,
        };
        self.ensure_allowances(std::slice::from_ref(asset), self.tipping.address(), options)
            .await?;
        let (function, args) = tipping_call(destination, asset, message);
        let options = TxOptions { value: Some(value), ..options };
        self.send_with_gas(&self.tipping, function, &args, options).await
    }

    async fn send_to_anyone(
        &self,
        base_hash: &str,
        beneficiary: &str,
        asset: &AssetLiability,
        message: &str,
        options: TxOptions,
    ) -> Result<(TxReceipt, ClaimRecord)> {
        let fee = self
            .escrow_payment_fee(asset.amount(), asset.asset_type())
            .await?;
        let value = match asset {
            AssetLiability::Native { amount } => *amount + fee,
            _ => fee,
        };
        self.ensure_allowances(std::slice::from_ref(asset), self.escrow.address(), options)
            .await?;

        let claim_password = self.generate_claim_password();
        let salted = self.derive_claim_hash(base_hash, &claim_password).await?;
        let args = send_to_anyone_args(&salted, asset.amount(), asset, message);
        let send_options = TxOptions { value: Some(value), ..options };
        let receipt = self
            .send_with_gas(&self.escrow, "sendToAnyone", &args, send_options)
            .await?;

        let block = receipt
            .block_number
            .map(|b| b.to_string())
            .unwrap_or_else(|| BLOCK_PLACEHOLDER.to_string());
        let claim_url = self.claim_url(beneficiary, asset, &block, &claim_password);
        let claim = ClaimRecord {
            beneficiary_hash: base_hash.to_string(),
            claim_password,
            claim_url,
        };
        Ok((receipt, claim))
    }

    fn claim_url(
        &self,
        beneficiary: &str,
        asset: &AssetLiability,
        block: &str,
        claim_password: &str,
    ) -> String {
        let asset_id = match asset.asset_type() {
            AssetType::Erc721 | AssetType::Erc1155 => format!("&assetId={}", asset.token_id()),
            _ => String::new(),
        };
        let asset_address = match asset.asset_type() {
            AssetType::Native => String::new(),
            _ => format!("&assetAddress={}", asset.token()),
        };
        format!(
            "{}/claim?identifier={}&claimPassword={}{}&assetType={}{}&blockNumber={}",
            self.config.claim_url_base,
            beneficiary,
            claim_password,
            asset_id,
            asset.asset_type().code(),
            asset_address,
            block
        )
    }
}

fn require_evm(wallet_type: &ResolveOptions) -> Result<()> {
    match wallet_type.network {
        Some(TagNetwork::Evm) => Ok(()),
        Some(other) => Err(Error::UnsupportedNetwork(other)),
        None => Err(Error::MissingWalletType),
    }
}

fn parse_destination(input: &str) -> Result<Address> {
    input.parse().map_err(|_| {
        Error::Gateway(GatewayError::Decode(format!(
            "malformed destination address: {input}"
        )))
    })
}

fn tipping_call(
    destination: Address,
    asset: &AssetLiability,
    message: &str,
) -> (&'static str, Vec<DynSolValue>) {
    let message = DynSolValue::String(message.to_string());
    match asset {
        AssetLiability::Native { amount } => (
            "sendTo",
            vec![
                DynSolValue::Address(destination),
                DynSolValue::Uint(*amount, 256),
                message,
            ],
        ),
        AssetLiability::Erc20 { amount, token } => (
            "sendTokenTo",
            vec![
                DynSolValue::Address(destination),
                DynSolValue::Uint(*amount, 256),
                DynSolValue::Address(*token),
                message,
            ],
        ),
        AssetLiability::Erc721 { token, token_id } => (
            "sendERC721To",
            vec![
                DynSolValue::Address(destination),
                DynSolValue::Uint(*token_id, 256),
                DynSolValue::Address(*token),
                message,
            ],
        ),
        AssetLiability::Erc1155 { amount, token, token_id } => (
            "sendERC1155To",
            vec![
                DynSolValue::Address(destination),
                DynSolValue::Uint(*token_id, 256),
                DynSolValue::Uint(*amount, 256),
                DynSolValue::Address(*token),
                message,
            ],
        ),
    }
}

fn send_to_anyone_args(
    salted_hash: &str,
    amount_arg: U256,
    asset: &AssetLiability,
    message: &str,
) -> Vec<DynSolValue> {
    vec![
        DynSolValue::String(salted_hash.to_string()),
        DynSolValue::Uint(amount_arg, 256),
        DynSolValue::Uint(U256::from(asset.asset_type().code()), 8),
        DynSolValue::Address(asset.token()),
        DynSolValue::Uint(asset.token_id(), 256),
        DynSolValue::String(message.to_string()),
    ]
}
