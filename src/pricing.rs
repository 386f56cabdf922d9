//! Reference-currency pricing from the on-chain oracle.

use crate::client::TagPayClient;
use crate::error::{Error, Result};
use crate::gateway::{self, GatewayError};
use alloy::primitives::U256;

impl TagPayClient {
    /// Price of one reference-currency unit in the native currency's
    /// smallest denomination.
    ///
    /// The oracle quotes the native currency in reference units, so the
    /// inverse is computed as `10^18 * 10^decimals / answer` with integer
    /// truncation.
    pub async fn reference_price_in_smallest_unit(&self) -> Result<U256> {
        let round = self.price_oracle.call("latestRoundData", &[]).await?;
        let answer = gateway::decode_int_at(&round, 1)?;
        if answer.is_negative() || answer.is_zero() {
            return Err(Error::Gateway(GatewayError::Decode(format!(
                "oracle answer must be positive, got {answer}"
            ))));
        }
        let answer = answer.into_raw();

        let decimals =
            gateway::decode_uint(self.price_oracle.call("decimals", &[]).await?)?;
        let scale = U256::from(10).pow(U256::from(18)) * U256::from(10).pow(decimals);
        Ok(scale / answer)
    }
}
