use rust_decimal::{Decimal, RoundingStrategy};

use crate::{models::BITCOIN_PRECISION, services::blockchain::BlockChainError};

/// Confirmation target, in blocks, passed to `estimatesmartfee`
pub const FEE_CONFIRMATION_TARGET: u64 = 2;

/// Factor applied to the node's quote to absorb fee movement between quote and broadcast
pub const FEE_SAFETY_MULTIPLIER: Decimal = Decimal::TWO;

/// Turns the node's fee quote into the rate handed to wallets.
///
/// The quote is doubled, raised to `minimum_fee_rate` if below it, and rounded
/// half away from zero to 8 decimal places. The floor itself is rounded up, so
/// the result is never below it.
pub fn apply_fee_policy(
	quoted_rate: Decimal,
	minimum_fee_rate: Decimal,
) -> Result<Decimal, BlockChainError> {
	if quoted_rate <= Decimal::ZERO {
		return Err(BlockChainError::validation_error(
			format!("Node returned a non-positive fee rate: {}", quoted_rate),
			None,
			None,
		));
	}

	let doubled = quoted_rate
		.checked_mul(FEE_SAFETY_MULTIPLIER)
		.ok_or_else(|| {
			BlockChainError::validation_error(
				format!("Fee rate {} overflows when doubled", quoted_rate),
				None,
				None,
			)
		})?;

	let floor =
		minimum_fee_rate.round_dp_with_strategy(BITCOIN_PRECISION, RoundingStrategy::ToPositiveInfinity);

	Ok(doubled
		.max(floor)
		.round_dp_with_strategy(BITCOIN_PRECISION, RoundingStrategy::MidpointAwayFromZero))
}
