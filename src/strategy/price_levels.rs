//! Sell-side price levels derived from the buy fill.
//!
//! The exchange rejects prices that are off the instrument's tick size. The
//! tick size is approximated by the number of decimals in the fill price, so
//! every derived level is rounded (half-up) to that many decimals whenever the
//! raw product is finer.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::SellLevels;

/// Stop trigger, percent of the fill price.
pub const STOP_PERCENT: Decimal = Decimal::from_parts(55, 0, 0, false, 0);

/// Stop-limit price, percent of the fill price.
pub const STOP_LIMIT_PERCENT: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Number of decimals in `value` once trailing zeros are dropped.
pub fn decimal_places(value: Decimal) -> u32 {
    value.normalize().scale()
}

/// `reference_price * percent / 100`, rounded half-up to `reference_precision`
/// decimals when the product has more decimals than that. A precision of zero
/// leaves the product untouched.
pub fn derive_price(reference_price: Decimal, percent: Decimal, reference_precision: u32) -> Decimal {
    let naive = reference_price
        .saturating_mul(percent / Decimal::ONE_HUNDRED)
        .normalize();

    if reference_precision > 0 && naive.scale() > reference_precision {
        naive
            .round_dp_with_strategy(reference_precision, RoundingStrategy::MidpointAwayFromZero)
            .normalize()
    } else {
        naive
    }
}

/// Take-profit, stop and stop-limit prices for a fill.
pub fn sell_levels(fill_price: Decimal, take_profit_percent: Decimal) -> SellLevels {
    let precision = decimal_places(fill_price);
    SellLevels {
        take_profit_price: derive_price(fill_price, take_profit_percent, precision),
        stop_price: derive_price(fill_price, STOP_PERCENT, precision),
        stop_limit_price: derive_price(fill_price, STOP_LIMIT_PERCENT, precision),
    }
}
