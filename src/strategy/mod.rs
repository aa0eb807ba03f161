pub mod price_levels;

pub use price_levels::{
    STOP_LIMIT_PERCENT, STOP_PERCENT, decimal_places, derive_price, sell_levels,
};
