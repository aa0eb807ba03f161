//! Operator-facing texts.

pub const TAKE_PROFIT_PROMPT: &str = "Take profit at (%): ";
pub const COIN_PROMPT: &str = "Coin name: ";
pub const REPEAT_PROMPT: &str = "Run bot again? (yes/no) ";

pub const CANT_CONNECT: &str = "Cannot connect to the exchange api, please try again later.";
pub const OCO_FAILED: &str =
    "Failed to request OCO order. Please place the sell manually on the exchange.";
pub const BUY_FILLED: &str = "\tORDER SUCCESSFULLY FILLED!!!";
pub const OCO_PLACED: &str = "\tSELL OCO ORDER SUCCESSFULLY PLACED!!!";

pub fn budget_prompt(quote_asset: &str) -> String {
    format!("Total {quote_asset} to use: ")
}

pub fn cant_get_balance(quote_asset: &str, secondary_asset: &str) -> String {
    format!("Cannot get {quote_asset} and {secondary_asset} balance, please try again later.")
}
