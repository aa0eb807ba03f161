use thiserror::Error;

/// Text the exchange returns for an unknown trading pair.
pub const INVALID_SYMBOL_TEXT: &str = "Invalid symbol.";

/// How a gateway failure is routed by the trade workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeErrorKind {
    /// Filter failure carrying an exchange code (`Filter failure: MARKET_LOT_SIZE`).
    RateOrSizeRejected,
    InvalidSymbol,
    /// No response from the exchange at all.
    ConnectivityFailure,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{raw_message}")]
pub struct ExchangeError {
    pub kind: ExchangeErrorKind,
    pub raw_message: String,
    /// Code after the colon for `RateOrSizeRejected`.
    pub code: Option<String>,
}

impl ExchangeError {
    /// Classifies a message returned by the exchange.
    ///
    /// A colon-delimited code wins over everything else, then the exact
    /// invalid-symbol text; anything else is `Unknown`.
    pub fn classify(raw: impl Into<String>) -> Self {
        let raw_message = raw.into();

        if let Some(code) = raw_message.split(':').nth(1) {
            let code = code.trim().to_string();
            return Self {
                kind: ExchangeErrorKind::RateOrSizeRejected,
                code: Some(code),
                raw_message,
            };
        }

        let kind = if raw_message == INVALID_SYMBOL_TEXT {
            ExchangeErrorKind::InvalidSymbol
        } else {
            ExchangeErrorKind::Unknown
        };
        Self {
            kind,
            raw_message,
            code: None,
        }
    }

    /// Transport failure, the request never got an answer.
    pub fn connectivity(raw: impl Into<String>) -> Self {
        Self {
            kind: ExchangeErrorKind::ConnectivityFailure,
            raw_message: raw.into(),
            code: None,
        }
    }

    /// Failure that is not an exchange message (unparseable body, missing
    /// fields). Never classified by its text.
    pub fn unknown(raw: impl Into<String>) -> Self {
        Self {
            kind: ExchangeErrorKind::Unknown,
            raw_message: raw.into(),
            code: None,
        }
    }

    /// Message shown to the operator. Known codes get a readable sentence,
    /// unknown codes fall back to the raw exchange text.
    pub fn operator_message(&self, quote_asset: &str) -> String {
        match self.kind {
            ExchangeErrorKind::InvalidSymbol => "Invalid coin name.".to_string(),
            ExchangeErrorKind::RateOrSizeRejected => self
                .code
                .as_deref()
                .and_then(|code| describe_code(code, quote_asset))
                .unwrap_or_else(|| self.raw_message.clone()),
            ExchangeErrorKind::ConnectivityFailure | ExchangeErrorKind::Unknown => {
                self.raw_message.clone()
            }
        }
    }
}

fn describe_code(code: &str, quote_asset: &str) -> Option<String> {
    let text = match code {
        "MARKET_LOT_SIZE" => format!("Total {quote_asset} is too high or too low."),
        "LOT_SIZE" => "Quantity is outside the allowed lot size.".to_string(),
        "MIN_NOTIONAL" => format!("Total {quote_asset} is below the minimum order value."),
        "NOTIONAL" => format!("Total {quote_asset} is outside the allowed order value."),
        "PRICE_FILTER" => "Price is outside the allowed range or tick size.".to_string(),
        "PERCENT_PRICE" | "PERCENT_PRICE_BY_SIDE" => {
            "Price is too far from the current market price.".to_string()
        }
        _ => return None,
    };
    Some(text)
}
