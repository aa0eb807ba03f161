//! Operator answer validation. A failed validation never moves the workflow;
//! the same question is asked again.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

/// Unsigned decimal: `5`, `5.`, `5.25` or `.25`. No sign, no exponent.
static UNSIGNED_DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]+\.?[0-9]*|\.[0-9]+)$").expect("static pattern compiles")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a value.")]
    EmptyInput,
    #[error("Value should be number and decimal only.")]
    NotANumber,
    #[error("Minimum value is 0.")]
    NegativeValue,
    #[error("Value should not be more than available balance ({available}).")]
    ExceedsAvailableBalance { requested: Decimal, available: Decimal },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedValue {
    Number(Decimal),
    Text(String),
}

impl ParsedValue {
    pub fn into_text(self) -> String {
        match self {
            ParsedValue::Text(text) => text,
            ParsedValue::Number(value) => value.to_string(),
        }
    }
}

/// Checks one answer. Text answers come back trimmed.
pub fn validate(raw: &str, expect_numeric: bool) -> Result<ParsedValue, ValidationError> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(ValidationError::EmptyInput);
    }
    if !expect_numeric {
        return Ok(ParsedValue::Text(input.to_string()));
    }

    if !UNSIGNED_DECIMAL.is_match(input) {
        return Err(ValidationError::NotANumber);
    }
    let value = parse_unsigned(input)?;
    if value < Decimal::ZERO {
        return Err(ValidationError::NegativeValue);
    }
    Ok(ParsedValue::Number(value))
}

/// Numeric answer that must be a number.
pub fn validate_number(raw: &str) -> Result<Decimal, ValidationError> {
    match validate(raw, true)? {
        ParsedValue::Number(value) => Ok(value),
        ParsedValue::Text(_) => Err(ValidationError::NotANumber),
    }
}

/// Budget answer, capped by the quote balance fetched for this cycle.
pub fn validate_budget(raw: &str, available: Decimal) -> Result<Decimal, ValidationError> {
    let requested = validate_number(raw)?;
    if requested > available {
        return Err(ValidationError::ExceedsAvailableBalance {
            requested,
            available,
        });
    }
    Ok(requested)
}

fn parse_unsigned(input: &str) -> Result<Decimal, ValidationError> {
    let mut text = input.trim_end_matches('.').to_string();
    if text.starts_with('.') {
        text.insert(0, '0');
    }
    Decimal::from_str(&text).map_err(|_| ValidationError::NotANumber)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_or_blank_is_rejected() {
        assert_eq!(validate("", true), Err(ValidationError::EmptyInput));
        assert_eq!(validate("   ", false), Err(ValidationError::EmptyInput));
    }

    #[test]
    fn accepts_unsigned_decimals() {
        assert_eq!(validate_number("150"), Ok(dec!(150)));
        assert_eq!(validate_number(" 0.015 "), Ok(dec!(0.015)));
        assert_eq!(validate_number(".5"), Ok(dec!(0.5)));
        assert_eq!(validate_number("5."), Ok(dec!(5)));
        assert_eq!(validate_number("0"), Ok(dec!(0)));
    }

    #[test]
    fn rejects_non_numbers() {
        for raw in ["abc", "-1", "+1", "1e5", "1.2.3", ".", "1,5", "0x10", "- 1"] {
            assert_eq!(validate(raw, true), Err(ValidationError::NotANumber), "{raw}");
        }
    }

    #[test]
    fn text_is_trimmed() {
        assert_eq!(validate("  ada ", false), Ok(ParsedValue::Text("ada".to_string())));
        assert_eq!(validate("-1", false), Ok(ParsedValue::Text("-1".to_string())));
    }

    #[test]
    fn budget_above_balance_is_rejected() {
        assert_eq!(
            validate_budget("5", dec!(3)),
            Err(ValidationError::ExceedsAvailableBalance {
                requested: dec!(5),
                available: dec!(3),
            })
        );
        assert_eq!(validate_budget("3", dec!(3)), Ok(dec!(3)));
        assert_eq!(validate_budget("abc", dec!(3)), Err(ValidationError::NotANumber));
    }

    #[test]
    fn messages_match_prompts() {
        assert_eq!(ValidationError::NotANumber.to_string(), "Value should be number and decimal only.");
        assert_eq!(ValidationError::EmptyInput.to_string(), "Please enter a value.");
        assert_eq!(ValidationError::NegativeValue.to_string(), "Minimum value is 0.");
    }
}
