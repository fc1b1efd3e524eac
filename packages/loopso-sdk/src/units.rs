//! Token Amount Helpers
//!
//! Conversion between human-readable decimal amounts and raw base units.
//! Amounts are parsed from strings so no precision is lost to floating point.

use alloy::primitives::U256;

use crate::error::BridgeError;

fn invalid(amount: &str, reason: impl Into<String>) -> BridgeError {
    BridgeError::InvalidAmount {
        amount: amount.to_string(),
        reason: reason.into(),
    }
}

/// Convert a human-readable amount (e.g. "1.5") to raw token units
pub fn to_base_units(amount: &str, decimals: u8) -> Result<U256, BridgeError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(invalid(amount, "empty amount"));
    }
    if trimmed.starts_with('-') {
        return Err(invalid(amount, "amount must not be negative"));
    }

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid(amount, "no digits"));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid(amount, "not a decimal number"));
    }
    if fraction.len() > decimals as usize {
        return Err(invalid(
            amount,
            format!("more than {} fractional digits", decimals),
        ));
    }

    let mut digits = String::with_capacity(whole.len() + decimals as usize);
    digits.push_str(whole);
    digits.push_str(fraction);
    for _ in fraction.len()..decimals as usize {
        digits.push('0');
    }

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }

    U256::from_str_radix(digits, 10).map_err(|e| invalid(amount, e.to_string()))
}

/// Convert raw token units to a human-readable amount
pub fn from_base_units(raw: U256, decimals: u8) -> String {
    let digits = raw.to_string();
    let decimals = decimals as usize;

    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
    } else {
        digits
    };

    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}
