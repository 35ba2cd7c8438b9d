//! Display formatting for amounts and addresses.

use alloy::primitives::utils::format_units;
use alloy::primitives::{Address, U256};

/// Shown wherever an amount cannot be scaled yet (decimals or balance not
/// fetched). Never render an unscaled raw integer.
pub const AMOUNT_PLACEHOLDER: &str = "0.0000";

/// Scale a raw integer amount by the token decimals and render it with four
/// fractional digits.
pub fn format_amount(raw: U256, decimals: u8) -> String {
    let Ok(scaled) = format_units(raw, decimals) else {
        return AMOUNT_PLACEHOLDER.to_string();
    };
    match scaled.split_once('.') {
        Some((whole, frac)) => {
            let frac = &frac[..frac.len().min(4)];
            format!("{whole}.{frac:0<4}")
        }
        None => format!("{scaled}.0000"),
    }
}

/// `0x1234…abcd` style shortening for logs and headers.
pub fn truncate_address(address: &Address) -> String {
    let s = address.to_string();
    format!("{}...{}", &s[..6], &s[s.len() - 4..])
}
