//! Formatting and identifier helpers

use rust_decimal::{Decimal, RoundingStrategy};

/// Format a transaction amount for display, e.g. `+$2,000.00` or `-$4.50`.
///
/// The sign comes from `is_income`; `amount` is treated as a magnitude.
pub fn format_amount(
    amount: Decimal,
    is_income: bool,
    symbol: &str,
    decimal_places: u32,
    thousands_separator: &str,
) -> String {
    let mut rounded = amount
        .abs()
        .round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(decimal_places);

    let text = rounded.to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (text.as_str(), None),
    };

    let sign = if is_income { '+' } else { '-' };
    let mut out = format!("{}{}{}", sign, symbol, group_thousands(whole, thousands_separator));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Insert `separator` between every group of three digits
pub fn group_thousands(digits: &str, separator: &str) -> String {
    let len = digits.chars().count();
    let mut result = String::with_capacity(digits.len() + len / 3 * separator.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push_str(separator);
        }
        result.push(c);
    }
    result
}

/// Shorten `text` to `max_chars` characters, appending `...` when cut
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Generate a unique transaction id
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
