//! Display helpers: address truncation, amount formatting, masking

use rust_decimal::Decimal;
use std::str::FromStr;

/// Truncate an address for display: `0x1234...cdef`
pub fn format_address(address: &str) -> String {
    const START: usize = 6;
    const END: usize = 4;
    if address.len() < START + END {
        return address.to_string();
    }
    format!("{}...{}", &address[..START], &address[address.len() - END..])
}

/// Format an amount string with exactly 2 decimal places; unparseable
/// input becomes "0.00"
pub fn format_amount(amount: &str) -> String {
    match Decimal::from_str(amount) {
        Ok(value) => {
            let mut rounded = value.round_dp(2);
            rounded.rescale(2);
            rounded.to_string()
        }
        Err(_) => "0.00".to_string(),
    }
}

/// Format an amount as dollars: `$12.34`
pub fn format_currency(amount: &str) -> String {
    format!("${}", format_amount(amount))
}

/// Mask an email for public display: `a***@example.com`
pub fn mask_email(email: &str) -> String {
    let Some((local, domain)) = email.split_once('@') else {
        return email.to_string();
    };
    if local.chars().count() <= 2 {
        return email.to_string();
    }
    match local.chars().next() {
        Some(first) => format!("{first}***@{domain}"),
        None => email.to_string(),
    }
}

/// Mask a phone number for public display: `+14***71`
pub fn mask_phone(phone: &str) -> String {
    if !phone.starts_with('+') {
        return phone.to_string();
    }
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() <= 4 {
        return phone.to_string();
    }
    format!("+{}***{}", &digits[..2], &digits[digits.len() - 2..])
}
