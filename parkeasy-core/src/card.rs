/// Card-number checks for payment-method registration. Numbers arrive with
/// optional spacing ("4111 1111 1111 1111"); non-digits are stripped before
/// validation and only the last four digits are ever stored.

/// Luhn check over a 16-digit card number
pub fn luhn_valid(card_number: &str) -> bool {
    let digits: Vec<u32> = card_number.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 16 {
        return false;
    }

    let mut sum = 0;
    let mut should_double = false;

    for &digit in digits.iter().rev() {
        let mut digit = digit;
        if should_double {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
        should_double = !should_double;
    }

    sum % 10 == 0
}

/// Brand from the leading digits; "unknown" for anything unrecognized
pub fn card_brand(card_number: &str) -> &'static str {
    let digits: String = card_number.chars().filter(|c| c.is_ascii_digit()).collect();

    let first_two: u32 = digits.get(..2).and_then(|s| s.parse().ok()).unwrap_or(0);

    if digits.starts_with('4') {
        "visa"
    } else if (51..=55).contains(&first_two) {
        "mastercard"
    } else if first_two == 34 || first_two == 37 {
        "amex"
    } else if first_two == 62 {
        "unionpay"
    } else {
        "unknown"
    }
}

pub fn last4(card_number: &str) -> String {
    let digits: String = card_number.chars().filter(|c| c.is_ascii_digit()).collect();
    let start = digits.len().saturating_sub(4);
    digits[start..].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luhn_accepts_valid_numbers() {
        assert!(luhn_valid("4111111111111111"));
        assert!(luhn_valid("4111 1111 1111 1111"));
        assert!(luhn_valid("5500005555555559"));
    }

    #[test]
    fn test_luhn_rejects_invalid_numbers() {
        assert!(!luhn_valid("4111111111111112"));
        assert!(!luhn_valid("1234567890123456"));
        // Wrong length
        assert!(!luhn_valid("411111111111111"));
        assert!(!luhn_valid(""));
    }

    #[test]
    fn test_brand_detection() {
        assert_eq!(card_brand("4111111111111111"), "visa");
        assert_eq!(card_brand("5500005555555559"), "mastercard");
        assert_eq!(card_brand("3400000000000000"), "amex");
        assert_eq!(card_brand("3700000000000000"), "amex");
        assert_eq!(card_brand("6200000000000000"), "unionpay");
        assert_eq!(card_brand("9999000000000000"), "unknown");
    }

    #[test]
    fn test_last4() {
        assert_eq!(last4("4111 1111 1111 1111"), "1111");
        assert_eq!(last4("5500005555555559"), "5559");
    }
}
