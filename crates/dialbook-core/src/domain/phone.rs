/// Keeps only the ASCII digits of `value`, dropping spaces, dashes,
/// parentheses, plus signs and any other formatting.
pub fn phone_digits(value: &str) -> String {
    value.chars().filter(|ch| ch.is_ascii_digit()).collect()
}

/// Returns true when the digits of `phone` contain `digits`.
///
/// An empty `digits` never matches; otherwise every number would match a
/// query made only of punctuation.
pub fn phone_contains_digits(phone: &str, digits: &str) -> bool {
    if digits.is_empty() {
        return false;
    }
    phone_digits(phone).contains(digits)
}

#[cfg(test)]
mod tests {
    use super::{phone_contains_digits, phone_digits};

    #[test]
    fn phone_digits_strips_formatting() {
        assert_eq!(phone_digits("  (415) 555-1212  "), "4155551212");
        assert_eq!(phone_digits("+1 (415) 555-1212"), "14155551212");
    }

    #[test]
    fn phone_digits_of_text_is_empty() {
        assert_eq!(phone_digits("ext -"), "");
    }

    #[test]
    fn phone_contains_digits_ignores_formatting() {
        assert!(phone_contains_digits("555-1234", "5551234"));
        assert!(phone_contains_digits("+34 (91) 555 12 34", "9155512"));
        assert!(!phone_contains_digits("555-9999", "5551234"));
    }

    #[test]
    fn phone_contains_digits_rejects_empty_needle() {
        assert!(!phone_contains_digits("123", ""));
    }
}
