/// Keeps only the digits of a price such as "£59,000" and reads them as a
/// whole amount. Text with no digits has no price.
pub fn parse_price(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_currency_and_separators() {
        assert_eq!(parse_price("£59,000"), Some(59000));
        assert_eq!(parse_price("Offers over £125,500"), Some(125500));
    }

    #[test]
    fn no_digits_no_price() {
        assert_eq!(parse_price("Price on application"), None);
        assert_eq!(parse_price(""), None);
    }

    #[test]
    fn absurdly_long_digit_run_has_no_price() {
        assert_eq!(parse_price(&"9".repeat(40)), None);
    }
}
