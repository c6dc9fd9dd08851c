//! Phone number and digit utilities

/// Replace Arabic-Indic (U+0660..U+0669) and Extended Arabic-Indic
/// (U+06F0..U+06F9) digits with their ASCII equivalents
pub fn latinize_digits(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
            '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
            other => other,
        })
        .collect()
}

/// Remove whitespace and the separators people type inside phone numbers
pub fn strip_phone_punctuation(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')' | '.'))
        .collect()
}

/// Mask a phone number for logs (e.g., +97****4567)
pub fn mask_phone_number(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() >= 7 {
        let head: String = chars[..3].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}****{}", head, tail)
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latinize_digits() {
        assert_eq!(latinize_digits("٠٥٠١٢٣٤٥٦٧"), "0501234567");
        assert_eq!(latinize_digits("۰۵۰۱۲۳۴۵۶۷"), "0501234567");
        assert_eq!(latinize_digits("+972 ٥0"), "+972 50");
    }

    #[test]
    fn test_strip_phone_punctuation() {
        assert_eq!(strip_phone_punctuation("050-123 4567"), "0501234567");
        assert_eq!(strip_phone_punctuation("+972 (50) 123.4567"), "+972501234567");
        assert_eq!(strip_phone_punctuation("\t050\u{00A0}1234567\n"), "0501234567");
    }

    #[test]
    fn test_mask_phone_number() {
        assert_eq!(mask_phone_number("+972501234567"), "+97****4567");
        assert_eq!(mask_phone_number("0501234567"), "050****4567");
        assert_eq!(mask_phone_number("12345"), "****");
    }
}
