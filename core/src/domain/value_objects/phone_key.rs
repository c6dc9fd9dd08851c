//! Canonical phone key used to address challenges

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use cb_shared::utils::phone::{latinize_digits, mask_phone_number, strip_phone_punctuation};

use crate::errors::OtpError;

/// Israeli country code used for local and marker-less numbers
pub const DEFAULT_COUNTRY_CODE: &str = "972";

// E.164: leading '+', no leading zero in the country code, up to 15 digits
static E164_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[1-9]\d{6,14}$").unwrap());

// Local subscriber form: trunk prefix 0 followed by nine digits (05XXXXXXXX)
static LOCAL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0([1-9]\d{8})$").unwrap());

// International form without '+' (9725XXXXXXXX)
static MISSING_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^972[1-9]\d{8}$").unwrap());

// International form that kept the local trunk zero (+97205XXXXXXXX)
static TRUNK_ZERO_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+9720([1-9]\d{8})$").unwrap());

/// A phone number in canonical international (E.164) form
///
/// Every spelling of the same subscriber number (local, foreign digit
/// glyphs, with or without the `+` marker) yields the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PhoneKey(String);

impl PhoneKey {
    /// Canonicalize a user supplied phone string
    ///
    /// # Errors
    ///
    /// Returns `OtpError::InvalidPhoneFormat` when the cleaned input is not a
    /// recognized local, marker-less international or E.164 number.
    pub fn normalize(raw: &str) -> Result<Self, OtpError> {
        let cleaned = strip_phone_punctuation(&latinize_digits(raw));

        let candidate = if let Some(rest) = cleaned.strip_prefix("00") {
            format!("+{}", rest)
        } else if cleaned.starts_with('+') {
            cleaned
        } else if MISSING_MARKER_REGEX.is_match(&cleaned) {
            format!("+{}", cleaned)
        } else if let Some(caps) = LOCAL_REGEX.captures(&cleaned) {
            format!("+{}{}", DEFAULT_COUNTRY_CODE, &caps[1])
        } else {
            return Err(invalid(raw));
        };

        let candidate = match TRUNK_ZERO_REGEX.captures(&candidate) {
            Some(caps) => format!("+{}{}", DEFAULT_COUNTRY_CODE, &caps[1]),
            None => candidate,
        };

        if E164_REGEX.is_match(&candidate) {
            Ok(Self(candidate))
        } else {
            Err(invalid(raw))
        }
    }

    /// The canonical string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Masked form for logs
    pub fn masked(&self) -> String {
        mask_phone_number(&self.0)
    }
}

fn invalid(raw: &str) -> OtpError {
    OtpError::InvalidPhoneFormat {
        phone: raw.trim().to_string(),
    }
}

impl std::fmt::Display for PhoneKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PhoneKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: &str = "+972501234567";

    #[test]
    fn test_all_spellings_share_one_key() {
        let spellings = [
            "+972501234567",
            "972501234567",
            "0501234567",
            "050-123-4567",
            "(050) 123 4567",
            "٠٥٠١٢٣٤٥٦٧",
            "۰۵۰۱۲۳۴۵۶۷",
            "+972 50 123 4567",
            "00972501234567",
            "+9720501234567",
            "  0501234567\n",
        ];
        for spelling in spellings {
            let key = PhoneKey::normalize(spelling).unwrap();
            assert_eq!(key.as_str(), CANONICAL, "spelling {:?}", spelling);
        }
    }

    #[test]
    fn test_foreign_e164_is_kept() {
        let key = PhoneKey::normalize("+1 (415) 555-2671").unwrap();
        assert_eq!(key.as_str(), "+14155552671");
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        for raw in ["", "   ", "12345", "050123456", "05012345678", "+0501234567", "phone", "+972-abc"] {
            let err = PhoneKey::normalize(raw).unwrap_err();
            assert!(
                matches!(err, OtpError::InvalidPhoneFormat { .. }),
                "input {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_masked_hides_subscriber_digits() {
        let key = PhoneKey::normalize("0501234567").unwrap();
        assert_eq!(key.masked(), "+97****4567");
        assert_eq!(key.to_string(), CANONICAL);
    }
}
