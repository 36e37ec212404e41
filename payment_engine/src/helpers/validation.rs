use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Order ids are non-empty and made of ASCII letters, digits, `_`, `.` and `-`.
pub fn is_valid_order_id(order_id: &str) -> bool {
    !order_id.is_empty() && order_id.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.as_ref().map(|re| re.is_match(email)).unwrap_or(false)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn order_ids() {
        for id in ["ORDER-1", "a", "evt_2024.03-xyz", "123"] {
            assert!(is_valid_order_id(id), "{id}");
        }
        for id in ["", "order 1", "order/1", "../etc", "pesanan#1", "ördér"] {
            assert!(!is_valid_order_id(id), "{id}");
        }
    }

    #[test]
    fn emails() {
        assert!(is_valid_email("ayu@example.co.id"));
        assert!(!is_valid_email("ayu@example"));
        assert!(!is_valid_email("ayu example@x.com"));
        assert!(!is_valid_email("@x.com"));
    }
}
