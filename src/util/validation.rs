use once_cell::sync::Lazy;
use regex::Regex;

const NICK_MIN: usize = 3;
const NICK_MAX: usize = 30;

#[allow(clippy::unwrap_used)]
static NICK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9\.\-_]*[A-Za-z0-9_]$").unwrap());

#[allow(clippy::unwrap_used)]
static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 \-]{5,18}[0-9]$").unwrap());

const TITLE_MAX: usize = 200;

/// Nicks are public handles, so they are kept to a small set of
/// URL-safe characters.
pub fn is_valid_nick(nick: &str) -> bool {
    (NICK_MIN..=NICK_MAX).contains(&nick.len()) && NICK_REGEX.is_match(nick)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

/// Titles of properties, equipment and articles.
pub fn is_valid_title(title: &str) -> bool {
    let title = title.trim();
    !title.is_empty() && title.chars().count() <= TITLE_MAX
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_nick() {
        assert!(is_valid_nick("venue_master"));
        assert!(is_valid_nick("agent.007"));
        assert!(is_valid_nick("dj-setup_pro"));
        assert!(is_valid_nick("_hall"));

        assert!(!is_valid_nick("ab"));
        assert!(!is_valid_nick("has space"));
        assert!(!is_valid_nick("trailing."));
        assert!(!is_valid_nick(&"a".repeat(31)));
    }

    #[test]
    fn test_is_valid_phone() {
        assert!(is_valid_phone("+44 20 7946 0958"));
        assert!(is_valid_phone("07946095800"));
        assert!(!is_valid_phone("call me"));
        assert!(!is_valid_phone("12"));
    }

    #[test]
    fn test_is_valid_title() {
        assert!(is_valid_title("Riverside Garden"));
        assert!(!is_valid_title("   "));
        assert!(!is_valid_title(&"x".repeat(201)));
    }
}
