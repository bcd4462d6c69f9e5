use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::priority::Priority;

/// Validation errors for intake form fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("customer email cannot be empty")]
    EmptyEmail,
    #[error("invalid customer email: {0}")]
    InvalidEmail(String),
    #[error("description cannot be empty")]
    EmptyDescription,
    #[error("priority must be selected")]
    MissingPriority,
    #[error("unknown priority: {0}")]
    UnknownPriority(String),
}

/// Structural `local@domain.tld` check: one `@`, a `.` after it, no whitespace.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid hardcoded regex"));

/// Validates a customer email address.
///
/// The value must be non-empty after trimming and must match the structural
/// pattern as typed; surrounding whitespace therefore fails the pattern.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

/// Validates a request description: must contain something besides whitespace.
pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().is_empty() {
        Err(ValidationError::EmptyDescription)
    } else {
        Ok(())
    }
}

pub fn validate_priority(priority: Option<Priority>) -> Result<(), ValidationError> {
    priority.map(|_| ()).ok_or(ValidationError::MissingPriority)
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;

    // --- validate_email ---

    #[test]
    fn email_simple() {
        assert_eq!(validate_email("a@b.com"), Ok(()));
    }

    #[test]
    fn email_with_subdomain() {
        assert_eq!(validate_email("ops.team@mail.example.co.uk"), Ok(()));
    }

    #[test]
    fn email_empty() {
        assert_eq!(validate_email(""), Err(ValidationError::EmptyEmail));
    }

    #[test]
    fn email_whitespace_only() {
        assert_eq!(validate_email("   "), Err(ValidationError::EmptyEmail));
    }

    #[test]
    fn email_missing_at() {
        assert_eq!(
            validate_email("ab.com"),
            Err(ValidationError::InvalidEmail("ab.com".to_string()))
        );
    }

    #[test]
    fn email_missing_dot_after_at() {
        assert_eq!(
            validate_email("first.last@localhost"),
            Err(ValidationError::InvalidEmail("first.last@localhost".to_string()))
        );
    }

    #[test]
    fn email_two_ats() {
        assert!(validate_email("a@b@c.com").is_err());
    }

    #[test]
    fn email_inner_whitespace() {
        assert!(validate_email("a b@c.com").is_err());
    }

    #[test]
    fn email_surrounding_whitespace_fails_pattern() {
        assert!(validate_email(" a@b.com ").is_err());
    }

    #[test]
    fn email_trailing_dot_has_no_tld() {
        assert!(validate_email("a@b.").is_err());
    }

    #[quickcheck]
    fn email_without_at_is_rejected(s: String) -> bool {
        let s: String = s.chars().filter(|&c| c != '@').collect();
        validate_email(&s).is_err()
    }

    #[quickcheck]
    fn email_without_dot_after_at_is_rejected(local: String, domain: String) -> bool {
        let local: String = local.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        let domain: String = domain.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        validate_email(&format!("{local}@{domain}")).is_err()
    }

    #[quickcheck]
    fn email_alnum_parts_are_accepted(local: String, domain: String, tld: String) -> bool {
        let keep = |s: String| -> String { s.chars().filter(|c| c.is_ascii_alphanumeric()).collect() };
        let (local, domain, tld) = (keep(local), keep(domain), keep(tld));
        if local.is_empty() || domain.is_empty() || tld.is_empty() {
            return true; // skip
        }
        validate_email(&format!("{local}@{domain}.{tld}")).is_ok()
    }

    // --- validate_description ---

    #[test]
    fn description_present() {
        assert_eq!(validate_description("desc"), Ok(()));
    }

    #[test]
    fn description_empty() {
        assert_eq!(
            validate_description(""),
            Err(ValidationError::EmptyDescription)
        );
    }

    #[quickcheck]
    fn description_whitespace_only_is_rejected(n: u8) -> bool {
        let s: String = " \t\n".chars().cycle().take(n as usize).collect();
        validate_description(&s) == Err(ValidationError::EmptyDescription)
    }

    // --- validate_priority ---

    #[test]
    fn priority_set() {
        for priority in Priority::all() {
            assert_eq!(validate_priority(Some(*priority)), Ok(()));
        }
    }

    #[test]
    fn priority_unset() {
        assert_eq!(validate_priority(None), Err(ValidationError::MissingPriority));
    }
}
