//! Validation rules for user accounts.

use super::error::DomainError;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;
pub const EMAIL_MAX_LEN: usize = 255;

/// A username/email pair that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

impl NewUser {
    pub fn parse(username: &str, email: &str) -> Result<Self, DomainError> {
        Ok(Self {
            username: normalize_username(username)?,
            email: normalize_email(email)?,
        })
    }
}

pub fn normalize_username(input: &str) -> Result<String, DomainError> {
    let username = input.trim();
    let len = username.chars().count();

    if len < USERNAME_MIN_LEN || len > USERNAME_MAX_LEN {
        return Err(DomainError::validation(
            "username",
            format!("must be between {USERNAME_MIN_LEN} and {USERNAME_MAX_LEN} characters"),
        ));
    }

    if let Some(bad) = username
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')))
    {
        return Err(DomainError::validation(
            "username",
            format!("character `{bad}` is not allowed"),
        ));
    }

    Ok(username.to_string())
}

pub fn normalize_email(input: &str) -> Result<String, DomainError> {
    let email = input.trim();

    if email.is_empty() {
        return Err(DomainError::validation("email", "must not be empty"));
    }
    if email.len() > EMAIL_MAX_LEN {
        return Err(DomainError::validation(
            "email",
            format!("must be at most {EMAIL_MAX_LEN} bytes"),
        ));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(DomainError::validation("email", "must not contain spaces"));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(DomainError::validation("email", "missing `@`"));
    };
    if local.is_empty() || domain.contains('@') {
        return Err(DomainError::validation("email", "malformed address"));
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(DomainError::validation("email", "malformed domain"));
    }

    Ok(email.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_accepts_valid_input() {
        let user = NewUser::parse("  ada.l_ove-1 ", " ada@example.org ").expect("valid user");
        assert_eq!(user.username, "ada.l_ove-1");
        assert_eq!(user.email, "ada@example.org");
    }

    #[test]
    fn rejects_short_and_long_usernames() {
        assert!(normalize_username("ab").is_err());
        assert!(normalize_username(&"a".repeat(USERNAME_MAX_LEN + 1)).is_err());
        assert!(normalize_username(&"a".repeat(USERNAME_MAX_LEN)).is_ok());
    }

    #[test]
    fn rejects_usernames_with_spaces_or_symbols() {
        let err = normalize_username("ada lovelace").unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "username", .. }));
        assert!(normalize_username("ada!").is_err());
    }

    #[test]
    fn rejects_malformed_emails() {
        for bad in ["", "ada", "@example.org", "ada@", "ada@example", "a@b@c.org", "ada@.org", "a da@x.org"] {
            assert!(normalize_email(bad).is_err(), "{bad} should be rejected");
        }
    }
}
