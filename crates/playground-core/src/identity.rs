//! Storage identities and the keys they map to.

use crate::error::{CoreError, CoreResult};
use std::fmt;

/// Key of the anonymous autosave snapshot.
pub const ANONYMOUS_AUTOSAVE_KEY: &str = "codeplayground_autosave";
/// Key of the enabled-extension list.
pub const EXTENSIONS_KEY: &str = "codeplayground_extensions";
/// Key of the editor settings.
pub const SETTINGS_KEY: &str = "codePlaygroundSettings";
/// Key remembering the last logged-in user.
pub const LAST_USER_KEY: &str = "codeplayground_last_user";

/// Whose snapshot is read or written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageIdentity {
    /// A shared link. The key is the shared id itself.
    Shared(String),
    /// A logged-in user.
    User(String),
    /// Nobody is logged in.
    Anonymous,
}

impl StorageIdentity {
    /// Resolve the identity of a session: shared beats user beats anonymous.
    pub fn resolve(shared_id: Option<&str>, user: Option<&str>) -> Self {
        match (shared_id, user) {
            (Some(id), _) => Self::Shared(id.to_string()),
            (None, Some(user)) => Self::User(user.to_string()),
            (None, None) => Self::Anonymous,
        }
    }

    /// Storage key of this identity's snapshot.
    pub fn autosave_key(&self) -> String {
        match self {
            Self::Shared(id) => id.clone(),
            Self::User(user) => user_autosave_key(user),
            Self::Anonymous => ANONYMOUS_AUTOSAVE_KEY.to_string(),
        }
    }

    /// The user whose history a version save goes to.
    ///
    /// Only a logged-in, non-shared identity has one.
    pub fn history_user(&self) -> Option<&str> {
        match self {
            Self::User(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, Self::Shared(_))
    }
}

impl fmt::Display for StorageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shared(id) => write!(f, "shared:{id}"),
            Self::User(user) => write!(f, "user:{user}"),
            Self::Anonymous => f.write_str("anonymous"),
        }
    }
}

/// Autosave key of a user.
pub fn user_autosave_key(user: &str) -> String {
    format!("codeplayground_user_{user}_autosave")
}

/// History key of a user.
pub fn user_history_key(user: &str) -> String {
    format!("codeplayground_user_{user}_history")
}

/// Longest accepted username, in bytes. Keeps user keys well under
/// common file name limits.
pub const MAX_USERNAME_LEN: usize = 64;

/// Trim and check a username for use in storage keys.
pub fn validate_username(user: &str) -> CoreResult<&str> {
    let trimmed = user.trim();
    let usable = !trimmed.is_empty()
        && trimmed.len() <= MAX_USERNAME_LEN
        && trimmed
            .chars()
            .all(|c| !c.is_control() && c != '/' && c != '\\');
    if usable {
        Ok(trimmed)
    } else {
        Err(CoreError::InvalidUsername(user.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence() {
        assert_eq!(
            StorageIdentity::resolve(Some("abc"), Some("alice")),
            StorageIdentity::Shared("abc".to_string())
        );
        assert_eq!(
            StorageIdentity::resolve(None, Some("alice")),
            StorageIdentity::User("alice".to_string())
        );
        assert_eq!(StorageIdentity::resolve(None, None), StorageIdentity::Anonymous);
    }

    #[test]
    fn test_keys() {
        assert_eq!(
            StorageIdentity::Anonymous.autosave_key(),
            "codeplayground_autosave"
        );
        assert_eq!(
            StorageIdentity::User("bob".into()).autosave_key(),
            "codeplayground_user_bob_autosave"
        );
        assert_eq!(StorageIdentity::Shared("6f1c".into()).autosave_key(), "6f1c");
        assert_eq!(user_history_key("bob"), "codeplayground_user_bob_history");
    }

    #[test]
    fn test_history_user_only_for_users() {
        assert_eq!(StorageIdentity::User("bob".into()).history_user(), Some("bob"));
        assert_eq!(StorageIdentity::Shared("x".into()).history_user(), None);
        assert_eq!(StorageIdentity::Anonymous.history_user(), None);
    }

    #[test]
    fn test_validate_username() {
        assert_eq!(validate_username("  alice ").unwrap(), "alice");
        assert_eq!(validate_username("j.doe").unwrap(), "j.doe");
        assert!(validate_username("   ").is_err());
        assert!(validate_username("a/b").is_err());
        assert!(validate_username(&"x".repeat(MAX_USERNAME_LEN)).is_ok());
        assert!(validate_username(&"x".repeat(MAX_USERNAME_LEN + 1)).is_err());
    }
}
