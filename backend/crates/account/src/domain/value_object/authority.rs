use serde::{Deserialize, Serialize};
use std::fmt;

/// Granted authority. Codes match the values stored in `accounts.authorities`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Authority {
    #[default]
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl Authority {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Authority::User => "ROLE_USER",
            Authority::Admin => "ROLE_ADMIN",
        }
    }

    /// Unknown codes yield `None`; callers decide whether that is an error.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ROLE_USER" => Some(Authority::User),
            "ROLE_ADMIN" => Some(Authority::Admin),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Authority::Admin)
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for authority in [Authority::User, Authority::Admin] {
            assert_eq!(Authority::from_code(authority.code()), Some(authority));
        }
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(Authority::from_code("ROLE_ROOT"), None);
        assert_eq!(Authority::from_code("role_user"), None);
    }

    #[test]
    fn test_default_is_user() {
        assert_eq!(Authority::default(), Authority::User);
        assert!(!Authority::User.is_admin());
        assert!(Authority::Admin.is_admin());
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(
            serde_json::to_string(&Authority::Admin).unwrap(),
            "\"ROLE_ADMIN\""
        );
    }
}
