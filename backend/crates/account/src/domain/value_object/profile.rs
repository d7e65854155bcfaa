//! Profile Value Object
//!
//! Display fields an account owner may edit freely.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

pub const NAME_MAX_LENGTH: usize = 50;
pub const IMAGE_URL_MAX_LENGTH: usize = 256;
pub const LANG_KEY_MIN_LENGTH: usize = 2;
pub const LANG_KEY_MAX_LENGTH: usize = 10;
pub const DEFAULT_LANG_KEY: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    pub lang_key: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            first_name: None,
            last_name: None,
            image_url: None,
            lang_key: DEFAULT_LANG_KEY.to_string(),
        }
    }
}

impl Profile {
    /// Trim, drop blank optionals, fall back to `default_lang_key`, then validate
    pub fn new(
        first_name: Option<String>,
        last_name: Option<String>,
        image_url: Option<String>,
        lang_key: Option<String>,
        default_lang_key: &str,
    ) -> AppResult<Self> {
        let profile = Self {
            first_name: non_blank(first_name),
            last_name: non_blank(last_name),
            image_url: non_blank(image_url),
            lang_key: non_blank(lang_key).unwrap_or_else(|| default_lang_key.to_string()),
        };
        profile.validate()?;
        Ok(profile)
    }

    fn validate(&self) -> AppResult<()> {
        check_max("First name", self.first_name.as_deref(), NAME_MAX_LENGTH)?;
        check_max("Last name", self.last_name.as_deref(), NAME_MAX_LENGTH)?;
        check_max("Image URL", self.image_url.as_deref(), IMAGE_URL_MAX_LENGTH)?;

        let lang_len = self.lang_key.chars().count();
        if !(LANG_KEY_MIN_LENGTH..=LANG_KEY_MAX_LENGTH).contains(&lang_len) {
            return Err(AppError::bad_request(format!(
                "Language key must be between {} and {} characters",
                LANG_KEY_MIN_LENGTH, LANG_KEY_MAX_LENGTH
            )));
        }

        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_max(field: &str, value: Option<&str>, max: usize) -> AppResult<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(AppError::bad_request(format!(
            "{field} must be at most {max} characters"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_lang_key() {
        let profile = Profile::new(None, None, None, None, "fr").unwrap();
        assert_eq!(profile.lang_key, "fr");
        assert_eq!(Profile::default().lang_key, DEFAULT_LANG_KEY);
    }

    #[test]
    fn test_blank_fields_become_none() {
        let profile = Profile::new(
            Some("  ".to_string()),
            Some(" Doe ".to_string()),
            Some(String::new()),
            Some("en".to_string()),
            DEFAULT_LANG_KEY,
        )
        .unwrap();
        assert_eq!(profile.first_name, None);
        assert_eq!(profile.last_name.as_deref(), Some("Doe"));
        assert_eq!(profile.image_url, None);
    }

    #[test]
    fn test_name_too_long() {
        let result = Profile::new(
            Some("a".repeat(NAME_MAX_LENGTH + 1)),
            None,
            None,
            None,
            DEFAULT_LANG_KEY,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_lang_key_bounds() {
        assert!(Profile::new(None, None, None, Some("e".to_string()), "en").is_err());
        assert!(Profile::new(None, None, None, Some("a".repeat(11)), "en").is_err());
        assert!(Profile::new(None, None, None, Some("pt-br".to_string()), "en").is_ok());
    }
}
