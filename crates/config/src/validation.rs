use crate::ConfigResult;

/// Trait for configuration validation
pub trait ConfigValidator {
    fn validate(&self) -> ConfigResult<()>;
}

/// General validation utilities
pub struct ValidationUtils;

impl ValidationUtils {
    /// Validate that a string is not empty
    pub fn validate_not_empty(value: &str, field_name: &str) -> ConfigResult<()> {
        if value.trim().is_empty() {
            return Err(crate::ConfigError::Validation(format!(
                "{field_name} cannot be empty"
            )));
        }
        Ok(())
    }

    /// Validate that a port number is valid
    pub fn validate_port(port: u16) -> ConfigResult<()> {
        if port == 0 {
            return Err(crate::ConfigError::Validation(
                "port cannot be 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate that a timeout is reasonable
    pub fn validate_timeout_seconds(timeout_seconds: u64) -> ConfigResult<()> {
        if timeout_seconds == 0 {
            return Err(crate::ConfigError::Validation(
                "timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if timeout_seconds > 3600 {
            return Err(crate::ConfigError::Validation(
                "timeout_seconds must be less than or equal to 3600".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate that a count lies in `1..=max`
    pub fn validate_count(count: usize, field_name: &str, max: usize) -> ConfigResult<()> {
        if count == 0 {
            return Err(crate::ConfigError::Validation(format!(
                "{field_name} must be greater than 0"
            )));
        }
        if count > max {
            return Err(crate::ConfigError::Validation(format!(
                "{field_name} must be less than or equal to {max}"
            )));
        }
        Ok(())
    }

    /// QRS要求xrfkey为16位字母或数字
    pub fn validate_xrf_key(key: &str, field_name: &str) -> ConfigResult<()> {
        if key.len() != 16 || !key.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(crate::ConfigError::Validation(format!(
                "{field_name} must be exactly 16 ASCII letters or digits"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_empty() {
        assert!(ValidationUtils::validate_not_empty("test", "field").is_ok());
        assert!(ValidationUtils::validate_not_empty("  test  ", "field").is_ok());
        assert!(ValidationUtils::validate_not_empty("", "field").is_err());
        assert!(ValidationUtils::validate_not_empty("   ", "field").is_err());
    }

    #[test]
    fn test_validate_port() {
        assert!(ValidationUtils::validate_port(4242).is_ok());
        assert!(ValidationUtils::validate_port(65535).is_ok());
        assert!(ValidationUtils::validate_port(0).is_err());
    }

    #[test]
    fn test_validate_timeout_seconds() {
        assert!(ValidationUtils::validate_timeout_seconds(30).is_ok());
        assert!(ValidationUtils::validate_timeout_seconds(3600).is_ok());
        assert!(ValidationUtils::validate_timeout_seconds(0).is_err());
        assert!(ValidationUtils::validate_timeout_seconds(3601).is_err());
    }

    #[test]
    fn test_validate_count() {
        assert!(ValidationUtils::validate_count(1, "test", 64).is_ok());
        assert!(ValidationUtils::validate_count(64, "test", 64).is_ok());
        assert!(ValidationUtils::validate_count(0, "test", 64).is_err());
        assert!(ValidationUtils::validate_count(65, "test", 64).is_err());
    }

    #[test]
    fn test_validate_xrf_key() {
        assert!(ValidationUtils::validate_xrf_key("ABCDEFG123456789", "xrf").is_ok());
        assert!(ValidationUtils::validate_xrf_key("abcdefghijklmnop", "xrf").is_ok());
        assert!(ValidationUtils::validate_xrf_key("ABCDEFG12345678", "xrf").is_err());
        assert!(ValidationUtils::validate_xrf_key("ABCDEFG12345678!", "xrf").is_err());
        assert!(ValidationUtils::validate_xrf_key("", "xrf").is_err());
    }
}
