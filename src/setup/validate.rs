use regex::Regex;
use std::sync::LazyLock;

use super::config::SetupConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

static DOMAIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_.-]+[a-zA-Z0-9]$").expect("valid domain regex")
});

static DIGITS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid digits regex"));

static WIREGUARD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,3}\.){3}[0-9]{1,3}/[0-9]{1,2}$").expect("valid wireguard regex")
});

fn is_valid_domain(domain: &str) -> bool {
    DOMAIN_REGEX.is_match(domain)
}

fn is_digits(value: &str) -> bool {
    DIGITS_REGEX.is_match(value)
}

/// `a.b.c.d/n` with 1-3 digit octets and a 1-2 digit prefix
pub fn is_valid_wireguard_address(value: &str) -> bool {
    WIREGUARD_REGEX.is_match(value)
}

/// Checks for the Basic Configuration step
pub fn validate_basic(config: &SetupConfig) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let domain = config.domain.as_str();
    if domain.chars().count() < 3 {
        errors.push(FieldError::new("domain", "Domain is required"));
    } else if domain == "example.com" {
        errors.push(FieldError::new("domain", "Please enter your actual domain"));
    } else if !is_valid_domain(domain) {
        errors.push(FieldError::new("domain", "Invalid domain format"));
    }

    if config.timezone.is_empty() {
        errors.push(FieldError::new("timezone", "Timezone is required"));
    }
    if !is_digits(&config.puid) {
        errors.push(FieldError::new("puid", "PUID must be a number"));
    }
    if !is_digits(&config.pgid) {
        errors.push(FieldError::new("pgid", "PGID must be a number"));
    }

    let password_len = config.password.chars().count();
    if password_len < 8 {
        errors.push(FieldError::new("password", "Password must be at least 8 characters"));
    } else if password_len > 128 {
        errors.push(FieldError::new("password", "Password is too long"));
    }

    errors
}

/// Checks for the Advanced Settings step. Every field is optional.
pub fn validate_advanced(wireguard_addresses: &str) -> Vec<FieldError> {
    if wireguard_addresses.is_empty() || is_valid_wireguard_address(wireguard_addresses) {
        Vec::new()
    } else {
        vec![FieldError::new(
            "wireguardAddresses",
            "Invalid IP address format (e.g., 10.0.0.1/32)",
        )]
    }
}

pub fn validate_selection(selected: &[String]) -> Vec<FieldError> {
    if selected.is_empty() {
        vec![FieldError::new("selectedServices", "Please select at least one service")]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::initial_config;

    fn valid_config() -> SetupConfig {
        let mut config = initial_config();
        config.domain = "media.home.net".into();
        config.password = "correct-horse".into();
        config
    }

    fn fields(errors: &[FieldError]) -> Vec<&'static str> {
        errors.iter().map(|e| e.field).collect()
    }

    #[test]
    fn valid_basic_config_passes() {
        assert!(validate_basic(&valid_config()).is_empty());
    }

    #[test]
    fn placeholder_domain_is_rejected() {
        let errors = validate_basic(&initial_config());
        assert!(errors
            .iter()
            .any(|e| e.message == "Please enter your actual domain"));
    }

    #[test]
    fn domain_shape_rules() {
        assert!(is_valid_domain("a.b"));
        assert!(is_valid_domain("my_host-1.lan"));
        assert!(!is_valid_domain("-bad.com"));
        assert!(!is_valid_domain("bad.com."));
        assert!(!is_valid_domain("ab"));
        assert!(!is_valid_domain("has space.com"));
        assert!(!is_valid_domain("media.lan\nevil"));
    }

    #[test]
    fn numeric_fields_reject_non_ascii_digits() {
        assert!(is_digits("1000"));
        assert!(!is_digits(""));
        assert!(!is_digits("１０００"));
        assert!(!is_digits("+1000"));
        assert!(!is_valid_wireguard_address("１0.0.0.2/32"));
    }

    #[test]
    fn ids_and_password_are_checked() {
        let mut config = valid_config();
        config.puid = "10a".into();
        config.pgid = String::new();
        config.password = "short".into();
        assert_eq!(fields(&validate_basic(&config)), vec!["puid", "pgid", "password"]);

        config.puid = "1000".into();
        config.pgid = "1000".into();
        config.password = "x".repeat(129);
        assert_eq!(fields(&validate_basic(&config)), vec!["password"]);
    }

    #[test]
    fn wireguard_addresses() {
        assert!(validate_advanced("").is_empty());
        assert!(validate_advanced("10.0.0.2/32").is_empty());
        assert!(!validate_advanced("10.0.0/32").is_empty());
        assert!(!validate_advanced("10.0.0.2").is_empty());
        assert!(!validate_advanced("10.0.0.2/128").is_empty());
        assert!(!validate_advanced("1000.0.0.2/8").is_empty());
    }

    #[test]
    fn selection_must_not_be_empty() {
        assert_eq!(fields(&validate_selection(&[])), vec!["selectedServices"]);
        assert!(validate_selection(&["plex".to_string()]).is_empty());
    }
}
