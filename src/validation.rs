//! Input validation for sentinel CLI and configuration values.
//!
//! Switch names end up in notification text and in event names sent to the
//! external log sink, so they are restricted to a conservative character set.

use anyhow::{bail, Result};

/// Maximum allowed length for switch names.
pub const MAX_NAME_LENGTH: usize = 64;

/// Validates that a switch name is safe to embed in event names.
///
/// A name is valid if:
/// - It is not empty
/// - It is no longer than MAX_NAME_LENGTH characters
/// - It contains only alphanumeric characters, dashes, and underscores
///
/// # Examples
///
/// ```
/// use sentinel::validation::validate_switch_name;
///
/// assert!(validate_switch_name("front_door").is_ok());
/// assert!(validate_switch_name("garage-2").is_ok());
/// assert!(validate_switch_name("").is_err());
/// assert!(validate_switch_name("front door").is_err());
/// ```
pub fn validate_switch_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("Switch name cannot be empty");
    }

    if name.len() > MAX_NAME_LENGTH {
        bail!(
            "Switch name too long: {} characters (max {})",
            name.len(),
            MAX_NAME_LENGTH
        );
    }

    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid_chars {
        bail!("Switch name '{name}' contains invalid characters. Use only alphanumeric characters, dashes (-), and underscores (_)");
    }

    Ok(())
}

/// Validates that a reminder threshold is a positive, finite number of seconds.
pub fn validate_threshold_secs(secs: f64) -> Result<()> {
    if !secs.is_finite() || secs <= 0.0 {
        bail!("Threshold must be a positive number of seconds, got {secs}");
    }
    Ok(())
}

/// Clap value parser for switch name arguments.
///
/// ```ignore
/// #[arg(long, value_parser = clap_name_validator)]
/// name: Option<String>,
/// ```
pub fn clap_name_validator(s: &str) -> Result<String, String> {
    validate_switch_name(s).map_err(|e| e.to_string())?;
    Ok(s.to_string())
}

/// Clap value parser for threshold arguments.
pub fn clap_threshold_validator(s: &str) -> Result<f64, String> {
    let secs: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a number of seconds"))?;
    validate_threshold_secs(secs).map_err(|e| e.to_string())?;
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_switch_name_valid() {
        assert!(validate_switch_name("front_door").is_ok());
        assert!(validate_switch_name("garage-2").is_ok());
        assert!(validate_switch_name("Shed").is_ok());
        assert!(validate_switch_name("a").is_ok());
    }

    #[test]
    fn test_validate_switch_name_empty() {
        let result = validate_switch_name("");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_validate_switch_name_too_long() {
        let long = "d".repeat(MAX_NAME_LENGTH + 1);
        let result = validate_switch_name(&long);
        assert!(result.unwrap_err().to_string().contains("too long"));

        let exact = "d".repeat(MAX_NAME_LENGTH);
        assert!(validate_switch_name(&exact).is_ok());
    }

    #[test]
    fn test_validate_switch_name_invalid_chars() {
        assert!(validate_switch_name("front door").is_err());
        assert!(validate_switch_name("door/1").is_err());
        assert!(validate_switch_name("door.1").is_err());
        assert!(validate_switch_name("tür").is_err());
    }

    #[test]
    fn test_validate_threshold() {
        assert!(validate_threshold_secs(30.0).is_ok());
        assert!(validate_threshold_secs(0.5).is_ok());
        assert!(validate_threshold_secs(0.0).is_err());
        assert!(validate_threshold_secs(-1.0).is_err());
        assert!(validate_threshold_secs(f64::NAN).is_err());
        assert!(validate_threshold_secs(f64::INFINITY).is_err());
    }

    #[test]
    fn test_clap_validators() {
        assert_eq!(clap_name_validator("front_door"), Ok("front_door".to_string()));
        assert!(clap_name_validator("bad name").is_err());
        assert_eq!(clap_threshold_validator("45"), Ok(45.0));
        assert!(clap_threshold_validator("abc").is_err());
        assert!(clap_threshold_validator("-3").is_err());
    }
}
