//! Field checks shared by the fleet services

use crate::error::{FleetError, FleetResult};

pub(crate) const MAX_PCD_NAME_CHARS: usize = 100;

/// Trimmed, non-empty text
pub(crate) fn required(field: &str, value: &str) -> FleetResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FleetError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

pub(crate) fn pcd_name(value: &str) -> FleetResult<String> {
    let name = required("name", value)?;
    if name.chars().count() > MAX_PCD_NAME_CHARS {
        return Err(FleetError::Validation(format!(
            "name must be at most {MAX_PCD_NAME_CHARS} characters"
        )));
    }
    Ok(name)
}

pub(crate) fn port(value: i32) -> FleetResult<i32> {
    if !(1..=65535).contains(&value) {
        return Err(FleetError::Validation(
            "port must be between 1 and 65535".to_string(),
        ));
    }
    Ok(value)
}

pub(crate) fn size(value: i64) -> FleetResult<i64> {
    if value < 0 {
        return Err(FleetError::Validation("size must not be negative".to_string()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("area", "  lab ").unwrap(), "lab");
        assert!(matches!(required("area", "   "), Err(FleetError::Validation(m)) if m == "area is required"));
    }

    #[test]
    fn test_pcd_name_length_counts_chars() {
        assert!(pcd_name(&"a".repeat(100)).is_ok());
        assert!(pcd_name(&"a".repeat(101)).is_err());
        assert!(pcd_name(&"点".repeat(100)).is_ok());
        assert!(pcd_name("").is_err());
    }

    #[test]
    fn test_port_and_size_bounds() {
        assert!(port(0).is_err());
        assert!(port(1).is_ok());
        assert!(port(65535).is_ok());
        assert!(port(65536).is_err());
        assert!(size(0).is_ok());
        assert!(size(-1).is_err());
    }
}
