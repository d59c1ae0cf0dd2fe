//! Device classification and state
//!
//! Stored as their text codes in the `device` table.

use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    #[display("robot_wheel")]
    RobotWheel,
    #[display("robot_biped")]
    RobotBiped,
}

impl DeviceType {
    pub const fn code(&self) -> &'static str {
        match self {
            DeviceType::RobotWheel => "robot_wheel",
            DeviceType::RobotBiped => "robot_biped",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "robot_wheel" => Some(DeviceType::RobotWheel),
            "robot_biped" => Some(DeviceType::RobotBiped),
            _ => None,
        }
    }
}

/// Device manufacturer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Company {
    #[display("cyborg")]
    Cyborg,
}

impl Company {
    pub const fn code(&self) -> &'static str {
        match self {
            Company::Cyborg => "cyborg",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "cyborg" => Some(Company::Cyborg),
            _ => None,
        }
    }
}

/// Connection state; new devices start `offline`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    #[default]
    #[display("offline")]
    Offline,
    #[display("online")]
    Online,
    #[display("busy")]
    Busy,
    #[display("error")]
    Error,
}

impl DeviceStatus {
    pub const fn code(&self) -> &'static str {
        match self {
            DeviceStatus::Offline => "offline",
            DeviceStatus::Online => "online",
            DeviceStatus::Busy => "busy",
            DeviceStatus::Error => "error",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "offline" => Some(DeviceStatus::Offline),
            "online" => Some(DeviceStatus::Online),
            "busy" => Some(DeviceStatus::Busy),
            "error" => Some(DeviceStatus::Error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_serde_and_display() {
        for t in [DeviceType::RobotWheel, DeviceType::RobotBiped] {
            assert_eq!(serde_json::to_value(t).unwrap(), t.code());
            assert_eq!(t.to_string(), t.code());
            assert_eq!(DeviceType::from_code(t.code()), Some(t));
        }
        for s in [
            DeviceStatus::Offline,
            DeviceStatus::Online,
            DeviceStatus::Busy,
            DeviceStatus::Error,
        ] {
            assert_eq!(serde_json::to_value(s).unwrap(), s.code());
            assert_eq!(DeviceStatus::from_code(s.code()), Some(s));
        }
        assert_eq!(Company::from_code("cyborg"), Some(Company::Cyborg));
    }

    #[test]
    fn test_unknown_codes() {
        assert_eq!(DeviceType::from_code("drone"), None);
        assert_eq!(Company::from_code(""), None);
        assert_eq!(DeviceStatus::from_code("OFFLINE"), None);
        assert!(serde_json::from_str::<DeviceType>("\"drone\"").is_err());
    }

    #[test]
    fn test_default_status_is_offline() {
        assert_eq!(DeviceStatus::default(), DeviceStatus::Offline);
    }
}
