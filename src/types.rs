use serde::Deserialize;
use std::fmt::{self, Display};
use std::ops::Deref;

/// One-time code tying a physical unit to a pre-registered device record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActivationCode(String);

impl Deref for ActivationCode {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for ActivationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ActivationCode {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ActivationCode {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Per-device secret used to authenticate against the message broker.
///
/// `Display` and `Debug` render a short prefix only, so the full key
/// never lands in logs. Code that needs the actual secret goes through
/// `Deref`.
#[derive(Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct DeviceKey(String);

impl Deref for DeviceKey {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chars = self.0.chars();
        let prefix: String = chars.by_ref().take(4).collect();
        // Only show the prefix when there is more key behind it
        if chars.next().is_some() {
            write!(f, "{prefix}****")
        } else {
            f.write_str("****")
        }
    }
}

impl fmt::Debug for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceKey({self})")
    }
}

impl From<String> for DeviceKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for DeviceKey {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Everything a device needs to open a broker session.
///
/// Instances only exist after lookup validation, so `device_id` and
/// `device_key` are always non-empty here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub device_id: String,
    pub device_name: String,
    pub product_id: String,
    pub device_key: DeviceKey,
    pub mqtt_server: String,
    pub mqtt_port: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_key_display_keeps_prefix_only() {
        let key = DeviceKey::from("supersecretkey123");
        assert_eq!(key.to_string(), "supe****");
    }

    #[test]
    fn test_device_key_display_hides_short_keys() {
        assert_eq!(DeviceKey::from("abc").to_string(), "****");
        assert_eq!(DeviceKey::from("abcd").to_string(), "****");
    }

    #[test]
    fn test_device_key_debug_never_shows_secret() {
        let key = DeviceKey::from("supersecretkey123");
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("secretkey"));
        assert_eq!(rendered, "DeviceKey(supe****)");
    }

    #[test]
    fn test_device_key_deref_exposes_secret() {
        let key = DeviceKey::from("supersecretkey123");
        assert_eq!(&*key, "supersecretkey123");
        assert!(!key.is_empty());
    }

    #[test]
    fn test_activation_code_roundtrip() {
        let code = ActivationCode::from("ABC123");
        assert_eq!(code.to_string(), "ABC123");
        assert_eq!(&*code, "ABC123");
    }
}
