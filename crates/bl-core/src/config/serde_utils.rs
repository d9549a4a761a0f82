//! Serde helpers for configuration durations
//!
//! Durations are written as plain integers so TOML files stay readable.

/// Duration as whole seconds
pub mod duration_secs {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    /// Serialize a Duration as seconds (u64)
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    /// Deserialize a Duration from seconds (u64)
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// Duration as whole milliseconds
pub mod duration_millis {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    /// Serialize a Duration as milliseconds (u64)
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    /// Deserialize a Duration from milliseconds (u64)
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Timings {
        #[serde(with = "duration_secs")]
        interval: Duration,
        #[serde(with = "duration_millis")]
        retry: Duration,
    }

    #[test]
    fn test_durations_as_integers() {
        let timings = Timings {
            interval: Duration::from_secs(30),
            retry: Duration::from_millis(1500),
        };
        let json = serde_json::to_string(&timings).unwrap();
        assert_eq!(json, r#"{"interval":30,"retry":1500}"#);
    }

    #[test]
    fn test_durations_from_toml() {
        let timings: Timings = toml::from_str("interval = 45\nretry = 250\n").unwrap();
        assert_eq!(timings.interval, Duration::from_secs(45));
        assert_eq!(timings.retry, Duration::from_millis(250));
    }
}
