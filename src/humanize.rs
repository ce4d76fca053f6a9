//! Human-readable duration formatting and parsing utilities

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid duration format: {0}")]
    InvalidFormat(String),

    #[error("Invalid number: {0}")]
    InvalidNumber(#[from] std::num::ParseIntError),

    #[error("Invalid unit: {0}")]
    InvalidUnit(String),
}

/// Whole-second duration with human-readable parsing ("90s", "2m", "1h")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct HumanDuration(pub u64);

impl HumanDuration {
    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.0)
    }

    pub fn to_human_readable(&self) -> String {
        const UNITS: &[(&str, u64)] = &[("h", 3600), ("m", 60), ("s", 1)];

        if self.0 == 0 {
            return "0s".to_string();
        }

        let mut rest = self.0;
        let mut out = String::new();
        for &(unit, divisor) in UNITS {
            let value = rest / divisor;
            if value > 0 {
                out.push_str(&format!("{}{}", value, unit));
                rest %= divisor;
            }
        }
        out
    }
}

impl From<Duration> for HumanDuration {
    fn from(value: Duration) -> Self {
        Self(value.as_secs())
    }
}

impl Serialize for HumanDuration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_human_readable())
    }
}

impl<'de> Deserialize<'de> for HumanDuration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct HumanDurationVisitor;

        impl<'de> serde::de::Visitor<'de> for HumanDurationVisitor {
            type Value = HumanDuration;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a duration as string (e.g., \"30s\", \"2m\") or integer seconds")
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(HumanDuration(v))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                u64::try_from(v)
                    .map(HumanDuration)
                    .map_err(|_| E::custom(format!("duration must not be negative: {}", v)))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse::<HumanDuration>().map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_any(HumanDurationVisitor)
    }
}

impl FromStr for HumanDuration {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();

        // Bare numbers are seconds
        if let Ok(num) = s.parse::<u64>() {
            return Ok(HumanDuration(num));
        }

        let (num_str, unit) = if let Some(pos) = s.find(|c: char| !c.is_ascii_digit()) {
            (&s[..pos], &s[pos..])
        } else {
            return Err(ParseError::InvalidFormat(s.to_string()));
        };

        if num_str.is_empty() {
            return Err(ParseError::InvalidFormat(s.to_string()));
        }

        let num: u64 = num_str.parse()?;

        let multiplier = match unit.trim() {
            "s" | "sec" | "secs" => 1,
            "m" | "min" | "mins" => 60,
            "h" | "hr" | "hrs" => 3600,
            _ => return Err(ParseError::InvalidUnit(unit.to_string())),
        };

        num.checked_mul(multiplier)
            .map(HumanDuration)
            .ok_or_else(|| ParseError::InvalidFormat(s.to_string()))
    }
}

impl fmt::Display for HumanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_human_readable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds() {
        assert_eq!("90".parse::<HumanDuration>().unwrap().as_secs(), 90);
        assert_eq!("90s".parse::<HumanDuration>().unwrap().as_secs(), 90);
        assert_eq!("5 secs".parse::<HumanDuration>().unwrap().as_secs(), 5);
    }

    #[test]
    fn test_parse_minutes_and_hours() {
        assert_eq!("2m".parse::<HumanDuration>().unwrap().as_secs(), 120);
        assert_eq!("10MIN".parse::<HumanDuration>().unwrap().as_secs(), 600);
        assert_eq!("1h".parse::<HumanDuration>().unwrap().as_secs(), 3600);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            "5d".parse::<HumanDuration>(),
            Err(ParseError::InvalidUnit(_))
        ));
        assert!(matches!(
            "m".parse::<HumanDuration>(),
            Err(ParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_rejects_overflowing_value() {
        assert!(matches!(
            "307445734561825861m".parse::<HumanDuration>(),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            "5124095576030432h".parse::<HumanDuration>(),
            Err(ParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_to_human_readable() {
        assert_eq!(HumanDuration(0).to_human_readable(), "0s");
        assert_eq!(HumanDuration(45).to_human_readable(), "45s");
        assert_eq!(HumanDuration(90).to_human_readable(), "1m30s");
        assert_eq!(HumanDuration(3720).to_human_readable(), "1h2m");
    }

    #[test]
    fn test_deserialize_string_and_number() {
        #[derive(Deserialize)]
        struct TestStruct {
            timeout: HumanDuration,
        }

        let parsed: TestStruct = serde_json::from_str(r#"{"timeout": "2m"}"#).unwrap();
        assert_eq!(parsed.timeout.as_secs(), 120);

        let parsed: TestStruct = serde_json::from_str(r#"{"timeout": 15}"#).unwrap();
        assert_eq!(parsed.timeout.as_secs(), 15);
    }

    #[test]
    fn test_serialize_as_human_string() {
        let json = serde_json::to_string(&HumanDuration(150)).unwrap();
        assert_eq!(json, r#""2m30s""#);
    }
}
