//! Serde helpers for the backend's local date-time format.
//!
//! The backend writes `yyyy-MM-dd'T'HH:mm:ss` and may drop the seconds; both
//! shapes are accepted, and seconds are always written back.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serializer};

pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .ok()
}

pub mod datetime {
    use super::*;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(DATETIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_datetime(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date-time: {raw}")))
    }
}

pub mod option_datetime {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => serializer.collect_str(&ts.format(DATETIME_FORMAT)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse_datetime(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date-time: {raw}"))),
            None => Ok(None),
        }
    }
}
