//! JSON encoding helpers for the persisted record layout

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::Duration;

/// Durations are stored as signed 64-bit integer nanoseconds, so anything
/// above `MAX_DURATION` cannot be encoded.
pub mod duration_nanos {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = i64::try_from(value.as_nanos()).map_err(|_| {
            serde::ser::Error::custom(format!("duration too large: {:?}", value))
        })?;
        nanos.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let nanos = i64::deserialize(deserializer)?;
        if nanos < 0 {
            return Err(serde::de::Error::custom(format!(
                "negative duration: {}ns",
                nanos
            )));
        }
        Ok(Duration::from_nanos(nanos as u64))
    }
}

/// Older records encode empty sequences as `null`.
pub fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
