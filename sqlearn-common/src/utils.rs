use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Instructor,
    Student,
}

/// Keeps "field absent" and "field set to null" apart in sparse patches.
///
/// Use together with `#[serde(default)]` on an `Option<Option<T>>` field:
/// absent → `None`, `null` → `Some(None)`, value → `Some(Some(v))`.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Trims the input and returns `None` when nothing is left.
pub fn non_blank(s: &str) -> Option<&str> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
