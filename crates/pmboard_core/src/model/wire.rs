//! Serde helpers shared by record and patch types.

use serde::{Deserialize, Deserializer};

/// Reads a weak reference, treating `null` and blank strings as unset.
///
/// Older persisted data stores "no project" as `""`.
pub(crate) fn reference<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|id| !id.trim().is_empty()))
}

/// Patch form of [`reference`]: a present key always yields `Some`, so
/// `"projectId": ""` clears the reference while a missing key leaves it alone.
pub(crate) fn patch_reference<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    reference(deserializer).map(Some)
}

/// Distinguishes an explicit `null` from a missing key in patches.
pub(crate) fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Reads an optional timestamp, treating blank strings as unset.
pub(crate) fn optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<super::timestamp::Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => super::timestamp::Timestamp::parse(&raw)
            .map(Some)
            .map_err(|err| {
                serde::de::Error::custom(format!("invalid ISO-8601 timestamp `{raw}`: {err}"))
            }),
        _ => Ok(None),
    }
}

/// Keeps the first occurrence of every id, preserving order.
pub(crate) fn dedupe_ids(ids: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
