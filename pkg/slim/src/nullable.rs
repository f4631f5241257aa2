use serde::{Deserialize, Deserializer};

/// Decode `null` as the type's default.
///
/// Go encodes nil slices and maps as `null`; both sides treat that the same
/// as an empty collection. Go also ignores `null` for plain strings.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
