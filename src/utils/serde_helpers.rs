//! Serde helpers for partially populated backend payloads

use serde::{Deserialize, Deserializer};

/// Treat an explicit JSON `null` the same as a missing field.
///
/// Pair with `#[serde(default)]` so both cases land on `T::default()`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Any JSON number, or a string holding one
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
}

impl LooseNumber {
    /// Floats truncate toward zero; unparsable text yields `None`
    fn to_i128(&self) -> Option<i128> {
        match self {
            LooseNumber::Unsigned(n) => Some(i128::from(*n)),
            LooseNumber::Signed(n) => Some(i128::from(*n)),
            LooseNumber::Float(f) => float_to_i128(*f),
            LooseNumber::Text(s) => s.trim().parse::<f64>().ok().and_then(float_to_i128),
        }
    }
}

fn float_to_i128(f: f64) -> Option<i128> {
    f.is_finite().then(|| f.trunc() as i128)
}

/// Integer field the backend may send as a float, e.g. `1700000000.25`.
///
/// `null`, unparsable text and out-of-range values land on `T::default()`.
pub fn lenient_int<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + TryFrom<i128>,
{
    Ok(lenient_opt_int(deserializer)?.unwrap_or_default())
}

/// Optional variant of [`lenient_int`]
pub fn lenient_opt_int<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i128>,
{
    Ok(Option::<LooseNumber>::deserialize(deserializer)?
        .and_then(|n| n.to_i128())
        .and_then(|n| T::try_from(n).ok()))
}
