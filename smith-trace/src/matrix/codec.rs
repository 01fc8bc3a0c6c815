//! JSON representation of matrix entries.
//!
//! Entries that fit in an `i64` are written as plain JSON numbers, larger ones as decimal
//! strings, so `[[2, 4], [6, 8]]` is a valid matrix document.

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Matrix;
use crate::errors::SmithError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawEntry {
    Small(i64),
    Big(String),
}

impl From<&BigInt> for RawEntry {
    fn from(value: &BigInt) -> Self {
        match value.to_i64() {
            Some(v) => RawEntry::Small(v),
            None => RawEntry::Big(value.to_string()),
        }
    }
}

impl TryFrom<RawEntry> for BigInt {
    type Error = SmithError;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        match raw {
            RawEntry::Small(v) => Ok(BigInt::from(v)),
            RawEntry::Big(text) => text.trim().parse::<BigInt>().map_err(|e| {
                SmithError::InvalidMatrix(format!("Entry {:?} is not an integer: {}", text, e))
            }),
        }
    }
}

impl TryFrom<Vec<Vec<RawEntry>>> for Matrix {
    type Error = SmithError;

    fn try_from(rows: Vec<Vec<RawEntry>>) -> Result<Self, Self::Error> {
        let data = rows
            .into_iter()
            .map(|row| row.into_iter().map(BigInt::try_from).collect())
            .collect::<Result<Vec<Vec<BigInt>>, SmithError>>()?;
        Matrix::try_with(data)
    }
}

impl From<Matrix> for Vec<Vec<RawEntry>> {
    fn from(matrix: Matrix) -> Self {
        matrix
            .data
            .iter()
            .map(|row| row.iter().map(RawEntry::from).collect())
            .collect()
    }
}

/// `#[serde(with = "...")]` adapter for single `BigInt` fields.
pub mod big_int {
    use super::*;

    pub fn serialize<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
        RawEntry::from(value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
        let raw = RawEntry::deserialize(deserializer)?;
        BigInt::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// `#[serde(with = "...")]` adapter for `Vec<BigInt>` fields.
pub mod big_ints {
    use super::*;

    pub fn serialize<S: Serializer>(values: &[BigInt], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(RawEntry::from))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<BigInt>, D::Error> {
        Vec::<RawEntry>::deserialize(deserializer)?
            .into_iter()
            .map(|raw| BigInt::try_from(raw).map_err(serde::de::Error::custom))
            .collect()
    }
}
