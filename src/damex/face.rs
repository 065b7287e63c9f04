//! Face keys for the angular measure.
//!
//! A face marks which coordinates of an extreme sample are "large". It is
//! a fixed-width bit set (one bit per feature) so map lookups hash a few
//! words instead of allocating a string per sample; `Display` still
//! renders the '0'/'1' digit form for diagnostics and serialization.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AislarError;

const WORD_BITS: usize = 64;

/// Bit-set key identifying one face of the unit cube.
///
/// Bits beyond `n_features` are always zero, so equality and hashing over
/// the raw words agree with equality of the digit strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Face {
    words: Vec<u64>,
    n_features: usize,
}

impl Face {
    /// Builds a face from per-coordinate indicators.
    #[must_use]
    pub fn from_indicator(bits: &[bool]) -> Self {
        Self::from_fn(bits.len(), |i| bits[i])
    }

    /// Builds a face of `n_features` bits, bit `i` set iff `f(i)`.
    #[must_use]
    pub fn from_fn(n_features: usize, f: impl Fn(usize) -> bool) -> Self {
        let n_words = n_features.div_ceil(WORD_BITS);
        let mut words = vec![0u64; n_words];
        for i in 0..n_features {
            if f(i) {
                words[i / WORD_BITS] |= 1 << (i % WORD_BITS);
            }
        }
        Self { words, n_features }
    }

    /// Whether coordinate `i` is marked large.
    #[must_use]
    pub fn is_set(&self, i: usize) -> bool {
        i < self.n_features && self.words[i / WORD_BITS] & (1 << (i % WORD_BITS)) != 0
    }

    /// Number of coordinates marked large (the dimension of the face).
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Total number of coordinates (the feature count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.n_features
    }

    /// True for the zero-feature face.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n_features == 0
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.n_features {
            f.write_str(if self.is_set(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Face {
    type Err = AislarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bits = Vec::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '0' => bits.push(false),
                '1' => bits.push(true),
                other => {
                    return Err(AislarError::InvalidInput {
                        message: format!("face key must be '0'/'1' digits, found '{other}'"),
                    })
                }
            }
        }
        Ok(Self::from_indicator(&bits))
    }
}

// Serialized as the digit string so faces work as map keys in
// string-keyed formats.
impl Serialize for Face {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Face {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}
