//! Integer encodings on fixed-width bit fields.

use serde::{Deserialize, Serialize};

/// How an integer value is laid out on its bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Binarization {
    /// Unsigned binary, least significant bit first.
    Uint,
}

impl Binarization {
    /// Decode a bit field into its value.
    ///
    /// Bits past the 64th do not fit a `u64` and are ignored.
    ///
    /// ```
    /// use qubify::search_space::Binarization;
    ///
    /// assert_eq!(Binarization::Uint.decode(&[1, 0, 0]), 1);
    /// assert_eq!(Binarization::Uint.decode(&[1, 1, 0]), 3);
    /// assert_eq!(Binarization::Uint.decode(&[1, 1, 1]), 7);
    /// ```
    #[must_use]
    pub fn decode(&self, bits: &[u8]) -> u64 {
        match self {
            Self::Uint => bits
                .iter()
                .take(u64::BITS as usize)
                .enumerate()
                .filter(|(_, &b)| b != 0)
                .fold(0u64, |acc, (i, _)| acc | (1u64 << i)),
        }
    }

    /// Encode `value` on `width` bits.
    ///
    /// # Errors
    ///
    /// Returns a description when `value` needs more than `width` bits.
    pub fn encode(&self, value: u64, width: usize) -> Result<Vec<u8>, String> {
        match self {
            Self::Uint => {
                if value > self.max_value(width) {
                    let needed = u64::BITS - value.leading_zeros();
                    return Err(format!("value {value} needs {needed} bits, only {width} available"));
                }
                Ok((0..width)
                    .map(|i| u8::from(i < 64 && value & (1u64 << i) != 0))
                    .collect())
            }
        }
    }

    /// Largest value representable on `width` bits.
    #[must_use]
    pub fn max_value(&self, width: usize) -> u64 {
        match self {
            Self::Uint if width >= 64 => u64::MAX,
            Self::Uint => (1u64 << width) - 1,
        }
    }
}
