//! Single-integer wire encoding for answer values.
//!
//! Values below [`FRACTION_BASE`] are whole numbers. Anything at or above it packs a
//! fraction as `numerator * 1000 + denominator`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Boundary between plain integers and packed fractions.
pub const FRACTION_BASE: i64 = 1000;

/// Display text used for encodings that cannot be shown as a number.
pub const UNDEFINED_DISPLAY: &str = "undefined";

//
// ─── ENCODED VALUE ─────────────────────────────────────────────────────────────
//

/// An answer value exactly as it travels on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedValue(i64);

impl EncodedValue {
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// True when the value is in the packed-fraction range.
    #[must_use]
    pub const fn is_packed_fraction(self) -> bool {
        self.0 >= FRACTION_BASE
    }
}

impl fmt::Debug for EncodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedValue({})", self.0)
    }
}

impl fmt::Display for EncodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EncodedValue {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

//
// ─── DISPLAY FORM ──────────────────────────────────────────────────────────────
//

/// Decoded, render-ready shape of an [`EncodedValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayForm {
    Whole(i64),
    Fraction { numerator: i64, denominator: i64 },
    /// Zero-denominator encoding.
    Undefined,
}

impl fmt::Display for DisplayForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayForm::Whole(value) => write!(f, "{value}"),
            DisplayForm::Fraction {
                numerator,
                denominator,
            } => write!(f, "{numerator}/{denominator}"),
            DisplayForm::Undefined => f.write_str(UNDEFINED_DISPLAY),
        }
    }
}

//
// ─── CODEC ─────────────────────────────────────────────────────────────────────
//

/// Pack a fraction into a single wire integer.
///
/// Performs no validation; a zero denominator produces an encoding that decodes
/// to [`DisplayForm::Undefined`].
#[must_use]
pub fn encode(numerator: u32, denominator: u32) -> EncodedValue {
    EncodedValue(i64::from(numerator) * FRACTION_BASE + i64::from(denominator))
}

/// Decode a wire integer for display. Total over every input.
///
/// Fractions are only simplified when they reduce to a whole number; `2/4` stays `2/4`.
#[must_use]
pub fn decode(value: EncodedValue) -> DisplayForm {
    let raw = value.raw();
    if raw < FRACTION_BASE {
        return DisplayForm::Whole(raw);
    }

    let numerator = raw / FRACTION_BASE;
    let denominator = raw % FRACTION_BASE;

    if denominator == 0 {
        return DisplayForm::Undefined;
    }
    if numerator == 0 {
        return DisplayForm::Whole(0);
    }
    if numerator == denominator {
        return DisplayForm::Whole(1);
    }
    if numerator % denominator == 0 {
        return DisplayForm::Whole(numerator / denominator);
    }

    DisplayForm::Fraction {
        numerator,
        denominator,
    }
}
