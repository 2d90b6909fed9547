//! Fixed-point decimal with 18 decimal places
//!
//! `Dec` is the share type of the staking ledger. Every value sits on the same
//! 10^-18 grid regardless of magnitude, so the same share amount computed along
//! two paths agrees to the last digit. The backing big integer keeps
//! `shares × tokens` intermediates exact at any stake size.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use num_traits::{ToPrimitive, Zero};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors from decimal arithmetic and conversion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("Decimal overflow")]
    Overflow,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Negative value cannot be converted to tokens: {0}")]
    Negative(String),

    #[error("Invalid decimal: {0}")]
    InvalidDecimal(String),
}

/// Decimal places carried by every [`Dec`]
pub const PRECISION: u32 = 18;

const UNIT: u64 = 1_000_000_000_000_000_000;

fn unit() -> BigInt {
    BigInt::from(UNIT)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rounding {
    HalfEven,
    Truncate,
}

/// Integer division with the given rounding
fn div_rounded(numer: &BigInt, denom: &BigInt, rounding: Rounding) -> BigInt {
    let quo = numer / denom;
    let rem = numer % denom;
    if rounding == Rounding::Truncate || rem.is_zero() {
        return quo;
    }

    let twice_rem = rem.magnitude() + rem.magnitude();
    let away_from_zero = match twice_rem.cmp(denom.magnitude()) {
        Ordering::Less => false,
        Ordering::Greater => true,
        Ordering::Equal => !(&quo % BigInt::from(2)).is_zero(),
    };
    match (away_from_zero, numer.sign() == denom.sign()) {
        (false, _) => quo,
        (true, true) => quo + BigInt::from(1),
        (true, false) => quo - BigInt::from(1),
    }
}

/// Signed decimal stored as an integer count of 10^-18 units
///
/// Multiplication and division round half-to-even at the 18th place unless
/// the `_truncate` variant is used.
///
/// # Example
/// ```
/// use lsm_core::Dec;
///
/// let shares = Dec::from_int(100).mul_quo_truncate(&Dec::from_int(20), &Dec::from_int(67)).unwrap();
/// assert_eq!(shares.to_string(), "29.850746268656716417");
/// assert_eq!(shares.truncate_int().unwrap(), 29);
/// ```
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dec(BigInt);

impl Dec {
    pub fn zero() -> Self {
        Self(BigInt::zero())
    }

    pub fn one() -> Self {
        Self(unit())
    }

    pub fn from_int(value: u128) -> Self {
        Self(BigInt::from(value) * unit())
    }

    /// Lift a `rust_decimal` value, dropping digits past the 18th place
    pub fn from_decimal(value: Decimal) -> Self {
        let mantissa = BigInt::from(value.mantissa());
        let scale = value.scale();
        if scale <= PRECISION {
            Self(mantissa * BigInt::from(10u64.pow(PRECISION - scale)))
        } else {
            Self(mantissa / BigInt::from(10u64.pow(scale - PRECISION)))
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.sign() == Sign::Minus
    }

    pub fn is_positive(&self) -> bool {
        self.0.sign() == Sign::Plus
    }

    /// Exact product with an integer
    pub fn mul_int(&self, value: u128) -> Dec {
        Dec(&self.0 * BigInt::from(value))
    }

    pub fn mul_truncate(&self, other: &Dec) -> Dec {
        Dec(div_rounded(&(&self.0 * &other.0), &unit(), Rounding::Truncate))
    }

    pub fn quo(&self, other: &Dec) -> Result<Dec, MathError> {
        self.mul_quo_with(&Dec::one(), other, Rounding::HalfEven)
    }

    pub fn quo_truncate(&self, other: &Dec) -> Result<Dec, MathError> {
        self.mul_quo_with(&Dec::one(), other, Rounding::Truncate)
    }

    /// `self * numerator / denominator`, rounded once at the end
    pub fn mul_quo(&self, numerator: &Dec, denominator: &Dec) -> Result<Dec, MathError> {
        self.mul_quo_with(numerator, denominator, Rounding::HalfEven)
    }

    /// `self * numerator / denominator`, truncated once at the end
    pub fn mul_quo_truncate(&self, numerator: &Dec, denominator: &Dec) -> Result<Dec, MathError> {
        self.mul_quo_with(numerator, denominator, Rounding::Truncate)
    }

    fn mul_quo_with(&self, numerator: &Dec, denominator: &Dec, rounding: Rounding) -> Result<Dec, MathError> {
        if denominator.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        Ok(Dec(div_rounded(&(&self.0 * &numerator.0), &denominator.0, rounding)))
    }

    /// Truncate toward zero and convert to an integer token amount
    pub fn truncate_int(&self) -> Result<u128, MathError> {
        self.to_int(Rounding::Truncate)
    }

    /// Round half-to-even and convert to an integer token amount
    pub fn round_int(&self) -> Result<u128, MathError> {
        self.to_int(Rounding::HalfEven)
    }

    fn to_int(&self, rounding: Rounding) -> Result<u128, MathError> {
        if self.is_negative() {
            return Err(MathError::Negative(self.to_string()));
        }
        div_rounded(&self.0, &unit(), rounding)
            .to_u128()
            .ok_or(MathError::Overflow)
    }
}

impl From<u128> for Dec {
    fn from(value: u128) -> Self {
        Self::from_int(value)
    }
}

impl From<Decimal> for Dec {
    fn from(value: Decimal) -> Self {
        Self::from_decimal(value)
    }
}

impl Add for Dec {
    type Output = Dec;

    fn add(self, rhs: Dec) -> Dec {
        Dec(self.0 + rhs.0)
    }
}

impl Add<&Dec> for &Dec {
    type Output = Dec;

    fn add(self, rhs: &Dec) -> Dec {
        Dec(&self.0 + &rhs.0)
    }
}

impl Sub for Dec {
    type Output = Dec;

    fn sub(self, rhs: Dec) -> Dec {
        Dec(self.0 - rhs.0)
    }
}

impl Sub<&Dec> for &Dec {
    type Output = Dec;

    fn sub(self, rhs: &Dec) -> Dec {
        Dec(&self.0 - &rhs.0)
    }
}

impl AddAssign<&Dec> for Dec {
    fn add_assign(&mut self, rhs: &Dec) {
        self.0 += &rhs.0;
    }
}

impl SubAssign<&Dec> for Dec {
    fn sub_assign(&mut self, rhs: &Dec) {
        self.0 -= &rhs.0;
    }
}

/// Product rounded half-to-even at the 18th place
impl Mul<&Dec> for &Dec {
    type Output = Dec;

    fn mul(self, rhs: &Dec) -> Dec {
        Dec(div_rounded(&(&self.0 * &rhs.0), &unit(), Rounding::HalfEven))
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let magnitude = BigInt::from_biguint(Sign::Plus, self.0.magnitude().clone());
        let unit = unit();
        write!(
            f,
            "{sign}{}.{:0>width$}",
            &magnitude / &unit,
            (&magnitude % &unit).to_string(),
            width = PRECISION as usize
        )
    }
}

impl fmt::Debug for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dec({self})")
    }
}

impl FromStr for Dec {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MathError::InvalidDecimal(s.to_string());
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
        if int_part.is_empty()
            || frac_part.len() > PRECISION as usize
            || !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let padded = format!("{int_part}{frac_part:0<width$}", width = PRECISION as usize);
        let raw = BigInt::from_str(&padded).map_err(|_| invalid())?;
        Ok(Self(if negative { -raw } else { raw }))
    }
}

impl Serialize for Dec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Dec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
