//! Salary - десятичное число с фиксированной точкой (96-битная мантисса + масштаб).
//!
//! Бинарная форма (16 байт LE): [lo u32][mid u32][hi u32][flags u32],
//! flags: биты 16..24 - масштаб, бит 31 - знак.

use std::fmt;
use std::str::FromStr;

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::consts::{
    SALARY_LEN, SALARY_MANTISSA_BITS, SALARY_MAX_SCALE, SALARY_SCALE_MASK, SALARY_SCALE_SHIFT,
    SALARY_SIGN_MASK,
};
use crate::error::{Result, StoreError};

const MANTISSA_MAX: i128 = (1i128 << SALARY_MANTISSA_BITS) - 1;

/// value = mantissa / 10^scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Salary {
    mantissa: i128,
    scale: u8,
}

impl Salary {
    pub const ZERO: Salary = Salary {
        mantissa: 0,
        scale: 0,
    };

    pub fn new(mantissa: i128, scale: u8) -> Result<Self> {
        if scale > SALARY_MAX_SCALE {
            return Err(StoreError::SalaryOutOfRange(format!(
                "scale {} > {}",
                scale, SALARY_MAX_SCALE
            )));
        }
        if mantissa.unsigned_abs() > MANTISSA_MAX as u128 {
            return Err(StoreError::SalaryOutOfRange(format!(
                "mantissa {} does not fit 96 bits",
                mantissa
            )));
        }
        Ok(Self { mantissa, scale })
    }

    /// Целое число денежных единиц (scale = 0).
    pub fn from_units(units: i64) -> Self {
        Self {
            mantissa: units as i128,
            scale: 0,
        }
    }

    #[inline]
    pub fn mantissa(&self) -> i128 {
        self.mantissa
    }

    #[inline]
    pub fn scale(&self) -> u8 {
        self.scale
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.mantissa < 0
    }

    /// Целая часть (усечение к нулю).
    pub fn trunc(&self) -> i128 {
        self.mantissa / 10i128.pow(self.scale as u32)
    }

    pub fn has_fraction(&self) -> bool {
        self.mantissa % 10i128.pow(self.scale as u32) != 0
    }

    pub fn encode_into(&self, out: &mut [u8]) {
        debug_assert!(out.len() >= SALARY_LEN);
        let abs = self.mantissa.unsigned_abs();
        LittleEndian::write_u32(&mut out[0..4], (abs & 0xFFFF_FFFF) as u32);
        LittleEndian::write_u32(&mut out[4..8], ((abs >> 32) & 0xFFFF_FFFF) as u32);
        LittleEndian::write_u32(&mut out[8..12], ((abs >> 64) & 0xFFFF_FFFF) as u32);
        let mut flags = ((self.scale as u32) << SALARY_SCALE_SHIFT) & SALARY_SCALE_MASK;
        if self.mantissa < 0 {
            flags |= SALARY_SIGN_MASK;
        }
        LittleEndian::write_u32(&mut out[12..16], flags);
    }

    /// Разобрать 16 байт. Ошибка - если зарезервированные биты flags ненулевые
    /// или масштаб > 28.
    pub fn decode_from(buf: &[u8]) -> std::result::Result<Self, String> {
        if buf.len() < SALARY_LEN {
            return Err(format!("salary needs {} bytes, got {}", SALARY_LEN, buf.len()));
        }
        let lo = LittleEndian::read_u32(&buf[0..4]) as u128;
        let mid = LittleEndian::read_u32(&buf[4..8]) as u128;
        let hi = LittleEndian::read_u32(&buf[8..12]) as u128;
        let flags = LittleEndian::read_u32(&buf[12..16]);

        if flags & !(SALARY_SCALE_MASK | SALARY_SIGN_MASK) != 0 {
            return Err(format!("salary flags 0x{:08x} have reserved bits set", flags));
        }
        let scale = ((flags & SALARY_SCALE_MASK) >> SALARY_SCALE_SHIFT) as u8;
        if scale > SALARY_MAX_SCALE {
            return Err(format!("salary scale {} > {}", scale, SALARY_MAX_SCALE));
        }
        let abs = (lo | (mid << 32) | (hi << 64)) as i128;
        let mantissa = if flags & SALARY_SIGN_MASK != 0 { -abs } else { abs };
        Ok(Self { mantissa, scale })
    }
}

impl fmt::Display for Salary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.unsigned_abs().to_string();
        let sign = if self.mantissa < 0 { "-" } else { "" };
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{}{}", sign, digits);
        }
        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{}{}.{}", sign, int_part, frac_part)
    }
}

impl FromStr for Salary {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        let raw = s.trim();
        let bad = || StoreError::SalaryParse(s.to_string());

        let (negative, body) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw.strip_prefix('+').unwrap_or(raw)),
        };
        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(bad());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        if frac_part.len() > SALARY_MAX_SCALE as usize {
            return Err(StoreError::SalaryOutOfRange(format!(
                "more than {} fractional digits",
                SALARY_MAX_SCALE
            )));
        }

        let mut mantissa: i128 = 0;
        for b in int_part.bytes().chain(frac_part.bytes()) {
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add((b - b'0') as i128))
                .filter(|m| *m <= MANTISSA_MAX)
                .ok_or_else(|| StoreError::SalaryOutOfRange(s.to_string()))?;
        }
        if negative {
            mantissa = -mantissa;
        }
        Salary::new(mantissa, frac_part.len() as u8)
    }
}

impl Serialize for Salary {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Salary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
