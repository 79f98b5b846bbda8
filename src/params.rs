//! Type-A pairing parameters
//!
//! The curve is y² = x³ + x over F_q with q + 1 = r·h, r prime. The
//! canonical parameter set below is fixed for the whole library; a
//! parameter-file parser is provided for interoperability with the
//! `type a` configuration format (`key value`, one pair per line).

use std::io::BufRead;

use num_bigint::BigUint;
use num_traits::One;

use crate::error::{Error, Result};

/// Base field order q (decimal).
pub const ORDER_Q_DEC: &str = "8780710799663312522437781984754049815806883199414208211028653399266475630880222957078625179422662221423155858769582317459277713367317481324925129998224791";

/// Subgroup order r = 2^159 + 2^107 + 1 (decimal).
pub const ORDER_R_DEC: &str = "730750818665451621361119245571504901405976559617";

/// Cofactor h with q + 1 = r·h (decimal).
pub const COFACTOR_DEC: &str = "12016012264891146079388821366740534204802954401251311822919615131047207289359704531102844802183906537786776";

/// Fixed subgroup generator, serialized as x‖y (Base64).
pub const GENERATOR_B64: &str = "bKiQ2I+udgyl7aDwDARsdtPaZeKPRtsNB3ch7BflAYyZ7q/54XPs9kAcueh2b7YRF8Qhm66Zpjt5y8AvQq9/XWXbh+10uNqhPxzxw3QA9CpAQttozpvHRcyUqJZN4YxpyImd54SDchgYS5u47AMMw8JGj55rqkCWEIHSXs+cLig=";

/// Miller-loop split exponents encoding r = 2^exp2 + 2^exp1 + 1.
pub const EXP2: u32 = 159;
/// See [`EXP2`].
pub const EXP1: u32 = 107;

/// A parsed `type a` parameter set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeAParams {
    pub q: BigUint,
    pub r: BigUint,
    pub h: BigUint,
    pub exp2: u32,
    pub exp1: u32,
    pub sign1: i32,
    pub sign0: i32,
}

impl TypeAParams {
    /// The canonical parameter set the library is built on.
    pub fn builtin() -> Self {
        TypeAParams {
            q: parse_dec(ORDER_Q_DEC),
            r: parse_dec(ORDER_R_DEC),
            h: parse_dec(COFACTOR_DEC),
            exp2: EXP2,
            exp1: EXP1,
            sign1: 1,
            sign0: 1,
        }
    }

    /// Reads a parameter file: one `key value` pair per line, keys in any
    /// order. Recognized keys: `type` (must be `a`), `q`, `r`, `h`,
    /// `exp2`, `exp1`, `sign1`, `sign0`. Anything else is an error.
    pub fn parse<R: BufRead>(input: R) -> Result<Self> {
        let mut q = None;
        let mut r = None;
        let mut h = None;
        let mut exp2 = None;
        let mut exp1 = None;
        let mut sign1 = None;
        let mut sign0 = None;

        for line in input.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let mut items = trimmed.split_whitespace();
            let (key, value) = match (items.next(), items.next(), items.next()) {
                (Some(k), Some(v), None) => (k, v),
                _ => {
                    return Err(Error::ConfigParse(format!("invalid line: {trimmed}")));
                }
            };
            match key {
                "type" => {
                    if value != "a" {
                        return Err(Error::ConfigParse(format!(
                            "mismatched parameter type: {value}"
                        )));
                    }
                }
                "q" => q = Some(read_big(value)?),
                "r" => r = Some(read_big(value)?),
                "h" => h = Some(read_big(value)?),
                "exp2" => exp2 = Some(read_int(value)?),
                "exp1" => exp1 = Some(read_int(value)?),
                "sign1" => sign1 = Some(read_sign(value)?),
                "sign0" => sign0 = Some(read_sign(value)?),
                _ => {
                    return Err(Error::ConfigParse(format!("unknown field: {key}")));
                }
            }
        }

        let params = TypeAParams {
            q: q.ok_or_else(|| Error::ConfigParse("missing field: q".into()))?,
            r: r.ok_or_else(|| Error::ConfigParse("missing field: r".into()))?,
            h: h.ok_or_else(|| Error::ConfigParse("missing field: h".into()))?,
            exp2: exp2.ok_or_else(|| Error::ConfigParse("missing field: exp2".into()))?,
            exp1: exp1.ok_or_else(|| Error::ConfigParse("missing field: exp1".into()))?,
            sign1: sign1.unwrap_or(1),
            sign0: sign0.unwrap_or(1),
        };
        params.validate()?;
        Ok(params)
    }

    /// Consistency checks: q + 1 = r·h, and only the +1/+1 sign
    /// combination is supported by the pairing engine.
    pub fn validate(&self) -> Result<()> {
        if &self.q + BigUint::one() != &self.r * &self.h {
            return Err(Error::ConfigParse("q + 1 != r * h".into()));
        }
        if self.sign1 != 1 {
            return Err(Error::ConfigParse(format!(
                "unsupported sign1 value: {}",
                self.sign1
            )));
        }
        if self.sign0 != 1 {
            return Err(Error::ConfigParse(format!(
                "unsupported sign0 value: {}",
                self.sign0
            )));
        }
        if self.exp1 >= self.exp2 {
            return Err(Error::ConfigParse(format!(
                "exp1 {} must be below exp2 {}",
                self.exp1, self.exp2
            )));
        }
        Ok(())
    }
}

pub(crate) fn parse_dec(s: &str) -> BigUint {
    BigUint::parse_bytes(s.as_bytes(), 10).expect("literal parameter constant")
}

fn read_big(s: &str) -> Result<BigUint> {
    BigUint::parse_bytes(s.as_bytes(), 10)
        .ok_or_else(|| Error::ConfigParse(format!("bad integer: {s}")))
}

fn read_int(s: &str) -> Result<u32> {
    s.parse::<u32>()
        .map_err(|_| Error::ConfigParse(format!("bad integer: {s}")))
}

fn read_sign(s: &str) -> Result<i32> {
    s.parse::<i32>()
        .map_err(|_| Error::ConfigParse(format!("bad sign: {s}")))
}
