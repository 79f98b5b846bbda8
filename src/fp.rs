//! Prime-field arithmetic
//!
//! Both fields of the pairing live here: the base field F_q and the
//! scalar field F_r. They are distinct Rust types (markers [`Q`] and
//! [`R`] instantiating [`Elem`]), so mixing elements of different
//! moduli is a compile error rather than a runtime check.
//!
//! Every element owns a reduced representative in `[0, p)`; all
//! constructors and operations re-reduce. The fields themselves are
//! process-wide constants: modulus plus a quadratic non-residue drawn
//! once from the system CSPRNG (a failure there is fatal, nothing else
//! can run without the fields).

use std::fmt;
use std::marker::PhantomData;
use std::mem;

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::Result;
use crate::params;

static Q_MODULUS: Lazy<BigUint> = Lazy::new(|| params::parse_dec(params::ORDER_Q_DEC));
static R_MODULUS: Lazy<BigUint> = Lazy::new(|| params::parse_dec(params::ORDER_R_DEC));
static Q_NONRESIDUE: Lazy<BigUint> = Lazy::new(|| draw_nonresidue(&Q_MODULUS));
static R_NONRESIDUE: Lazy<BigUint> = Lazy::new(|| draw_nonresidue(&R_MODULUS));

/// A prime field, identified at the type level.
pub trait Field: Copy + Clone + Eq + fmt::Debug + 'static {
    /// Short name used in panic messages.
    const NAME: &'static str;
    /// The field modulus.
    fn modulus() -> &'static BigUint;
    /// A fixed quadratic non-residue of the field.
    fn nonresidue() -> &'static BigUint;
    /// Serialized width: ⌈bitlen(p)/8⌉.
    fn byte_len() -> usize {
        ((Self::modulus().bits() + 7) / 8) as usize
    }
}

/// Marker for the base field F_q.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Q {}

/// Marker for the scalar field F_r.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum R {}

impl Field for Q {
    const NAME: &'static str = "Fq";
    fn modulus() -> &'static BigUint {
        &Q_MODULUS
    }
    fn nonresidue() -> &'static BigUint {
        &Q_NONRESIDUE
    }
}

impl Field for R {
    const NAME: &'static str = "Fr";
    fn modulus() -> &'static BigUint {
        &R_MODULUS
    }
    fn nonresidue() -> &'static BigUint {
        &R_NONRESIDUE
    }
}

/// An element of the prime field `F`.
#[derive(Clone, PartialEq, Eq)]
pub struct Elem<F: Field> {
    val: BigUint,
    _field: PhantomData<F>,
}

/// Element of the base field F_q.
pub type FqElem = Elem<Q>;

/// Element of the scalar field F_r.
pub type FrElem = Elem<R>;

impl<F: Field> fmt::Debug for Elem<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", F::NAME, self.val)
    }
}

impl<F: Field> Elem<F> {
    /// Wraps a value, reducing it modulo the field order.
    pub fn new(v: BigUint) -> Self {
        Elem {
            val: v % F::modulus(),
            _field: PhantomData,
        }
    }

    pub fn zero() -> Self {
        Elem {
            val: BigUint::zero(),
            _field: PhantomData,
        }
    }

    pub fn one() -> Self {
        Self::from_u64(1)
    }

    pub fn from_u64(v: u64) -> Self {
        Self::new(BigUint::from(v))
    }

    /// Interprets big-endian bytes, reduced modulo the field order.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self::new(BigUint::from_bytes_be(data))
    }

    /// Maps arbitrary bytes (typically a digest) into the field: the
    /// input is tiled across a ⌈bitlen(p)/8⌉-byte buffer with a zero
    /// marker byte between copies, read big-endian, then halved until
    /// it no longer exceeds the modulus.
    pub fn from_hash(hash: &[u8]) -> Self {
        Self::new(int_from_hash(hash, F::modulus()))
    }

    /// Draws a uniform element below the modulus. CSPRNG failures are
    /// propagated.
    pub fn random<Rg: RngCore>(rng: &mut Rg) -> Result<Self> {
        Ok(Elem {
            val: random_below(F::modulus(), rng)?,
            _field: PhantomData,
        })
    }

    /// The reduced representative.
    pub fn value(&self) -> &BigUint {
        &self.val
    }

    /// Big-endian bytes, left-padded to the field's serialized width.
    pub fn bytes(&self) -> Vec<u8> {
        let width = F::byte_len();
        let raw = self.val.to_bytes_be();
        let mut out = vec![0u8; width - raw.len()];
        out.extend_from_slice(&raw);
        out
    }

    pub fn is_zero(&self) -> bool {
        self.val.is_zero()
    }

    /// Sign of the reduced representative relative to zero.
    pub fn sign(&self) -> i32 {
        if self.val.is_zero() {
            0
        } else {
            1
        }
    }

    pub fn add(&self, rhs: &Self) -> Self {
        Self::new(&self.val + &rhs.val)
    }

    pub fn sub(&self, rhs: &Self) -> Self {
        // lift into [p, 2p) first so the difference stays non-negative
        Self::new(F::modulus() + &self.val - &rhs.val)
    }

    pub fn mul(&self, rhs: &Self) -> Self {
        Self::new(&self.val * &rhs.val)
    }

    pub fn mul_u64(&self, k: u64) -> Self {
        Self::new(&self.val * k)
    }

    pub fn sqr(&self) -> Self {
        Self::new(&self.val * &self.val)
    }

    pub fn neg(&self) -> Self {
        Self::new(F::modulus() - &self.val)
    }

    /// Exact division by two: odd representatives are lifted by the
    /// modulus first, so the result stays in `[0, p)`.
    pub fn halve(&self) -> Self {
        let mut v = self.val.clone();
        if v.is_odd() {
            v += F::modulus();
        }
        Elem {
            val: v >> 1u32,
            _field: PhantomData,
        }
    }

    /// Multiplicative inverse via the extended Euclidean algorithm.
    ///
    /// # Panics
    ///
    /// Panics on the zero element; inverting zero is a programming
    /// error, not a recoverable condition.
    pub fn inv(&self) -> Self {
        assert!(!self.is_zero(), "inverse of zero in {}", F::NAME);
        let p = BigInt::from(F::modulus().clone());
        let gcd = BigInt::from(self.val.clone()).extended_gcd(&p);
        let x = gcd.x.mod_floor(&p);
        Self::new(x.to_biguint().expect("mod_floor result is non-negative"))
    }

    /// Exponentiation with a signed exponent: a negative exponent
    /// exponentiates the inverse of the base.
    pub fn pow(&self, e: &BigInt) -> Self {
        let (sign, mag) = (e.sign(), e.magnitude());
        match sign {
            Sign::Minus => self.inv().pow_biguint(mag),
            _ => self.pow_biguint(mag),
        }
    }

    pub fn pow_biguint(&self, e: &BigUint) -> Self {
        Elem {
            val: self.val.modpow(e, F::modulus()),
            _field: PhantomData,
        }
    }

    /// Whether the element is a quadratic residue (Jacobi symbol +1).
    pub fn is_square(&self) -> bool {
        jacobi(&self.val, F::modulus()) == 1
    }

    /// A square root, or `None` when the element is a non-residue.
    /// For p ≡ 3 (mod 4) the (p+1)/4 exponent is used; otherwise
    /// Tonelli–Shanks with the field's non-residue.
    pub fn sqrt(&self) -> Option<Self> {
        if self.is_zero() {
            return Some(Self::zero());
        }
        let p = F::modulus();
        if jacobi(&self.val, p) != 1 {
            return None;
        }
        let root = if low_mod(p, 4) == 3 {
            let e = (p + BigUint::one()) >> 2u32;
            self.val.modpow(&e, p)
        } else {
            tonelli_shanks(&self.val, p, F::nonresidue())
        };
        Some(Self::new(root))
    }
}

/// Builds an integer below `limit` from arbitrary hash bytes: the hash
/// is tiled across a ⌈bitlen(limit)/8⌉-byte buffer, separated by a zero
/// marker byte, then the big-endian value is halved while it exceeds
/// the limit.
pub(crate) fn int_from_hash(hash: &[u8], limit: &BigUint) -> BigUint {
    let total = ((limit.bits() + 7) / 8) as usize;
    let mut buf = vec![0u8; total];
    let mut offset = 0usize;
    loop {
        let take = hash.len().min(total - offset);
        buf[offset..offset + take].copy_from_slice(&hash[..take]);
        offset += take;
        if offset >= total {
            break;
        }
        offset += 1; // marker byte between copies stays zero
    }
    let mut v = BigUint::from_bytes_be(&buf);
    while &v > limit {
        v >>= 1u32;
    }
    v
}

/// Uniform sample in `[0, limit)` by rejection, surfacing CSPRNG
/// failures to the caller.
pub(crate) fn random_below<Rg: RngCore>(limit: &BigUint, rng: &mut Rg) -> Result<BigUint> {
    let bits = limit.bits();
    let len = ((bits + 7) / 8) as usize;
    let mask = 0xffu8 >> (len as u64 * 8 - bits);
    let mut buf = vec![0u8; len];
    loop {
        rng.try_fill_bytes(&mut buf)?;
        buf[0] &= mask;
        let v = BigUint::from_bytes_be(&buf);
        if &v < limit {
            return Ok(v);
        }
    }
}

fn draw_nonresidue(p: &BigUint) -> BigUint {
    loop {
        let candidate =
            random_below(p, &mut OsRng).expect("system randomness required for field setup");
        if jacobi(&candidate, p) == -1 {
            return candidate;
        }
    }
}

fn low_mod(n: &BigUint, m: u32) -> u32 {
    (n % m).to_u32().expect("remainder fits in u32")
}

/// Jacobi symbol (a/n) for odd n.
pub(crate) fn jacobi(a: &BigUint, n: &BigUint) -> i32 {
    debug_assert!(n.is_odd());
    let mut a = a % n;
    let mut n = n.clone();
    let mut t = 1i32;
    while !a.is_zero() {
        while a.is_even() {
            a >>= 1u32;
            let r = low_mod(&n, 8);
            if r == 3 || r == 5 {
                t = -t;
            }
        }
        mem::swap(&mut a, &mut n);
        if low_mod(&a, 4) == 3 && low_mod(&n, 4) == 3 {
            t = -t;
        }
        a %= &n;
    }
    if n.is_one() {
        t
    } else {
        0
    }
}

/// Tonelli–Shanks for the general p ≡ 1 (mod 4) case. Expects a
/// residue (Jacobi +1) and a non-residue witness.
fn tonelli_shanks(a: &BigUint, p: &BigUint, nqr: &BigUint) -> BigUint {
    let one = BigUint::one();
    let mut q = p - &one;
    let mut s = 0u64;
    while q.is_even() {
        q >>= 1u32;
        s += 1;
    }
    let mut z = nqr.modpow(&q, p);
    let mut x = a.modpow(&((&q + &one) >> 1u32), p);
    let mut b = a.modpow(&q, p);
    let mut e = s;
    while !b.is_one() {
        let mut m = 0u64;
        let mut t = b.clone();
        while !t.is_one() {
            t = (&t * &t) % p;
            m += 1;
        }
        let mut g = z.clone();
        for _ in 0..(e - m - 1) {
            g = (&g * &g) % p;
        }
        z = (&g * &g) % p;
        b = (&b * &z) % p;
        x = (&x * &g) % p;
        e = m;
    }
    x
}
