//! The Type-A bilinear map ê : E(F_q) × E(F_q) → F_{q²}
//!
//! Miller's loop over the split exponent r = 2^exp2 + 2^exp1 + 1,
//! followed by the Tate final exponentiation (q² − 1)/r. The loop keeps
//! the running point in Jacobian coordinates (X, Y, Z, Z²) and mutates
//! that scratch in place; everything taken from the caller is cloned
//! first, so the same point may appear on both sides.
//!
//! The final exponentiation factors as (q − 1) · h. The first factor is
//! a conjugate-times-inverse step that lands the value in the unitary
//! subgroup; the second walks h with a Lucas V-sequence ladder on twice
//! the real part and recovers the imaginary part at the end (the
//! compressed-pairing trick of Scott & Barreto).

use num_bigint::BigUint;

use crate::curve::CurvePoint;
use crate::fp::FqElem;
use crate::fp2::Fq2Elem;
use crate::params;

/// The Miller-loop running point in Jacobian form. `zz` caches Z².
struct ProjPoint {
    x: FqElem,
    y: FqElem,
    z: FqElem,
    zz: FqElem,
}

impl ProjPoint {
    fn from_affine(x: FqElem, y: FqElem) -> Self {
        ProjPoint {
            x,
            y,
            z: FqElem::one(),
            zz: FqElem::one(),
        }
    }

    /// (X, Y, Z) → (X/Z², Y/Z³), resetting Z and Z² to one.
    fn normalize(&mut self) {
        let zi = self.z.inv();
        let zi2 = zi.sqr();
        self.x = self.x.mul(&zi2);
        self.y = self.y.mul(&zi2.mul(&zi));
        self.z = FqElem::one();
        self.zz = FqElem::one();
    }

    /// Jacobian doubling specialized to a = 1.
    fn double_in_place(&mut self) {
        // t0 = 3X² + Z⁴
        let t0 = self.x.sqr().mul_u64(3).add(&self.zz.sqr());
        // Z' = 2YZ, and refresh the Z² cache
        self.z = self.y.mul(&self.z).mul_u64(2);
        self.zz = self.z.sqr();
        // t1 = 4XY², t2 = 8Y⁴
        let y_sqr = self.y.sqr();
        let t1 = self.x.mul(&y_sqr).mul_u64(4);
        let t2 = y_sqr.sqr().mul_u64(8);
        // X' = t0² − 2t1, Y' = t0(t1 − X') − t2
        let x_next = t0.sqr().sub(&t1.mul_u64(2));
        self.y = t0.mul(&t1.sub(&x_next)).sub(&t2);
        self.x = x_next;
    }

    /// Coefficients (a, b, c) of the tangent line at this point,
    /// in projective form:
    ///   a = −(3X² + Z⁴)·Z², b = 2YZ³, c = −(2Y² + a'X)
    /// where a' is the pre-lift value of a.
    fn tangent_coeffs(&self) -> (FqElem, FqElem, FqElem) {
        let a_raw = self.x.sqr().mul_u64(3).add(&self.zz.sqr()).neg();
        let two_y = self.y.mul_u64(2);
        let b = two_y.mul(&self.zz).mul(&self.z);
        let c = a_raw.mul(&self.x).add(&two_y.mul(&self.y)).neg();
        (a_raw.mul(&self.zz), b, c)
    }
}

/// Coefficients of the chord through two affine points v and v1:
///   a = v.y − v1.y, b = v1.x − v.x, c = v.x·v1.y − v.y·v1.x.
fn chord_coeffs(
    v: (&FqElem, &FqElem),
    v1: (&FqElem, &FqElem),
) -> (FqElem, FqElem, FqElem) {
    let a = v.1.sub(v1.1);
    let b = v1.0.sub(v.0);
    let c = v.0.mul(v1.1).sub(&v.1.mul(v1.0));
    (a, b, c)
}

/// Evaluates a·x + b·y + c at Q mapped through the distortion
/// (x, y) ↦ (−x, i·y), which places the value in F_{q²}:
/// the result is (c − a·qx) + (b·qy)·i.
fn eval_line(
    (a, b, c): (FqElem, FqElem, FqElem),
    qx: &FqElem,
    qy: &FqElem,
) -> Fq2Elem {
    Fq2Elem::new(c.sub(&a.mul(qx)), b.mul(qy))
}

/// Miller's algorithm for the function with divisor r·(P) − r·(∞),
/// evaluated at Q. Exploits r = 2^exp2 + 2^exp1 + 1: the loop doubles
/// through exp2 bits, snapshotting the running point and accumulator at
/// exp1, and folds the snapshot plus one final chord back in.
fn miller(px: &FqElem, py: &FqElem, qx: &FqElem, qy: &FqElem) -> Fq2Elem {
    let mut v = ProjPoint::from_affine(px.clone(), py.clone());
    let mut f = Fq2Elem::one();

    for _ in 0..params::EXP1 {
        f = f.sqr();
        f = f.mul(&eval_line(v.tangent_coeffs(), qx, qy));
        v.double_in_place();
    }

    v.normalize();
    let v1 = (v.x.clone(), v.y.clone());
    let f1 = f.clone();

    for _ in params::EXP1..params::EXP2 {
        f = f.sqr();
        f = f.mul(&eval_line(v.tangent_coeffs(), qx, qy));
        v.double_in_place();
    }

    f = f.mul(&f1);
    v.normalize();
    let chord = chord_coeffs((&v.x, &v.y), (&v1.0, &v1.1));
    f.mul(&eval_line(chord, qx, qy))
}

/// Walks the bits of `cofac` with the Lucas V-sequence recurrences
/// V_{2k} = V_k² − 2 and V_{2k+1} = V_k·V_{k+1} − P, where P is twice
/// the real part of the unitary element `e`. The imaginary part of the
/// result is recovered as U = (2·V_{k+1} − P·V_k)/(P² − 4) times the
/// imaginary part of `e`.
fn lucas_ladder(e: &Fq2Elem, cofac: &BigUint) -> Fq2Elem {
    let two = FqElem::from_u64(2);
    let trace = e.re().mul_u64(2);
    let mut v0 = two.clone();
    let mut v1 = trace.clone();

    let mut offset = cofac.bits() as i64 - 1;
    loop {
        if offset == 0 {
            // the cofactor (q + 1)/r is even, so the last step is
            // always the doubling form
            v1 = v0.mul(&v1).sub(&trace);
            v0 = v0.sqr().sub(&two);
            break;
        }
        if cofac.bit(offset as u64) {
            v0 = v0.mul(&v1).sub(&trace);
            v1 = v1.sqr().sub(&two);
        } else {
            v1 = v0.mul(&v1).sub(&trace);
            v0 = v0.sqr().sub(&two);
        }
        offset -= 1;
    }

    // U_k = (2·V_{k+1} − P·V_k) / (P² − 4)
    let numerator = v1.mul_u64(2).sub(&v0.mul(&trace));
    let denominator = trace.sqr().sub(&two).sub(&two).inv();
    let u = numerator.mul(&denominator);
    Fq2Elem::new(v0.halve(), u.mul(e.im()))
}

/// Raises the Miller output to (q² − 1)/r = (q − 1) · h. The (q − 1)
/// factor is conj(f)·f⁻¹, after which the value is unitary and the
/// Lucas ladder handles the h factor in compressed form.
fn tate_exp(f: &Fq2Elem) -> Fq2Elem {
    let unitary = f.conjugate().mul(&f.inv());
    lucas_ladder(&unitary, CurvePoint::cofactor())
}

/// The bilinear map ê(P, Q). Cloning-based, so ê(P, P) is fine; an
/// infinity operand yields the identity of F_{q²}.
pub fn pairing(p: &CurvePoint, q: &CurvePoint) -> Fq2Elem {
    let (px, py) = match p {
        CurvePoint::Infinity => return Fq2Elem::one(),
        CurvePoint::Affine { x, y } => (x, y),
    };
    let (qx, qy) = match q {
        CurvePoint::Infinity => return Fq2Elem::one(),
        CurvePoint::Affine { x, y } => (x, y),
    };
    tate_exp(&miller(px, py, qx, qy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn pairing_of_generator_is_not_degenerate() {
        let g = CurvePoint::generator();
        let e = pairing(g, g);
        assert!(!e.is_one());
        assert!(!e.is_zero());
    }

    #[test]
    fn infinity_maps_to_identity() {
        let g = CurvePoint::generator();
        assert!(pairing(&CurvePoint::Infinity, g).is_one());
        assert!(pairing(g, &CurvePoint::Infinity).is_one());
    }

    #[test]
    fn swap_of_scalars_agrees() {
        // ê(2P, Q) == ê(P, 2Q) == ê(P, Q)²
        let p = CurvePoint::random(&mut OsRng).unwrap();
        let q = CurvePoint::random(&mut OsRng).unwrap();
        let two = BigUint::from(2u32);
        let base = pairing(&p, &q);
        assert_eq!(pairing(&p.mul(&two), &q), base.sqr());
        assert_eq!(pairing(&p, &q.mul(&two)), base.sqr());
    }
}
