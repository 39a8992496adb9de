/*
    Field and curve primitives for secp256k1.

    Affine point arithmetic and on-curve checks are done by libsecp256k1.
    Scalars are 32 byte big-endian integers kept below the group order n;
    they are combined through libsecp256k1's constant-time key tweaks so
    no secret dependent arithmetic happens in this crate.
*/

use crate::{
    Secp256k1,
    SecpPublicKey,
    SecretKey,
    Tweak
};
use hex_literal::hex;
use zeroize::Zeroize;

/// Group order n
pub const ORDER: [u8; 32] = hex!("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141");
/// floor(n / 2), the largest low-s value
pub const HALF_ORDER: [u8; 32] = hex!("7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0");
/// Field prime p
pub const FIELD_PRIME: [u8; 32] = hex!("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F");
/// Affine x coordinate of the base point G
pub const GENERATOR_X: [u8; 32] = hex!("79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798");
/// Affine y coordinate of the base point G
pub const GENERATOR_Y: [u8; 32] = hex!("483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8");

//Exponent for inversion through Fermat's little theorem
const ORDER_MINUS_TWO: [u8; 32] = hex!("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD036413F");

/**
    An integer modulo the group order n, serialized as 32 bytes big-endian.
*/
#[derive(Clone, Copy, PartialEq, Eq, Hash, Zeroize)]
pub struct Scalar([u8; 32]);

impl Scalar {
    pub const ZERO: Scalar = Scalar([0u8; 32]);
    pub const ONE: Scalar = Scalar(hex!("0000000000000000000000000000000000000000000000000000000000000001"));

    /**
        Interprets the bytes as a big-endian integer.
        Returns None when the value is not below n.
    */
    pub fn from_bytes(bytes: &[u8; 32]) -> Option<Scalar> {
        //Arrays compare lexicographically, which is numeric order for big-endian bytes
        if *bytes < ORDER { Some(Scalar(*bytes)) } else { None }
    }

    /**
        Interprets the bytes as a big-endian integer reduced modulo n.
    */
    pub fn reduce(bytes: &[u8; 32]) -> Scalar {
        //2^256 < 2n so a single subtraction is enough
        if *bytes < ORDER {
            Scalar(*bytes)
        } else {
            Scalar(sub_be(bytes, &ORDER))
        }
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Is this scalar above n / 2?
    pub fn is_high(&self) -> bool {
        self.0 > HALF_ORDER
    }

    /**
        (self + other) mod n
    */
    pub fn add(&self, other: &Scalar) -> Scalar {
        match (self.secret_key(), other.secret_key()) {
            (None, _) => *other,
            (_, None) => *self,
            (Some(a), Some(b)) => match a.add_tweak(&Tweak::from(b)) {
                Ok(sum) => Scalar::from(sum),
                //libsecp256k1 refuses sums that land on zero
                Err(_) => Scalar::ZERO
            }
        }
    }

    /**
        (self * other) mod n
    */
    pub fn mul(&self, other: &Scalar) -> Scalar {
        match (self.secret_key(), other.secret_key()) {
            (Some(a), Some(b)) => match a.mul_tweak(&Tweak::from(b)) {
                Ok(product) => Scalar::from(product),
                Err(_) => Scalar::ZERO
            },
            _ => Scalar::ZERO
        }
    }

    /**
        (n - self) mod n
    */
    pub fn negate(&self) -> Scalar {
        match self.secret_key() {
            Some(a) => Scalar::from(a.negate()),
            None => Scalar::ZERO
        }
    }

    /**
        Multiplicative inverse modulo n, None for zero.
    */
    pub fn invert(&self) -> Option<Scalar> {
        if self.is_zero() { return None }

        //self^(n-2) by left-to-right square and multiply
        let mut acc = Scalar::ONE;
        for byte in ORDER_MINUS_TWO.iter() {
            for bit in (0..8).rev() {
                acc = acc.mul(&acc);
                if (byte >> bit) & 1 == 1 {
                    acc = acc.mul(self);
                }
            }
        }
        Some(acc)
    }

    //None exactly when the scalar is zero
    fn secret_key(&self) -> Option<SecretKey> {
        SecretKey::from_slice(&self.0).ok()
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::ZERO
    }
}

impl From<SecretKey> for Scalar {
    fn from(key: SecretKey) -> Self {
        Scalar(key.secret_bytes())
    }
}

impl std::fmt::Debug for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        //Scalars may be private keys or nonces
        f.write_str("Scalar(..)")
    }
}

/**
    A point on secp256k1, or the point at infinity.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Point {
    Infinity,
    Affine(SecpPublicKey)
}

impl Point {
    /// The base point G
    pub fn generator() -> Point {
        scalar_base_mult(&Scalar::ONE)
    }

    /**
        Builds a point from affine coordinates, None when it is not on the curve.
    */
    pub fn from_coordinates(x: &[u8; 32], y: &[u8; 32]) -> Option<Point> {
        if !point_validate(x, y) { return None }
        SecpPublicKey::from_slice(&uncompressed(x, y)).ok().map(Point::Affine)
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self, Point::Infinity)
    }

    /// Affine x coordinate, None at infinity
    pub fn x(&self) -> Option<[u8; 32]> {
        self.coordinates().map(|(x, _)| x)
    }

    /// Affine y coordinate, None at infinity
    pub fn y(&self) -> Option<[u8; 32]> {
        self.coordinates().map(|(_, y)| y)
    }

    pub fn coordinates(&self) -> Option<([u8; 32], [u8; 32])> {
        match self {
            Point::Infinity => None,
            Point::Affine(p) => {
                let bytes = p.serialize_uncompressed();
                let mut x = [0u8; 32];
                let mut y = [0u8; 32];
                x.copy_from_slice(&bytes[1..33]);
                y.copy_from_slice(&bytes[33..65]);
                Some((x, y))
            }
        }
    }
}

/**
    k·G. Zero yields the point at infinity, which callers must reject as a key.
*/
pub fn scalar_base_mult(k: &Scalar) -> Point {
    match k.secret_key() {
        Some(sk) => Point::Affine(SecpPublicKey::from_secret_key(&Secp256k1::new(), &sk)),
        None => Point::Infinity
    }
}

/**
    k·P
*/
pub fn scalar_mult(p: &Point, k: &Scalar) -> Point {
    match (p, k.secret_key()) {
        (Point::Affine(p), Some(sk)) => match p.mul_tweak(&Secp256k1::new(), &Tweak::from(sk)) {
            Ok(q) => Point::Affine(q),
            Err(_) => Point::Infinity
        },
        _ => Point::Infinity
    }
}

/**
    a + b
*/
pub fn point_add(a: &Point, b: &Point) -> Point {
    match (a, b) {
        (Point::Infinity, _) => *b,
        (_, Point::Infinity) => *a,
        (Point::Affine(a), Point::Affine(b)) => match a.combine(b) {
            Ok(sum) => Point::Affine(sum),
            //a = -b
            Err(_) => Point::Infinity
        }
    }
}

/**
    Checks that (x, y) is a finite point on y^2 = x^3 + 7 over F_p
    with both coordinates in [0, p).
*/
pub fn point_validate(x: &[u8; 32], y: &[u8; 32]) -> bool {
    if *x >= FIELD_PRIME || *y >= FIELD_PRIME { return false }
    SecpPublicKey::from_slice(&uncompressed(x, y)).is_ok()
}

/**
    Reduces a 32 byte big-endian integer modulo n.
*/
pub fn mod_n(bytes: &[u8; 32]) -> Scalar {
    Scalar::reduce(bytes)
}

fn uncompressed(x: &[u8; 32], y: &[u8; 32]) -> [u8; 65] {
    let mut bytes = [0u8; 65];
    bytes[0] = 0x04;
    bytes[1..33].copy_from_slice(x);
    bytes[33..65].copy_from_slice(y);
    bytes
}

//a - b for big-endian integers with a >= b
fn sub_be(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut borrow = 0i16;
    for i in (0..32).rev() {
        let mut diff = a[i] as i16 - b[i] as i16 - borrow;
        borrow = 0;
        if diff < 0 {
            diff += 256;
            borrow = 1;
        }
        out[i] = diff as u8;
    }
    out
}
