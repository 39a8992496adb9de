/*
    Deterministic ECDSA over secp256k1.

    Nonces are generated as described in RFC6979 section 3.2: an HMAC-DRBG
    seeded with the private key and the reduced message digest, drawn until a
    candidate k in [1, n-1] gives non-zero r and s. Signatures are always
    normalized to low-s (BIP-62) and DER encoded on the wire.
*/

use crate::{
    curve::{self, Scalar},
    drbg::{DrbgError, HmacDrbg},
    key::{PrivateKey, PublicKey}
};
use log::trace;
use thiserror::Error;
use zeroize::Zeroize;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("invalid-scalar: {0}")]
    InvalidScalar(String),
    #[error("bad-encoding: {0}")]
    BadEncoding(String),
    #[error(transparent)]
    Drbg(#[from] DrbgError)
}

/**
    An ECDSA signature (r, s) with both components in [1, n-1].
*/
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    r: Scalar,
    s: Scalar
}

impl Signature {
    /**
        Builds a signature from big-endian r and s.
    */
    pub fn from_scalars(r: &[u8; 32], s: &[u8; 32]) -> Result<Self, SignatureError> {
        Ok(Self {
            r: component(r, "r")?,
            s: component(s, "s")?
        })
    }

    /**
        Parses a strict DER signature:
        0x30 len 0x02 lenR R 0x02 lenS S
    */
    pub fn from_der(der: &[u8]) -> Result<Self, SignatureError> {
        if der.len() < 8 || der[0] != 0x30 {
            return Err(bad_der("missing sequence header"))
        }
        if der[1] as usize != der.len() - 2 {
            return Err(bad_der("sequence length does not match"))
        }

        let mut pos = 2;
        let r = read_der_integer(der, &mut pos, "r")?;
        let s = read_der_integer(der, &mut pos, "s")?;
        if pos != der.len() {
            return Err(bad_der("trailing bytes after s"))
        }

        Self::from_scalars(&r, &s)
    }

    /**
        Serializes into DER with minimal positive integers.
    */
    pub fn to_der(&self) -> Vec<u8> {
        let r = der_integer(&self.r.to_bytes());
        let s = der_integer(&self.s.to_bytes());

        let mut der = Vec::with_capacity(6 + r.len() + s.len());
        der.push(0x30);
        der.push((4 + r.len() + s.len()) as u8);
        der.push(0x02);
        der.push(r.len() as u8);
        der.extend_from_slice(&r);
        der.push(0x02);
        der.push(s.len() as u8);
        der.extend_from_slice(&s);
        der
    }

    /**
        Parses 64 bytes r || s
    */
    pub fn from_compact(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != 64 {
            return Err(SignatureError::BadEncoding(format!("compact signature must be 64 bytes, found {}", bytes.len())))
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        Self::from_scalars(&r, &s)
    }

    pub fn to_compact(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.r.to_bytes());
        out[32..].copy_from_slice(&self.s.to_bytes());
        out
    }

    pub fn r(&self) -> [u8; 32] {
        self.r.to_bytes()
    }

    pub fn s(&self) -> [u8; 32] {
        self.s.to_bytes()
    }

    /// s <= n / 2
    pub fn is_low_s(&self) -> bool {
        !self.s.is_high()
    }

    /**
        Returns the low-s form of the signature (BIP-62).
    */
    pub fn normalize_s(&self) -> Signature {
        if self.s.is_high() {
            Signature { r: self.r, s: self.s.negate() }
        } else {
            *self
        }
    }
}

/**
    Signs a 32 byte digest with RFC6979 nonces. The result is always low-s.
*/
#[allow(clippy::many_single_char_names)]
pub fn sign(key: &PrivateKey, hash: &[u8; 32]) -> Result<Signature, SignatureError> {
    let d = key.scalar();
    let z = curve::mod_n(hash);

    let mut secret = d.to_bytes();
    let mut drbg = HmacDrbg::new(&secret, &z.to_bytes(), None);
    secret.zeroize();

    let mut candidate = [0u8; 32];
    loop {
        drbg.fill_bytes(&mut candidate, None)?;

        let k = match Scalar::from_bytes(&candidate) {
            Some(k) if !k.is_zero() => k,
            _ => {
                trace!("nonce candidate out of range, drawing again");
                continue
            }
        };

        // R = k·G, r = R.x mod n
        let r = match curve::scalar_base_mult(&k).x() {
            Some(x) => curve::mod_n(&x),
            None => continue
        };
        if r.is_zero() {
            trace!("nonce gives r = 0, drawing again");
            continue
        }

        // s = k^-1 (z + r·d)
        let k_inverse = match k.invert() {
            Some(k_inverse) => k_inverse,
            None => continue
        };
        let s = k_inverse.mul(&z.add(&r.mul(d)));
        if s.is_zero() {
            trace!("nonce gives s = 0, drawing again");
            continue
        }

        candidate.zeroize();
        return Ok(Signature { r, s }.normalize_s())
    }
}

/**
    Standard ECDSA verification of a signature over a 32 byte digest.
    Accepts high-s signatures.
*/
pub fn verify(signature: &Signature, hash: &[u8; 32], public_key: &PublicKey) -> bool {
    let (r, s) = (signature.r, signature.s);
    if r.is_zero() || s.is_zero() { return false }

    let w = match s.invert() {
        Some(w) => w,
        None => return false
    };
    let z = curve::mod_n(hash);
    let u1 = z.mul(&w);
    let u2 = r.mul(&w);

    let point = curve::point_add(
        &curve::scalar_base_mult(&u1),
        &curve::scalar_mult(&public_key.point(), &u2)
    );
    match point.x() {
        Some(x) => curve::mod_n(&x) == r,
        None => false
    }
}

fn component(bytes: &[u8; 32], name: &str) -> Result<Scalar, SignatureError> {
    match Scalar::from_bytes(bytes) {
        Some(scalar) if !scalar.is_zero() => Ok(scalar),
        _ => Err(SignatureError::InvalidScalar(format!("signature {} is not in [1, n-1]", name)))
    }
}

fn bad_der(reason: &str) -> SignatureError {
    SignatureError::BadEncoding(format!("malformed DER signature: {}", reason))
}

//Reads one INTEGER, returned as 32 big-endian bytes
fn read_der_integer(der: &[u8], pos: &mut usize, name: &str) -> Result<[u8; 32], SignatureError> {
    if der.len() < *pos + 2 || der[*pos] != 0x02 {
        return Err(bad_der(&format!("missing integer tag for {}", name)))
    }
    let len = der[*pos + 1] as usize;
    let start = *pos + 2;
    if len == 0 || der.len() < start + len {
        return Err(bad_der(&format!("bad length for {}", name)))
    }

    let value = &der[start..start + len];
    if value[0] & 0x80 != 0 {
        return Err(bad_der(&format!("{} is negative", name)))
    }
    if len > 1 && value[0] == 0x00 && value[1] & 0x80 == 0 {
        return Err(bad_der(&format!("{} has excess padding", name)))
    }

    let value = if value[0] == 0x00 { &value[1..] } else { value };
    if value.len() > 32 {
        return Err(SignatureError::InvalidScalar(format!("signature {} is wider than 32 bytes", name)))
    }

    let mut out = [0u8; 32];
    out[32 - value.len()..].copy_from_slice(value);
    *pos = start + len;
    Ok(out)
}

//Shortest big-endian positive integer
fn der_integer(bytes: &[u8; 32]) -> Vec<u8> {
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(31);
    let mut out = Vec::with_capacity(33);
    if bytes[first] & 0x80 != 0 {
        out.push(0x00);
    }
    out.extend_from_slice(&bytes[first..]);
    out
}
