/*
    HMAC-DRBG with SHA-256 as specified in NIST SP 800-90A section 10.1.2.

    Used as the RFC6979 nonce generator. Reseeding is not tracked against an
    interval; callers that need fresh entropy construct a new instance.
*/

use crate::hash::hmac_sha256;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// max_number_of_bits_per_request (2^19) in bytes
pub const MAX_BYTES_PER_REQUEST: usize = 1 << 16;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DrbgError {
    #[error("drbg: requested {0} bytes, at most {} allowed per request", MAX_BYTES_PER_REQUEST)]
    RequestTooLarge(usize)
}

/**
    Working state (K, V, reseed_counter). K and V are wiped on drop.
*/
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct HmacDrbg {
    k: [u8; 32],
    v: [u8; 32],
    reseed_counter: u64
}

impl HmacDrbg {
    /**
        Instantiates the generator from entropy input, a nonce and an
        optional personalization string.
    */
    pub fn new(entropy: &[u8], nonce: &[u8], personalization: Option<&[u8]>) -> Self {
        let mut drbg = Self {
            k: [0x00; 32],
            v: [0x01; 32],
            reseed_counter: 1
        };
        drbg.update(&[entropy, nonce, personalization.unwrap_or(&[])]);
        drbg
    }

    /**
        Generates `len` pseudorandom bytes, mixing in optional additional input.
    */
    pub fn generate(&mut self, len: usize, additional: Option<&[u8]>) -> Result<Vec<u8>, DrbgError> {
        let mut out = vec![0u8; len];
        self.fill_bytes(&mut out, additional)?;
        Ok(out)
    }

    /**
        Same as generate() but writes into a caller owned buffer.
    */
    pub fn fill_bytes(&mut self, out: &mut [u8], additional: Option<&[u8]>) -> Result<(), DrbgError> {
        if out.len() > MAX_BYTES_PER_REQUEST {
            return Err(DrbgError::RequestTooLarge(out.len()))
        }

        let additional = additional.unwrap_or(&[]);
        if !additional.is_empty() {
            self.update(&[additional]);
        }

        for chunk in out.chunks_mut(32) {
            self.v = hmac_sha256(&self.k, &[&self.v[..]]);
            chunk.copy_from_slice(&self.v[..chunk.len()]);
        }

        self.update(&[additional]);
        self.reseed_counter += 1;
        Ok(())
    }

    /// Number of generate calls since instantiation, starting at 1
    pub fn reseed_counter(&self) -> u64 {
        self.reseed_counter
    }

    //HMAC_DRBG_Update; `provided` is the concatenation of its parts
    fn update(&mut self, provided: &[&[u8]]) {
        self.round(0x00, provided);
        if provided.iter().any(|part| !part.is_empty()) {
            self.round(0x01, provided);
        }
    }

    //K = HMAC(K, V || separator || provided), V = HMAC(K, V)
    fn round(&mut self, separator: u8, provided: &[&[u8]]) {
        let separator = [separator];
        let mut input: Vec<&[u8]> = Vec::with_capacity(provided.len() + 2);
        input.push(&self.v);
        input.push(&separator);
        input.extend_from_slice(provided);

        let k = hmac_sha256(&self.k, &input);
        self.k = k;
        self.v = hmac_sha256(&self.k, &[&self.v[..]]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const VECTORS: &str = include_str!("test_vectors/hmac_drbg.json");

    fn bytes(value: &Value) -> Vec<u8> {
        match value.as_str() {
            Some(s) => hex::decode(s).unwrap(),
            None => vec![]
        }
    }

    #[test]
    fn vector_file() {
        let vectors: Value = serde_json::from_str(VECTORS).unwrap();
        let vectors = vectors.as_array().unwrap();
        assert!(!vectors.is_empty());

        for vector in vectors {
            let name = vector["name"].as_str().unwrap();
            let pers = bytes(&vector["pers"]);
            let expected = bytes(&vector["expected"]);
            let mut drbg = HmacDrbg::new(
                &bytes(&vector["entropy"]),
                &bytes(&vector["nonce"]),
                if pers.is_empty() { None } else { Some(pers.as_slice()) }
            );

            let mut last = vec![];
            for add in vector["add"].as_array().unwrap() {
                let add = bytes(add);
                last = drbg.generate(expected.len(), if add.is_empty() { None } else { Some(add.as_slice()) }).unwrap();
            }
            assert_eq!(hex::encode(&last), hex::encode(&expected), "vector {}", name);
        }
    }

    #[test]
    fn partial_blocks() {
        let mut a = HmacDrbg::new(&[7u8; 32], &[9u8; 16], None);
        let mut b = HmacDrbg::new(&[7u8; 32], &[9u8; 16], None);
        let short = a.generate(20, None).unwrap();
        let long = b.generate(32, None).unwrap();
        assert_eq!(short[..], long[..20]);
        assert_eq!(a.reseed_counter(), 2);
    }

    #[test]
    fn request_limit() {
        let mut drbg = HmacDrbg::new(&[7u8; 32], &[9u8; 16], None);
        assert_eq!(
            drbg.generate(MAX_BYTES_PER_REQUEST + 1, None),
            Err(DrbgError::RequestTooLarge(MAX_BYTES_PER_REQUEST + 1))
        );
        assert_eq!(drbg.generate(MAX_BYTES_PER_REQUEST, None).unwrap().len(), MAX_BYTES_PER_REQUEST);
    }
}
