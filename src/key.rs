/*
    Private and public keys on secp256k1.

    A private key is a scalar in [1, n-1] kept together with its public key.
    Public keys are finite curve points encoded as SEC1 compressed (33 bytes)
    or uncompressed (65 bytes) byte strings.

    Child keys are derived under BRC-42:
        S     = d_self · P_counterparty
        h     = HMAC-SHA256(key = compressed(S), msg = invoice number)
        child = d + h (private) or P + h·G (public)
*/

use crate::{
    curve::{self, Point, Scalar},
    ecdsa::{self, Signature, SignatureError},
    entropy,
    hash,
    util::decode_array,
    SecpPublicKey
};
use log::debug;
use rand::{CryptoRng, RngCore};
use thiserror::Error;
use zeroize::Zeroize;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid-scalar: {0}")]
    InvalidScalar(String),
    #[error("not-on-curve: {0}")]
    NotOnCurve(String),
    #[error("bad-encoding: {0}")]
    BadEncoding(String),
    #[error("rng-failure: {0}")]
    RngFailure(String),
    #[error("derivation-failure: {0}")]
    DerivationFailure(String)
}

#[derive(Clone)]
pub struct PrivateKey {
    scalar: Scalar,
    public_key: PublicKey
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(SecpPublicKey);

impl PrivateKey {
    /**
        Generates a new key from the operating system entropy source.
    */
    pub fn new() -> Result<Self, KeyError> {
        Self::new_with_rng(&mut entropy::os_rng())
    }

    /**
        Generates a new key from the given RNG.
        Candidates outside [1, n-1] are discarded and redrawn.
    */
    pub fn new_with_rng<R>(rng: &mut R) -> Result<Self, KeyError>
    where R: RngCore + CryptoRng + ?Sized
    {
        let mut bytes = [0u8; 32];
        loop {
            entropy::fill_random(rng, &mut bytes)
                .map_err(|e| KeyError::RngFailure(e.to_string()))?;

            if let Ok(key) = Self::from_bytes(&bytes) {
                bytes.zeroize();
                return Ok(key)
            }
        }
    }

    /**
        Use a 32 byte big-endian scalar as the private key.
    */
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != 32 {
            return Err(KeyError::BadEncoding(format!("private key must be 32 bytes, found {}", bytes.len())))
        }
        let mut raw = [0u8; 32];
        raw.copy_from_slice(bytes);
        let scalar = Scalar::from_bytes(&raw);
        raw.zeroize();

        match scalar {
            Some(scalar) if !scalar.is_zero() => Self::from_scalar(scalar),
            Some(_) => Err(KeyError::InvalidScalar("private key is zero".to_string())),
            None => Err(KeyError::InvalidScalar("private key is not below the curve order".to_string()))
        }
    }

    /**
        Parses a private key from 64 hex characters.
    */
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        if hex_str.len() != 64 {
            return Err(KeyError::BadEncoding(format!("private key hex must be 64 characters, found {}", hex_str.len())))
        }
        let mut bytes: [u8; 32] = decode_array(hex_str)
            .ok_or_else(|| KeyError::BadEncoding("private key is not valid hex".to_string()))?;
        let key = Self::from_bytes(&bytes);
        bytes.zeroize();
        key
    }

    //d must be non-zero
    fn from_scalar(scalar: Scalar) -> Result<Self, KeyError> {
        let public_key = PublicKey::from_point(&curve::scalar_base_mult(&scalar))?;
        Ok(Self { scalar, public_key })
    }

    /**
        Serializes the private key into 32 big-endian bytes.
    */
    pub fn to_bytes(&self) -> [u8; 32] {
        self.scalar.to_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /**
        The public key d·G
    */
    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    pub(crate) fn scalar(&self) -> &Scalar {
        &self.scalar
    }

    /**
        x coordinate of d·P, identical for both parties of the exchange.
    */
    pub fn shared_secret(&self, other: &PublicKey) -> Result<[u8; 32], KeyError> {
        self.shared_point(other)?
            .point()
            .x()
            .ok_or_else(|| KeyError::DerivationFailure("shared point is at infinity".to_string()))
    }

    /**
        The ECDH point d·P
    */
    pub fn shared_point(&self, other: &PublicKey) -> Result<PublicKey, KeyError> {
        PublicKey::from_point(&curve::scalar_mult(&other.point(), &self.scalar))
    }

    /**
        Derives the BRC-42 child private key for the given counterparty and invoice number.

        The counterparty derives the matching public key with PublicKey::derive_child().
    */
    pub fn derive_child(&self, counterparty: &PublicKey, invoice_number: &str) -> Result<PrivateKey, KeyError> {
        debug!("deriving child private key, invoice number of {} bytes", invoice_number.len());
        let shared = self.shared_point(counterparty)?;
        let h = invoice_scalar(&shared, invoice_number);

        let child = self.scalar.add(&h);
        if child.is_zero() {
            return Err(KeyError::DerivationFailure("child private key is zero".to_string()))
        }
        Self::from_scalar(child)
    }

    /**
        Signs a 32 byte message digest with RFC6979 deterministic ECDSA.
    */
    pub fn sign(&self, hash: &[u8; 32]) -> Result<Signature, SignatureError> {
        ecdsa::sign(self, hash)
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.scalar.zeroize();
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.scalar == other.scalar
    }
}

impl Eq for PrivateKey {}

impl PublicKey {
    /**
        Parses a SEC1 encoded public key, compressed (02/03 || X) or
        uncompressed (04 || X || Y).
    */
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        match (bytes.len(), bytes.first()) {
            (33, Some(0x02)) | (33, Some(0x03)) | (65, Some(0x04)) => {},
            (33, Some(tag)) | (65, Some(tag)) => {
                return Err(KeyError::BadEncoding(format!("unexpected public key tag 0x{:02x}", tag)))
            },
            (len, _) => {
                return Err(KeyError::BadEncoding(format!("public key must be 33 or 65 bytes, found {}", len)))
            }
        }

        SecpPublicKey::from_slice(bytes)
            .map(Self)
            .map_err(|_| KeyError::NotOnCurve("public key point fails the curve equation".to_string()))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| KeyError::BadEncoding(format!("public key hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /**
        Wraps a curve point, rejecting the point at infinity.
    */
    pub fn from_point(point: &Point) -> Result<Self, KeyError> {
        match point {
            Point::Affine(p) => Ok(Self(*p)),
            Point::Infinity => Err(KeyError::NotOnCurve("point at infinity is not a public key".to_string()))
        }
    }

    pub fn point(&self) -> Point {
        Point::Affine(self.0)
    }

    /**
        SEC1 encoding, 33 bytes when compressed and 65 bytes otherwise.
    */
    pub fn encode(&self, compressed: bool) -> Vec<u8> {
        if compressed {
            self.to_compressed().to_vec()
        } else {
            self.to_uncompressed().to_vec()
        }
    }

    pub fn to_compressed(&self) -> [u8; 33] {
        self.0.serialize()
    }

    pub fn to_uncompressed(&self) -> [u8; 65] {
        self.0.serialize_uncompressed()
    }

    /// Compressed encoding as hex
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_compressed())
    }

    /**
        HASH160 of the compressed encoding, as committed to by P2PKH.
    */
    pub fn hash160(&self) -> [u8; 20] {
        hash::hash160(self.to_compressed())
    }

    /**
        Derives the BRC-42 child public key of self, the recipient, as seen
        by the holder of `counterparty`.
    */
    pub fn derive_child(&self, counterparty: &PrivateKey, invoice_number: &str) -> Result<PublicKey, KeyError> {
        debug!("deriving child public key, invoice number of {} bytes", invoice_number.len());
        let shared = counterparty.shared_point(self)?;
        let h = invoice_scalar(&shared, invoice_number);

        let child = curve::point_add(&self.point(), &curve::scalar_base_mult(&h));
        PublicKey::from_point(&child)
            .map_err(|_| KeyError::DerivationFailure("child public key is at infinity".to_string()))
    }

    /**
        Verifies an ECDSA signature over a 32 byte message digest.
    */
    pub fn verify(&self, hash: &[u8; 32], signature: &Signature) -> bool {
        ecdsa::verify(signature, hash, self)
    }
}

/**
    x coordinate of d_a · P_b
*/
pub fn shared_secret(private_key: &PrivateKey, public_key: &PublicKey) -> Result<[u8; 32], KeyError> {
    private_key.shared_secret(public_key)
}

//HMAC-SHA256 keyed with the compressed shared point over the invoice number, reduced mod n
fn invoice_scalar(shared: &PublicKey, invoice_number: &str) -> Scalar {
    let mut h = hash::hmac_sha256(&shared.to_compressed(), &[invoice_number.as_bytes()]);
    let scalar = curve::mod_n(&h);
    h.zeroize();
    scalar
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    const TEST_PRIV_KEY_HEX: &str = "eaf02ca348c524e6392655ba4d29603cd1a7347d9d65cfe93ce1ebffdca22694";
    const TEST_PUB_KEY_HEX: &str = "025ceeba2ab4a635df2c0301a3d773da06ac5a18a7c3e0d09a795d7e57d233edf1";

    //BRC-42 private key derivation vector
    const BRC42_SENDER_PUB: &str = "033f9160df035156f1c48e75eae99914fa1a1546bec19781e8eddb900200bff9d1";
    const BRC42_RECIPIENT_PRIV: &str = "6a1751169c111b4667a6539ee1be6b7cd9f6e9c8fe011a5f2fe31e03a15e0ede";
    const BRC42_INVOICE: &str = "f3WCaUmnN9U=";
    const BRC42_CHILD_PRIV: &str = "761656715bbfa172f8f9f58f5af95d9d0dfd69014cfdcacc9a245a10ff8893ef";

    #[test]
    fn private_key_round_trip() {
        let bytes = hex::decode(TEST_PRIV_KEY_HEX).unwrap();
        let key = PrivateKey::from_bytes(&bytes).unwrap();
        assert_eq!(key.to_bytes().to_vec(), bytes);
        assert_eq!(key.to_hex(), TEST_PRIV_KEY_HEX);
        assert_eq!(key.public_key().to_hex(), TEST_PUB_KEY_HEX);

        let uncompressed = key.public_key().encode(false);
        assert_eq!(uncompressed.len(), 65);
        let decoded = PublicKey::from_bytes(&uncompressed).unwrap();
        assert_eq!(decoded, key.public_key());
        assert_eq!(decoded.point().x(), key.public_key().point().x());
        assert_eq!(decoded.point().y(), key.public_key().point().y());
    }

    #[test]
    fn invalid_private_keys() {
        assert!(matches!(PrivateKey::from_bytes(&[0u8; 32]), Err(KeyError::InvalidScalar(_))));
        assert!(matches!(PrivateKey::from_bytes(&curve::ORDER), Err(KeyError::InvalidScalar(_))));
        assert!(matches!(PrivateKey::from_bytes(&[1u8; 31]), Err(KeyError::BadEncoding(_))));
        assert!(matches!(PrivateKey::from_hex("abc"), Err(KeyError::BadEncoding(_))));
        assert!(matches!(PrivateKey::from_hex(&"zz".repeat(32)), Err(KeyError::BadEncoding(_))));
        assert!(matches!(PrivateKey::from_hex(&"00".repeat(32)), Err(KeyError::InvalidScalar(_))));
    }

    #[test]
    fn invalid_public_keys() {
        let mut bytes = hex::decode(TEST_PUB_KEY_HEX).unwrap();
        bytes[0] = 0x05;
        assert!(matches!(PublicKey::from_bytes(&bytes), Err(KeyError::BadEncoding(_))));
        assert!(matches!(PublicKey::from_bytes(&bytes[..32]), Err(KeyError::BadEncoding(_))));
        assert!(matches!(PublicKey::from_bytes(&[]), Err(KeyError::BadEncoding(_))));

        //Hybrid encodings are not accepted
        let mut hybrid = PrivateKey::from_hex(TEST_PRIV_KEY_HEX).unwrap().public_key().encode(false);
        hybrid[0] = 0x06;
        assert!(matches!(PublicKey::from_bytes(&hybrid), Err(KeyError::BadEncoding(_))));

        //Valid encoding of a point off the curve
        let mut off_curve = PrivateKey::from_hex(TEST_PRIV_KEY_HEX).unwrap().public_key().encode(false);
        off_curve[64] ^= 0x01;
        assert!(matches!(PublicKey::from_bytes(&off_curve), Err(KeyError::NotOnCurve(_))));

        assert!(matches!(PublicKey::from_point(&Point::Infinity), Err(KeyError::NotOnCurve(_))));
    }

    #[test]
    fn brc42_private_derivation_vector() {
        let sender_pub = PublicKey::from_hex(BRC42_SENDER_PUB).unwrap();
        let recipient = PrivateKey::from_hex(BRC42_RECIPIENT_PRIV).unwrap();
        let child = recipient.derive_child(&sender_pub, BRC42_INVOICE).unwrap();
        assert_eq!(child.to_hex(), BRC42_CHILD_PRIV);
    }

    #[test]
    fn brc42_public_derivation_matches_private() {
        let mut rng = StdRng::seed_from_u64(42);
        let sender = PrivateKey::new_with_rng(&mut rng).unwrap();
        let recipient = PrivateKey::new_with_rng(&mut rng).unwrap();

        let child_priv = recipient.derive_child(&sender.public_key(), "invoice 1").unwrap();
        let child_pub = recipient.public_key().derive_child(&sender, "invoice 1").unwrap();
        assert_eq!(child_priv.public_key(), child_pub);

        let other = recipient.derive_child(&sender.public_key(), "invoice 2").unwrap();
        assert_ne!(other, child_priv);
    }

    #[test]
    fn injected_rng_is_deterministic() {
        let a = PrivateKey::new_with_rng(&mut StdRng::seed_from_u64(7)).unwrap();
        let b = PrivateKey::new_with_rng(&mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
        assert!(PrivateKey::new().is_ok());
    }

    #[test]
    fn private_key_debug_hides_scalar() {
        let key = PrivateKey::from_hex(TEST_PRIV_KEY_HEX).unwrap();
        let printed = format!("{:?}", key);
        assert!(!printed.contains(TEST_PRIV_KEY_HEX));
        assert!(printed.contains(TEST_PUB_KEY_HEX));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn public_key_encodings_round_trip(bytes in any::<[u8; 32]>()) {
            let key = PrivateKey::from_bytes(&bytes);
            prop_assume!(key.is_ok());
            let key = key.unwrap();
            prop_assert_eq!(key.to_bytes(), bytes);

            let public_key = key.public_key();
            prop_assert_eq!(PublicKey::from_bytes(&public_key.encode(true)).unwrap(), public_key);
            prop_assert_eq!(PublicKey::from_bytes(&public_key.encode(false)).unwrap(), public_key);
        }

        #[test]
        fn shared_secret_is_symmetric(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
            let (a, b) = (PrivateKey::from_bytes(&a), PrivateKey::from_bytes(&b));
            prop_assume!(a.is_ok() && b.is_ok());
            let (a, b) = (a.unwrap(), b.unwrap());
            prop_assert_eq!(
                shared_secret(&a, &b.public_key()).unwrap(),
                shared_secret(&b, &a.public_key()).unwrap()
            );
        }
    }
}
