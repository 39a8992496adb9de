/*
    Library of Bitcoin SV key and transaction primitives.

    Covers secp256k1 key handling with BRC-42 child key derivation,
    deterministic RFC6979 ECDSA signing, Bitcoin script operations with
    pluggable locking/unlocking templates and canonical transaction outpoints.

    References:
        - SEC 1 and SEC 2 (https://www.secg.org/)
            curve parameters and public key encodings

        - RFC6979 (https://www.rfc-editor.org/rfc/rfc6979)
            deterministic nonces, built on the NIST SP 800-90A HMAC-DRBG

        - BRC-42 (https://brc.dev/42)
            key derivation through ECDH and an invoice number

        - BIP-62 (https://github.com/bitcoin/bips/blob/master/bip-0062.mediawiki)
            low-s signature normalization
*/

//Outward facing modules
pub mod curve;
pub mod drbg;
pub mod key;
pub mod ecdsa;
pub mod script;
pub mod outpoint;
pub mod prelude;

//Modules for internal use
mod hash;
mod entropy;
pub mod util;
mod impls;

//Dependencies
use secp256k1::{PublicKey as SecpPublicKey, Secp256k1, SecretKey};
use secp256k1::Scalar as Tweak;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Digest};
use ripemd::Ripemd160;
