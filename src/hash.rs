/*
    Hash module includes the hash functions needed to turn a
    public key into a public key hash and the HMAC used by the
    DRBG and by BRC-42 key derivation.
*/

use crate::{
    Ripemd160, Sha256, Digest, Hmac, Mac
};

type HmacSha256 = Hmac<Sha256>;

/*
    Takes in a byte array and returns the sha256 hash of it
*/
pub fn sha256<T>(input: T) -> [u8; 32]
where T: AsRef<[u8]>
{
    let mut r = Sha256::new();
    r.update(input);
    let mut out = [0u8; 32];
    out.copy_from_slice(&r.finalize());
    out
}

/*
    Takes in a byte array and returns the ripemd160 hash of it
*/
pub fn ripemd160<T>(input: T) -> [u8; 20]
where T: AsRef<[u8]>
{
    let mut r = Ripemd160::new();
    r.update(input);
    let mut out = [0u8; 20];
    out.copy_from_slice(&r.finalize());
    out
}

/**
    RIPEMD160(SHA256(input)), the hash committed to by P2PKH outputs.
*/
pub fn hash160<T>(input: T) -> [u8; 20]
where T: AsRef<[u8]>
{
    ripemd160(sha256(input))
}

/**
    HMAC-SHA256 of the concatenation of `data` under `key`.
*/
pub fn hmac_sha256(key: &[u8], data: &[&[u8]]) -> [u8; 32] {
    //HMAC is defined for keys of any length
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key).expect("HMAC accepts any key length");
    for part in data {
        mac.update(part);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}
