use rand::{rngs::OsRng, CryptoRng, RngCore};
use log::debug;

/**
    Fills the buffer from the given cryptographic RNG.

    Failures of the underlying source are surfaced, never retried.
*/
pub fn fill_random<R>(rng: &mut R, bytes: &mut [u8]) -> Result<(), rand::Error>
where R: RngCore + CryptoRng + ?Sized
{
    rng.try_fill_bytes(bytes).map_err(|e| {
        debug!("entropy source failed: {}", e);
        e
    })
}

/**
    Returns the operating system entropy source
*/
pub fn os_rng() -> OsRng {
    OsRng
}
