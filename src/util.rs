/*
    Small byte helpers shared by the key, script and outpoint modules.
*/

/**
    Decodes a hex string into a fixed size array.
    Returns None for malformed hex or a length other than N bytes.
*/
pub fn decode_array<const N: usize>(hex_str: &str) -> Option<[u8; N]> {
    let mut out = [0u8; N];
    hex::decode_to_slice(hex_str, &mut out).ok()?;
    Some(out)
}

/**
    Returns a copy of the array with the byte order reversed.

    Transaction ids are displayed in the reverse of their internal order.
*/
pub fn reversed<const N: usize>(bytes: &[u8; N]) -> [u8; N] {
    let mut out = *bytes;
    out.reverse();
    out
}
