/*
    Transaction outpoints.

    In memory an outpoint is 36 bytes: the txid in internal (reversed) byte
    order followed by the output index as a little-endian u32.

    Two other forms exist at the boundaries:
        - string:  <txid in display order as hex>_<vout in decimal>
        - storage: txid in display order followed by the vout as a big-endian
                   u32, so that outputs of one transaction sort together and
                   in index order inside ordered key-value stores.

    The storage form is NOT the in-memory form. Never write as_bytes() to a store.
*/

use crate::util::{decode_array, reversed};
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

pub const OUTPOINT_LEN: usize = 36;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OutpointError {
    #[error("invalid-outpoint: expected {} bytes, found {0}", OUTPOINT_LEN)]
    InvalidOutpoint(usize),
    #[error("invalid-string: {0}")]
    InvalidString(String)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Outpoint([u8; OUTPOINT_LEN]);

impl Outpoint {
    /**
        Creates an outpoint from a txid in display order and an output index.
    */
    pub fn new(txid: &[u8; 32], vout: u32) -> Self {
        let mut bytes = [0u8; OUTPOINT_LEN];
        bytes[..32].copy_from_slice(&reversed(txid));
        bytes[32..].copy_from_slice(&vout.to_le_bytes());
        Self(bytes)
    }

    /**
        Wraps the 36 byte in-memory form.
    */
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, OutpointError> {
        let bytes: [u8; OUTPOINT_LEN] = bytes
            .try_into()
            .map_err(|_| OutpointError::InvalidOutpoint(bytes.len()))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; OUTPOINT_LEN] {
        &self.0
    }

    /// Txid in display order
    pub fn txid(&self) -> [u8; 32] {
        let mut internal = [0u8; 32];
        internal.copy_from_slice(&self.0[..32]);
        reversed(&internal)
    }

    pub fn txid_hex(&self) -> String {
        hex::encode(self.txid())
    }

    pub fn vout(&self) -> u32 {
        let mut vout = [0u8; 4];
        vout.copy_from_slice(&self.0[32..]);
        u32::from_le_bytes(vout)
    }

    /**
        Display order txid followed by a big-endian vout.
    */
    pub fn to_storage(&self) -> [u8; OUTPOINT_LEN] {
        let mut out = [0u8; OUTPOINT_LEN];
        out[..32].copy_from_slice(&self.txid());
        out[32..].copy_from_slice(&self.vout().to_be_bytes());
        out
    }

    /**
        Inverse of to_storage().
    */
    pub fn from_storage(bytes: &[u8]) -> Result<Self, OutpointError> {
        if bytes.len() != OUTPOINT_LEN {
            return Err(OutpointError::InvalidOutpoint(bytes.len()))
        }
        let mut txid = [0u8; 32];
        let mut vout = [0u8; 4];
        txid.copy_from_slice(&bytes[..32]);
        vout.copy_from_slice(&bytes[32..]);
        Ok(Self::new(&txid, u32::from_be_bytes(vout)))
    }

    /**
        The JSON value of a raw in-memory byte string: an outpoint when it is
        exactly 36 bytes, otherwise None (serialized as null).
    */
    pub fn json_from_bytes(bytes: &[u8]) -> Option<Self> {
        Self::from_bytes(bytes).ok()
    }
}

impl FromStr for Outpoint {
    type Err = OutpointError;

    /**
        Parses `<64 hex chars>_<decimal vout>`.
    */
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || OutpointError::InvalidString(s.to_string());
        if s.len() < 66 || s.as_bytes()[64] != b'_' {
            return Err(invalid())
        }

        let txid: [u8; 32] = s.get(..64)
            .and_then(decode_array)
            .ok_or_else(invalid)?;
        //Plain decimal only: no sign and no leading zeros
        let vout = &s[65..];
        if !vout.bytes().all(|b| b.is_ascii_digit()) || (vout.len() > 1 && vout.starts_with('0')) {
            return Err(invalid())
        }
        let vout = vout.parse::<u32>().map_err(|_| invalid())?;
        Ok(Self::new(&txid, vout))
    }
}

impl TryFrom<&[u8]> for Outpoint {
    type Error = OutpointError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

#[cfg(feature = "serde")]
impl Serialize for Outpoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Outpoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const OUTPOINT_STR: &str = "11b476ad8e0a48fcd40807a111a050af51114877e09283bfa7f3505081a1819d_0";
    const TXID_HEX: &str = "11b476ad8e0a48fcd40807a111a050af51114877e09283bfa7f3505081a1819d";

    #[test]
    fn parse_string() {
        let outpoint: Outpoint = OUTPOINT_STR.parse().unwrap();
        assert_eq!(outpoint.vout(), 0);
        assert_eq!(outpoint.txid_hex(), TXID_HEX);

        let mut internal = hex::decode(TXID_HEX).unwrap();
        internal.reverse();
        assert_eq!(&outpoint.as_bytes()[..32], internal.as_slice());
        assert_eq!(outpoint.to_string(), OUTPOINT_STR);

        let max: Outpoint = format!("{}_4294967295", TXID_HEX).parse().unwrap();
        assert_eq!(max.vout(), u32::MAX);
    }

    #[test]
    fn both_byte_orders_are_pinned() {
        let outpoint: Outpoint = format!("{}_258", TXID_HEX).parse().unwrap();

        let mut internal = hex::decode(TXID_HEX).unwrap();
        internal.reverse();
        internal.extend_from_slice(&[0x02, 0x01, 0x00, 0x00]);
        assert_eq!(outpoint.as_bytes().to_vec(), internal);

        let mut storage = hex::decode(TXID_HEX).unwrap();
        storage.extend_from_slice(&[0x00, 0x00, 0x01, 0x02]);
        assert_eq!(outpoint.to_storage().to_vec(), storage);

        assert_eq!(Outpoint::from_storage(&storage).unwrap(), outpoint);
        assert_eq!(Outpoint::from_bytes(&internal).unwrap(), outpoint);
    }

    #[test]
    fn storage_order_groups_by_txid() {
        let a = Outpoint::new(&[1u8; 32], 256);
        let b = Outpoint::new(&[1u8; 32], 1);
        assert!(b.to_storage() < a.to_storage());
    }

    #[test]
    fn invalid_strings() {
        let cases = [
            "",
            "11b476ad_0",
            "11b476ad8e0a48fcd40807a111a050af51114877e09283bfa7f3505081a1819d_",
            "11b476ad8e0a48fcd40807a111a050af51114877e09283bfa7f3505081a1819d:0",
            "zzb476ad8e0a48fcd40807a111a050af51114877e09283bfa7f3505081a1819d_0",
            "11b476ad8e0a48fcd40807a111a050af51114877e09283bfa7f3505081a1819d_x",
            "11b476ad8e0a48fcd40807a111a050af51114877e09283bfa7f3505081a1819d_4294967296",
            "11b476ad8e0a48fcd40807a111a050af51114877e09283bfa7f3505081a1819d_+5",
            "11b476ad8e0a48fcd40807a111a050af51114877e09283bfa7f3505081a1819d_007",
            "11b476ad8e0a48fcd40807a111a050af51114877e09283bfa7f3505081a1819d_-1",
            "11b476ad8e0a48fcd40807a111a050af51114877e09283bfa7f3505081a1819d_ 5",
            "11b476ad8e0a48fcd40807a111a050af51114877e09283bfa7f3505081a1819é_0"
        ];
        for case in cases {
            assert_eq!(case.parse::<Outpoint>(), Err(OutpointError::InvalidString(case.to_string())), "{}", case);
        }
    }

    #[test]
    fn invalid_lengths() {
        assert_eq!(Outpoint::from_storage(&[0u8; 35]), Err(OutpointError::InvalidOutpoint(35)));
        assert_eq!(Outpoint::from_bytes(&[0u8; 37]), Err(OutpointError::InvalidOutpoint(37)));
        assert_eq!(
            OutpointError::InvalidOutpoint(35).to_string(),
            "invalid-outpoint: expected 36 bytes, found 35"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_form() {
        let outpoint: Outpoint = OUTPOINT_STR.parse().unwrap();
        let json = serde_json::to_string(&outpoint).unwrap();
        assert_eq!(json, format!("\"{}\"", OUTPOINT_STR));
        assert_eq!(serde_json::from_str::<Outpoint>(&json).unwrap(), outpoint);

        let raw = outpoint.as_bytes();
        assert_eq!(serde_json::to_string(&Outpoint::json_from_bytes(raw)).unwrap(), json);
        assert_eq!(serde_json::to_string(&Outpoint::json_from_bytes(&raw[..35])).unwrap(), "null");
        assert!(serde_json::from_str::<Outpoint>("\"00_1\"").is_err());
    }

    proptest! {
        #[test]
        fn string_and_storage_round_trip(txid in any::<[u8; 32]>(), vout in any::<u32>()) {
            let outpoint = Outpoint::new(&txid, vout);
            prop_assert_eq!(outpoint.txid(), txid);
            prop_assert_eq!(outpoint.vout(), vout);
            prop_assert_eq!(outpoint.to_string().parse::<Outpoint>().unwrap(), outpoint);
            prop_assert_eq!(Outpoint::from_storage(&outpoint.to_storage()).unwrap(), outpoint);
        }
    }
}
