/*
    Bitcoin script as a sequence of operations.

    A Script holds the serialized bytes. It can be parsed into ScriptOps,
    assembled back from them, and rendered to or read from ASM text.
*/

pub mod opcode;
pub mod op;
pub mod builder;
pub mod template;

pub use opcode::{Opcode, opcodes};
pub use op::{ScriptOp, read_op, minimal_push_opcode};
pub use builder::Builder;
pub use template::{
    ScriptTemplate,
    SignatureHasher,
    UnlockParams,
    TemplateError,
    P2pkh,
    Multisig
};

use crate::hash;
use opcodes::*;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptErr {
    #[error("data-too-small: ReadOp: {len} {pos}")]
    DataTooSmall { len: usize, pos: usize },
    #[error("push of {1} bytes does not fit {0}")]
    PushTooLarge(String, usize),
    #[error("bad-encoding: {0}")]
    BadHex(String),
    #[error("bad-encoding: unknown ASM token {0}")]
    UnknownToken(String),
    #[error("bad-encoding: {0} carries {1} bytes of data but pushes none")]
    UnexpectedData(String, usize),
    #[error("bad-encoding: ASM token {0} needs data, write the data as hex instead")]
    MissingData(String)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Script {
    script: Vec<u8>
}

impl Script {
    /**
        Create a new instance of self
    */
    pub fn new(script: Vec<u8>) -> Self {
        Self {
            script
        }
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptErr> {
        hex::decode(hex_str)
            .map(Self::new)
            .map_err(|e| ScriptErr::BadHex(e.to_string()))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.script)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.script
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.script
    }

    pub fn len(&self) -> usize {
        self.script.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }

    /**
        Hash the script with Hash160
    */
    pub fn hash(&self) -> [u8; 20] {
        hash::hash160(&self.script)
    }

    /**
        Parses the script into its operations.
    */
    pub fn to_ops(&self) -> Result<Vec<ScriptOp>, ScriptErr> {
        let mut ops = Vec::new();
        let mut pos = 0;
        while pos < self.script.len() {
            ops.push(read_op(&self.script, &mut pos)?);
        }
        Ok(ops)
    }

    /**
        Assembles operations into a script. OP_DATA_N pushes are encoded
        minimally, OP_PUSHDATA1/2/4 pushes keep their opcode.
    */
    pub fn from_ops(ops: &[ScriptOp]) -> Result<Self, ScriptErr> {
        let size = ops.iter().map(ScriptOp::encoded_len).sum();
        let mut script = Vec::with_capacity(size);
        for op in ops {
            op.write_to(&mut script)?;
        }
        Ok(Self::new(script))
    }

    /**
        Space separated ASM. Pushes are printed as hex, OP_0 as `0`.

        Empty pushes of any opcode print as `0`, so ASM canonicalizes an
        empty OP_PUSHDATA1/2/4 to OP_0 when read back.
    */
    pub fn to_asm(&self) -> Result<String, ScriptErr> {
        let tokens: Vec<String> = self.to_ops()?
            .iter()
            .map(|op| {
                if op.opcode == OP_0 || (op.opcode.is_push_data() && op.data.is_empty()) {
                    "0".to_string()
                } else if op.opcode.is_push_data() {
                    hex::encode(&op.data)
                } else {
                    op.opcode.name()
                }
            })
            .collect();
        Ok(tokens.join(" "))
    }

    /**
        Parses ASM produced by to_asm(). Hex tokens become minimal pushes.
        Push opcode names on their own carry no data and are rejected.
    */
    pub fn from_asm(asm: &str) -> Result<Self, ScriptErr> {
        let ops = asm
            .split_whitespace()
            .map(|token| {
                if token == "0" {
                    return Ok(ScriptOp::new(OP_0))
                }
                if let Some(opcode) = Opcode::from_name(token) {
                    if opcode.is_push_data() {
                        return Err(ScriptErr::MissingData(token.to_string()))
                    }
                    return Ok(ScriptOp::new(opcode))
                }
                match hex::decode(token) {
                    Ok(data) => Ok(ScriptOp::push(&data)),
                    Err(_) => Err(ScriptErr::UnknownToken(token.to_string()))
                }
            })
            .collect::<Result<Vec<ScriptOp>, ScriptErr>>()?;
        Self::from_ops(&ops)
    }

    /**
        OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG
    */
    pub fn is_p2pkh(&self) -> bool {
        let s = &self.script;
        s.len() == 25
            && s[0] == OP_DUP.into_u8()
            && s[1] == OP_HASH160.into_u8()
            && s[2] == OP_DATA_20.into_u8()
            && s[23] == OP_EQUALVERIFY.into_u8()
            && s[24] == OP_CHECKSIG.into_u8()
    }

    /**
        The public key hash of a P2PKH locking script
    */
    pub fn public_key_hash(&self) -> Option<[u8; 20]> {
        if !self.is_p2pkh() { return None }
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&self.script[3..23]);
        Some(hash)
    }
}

impl From<Vec<u8>> for Script {
    fn from(script: Vec<u8>) -> Self {
        Self::new(script)
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.script
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PUBKEY_HASH_HEX: &str = "751e76e8199196d454941c45d1b3a323f1433bd6";

    fn p2pkh_ops() -> Vec<ScriptOp> {
        vec![
            ScriptOp::new(OP_DUP),
            ScriptOp::new(OP_HASH160),
            ScriptOp::push(&hex::decode(PUBKEY_HASH_HEX).unwrap()),
            ScriptOp::new(OP_EQUALVERIFY),
            ScriptOp::new(OP_CHECKSIG)
        ]
    }

    #[test]
    fn assemble_and_parse_p2pkh() {
        let ops = p2pkh_ops();
        let script = Script::from_ops(&ops).unwrap();
        assert_eq!(script.len(), 25);
        assert_eq!(script.to_hex(), format!("76a914{}88ac", PUBKEY_HASH_HEX));
        assert!(script.is_p2pkh());
        assert_eq!(hex::encode(script.public_key_hash().unwrap()), PUBKEY_HASH_HEX);

        let parsed = script.to_ops().unwrap();
        assert_eq!(parsed.len(), 5);
        assert_eq!(parsed, ops);
    }

    #[test]
    fn asm_round_trip() {
        let script = Script::from_ops(&p2pkh_ops()).unwrap();
        let asm = script.to_asm().unwrap();
        assert_eq!(asm, format!("OP_DUP OP_HASH160 {} OP_EQUALVERIFY OP_CHECKSIG", PUBKEY_HASH_HEX));
        assert_eq!(Script::from_asm(&asm).unwrap(), script);

        let data = Script::from_asm("0 OP_RETURN 68656c6c6f").unwrap();
        assert_eq!(data.to_hex(), "006a0568656c6c6f");
        assert_eq!(data.to_asm().unwrap(), "0 OP_RETURN 68656c6c6f");

        assert_eq!(Script::from_asm("OP_NOPE"), Err(ScriptErr::UnknownToken("OP_NOPE".to_string())));
    }

    #[test]
    fn asm_rejects_push_opcodes_without_data() {
        for token in ["OP_DATA_20", "OP_PUSHDATA1", "OP_PUSHDATA2", "OP_PUSHDATA4"] {
            assert_eq!(Script::from_asm(token), Err(ScriptErr::MissingData(token.to_string())));
        }
        assert!(Script::from_asm("OP_DUP OP_DATA_1 OP_DUP").is_err());
    }

    #[test]
    fn empty_pushdata_prints_as_zero() {
        let script = Script::from_hex("764c0076").unwrap();
        let asm = script.to_asm().unwrap();
        assert_eq!(asm, "OP_DUP 0 OP_DUP");

        //Same ops once the empty push is canonicalized to OP_0
        let reparsed = Script::from_asm(&asm).unwrap();
        assert_eq!(reparsed.to_hex(), "760076");
        assert_eq!(reparsed.to_ops().unwrap().len(), script.to_ops().unwrap().len());

        let mut ops = script.to_ops().unwrap();
        ops[1] = ScriptOp::new(OP_0);
        assert_eq!(reparsed.to_ops().unwrap(), ops);
    }

    #[test]
    fn data_on_non_push_ops_is_rejected() {
        let ops = vec![ScriptOp::push_with(OP_DUP, &[0xaa, 0xbb])];
        assert_eq!(Script::from_ops(&ops), Err(ScriptErr::UnexpectedData("OP_DUP".to_string(), 2)));

        let ops = vec![ScriptOp::new(OP_DUP), ScriptOp::push_with(OP_0, &[0xcc])];
        assert_eq!(Script::from_ops(&ops), Err(ScriptErr::UnexpectedData("OP_0".to_string(), 1)));
    }

    #[test]
    fn truncated_script_fails_to_parse() {
        let script = Script::from_hex("76a914751e76e8").unwrap();
        assert_eq!(script.to_ops(), Err(ScriptErr::DataTooSmall { len: 20, pos: 2 }));
        assert!(!script.is_p2pkh());
        assert!(Script::from_hex("76a").is_err());
    }

    #[test]
    fn large_pushes_pick_wider_prefixes() {
        let ops = vec![ScriptOp::push(&[7u8; 80]), ScriptOp::push(&[8u8; 300])];
        let script = Script::from_ops(&ops).unwrap();
        assert_eq!(script.as_bytes()[0], OP_PUSHDATA1.into_u8());
        assert_eq!(script.as_bytes()[1], 80);
        assert_eq!(&script.as_bytes()[82..85], &[OP_PUSHDATA2.into_u8(), 0x2c, 0x01]);
        assert_eq!(script.len(), 2 + 80 + 3 + 300);
        assert_eq!(script.to_ops().unwrap(), ops);
    }

    fn arb_op() -> impl Strategy<Value = ScriptOp> {
        prop_oneof![
            any::<u8>()
                .prop_filter("bare opcode", |code| !Opcode::from(*code).is_push_data())
                .prop_map(|code| ScriptOp::new(Opcode::from(code))),
            proptest::collection::vec(any::<u8>(), 1..300).prop_map(|data| ScriptOp::push(&data))
        ]
    }

    proptest! {
        #[test]
        fn minimal_ops_survive_assembly(ops in proptest::collection::vec(arb_op(), 0..20)) {
            let script = Script::from_ops(&ops).unwrap();
            prop_assert_eq!(script.to_ops().unwrap(), ops);
        }
    }
}
