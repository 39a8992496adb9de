/*
    This module combines all the boilerplate
    implementations of fmt::Display and fmt::Debug.
*/

use crate::{
    ecdsa::Signature,
    key::{PrivateKey, PublicKey},
    outpoint::Outpoint,
    script::{opcodes::OP_0, Opcode, Script, ScriptOp}
};
use std::fmt;

/*
    key module impls
*/

//Only the public half is printed
impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
         .field("public_key", &self.public_key().to_hex())
         .finish()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

/*
    ecdsa module impls
*/
impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_der()))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", hex::encode(self.to_der()))
    }
}

/*
    script module impls
*/
impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for ScriptOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.opcode != OP_0 && self.opcode.is_push_data() && !self.data.is_empty() {
            write!(f, "{}", hex::encode(&self.data))
        } else {
            write!(f, "{}", self.opcode)
        }
    }
}

//ASM when the script parses, hex otherwise
impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.to_asm() {
            Ok(asm) => write!(f, "{}", asm),
            Err(_) => write!(f, "{}", self.to_hex())
        }
    }
}

/*
    outpoint module impls
*/
impl fmt::Display for Outpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}_{}", self.txid_hex(), self.vout())
    }
}
