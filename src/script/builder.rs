/*

    Script builder module.

*/

use super::{
    opcodes::*,
    Opcode,
    Script,
    ScriptErr,
    ScriptOp
};

#[derive(Debug, Clone, Default)]
pub struct Builder {
    pub ops: Vec<ScriptOp>
}

impl Builder {
    /// Return a new instance of self
    pub fn new() -> Self  {
        Self { ops: Vec::new() }
    }

    /// Push an opcode into self
    pub fn push_opcode(mut self, opcode: Opcode) -> Self {
        self.ops.push(ScriptOp::new(opcode));
        self
    }

    /// Push data with the smallest push opcode that fits it
    pub fn push_data(mut self, data: &[u8]) -> Self {
        self.ops.push(ScriptOp::push(data));
        self
    }

    /**
        Push a number. -1 and 0..=16 use their dedicated opcodes, anything
        else is pushed as a minimally encoded script number.
    */
    pub fn push_int(self, n: i64) -> Self {
        if n == -1 {
            return self.push_opcode(OP_1NEGATE)
        }
        if let Some(opcode) = u8::try_from(n).ok().and_then(Opcode::small_int) {
            return self.push_opcode(opcode)
        }
        self.push_data(&script_num(n))
    }

    /// Convert self into a script
    pub fn into_script(self) -> Result<Script, ScriptErr> {
        Script::from_ops(&self.ops)
    }
}

//Little-endian magnitude, sign in the top bit of the last byte
fn script_num(n: i64) -> Vec<u8> {
    let mut out = Vec::new();
    let mut abs = n.unsigned_abs();
    while abs > 0 {
        out.push((abs & 0xff) as u8);
        abs >>= 8;
    }

    if let Some(&last) = out.last() {
        if last & 0x80 != 0 {
            out.push(if n < 0 { 0x80 } else { 0x00 });
        } else if n < 0 {
            let i = out.len() - 1;
            out[i] |= 0x80;
        }
    }
    out
}
