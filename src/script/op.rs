/*
    A single script operation: an opcode and, for pushes, the pushed bytes.
*/

use super::{
    opcodes::*,
    Opcode,
    ScriptErr
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScriptOp {
    pub opcode: Opcode,
    pub data: Vec<u8>
}

impl ScriptOp {
    /**
        A bare opcode with no data
    */
    pub fn new(opcode: Opcode) -> Self {
        Self { opcode, data: Vec::new() }
    }

    /**
        A push of `data` using the minimal push opcode for its length.
        Empty data is pushed with OP_0.
    */
    pub fn push(data: &[u8]) -> Self {
        Self { opcode: minimal_push_opcode(data.len()), data: data.to_vec() }
    }

    /**
        A push that keeps the given opcode instead of the minimal one.
        Used to reproduce scripts with non-minimal OP_PUSHDATA encodings.
    */
    pub fn push_with(opcode: Opcode, data: &[u8]) -> Self {
        Self { opcode, data: data.to_vec() }
    }

    /**
        Number of bytes this op occupies once serialized.
    */
    pub fn encoded_len(&self) -> usize {
        let opcode = self.encoding_opcode();
        let prefix = match opcode {
            OP_PUSHDATA1 => 1,
            OP_PUSHDATA2 => 2,
            OP_PUSHDATA4 => 4,
            _ => 0
        };
        let data = if opcode.is_push_data() { self.data.len() } else { 0 };
        1 + prefix + data
    }

    /**
        Appends the serialized op to `out`.

        OP_DATA_N ops are re-encoded minimally for their data; OP_PUSHDATA1/2/4
        are honored as given and fail when the data does not fit the length prefix.
        Any other opcode must carry no data.
    */
    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<(), ScriptErr> {
        let opcode = self.encoding_opcode();
        if !opcode.is_push_data() && !self.data.is_empty() {
            return Err(ScriptErr::UnexpectedData(opcode.name(), self.data.len()))
        }
        let too_large = |_| ScriptErr::PushTooLarge(opcode.name(), self.data.len());

        let prefix: Vec<u8> = match opcode {
            OP_PUSHDATA1 => vec![u8::try_from(self.data.len()).map_err(too_large)?],
            OP_PUSHDATA2 => u16::try_from(self.data.len()).map_err(too_large)?.to_le_bytes().to_vec(),
            OP_PUSHDATA4 => u32::try_from(self.data.len()).map_err(too_large)?.to_le_bytes().to_vec(),
            _ => vec![]
        };

        out.push(opcode.into_u8());
        out.extend_from_slice(&prefix);
        if opcode.is_push_data() {
            out.extend_from_slice(&self.data);
        }
        Ok(())
    }

    /**
        True for OP_0 and every data push
    */
    pub fn is_push(&self) -> bool {
        self.opcode == OP_0 || self.opcode.is_push_data()
    }

    //OP_DATA_N ops always serialize with the minimal opcode for their data
    fn encoding_opcode(&self) -> Opcode {
        match self.opcode.into_u8() {
            0x01..=0x4b => minimal_push_opcode(self.data.len()),
            _ => self.opcode
        }
    }
}

/**
    Smallest push opcode able to carry `len` bytes.
*/
pub fn minimal_push_opcode(len: usize) -> Opcode {
    match len {
        0 => OP_0,
        1..=75 => Opcode::from(len as u8),
        76..=0xff => OP_PUSHDATA1,
        0x100..=0xffff => OP_PUSHDATA2,
        _ => OP_PUSHDATA4
    }
}

/**
    Reads the operation starting at `pos` and advances `pos` past it.

    Fails with DataTooSmall when the push declares more bytes than remain.
*/
pub fn read_op(bytes: &[u8], pos: &mut usize) -> Result<ScriptOp, ScriptErr> {
    let start = *pos;
    let opcode = match bytes.get(start) {
        Some(code) => Opcode::from(*code),
        None => return Err(ScriptErr::DataTooSmall { len: 1, pos: start })
    };

    let (prefix, len) = match opcode {
        OP_PUSHDATA1 => (1, read_len(bytes, start + 1, 1)?),
        OP_PUSHDATA2 => (2, read_len(bytes, start + 1, 2)?),
        OP_PUSHDATA4 => (4, read_len(bytes, start + 1, 4)?),
        op if op.is_push_data() => (0, op.into_u8() as usize),
        op => {
            *pos = start + 1;
            return Ok(ScriptOp::new(op))
        }
    };

    let data_start = start + 1 + prefix;
    let remaining = bytes.len() - data_start;
    if len > remaining {
        return Err(ScriptErr::DataTooSmall { len, pos: start })
    }

    *pos = data_start + len;
    Ok(ScriptOp { opcode, data: bytes[data_start..data_start + len].to_vec() })
}

//Little-endian length prefix of `width` bytes at `at`
fn read_len(bytes: &[u8], at: usize, width: usize) -> Result<usize, ScriptErr> {
    let prefix = bytes.get(at..at + width)
        .ok_or(ScriptErr::DataTooSmall { len: width, pos: at })?;
    Ok(prefix.iter().rev().fold(0usize, |acc, b| (acc << 8) | *b as usize))
}
