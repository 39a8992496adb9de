/*
    Bitcoin SV opcode table.

    Opcodes 0x01..=0x4b push that many following bytes. OP_PUSHDATA1/2/4 push
    data prefixed by a 1, 2 or 4 byte little-endian length. Every other
    opcode is a single byte operation.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Opcode {
    code: u8
}

impl Opcode {
    pub fn into_u8(self) -> u8 {
        self.code
    }

    /**
        Is this OP_DATA_1..OP_DATA_75 or one of the OP_PUSHDATA opcodes?
    */
    pub fn is_push_data(self) -> bool {
        self.code >= opcodes::OP_DATA_1.code && self.code <= opcodes::OP_PUSHDATA4.code
    }

    /**
        OP_1 through OP_16 for n in 1..=16, OP_0 for zero.
    */
    pub fn small_int(n: u8) -> Option<Opcode> {
        match n {
            0 => Some(opcodes::OP_0),
            1..=16 => Some(Opcode { code: 0x50 + n }),
            _ => None
        }
    }

    /**
        The number pushed by OP_0 and OP_1..OP_16
    */
    pub fn as_small_int(self) -> Option<u8> {
        match self.code {
            0x00 => Some(0),
            0x51..=0x60 => Some(self.code - 0x50),
            _ => None
        }
    }

    /**
        Canonical name, OP_DATA_N for direct pushes and OP_UNKNOWN<code> for unassigned bytes.
    */
    pub fn name(self) -> String {
        match self.code {
            0x01..=0x4b => format!("OP_DATA_{}", self.code),
            code => match NAMES.iter().find(|(op, _)| op.code == code) {
                Some((_, name)) => name.to_string(),
                None => format!("OP_UNKNOWN{}", code)
            }
        }
    }

    /**
        Looks an opcode up by name. OP_FALSE and OP_TRUE are accepted as aliases.
    */
    pub fn from_name(name: &str) -> Option<Opcode> {
        match name {
            "OP_FALSE" => return Some(opcodes::OP_0),
            "OP_TRUE" => return Some(opcodes::OP_1),
            _ => {}
        }
        if let Some(n) = name.strip_prefix("OP_DATA_") {
            return match n.parse::<u8>() {
                Ok(n @ 1..=75) => Some(Opcode { code: n }),
                _ => None
            }
        }
        NAMES.iter().find(|(_, n)| *n == name).map(|(op, _)| *op)
    }
}

impl From<u8> for Opcode {
    fn from(code: u8) -> Self {
        Self { code }
    }
}

// Opcode constants
pub mod opcodes {
    use super::Opcode;

    /// Push an empty array onto the stack
    pub const OP_0: Opcode = Opcode {code: 0x00};
    /// Synonym for OP_0
    pub const OP_FALSE: Opcode = OP_0;
    /// Push the next byte as an array onto the stack
    pub const OP_DATA_1: Opcode = Opcode {code: 0x01};
    /// Push the next 20 bytes as an array onto the stack
    pub const OP_DATA_20: Opcode = Opcode {code: 0x14};
    /// Push the next 33 bytes as an array onto the stack
    pub const OP_DATA_33: Opcode = Opcode {code: 0x21};
    /// Push the next 65 bytes as an array onto the stack
    pub const OP_DATA_65: Opcode = Opcode {code: 0x41};
    /// Push the next 75 bytes as an array onto the stack
    pub const OP_DATA_75: Opcode = Opcode {code: 0x4b};
    /// Next byte is the length of the data to push
    pub const OP_PUSHDATA1: Opcode = Opcode {code: 0x4c};
    /// Next 2 bytes (little-endian) are the length of the data to push
    pub const OP_PUSHDATA2: Opcode = Opcode {code: 0x4d};
    /// Next 4 bytes (little-endian) are the length of the data to push
    pub const OP_PUSHDATA4: Opcode = Opcode {code: 0x4e};
    /// Push -1
    pub const OP_1NEGATE: Opcode = Opcode {code: 0x4f};
    pub const OP_RESERVED: Opcode = Opcode {code: 0x50};
    /// Push the number 1
    pub const OP_1: Opcode = Opcode {code: 0x51};
    /// Synonym for OP_1
    pub const OP_TRUE: Opcode = OP_1;
    pub const OP_2: Opcode = Opcode {code: 0x52};
    pub const OP_3: Opcode = Opcode {code: 0x53};
    pub const OP_4: Opcode = Opcode {code: 0x54};
    pub const OP_5: Opcode = Opcode {code: 0x55};
    pub const OP_6: Opcode = Opcode {code: 0x56};
    pub const OP_7: Opcode = Opcode {code: 0x57};
    pub const OP_8: Opcode = Opcode {code: 0x58};
    pub const OP_9: Opcode = Opcode {code: 0x59};
    pub const OP_10: Opcode = Opcode {code: 0x5a};
    pub const OP_11: Opcode = Opcode {code: 0x5b};
    pub const OP_12: Opcode = Opcode {code: 0x5c};
    pub const OP_13: Opcode = Opcode {code: 0x5d};
    pub const OP_14: Opcode = Opcode {code: 0x5e};
    pub const OP_15: Opcode = Opcode {code: 0x5f};
    pub const OP_16: Opcode = Opcode {code: 0x60};
    pub const OP_NOP: Opcode = Opcode {code: 0x61};
    pub const OP_VER: Opcode = Opcode {code: 0x62};
    pub const OP_IF: Opcode = Opcode {code: 0x63};
    pub const OP_NOTIF: Opcode = Opcode {code: 0x64};
    pub const OP_VERIF: Opcode = Opcode {code: 0x65};
    pub const OP_VERNOTIF: Opcode = Opcode {code: 0x66};
    pub const OP_ELSE: Opcode = Opcode {code: 0x67};
    pub const OP_ENDIF: Opcode = Opcode {code: 0x68};
    pub const OP_VERIFY: Opcode = Opcode {code: 0x69};
    /// Marks the output as unspendable
    pub const OP_RETURN: Opcode = Opcode {code: 0x6a};
    pub const OP_TOALTSTACK: Opcode = Opcode {code: 0x6b};
    pub const OP_FROMALTSTACK: Opcode = Opcode {code: 0x6c};
    pub const OP_2DROP: Opcode = Opcode {code: 0x6d};
    pub const OP_2DUP: Opcode = Opcode {code: 0x6e};
    pub const OP_3DUP: Opcode = Opcode {code: 0x6f};
    pub const OP_2OVER: Opcode = Opcode {code: 0x70};
    pub const OP_2ROT: Opcode = Opcode {code: 0x71};
    pub const OP_2SWAP: Opcode = Opcode {code: 0x72};
    pub const OP_IFDUP: Opcode = Opcode {code: 0x73};
    pub const OP_DEPTH: Opcode = Opcode {code: 0x74};
    pub const OP_DROP: Opcode = Opcode {code: 0x75};
    /// Duplicate the top stack item
    pub const OP_DUP: Opcode = Opcode {code: 0x76};
    pub const OP_NIP: Opcode = Opcode {code: 0x77};
    pub const OP_OVER: Opcode = Opcode {code: 0x78};
    pub const OP_PICK: Opcode = Opcode {code: 0x79};
    pub const OP_ROLL: Opcode = Opcode {code: 0x7a};
    pub const OP_ROT: Opcode = Opcode {code: 0x7b};
    pub const OP_SWAP: Opcode = Opcode {code: 0x7c};
    pub const OP_TUCK: Opcode = Opcode {code: 0x7d};
    /// Concatenate the top two items
    pub const OP_CAT: Opcode = Opcode {code: 0x7e};
    /// Split an item at a position
    pub const OP_SPLIT: Opcode = Opcode {code: 0x7f};
    pub const OP_NUM2BIN: Opcode = Opcode {code: 0x80};
    pub const OP_BIN2NUM: Opcode = Opcode {code: 0x81};
    pub const OP_SIZE: Opcode = Opcode {code: 0x82};
    pub const OP_INVERT: Opcode = Opcode {code: 0x83};
    pub const OP_AND: Opcode = Opcode {code: 0x84};
    pub const OP_OR: Opcode = Opcode {code: 0x85};
    pub const OP_XOR: Opcode = Opcode {code: 0x86};
    pub const OP_EQUAL: Opcode = Opcode {code: 0x87};
    /// OP_EQUAL followed by OP_VERIFY
    pub const OP_EQUALVERIFY: Opcode = Opcode {code: 0x88};
    pub const OP_RESERVED1: Opcode = Opcode {code: 0x89};
    pub const OP_RESERVED2: Opcode = Opcode {code: 0x8a};
    pub const OP_1ADD: Opcode = Opcode {code: 0x8b};
    pub const OP_1SUB: Opcode = Opcode {code: 0x8c};
    pub const OP_2MUL: Opcode = Opcode {code: 0x8d};
    pub const OP_2DIV: Opcode = Opcode {code: 0x8e};
    pub const OP_NEGATE: Opcode = Opcode {code: 0x8f};
    pub const OP_ABS: Opcode = Opcode {code: 0x90};
    pub const OP_NOT: Opcode = Opcode {code: 0x91};
    pub const OP_0NOTEQUAL: Opcode = Opcode {code: 0x92};
    pub const OP_ADD: Opcode = Opcode {code: 0x93};
    pub const OP_SUB: Opcode = Opcode {code: 0x94};
    pub const OP_MUL: Opcode = Opcode {code: 0x95};
    pub const OP_DIV: Opcode = Opcode {code: 0x96};
    pub const OP_MOD: Opcode = Opcode {code: 0x97};
    pub const OP_LSHIFT: Opcode = Opcode {code: 0x98};
    pub const OP_RSHIFT: Opcode = Opcode {code: 0x99};
    pub const OP_BOOLAND: Opcode = Opcode {code: 0x9a};
    pub const OP_BOOLOR: Opcode = Opcode {code: 0x9b};
    pub const OP_NUMEQUAL: Opcode = Opcode {code: 0x9c};
    pub const OP_NUMEQUALVERIFY: Opcode = Opcode {code: 0x9d};
    pub const OP_NUMNOTEQUAL: Opcode = Opcode {code: 0x9e};
    pub const OP_LESSTHAN: Opcode = Opcode {code: 0x9f};
    pub const OP_GREATERTHAN: Opcode = Opcode {code: 0xa0};
    pub const OP_LESSTHANOREQUAL: Opcode = Opcode {code: 0xa1};
    pub const OP_GREATERTHANOREQUAL: Opcode = Opcode {code: 0xa2};
    pub const OP_MIN: Opcode = Opcode {code: 0xa3};
    pub const OP_MAX: Opcode = Opcode {code: 0xa4};
    pub const OP_WITHIN: Opcode = Opcode {code: 0xa5};
    pub const OP_RIPEMD160: Opcode = Opcode {code: 0xa6};
    pub const OP_SHA1: Opcode = Opcode {code: 0xa7};
    pub const OP_SHA256: Opcode = Opcode {code: 0xa8};
    /// RIPEMD160(SHA256(top))
    pub const OP_HASH160: Opcode = Opcode {code: 0xa9};
    pub const OP_HASH256: Opcode = Opcode {code: 0xaa};
    pub const OP_CODESEPARATOR: Opcode = Opcode {code: 0xab};
    /// Check a signature against a public key
    pub const OP_CHECKSIG: Opcode = Opcode {code: 0xac};
    pub const OP_CHECKSIGVERIFY: Opcode = Opcode {code: 0xad};
    /// Check m of n signatures
    pub const OP_CHECKMULTISIG: Opcode = Opcode {code: 0xae};
    pub const OP_CHECKMULTISIGVERIFY: Opcode = Opcode {code: 0xaf};
    pub const OP_NOP1: Opcode = Opcode {code: 0xb0};
    pub const OP_NOP2: Opcode = Opcode {code: 0xb1};
    pub const OP_NOP3: Opcode = Opcode {code: 0xb2};
    pub const OP_NOP4: Opcode = Opcode {code: 0xb3};
    pub const OP_NOP5: Opcode = Opcode {code: 0xb4};
    pub const OP_NOP6: Opcode = Opcode {code: 0xb5};
    pub const OP_NOP7: Opcode = Opcode {code: 0xb6};
    pub const OP_NOP8: Opcode = Opcode {code: 0xb7};
    pub const OP_NOP9: Opcode = Opcode {code: 0xb8};
    pub const OP_NOP10: Opcode = Opcode {code: 0xb9};
    pub const OP_PUBKEYHASH: Opcode = Opcode {code: 0xfd};
    pub const OP_PUBKEY: Opcode = Opcode {code: 0xfe};
    /// Matches no valid opcode
    pub const OP_INVALIDOPCODE: Opcode = Opcode {code: 0xff};
}

use opcodes::*;

const NAMES: &[(Opcode, &str)] = &[
    (OP_0, "OP_0"),
    (OP_PUSHDATA1, "OP_PUSHDATA1"),
    (OP_PUSHDATA2, "OP_PUSHDATA2"),
    (OP_PUSHDATA4, "OP_PUSHDATA4"),
    (OP_1NEGATE, "OP_1NEGATE"),
    (OP_RESERVED, "OP_RESERVED"),
    (OP_1, "OP_1"),
    (OP_2, "OP_2"),
    (OP_3, "OP_3"),
    (OP_4, "OP_4"),
    (OP_5, "OP_5"),
    (OP_6, "OP_6"),
    (OP_7, "OP_7"),
    (OP_8, "OP_8"),
    (OP_9, "OP_9"),
    (OP_10, "OP_10"),
    (OP_11, "OP_11"),
    (OP_12, "OP_12"),
    (OP_13, "OP_13"),
    (OP_14, "OP_14"),
    (OP_15, "OP_15"),
    (OP_16, "OP_16"),
    (OP_NOP, "OP_NOP"),
    (OP_VER, "OP_VER"),
    (OP_IF, "OP_IF"),
    (OP_NOTIF, "OP_NOTIF"),
    (OP_VERIF, "OP_VERIF"),
    (OP_VERNOTIF, "OP_VERNOTIF"),
    (OP_ELSE, "OP_ELSE"),
    (OP_ENDIF, "OP_ENDIF"),
    (OP_VERIFY, "OP_VERIFY"),
    (OP_RETURN, "OP_RETURN"),
    (OP_TOALTSTACK, "OP_TOALTSTACK"),
    (OP_FROMALTSTACK, "OP_FROMALTSTACK"),
    (OP_2DROP, "OP_2DROP"),
    (OP_2DUP, "OP_2DUP"),
    (OP_3DUP, "OP_3DUP"),
    (OP_2OVER, "OP_2OVER"),
    (OP_2ROT, "OP_2ROT"),
    (OP_2SWAP, "OP_2SWAP"),
    (OP_IFDUP, "OP_IFDUP"),
    (OP_DEPTH, "OP_DEPTH"),
    (OP_DROP, "OP_DROP"),
    (OP_DUP, "OP_DUP"),
    (OP_NIP, "OP_NIP"),
    (OP_OVER, "OP_OVER"),
    (OP_PICK, "OP_PICK"),
    (OP_ROLL, "OP_ROLL"),
    (OP_ROT, "OP_ROT"),
    (OP_SWAP, "OP_SWAP"),
    (OP_TUCK, "OP_TUCK"),
    (OP_CAT, "OP_CAT"),
    (OP_SPLIT, "OP_SPLIT"),
    (OP_NUM2BIN, "OP_NUM2BIN"),
    (OP_BIN2NUM, "OP_BIN2NUM"),
    (OP_SIZE, "OP_SIZE"),
    (OP_INVERT, "OP_INVERT"),
    (OP_AND, "OP_AND"),
    (OP_OR, "OP_OR"),
    (OP_XOR, "OP_XOR"),
    (OP_EQUAL, "OP_EQUAL"),
    (OP_EQUALVERIFY, "OP_EQUALVERIFY"),
    (OP_RESERVED1, "OP_RESERVED1"),
    (OP_RESERVED2, "OP_RESERVED2"),
    (OP_1ADD, "OP_1ADD"),
    (OP_1SUB, "OP_1SUB"),
    (OP_2MUL, "OP_2MUL"),
    (OP_2DIV, "OP_2DIV"),
    (OP_NEGATE, "OP_NEGATE"),
    (OP_ABS, "OP_ABS"),
    (OP_NOT, "OP_NOT"),
    (OP_0NOTEQUAL, "OP_0NOTEQUAL"),
    (OP_ADD, "OP_ADD"),
    (OP_SUB, "OP_SUB"),
    (OP_MUL, "OP_MUL"),
    (OP_DIV, "OP_DIV"),
    (OP_MOD, "OP_MOD"),
    (OP_LSHIFT, "OP_LSHIFT"),
    (OP_RSHIFT, "OP_RSHIFT"),
    (OP_BOOLAND, "OP_BOOLAND"),
    (OP_BOOLOR, "OP_BOOLOR"),
    (OP_NUMEQUAL, "OP_NUMEQUAL"),
    (OP_NUMEQUALVERIFY, "OP_NUMEQUALVERIFY"),
    (OP_NUMNOTEQUAL, "OP_NUMNOTEQUAL"),
    (OP_LESSTHAN, "OP_LESSTHAN"),
    (OP_GREATERTHAN, "OP_GREATERTHAN"),
    (OP_LESSTHANOREQUAL, "OP_LESSTHANOREQUAL"),
    (OP_GREATERTHANOREQUAL, "OP_GREATERTHANOREQUAL"),
    (OP_MIN, "OP_MIN"),
    (OP_MAX, "OP_MAX"),
    (OP_WITHIN, "OP_WITHIN"),
    (OP_RIPEMD160, "OP_RIPEMD160"),
    (OP_SHA1, "OP_SHA1"),
    (OP_SHA256, "OP_SHA256"),
    (OP_HASH160, "OP_HASH160"),
    (OP_HASH256, "OP_HASH256"),
    (OP_CODESEPARATOR, "OP_CODESEPARATOR"),
    (OP_CHECKSIG, "OP_CHECKSIG"),
    (OP_CHECKSIGVERIFY, "OP_CHECKSIGVERIFY"),
    (OP_CHECKMULTISIG, "OP_CHECKMULTISIG"),
    (OP_CHECKMULTISIGVERIFY, "OP_CHECKMULTISIGVERIFY"),
    (OP_NOP1, "OP_NOP1"),
    (OP_NOP2, "OP_NOP2"),
    (OP_NOP3, "OP_NOP3"),
    (OP_NOP4, "OP_NOP4"),
    (OP_NOP5, "OP_NOP5"),
    (OP_NOP6, "OP_NOP6"),
    (OP_NOP7, "OP_NOP7"),
    (OP_NOP8, "OP_NOP8"),
    (OP_NOP9, "OP_NOP9"),
    (OP_NOP10, "OP_NOP10"),
    (OP_PUBKEYHASH, "OP_PUBKEYHASH"),
    (OP_PUBKEY, "OP_PUBKEY"),
    (OP_INVALIDOPCODE, "OP_INVALIDOPCODE"),
];
