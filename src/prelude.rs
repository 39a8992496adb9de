/*
    This module contains the default imports for the library.

    Import the library using:
        use bsv_primitives::prelude::*;
    to quickly import the essential parts of the library.
*/

pub use crate::{

    key::{
        PrivateKey,
        PublicKey,
        KeyError,
        shared_secret
    },

    ecdsa::{
        Signature,
        SignatureError,
        sign,
        verify
    },

    drbg::{
        HmacDrbg,
        DrbgError
    },

    script::{
        Script,
        ScriptOp,
        ScriptErr,
        Opcode,
        opcodes,
        Builder,
        ScriptTemplate,
        SignatureHasher,
        UnlockParams,
        TemplateError,
        P2pkh,
        Multisig
    },

    outpoint::{
        Outpoint,
        OutpointError
    }

};
