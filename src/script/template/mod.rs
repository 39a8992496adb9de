/*
    Locking and unlocking script templates.

    A template knows how to produce the locking script of an output, how to
    recognize its own locking and unlocking scripts and how to sign a spend
    of that output. The transaction being signed is only seen through the
    SignatureHasher capability, which yields the digest to sign for an input.
*/

pub mod p2pkh;
pub mod multisig;

pub use p2pkh::P2pkh;
pub use multisig::Multisig;

use super::{Script, ScriptErr};
use crate::ecdsa::{Signature, SignatureError};
use thiserror::Error;

pub const SIGHASH_ALL: u32 = 0x01;
pub const SIGHASH_NONE: u32 = 0x02;
pub const SIGHASH_SINGLE: u32 = 0x03;
pub const SIGHASH_FORKID: u32 = 0x40;
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("missing-key: {0}")]
    MissingKey(String),
    #[error("invalid-quorum: {0}")]
    InvalidQuorum(String),
    #[error("unknown-signer: {0}")]
    UnknownSigner(String),
    #[error("sighash: {0}")]
    Sighash(String),
    #[error(transparent)]
    Signature(#[from] SignatureError),
    #[error(transparent)]
    Script(#[from] ScriptErr)
}

/**
    Which input is being unlocked and with which sighash flag.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockParams {
    pub input_index: usize,
    pub sighash_flag: u32
}

impl Default for UnlockParams {
    /// Input 0 with SIGHASH_ALL | SIGHASH_FORKID
    fn default() -> Self {
        Self {
            input_index: 0,
            sighash_flag: SIGHASH_ALL | SIGHASH_FORKID
        }
    }
}

impl UnlockParams {
    pub fn new(input_index: usize, sighash_flag: u32) -> Self {
        Self { input_index, sighash_flag }
    }

    //The flag as it is appended to a signature
    fn flag_byte(&self) -> Result<u8, TemplateError> {
        u8::try_from(self.sighash_flag)
            .map_err(|_| TemplateError::Sighash(format!("flag 0x{:x} does not fit a byte", self.sighash_flag)))
    }
}

/**
    Supplies the digest a signature commits to. Implemented by transaction builders.
*/
pub trait SignatureHasher {
    fn signature_hash(&self, input_index: usize, sighash_flag: u32) -> Result<[u8; 32], TemplateError>;
}

pub trait ScriptTemplate {
    /// The locking script of an output spendable through this template
    fn lock(&self) -> Result<Script, TemplateError>;

    fn is_locking(&self, script: &Script) -> bool;

    fn is_unlocking(&self, script: &Script) -> bool;

    /// Produces the unlocking script for the input named in `params`
    fn sign(&self, tx: &dyn SignatureHasher, params: &UnlockParams) -> Result<Script, TemplateError>;

    /// Upper bound on the unlocking script size in bytes
    fn estimate_size(&self) -> usize;
}

/**
    DER signature followed by the sighash flag byte, as pushed in unlocking scripts.
*/
pub fn signature_with_flag(signature: &Signature, params: &UnlockParams) -> Result<Vec<u8>, TemplateError> {
    let mut out = signature.to_der();
    out.push(params.flag_byte()?);
    Ok(out)
}

//Inverse of signature_with_flag(), None unless the DER part is strict
fn split_signature(data: &[u8]) -> Option<(Signature, u8)> {
    let (flag, der) = data.split_last()?;
    Signature::from_der(der).ok().map(|signature| (signature, *flag))
}
