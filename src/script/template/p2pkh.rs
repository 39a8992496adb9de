/*
    Pay to public key hash.

    Locking:   OP_DUP OP_HASH160 <pubkey hash> OP_EQUALVERIFY OP_CHECKSIG
    Unlocking: <DER signature || sighash flag> <compressed public key>
*/

use super::{
    signature_with_flag,
    split_signature,
    ScriptTemplate,
    SignatureHasher,
    TemplateError,
    UnlockParams
};
use crate::{
    hash,
    key::{PrivateKey, PublicKey},
    script::{opcodes::*, Builder, Script}
};

/// Push of a 72 byte flagged signature plus push of a 33 byte public key
const UNLOCKING_SCRIPT_SIZE: usize = 1 + 71 + 1 + 1 + 33;

#[derive(Debug, Clone)]
pub struct P2pkh {
    pubkey_hash: [u8; 20],
    private_key: Option<PrivateKey>
}

impl P2pkh {
    /**
        Lock-only template for the given public key.
    */
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        Self::from_pubkey_hash(public_key.hash160())
    }

    /**
        Template able to both lock and sign, the key's compressed public key is committed to.
    */
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        Self {
            pubkey_hash: private_key.public_key().hash160(),
            private_key: Some(private_key)
        }
    }

    pub fn from_pubkey_hash(pubkey_hash: [u8; 20]) -> Self {
        Self {
            pubkey_hash,
            private_key: None
        }
    }

    pub fn pubkey_hash(&self) -> [u8; 20] {
        self.pubkey_hash
    }
}

impl ScriptTemplate for P2pkh {
    fn lock(&self) -> Result<Script, TemplateError> {
        Ok(Builder::new()
            .push_opcode(OP_DUP)
            .push_opcode(OP_HASH160)
            .push_data(&self.pubkey_hash)
            .push_opcode(OP_EQUALVERIFY)
            .push_opcode(OP_CHECKSIG)
            .into_script()?)
    }

    fn is_locking(&self, script: &Script) -> bool {
        script.public_key_hash() == Some(self.pubkey_hash)
    }

    fn is_unlocking(&self, script: &Script) -> bool {
        let ops = match script.to_ops() {
            Ok(ops) => ops,
            Err(_) => return false
        };
        match ops.as_slice() {
            [signature, public_key] => {
                split_signature(&signature.data).is_some()
                    && PublicKey::from_bytes(&public_key.data).is_ok()
                    && hash::hash160(&public_key.data) == self.pubkey_hash
            },
            _ => false
        }
    }

    fn sign(&self, tx: &dyn SignatureHasher, params: &UnlockParams) -> Result<Script, TemplateError> {
        let private_key = self.private_key
            .as_ref()
            .ok_or_else(|| TemplateError::MissingKey("P2PKH template holds no private key".to_string()))?;

        let digest = tx.signature_hash(params.input_index, params.sighash_flag)?;
        let signature = private_key.sign(&digest)?;

        Ok(Builder::new()
            .push_data(&signature_with_flag(&signature, params)?)
            .push_data(&private_key.public_key().to_compressed())
            .into_script()?)
    }

    fn estimate_size(&self) -> usize {
        UNLOCKING_SCRIPT_SIZE
    }
}
