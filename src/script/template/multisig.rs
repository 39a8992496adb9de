/*
    Bare m-of-n multisig (BIP-11).

    Locking:   OP_m <pubkey 1> ... <pubkey n> OP_n OP_CHECKMULTISIG
    Unlocking: OP_0 <signature 1> ... <signature m>

    Public keys are sorted by their compressed encoding (BIP-67) so the same
    key set always gives the same locking script. The leading OP_0 feeds the
    extra stack item consumed by OP_CHECKMULTISIG.
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
    key::{PrivateKey, PublicKey},
    script::{opcodes::*, Builder, Opcode, Script}
};

/// Most keys a bare multisig can name with OP_1..OP_16
pub const MAX_KEYS: usize = 16;

/// Push of a flagged signature of at most 72 bytes
const SIGNATURE_PUSH_SIZE: usize = 1 + 72;

#[derive(Debug, Clone)]
pub struct Multisig {
    m: usize,
    public_keys: Vec<PublicKey>,
    signers: Vec<PrivateKey>
}

impl Multisig {
    /**
        Creates an m-of-n template over `keys`, which are sorted lexicographically.
    */
    pub fn new(m: usize, keys: &[PublicKey]) -> Result<Self, TemplateError> {
        let n = keys.len();
        if n == 0 || n > MAX_KEYS {
            return Err(TemplateError::InvalidQuorum(format!("{} keys, expected 1 to {}", n, MAX_KEYS)))
        }
        if m == 0 || m > n {
            return Err(TemplateError::InvalidQuorum(format!("{} of {} signatures", m, n)))
        }

        let mut public_keys = keys.to_vec();
        public_keys.sort_by_key(|key| key.to_compressed());

        Ok(Self {
            m,
            public_keys,
            signers: Vec::new()
        })
    }

    /**
        Attaches the private keys used by sign(). Each must belong to one of the template's public keys.
    */
    pub fn with_signers(mut self, signers: Vec<PrivateKey>) -> Result<Self, TemplateError> {
        for signer in &signers {
            if self.key_index(&signer.public_key()).is_none() {
                return Err(TemplateError::UnknownSigner(signer.public_key().to_hex()))
            }
        }
        self.signers = signers;
        Ok(self)
    }

    pub fn required(&self) -> usize {
        self.m
    }

    /// Public keys in locking script order
    pub fn public_keys(&self) -> &[PublicKey] {
        &self.public_keys
    }

    fn key_index(&self, key: &PublicKey) -> Option<usize> {
        self.public_keys.iter().position(|k| k == key)
    }
}

//OP_1..OP_16 for the quorum sizes
fn count_opcode(count: usize) -> Result<Opcode, TemplateError> {
    u8::try_from(count)
        .ok()
        .and_then(Opcode::small_int)
        .ok_or_else(|| TemplateError::InvalidQuorum(format!("{} does not fit a small integer opcode", count)))
}

impl ScriptTemplate for Multisig {
    fn lock(&self) -> Result<Script, TemplateError> {
        let mut builder = Builder::new().push_opcode(count_opcode(self.m)?);
        for key in &self.public_keys {
            builder = builder.push_data(&key.to_compressed());
        }

        Ok(builder
            .push_opcode(count_opcode(self.public_keys.len())?)
            .push_opcode(OP_CHECKMULTISIG)
            .into_script()?)
    }

    fn is_locking(&self, script: &Script) -> bool {
        match self.lock() {
            Ok(lock) => lock == *script,
            Err(_) => false
        }
    }

    fn is_unlocking(&self, script: &Script) -> bool {
        let ops = match script.to_ops() {
            Ok(ops) => ops,
            Err(_) => return false
        };
        match ops.split_first() {
            Some((dummy, signatures)) => {
                dummy.opcode == OP_0
                    && signatures.len() == self.m
                    && signatures.iter().all(|op| split_signature(&op.data).is_some())
            },
            None => false
        }
    }

    /**
        Signs with the first m attached signers, in locking script key order
        as OP_CHECKMULTISIG requires.
    */
    fn sign(&self, tx: &dyn SignatureHasher, params: &UnlockParams) -> Result<Script, TemplateError> {
        let mut signers: Vec<(usize, &PrivateKey)> = self.signers
            .iter()
            .filter_map(|signer| self.key_index(&signer.public_key()).map(|i| (i, signer)))
            .collect();
        signers.sort_by_key(|(i, _)| *i);
        signers.dedup_by_key(|(i, _)| *i);

        if signers.len() < self.m {
            return Err(TemplateError::MissingKey(format!("{} signers attached, {} required", signers.len(), self.m)))
        }

        let digest = tx.signature_hash(params.input_index, params.sighash_flag)?;
        let mut builder = Builder::new().push_opcode(OP_0);
        for (_, signer) in signers.into_iter().take(self.m) {
            let signature = signer.sign(&digest)?;
            builder = builder.push_data(&signature_with_flag(&signature, params)?);
        }

        Ok(builder.into_script()?)
    }

    fn estimate_size(&self) -> usize {
        1 + SIGNATURE_PUSH_SIZE * self.m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ecdsa::Signature, script::template::tests::FakeTx};
    use rand::{rngs::StdRng, SeedableRng};

    fn keys(count: usize) -> Vec<PrivateKey> {
        let mut rng = StdRng::seed_from_u64(11);
        (0..count).map(|_| PrivateKey::new_with_rng(&mut rng).unwrap()).collect()
    }

    fn public_keys(keys: &[PrivateKey]) -> Vec<PublicKey> {
        keys.iter().map(|k| k.public_key()).collect()
    }

    #[test]
    fn lock_script_layout() {
        let keys = keys(3);
        let template = Multisig::new(2, &public_keys(&keys)).unwrap();
        let lock = template.lock().unwrap();

        //OP_2, three 34 byte pushes, OP_3, OP_CHECKMULTISIG
        assert_eq!(lock.len(), 1 + 3 * 34 + 2);
        let ops = lock.to_ops().unwrap();
        assert_eq!(ops[0].opcode, OP_2);
        assert_eq!(ops[4].opcode, OP_3);
        assert_eq!(ops[5].opcode, OP_CHECKMULTISIG);
        assert!(ops[1].data < ops[2].data && ops[2].data < ops[3].data);
        assert!(template.is_locking(&lock));

        //Key order does not change the script
        let mut reversed = public_keys(&keys);
        reversed.reverse();
        assert_eq!(Multisig::new(2, &reversed).unwrap().lock().unwrap(), lock);
    }

    #[test]
    fn invalid_quorums() {
        let keys = public_keys(&keys(3));
        assert!(matches!(Multisig::new(0, &keys), Err(TemplateError::InvalidQuorum(_))));
        assert!(matches!(Multisig::new(4, &keys), Err(TemplateError::InvalidQuorum(_))));
        assert!(matches!(Multisig::new(1, &[]), Err(TemplateError::InvalidQuorum(_))));
    }

    #[test]
    fn sign_two_of_three() {
        let keys = keys(3);
        let template = Multisig::new(2, &public_keys(&keys))
            .unwrap()
            .with_signers(vec![keys[2].clone(), keys[0].clone()])
            .unwrap();

        let unlock = template.sign(&FakeTx, &UnlockParams::default()).unwrap();
        assert!(template.is_unlocking(&unlock));
        assert!(!template.is_locking(&unlock));
        assert!(unlock.len() <= template.estimate_size());
        assert_eq!(template.estimate_size(), 1 + 73 * 2);

        //Signatures follow locking script key order
        let digest = FakeTx.signature_hash(0, 0x41).unwrap();
        let ops = unlock.to_ops().unwrap();
        assert_eq!(ops[0].opcode, OP_0);
        let mut key_pos = 0;
        for op in &ops[1..] {
            let signature = Signature::from_der(&op.data[..op.data.len() - 1]).unwrap();
            let found = template.public_keys()[key_pos..]
                .iter()
                .position(|key| key.verify(&digest, &signature))
                .unwrap();
            key_pos += found + 1;
        }
    }

    #[test]
    fn signer_errors() {
        let keys = keys(4);
        let template = Multisig::new(2, &public_keys(&keys[..3])).unwrap();

        assert!(matches!(
            template.clone().with_signers(vec![keys[3].clone()]),
            Err(TemplateError::UnknownSigner(_))
        ));

        let short = template.with_signers(vec![keys[1].clone(), keys[1].clone()]).unwrap();
        assert!(matches!(
            short.sign(&FakeTx, &UnlockParams::default()),
            Err(TemplateError::MissingKey(_))
        ));
    }
}
