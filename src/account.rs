use ed25519_dalek::{Signer, SigningKey};
use sha2::{Digest, Sha256};

use crate::{PrivateKey, PublicKey, Signature, Transaction};

/// Possible errors to occur during the creation of an account
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("The seed must be at least 32 bytes long")]
    SeedTooShort,
}

/// A coin account
///
/// An account can make transactions on a ledger or bank. It has a public key,
/// which is used as the address of the account, and a private key, which is
/// used to sign transactions. Anyone with access to the private key has
/// access to the account.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    public_key: PublicKey,
    private_key: PrivateKey,
}

impl Account {
    /// The minimum number of bytes a seed must have
    pub const MIN_SEED_LEN: usize = 32;

    /// Generates a new account with a fresh, unpredictable key pair
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::generate(&mut rand::thread_rng()))
    }

    /// Derives an account from a seed
    ///
    /// The seed must be at least [`Account::MIN_SEED_LEN`] bytes long and is
    /// expanded with SHA-256 before key derivation. Identical seeds always
    /// yield identical accounts.
    pub fn from_seed(seed: &[u8]) -> Result<Self, AccountError> {
        if seed.len() < Self::MIN_SEED_LEN {
            return Err(AccountError::SeedTooShort);
        }

        let secret: [u8; 32] = Sha256::digest(seed).into();
        Ok(Self::from_signing_key(SigningKey::from_bytes(&secret)))
    }

    fn from_signing_key(key: SigningKey) -> Self {
        Self {
            public_key: PublicKey::from(key.verifying_key().to_bytes()),
            private_key: PrivateKey::from(key.to_bytes()),
        }
    }

    /// The public key and address of the account
    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    /// Signs data with the private key of the account
    pub fn sign(&self, data: &[u8]) -> Signature {
        let key = SigningKey::from_bytes(self.private_key.as_bytes());
        Signature::from(key.sign(data).to_bytes())
    }

    /// Verifies signed data with the public key of the account
    pub fn verify(&self, data: &[u8], signature: &Signature) -> bool {
        self.public_key.verify(data, signature)
    }

    /// Creates the transaction in which the account mints coin to itself
    ///
    /// This must be the first transaction of a ledger or bank and will be
    /// invalid otherwise.
    pub fn genesis_transaction(&self, amount: u32) -> Transaction {
        self.transaction(self.public_key, amount, &Signature::ZERO)
    }

    /// Creates a transaction sending an amount of coin to another account,
    /// addressed by its public key
    ///
    /// The transaction is signed against `chain_signature`, the current
    /// signature of the ledger or bank it is to be added to, and is only
    /// valid for that exact state.
    pub fn transaction(
        &self,
        to: PublicKey,
        amount: u32,
        chain_signature: &Signature,
    ) -> Transaction {
        Transaction::build(self, to, amount, chain_signature)
    }
}
