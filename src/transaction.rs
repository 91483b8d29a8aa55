use std::collections::HashMap;

use crate::{Account, PublicKey, Signature};

/// Possible reasons for a transaction to be rejected
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    #[error("The amount of a transaction cannot be zero")]
    AmountZero,
    #[error("The receiver cannot be the same as the sender")]
    SameSenderReceiver,
    #[error("The amount exceeds the balance of the sender")]
    AmountExceedsBalance,
    #[error("The amount would overflow the balance of the receiver")]
    BalanceOverflow,
    #[error("The signature of the transaction cannot be validated")]
    BadSignature,
}

/// A coin transaction
///
/// An amount of coin is sent from one account to another. The sending account
/// signs the transaction with its private key, over the contract bytes that
/// include the chain signature of the ledger or bank the transaction is made
/// for. A transaction is immutable once signed.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Transaction {
    from: PublicKey,
    to: PublicKey,
    amount: u32,
    signature: Signature,
}

impl Transaction {
    pub(crate) fn build(
        account: &Account,
        to: PublicKey,
        amount: u32,
        chain_signature: &Signature,
    ) -> Self {
        let mut trn = Self {
            from: account.public_key(),
            to,
            amount,
            signature: Signature::ZERO,
        };
        trn.signature = account.sign(&trn.contract(chain_signature));
        trn
    }

    /// The address the coin is sent from
    pub fn from(&self) -> PublicKey {
        self.from
    }

    /// The address the coin is sent to
    pub fn to(&self) -> PublicKey {
        self.to
    }

    /// The amount of coin sent
    pub fn amount(&self) -> u32 {
        self.amount
    }

    /// The signature of the sender over the contract bytes
    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// The bytes the sending account signs with its private key
    ///
    /// The layout is `from ‖ to ‖ amount ‖ chain_signature`, with the amount
    /// encoded as 4 little-endian bytes. It must be reproduced bit for bit by
    /// every implementation.
    pub fn contract(&self, chain_signature: &Signature) -> Vec<u8> {
        let mut payload = Vec::with_capacity(2 * PublicKey::LEN + 4 + Signature::LEN);
        payload.extend_from_slice(self.from.as_bytes());
        payload.extend_from_slice(self.to.as_bytes());
        payload.extend_from_slice(&self.amount.to_le_bytes());
        payload.extend_from_slice(chain_signature.as_bytes());
        payload
    }

    /// Verifies the signature of the transaction with the public key of the
    /// sender and the given chain signature
    pub fn verify(&self, chain_signature: &Signature) -> bool {
        self.from.verify(&self.contract(chain_signature), &self.signature)
    }

    /// Validates the transaction as the next transfer of an aggregate with
    /// the given balances and chain signature
    ///
    /// The rules are evaluated in a fixed order and the first violated one is
    /// returned: amount not zero, sender not the receiver, sufficient sender
    /// balance, no receiver balance overflow, valid signature.
    pub fn check(
        &self,
        balances: &HashMap<PublicKey, u32>,
        chain_signature: &Signature,
    ) -> Result<(), TransactionError> {
        if self.amount == 0 {
            return Err(TransactionError::AmountZero);
        }
        if self.from == self.to {
            return Err(TransactionError::SameSenderReceiver);
        }
        if self.amount > balances.get(&self.from).copied().unwrap_or(0) {
            return Err(TransactionError::AmountExceedsBalance);
        }
        let receiver = balances.get(&self.to).copied().unwrap_or(0);
        if receiver.checked_add(self.amount).is_none() {
            return Err(TransactionError::BalanceOverflow);
        }
        if !self.verify(chain_signature) {
            return Err(TransactionError::BadSignature);
        }

        Ok(())
    }

    /// Applies the balance effects of an already validated transfer
    ///
    /// Accounts whose balance reaches zero are removed from the map.
    pub(crate) fn apply(&self, balances: &mut HashMap<PublicKey, u32>) {
        *balances.entry(self.to).or_insert(0) += self.amount;
        if let Some(sender) = balances.get_mut(&self.from) {
            *sender -= self.amount;
            if *sender == 0 {
                balances.remove(&self.from);
            }
        }
    }
}
