use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::{PublicKey, Signature, Transaction, TransactionError};

#[derive(Debug)]
struct BankInner {
    signature: Signature,
    bals: HashMap<PublicKey, u32>,
}

/// A store of balances
///
/// A bank processes transactions with the same rules and chain-signature
/// discipline as a [`Ledger`](crate::Ledger), but keeps no transaction
/// history: the balances and the current chain signature are its entire
/// state. Use it where unbounded history growth is unacceptable; the trade
/// off is the loss of the audit surface (`transactions_of`, `verify`).
#[derive(Debug)]
pub struct Bank {
    inner: RwLock<BankInner>,
}

impl Bank {
    /// Creates a new bank from a genesis transaction
    pub fn new(trn: Transaction) -> Result<Self, TransactionError> {
        if trn.amount() == 0 {
            return Err(TransactionError::AmountZero);
        }
        if !trn.verify(&Signature::ZERO) {
            return Err(TransactionError::BadSignature);
        }

        let mut bals = HashMap::new();
        bals.insert(trn.to(), trn.amount());
        tracing::debug!(to = %trn.to(), amount = trn.amount(), "bank created");

        Ok(Self {
            inner: RwLock::new(BankInner {
                signature: trn.signature(),
                bals,
            }),
        })
    }

    /// The current chain signature of the bank
    ///
    /// This is the signature of the latest accepted transaction.
    pub fn signature(&self) -> Signature {
        self.read().signature
    }

    /// The balance of an account given its public key
    ///
    /// Accounts the bank has never seen have a balance of 0.
    pub fn balance_of(&self, pub_key: &PublicKey) -> u32 {
        self.read().bals.get(pub_key).copied().unwrap_or(0)
    }

    /// Validates a transaction against the current state of the bank and
    /// folds it into the balances
    ///
    /// The first violated rule is returned and the bank is left unchanged.
    pub fn transaction(&self, trn: Transaction) -> Result<(), TransactionError> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        trn.check(&inner.bals, &inner.signature)?;

        tracing::debug!(
            from = %trn.from(),
            to = %trn.to(),
            amount = trn.amount(),
            "transaction accepted"
        );
        inner.signature = trn.signature();
        trn.apply(&mut inner.bals);
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BankInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Account;

    fn active_bank(minter: &Account, amount: u32) -> Bank {
        Bank::new(minter.genesis_transaction(amount)).unwrap()
    }

    #[test]
    fn starts_from_a_genesis_transaction() {
        let a = Account::generate();
        let trn = a.genesis_transaction(1000);
        let bank = Bank::new(trn.clone()).unwrap();

        assert_eq!(bank.balance_of(&a.public_key()), 1000);
        assert_eq!(bank.signature(), trn.signature());
    }

    #[test]
    fn rejects_an_invalid_genesis_transaction() {
        let a = Account::generate();

        let err = Bank::new(a.genesis_transaction(0)).unwrap_err();
        assert!(matches!(err, TransactionError::AmountZero));

        let not_first = a.transaction(a.public_key(), 10, &a.sign(b"not the start"));
        let err = Bank::new(not_first).unwrap_err();
        assert!(matches!(err, TransactionError::BadSignature));
    }

    #[test]
    fn processes_transfers() {
        let a = Account::generate();
        let b = Account::generate();
        let bank = active_bank(&a, 1000);

        bank.transaction(a.transaction(b.public_key(), 200, &bank.signature()))
            .unwrap();
        assert_eq!(bank.balance_of(&a.public_key()), 800);
        assert_eq!(bank.balance_of(&b.public_key()), 200);

        bank.transaction(b.transaction(a.public_key(), 50, &bank.signature()))
            .unwrap();
        assert_eq!(bank.balance_of(&a.public_key()), 850);
        assert_eq!(bank.balance_of(&b.public_key()), 150);
    }

    #[test]
    fn rejects_invalid_transfers_without_mutation() {
        let a = Account::generate();
        let b = Account::generate();
        let bank = active_bank(&a, 100);
        let signature = bank.signature();

        let rejected = [
            (
                a.transaction(b.public_key(), 0, &signature),
                TransactionError::AmountZero,
            ),
            (
                a.transaction(a.public_key(), 10, &signature),
                TransactionError::SameSenderReceiver,
            ),
            (
                a.transaction(b.public_key(), 101, &signature),
                TransactionError::AmountExceedsBalance,
            ),
            (
                a.transaction(b.public_key(), 10, &a.sign(b"stale")),
                TransactionError::BadSignature,
            ),
        ];
        for (trn, expected) in rejected {
            let err = bank.transaction(trn).unwrap_err();
            assert_eq!(std::mem::discriminant(&err), std::mem::discriminant(&expected));
            assert_eq!(bank.balance_of(&a.public_key()), 100);
            assert_eq!(bank.balance_of(&b.public_key()), 0);
            assert_eq!(bank.signature(), signature);
        }
    }

    #[test]
    fn rejects_replayed_transactions() {
        let a = Account::generate();
        let b = Account::generate();
        let bank = active_bank(&a, 1000);

        let first = a.transaction(b.public_key(), 10, &bank.signature());
        let second = a.transaction(b.public_key(), 20, &bank.signature());

        bank.transaction(first).unwrap();
        let err = bank.transaction(second).unwrap_err();
        assert!(matches!(err, TransactionError::BadSignature));
        assert_eq!(bank.balance_of(&b.public_key()), 10);
    }

    #[test]
    fn drops_accounts_at_zero_balance() {
        let a = Account::generate();
        let b = Account::generate();
        let bank = active_bank(&a, 100);

        bank.transaction(a.transaction(b.public_key(), 100, &bank.signature()))
            .unwrap();
        assert_eq!(bank.balance_of(&a.public_key()), 0);
        assert!(!bank.read().bals.contains_key(&a.public_key()));
    }

    #[test]
    fn matches_the_ledger_on_a_shared_history() {
        let a = Account::generate();
        let b = Account::generate();
        let c = Account::generate();

        let ledger = crate::Ledger::new();
        ledger
            .add_genesis_transaction(a.genesis_transaction(5000))
            .unwrap();
        ledger
            .add_transaction(a.transaction(b.public_key(), 1200, &ledger.signature()))
            .unwrap();
        ledger
            .add_transaction(b.transaction(c.public_key(), 300, &ledger.signature()))
            .unwrap();

        let mut trns = ledger.transactions().into_iter();
        let bank = Bank::new(trns.next().unwrap()).unwrap();
        for trn in trns {
            bank.transaction(trn).unwrap();
        }

        for key in [a.public_key(), b.public_key(), c.public_key()] {
            assert_eq!(bank.balance_of(&key), ledger.balance_of(&key));
        }
        assert_eq!(bank.signature(), ledger.signature());
    }
}
