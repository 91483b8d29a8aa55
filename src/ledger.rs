use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::{PublicKey, Signature, Transaction, TransactionError};

/// Possible errors to occur while adding a transaction to a ledger
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Transaction(#[from] TransactionError),
    #[error("The ledger already has a genesis transaction")]
    AlreadyHasGenesis,
    #[error("The ledger has no genesis transaction")]
    NoGenesis,
}

/// The admission state of an aggregate
///
/// An aggregate starts out `Empty` and becomes `Active` with the genesis
/// transaction. No transition ever leaves `Active`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum ChainState {
    #[default]
    Empty,
    /// Holds the signature of the latest accepted transaction
    Active(Signature),
}

impl ChainState {
    fn signature(&self) -> Signature {
        match self {
            ChainState::Empty => Signature::ZERO,
            ChainState::Active(signature) => *signature,
        }
    }
}

#[derive(Debug, Default)]
struct LedgerInner {
    trns: Vec<Transaction>,
    bals: HashMap<PublicKey, u32>,
    state: ChainState,
}

/// The ordered, append-only transaction history of one accounting domain
///
/// The ledger validates and admits transactions one at a time. Next to the
/// history it maintains a balance index, updated incrementally on admission,
/// and the current chain signature, which every new transaction must be
/// signed against. Admission is all or nothing: a rejected transaction
/// leaves the ledger untouched.
///
/// All operations are safe to call from multiple threads; reads may run
/// concurrently, mutations are serialized.
#[derive(Debug, Default)]
pub struct Ledger {
    inner: RwLock<LedgerInner>,
}

impl Ledger {
    /// Creates a new, empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the genesis transaction to the ledger
    ///
    /// Only a genesis transaction, signed against the zero signature, is
    /// valid as the first transaction of the ledger.
    pub fn add_genesis_transaction(&self, trn: Transaction) -> Result<(), LedgerError> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        if let ChainState::Active(_) = inner.state {
            return Err(LedgerError::AlreadyHasGenesis);
        }
        if trn.amount() == 0 {
            return Err(TransactionError::AmountZero.into());
        }
        if !trn.verify(&Signature::ZERO) {
            return Err(TransactionError::BadSignature.into());
        }

        tracing::debug!(to = %trn.to(), amount = trn.amount(), "genesis transaction accepted");
        inner.state = ChainState::Active(trn.signature());
        inner.bals.insert(trn.to(), trn.amount());
        inner.trns.push(trn);
        Ok(())
    }

    /// Validates a transaction against the current state of the ledger and
    /// adds it to the history
    ///
    /// The first violated rule is returned and the ledger is left unchanged.
    pub fn add_transaction(&self, trn: Transaction) -> Result<(), LedgerError> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let chain_signature = match inner.state {
            ChainState::Empty => return Err(LedgerError::NoGenesis),
            ChainState::Active(signature) => signature,
        };
        trn.check(&inner.bals, &chain_signature)?;

        tracing::debug!(
            from = %trn.from(),
            to = %trn.to(),
            amount = trn.amount(),
            "transaction accepted"
        );
        inner.state = ChainState::Active(trn.signature());
        trn.apply(&mut inner.bals);
        inner.trns.push(trn);
        Ok(())
    }

    /// The current chain signature of the ledger
    ///
    /// This is the signature of the latest accepted transaction, or the zero
    /// signature while the ledger is empty.
    pub fn signature(&self) -> Signature {
        self.read().state.signature()
    }

    /// A snapshot of all current balances
    pub fn balances(&self) -> HashMap<PublicKey, u32> {
        self.read().bals.clone()
    }

    /// The balance of an account given its public key
    ///
    /// Accounts the ledger has never seen have a balance of 0.
    pub fn balance_of(&self, pub_key: &PublicKey) -> u32 {
        self.read().bals.get(pub_key).copied().unwrap_or(0)
    }

    /// A snapshot of all transactions, in insertion order
    pub fn transactions(&self) -> Vec<Transaction> {
        self.read().trns.clone()
    }

    /// All transactions involving an account, in insertion order
    pub fn transactions_of(&self, pub_key: &PublicKey) -> Vec<Transaction> {
        self.read()
            .trns
            .iter()
            .filter(|trn| trn.from() == *pub_key || trn.to() == *pub_key)
            .cloned()
            .collect()
    }

    /// The first transaction of the ledger
    pub fn genesis_transaction(&self) -> Result<Transaction, LedgerError> {
        self.read().trns.first().cloned().ok_or(LedgerError::NoGenesis)
    }

    /// The latest transaction of the ledger
    pub fn latest_transaction(&self) -> Result<Transaction, LedgerError> {
        self.read().trns.last().cloned().ok_or(LedgerError::NoGenesis)
    }

    /// Calls `f` on each transaction in the ledger, in order
    ///
    /// If a call returns an error, the traversal stops and the error is
    /// returned immediately.
    pub fn try_for_each<F, E>(&self, mut f: F) -> Result<(), E>
    where
        F: FnMut(&Transaction) -> Result<(), E>,
    {
        for trn in &self.read().trns {
            f(trn)?;
        }
        Ok(())
    }

    /// Re-derives the validity of the whole history
    ///
    /// Replays the history from the zero signature and re-checks every
    /// transaction's signature against the chain signature produced by the
    /// previous step. A live ledger is already valid incrementally; this is
    /// for vetting an externally supplied history.
    pub fn verify(&self) -> bool {
        let inner = self.read();
        let mut chain_signature = Signature::ZERO;
        for trn in &inner.trns {
            if !trn.verify(&chain_signature) {
                return false;
            }
            chain_signature = trn.signature();
        }
        true
    }

    /// The number of transactions in the ledger
    pub fn size(&self) -> u64 {
        self.read().trns.len() as u64
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, LedgerInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}
