pub use self::{
    account::{Account, AccountError},
    bank::Bank,
    keys::{PrivateKey, PublicKey, Signature, BURN_ADDRESS},
    ledger::{Ledger, LedgerError},
    transaction::{Transaction, TransactionError},
};

mod account;
mod bank;
mod keys;
mod ledger;
mod transaction;
