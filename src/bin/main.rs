use clap::Parser;

use coin_ledger::{Account, Ledger, PublicKey};

/// A cli interface to the coin ledger
///
/// Replays a CSV of transfer orders with the columns `seed`, `to` and
/// `amount` (hex seed, hex address, integer amount). The first order mints:
/// its account issues the genesis transaction to itself and the `to` column
/// is ignored. The final balances are printed as CSV.
#[derive(Debug, Parser)]
#[clap(version)]
struct Args {
    /// The path to the orders CSV file
    filename: std::path::PathBuf,
}

#[derive(Debug, serde::Deserialize)]
struct Order {
    seed: String,
    to: PublicKey,
    amount: u32,
}

#[derive(Debug, serde::Serialize)]
struct Balance {
    account: PublicKey,
    balance: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(args.filename)?;
    let ledger = Ledger::new();

    for order in reader.deserialize() {
        let order: Order = order?;
        let account = Account::from_seed(&hex::decode(&order.seed)?)?;

        let result = match ledger.size() {
            0 => ledger.add_genesis_transaction(account.genesis_transaction(order.amount)),
            _ => {
                let trn = account.transaction(order.to, order.amount, &ledger.signature());
                ledger.add_transaction(trn)
            }
        };
        // rejected orders are just skipped
        if let Err(err) = result {
            tracing::warn!(%err, "order rejected");
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(std::io::stdout());

    for (account, balance) in ledger.balances() {
        writer.serialize(Balance { account, balance })?;
    }

    Ok(())
}
