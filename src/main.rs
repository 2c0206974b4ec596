use std::env;

use anyhow::{Context, Result};
use env_logger::Env;

use kontosync::accounts;
use kontosync::sinks::{MongoDocumentSink, MySqlRelationalSink};
use kontosync::source::CsvStatementSource;
use kontosync::SyncEngine;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::try_init_from_env(Env::default().default_filter_or("kontosync=info"))?;

    let args: Vec<String> = env::args().collect();

    anyhow::ensure!(
        args.len() >= 2,
        "Usage: {} <statements.csv> [owner...]",
        args.first().map(String::as_str).unwrap_or("kontosync")
    );

    let statements_path = &args[1];
    let owners = &args[2..];

    let mysql_url = env::var("KONTOSYNC_MYSQL_URL")
        .context("KONTOSYNC_MYSQL_URL must point at the relational store")?;
    let mongo_url = env::var("KONTOSYNC_MONGO_URL")
        .context("KONTOSYNC_MONGO_URL must point at the document store")?;
    let mongo_db = env::var("KONTOSYNC_MONGO_DB").unwrap_or_else(|_| "fin71".to_string());

    let source = CsvStatementSource::from_path(statements_path)
        .with_context(|| format!("Failed to open statements file '{}'", statements_path))?;

    let relational = MySqlRelationalSink::connect(&mysql_url)
        .await
        .context("Failed to connect to the relational store")?;
    relational
        .ensure_schema()
        .await
        .context("Failed to prepare the relational schema")?;

    let documents = MongoDocumentSink::connect(&mongo_url, &mongo_db)
        .await
        .context("Failed to connect to the document store")?;

    let engine = SyncEngine::new(source, relational, documents);

    let known = engine
        .list_accounts()
        .await
        .context("Failed to read accounts from the statements file")?;

    // Without owners the run covers every account the file mentions; with
    // owners the registered accounts win, carrying their stored cursors.
    let accounts = if owners.is_empty() {
        known
    } else {
        let mut selected = Vec::new();
        for owner in owners {
            let mut owned = accounts::for_owner(engine.relational().pool(), owner)
                .await
                .with_context(|| format!("Failed to load accounts for owner '{}'", owner))?;
            for account in &mut owned {
                if let Some(row) = known.iter().find(|a| a.key() == account.key()) {
                    account.iban = row.iban.clone();
                    account.bic = row.bic.clone();
                }
            }
            selected.extend(owned);
        }
        selected
    };

    engine.run(&accounts).await;

    Ok(())
}
