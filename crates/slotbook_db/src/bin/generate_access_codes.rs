//! Bulk access-code generation.
//!
//! Usage: `generate_access_codes [count]` (default 5). Reads the database
//! URL from `DATABASE_URL` or the loaded configuration, inserts random UUID
//! v4 codes and skips duplicates.

use slotbook_db::{AccessCodeLedger, DbClient, SqlAccessCodeLedger};
use tracing::info;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_logging();

    let count: usize = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()?
        .unwrap_or(5);

    let db_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            let config = slotbook_config::load_config()?;
            config
                .database
                .ok_or("No DATABASE_URL and no database section in config")?
                .url
        }
    };

    let client = DbClient::from_url(&db_url).await?;
    let ledger = SqlAccessCodeLedger::new(client);
    ledger.init_schema().await?;

    let mut inserted = 0usize;
    for _ in 0..count {
        let code = Uuid::new_v4().to_string();
        if ledger.insert_code(&code).await? {
            println!("{code}");
            inserted += 1;
        }
    }

    info!("Generated {} access codes.", inserted);
    Ok(())
}

fn init_logging() {
    slotbook_config::ensure_dotenv_loaded();
    tracing_subscriber::fmt().with_env_filter("info").init();
}
