//! The `bake`, `eat`, `count` and `clear` commands.

use clap::Subcommand;
use tracing::warn;

use cookiejar_client::{BatchStatus, BatchStatusEntry, CookieJarClient, Gateway};

use crate::error::{CookieJarError, Result};

/// A command against the caller's own jar.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Bake cookies into the jar
    Bake {
        /// Number of cookies to bake
        amount: u64,
    },
    /// Eat cookies from the jar
    Eat {
        /// Number of cookies to eat
        amount: u64,
    },
    /// Show the number of cookies in the jar
    Count,
    /// Empty the jar
    Clear,
}

/// Run `command` and return the line to print on success.
pub async fn execute<G: Gateway>(client: &CookieJarClient<G>, command: &Command) -> Result<String> {
    match command {
        Command::Bake { amount } => committed(client.bake(*amount).await?),
        Command::Eat { amount } => committed(client.eat(*amount).await?),
        Command::Clear => committed(client.clear().await?),
        Command::Count => Ok(client.count().await?.to_string()),
    }
}

fn committed(entry: BatchStatusEntry) -> Result<String> {
    if entry.status == BatchStatus::Committed {
        return Ok(entry.status.to_string());
    }
    let reason = entry
        .rejection()
        .unwrap_or("no further detail from the gateway")
        .to_string();
    warn!(batch = %entry.id, status = %entry.status, %reason, "batch not committed");
    Err(CookieJarError::NotCommitted {
        batch_id: entry.id,
        status: entry.status,
        reason,
    })
}
