//! Subcommand implementations.

pub mod account;
pub mod catalog;

use bazaar_storefront::{AppError, NoticeKind, Storefront};
use thiserror::Error;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Storefront(#[from] AppError),
}

/// Log every queued notice, errors at `warn`.
pub fn print_notices(storefront: &mut Storefront) {
    for notice in storefront.drain_notices() {
        match notice.kind {
            NoticeKind::Success => tracing::info!("{}", notice.message),
            NoticeKind::Error => tracing::warn!("{}", notice.message),
        }
    }
}
