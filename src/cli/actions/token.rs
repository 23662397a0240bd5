use crate::storage::{DurableStorage, FileStorage};
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug)]
pub struct Args {
    pub show: bool,
    pub storage_key: String,
    pub storage_path: PathBuf,
}

/// Reports whether a token is stored; with `show` the report is the token itself.
/// Returns `None` when nothing is stored under the key.
///
/// # Errors
/// Returns an error if the storage file cannot be read.
pub fn status(args: &Args) -> Result<Option<String>> {
    let storage = FileStorage::new(&args.storage_path);
    let token = storage
        .get_item(&args.storage_key)
        .with_context(|| format!("failed to read {}", args.storage_path.display()))?;

    Ok(token.map(|token| {
        if args.show {
            token
        } else {
            format!("token stored under `{}`", args.storage_key)
        }
    }))
}

/// Removes the stored token; returns whether one was present.
///
/// # Errors
/// Returns an error if the storage file cannot be read or written.
pub fn logout(args: &Args) -> Result<bool> {
    let storage = FileStorage::new(&args.storage_path);
    let present = storage
        .get_item(&args.storage_key)
        .with_context(|| format!("failed to read {}", args.storage_path.display()))?
        .is_some();
    if present {
        storage
            .remove_item(&args.storage_key)
            .with_context(|| format!("failed to update {}", args.storage_path.display()))?;
    }
    Ok(present)
}
