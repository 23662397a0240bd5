use crate::{
    bridge::{Credentials, FormBridge, FormKind, Outcome},
    config::BridgeConfig,
    page::{MemoryPage, MemorySubmit},
    storage::FileStorage,
    transport::HttpTransport,
};
use anyhow::{Context, Result};
use secrecy::ExposeSecret;
use std::path::PathBuf;
use tracing::{debug, instrument};

#[derive(Debug)]
pub struct Args {
    pub form: FormKind,
    pub credentials: Credentials,
    pub config: BridgeConfig,
    pub storage_path: PathBuf,
}

/// Submits one form and returns the outcome together with the message
/// element text (empty when the submission was not sent).
///
/// The command line stands in for the page: the credentials fill the form's
/// two inputs and the message element is read back after the submission.
///
/// # Errors
/// Returns an error if the HTTP client cannot be built or the page contract is broken.
#[instrument(skip_all, fields(form = %args.form))]
pub async fn execute(args: Args) -> Result<(Outcome, String)> {
    let Args {
        form,
        credentials,
        config,
        storage_path,
    } = args;

    let ids = config.form_ids(form);
    let page = MemoryPage::new()
        .with_input(&ids.username_id, &credentials.username)
        .with_input(&ids.password_id, credentials.password.expose_secret())
        .with_text_element(&config.message_element_id);
    drop(credentials);

    let transport = HttpTransport::new(config.timeout)?;
    let storage = FileStorage::new(storage_path);
    debug!(storage = %storage.path().display(), "submitting");

    let bridge = FormBridge::new(config, page, storage, transport);
    let outcome = bridge
        .handle_submit(form, &MemorySubmit::new())
        .await
        .with_context(|| format!("{form} submission failed"))?;

    let message = bridge
        .page()
        .text(&bridge.config().message_element_id)
        .unwrap_or_default();

    Ok((outcome, message))
}
