use anyhow::{Context as _, Result};
use dialbook_config::SourceConfig;
use dialbook_core::{AccessOutcome, ContactSession};
use dialbook_source::{
    request_access, ContactStore, JsonFileStore, MacosContactsStore, VcfFileStore,
};
use tracing::{debug, warn};

/// Requests access from the configured source once and loads the result
/// into a fresh session. A failing source degrades to a denied session.
pub fn load_session(source: &SourceConfig) -> Result<ContactSession> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .with_context(|| "start async runtime")?;
    let outcome = runtime.block_on(access(source));

    let mut session = ContactSession::new();
    let report = session.load(outcome);
    for skipped in &report.skipped {
        warn!(index = skipped.index, reason = %skipped.reason, "skipping contact record");
    }
    let summary = report.summary();
    debug!(
        loaded = summary.loaded,
        skipped = summary.skipped,
        state = ?session.state(),
        "contacts loaded"
    );
    Ok(session)
}

async fn access(source: &SourceConfig) -> AccessOutcome {
    let result = match source {
        SourceConfig::Vcf { path } => access_store(&VcfFileStore::new(path)).await,
        SourceConfig::Json { path } => access_store(&JsonFileStore::new(path)).await,
        SourceConfig::Macos { group } => {
            access_store(&MacosContactsStore::new(group.clone())).await
        }
    };
    match result {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(%source, error = %err, "contact source failed");
            AccessOutcome::Denied
        }
    }
}

async fn access_store<S: ContactStore>(store: &S) -> dialbook_source::Result<AccessOutcome> {
    let outcome = request_access(store).await?;
    debug!(
        source = store.source_name(),
        permission = %outcome.status(),
        "permission answered"
    );
    Ok(outcome)
}
