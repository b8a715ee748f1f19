//! Subcommand implementations.

use std::sync::Arc;

use apiweave_application::{ApplicationError, EventBus, LoadOrderEditor, LoadOrderEditorInput};
use apiweave_infrastructure::{
    AppConfig, CollectionStoreError, ConfigError, FileCollectionStore, RestClientError,
    TelemetryError, TokioFileSystem,
};
use apiweave_ui::{EditorSession, OrderEditorController, UiCommand, UiUpdate};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::backend::Backend;
use crate::cli::EditOp;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error(transparent)]
    Backend(#[from] RestClientError),

    #[error(transparent)]
    Store(#[from] CollectionStoreError),

    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Editor(String),

    #[error("{0} works on the file store only; unset api_base_url")]
    RequiresFileStore(&'static str),
}

/// Shared services for one CLI invocation.
pub struct AppContext {
    pub config: AppConfig,
    pub backend: Arc<Backend>,
    pub events: EventBus,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Result<Self, CliError> {
        let backend = Arc::new(Backend::from_config(&config)?);
        let events = EventBus::new(config.event_capacity);
        Ok(Self {
            config,
            backend,
            events,
        })
    }

    fn file_store(
        &self,
        command: &'static str,
    ) -> Result<&FileCollectionStore<TokioFileSystem>, CliError> {
        self.backend
            .file_store()
            .ok_or(CliError::RequiresFileStore(command))
    }

    /// Logs every application event until all publishers are gone.
    pub fn spawn_event_log(&self) {
        let mut events = self.events.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => debug!(?event, "application event"),
                    Err(RecvError::Lagged(skipped)) => warn!(skipped, "event log lagged"),
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }
}

pub async fn init_collection(
    ctx: &AppContext,
    name: &str,
    description: Option<&str>,
) -> Result<(), CliError> {
    let store = ctx.file_store("init-collection")?;
    let collection = store.create_collection(name, description).await?;
    debug!(
        collection_id = %collection.id,
        data_dir = %ctx.config.data_dir.display(),
        "collection created"
    );
    println!("{}", collection.id);
    Ok(())
}

pub async fn add_workflow(
    ctx: &AppContext,
    collection_id: &str,
    name: &str,
    nodes: usize,
) -> Result<(), CliError> {
    let store = ctx.file_store("add-workflow")?;
    let item = store.add_workflow(collection_id, name, nodes).await?;
    println!("{}", item.id);
    Ok(())
}

pub async fn show(ctx: &AppContext, collection_id: &str) -> Result<(), CliError> {
    let load = LoadOrderEditor::new(Arc::clone(&ctx.backend), Arc::clone(&ctx.backend));
    let output = load
        .execute(LoadOrderEditorInput {
            collection_id: collection_id.to_string(),
        })
        .await?;

    let session = EditorSession::open(output);
    if let Some(message) = session.candidates_error() {
        return Err(CliError::Editor(message.to_string()));
    }

    print_session(&session);
    Ok(())
}

pub async fn edit(
    ctx: &AppContext,
    collection_id: &str,
    ops: &[EditOp],
    dry_run: bool,
) -> Result<(), CliError> {
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    let mut controller = OrderEditorController::new(
        Arc::clone(&ctx.backend),
        Arc::clone(&ctx.backend),
        ctx.events.clone(),
        update_tx,
    );

    controller
        .handle(UiCommand::OpenOrderEditor {
            collection_id: collection_id.to_string(),
        })
        .await;
    check_updates(&mut update_rx)?;

    for op in ops {
        let global = controller
            .session()
            .is_some_and(|s| s.editor().policy().continue_on_failure);
        let mut changed = false;
        for cmd in op.commands(global) {
            let judged = op.judged_by(&cmd);
            controller.handle(cmd).await;
            let updates = check_updates(&mut update_rx)?;
            changed |= judged && !updates.is_empty();
        }
        if !changed {
            warn!(%op, "operation had no effect");
        }
    }

    let Some(session) = controller.session() else {
        return Err(CliError::Editor("the order editor closed unexpectedly".to_string()));
    };
    print_session(session);

    if dry_run {
        println!("\n(dry run: not saved)");
        return Ok(());
    }
    if !session.is_dirty() {
        println!("\nNo changes to save.");
        return Ok(());
    }

    controller
        .handle(UiCommand::SaveOrder { close_after: true })
        .await;
    check_updates(&mut update_rx)?;
    println!("\nSaved.");
    Ok(())
}

/// Drains pending updates, turning error reports into `CliError`.
fn check_updates(
    update_rx: &mut mpsc::UnboundedReceiver<UiUpdate>,
) -> Result<Vec<UiUpdate>, CliError> {
    let mut updates = Vec::new();
    while let Ok(update) = update_rx.try_recv() {
        match update {
            UiUpdate::Error { message }
            | UiUpdate::CandidatesUnavailable { message }
            | UiUpdate::SaveFailed { message } => return Err(CliError::Editor(message)),
            other => updates.push(other),
        }
    }
    Ok(updates)
}

fn print_session(session: &EditorSession) {
    println!("Collection {}", session.collection_id());
    println!(
        "Continue on failure (collection): {}",
        yes_no(session.editor().policy().continue_on_failure)
    );
    println!();

    let rows = session.rows();
    if rows.is_empty() {
        println!("  (no workflows in the run order)");
    }
    for row in rows {
        println!(
            "  {:>2}. {:<32} {:>3} nodes  enabled={}  continue={}  [{}]",
            row.position,
            row.name,
            row.node_count,
            yes_no(row.enabled),
            yes_no(row.continue_on_failure),
            row.item_id,
        );
    }

    let available = session.available_items();
    if !available.is_empty() {
        println!("\nAvailable to add:");
        for item in available {
            println!("  - {:<32} [{}]", item.name, item.item_id);
        }
    }
}

const fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
