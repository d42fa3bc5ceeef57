use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tokio::task::JoinHandle;
use wp_ai::{AnalysisGenerator, ChatResponder, ConfiguredModel, GenerativeModel, RetryPolicy};
use wp_config::WaypointConfig;
use wp_db::service::WpService;
use wp_notify::{CompletionNotifier, OutboxMailer, TextReportRenderer};

pub type Notifier = CompletionNotifier<TextReportRenderer, OutboxMailer>;

/// Shared application resources initialized once at startup.
pub struct AppContext<M = ConfiguredModel> {
    pub service: Arc<WpService>,
    pub config: WaypointConfig,
    pub analysis: Arc<AnalysisGenerator<Arc<M>>>,
    pub chat: ChatResponder<Arc<M>>,
    /// `None` when `notify.enabled` is off.
    pub notifier: Option<Arc<Notifier>>,
    pub project_root: PathBuf,
    background: Vec<JoinHandle<()>>,
}

impl AppContext {
    /// Open the project database and build the configured model.
    pub async fn init(project_root: PathBuf, config: WaypointConfig) -> anyhow::Result<Self> {
        let db_path = resolve_db_path(&project_root, &config.database.path);
        let service = WpService::new_local(&db_path)
            .await
            .with_context(|| format!("failed to open database at {db_path}"))?;
        let model = ConfiguredModel::from_config(&config.ai).context("failed to build generative model client")?;
        Ok(Self::from_parts(service, config, model, project_root))
    }
}

impl<M: GenerativeModel> AppContext<M> {
    pub fn from_parts(service: WpService, config: WaypointConfig, model: M, project_root: PathBuf) -> Self {
        let model = Arc::new(model);
        let policy = RetryPolicy::from(&config.ai.retry);
        let notifier = config.notify.enabled.then(|| {
            Arc::new(CompletionNotifier::new(
                TextReportRenderer,
                OutboxMailer::from_config(&config.notify, &project_root),
            ))
        });

        Self {
            service: Arc::new(service),
            analysis: Arc::new(AnalysisGenerator::new(Arc::clone(&model), policy)),
            chat: ChatResponder::new(model, policy, config.chat.history_window),
            notifier,
            config,
            project_root,
            background: Vec::new(),
        }
    }

    /// Keep a detached job's handle so the process can wait for it before exit.
    pub fn track(&mut self, handle: JoinHandle<()>) {
        self.background.push(handle);
    }

    /// Wait for tracked background jobs. Their failures were already logged.
    pub async fn drain_background(&mut self) {
        for handle in self.background.drain(..) {
            if let Err(error) = handle.await {
                tracing::warn!(%error, "background job panicked");
            }
        }
    }
}

/// Relative database paths live under the project root.
fn resolve_db_path(project_root: &Path, configured: &str) -> String {
    if configured == ":memory:" || Path::new(configured).is_absolute() {
        return configured.to_string();
    }
    project_root.join(configured).to_string_lossy().into_owned()
}
