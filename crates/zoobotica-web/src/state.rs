//! Application state shared by every handler.
//!
//! Locks are held only for synchronous updates, never across an upstream
//! call.

use crate::error::ApiError;
use crate::store::ProfileStore;
use std::sync::Arc;
use tokio::sync::{watch, Mutex, RwLock};
use tracing::{debug, info, warn};
use zoobotica_core::analysis::DemoAnalyzer;
use zoobotica_core::assembly::AssemblyStore;
use zoobotica_core::error::DropError;
use zoobotica_core::latest::{Latest, Ticket};
use zoobotica_core::payload::DataTransfer;
use zoobotica_core::types::{
    BodyPart, Environment, PerformanceAnalysis, RobotSnapshot, UserPreferences,
};
use zoobotica_llm::{ImageBackend, LlmBackend, Recommendations};
use zoobotica_render::{AnalysisReceiver, RenderConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    llm: Option<Arc<dyn LlmBackend>>,
    images: Option<Arc<dyn ImageBackend>>,
    assembly: Arc<RwLock<AssemblyStore>>,
    recommendations: Arc<Mutex<Latest<Recommendations>>>,
    analysis_tx: Arc<watch::Sender<Option<Arc<PerformanceAnalysis>>>>,
    analyzer: DemoAnalyzer,
    store: Arc<ProfileStore>,
    /// Canvas settings for simulation streams.
    pub render: RenderConfig,
}

impl AppState {
    /// Create state with no backends configured. A robot saved in `store`
    /// becomes the starting assembly.
    pub fn new(store: ProfileStore, render: RenderConfig) -> Self {
        let assembly = match store.load_robot() {
            Ok(Some(robot)) => {
                info!(dir = %store.dir().display(), "restored saved robot");
                AssemblyStore::from_snapshot(&robot)
            }
            Ok(None) => AssemblyStore::new(),
            Err(e) => {
                warn!("ignoring saved robot: {}", e);
                AssemblyStore::new()
            }
        };
        let (analysis_tx, _) = watch::channel(None);

        Self {
            llm: None,
            images: None,
            assembly: Arc::new(RwLock::new(assembly)),
            recommendations: Arc::new(Mutex::new(Latest::new())),
            analysis_tx: Arc::new(analysis_tx),
            analyzer: DemoAnalyzer::new(),
            store: Arc::new(store),
            render,
        }
    }

    pub fn with_llm(mut self, backend: Arc<dyn LlmBackend>) -> Self {
        self.llm = Some(backend);
        self
    }

    pub fn with_images(mut self, backend: Arc<dyn ImageBackend>) -> Self {
        self.images = Some(backend);
        self
    }

    /// The text backend, or "API key not configured".
    pub fn llm(&self) -> Result<Arc<dyn LlmBackend>, ApiError> {
        self.llm.clone().ok_or(ApiError::NotConfigured)
    }

    /// The image backend, or "API key not configured".
    pub fn images(&self) -> Result<Arc<dyn ImageBackend>, ApiError> {
        self.images.clone().ok_or(ApiError::NotConfigured)
    }

    // --- profile ---

    // Store I/O is blocking file access; keep it off the async workers.
    async fn with_store<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&ProfileStore) -> zoobotica_core::error::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        Ok(tokio::task::spawn_blocking(move || op(&store)).await??)
    }

    pub async fn load_preferences(&self) -> Result<Option<UserPreferences>, ApiError> {
        self.with_store(|store| store.load_preferences()).await
    }

    pub async fn save_preferences(&self, prefs: UserPreferences) -> Result<UserPreferences, ApiError> {
        self.with_store(move |store| store.save_preferences(&prefs).map(|()| prefs))
            .await
    }

    pub async fn load_robot(&self) -> Result<Option<RobotSnapshot>, ApiError> {
        self.with_store(|store| store.load_robot()).await
    }

    pub async fn save_robot(&self, robot: RobotSnapshot) -> Result<RobotSnapshot, ApiError> {
        self.with_store(move |store| store.save_robot(&robot).map(|()| robot))
            .await
    }

    /// Environment implied by the saved preferences, land when there are none
    /// or they cannot be read.
    pub async fn saved_environment(&self) -> Environment {
        match self.load_preferences().await {
            Ok(prefs) => prefs.map(|p| p.environment()).unwrap_or_default(),
            Err(e) => {
                warn!("saved preferences unreadable: {}", e);
                Environment::default()
            }
        }
    }

    // --- assembly ---

    pub async fn parts(&self) -> Vec<BodyPart> {
        self.assembly.read().await.parts().to_vec()
    }

    pub async fn robot(&self, environment: Environment) -> RobotSnapshot {
        self.assembly.read().await.snapshot(environment)
    }

    /// Drop a transfer onto a slot, returning the updated part.
    pub async fn drop_on(&self, slot_id: &str, transfer: &DataTransfer) -> Result<BodyPart, DropError> {
        let mut assembly = self.assembly.write().await;
        let part = assembly.try_accept(slot_id, transfer)?.clone();
        debug!(slot = slot_id, traits = part.traits.len(), "trait accepted");
        Ok(part)
    }

    // --- recommendations ---

    pub async fn issue_recommendations(&self) -> Ticket {
        self.recommendations.lock().await.issue()
    }

    /// Store a recommendation result unless a newer request already has.
    pub async fn complete_recommendations(&self, ticket: Ticket, recs: Recommendations) -> bool {
        let kept = self.recommendations.lock().await.complete(ticket, recs);
        if !kept {
            debug!(ticket = ticket.sequence(), "stale recommendations discarded");
        }
        kept
    }

    pub async fn latest_recommendations(&self) -> Option<Recommendations> {
        self.recommendations.lock().await.get().cloned()
    }

    // --- analysis ---

    /// Validate `robot_data`, draw a demo analysis and publish it to every
    /// simulation stream.
    pub fn analyze(&self, robot_data: &serde_json::Value) -> Result<PerformanceAnalysis, ApiError> {
        let analysis = self
            .analyzer
            .analyze_robot(&mut rand::thread_rng(), robot_data)?;
        self.analysis_tx.send_replace(Some(Arc::new(analysis.clone())));
        Ok(analysis)
    }

    pub fn subscribe_analysis(&self) -> AnalysisReceiver {
        self.analysis_tx.subscribe()
    }

    /// Open subscriptions to the analysis channel. Each mounted simulation
    /// holds two: its socket's and its render loop's.
    pub fn analysis_subscribers(&self) -> usize {
        self.analysis_tx.receiver_count()
    }
}
