//! Try-on session orchestration.
//!
//! `TryOnSession` owns the workflow store and the generating status ticker,
//! and sequences the calls to the generative service. The store lock is only
//! held for the transition itself, never across a service call.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;
use tracing::Instrument;
use tryon_genai::GenerativeService;
use tryon_models::{GeneratedImage, ImageFile, ImageRole, ImageSource, WorkflowSnapshot, WorkflowStep};
use uuid::Uuid;

use crate::camera::CaptureSession;
use crate::config::WorkflowConfig;
use crate::error::{WorkflowError, WorkflowResult};
use crate::logging::WorkflowLogger;
use crate::metrics;
use crate::preview::PreviewRegistry;
use crate::status::StatusTicker;
use crate::store::{AnalysisRequest, SynthesisRequest, WorkflowStore};

struct SessionState {
    store: WorkflowStore,
    ticker: Option<StatusTicker>,
}

/// A single user's try-on workflow.
pub struct TryOnSession {
    id: String,
    service: Arc<dyn GenerativeService>,
    config: WorkflowConfig,
    state: Mutex<SessionState>,
}

impl TryOnSession {
    pub fn new(
        service: Arc<dyn GenerativeService>,
        previews: Arc<dyn PreviewRegistry>,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            service,
            config,
            state: Mutex::new(SessionState {
                store: WorkflowStore::new(previews),
                ticker: None,
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    // ========================================================================
    // Acquisition
    // ========================================================================

    /// Place an image into a slot, or clear it with `None`.
    pub async fn select_image(
        &self,
        role: ImageRole,
        source: ImageSource,
        file: Option<ImageFile>,
    ) -> WorkflowResult<WorkflowSnapshot> {
        let logger = WorkflowLogger::new(&self.id, "acquisition");
        let description = file
            .as_ref()
            .map(|f| format!("{} ({}, {} bytes)", f.name(), f.media_type(), f.len()));

        let mut state = self.state.lock().await;
        if let Err(e) = state.store.select_image(role, file) {
            logger.log_warning(&format!("{} image rejected: {}", role, e));
            return Err(e);
        }

        match description {
            Some(description) => {
                metrics::record_image_selected(role.as_str(), source.as_str());
                logger.log_progress(&format!("{} image set from {}: {}", role, source, description));
            }
            None => logger.log_progress(&format!("{} image cleared", role)),
        }

        Ok(self.snapshot_of(&state))
    }

    /// Accept a camera capture into a slot. The camera stream stops either way.
    pub async fn accept_capture(
        &self,
        role: ImageRole,
        capture: CaptureSession,
    ) -> WorkflowResult<WorkflowSnapshot> {
        let file = capture.accept()?;
        self.select_image(role, ImageSource::Camera, Some(file)).await
    }

    // ========================================================================
    // Analysis
    // ========================================================================

    /// Start analysis of the clothing image.
    pub async fn begin_analysis(&self) -> WorkflowResult<AnalysisRequest> {
        let mut state = self.state.lock().await;
        let request = state.store.begin_analysis();
        self.after_trigger(&mut state, "analysis", request)
    }

    /// Run a begun analysis and apply its outcome.
    pub async fn run_analysis(&self, request: AnalysisRequest) -> WorkflowSnapshot {
        let logger = WorkflowLogger::new(&self.id, "analysis");
        logger.log_start(&format!("detecting items in {}", request.clothing.name()));

        let started = Instant::now();
        let outcome = self
            .service
            .analyze_items(&request.clothing)
            .instrument(logger.create_span())
            .await
            .map_err(WorkflowError::AnalysisFailure);
        let elapsed = started.elapsed().as_secs_f64();

        match &outcome {
            Ok(labels) => {
                metrics::record_analysis("success", elapsed);
                logger.log_completion(&format!("{} items detected in {:.2}s", labels.len(), elapsed));
            }
            Err(e) => {
                metrics::record_analysis("failure", elapsed);
                logger.log_error(&e.to_string());
            }
        }

        let mut state = self.state.lock().await;
        if !state.store.complete_analysis(request.epoch, outcome) {
            metrics::record_stale_response("analysis");
            logger.log_warning("analysis result discarded, workflow was reset");
        }
        self.sync_ticker(&mut state);
        self.snapshot_of(&state)
    }

    /// Begin and run analysis to completion.
    pub async fn analyze(&self) -> WorkflowResult<WorkflowSnapshot> {
        let request = self.begin_analysis().await?;
        Ok(self.run_analysis(request).await)
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub async fn toggle_item(&self, label: &str) -> WorkflowResult<WorkflowSnapshot> {
        let mut state = self.state.lock().await;
        let toggled = state.store.toggle_item(label);
        self.after_trigger(&mut state, "selection", toggled)?;
        Ok(self.snapshot_of(&state))
    }

    /// Discard the detected items and return to idle.
    pub async fn cancel_selection(&self) -> WorkflowResult<WorkflowSnapshot> {
        let mut state = self.state.lock().await;
        let cancelled = state.store.cancel_selection();
        self.after_trigger(&mut state, "selection", cancelled)?;
        Ok(self.snapshot_of(&state))
    }

    // ========================================================================
    // Synthesis
    // ========================================================================

    /// Confirm the current selection and start synthesis.
    pub async fn begin_confirm(&self) -> WorkflowResult<SynthesisRequest> {
        let mut state = self.state.lock().await;
        let request = state.store.begin_synthesis();
        self.after_trigger(&mut state, "synthesis", request)
    }

    /// Restart synthesis with the last confirmed selection.
    pub async fn begin_regenerate(&self) -> WorkflowResult<SynthesisRequest> {
        let mut state = self.state.lock().await;
        let request = state.store.begin_regenerate();
        self.after_trigger(&mut state, "synthesis", request)
    }

    /// Run a begun synthesis and apply its outcome.
    pub async fn run_synthesis(&self, request: SynthesisRequest) -> WorkflowSnapshot {
        let logger = WorkflowLogger::new(&self.id, "synthesis");
        logger.log_start(&format!("applying {:?}", request.selection.labels()));

        let started = Instant::now();
        let outcome = self
            .service
            .synthesize(&request.person, &request.clothing, &request.selection)
            .instrument(logger.create_span())
            .await
            .map_err(WorkflowError::from_synthesis);
        let elapsed = started.elapsed().as_secs_f64();

        match &outcome {
            Ok(image) => {
                metrics::record_synthesis("success", elapsed);
                logger.log_completion(&format!("{} image generated in {:.2}s", image.media_type, elapsed));
            }
            Err(e) => {
                metrics::record_synthesis("failure", elapsed);
                logger.log_error(&e.to_string());
            }
        }

        let mut state = self.state.lock().await;
        if !state.store.complete_synthesis(request.epoch, outcome) {
            metrics::record_stale_response("synthesis");
            logger.log_warning("synthesis result discarded, workflow was reset");
        }
        self.sync_ticker(&mut state);
        self.snapshot_of(&state)
    }

    /// Confirm and run synthesis to completion.
    pub async fn confirm_selection(&self) -> WorkflowResult<WorkflowSnapshot> {
        let request = self.begin_confirm().await?;
        Ok(self.run_synthesis(request).await)
    }

    /// Regenerate and run synthesis to completion.
    pub async fn regenerate(&self) -> WorkflowResult<WorkflowSnapshot> {
        let request = self.begin_regenerate().await?;
        Ok(self.run_synthesis(request).await)
    }

    // ========================================================================
    // Reset and read side
    // ========================================================================

    /// Return to idle, releasing both images and all derived state.
    pub async fn reset(&self) -> WorkflowSnapshot {
        let mut state = self.state.lock().await;
        let was = state.store.step();
        state.store.reset();
        self.sync_ticker(&mut state);

        WorkflowLogger::new(&self.id, "reset").log_progress(&format!("reset from {}", was));
        self.snapshot_of(&state)
    }

    pub async fn snapshot(&self) -> WorkflowSnapshot {
        let state = self.state.lock().await;
        self.snapshot_of(&state)
    }

    pub async fn step(&self) -> WorkflowStep {
        self.state.lock().await.store.step()
    }

    /// The generated image, present only when finished.
    pub async fn result(&self) -> Option<GeneratedImage> {
        self.state.lock().await.store.generated().cloned()
    }

    /// Log a trigger outcome and keep the ticker in step.
    fn after_trigger<T>(
        &self,
        state: &mut SessionState,
        operation: &str,
        result: WorkflowResult<T>,
    ) -> WorkflowResult<T> {
        if let Err(e) = &result {
            WorkflowLogger::new(&self.id, operation).log_warning(&format!("trigger rejected: {}", e));
        }
        self.sync_ticker(state);
        result
    }

    /// Run the status ticker exactly while generating.
    fn sync_ticker(&self, state: &mut SessionState) {
        if state.store.step() == WorkflowStep::Generating {
            if state.ticker.is_none() {
                state.ticker = Some(StatusTicker::start(
                    self.config.status_messages.clone(),
                    self.config.status_interval,
                ));
            }
        } else {
            state.ticker = None;
        }
    }

    fn snapshot_of(&self, state: &SessionState) -> WorkflowSnapshot {
        let status = state.ticker.as_ref().map(|t| t.current());
        state.store.snapshot(status)
    }
}

impl std::fmt::Debug for TryOnSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TryOnSession")
            .field("id", &self.id)
            .field("config", &self.config)
            .finish()
    }
}
