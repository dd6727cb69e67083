//! The workflow state machine.
//!
//! `WorkflowStore` is the only mutation surface of a try-on session. Every
//! trigger either applies a transition or returns an error and leaves the step
//! untouched (except where a missing source image forces `error`).
//!
//! Requests to the generative service are not sent from here. `begin_*`
//! returns a request value stamped with the current epoch; the caller runs
//! it and feeds the outcome back through `complete_*`. `reset` bumps the
//! epoch, so an outcome arriving afterwards is reported stale and dropped.

use std::sync::Arc;

use tryon_models::{
    DetectedItems, GeneratedImage, ImageFile, ImageRole, ItemSelection, ResultSummary,
    WorkflowSnapshot, WorkflowStep,
};

use crate::acquisition::ImageSlot;
use crate::error::{MissingInput, WorkflowError, WorkflowResult};
use crate::messages;
use crate::preview::PreviewRegistry;

/// Item analysis to run against the clothing image.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub epoch: u64,
    pub clothing: ImageFile,
}

/// Outfit synthesis to run with the confirmed selection.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub epoch: u64,
    pub person: ImageFile,
    pub clothing: ImageFile,
    pub selection: ItemSelection,
}

pub struct WorkflowStore {
    step: WorkflowStep,
    person: ImageSlot,
    clothing: ImageSlot,
    detected: DetectedItems,
    selected: ItemSelection,
    /// Selection of the last confirm, reused by regenerate
    confirmed: Option<ItemSelection>,
    generated: Option<GeneratedImage>,
    error_message: Option<String>,
    epoch: u64,
    previews: Arc<dyn PreviewRegistry>,
}

impl WorkflowStore {
    pub fn new(previews: Arc<dyn PreviewRegistry>) -> Self {
        Self {
            step: WorkflowStep::Idle,
            person: ImageSlot::new(),
            clothing: ImageSlot::new(),
            detected: DetectedItems::default(),
            selected: ItemSelection::new(),
            confirmed: None,
            generated: None,
            error_message: None,
            epoch: 0,
            previews,
        }
    }

    // ========================================================================
    // Acquisition
    // ========================================================================

    /// Place an image into a slot, or clear the slot with `None`.
    ///
    /// Allowed in every step. The previous preview of the slot is revoked.
    pub fn select_image(&mut self, role: ImageRole, file: Option<ImageFile>) -> WorkflowResult<()> {
        if let Some(file) = &file {
            if !file.is_image() {
                self.error_message = Some(messages::NOT_AN_IMAGE.to_string());
                return Err(WorkflowError::UnsupportedImage(file.media_type().to_string()));
            }
        }

        let previews = Arc::clone(&self.previews);
        self.slot_mut(role).replace(file, &previews);
        Ok(())
    }

    // ========================================================================
    // Analysis
    // ========================================================================

    /// idle → analyzing.
    pub fn begin_analysis(&mut self) -> WorkflowResult<AnalysisRequest> {
        if self.step != WorkflowStep::Idle {
            return Err(WorkflowError::invalid_transition(self.step, "analyze"));
        }

        let Some(clothing) = self.clothing.file().cloned() else {
            return Err(self.reject(WorkflowError::MissingInput(MissingInput::ClothingImage)));
        };

        self.error_message = None;
        self.generated = None;
        self.detected = DetectedItems::default();
        self.selected.clear();
        self.confirmed = None;
        self.step = WorkflowStep::Analyzing;

        Ok(AnalysisRequest {
            epoch: self.epoch,
            clothing,
        })
    }

    /// analyzing → selecting (or error).
    ///
    /// Returns `false` when the outcome is stale and was ignored.
    pub fn complete_analysis(&mut self, epoch: u64, outcome: WorkflowResult<Vec<String>>) -> bool {
        if !self.is_current(epoch, WorkflowStep::Analyzing) {
            return false;
        }

        match outcome {
            Ok(labels) => {
                self.detected = DetectedItems::from_analysis(labels);
                self.selected = self.detected.select_all();
                self.step = WorkflowStep::Selecting;
            }
            Err(e) => {
                self.detected = DetectedItems::default();
                self.selected.clear();
                self.fail(&e);
            }
        }
        true
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Toggle a detected label. Returns whether it is selected afterwards.
    pub fn toggle_item(&mut self, label: &str) -> WorkflowResult<bool> {
        if self.step != WorkflowStep::Selecting {
            return Err(WorkflowError::invalid_transition(self.step, "toggle an item"));
        }

        if !self.detected.contains(label) {
            return Err(self.reject(WorkflowError::UnknownItem(label.to_string())));
        }

        self.error_message = None;
        Ok(self.selected.toggle(label))
    }

    /// selecting → idle, discarding the detected labels.
    pub fn cancel_selection(&mut self) -> WorkflowResult<()> {
        if self.step != WorkflowStep::Selecting {
            return Err(WorkflowError::invalid_transition(self.step, "cancel the selection"));
        }

        self.detected = DetectedItems::default();
        self.selected.clear();
        self.confirmed = None;
        self.error_message = None;
        self.step = WorkflowStep::Idle;
        Ok(())
    }

    // ========================================================================
    // Synthesis
    // ========================================================================

    /// selecting → generating with the current selection.
    pub fn begin_synthesis(&mut self) -> WorkflowResult<SynthesisRequest> {
        if self.step != WorkflowStep::Selecting {
            return Err(WorkflowError::invalid_transition(self.step, "confirm"));
        }

        if self.selected.is_empty() {
            return Err(self.reject(WorkflowError::MissingInput(MissingInput::Selection)));
        }

        let selection = self.selected.clone();
        self.confirmed = Some(selection.clone());
        self.prepare_synthesis(selection)
    }

    /// finished/error → generating with the last confirmed selection.
    pub fn begin_regenerate(&mut self) -> WorkflowResult<SynthesisRequest> {
        if !self.step.can_regenerate() {
            return Err(WorkflowError::invalid_transition(self.step, "regenerate"));
        }

        let Some(selection) = self.confirmed.clone().filter(|s| !s.is_empty()) else {
            return Err(self.reject(WorkflowError::MissingInput(MissingInput::Selection)));
        };

        self.prepare_synthesis(selection)
    }

    /// generating → finished (or error).
    ///
    /// Returns `false` when the outcome is stale and was ignored.
    pub fn complete_synthesis(&mut self, epoch: u64, outcome: WorkflowResult<GeneratedImage>) -> bool {
        if !self.is_current(epoch, WorkflowStep::Generating) {
            return false;
        }

        match outcome {
            Ok(image) => {
                self.generated = Some(image);
                self.step = WorkflowStep::Finished;
            }
            Err(e) => self.fail(&e),
        }
        true
    }

    fn prepare_synthesis(&mut self, selection: ItemSelection) -> WorkflowResult<SynthesisRequest> {
        let (Some(person), Some(clothing)) = (self.person.file().cloned(), self.clothing.file().cloned()) else {
            let err = WorkflowError::MissingInput(MissingInput::SourceImages);
            self.fail(&err);
            return Err(err);
        };

        self.error_message = None;
        self.generated = None;
        self.step = WorkflowStep::Generating;

        Ok(SynthesisRequest {
            epoch: self.epoch,
            person,
            clothing,
            selection,
        })
    }

    // ========================================================================
    // Reset
    // ========================================================================

    /// Any step → idle, releasing both images and all derived state.
    ///
    /// Outcomes of requests begun before the reset are ignored.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.person.clear();
        self.clothing.clear();
        self.detected = DetectedItems::default();
        self.selected.clear();
        self.confirmed = None;
        self.generated = None;
        self.error_message = None;
        self.step = WorkflowStep::Idle;
    }

    // ========================================================================
    // Read side
    // ========================================================================

    pub fn snapshot(&self, status_message: Option<String>) -> WorkflowSnapshot {
        WorkflowSnapshot {
            step: self.step,
            person: self.person.summary(),
            clothing: self.clothing.summary(),
            detected_items: self.detected.labels().to_vec(),
            selected_items: self.selected.labels().to_vec(),
            error_message: self.error_message.clone(),
            status_message,
            result: self.generated.as_ref().map(|image| ResultSummary {
                media_type: image.media_type.clone(),
                download_filename: image.download_filename(),
            }),
        }
    }

    pub fn step(&self) -> WorkflowStep {
        self.step
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn image(&self, role: ImageRole) -> &ImageSlot {
        match role {
            ImageRole::Person => &self.person,
            ImageRole::Clothing => &self.clothing,
        }
    }

    pub fn detected(&self) -> &DetectedItems {
        &self.detected
    }

    pub fn selected(&self) -> &ItemSelection {
        &self.selected
    }

    pub fn confirmed(&self) -> Option<&ItemSelection> {
        self.confirmed.as_ref()
    }

    pub fn generated(&self) -> Option<&GeneratedImage> {
        self.generated.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    fn slot_mut(&mut self, role: ImageRole) -> &mut ImageSlot {
        match role {
            ImageRole::Person => &mut self.person,
            ImageRole::Clothing => &mut self.clothing,
        }
    }

    fn is_current(&self, epoch: u64, step: WorkflowStep) -> bool {
        epoch == self.epoch && self.step == step
    }

    /// Record a rejected trigger without changing the step.
    fn reject(&mut self, err: WorkflowError) -> WorkflowError {
        self.error_message = Some(err.user_message());
        err
    }

    fn fail(&mut self, err: &WorkflowError) {
        self.error_message = Some(err.user_message());
        self.step = WorkflowStep::Error;
    }
}

impl std::fmt::Debug for WorkflowStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowStore")
            .field("step", &self.step)
            .field("epoch", &self.epoch)
            .field("person", &self.person)
            .field("clothing", &self.clothing)
            .field("detected", &self.detected)
            .field("selected", &self.selected)
            .field("error_message", &self.error_message)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::InMemoryPreviewRegistry;
    use tryon_genai::GenAiError;
    use tryon_models::ENTIRE_ITEM_LABEL;

    fn store() -> (WorkflowStore, Arc<InMemoryPreviewRegistry>) {
        let registry = Arc::new(InMemoryPreviewRegistry::default());
        (WorkflowStore::new(registry.clone()), registry)
    }

    fn png(name: &str) -> ImageFile {
        ImageFile::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
    }

    fn with_images() -> (WorkflowStore, Arc<InMemoryPreviewRegistry>) {
        let (mut store, registry) = store();
        store.select_image(ImageRole::Person, Some(png("person.png"))).unwrap();
        store.select_image(ImageRole::Clothing, Some(png("clothing.png"))).unwrap();
        (store, registry)
    }

    fn selecting(labels: &[&str]) -> (WorkflowStore, Arc<InMemoryPreviewRegistry>) {
        let (mut store, registry) = with_images();
        let request = store.begin_analysis().unwrap();
        let labels = labels.iter().map(|s| s.to_string()).collect();
        assert!(store.complete_analysis(request.epoch, Ok(labels)));
        (store, registry)
    }

    fn finished() -> (WorkflowStore, Arc<InMemoryPreviewRegistry>) {
        let (mut store, registry) = selecting(&["Red Hat", "Blue Scarf"]);
        let request = store.begin_synthesis().unwrap();
        let image = GeneratedImage::new("image/png", "AAAA");
        assert!(store.complete_synthesis(request.epoch, Ok(image)));
        (store, registry)
    }

    #[test]
    fn test_analysis_selects_all_labels() {
        let (store, _) = selecting(&["Red Hat", "Blue Scarf"]);
        assert_eq!(store.step(), WorkflowStep::Selecting);
        assert_eq!(store.detected().labels(), &["Red Hat", "Blue Scarf"]);
        assert_eq!(store.selected().labels(), &["Red Hat", "Blue Scarf"]);
    }

    #[test]
    fn test_empty_analysis_yields_preselected_sentinel() {
        let (store, _) = selecting(&[]);
        assert_eq!(store.detected().labels(), &[ENTIRE_ITEM_LABEL]);
        assert_eq!(store.selected().labels(), &[ENTIRE_ITEM_LABEL]);
    }

    #[test]
    fn test_analyze_without_clothing_sets_message_only() {
        let (mut store, _) = store();
        store.select_image(ImageRole::Person, Some(png("p.png"))).unwrap();

        let err = store.begin_analysis().unwrap_err();
        assert!(matches!(err, WorkflowError::MissingInput(MissingInput::ClothingImage)));
        assert_eq!(store.step(), WorkflowStep::Idle);
        assert_eq!(store.error_message(), Some(messages::MISSING_CLOTHING_IMAGE));
    }

    #[test]
    fn test_analysis_failure_moves_to_error() {
        let (mut store, _) = with_images();
        let request = store.begin_analysis().unwrap();
        let err = WorkflowError::AnalysisFailure(GenAiError::malformed("not an array"));

        assert!(store.complete_analysis(request.epoch, Err(err)));
        assert_eq!(store.step(), WorkflowStep::Error);
        assert_eq!(store.error_message(), Some(messages::ANALYSIS_FAILED));
        assert!(store.detected().is_empty());
    }

    #[test]
    fn test_confirm_on_empty_selection_is_noop() {
        let (mut store, _) = selecting(&["Red Hat"]);
        assert!(!store.toggle_item("Red Hat").unwrap());

        let err = store.begin_synthesis().unwrap_err();
        assert!(matches!(err, WorkflowError::MissingInput(MissingInput::Selection)));
        assert_eq!(store.step(), WorkflowStep::Selecting);
        assert_eq!(store.error_message(), Some(messages::EMPTY_SELECTION));
        assert!(store.confirmed().is_none());
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let (mut store, _) = selecting(&["Red Hat", "Blue Scarf"]);
        let before = store.selected().clone();

        assert!(!store.toggle_item("Blue Scarf").unwrap());
        assert!(store.toggle_item("Blue Scarf").unwrap());

        let mut after: Vec<_> = store.selected().labels().to_vec();
        let mut expected: Vec<_> = before.labels().to_vec();
        after.sort();
        expected.sort();
        assert_eq!(after, expected);
    }

    #[test]
    fn test_toggle_unknown_label_rejected() {
        let (mut store, _) = selecting(&["Red Hat"]);
        let err = store.toggle_item("Green Shoes").unwrap_err();
        assert!(matches!(err, WorkflowError::UnknownItem(_)));
        assert_eq!(store.selected().labels(), &["Red Hat"]);
    }

    #[test]
    fn test_cancel_selection_returns_to_idle() {
        let (mut store, _) = selecting(&["Red Hat"]);
        store.cancel_selection().unwrap();
        assert_eq!(store.step(), WorkflowStep::Idle);
        assert!(store.detected().is_empty());
        assert!(store.selected().is_empty());
        assert!(store.image(ImageRole::Clothing).file().is_some());
    }

    #[test]
    fn test_synthesis_request_carries_selection() {
        let (mut store, _) = selecting(&["Red Hat", "Blue Scarf"]);
        store.toggle_item("Red Hat").unwrap();

        let request = store.begin_synthesis().unwrap();
        assert_eq!(store.step(), WorkflowStep::Generating);
        assert_eq!(request.selection.labels(), &["Blue Scarf"]);
        assert_eq!(request.person.name(), "person.png");
        assert_eq!(request.clothing.name(), "clothing.png");
    }

    #[test]
    fn test_missing_source_images_at_confirm_is_error() {
        let (mut store, registry) = selecting(&["Red Hat"]);
        store.select_image(ImageRole::Person, None).unwrap();
        assert_eq!(registry.live_count(), 1);

        let err = store.begin_synthesis().unwrap_err();
        assert!(matches!(err, WorkflowError::MissingInput(MissingInput::SourceImages)));
        assert_eq!(store.step(), WorkflowStep::Error);
        assert_eq!(store.error_message(), Some(messages::MISSING_SOURCE_IMAGES));
    }

    #[test]
    fn test_text_only_synthesis_surfaces_text() {
        let (mut store, _) = selecting(&["Red Hat"]);
        let request = store.begin_synthesis().unwrap();
        let err = WorkflowError::from_synthesis(GenAiError::TextInsteadOfImage("Image trop floue".into()));

        assert!(store.complete_synthesis(request.epoch, Err(err)));
        assert_eq!(store.step(), WorkflowStep::Error);
        assert!(store.error_message().unwrap().contains("\"Image trop floue\""));
        assert!(store.generated().is_none());
    }

    #[test]
    fn test_regenerate_reuses_confirmed_selection() {
        let (mut store, _) = finished();
        assert_eq!(store.step(), WorkflowStep::Finished);

        let request = store.begin_regenerate().unwrap();
        assert_eq!(store.step(), WorkflowStep::Generating);
        assert_eq!(request.selection.labels(), &["Red Hat", "Blue Scarf"]);
        assert!(store.generated().is_none());

        let err = WorkflowError::from_synthesis(GenAiError::NoImage);
        store.complete_synthesis(request.epoch, Err(err));
        assert_eq!(store.step(), WorkflowStep::Error);

        let request = store.begin_regenerate().unwrap();
        assert_eq!(request.selection.labels(), &["Red Hat", "Blue Scarf"]);
    }

    #[test]
    fn test_regenerate_after_analysis_error_without_selection() {
        let (mut store, _) = with_images();
        let request = store.begin_analysis().unwrap();
        let err = WorkflowError::AnalysisFailure(GenAiError::NoImage);
        store.complete_analysis(request.epoch, Err(err));

        let err = store.begin_regenerate().unwrap_err();
        assert!(matches!(err, WorkflowError::MissingInput(MissingInput::Selection)));
        assert_eq!(store.step(), WorkflowStep::Error);
    }

    #[test]
    fn test_second_analyze_rejected_while_analyzing() {
        let (mut store, _) = with_images();
        store.begin_analysis().unwrap();

        let err = store.begin_analysis().unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::InvalidTransition {
                step: WorkflowStep::Analyzing,
                ..
            }
        ));
        assert_eq!(store.step(), WorkflowStep::Analyzing);
        assert!(store.error_message().is_none());
    }

    #[test]
    fn test_invalid_triggers_leave_state_untouched() {
        let (mut store, _) = finished();
        assert!(store.begin_synthesis().is_err());
        assert!(store.toggle_item("Red Hat").is_err());
        assert!(store.cancel_selection().is_err());
        assert!(store.begin_analysis().is_err());
        assert_eq!(store.step(), WorkflowStep::Finished);
        assert!(store.generated().is_some());
    }

    #[test]
    fn test_response_after_reset_is_discarded() {
        let (mut store, _) = with_images();
        let request = store.begin_analysis().unwrap();
        store.reset();

        let labels = vec!["Red Hat".to_string()];
        assert!(!store.complete_analysis(request.epoch, Ok(labels)));
        assert_eq!(store.step(), WorkflowStep::Idle);
        assert!(store.detected().is_empty());
    }

    #[test]
    fn test_stale_synthesis_after_reset_and_new_run() {
        let (mut store, _) = selecting(&["Red Hat"]);
        let stale = store.begin_synthesis().unwrap();
        store.reset();

        store.select_image(ImageRole::Person, Some(png("p2.png"))).unwrap();
        store.select_image(ImageRole::Clothing, Some(png("c2.png"))).unwrap();
        let analysis = store.begin_analysis().unwrap();
        store.complete_analysis(analysis.epoch, Ok(vec!["Hat".into()]));
        let fresh = store.begin_synthesis().unwrap();

        let image = GeneratedImage::new("image/png", "AAAA");
        assert!(!store.complete_synthesis(stale.epoch, Ok(image.clone())));
        assert_eq!(store.step(), WorkflowStep::Generating);
        assert!(store.complete_synthesis(fresh.epoch, Ok(image)));
        assert_eq!(store.step(), WorkflowStep::Finished);
    }

    #[test]
    fn test_reset_from_every_step_clears_everything() {
        type Builder = fn() -> (WorkflowStore, Arc<InMemoryPreviewRegistry>);
        let builders: [Builder; 7] = [
            store,
            with_images,
            || {
                let (mut s, r) = with_images();
                s.begin_analysis().unwrap();
                (s, r)
            },
            || selecting(&["Red Hat"]),
            || {
                let (mut s, r) = selecting(&["Red Hat"]);
                s.begin_synthesis().unwrap();
                (s, r)
            },
            finished,
            || {
                let (mut s, r) = with_images();
                let req = s.begin_analysis().unwrap();
                s.complete_analysis(req.epoch, Err(WorkflowError::AnalysisFailure(GenAiError::NoImage)));
                (s, r)
            },
        ];

        for build in builders {
            let (mut store, registry) = build();
            store.reset();

            let snapshot = store.snapshot(None);
            assert_eq!(snapshot.step, WorkflowStep::Idle);
            assert!(snapshot.person.is_none());
            assert!(snapshot.clothing.is_none());
            assert!(snapshot.detected_items.is_empty());
            assert!(snapshot.selected_items.is_empty());
            assert!(snapshot.error_message.is_none());
            assert!(snapshot.result.is_none());
            assert!(store.confirmed().is_none());
            assert_eq!(registry.live_count(), 0);
        }
    }

    #[test]
    fn test_non_image_rejected() {
        let (mut store, registry) = store();
        let pdf = ImageFile::new("doc.pdf", "application/pdf", vec![1]);
        let err = store.select_image(ImageRole::Clothing, Some(pdf)).unwrap_err();
        assert!(matches!(err, WorkflowError::UnsupportedImage(ref t) if t == "application/pdf"));
        assert!(store.image(ImageRole::Clothing).is_empty());
        assert_eq!(registry.created_count(), 0);
    }

    #[test]
    fn test_snapshot_result_summary() {
        let (store, _) = finished();
        let snapshot = store.snapshot(None);
        let result = snapshot.result.unwrap();
        assert_eq!(result.media_type, "image/png");
        assert_eq!(result.download_filename, "mon-style-virtuel.png");
    }
}
