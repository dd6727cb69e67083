//! End-to-end workflow tests against a scripted generative service.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use tryon_genai::{GenAiError, GenAiResult, GenerativeService};
use tryon_models::{GeneratedImage, ImageFile, ImageRole, ImageSource, ItemSelection, WorkflowStep};
use tryon_workflow::{messages, InMemoryPreviewRegistry, TryOnSession, WorkflowConfig, WorkflowError};

#[derive(Default)]
struct ScriptedService {
    analyses: Mutex<VecDeque<GenAiResult<Vec<String>>>>,
    syntheses: Mutex<VecDeque<GenAiResult<GeneratedImage>>>,
    synthesis_calls: Mutex<Vec<Vec<String>>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedService {
    fn analysis(self, outcome: GenAiResult<Vec<String>>) -> Self {
        self.analyses.lock().unwrap().push_back(outcome);
        self
    }

    fn synthesis(self, outcome: GenAiResult<GeneratedImage>) -> Self {
        self.syntheses.lock().unwrap().push_back(outcome);
        self
    }

    fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    fn synthesis_calls(&self) -> Vec<Vec<String>> {
        self.synthesis_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeService for ScriptedService {
    async fn analyze_items(&self, _clothing: &ImageFile) -> GenAiResult<Vec<String>> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.analyses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected analysis call")
    }

    async fn synthesize(
        &self,
        _person: &ImageFile,
        _clothing: &ImageFile,
        selection: &ItemSelection,
    ) -> GenAiResult<GeneratedImage> {
        self.synthesis_calls
            .lock()
            .unwrap()
            .push(selection.labels().to_vec());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.syntheses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected synthesis call")
    }
}

fn png(name: &str) -> ImageFile {
    ImageFile::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
}

fn red_hat_result() -> GeneratedImage {
    GeneratedImage::from_bytes("image/png", &[0x89, b'P', b'N', b'G', 1, 2, 3])
}

async fn session_with(
    service: ScriptedService,
) -> (Arc<TryOnSession>, Arc<ScriptedService>, Arc<InMemoryPreviewRegistry>) {
    let service = Arc::new(service);
    let previews = Arc::new(InMemoryPreviewRegistry::default());
    let config = WorkflowConfig::default().with_status_interval(Duration::from_millis(2500));
    let session = Arc::new(TryOnSession::new(service.clone(), previews.clone(), config));

    session
        .select_image(ImageRole::Person, ImageSource::File, Some(png("person.png")))
        .await
        .unwrap();
    session
        .select_image(ImageRole::Clothing, ImageSource::Drop, Some(png("clothing.png")))
        .await
        .unwrap();

    (session, service, previews)
}

#[tokio::test]
async fn test_happy_path_produces_png_result() {
    let service = ScriptedService::default()
        .analysis(Ok(vec!["Red Hat".into(), "Blue Scarf".into()]))
        .synthesis(Ok(red_hat_result()));
    let (session, service, _) = session_with(service).await;

    let snapshot = session.analyze().await.unwrap();
    assert_eq!(snapshot.step, WorkflowStep::Selecting);
    assert_eq!(snapshot.detected_items, vec!["Red Hat", "Blue Scarf"]);
    assert_eq!(snapshot.selected_items, vec!["Red Hat", "Blue Scarf"]);

    let snapshot = session.confirm_selection().await.unwrap();
    assert_eq!(snapshot.step, WorkflowStep::Finished);
    assert!(snapshot.status_message.is_none());

    let result = snapshot.result.unwrap();
    assert_eq!(result.media_type, "image/png");
    assert!(result.download_filename.ends_with(".png"));

    let image = session.result().await.unwrap();
    assert!(image.data_uri().starts_with("data:image/png;base64,"));
    assert_eq!(service.synthesis_calls(), vec![vec!["Red Hat", "Blue Scarf"]]);
}

#[tokio::test]
async fn test_analysis_failure_surfaces_generic_message() {
    let service = ScriptedService::default().analysis(Err(GenAiError::Status {
        status: 500,
        body: "internal".into(),
    }));
    let (session, _, _) = session_with(service).await;

    let snapshot = session.analyze().await.unwrap();
    assert_eq!(snapshot.step, WorkflowStep::Error);
    assert_eq!(snapshot.error_message.as_deref(), Some(messages::ANALYSIS_FAILED));
    assert!(snapshot.detected_items.is_empty());
    assert!(snapshot.selected_items.is_empty());
}

#[tokio::test]
async fn test_text_only_synthesis_quotes_the_text() {
    let service = ScriptedService::default()
        .analysis(Ok(vec!["Red Hat".into()]))
        .synthesis(Err(GenAiError::TextInsteadOfImage(
            "Je ne peux pas générer cette image".into(),
        )));
    let (session, _, _) = session_with(service).await;

    session.analyze().await.unwrap();
    let snapshot = session.confirm_selection().await.unwrap();

    assert_eq!(snapshot.step, WorkflowStep::Error);
    let message = snapshot.error_message.unwrap();
    assert!(message.contains("\"Je ne peux pas générer cette image\""));
    assert!(snapshot.result.is_none());
}

#[tokio::test]
async fn test_regenerate_after_failure_reuses_labels() {
    let service = ScriptedService::default()
        .analysis(Ok(vec!["Red Hat".into(), "Blue Scarf".into()]))
        .synthesis(Err(GenAiError::NoImage))
        .synthesis(Ok(red_hat_result()));
    let (session, service, _) = session_with(service).await;

    session.analyze().await.unwrap();
    session.toggle_item("Blue Scarf").await.unwrap();

    let snapshot = session.confirm_selection().await.unwrap();
    assert_eq!(snapshot.step, WorkflowStep::Error);
    assert_eq!(snapshot.error_message.as_deref(), Some(messages::NO_IMAGE_RETURNED));

    let snapshot = session.regenerate().await.unwrap();
    assert_eq!(snapshot.step, WorkflowStep::Finished);
    assert!(snapshot.error_message.is_none());
    assert_eq!(
        service.synthesis_calls(),
        vec![vec!["Red Hat".to_string()], vec!["Red Hat".to_string()]]
    );
}

#[tokio::test]
async fn test_empty_analysis_generates_entire_item() {
    let service = ScriptedService::default()
        .analysis(Ok(vec![]))
        .synthesis(Ok(red_hat_result()));
    let (session, service, _) = session_with(service).await;

    let snapshot = session.analyze().await.unwrap();
    assert_eq!(snapshot.selected_items, vec![tryon_models::ENTIRE_ITEM_LABEL]);

    session.confirm_selection().await.unwrap();
    assert_eq!(
        service.synthesis_calls(),
        vec![vec![tryon_models::ENTIRE_ITEM_LABEL.to_string()]]
    );
}

#[tokio::test(start_paused = true)]
async fn test_status_ticker_runs_only_while_generating() {
    let gate = Arc::new(Notify::new());
    let service = ScriptedService::default()
        .analysis(Ok(vec!["Red Hat".into()]))
        .synthesis(Ok(red_hat_result()))
        .gated(gate.clone());
    let (session, _, _) = session_with(service).await;

    gate.notify_one();
    session.analyze().await.unwrap();

    let request = session.begin_confirm().await.unwrap();
    let running = {
        let session = session.clone();
        tokio::spawn(async move { session.run_synthesis(request).await })
    };

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.step, WorkflowStep::Generating);
    assert_eq!(snapshot.status_message.as_deref(), Some(messages::GENERATING_STATUS[0]));

    tokio::time::sleep(Duration::from_millis(2600)).await;
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.status_message.as_deref(), Some(messages::GENERATING_STATUS[1]));

    gate.notify_one();
    let snapshot = running.await.unwrap();
    assert_eq!(snapshot.step, WorkflowStep::Finished);
    assert!(snapshot.status_message.is_none());
}

#[tokio::test]
async fn test_second_analyze_in_flight_is_rejected() {
    let gate = Arc::new(Notify::new());
    let service = ScriptedService::default()
        .analysis(Ok(vec!["Red Hat".into()]))
        .gated(gate.clone());
    let (session, _, _) = session_with(service).await;

    let request = session.begin_analysis().await.unwrap();
    let err = session.analyze().await.unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidTransition { .. }));

    gate.notify_one();
    let snapshot = session.run_analysis(request).await;
    assert_eq!(snapshot.step, WorkflowStep::Selecting);
}

#[tokio::test]
async fn test_reset_during_synthesis_discards_result() {
    let gate = Arc::new(Notify::new());
    let service = ScriptedService::default()
        .analysis(Ok(vec!["Red Hat".into()]))
        .synthesis(Ok(red_hat_result()))
        .gated(gate.clone());
    let (session, _, previews) = session_with(service).await;

    gate.notify_one();
    session.analyze().await.unwrap();

    let request = session.begin_confirm().await.unwrap();
    let running = {
        let session = session.clone();
        tokio::spawn(async move { session.run_synthesis(request).await })
    };

    let snapshot = session.reset().await;
    assert_eq!(snapshot.step, WorkflowStep::Idle);
    assert!(snapshot.status_message.is_none());
    assert_eq!(previews.live_count(), 0);

    gate.notify_one();
    let snapshot = running.await.unwrap();
    assert_eq!(snapshot.step, WorkflowStep::Idle);
    assert!(snapshot.result.is_none());
    assert!(session.result().await.is_none());
}

#[tokio::test]
async fn test_replacing_images_keeps_one_preview_per_slot() {
    let (session, _, previews) = session_with(ScriptedService::default()).await;
    assert_eq!(previews.live_count(), 2);

    for i in 0..5 {
        let name = format!("person-{}.png", i);
        session
            .select_image(ImageRole::Person, ImageSource::Camera, Some(png(&name)))
            .await
            .unwrap();
        assert_eq!(previews.live_count(), 2);
    }

    let snapshot = session
        .select_image(ImageRole::Clothing, ImageSource::File, None)
        .await
        .unwrap();
    assert!(snapshot.clothing.is_none());
    assert_eq!(previews.live_count(), 1);
    assert_eq!(previews.created_count() - previews.revoked_count(), 1);
}
