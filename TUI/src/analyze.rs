//! Upload → analyze → display.
//!
//! The controller is a plain state machine. Everything that suspends (the
//! file read, the POST, the two cosmetic delays) runs in [`run_upload`],
//! which reports back through [`AnalyzeEvent`]s tagged with the upload id.
//! Events for an upload that is no longer current are dropped.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local};
use tracing::{debug, error, info, warn};

use crate::backend::{AnalysisResult, ClientError, VibeApi};
use crate::config::Pacing;
use crate::image::{ImageError, SelectedImage};

pub const STATUS_EXTRACTING: &str = "Extracting Text...";
pub const STATUS_ANALYZING: &str = "Analyzing Vibe...";
pub const STATUS_ANALYZE_FAILED: &str = "Error: Could not analyze.";
pub const STATUS_READ_FAILED: &str = "Error: Could not read file.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    Scanning,
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Default,
    Error,
}

/// Sentiments that have a badge style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentStyle {
    Positive,
    Negative,
    Neutral,
}

impl SentimentStyle {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "positive" => Some(Self::Positive),
            "negative" => Some(Self::Negative),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentimentBadge {
    pub label: String,
    /// The raw sentiment value
    pub style_key: String,
}

impl SentimentBadge {
    pub fn from_sentiment(sentiment: &str) -> Self {
        Self {
            label: capitalize(sentiment),
            style_key: sentiment.to_string(),
        }
    }

    pub fn style(&self) -> Option<SentimentStyle> {
        SentimentStyle::from_key(&self.style_key)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Render a confidence value the way it arrived: `87` → `87%`.
pub fn format_percent(value: f64) -> String {
    if value == 0.0 {
        return "0%".to_string();
    }
    format!("{}%", value)
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadTicket {
    pub id: u64,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadRejected {
    NoFile,
    /// A previous upload has not settled
    Busy,
    /// Reset first
    ShowingResult,
}

impl UploadRejected {
    pub fn hint(self) -> &'static str {
        match self {
            UploadRejected::NoFile => "No file selected",
            UploadRejected::Busy => "Still analyzing the previous meme",
            UploadRejected::ShowingResult => "Press Ctrl+R to analyze another meme",
        }
    }
}

#[derive(Debug)]
pub enum AnalyzeEvent {
    FileRead {
        upload: u64,
        result: Result<SelectedImage, ImageError>,
    },
    Analyzed {
        upload: u64,
        result: Result<AnalysisResult, ClientError>,
    },
    Reveal {
        upload: u64,
    },
    ConfidenceReady {
        upload: u64,
    },
}

impl AnalyzeEvent {
    pub fn upload(&self) -> u64 {
        match self {
            AnalyzeEvent::FileRead { upload, .. }
            | AnalyzeEvent::Analyzed { upload, .. }
            | AnalyzeEvent::Reveal { upload }
            | AnalyzeEvent::ConfidenceReady { upload } => *upload,
        }
    }
}

#[derive(Debug)]
pub struct AnalyzeController {
    stage: Stage,
    /// Path text typed by the user; holds the chosen file once selected
    pub file_input: String,
    image: Option<SelectedImage>,
    pub status: String,
    pub status_tone: Tone,
    result: Option<AnalysisResult>,
    pub result_image: Option<String>,
    pub detected_text: String,
    pub badge: SentimentBadge,
    pub confidence_width: f64,
    pub confidence_label: String,
    pub analyzed_at: Option<DateTime<Local>>,
    upload_id: u64,
    in_flight: bool,
}

impl Default for AnalyzeController {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyzeController {
    pub fn new() -> Self {
        Self {
            stage: Stage::Idle,
            file_input: String::new(),
            image: None,
            status: String::new(),
            status_tone: Tone::Default,
            result: None,
            result_image: None,
            detected_text: String::new(),
            badge: SentimentBadge::default(),
            confidence_width: 0.0,
            confidence_label: format_percent(0.0),
            analyzed_at: None,
            upload_id: 0,
            in_flight: false,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[cfg(test)]
    pub fn is_visible(&self, stage: Stage) -> bool {
        self.stage == stage
    }

    #[cfg(test)]
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub fn image(&self) -> Option<&SelectedImage> {
        self.image.as_ref()
    }

    pub fn preview_src(&self) -> Option<&str> {
        self.image.as_ref().map(|image| image.data_url.as_str())
    }

    /// Accept a selection. Only the first file counts.
    pub fn handle_upload(&mut self, files: Vec<PathBuf>) -> Result<UploadTicket, UploadRejected> {
        let path = files.into_iter().next().ok_or(UploadRejected::NoFile)?;
        if self.in_flight {
            warn!(path = %path.display(), "upload ignored, previous upload in flight");
            return Err(UploadRejected::Busy);
        }
        if self.stage == Stage::Result {
            return Err(UploadRejected::ShowingResult);
        }

        self.upload_id += 1;
        self.in_flight = true;
        self.file_input = path.display().to_string();
        info!(upload = self.upload_id, path = %path.display(), "upload accepted");

        Ok(UploadTicket {
            id: self.upload_id,
            path,
        })
    }

    pub fn apply(&mut self, event: AnalyzeEvent) {
        if event.upload() != self.upload_id {
            debug!(upload = event.upload(), current = self.upload_id, "stale analyze event dropped");
            return;
        }

        match event {
            AnalyzeEvent::FileRead { result: Ok(image), .. } => self.start_analysis(image),
            AnalyzeEvent::FileRead { result: Err(_), .. } => {
                self.image = None;
                self.fail(STATUS_READ_FAILED);
            }
            AnalyzeEvent::Analyzed { result: Ok(result), .. } => {
                self.status = STATUS_ANALYZING.to_string();
                self.result = Some(result);
            }
            AnalyzeEvent::Analyzed { result: Err(_), .. } => self.fail(STATUS_ANALYZE_FAILED),
            AnalyzeEvent::Reveal { .. } => {
                if let Some(result) = self.result.clone() {
                    self.display_results(&result);
                }
            }
            AnalyzeEvent::ConfidenceReady { .. } => {
                if let Some(confidence) = self.result.as_ref().map(|r| r.confidence) {
                    self.set_confidence(confidence);
                }
                self.in_flight = false;
            }
        }
    }

    /// Idle → Scanning with the freshly read preview.
    pub fn start_analysis(&mut self, image: SelectedImage) {
        self.image = Some(image);
        self.stage = Stage::Scanning;
        self.status = STATUS_EXTRACTING.to_string();
        self.status_tone = Tone::Default;
    }

    fn fail(&mut self, message: &str) {
        self.stage = Stage::Scanning;
        self.status = message.to_string();
        self.status_tone = Tone::Error;
        self.in_flight = false;
    }

    /// Scanning → Result. The confidence gauge is filled separately.
    pub fn display_results(&mut self, result: &AnalysisResult) {
        self.stage = Stage::Result;
        self.result_image = self.preview_src().map(str::to_string);
        self.detected_text = result.text.clone();
        self.badge = SentimentBadge::from_sentiment(&result.sentiment);
        self.analyzed_at = Some(Local::now());
    }

    pub fn set_confidence(&mut self, confidence: f64) {
        self.confidence_width = confidence;
        self.confidence_label = format_percent(confidence);
    }

    /// Result → Idle. Detected text and badge stay behind, hidden.
    pub fn reset(&mut self) -> bool {
        if self.stage != Stage::Result {
            return false;
        }
        self.stage = Stage::Idle;
        self.file_input.clear();
        self.image = None;
        self.result = None;
        self.confidence_width = 0.0;
        self.confidence_label = format_percent(0.0);
        self.status_tone = Tone::Default;
        // Late events of the finished upload must not land on the fresh view
        self.upload_id += 1;
        self.in_flight = false;
        true
    }
}

/// Read the file, post it, then pace the reveal. Never fails: every error
/// becomes an event.
pub async fn run_upload<F>(ticket: UploadTicket, api: Arc<dyn VibeApi>, pacing: Pacing, emit: F)
where
    F: Fn(AnalyzeEvent) + Send,
{
    let upload = ticket.id;

    let image = match SelectedImage::read(&ticket.path).await {
        Ok(image) => image,
        Err(e) => {
            warn!(upload, "{}", e);
            emit(AnalyzeEvent::FileRead { upload, result: Err(e) });
            return;
        }
    };
    emit(AnalyzeEvent::FileRead {
        upload,
        result: Ok(image.clone()),
    });

    match api.analyze(&image).await {
        Ok(result) => {
            info!(upload, sentiment = %result.sentiment, confidence = result.confidence, "analysis complete");
            emit(AnalyzeEvent::Analyzed { upload, result: Ok(result) });
        }
        Err(e) => {
            error!(upload, "analyze failed: {}", e);
            emit(AnalyzeEvent::Analyzed { upload, result: Err(e) });
            return;
        }
    }

    tokio::time::sleep(pacing.reveal).await;
    emit(AnalyzeEvent::Reveal { upload });

    tokio::time::sleep(pacing.confidence).await;
    emit(AnalyzeEvent::ConfidenceReady { upload });
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::backend::{HealthResponse, RecommendResponse};
    use std::collections::VecDeque;
    use std::path::Path;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    /// Scripted [`VibeApi`] shared by the controller and app tests.
    #[derive(Default)]
    pub(crate) struct MockApi {
        pub analyze: Mutex<VecDeque<Result<AnalysisResult, ClientError>>>,
        pub recommend: Mutex<VecDeque<Result<RecommendResponse, ClientError>>>,
        pub uploads: Mutex<Vec<SelectedImage>>,
        pub queries: Mutex<Vec<String>>,
    }

    impl MockApi {
        pub fn with_analysis(result: Result<AnalysisResult, ClientError>) -> Self {
            let api = Self::default();
            api.analyze.lock().unwrap().push_back(result);
            api
        }

        pub fn with_recommendations(responses: Vec<Result<RecommendResponse, ClientError>>) -> Self {
            let api = Self::default();
            api.recommend.lock().unwrap().extend(responses);
            api
        }
    }

    #[async_trait::async_trait]
    impl VibeApi for MockApi {
        async fn analyze(&self, image: &SelectedImage) -> Result<AnalysisResult, ClientError> {
            self.uploads.lock().unwrap().push(image.clone());
            self.analyze
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ClientError::Status { status: 503, message: None }))
        }

        async fn recommend(&self, text: &str) -> Result<RecommendResponse, ClientError> {
            self.queries.lock().unwrap().push(text.to_string());
            self.recommend
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ClientError::Status { status: 503, message: None }))
        }

        async fn health(&self) -> Result<HealthResponse, ClientError> {
            Ok(HealthResponse { status: "online".to_string() })
        }
    }

    pub(crate) fn lol() -> AnalysisResult {
        AnalysisResult {
            text: "LOL".to_string(),
            sentiment: "positive".to_string(),
            confidence: 87.0,
        }
    }

    fn meme_file(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("meme.png");
        std::fs::write(&path, b"not really a png").unwrap();
        path
    }

    async fn run(controller: &mut AnalyzeController, path: PathBuf, api: Arc<dyn VibeApi>) -> Vec<Stage> {
        let ticket = controller.handle_upload(vec![path]).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        run_upload(ticket, api, Pacing::immediate(), move |e| {
            let _ = tx.send(e);
        })
        .await;

        let mut stages = Vec::new();
        while let Some(event) = rx.recv().await {
            controller.apply(event);
            stages.push(controller.stage());
        }
        stages
    }

    #[tokio::test]
    async fn test_successful_analysis_renders_result() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = AnalyzeController::new();
        let api = Arc::new(MockApi::with_analysis(Ok(lol())));

        let stages = run(&mut controller, meme_file(&dir), api.clone()).await;

        assert_eq!(
            stages,
            vec![Stage::Scanning, Stage::Scanning, Stage::Result, Stage::Result]
        );
        assert_eq!(controller.badge.label, "Positive");
        assert_eq!(controller.badge.style_key, "positive");
        assert_eq!(controller.badge.style(), Some(SentimentStyle::Positive));
        assert_eq!(controller.detected_text, "LOL");
        assert_eq!(controller.confidence_label, "87%");
        assert_eq!(controller.confidence_width, 87.0);
        assert!(!controller.is_busy());

        // The server never echoes the image; the result shows the local preview
        let uploaded = api.uploads.lock().unwrap();
        assert_eq!(uploaded.len(), 1);
        assert_eq!(controller.result_image.as_deref(), Some(uploaded[0].data_url.as_str()));
    }

    #[tokio::test]
    async fn test_server_error_stays_scanning() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = AnalyzeController::new();
        let api = Arc::new(MockApi::with_analysis(Err(ClientError::Status {
            status: 500,
            message: None,
        })));

        let stages = run(&mut controller, meme_file(&dir), api).await;

        assert_eq!(stages, vec![Stage::Scanning, Stage::Scanning]);
        assert_eq!(controller.status, STATUS_ANALYZE_FAILED);
        assert_ne!(controller.status, STATUS_ANALYZING);
        assert_eq!(controller.status_tone, Tone::Error);
        assert!(controller.preview_src().is_some());
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_unreadable_file_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = AnalyzeController::new();
        let api = Arc::new(MockApi::default());

        let stages = run(&mut controller, dir.path().join("missing.png"), api.clone()).await;

        assert_eq!(stages, vec![Stage::Scanning]);
        assert_eq!(controller.status, STATUS_READ_FAILED);
        assert_eq!(controller.status_tone, Tone::Error);
        assert!(controller.preview_src().is_none());
        assert!(api.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_retry_after_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = AnalyzeController::new();
        let api = Arc::new(MockApi::with_analysis(Err(ClientError::Status {
            status: 502,
            message: None,
        })));
        api.analyze.lock().unwrap().push_back(Ok(lol()));

        run(&mut controller, meme_file(&dir), api.clone()).await;
        assert_eq!(controller.status_tone, Tone::Error);

        run(&mut controller, meme_file(&dir), api).await;
        assert_eq!(controller.stage(), Stage::Result);
        assert_eq!(controller.status, STATUS_ANALYZING);
    }

    #[test]
    fn test_first_file_wins() {
        let mut controller = AnalyzeController::new();
        let ticket = controller
            .handle_upload(vec![PathBuf::from("a.png"), PathBuf::from("b.png")])
            .unwrap();
        assert_eq!(ticket.path, PathBuf::from("a.png"));
        assert_eq!(controller.file_input, "a.png");
    }

    #[test]
    fn test_second_upload_while_in_flight_is_ignored() {
        let mut controller = AnalyzeController::new();
        controller.handle_upload(vec![PathBuf::from("a.png")]).unwrap();

        assert_eq!(
            controller.handle_upload(vec![PathBuf::from("b.png")]),
            Err(UploadRejected::Busy)
        );
        assert_eq!(controller.file_input, "a.png");
    }

    #[test]
    fn test_empty_selection_rejected() {
        let mut controller = AnalyzeController::new();
        assert_eq!(controller.handle_upload(vec![]), Err(UploadRejected::NoFile));
        assert_eq!(controller.stage(), Stage::Idle);
    }

    fn showing(result: &AnalysisResult) -> AnalyzeController {
        let mut controller = AnalyzeController::new();
        let ticket = controller.handle_upload(vec![PathBuf::from("x.png")]).unwrap();
        let image = SelectedImage::from_bytes(Path::new("x.png"), vec![1, 2, 3]);
        controller.apply(AnalyzeEvent::FileRead { upload: ticket.id, result: Ok(image) });
        controller.apply(AnalyzeEvent::Analyzed { upload: ticket.id, result: Ok(result.clone()) });
        controller.apply(AnalyzeEvent::Reveal { upload: ticket.id });
        controller
    }

    #[test]
    fn test_confidence_waits_for_its_step() {
        let mut controller = showing(&lol());
        assert_eq!(controller.stage(), Stage::Result);
        assert_eq!(controller.confidence_label, "0%");
        assert_eq!(controller.confidence_width, 0.0);

        let upload = controller.upload_id;
        controller.apply(AnalyzeEvent::ConfidenceReady { upload });
        assert_eq!(controller.confidence_label, "87%");
    }

    #[test]
    fn test_reset_returns_to_idle() {
        for confidence in [87.0, 0.0, 100.0, 140.0, -5.0] {
            let mut controller = showing(&AnalysisResult { confidence, ..lol() });
            let upload = controller.upload_id;
            controller.apply(AnalyzeEvent::ConfidenceReady { upload });

            assert!(controller.reset());
            assert_eq!(controller.stage(), Stage::Idle);
            assert!(controller.file_input.is_empty());
            assert!(controller.preview_src().is_none());
            assert_eq!(controller.confidence_label, "0%");
            assert_eq!(controller.confidence_width, 0.0);
            assert_eq!(controller.status_tone, Tone::Default);
            // Content is hidden, not wiped
            assert_eq!(controller.detected_text, "LOL");
        }
    }

    #[test]
    fn test_late_event_after_reset_is_dropped() {
        let mut controller = showing(&lol());
        let upload = controller.upload_id;
        controller.reset();

        controller.apply(AnalyzeEvent::ConfidenceReady { upload });
        assert_eq!(controller.confidence_label, "0%");
        assert_eq!(controller.stage(), Stage::Idle);
    }

    #[test]
    fn test_reset_outside_result_is_noop() {
        let mut controller = AnalyzeController::new();
        assert!(!controller.reset());
        assert_eq!(controller.stage(), Stage::Idle);
    }

    #[test]
    fn test_upload_refused_while_showing_result() {
        let mut controller = showing(&lol());
        let upload = controller.upload_id;
        controller.apply(AnalyzeEvent::ConfidenceReady { upload });

        assert_eq!(
            controller.handle_upload(vec![PathBuf::from("y.png")]),
            Err(UploadRejected::ShowingResult)
        );
    }

    #[test]
    fn test_unknown_sentiment_is_unstyled() {
        let controller = showing(&AnalysisResult {
            sentiment: "sarcastic".to_string(),
            ..lol()
        });
        assert_eq!(controller.badge.label, "Sarcastic");
        assert_eq!(controller.badge.style_key, "sarcastic");
        assert_eq!(controller.badge.style(), None);
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(87.0), "87%");
        assert_eq!(format_percent(87.5), "87.5%");
        assert_eq!(format_percent(0.0), "0%");
        assert_eq!(format_percent(140.0), "140%");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("negative"), "Negative");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("ßad"), "SSad");
    }

    #[test]
    fn test_exactly_one_stage_visible() {
        let controller = showing(&lol());
        let visible = [Stage::Idle, Stage::Scanning, Stage::Result]
            .iter()
            .filter(|s| controller.is_visible(**s))
            .count();
        assert_eq!(visible, 1);
    }
}
