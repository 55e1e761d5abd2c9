use std::path::{Path, PathBuf};
use std::sync::Arc;

use arboard::Clipboard;
use chrono::{DateTime, Local};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

use crate::action::Action;
use crate::analyze::{self, AnalyzeController, AnalyzeEvent, Stage};
use crate::backend::{ClientError, HealthResponse, VibeApi};
use crate::command::CommandParser;
use crate::config::{Config, Pacing, COMMANDS};
use crate::image::parse_dropped_paths;
use crate::recommend::{self, QueryRejected, RecommendController, RecommendEvent, UrlOpener, MSG_EMPTY_QUERY};
use crate::ui_state::{Focus, Tab, TabSwitcher};

/// Results of background work, applied on the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    Analyze(AnalyzeEvent),
    Recommend(RecommendEvent),
    Health(Result<HealthResponse, ClientError>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ServerHealth {
    Unknown,
    Online(DateTime<Local>),
    Offline(DateTime<Local>),
}

pub struct App {
    pub tabs: TabSwitcher,
    pub analyze: AnalyzeController,
    pub recommend: RecommendController,
    pub focus: Focus,
    pub status_message: Option<String>,
    status_expires_at: u64,
    /// Blocking notice; any key dismisses it
    pub notice: Option<String>,
    pub health: ServerHealth,
    pub server_url: String,
    pub animation_frame: usize,
    pub animation_tick: u64,
    pub should_quit: bool,
    api: Arc<dyn VibeApi>,
    opener: Box<dyn UrlOpener>,
    pacing: Pacing,
    status_timeout_ticks: u64,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(config: &Config, api: Arc<dyn VibeApi>, opener: Box<dyn UrlOpener>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            tabs: TabSwitcher::new(),
            analyze: AnalyzeController::new(),
            recommend: RecommendController::new(),
            focus: Focus::Input,
            status_message: None,
            status_expires_at: 0,
            notice: None,
            health: ServerHealth::Unknown,
            server_url: config.server_url.clone(),
            animation_frame: 0,
            animation_tick: 0,
            should_quit: false,
            api,
            opener,
            pacing: config.pacing(),
            status_timeout_ticks: config.status_timeout_ticks,
            events_tx,
            events_rx,
        }
    }

    pub fn active_tab(&self) -> Tab {
        self.tabs.active()
    }

    /// The text field of the visible view.
    pub fn input(&self) -> &str {
        match self.active_tab() {
            Tab::Analyze => &self.analyze.file_input,
            Tab::Recommend => &self.recommend.query,
        }
    }

    pub fn input_mut(&mut self) -> &mut String {
        match self.active_tab() {
            Tab::Analyze => &mut self.analyze.file_input,
            Tab::Recommend => &mut self.recommend.query,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_expires_at = self.animation_tick + self.status_timeout_ticks;
    }

    pub fn tick(&mut self) {
        self.animation_tick += 1;
        self.animation_frame = (self.animation_frame + 1) % 360;

        if self.status_message.is_some() && self.animation_tick >= self.status_expires_at {
            self.status_message = None;
        }

        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(event);
        }
    }

    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Analyze(event) => self.analyze.apply(event),
            AppEvent::Recommend(event) => self.recommend.apply(event),
            AppEvent::Health(result) => {
                let now = Local::now();
                self.health = match result {
                    Ok(health) if health.is_online() => ServerHealth::Online(now),
                    Ok(health) => {
                        warn!(status = %health.status, "server reports unexpected health");
                        ServerHealth::Offline(now)
                    }
                    Err(e) => {
                        warn!("health check failed: {}", e);
                        ServerHealth::Offline(now)
                    }
                };
            }
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::SwitchTab(tab) => self.switch_tab(tab),
            Action::NextTab => {
                self.tabs.toggle();
                self.focus = Focus::Input;
            }
            Action::Browse(files) | Action::Drop(files) => self.upload(files),
            Action::Reset => {
                if !self.analyze.reset() {
                    self.set_status("Nothing to reset");
                }
            }
            Action::CopyDetectedText => self.copy_detected_text(),
            Action::Recommend => self.get_recommendations(),
            Action::OpenMeme(index) => self.open_meme(index),
            Action::CheckHealth => self.check_health(),
            Action::Help => self.notice = Some(help_text()),
            Action::Quit => self.should_quit = true,
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.tabs.switch_tab(tab);
        self.focus = Focus::Input;
    }

    /// Drop and browse share this path.
    fn upload(&mut self, files: Vec<PathBuf>) {
        match self.analyze.handle_upload(files) {
            Ok(ticket) => {
                let api = Arc::clone(&self.api);
                let tx = self.events_tx.clone();
                tokio::spawn(analyze::run_upload(ticket, api, self.pacing, move |event| {
                    let _ = tx.send(AppEvent::Analyze(event));
                }));
            }
            Err(rejected) => self.set_status(rejected.hint()),
        }
    }

    fn get_recommendations(&mut self) {
        match self.recommend.get_recommendations() {
            Ok(ticket) => {
                info!(request = ticket.id, "searching memes");
                let api = Arc::clone(&self.api);
                let tx = self.events_tx.clone();
                tokio::spawn(recommend::run_query(ticket, api, move |event| {
                    let _ = tx.send(AppEvent::Recommend(event));
                }));
            }
            Err(QueryRejected::Empty) => self.notice = Some(MSG_EMPTY_QUERY.to_string()),
        }
    }

    fn open_meme(&mut self, index: usize) {
        match self.recommend.open(index, self.opener.as_ref()) {
            Ok(_) => self.set_status(format!("Opened meme #{} in your browser", index + 1)),
            Err(e) => self.set_status(e.to_string()),
        }
    }

    pub fn check_health(&mut self) {
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(AppEvent::Health(api.health().await));
        });
    }

    fn copy_detected_text(&mut self) {
        if self.analyze.stage() != Stage::Result {
            self.set_status("No detected text yet");
            return;
        }
        let text = self.analyze.detected_text.clone();
        match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(()) => self.set_status("Detected text copied"),
            Err(e) => {
                warn!("clipboard unavailable: {}", e);
                self.set_status(format!("Clipboard error: {}", e));
            }
        }
    }

    /// Enter in the visible text field.
    pub fn submit_input(&mut self) {
        let input = self.input().trim().to_string();

        // A vibe may start with a slash; only real commands are taken
        let is_command = match self.active_tab() {
            Tab::Analyze => CommandParser::is_command(&input),
            Tab::Recommend => CommandParser::is_known(&input),
        };
        if is_command {
            self.input_mut().clear();
            match CommandParser::parse(&input) {
                Ok(action) => self.handle_action(action),
                Err(message) => self.notice = Some(message),
            }
            return;
        }

        match self.active_tab() {
            Tab::Analyze => self.handle_action(Action::Browse(typed_paths(&input))),
            Tab::Recommend => match (self.focus, self.recommend.selected()) {
                (Focus::Gallery, Some(index)) => self.handle_action(Action::OpenMeme(index)),
                _ => self.handle_action(Action::Recommend),
            },
        }
    }

    /// Bracketed paste. On the analyze view a paste is a file drop.
    pub fn paste(&mut self, text: &str) {
        match self.active_tab() {
            Tab::Analyze => self.handle_action(Action::Drop(parse_dropped_paths(text))),
            Tab::Recommend => {
                let filtered: String = text
                    .chars()
                    .filter(|c| *c != '\r')
                    .map(|c| if c == '\n' { ' ' } else { c })
                    .collect();
                self.recommend.query.push_str(&filtered);
            }
        }
    }

    pub fn focus_down(&mut self) {
        if self.active_tab() != Tab::Recommend {
            return;
        }
        self.recommend.select_next();
        if self.recommend.selected().is_some() {
            self.focus = Focus::Gallery;
        }
    }

    pub fn focus_up(&mut self) {
        if self.focus != Focus::Gallery {
            return;
        }
        self.recommend.select_prev();
        if self.recommend.selected().is_none() {
            self.focus = Focus::Input;
        }
    }

    #[cfg(test)]
    pub async fn next_event(&mut self) {
        if let Some(event) = self.events_rx.recv().await {
            self.apply_event(event);
        }
    }
}

/// A typed path may contain unquoted spaces; take it whole if it exists.
fn typed_paths(input: &str) -> Vec<PathBuf> {
    if input.is_empty() {
        return Vec::new();
    }
    if Path::new(input).exists() {
        return vec![PathBuf::from(input)];
    }
    parse_dropped_paths(input)
}

fn help_text() -> String {
    let mut help = String::from("Available commands:\n");
    for (cmd, desc) in COMMANDS {
        help.push_str(&format!("  {} - {}\n", cmd, desc));
    }
    help.push_str(
        "\nKeys:\n  Tab switch view   Ctrl+R reset   Ctrl+Y copy text\n  Up/Down pick meme   Enter open/search   Esc quit",
    );
    help
}
