mod action;
mod analyze;
mod app;
mod backend;
mod command;
mod config;
mod image;
mod logging;
mod recommend;
mod ui;
mod ui_state;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use arboard::Clipboard;
use clap::Parser;
use crossterm::{
    event::{self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tracing::{error, info};

use action::Action;
use app::App;
use backend::HttpBackend;
use config::Config;
use recommend::SystemBrowser;
use ui::draw;
use ui_state::{Focus, Tab};

/// Meme sentiment analyzer and vibe-based meme finder.
#[derive(Debug, Parser)]
#[command(name = "vibecheck", version)]
struct Args {
    /// Base URL of the vibe server
    #[arg(long, env = "VIBECHECK_SERVER")]
    server: Option<String>,

    /// Config file (default: <config dir>/vibecheck/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file (default: <cache dir>/vibecheck/vibecheck.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Don't check the server at startup
    #[arg(long)]
    no_health_check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(server) = args.server {
        config.server_url = server;
    }
    if let Some(log_file) = args.log_file {
        config.log_file = Some(log_file);
    }

    logging::init(&config.log_path(), &config.log_level)?;
    info!(server = %config.server_url, "starting vibecheck");

    let backend = HttpBackend::new(&config.server_url)
        .with_context(|| format!("bad server url {}", config.server_url))?;
    let mut app = App::new(&config, Arc::new(backend), Box::new(SystemBrowser));
    if !args.no_health_check {
        app.check_health();
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!("ui loop failed: {}", e);
        eprintln!("Error: {}", e);
    }
    info!("bye");

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    config: &Config,
) -> io::Result<()> {
    loop {
        // Advance animation and apply finished background work
        app.tick();

        terminal.draw(|frame| draw(frame, app))?;

        if app.should_quit {
            return Ok(());
        }

        if !event::poll(config.tick_rate())? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                // A notice blocks everything until dismissed
                if app.notice.is_some() {
                    app.notice = None;
                    continue;
                }

                let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                match key.code {
                    KeyCode::Char('c') if ctrl => return Ok(()),
                    KeyCode::Char('r') if ctrl => app.handle_action(Action::Reset),
                    KeyCode::Char('y') if ctrl => app.handle_action(Action::CopyDetectedText),
                    KeyCode::Char('v') if ctrl => {
                        // Clipboard text is typed, not dropped
                        if let Ok(mut clipboard) = Clipboard::new() {
                            if let Ok(text) = clipboard.get_text() {
                                let filtered: String = text
                                    .chars()
                                    .filter(|c| *c != '\r')
                                    .map(|c| if c == '\n' { ' ' } else { c })
                                    .collect();
                                app.input_mut().push_str(&filtered);
                            }
                        }
                    }
                    KeyCode::Esc => {
                        if app.focus == Focus::Gallery {
                            app.focus = Focus::Input;
                        } else if app.input().is_empty() {
                            return Ok(());
                        } else {
                            app.input_mut().clear();
                        }
                    }
                    KeyCode::Tab | KeyCode::BackTab => app.handle_action(Action::NextTab),
                    KeyCode::F(1) => app.handle_action(Action::SwitchTab(Tab::Analyze)),
                    KeyCode::F(2) => app.handle_action(Action::SwitchTab(Tab::Recommend)),
                    KeyCode::Enter => app.submit_input(),
                    KeyCode::Down => app.focus_down(),
                    KeyCode::Up => app.focus_up(),
                    KeyCode::Backspace => {
                        app.input_mut().pop();
                    }
                    KeyCode::Char(c) => {
                        app.focus = Focus::Input;
                        app.input_mut().push(c);
                    }
                    _ => {}
                }
            }
            Event::Paste(text) => {
                if app.notice.is_none() {
                    app.paste(&text);
                }
            }
            Event::Mouse(mouse) => {
                if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                    if app.notice.is_some() {
                        app.notice = None;
                    } else if mouse.row < ui::TAB_BAR_HEIGHT {
                        if let Some(tab) = ui::tab_at(mouse.column) {
                            app.handle_action(Action::SwitchTab(tab));
                        }
                    } else {
                        let size = terminal.size()?;
                        let screen = Rect::new(0, 0, size.width, size.height);
                        if let Some(index) = ui::card_at(app, screen, mouse.column, mouse.row) {
                            app.handle_action(Action::OpenMeme(index));
                        }
                    }
                }
            }
            _ => {}
        }
    }
}
