use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph, Tabs, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::analyze::{SentimentStyle, Stage, Tone};
use crate::app::{App, ServerHealth};
use crate::ui_state::{Focus, Tab};

// Copper Sapphire Morning color palette
const BG_DARK: Color = Color::Rgb(12, 12, 16);           // Deep background

// Sapphire blues
const SAPPHIRE: Color = Color::Rgb(101, 150, 243);       // #6596F3 - Primary accent
const CYAN_LIGHT: Color = Color::Rgb(178, 220, 226);     // #B2DCE2 - Light cyan

// Copper/warm tones
const COPPER: Color = Color::Rgb(138, 72, 38);           // #8A4826 - Copper
const PALE_YELLOW: Color = Color::Rgb(234, 208, 148);    // #EAD094 - Pale yellow

// Accent colors
const BURGUNDY: Color = Color::Rgb(204, 92, 68);         // #CC5C44 - Warnings/errors
const OLIVE: Color = Color::Rgb(131, 179, 102);          // #83B366 - Success/green
const LAVENDER: Color = Color::Rgb(211, 164, 234);       // #D3A4EA - Purple accent

// Text colors
const TEXT_PRIMARY: Color = Color::Rgb(240, 240, 245);   // Near white
const TEXT_SECONDARY: Color = Color::Rgb(180, 180, 190); // Light gray
const TEXT_MUTED: Color = Color::Rgb(105, 116, 133);     // #697485 - Medium gray

// Border colors (subtle)
const BORDER_DIM: Color = Color::Rgb(45, 50, 60);        // Dim border
const BORDER_ACCENT: Color = Color::Rgb(70, 85, 110);    // Accent border

/// Height of the tab bar; mouse clicks above this row switch tabs.
pub const TAB_BAR_HEIGHT: u16 = 3;

const CARD_WIDTH: u16 = 30;
const CARD_HEIGHT: u16 = 5;

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

fn tab_title(index: usize, tab: Tab) -> String {
    format!(" F{} {} ", index + 1, tab.title())
}

/// Which tab a click on the tab bar at `column` hits. `Tabs` lays titles
/// out from the left border, each padded by one cell, with a one-cell
/// divider between them.
pub fn tab_at(column: u16) -> Option<Tab> {
    let mut x = 1;
    for (i, tab) in Tab::ALL.iter().enumerate() {
        let width = tab_title(i, *tab).width() as u16 + 2;
        if column >= x && column < x + width {
            return Some(*tab);
        }
        x += width + 1;
    }
    None
}

fn main_layout(area: Rect) -> [Rect; 4] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(TAB_BAR_HEIGHT), // Tabs
            Constraint::Min(8),                 // Active view
            Constraint::Length(3),              // Input
            Constraint::Length(1),              // Status bar
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2], chunks[3]]
}

/// Card positions inside the gallery, scrolled so the selection stays on
/// screen. Cards scrolled out of view are left out.
fn card_rects(inner: Rect, count: usize, selected: Option<usize>) -> Vec<(usize, Rect)> {
    let columns = (inner.width / CARD_WIDTH).max(1);
    let card_width = inner.width / columns;
    let visible_rows = (inner.height / CARD_HEIGHT).max(1) as usize;
    let selected_row = selected.unwrap_or(0) / columns as usize;
    let first_row = selected_row.saturating_sub(visible_rows - 1);

    (0..count)
        .filter_map(|i| {
            let row = i / columns as usize;
            if row < first_row || row >= first_row + visible_rows {
                return None;
            }
            let col = (i % columns as usize) as u16;
            Some((
                i,
                Rect {
                    x: inner.x + col * card_width,
                    y: inner.y + (row - first_row) as u16 * CARD_HEIGHT,
                    width: card_width,
                    height: CARD_HEIGHT.min(inner.height),
                },
            ))
        })
        .collect()
}

/// Which meme card a click at (`column`, `row`) on a `screen`-sized frame hits.
pub fn card_at(app: &App, screen: Rect, column: u16, row: u16) -> Option<usize> {
    if app.active_tab() != Tab::Recommend {
        return None;
    }
    let inner = panel("", BORDER_DIM).inner(main_layout(screen)[1]);
    card_rects(inner, app.recommend.grid().thumbnails().len(), app.recommend.selected())
        .into_iter()
        .find(|(_, rect)| rect.contains(Position { x: column, y: row }))
        .map(|(i, _)| i)
}

fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if width + w + 1 > max {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push('…');
    out
}

fn format_bytes(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

fn sentiment_color(style: Option<SentimentStyle>) -> Color {
    match style {
        Some(SentimentStyle::Positive) => OLIVE,
        Some(SentimentStyle::Negative) => BURGUNDY,
        Some(SentimentStyle::Neutral) => PALE_YELLOW,
        None => TEXT_SECONDARY,
    }
}

fn panel(title: &str, border: Color) -> Block<'_> {
    Block::default()
        .title(Span::styled(title, Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
}

pub fn draw(frame: &mut Frame, app: &App) {
    let bg = Block::default().style(Style::default().bg(BG_DARK));
    frame.render_widget(bg, frame.area());

    let chunks = main_layout(frame.area());

    draw_tabs(frame, app, chunks[0]);
    if app.tabs.is_visible(Tab::Analyze) {
        draw_analyze(frame, app, chunks[1]);
    } else {
        draw_recommend(frame, app, chunks[1]);
    }
    draw_input(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);

    if let Some(notice) = &app.notice {
        draw_notice(frame, notice);
    }
}

fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(tab_title(i, *tab)))
        .collect();
    let selected = Tab::ALL.iter().position(|t| app.tabs.is_active(*t)).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(panel(" vibecheck ", BORDER_DIM))
        .select(selected)
        .style(Style::default().fg(TEXT_MUTED))
        .highlight_style(Style::default().fg(CYAN_LIGHT).add_modifier(Modifier::BOLD | Modifier::UNDERLINED))
        .divider(Span::styled("│", Style::default().fg(BORDER_DIM)));
    frame.render_widget(tabs, area);
}

fn draw_analyze(frame: &mut Frame, app: &App, area: Rect) {
    match app.analyze.stage() {
        Stage::Idle => draw_upload_zone(frame, app, area),
        Stage::Scanning => draw_scanning(frame, app, area),
        Stage::Result => draw_results(frame, app, area),
    }
}

fn draw_upload_zone(frame: &mut Frame, app: &App, area: Rect) {
    // Border breathes between dim and accent
    let t = (app.animation_frame as f64 / 90.0).sin() * 0.5 + 0.5;
    let border = Color::Rgb(
        (45.0 + (101.0 - 45.0) * t) as u8,
        (50.0 + (150.0 - 50.0) * t) as u8,
        (60.0 + (243.0 - 60.0) * t) as u8,
    );
    let block = panel(" Analyze ", border).border_type(BorderType::Double);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Drop a meme here",
            Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "drag an image file onto this terminal",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "or type its path below and press Enter",
            Style::default().fg(TEXT_MUTED),
        )),
    ];
    let top = inner.height.saturating_sub(lines.len() as u16) / 2;
    let centered = Rect {
        y: inner.y + top,
        height: inner.height.saturating_sub(top),
        ..inner
    };
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), centered);
}

fn preview_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    match app.analyze.image() {
        Some(image) => vec![
            Line::from(Span::styled(
                truncate(&image.file_name, width),
                Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("{} · {}", image.mime, format_bytes(image.size())),
                Style::default().fg(TEXT_SECONDARY),
            )),
            Line::from(Span::styled(
                truncate(&image.data_url, width),
                Style::default().fg(TEXT_MUTED),
            )),
        ],
        None => vec![Line::from(Span::styled("no preview", Style::default().fg(TEXT_MUTED)))],
    }
}

fn draw_scanning(frame: &mut Frame, app: &App, area: Rect) {
    let block = panel(" Scanning ", BORDER_ACCENT);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let preview = Paragraph::new(preview_lines(app, chunks[0].width.saturating_sub(2) as usize))
        .block(Block::default().padding(ratatui::widgets::Padding::horizontal(1)));
    frame.render_widget(preview, chunks[0]);

    let status = match app.analyze.status_tone {
        Tone::Error => Line::from(Span::styled(
            app.analyze.status.clone(),
            Style::default().fg(BURGUNDY).add_modifier(Modifier::BOLD),
        )),
        Tone::Default => Line::from(vec![
            Span::styled(
                format!("{} ", SPINNER[(app.animation_frame / 6) % SPINNER.len()]),
                Style::default().fg(COPPER),
            ),
            Span::styled(app.analyze.status.clone(), Style::default().fg(TEXT_PRIMARY)),
        ]),
    };
    frame.render_widget(Paragraph::new(status).alignment(Alignment::Center), chunks[2]);
}

fn draw_results(frame: &mut Frame, app: &App, area: Rect) {
    let block = panel(" Result ", BORDER_ACCENT);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Image
            Constraint::Length(1), // Badge
            Constraint::Length(1), // Gap
            Constraint::Length(3), // Confidence
            Constraint::Min(3),    // Detected text
        ])
        .split(inner);

    let image = match app.analyze.image() {
        Some(image) if app.analyze.result_image.is_some() => format!(
            "{} · {}",
            truncate(&image.file_name, 40),
            format_bytes(image.size())
        ),
        _ => "no image".to_string(),
    };
    let mut header = vec![Line::from(Span::styled(image, Style::default().fg(TEXT_SECONDARY)))];
    if let Some(at) = app.analyze.analyzed_at {
        header.push(Line::from(Span::styled(
            format!("analyzed {}", at.format("%H:%M:%S")),
            Style::default().fg(TEXT_MUTED),
        )));
    }
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let badge = &app.analyze.badge;
    let color = sentiment_color(badge.style());
    let badge_line = Line::from(vec![
        Span::styled("Sentiment ", Style::default().fg(TEXT_MUTED)),
        Span::styled(
            format!(" {} ", badge.label),
            Style::default().fg(BG_DARK).bg(color).add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(badge_line), chunks[1]);

    // Gauge ratio must stay in [0, 1]; the label shows the raw value
    let ratio = (app.analyze.confidence_width / 100.0).clamp(0.0, 1.0);
    let ratio = if ratio.is_nan() { 0.0 } else { ratio };
    let gauge = Gauge::default()
        .block(panel(" Confidence ", BORDER_DIM))
        .gauge_style(Style::default().fg(color).bg(BG_DARK))
        .ratio(ratio)
        .label(Span::styled(
            app.analyze.confidence_label.clone(),
            Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(gauge, chunks[3]);

    let text = Paragraph::new(app.analyze.detected_text.clone())
        .block(panel(" Detected text ", BORDER_DIM))
        .style(Style::default().fg(TEXT_PRIMARY))
        .wrap(Wrap { trim: false });
    frame.render_widget(text, chunks[4]);
}

fn draw_recommend(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.recommend.vibe_score {
        Some(score) => format!(" Memes · vibe {:+.2} ", score),
        None => " Memes ".to_string(),
    };
    let border = if app.focus == Focus::Gallery { SAPPHIRE } else { BORDER_DIM };
    let block = panel(&title, border);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let grid = app.recommend.grid();
    if let Some(placeholder) = grid.placeholder() {
        let color = if placeholder == crate::recommend::MSG_ERROR { BURGUNDY } else { TEXT_SECONDARY };
        let y = inner.y + inner.height / 2;
        let line = Rect { y, height: 1, ..inner };
        frame.render_widget(
            Paragraph::new(placeholder)
                .alignment(Alignment::Center)
                .style(Style::default().fg(color)),
            line,
        );
        return;
    }

    let thumbs = grid.thumbnails();
    if thumbs.is_empty() {
        let hint = Paragraph::new("Describe a vibe below and press Enter")
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_MUTED));
        frame.render_widget(hint, Rect { y: inner.y + inner.height / 2, height: 1, ..inner });
        return;
    }

    for (i, rect) in card_rects(inner, thumbs.len(), app.recommend.selected()) {
        let thumb = &thumbs[i];
        let selected = app.recommend.selected() == Some(i);
        let border = if selected { LAVENDER } else { BORDER_DIM };
        let text_width = rect.width.saturating_sub(4) as usize;
        let title = format!(" {} ", i + 1);
        let card = Paragraph::new(vec![
            Line::from(Span::styled(
                truncate(if thumb.alt.is_empty() { "untitled" } else { &thumb.alt }, text_width),
                Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                truncate(
                    &thumb
                        .subreddit
                        .as_ref()
                        .map(|s| format!("r/{} · {}", s, thumb.src))
                        .unwrap_or_else(|| thumb.src.clone()),
                    text_width,
                ),
                Style::default().fg(TEXT_MUTED),
            )),
            Line::from(Span::styled(
                truncate(thumb.post_link.as_deref().unwrap_or_default(), text_width),
                Style::default().fg(SAPPHIRE),
            )),
        ])
        .block(panel(&title, border));
        frame.render_widget(card, rect);
    }
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    let border_color = if app.focus == Focus::Input {
        // Pulsing border when focused
        let glow = (app.animation_frame as f64 / 90.0).sin() * 0.3 + 0.7;
        Color::Rgb((101.0 * glow) as u8, (150.0 * glow) as u8, (243.0 * glow) as u8)
    } else {
        BORDER_DIM
    };

    let (title, prompt) = match app.active_tab() {
        Tab::Analyze => (" File ", "path"),
        Tab::Recommend => (" Vibe ", "vibe"),
    };
    let block = Block::default()
        .title(Span::styled(title, Style::default().fg(TEXT_MUTED)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cursor = if app.focus == Focus::Input && app.animation_frame % 30 < 15 { "|" } else { " " };
    let input = Paragraph::new(Line::from(vec![
        Span::styled(format!(" {} > ", prompt), Style::default().fg(COPPER)),
        Span::styled(format!("{}{}", app.input(), cursor), Style::default().fg(TEXT_PRIMARY)),
    ]));
    frame.render_widget(input, inner);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (health, color) = match app.health {
        ServerHealth::Unknown => ("● server ?".to_string(), TEXT_MUTED),
        ServerHealth::Online(at) => (format!("● online {}", at.format("%H:%M:%S")), OLIVE),
        ServerHealth::Offline(at) => (format!("● offline {}", at.format("%H:%M:%S")), BURGUNDY),
    };
    let right_width = (health.width() + app.server_url.width() + 3) as u16;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(right_width)])
        .split(area);

    let left = match &app.status_message {
        Some(msg) => Line::from(Span::styled(format!(" {}", msg), Style::default().fg(PALE_YELLOW))),
        None => Line::from(vec![
            Span::styled(" Tab", Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD)),
            Span::styled(" view  ", Style::default().fg(TEXT_MUTED)),
            Span::styled("Ctrl+R", Style::default().fg(COPPER).add_modifier(Modifier::BOLD)),
            Span::styled(" reset  ", Style::default().fg(TEXT_MUTED)),
            Span::styled("/", Style::default().fg(COPPER).add_modifier(Modifier::BOLD)),
            Span::styled(" cmds  ", Style::default().fg(TEXT_MUTED)),
            Span::styled("ESC", Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD)),
            Span::styled(" quit", Style::default().fg(TEXT_MUTED)),
        ]),
    };
    frame.render_widget(Paragraph::new(left), chunks[0]);

    let right = Paragraph::new(Line::from(vec![
        Span::styled(app.server_url.clone(), Style::default().fg(TEXT_MUTED)),
        Span::raw(" "),
        Span::styled(health, Style::default().fg(color)),
    ]))
    .alignment(Alignment::Right);
    frame.render_widget(right, chunks[1]);
}

fn draw_notice(frame: &mut Frame, notice: &str) {
    let area = frame.area();
    let lines: Vec<&str> = notice.lines().collect();
    let width = lines
        .iter()
        .map(|l| l.width() as u16)
        .max()
        .unwrap_or(0)
        .max(30)
        .saturating_add(6)
        .min(area.width);
    let height = (lines.len() as u16 + 4).min(area.height);
    let popup = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };

    frame.render_widget(Clear, popup);
    let mut text: Vec<Line> = lines
        .iter()
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(TEXT_PRIMARY))))
        .collect();
    text.push(Line::from(""));
    text.push(Line::from(Span::styled("press any key", Style::default().fg(TEXT_MUTED))));

    let paragraph = Paragraph::new(text)
        .block(panel(" Notice ", COPPER).style(Style::default().bg(BG_DARK)))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, popup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::tests::{lol, MockApi};
    use crate::action::Action;
    use crate::analyze::AnalyzeEvent;
    use crate::backend::{MemeResult, RecommendResponse};
    use crate::config::Config;
    use crate::image::SelectedImage;
    use crate::recommend::tests::RecordingOpener;
    use crate::recommend::RecommendEvent;
    use ratatui::{backend::TestBackend, Terminal};
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> App {
        App::new(
            &Config::default(),
            Arc::new(MockApi::default()),
            Box::new(RecordingOpener::default()),
        )
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long meme title", 8), "a long …");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
    }

    #[test]
    fn test_tab_at_follows_titles() {
        // " F1 Analyze " spans 1..15, divider at 15, " F2 Recommend " 16..32
        assert_eq!(tab_at(0), None);
        assert_eq!(tab_at(1), Some(Tab::Analyze));
        assert_eq!(tab_at(14), Some(Tab::Analyze));
        assert_eq!(tab_at(15), None);
        assert_eq!(tab_at(16), Some(Tab::Recommend));
        assert_eq!(tab_at(31), Some(Tab::Recommend));
        assert_eq!(tab_at(60), None);
    }

    #[test]
    fn test_tab_at_matches_rendered_titles() {
        let screen = render(&app());
        let bar = screen.lines().nth(1).unwrap_or_default();
        let col = bar.find("Recommend").unwrap_or_default();
        // Every cell before the match is one column wide
        assert_eq!(tab_at(bar[..col].chars().count() as u16), Some(Tab::Recommend));
    }

    fn with_memes(app: &mut App, count: usize) {
        let memes = (0..count)
            .map(|i| MemeResult {
                url: format!("{}.png", i),
                name: format!("meme {}", i),
                post_link: Some(format!("https://redd.it/{}", i)),
                subreddit: None,
            })
            .collect();
        app.handle_action(Action::SwitchTab(Tab::Recommend));
        app.recommend.apply(RecommendEvent::Completed {
            request: 1,
            result: Ok(RecommendResponse {
                memes: Some(memes),
                sentiment_score: None,
            }),
        });
    }

    #[test]
    fn test_card_at_hits_rendered_cards() {
        let screen = Rect::new(0, 0, 100, 30);
        let mut app = app();
        with_memes(&mut app, 2);

        // Gallery inner area starts at (1, 4); three 32-wide columns
        assert_eq!(card_at(&app, screen, 2, 5), Some(0));
        assert_eq!(card_at(&app, screen, 40, 5), Some(1));
        assert_eq!(card_at(&app, screen, 70, 5), None);
        assert_eq!(card_at(&app, screen, 2, 1), None);

        app.handle_action(Action::SwitchTab(Tab::Analyze));
        assert_eq!(card_at(&app, screen, 2, 5), None);
    }

    #[test]
    fn test_card_shows_post_link() {
        let mut app = app();
        with_memes(&mut app, 1);
        let screen = render(&app);
        assert!(screen.contains("meme 0"));
        assert!(screen.contains("https://redd.it/0"));
    }

    #[test]
    fn test_idle_view_renders_drop_zone() {
        let screen = render(&app());
        assert!(screen.contains("Drop a meme here"));
        assert!(!screen.contains("Confidence"));
    }

    #[test]
    fn test_result_view_renders_badge_and_confidence() {
        let mut app = app();
        let ticket = app.analyze.handle_upload(vec![PathBuf::from("lol.png")]).unwrap();
        let image = SelectedImage::from_bytes(Path::new("lol.png"), vec![0; 10]);
        app.analyze.apply(AnalyzeEvent::FileRead { upload: ticket.id, result: Ok(image) });
        app.analyze.apply(AnalyzeEvent::Analyzed { upload: ticket.id, result: Ok(lol()) });
        app.analyze.apply(AnalyzeEvent::Reveal { upload: ticket.id });
        app.analyze.apply(AnalyzeEvent::ConfidenceReady { upload: ticket.id });

        let screen = render(&app);
        assert!(screen.contains("Positive"));
        assert!(screen.contains("87%"));
        assert!(screen.contains("LOL"));
        assert!(!screen.contains("Drop a meme here"));
    }

    #[test]
    fn test_notice_renders_on_top() {
        let mut app = app();
        app.notice = Some(crate::recommend::MSG_EMPTY_QUERY.to_string());
        let screen = render(&app);
        assert!(screen.contains("Please describe a vibe first!"));
    }
}
