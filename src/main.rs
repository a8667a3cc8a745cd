use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use rand::rngs::StdRng;

use messi_chat::chat::{ChatSession, QUICK_QUESTIONS, Speaker, StatsState};
use messi_chat::config::ChatConfig;
use messi_chat::stats::StatsDocument;
use messi_chat::store::spawn_stats_loader;

struct PendingReply {
    question: String,
    ready_at: Instant,
}

struct App {
    session: ChatSession<StdRng>,
    input: String,
    pending: Option<PendingReply>,
    stats_rx: Option<mpsc::Receiver<anyhow::Result<StatsDocument>>>,
    scroll: u16,
    help_overlay: bool,
    should_quit: bool,
}

impl App {
    fn new(config: &ChatConfig, stats_rx: mpsc::Receiver<anyhow::Result<StatsDocument>>) -> Self {
        let mut session = ChatSession::new(config.rng()).with_typing(config.typing);
        session.push_log(format!(
            "[INFO] Loading stats from {}",
            config.stats_path.display()
        ));
        Self {
            session,
            input: String::new(),
            pending: None,
            stats_rx: Some(stats_rx),
            scroll: 0,
            help_overlay: false,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match key.code {
            KeyCode::Esc => {
                if self.help_overlay {
                    self.help_overlay = false;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::F(12) => self.help_overlay = !self.help_overlay,
            KeyCode::F(n) if (1..=QUICK_QUESTIONS.len() as u8).contains(&n) => {
                self.quick_question((n - 1) as usize)
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Up | KeyCode::PageUp => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Down | KeyCode::PageDown => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    /// Sends a canned question without touching the draft in the input line.
    fn quick_question(&mut self, idx: usize) {
        let Some(question) = QUICK_QUESTIONS.get(idx) else {
            return;
        };
        if self.busy() {
            return;
        }
        self.queue_reply(question.to_string());
    }

    fn busy(&mut self) -> bool {
        if self.pending.is_some() {
            self.session
                .push_log("[INFO] Still answering the previous question");
            return true;
        }
        false
    }

    fn submit(&mut self) {
        if self.busy() {
            return;
        }
        let question = self.input.trim().to_string();
        if question.is_empty() {
            return;
        }
        self.input.clear();
        self.queue_reply(question);
    }

    fn queue_reply(&mut self, question: String) {
        self.scroll = 0;
        let delay = self.session.typing_delay();
        self.pending = Some(PendingReply {
            question,
            ready_at: Instant::now() + delay,
        });
    }

    fn poll_stats(&mut self) {
        let Some(rx) = &self.stats_rx else {
            return;
        };
        match rx.try_recv() {
            Ok(loaded) => {
                self.session.set_stats(loaded);
                self.stats_rx = None;
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                self.session
                    .set_stats(Err(anyhow::anyhow!("stats loader stopped without a result")));
                self.stats_rx = None;
            }
        }
    }

    fn poll_pending(&mut self) {
        let ready = self
            .pending
            .as_ref()
            .map(|p| Instant::now() >= p.ready_at)
            .unwrap_or(false);
        if !ready {
            return;
        }
        if let Some(pending) = self.pending.take() {
            let today = chrono::Local::now().date_naive();
            self.session.reply(&pending.question, today);
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let config = ChatConfig::from_env();

    let (tx, rx) = mpsc::channel();
    spawn_stats_loader(config.stats_path.clone(), tx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(&config, rx);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        app.poll_stats();
        app.poll_pending();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_messages(frame, chunks[1], app);

    let input = Paragraph::new(format!("> {}", app.input))
        .block(Block::default().title("Escribí tu pregunta").borders(Borders::ALL));
    frame.render_widget(input, chunks[2]);

    let console = Paragraph::new(console_text(app))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(console, chunks[3]);

    let footer = Paragraph::new(footer_text());
    frame.render_widget(footer, chunks[4]);

    if app.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> String {
    let status = match app.session.stats_state() {
        StatsState::Loading => "⏳ cargando datos",
        StatsState::Ready(_) => "🟢 en línea",
        StatsState::Failed(_) => "⚠️ sin datos",
    };
    format!("⚽ MESSI BOT | {status}")
}

fn footer_text() -> String {
    "Enter Enviar | F1-F6 Preguntas rápidas | ↑/↓ Scroll | F12 Ayuda | Esc Salir".to_string()
}

fn render_messages(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines: Vec<Line> = Vec::new();
    for msg in app.session.transcript() {
        let (label, color) = match msg.from {
            Speaker::User => ("Vos", Color::Cyan),
            Speaker::Bot => ("Messi", Color::LightBlue),
        };
        push_message(&mut lines, label, color, &msg.text);
    }
    if let Some(pending) = &app.pending {
        push_message(&mut lines, "Vos", Color::Cyan, &pending.question);
        lines.push(Line::from(Span::styled(
            "Messi está escribiendo...",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let chat = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false });
    let offset = chat_offset(&chat, area, app.scroll);
    let chat = chat
        .block(Block::default().borders(Borders::ALL))
        .scroll((offset, 0));
    frame.render_widget(chat, area);
}

/// First row to show so the newest wrapped row sits at the bottom of the bordered `area`,
/// moved up by `scroll` rows.
fn chat_offset(chat: &Paragraph, area: Rect, scroll: u16) -> u16 {
    let inner_width = area.width.saturating_sub(2);
    let visible = area.height.saturating_sub(2);
    let rows = u16::try_from(chat.line_count(inner_width)).unwrap_or(u16::MAX);
    rows.saturating_sub(visible).saturating_sub(scroll)
}

fn push_message(lines: &mut Vec<Line<'static>>, label: &str, color: Color, text: &str) {
    let mut first = true;
    for raw in text.split('\n') {
        let mut spans = Vec::new();
        if first {
            spans.push(Span::styled(
                format!("{label}: "),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
            first = false;
        } else {
            spans.push(Span::raw("  "));
        }
        spans.extend(markup_spans(raw));
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
}

/// Renders `**emphasis**` markers as bold spans.
fn markup_spans(raw: &str) -> Vec<Span<'static>> {
    raw.split("**")
        .enumerate()
        .filter(|(_, chunk)| !chunk.is_empty())
        .map(|(i, chunk)| {
            if i % 2 == 1 {
                Span::styled(
                    chunk.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )
            } else {
                Span::raw(chunk.to_string())
            }
        })
        .collect()
}

fn console_text(app: &App) -> String {
    let logs = app.session.logs();
    if logs.is_empty() {
        return "No alerts yet".to_string();
    }
    logs.iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let mut text = vec![
        "Messi Bot - Ayuda".to_string(),
        String::new(),
        "  Enter        Enviar pregunta".to_string(),
        "  ↑/↓          Scroll".to_string(),
        "  F12          Ayuda".to_string(),
        "  Esc          Salir".to_string(),
        String::new(),
        "Preguntas rápidas:".to_string(),
    ];
    for (i, q) in QUICK_QUESTIONS.iter().enumerate() {
        text.push(format!("  F{}           {q}", i + 1));
    }

    let help = Paragraph::new(text.join("\n"))
        .block(Block::default().title("Ayuda").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
