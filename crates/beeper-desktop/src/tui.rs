use std::io;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex};
use std::thread;

use beeper_core::{EngineMode, Pattern};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{Level, LevelFilter, Metadata, Record};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::command::{Command, Status};
use crate::consts;

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub level: Level,
    pub message: String,
}

// Extension trait for log::Level to provide UI rendering methods
trait LevelExt {
    fn color(&self) -> Color;
    fn prefix(&self) -> &str;
}

impl LevelExt for Level {
    fn color(&self) -> Color {
        match *self {
            Level::Error => Color::Red,
            Level::Warn => Color::Yellow,
            Level::Info => Color::Cyan,
            Level::Debug => Color::Gray,
            Level::Trace => Color::DarkGray,
        }
    }

    fn prefix(&self) -> &str {
        match *self {
            Level::Error => "[ERROR]",
            Level::Warn => "[WARN] ",
            Level::Info => "[INFO] ",
            Level::Debug => "[DEBUG]",
            Level::Trace => "[TRACE]",
        }
    }
}

enum TuiMessage {
    Log(LogEntry),
    Shutdown,
}

struct TuiState {
    status: Arc<Mutex<Status>>,
    commands: Sender<Command>,
    logs: Vec<LogEntry>,
    rx: Receiver<TuiMessage>,
    selected: usize,
    repeat: u32,
    max_logs: usize,
    should_quit: bool,
}

impl TuiState {
    fn new(status: Arc<Mutex<Status>>, commands: Sender<Command>, rx: Receiver<TuiMessage>) -> Self {
        Self {
            status,
            commands,
            logs: Vec::new(),
            rx,
            selected: 0,
            repeat: 1,
            max_logs: 100,
            should_quit: false,
        }
    }

    fn collect_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                TuiMessage::Log(log) => {
                    self.logs.push(log);
                    if self.logs.len() > self.max_logs {
                        self.logs.remove(0);
                    }
                }
                TuiMessage::Shutdown => {
                    self.should_quit = true;
                }
            }
        }
    }

    fn selected_pattern(&self) -> Pattern {
        Pattern::ALL[self.selected]
    }

    fn adjust_repeat(&mut self, increase: bool) {
        self.repeat = if increase {
            (self.repeat + 1).min(consts::MAX_REPEAT)
        } else {
            self.repeat.saturating_sub(1)
        };
    }

    fn send(&self, command: Command) {
        // Engine loop gone means we are shutting down anyway
        let _ = self.commands.send(command);
    }

    /// Translate a key into panel navigation or an engine command.
    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => self.should_quit = true,
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => self.selected = (self.selected + 1).min(Pattern::ALL.len() - 1),
            KeyCode::Left | KeyCode::Char('-') => self.adjust_repeat(false),
            KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_repeat(true),
            KeyCode::Enter => self.send(Command::Start {
                pattern: self.selected_pattern(),
                repeat: self.repeat,
            }),
            KeyCode::Char('p') => self.send(Command::Play(self.selected_pattern())),
            KeyCode::Char('b') => self.send(Command::Blink {
                on_ms: consts::BLINK_ON_MS,
                off_ms: consts::BLINK_OFF_MS,
                pulses: consts::BLINK_PULSES,
            }),
            KeyCode::Char('s') => self.send(Command::Stop),
            KeyCode::Char('n') => self.send(Command::StopBlink),
            KeyCode::Char('x') => self.send(Command::StopAll),
            _ => {}
        }
    }
}

// Logger implementation that sends logs to the TUI
pub struct TuiLogger {
    tx: Sender<TuiMessage>,
}

impl log::Log for TuiLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // per-phase traces would flood the pane
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let entry = LogEntry {
                level: record.level(),
                message: format!("{}", record.args()),
            };
            let _ = self.tx.send(TuiMessage::Log(entry));
        }
    }

    fn flush(&self) {}
}

/// Terminal control panel running on its own thread.
pub struct ControlPanel {
    status: Arc<Mutex<Status>>,
    commands: Receiver<Command>,
    tx: Sender<TuiMessage>,
    ui_thread: Option<thread::JoinHandle<()>>,
}

impl ControlPanel {
    pub fn new() -> Result<Self, anyhow::Error> {
        let status = Arc::new(Mutex::new(Status::default()));
        let (tx, rx) = channel();
        let (command_tx, command_rx) = channel();

        let status_clone = Arc::clone(&status);
        let ui_thread = thread::Builder::new().name("tui".to_string()).spawn(move || {
            if let Err(e) = run_tui(status_clone, command_tx, rx) {
                eprintln!("TUI error: {}", e);
            }
        })?;

        let logger = TuiLogger { tx: tx.clone() };
        if log::set_boxed_logger(Box::new(logger)).is_ok() {
            log::set_max_level(LevelFilter::Debug);
        }

        Ok(Self {
            status,
            commands: command_rx,
            tx,
            ui_thread: Some(ui_thread),
        })
    }

    /// Next pending command. A closed panel reads as `Quit`.
    pub fn try_command(&self) -> Option<Command> {
        use std::sync::mpsc::TryRecvError;
        match self.commands.try_recv() {
            Ok(command) => Some(command),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Command::Quit),
        }
    }

    pub fn publish(&self, status: Status) {
        if let Ok(mut shared) = self.status.lock() {
            *shared = status;
        }
    }

    pub fn shutdown(&mut self) {
        let _ = self.tx.send(TuiMessage::Shutdown);
        if let Some(handle) = self.ui_thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ControlPanel {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_tui(
    status: Arc<Mutex<Status>>,
    commands: Sender<Command>,
    rx: Receiver<TuiMessage>,
) -> Result<(), io::Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut tui_state = TuiState::new(status, commands, rx);

    loop {
        tui_state.collect_messages();
        if tui_state.should_quit {
            break;
        }

        terminal.draw(|f| ui(f, &tui_state))?;

        // Short poll keeps the status readout close to real time
        if event::poll(std::time::Duration::from_millis(20))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    tui_state.handle_key(key.code, key.modifiers);
                }
            }
        }
    }

    tui_state.send(Command::Quit);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

fn ui(f: &mut Frame, state: &TuiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Title
            Constraint::Length(12), // Patterns + status
            Constraint::Min(6),     // Logs
            Constraint::Length(3),  // Help
        ])
        .split(f.area());

    let title = Paragraph::new("Actuator Pattern Panel")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);
    render_patterns(f, body[0], state);
    render_status(f, body[1], state);

    render_logs(f, chunks[2], state);

    let help = Paragraph::new(
        "↑/↓: Pattern | ←/→: Repeat | Enter: Start | P: Play (blocking) | B: Blink | S/N/X: Stop pattern/blink/all | Q: Quit",
    )
    .style(Style::default().fg(Color::Gray))
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(help, chunks[3]);
}

fn render_patterns(f: &mut Frame, area: Rect, state: &TuiState) {
    let items: Vec<ListItem> = Pattern::ALL
        .iter()
        .map(|p| ListItem::new(format!("{:<12} {:>6} ms", p.name(), p.duration_ms())))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Patterns"))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut list_state = ListState::default().with_selected(Some(state.selected));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn render_status(f: &mut Frame, area: Rect, state: &TuiState) {
    let status = state
        .status
        .lock()
        .map(|s| s.clone())
        .unwrap_or_default();

    let (lamp, lamp_style) = if status.is_on {
        ("■ ON ", Style::default().fg(Color::Black).bg(Color::Green))
    } else {
        ("□ OFF", Style::default().fg(Color::DarkGray))
    };

    let mode = match (status.mode, status.pattern) {
        (EngineMode::Pattern, Some(p)) => format!("Pattern ({})", p.name()),
        (mode, _) => format!("{:?}", mode),
    };

    let repeat = match state.repeat {
        0 => "forever".to_string(),
        n => n.to_string(),
    };

    let lines = vec![
        Line::from(vec![Span::raw("Actuator:   "), Span::styled(lamp, lamp_style)]),
        Line::from(format!("Line level: {}", if status.line_high { "HIGH" } else { "LOW" })),
        Line::from(format!("Mode:       {}", mode)),
        Line::from(format!("Repeat:     {}", repeat)),
        Line::from(vec![
            Span::raw("Last error: "),
            match status.last_error {
                Some(e) => Span::styled(e.message(), Style::default().fg(Color::Red)),
                None => Span::raw("none"),
            },
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(paragraph, area);
}

fn render_logs(f: &mut Frame, area: Rect, state: &TuiState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Logs (scrolls automatically)");

    let inner = block.inner(area);
    f.render_widget(block, area);

    let max_logs = inner.height as usize;
    let start_idx = state.logs.len().saturating_sub(max_logs);

    let log_items: Vec<ListItem> = state.logs[start_idx..]
        .iter()
        .map(|log| {
            let content = Line::from(vec![
                Span::styled(log.level.prefix(), Style::default().fg(log.level.color())),
                Span::raw(" "),
                Span::raw(log.message.as_str()),
            ]);
            ListItem::new(content)
        })
        .collect();

    f.render_widget(List::new(log_items), inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> (TuiState, Receiver<Command>) {
        let (command_tx, command_rx) = channel();
        let (_tx, rx) = channel();
        let state = TuiState::new(Arc::new(Mutex::new(Status::default())), command_tx, rx);
        (state, command_rx)
    }

    #[test]
    fn test_enter_starts_selected_pattern() {
        let (mut state, commands) = state();
        state.handle_key(KeyCode::Down, KeyModifiers::NONE);
        state.handle_key(KeyCode::Right, KeyModifiers::NONE);
        state.handle_key(KeyCode::Enter, KeyModifiers::NONE);

        assert_eq!(
            commands.try_recv().ok(),
            Some(Command::Start { pattern: Pattern::Stop, repeat: 2 })
        );
    }

    #[test]
    fn test_selection_and_repeat_clamp() {
        let (mut state, _commands) = state();
        state.handle_key(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(state.selected, 0);
        for _ in 0..20 {
            state.handle_key(KeyCode::Down, KeyModifiers::NONE);
        }
        assert_eq!(state.selected_pattern(), Pattern::MorseSos);

        state.handle_key(KeyCode::Left, KeyModifiers::NONE);
        state.handle_key(KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(state.repeat, 0);
    }

    #[test]
    fn test_quit_keys() {
        let (mut state, _commands) = state();
        state.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(state.should_quit);
    }
}
