//! Interactive statement form in the terminal.
//!
//! Requests run on the submission worker; the draw loop only polls for
//! settlements, so keys keep working while a statement is being parsed.

use anyhow::{Result, anyhow};
use cardparse_client::{HttpParseService, Settlement, Submission, SubmissionController, run_worker};
use cardparse_core::{BankId, RequestState, SelectedFile, StatementSummary};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use crate::config::Config;
use crate::render::render_summary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Bank,
    File,
    Submit,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Bank => Focus::File,
            Focus::File => Focus::Submit,
            Focus::Submit => Focus::Bank,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Bank => Focus::Submit,
            Focus::File => Focus::Bank,
            Focus::Submit => Focus::File,
        }
    }
}

pub enum Action {
    None,
    Quit,
    Submit(Submission),
}

pub struct FormApp {
    controller: SubmissionController,
    focus: Focus,
    path_input: String,
    notice: Option<String>,
    scroll: u16,
}

impl FormApp {
    pub fn new(controller: SubmissionController) -> Self {
        Self {
            controller,
            focus: Focus::Bank,
            path_input: String::new(),
            notice: None,
            scroll: 0,
        }
    }

    pub fn state(&self) -> &RequestState {
        self.controller.state()
    }

    pub fn bank(&self) -> BankId {
        self.controller.bank()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            return Action::Quit;
        }

        match key.code {
            KeyCode::Tab => {
                self.leave_focus();
                self.focus = self.focus.next();
            }
            KeyCode::BackTab => {
                self.leave_focus();
                self.focus = self.focus.prev();
            }
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::Enter => return self.try_submit(),
            _ => match self.focus {
                Focus::Bank => match key.code {
                    KeyCode::Left | KeyCode::Up => {
                        let bank = self.bank().prev();
                        self.controller.select_bank(bank);
                    }
                    KeyCode::Right | KeyCode::Down => {
                        let bank = self.bank().next();
                        self.controller.select_bank(bank);
                    }
                    KeyCode::Char('q') => return Action::Quit,
                    _ => {}
                },
                Focus::File => match key.code {
                    KeyCode::Char(c) => self.path_input.push(c),
                    KeyCode::Backspace => {
                        self.path_input.pop();
                    }
                    _ => {}
                },
                Focus::Submit => match key.code {
                    KeyCode::Char(' ') => return self.try_submit(),
                    KeyCode::Char('q') => return Action::Quit,
                    _ => {}
                },
            },
        }
        Action::None
    }

    /// Apply a settlement coming back from the worker.
    pub fn apply(&mut self, settlement: Settlement) {
        if self.controller.settle(settlement) {
            self.scroll = 0;
        }
    }

    fn leave_focus(&mut self) {
        if self.focus == Focus::File {
            self.load_file();
        }
    }

    fn try_submit(&mut self) -> Action {
        // the button is disabled while a request is in flight
        if self.controller.is_submitting() {
            return Action::None;
        }
        self.load_file();
        self.scroll = 0;
        match self.controller.begin_submit() {
            Some(submission) => Action::Submit(submission),
            None => Action::None,
        }
    }

    fn load_file(&mut self) {
        let path = self.path_input.trim();
        if path.is_empty() {
            self.controller.select_file(None);
            self.notice = None;
            return;
        }

        match SelectedFile::from_path(path) {
            Ok(file) => {
                self.notice = Some(format!("Loaded {} ({} bytes)", file.file_name, file.len()));
                self.controller.select_file(Some(file));
            }
            Err(e) => {
                self.notice = Some(e.to_string());
                self.controller.select_file(None);
            }
        }
    }
}

pub fn run_form(cfg: &Config) -> Result<()> {
    let service = Arc::new(HttpParseService::new(cfg.service.endpoint.clone()));
    let controller = SubmissionController::with_bank(service, cfg.form.default_bank);
    let mut app = FormApp::new(controller);

    let (submit_tx, submit_rx) = tokio::sync::mpsc::unbounded_channel();
    let (settle_tx, settle_rx) = std::sync::mpsc::channel();
    tokio::spawn(run_worker(submit_rx, settle_tx));
    info!(endpoint = %cfg.service.endpoint, "form opened");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = form_loop(&mut terminal, &mut app, &submit_tx, &settle_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

fn form_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut FormApp,
    submissions: &UnboundedSender<Submission>,
    settlements: &Receiver<Settlement>,
) -> Result<()> {
    loop {
        while let Ok(settlement) = settlements.try_recv() {
            app.apply(settlement);
        }

        terminal.draw(|f| draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match app.handle_key(key) {
                    Action::Quit => break,
                    Action::Submit(submission) => submissions
                        .send(submission)
                        .map_err(|_| anyhow!("submission worker stopped"))?,
                    Action::None => {}
                }
            }
        }
    }
    Ok(())
}

fn focus_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default().borders(Borders::ALL).title(title).border_style(style)
}

pub fn draw(f: &mut Frame, app: &FormApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(5),
        ])
        .split(f.area());

    let header = Paragraph::new(Line::from(Span::styled(
        "Credit Card Statement Parser",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let mut banks: Vec<Span> = Vec::new();
    for b in BankId::ALL {
        if b == app.bank() {
            banks.push(Span::styled(
                format!("(*) {}", b.label()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
        } else {
            banks.push(Span::raw(format!("( ) {}", b.label())));
        }
        banks.push(Span::raw("   "));
    }
    let bank_widget = Paragraph::new(Line::from(banks))
        .block(focus_block("1. Select Bank", app.focus == Focus::Bank));
    f.render_widget(bank_widget, chunks[1]);

    let file_widget = Paragraph::new(app.path_input.as_str())
        .block(focus_block("2. Upload PDF Statement (path)", app.focus == Focus::File));
    f.render_widget(file_widget, chunks[2]);

    let submitting = app.state().is_submitting();
    let (label, style) = if submitting {
        ("Parsing...", Style::default().fg(Color::Gray))
    } else {
        (
            "Parse Statement",
            Style::default().fg(Color::White).bg(Color::Blue).add_modifier(Modifier::BOLD),
        )
    };
    let button = Paragraph::new(Span::styled(label, style))
        .alignment(Alignment::Center)
        .block(focus_block("", app.focus == Focus::Submit));
    f.render_widget(button, chunks[3]);

    let hint = app
        .notice
        .clone()
        .unwrap_or_else(|| "Tab=next field  ←/→=bank  Enter=parse  PgUp/PgDn=scroll  Esc=quit".to_string());
    f.render_widget(
        Paragraph::new(Span::styled(hint, Style::default().fg(Color::Gray))),
        chunks[4],
    );

    let result = match app.state() {
        RequestState::Idle => Paragraph::new("Pick a bank and a PDF, then press Enter.")
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL)),
        RequestState::Submitting => Paragraph::new("Parsing...")
            .block(Block::default().borders(Borders::ALL)),
        RequestState::Failed(msg) => Paragraph::new(Line::from(vec![
            Span::styled("Error: ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::styled(msg.clone(), Style::default().fg(Color::Red)),
        ]))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        ),
        RequestState::Succeeded(parsed) => {
            let mut lines: Vec<Line> = Vec::new();
            if let Some(summary) = StatementSummary::from_result(parsed) {
                for l in render_summary(&summary).lines() {
                    lines.push(Line::styled(l.to_string(), Style::default().fg(Color::Cyan)));
                }
                lines.push(Line::raw(""));
            }
            for l in parsed.render_pretty().lines() {
                lines.push(Line::raw(l.to_string()));
            }
            Paragraph::new(Text::from(lines))
                .scroll((app.scroll, 0))
                .block(Block::default().borders(Borders::ALL).title("Parsed Data"))
        }
    };
    f.render_widget(result, chunks[5]);
}
