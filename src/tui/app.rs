//! Main application state and rendering

use crate::config::Config;
use crate::game::{Game, Notice, NoticeTiming, UiEvent};
use crate::scan::{
    PromptPermissionGate, PromptScanner, RequestStatus, ScanContext, ScanFlowEvent,
    ScanOrchestrator, ScannerOptions,
};
use crate::tui::widgets::ProgressBar;
use crate::tui::{centered_rect, create_clue_layout, create_main_layout, styled_block};
use crate::tui::{Theme, HELP_TEXT, SMALL_LOGO};
use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::time::Duration;
use tracing::{debug, info};

type Scanner = ScanOrchestrator<PromptPermissionGate, PromptScanner>;

/// Application state
pub struct App {
    pub game: Game,
    pub theme: Theme,
    pub running: bool,
    pub show_help: bool,
    pub scan: Scanner,
    pub notice_timing: NoticeTiming,
    pub tick: Duration,
}

impl App {
    pub fn new(game: Game, config: &Config, context: ScanContext) -> Self {
        let scan = ScanOrchestrator::new(
            PromptPermissionGate::new(config.camera.permission),
            PromptScanner::new(context),
            ScannerOptions::qr_only(),
        );

        Self {
            game,
            theme: Theme::default(),
            running: true,
            show_help: false,
            scan,
            notice_timing: config.ui.notice_timing(),
            tick: Duration::from_millis(config.ui.tick_ms),
        }
    }

    /// Wait up to one tick for input, then deliver any scan results
    pub fn handle_input(&mut self) -> std::io::Result<bool> {
        if event::poll(self.tick)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                Event::Paste(text) => self.handle_paste(&text),
                _ => {}
            }
        }
        self.update();
        Ok(self.running)
    }

    /// Handle a single key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.running = false;
            return;
        }

        // Permission dialog captures all keys while open
        if self.scan.gate().is_prompting() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    self.scan.gate_mut().answer(true)
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.scan.gate_mut().answer(false)
                }
                _ => {}
            }
            self.update();
            return;
        }

        // Scanner prompt captures all keys while open
        if self.scan.scanner().is_open() {
            let scanner = self.scan.scanner_mut();
            match key.code {
                KeyCode::Enter => scanner.submit(),
                KeyCode::Esc => scanner.cancel(),
                KeyCode::Backspace => scanner.backspace(),
                KeyCode::Char(c) => scanner.push_char(c),
                _ => {}
            }
            self.update();
            return;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.running = false;
            }
            KeyCode::Char('?') => {
                self.show_help = !self.show_help;
            }
            KeyCode::Esc => {
                self.show_help = false;
            }
            KeyCode::Char('s') | KeyCode::Char(' ') | KeyCode::Enter => {
                self.show_help = false;
                self.request_scan();
            }
            _ => {}
        }
        self.update();
    }

    /// Pasted text goes straight into an open scanner
    pub fn handle_paste(&mut self, text: &str) {
        let payload = text.trim_end_matches(['\r', '\n']);
        self.scan.scanner_mut().push_str(payload);
    }

    /// Deliver a finished scan request to the game
    pub fn update(&mut self) {
        if let Some(event) = self.scan.poll() {
            self.apply_flow_event(event);
        }
    }

    fn request_scan(&mut self) {
        if self.game.is_finished() {
            return;
        }

        match self.scan.request_scan() {
            RequestStatus::Scanning => debug!("Scanner opened"),
            RequestStatus::AwaitingPermission => debug!("Waiting for camera permission"),
            RequestStatus::Busy => debug!("Scan already in progress"),
        }
    }

    fn apply_flow_event(&mut self, event: ScanFlowEvent) {
        match event {
            ScanFlowEvent::PermissionDenied => {
                self.game.add_notice(Notice::permission_denied());
            }
            ScanFlowEvent::Outcome(outcome) => {
                if self.game.submit_scan_result(outcome) == UiEvent::Completed {
                    info!(stats = ?self.game.stats, "Player escaped");
                }
            }
        }
    }

    /// The latest notice, while it is still on screen
    pub fn active_notice(&self) -> Option<&Notice> {
        self.game
            .latest_notice()
            .filter(|notice| !notice.is_expired(Utc::now(), &self.notice_timing))
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let layout = create_main_layout(area);

        self.render_header(frame, layout[0]);
        if self.game.is_finished() {
            self.render_escaped(frame, layout[1]);
        } else {
            self.render_clue(frame, layout[1]);
        }
        self.render_notice(frame, layout[2]);
        self.render_status_bar(frame, layout[3]);

        if self.scan.gate().is_prompting() {
            self.render_permission_dialog(frame);
        } else if self.scan.scanner().is_open() {
            self.render_scanner(frame);
        }

        // Overlay help if showing
        if self.show_help {
            self.render_help_overlay(frame);
        }
    }

    fn bordered(&self, color: Color) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let header_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(12),
                Constraint::Min(10),
                Constraint::Length(18),
            ])
            .split(area);

        let logo = Paragraph::new(SMALL_LOGO)
            .style(Style::default().fg(self.theme.accent).add_modifier(Modifier::BOLD))
            .block(self.bordered(self.theme.border));
        frame.render_widget(logo, header_layout[0]);

        let title = Paragraph::new("Riddle Hunt")
            .style(Style::default().fg(self.theme.header))
            .alignment(Alignment::Center)
            .block(self.bordered(self.theme.border));
        frame.render_widget(title, header_layout[1]);

        let (solved, total) = self.game.progress();
        let stage_text = if self.game.is_finished() {
            " Escaped! ".to_string()
        } else {
            format!(" Riddle {}/{} ", solved + 1, total)
        };
        let stage = Paragraph::new(stage_text)
            .style(Style::default().fg(self.theme.fg))
            .alignment(Alignment::Right)
            .block(self.bordered(self.theme.border));
        frame.render_widget(stage, header_layout[2]);
    }

    fn render_clue(&self, frame: &mut Frame, area: Rect) {
        let chunks = create_clue_layout(area);

        let clue_text = self.game.current_clue_text().unwrap_or_default();
        let clue = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                clue_text.to_string(),
                Style::default().fg(self.theme.fg).add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(styled_block("Clue", &self.theme));
        frame.render_widget(clue, chunks[0]);

        let (solved, total) = self.game.progress();
        let progress = ProgressBar::new("Solved", solved, total)
            .color(self.theme.accent)
            .complete_color(self.theme.success);
        frame.render_widget(progress, chunks[1]);

        let hint = if self.scan.is_pending() {
            "Scanning..."
        } else {
            "[S] Scan clue   [?] Help   [Q] Quit"
        };
        let hint = Paragraph::new(hint)
            .style(Style::default().fg(self.theme.warning))
            .alignment(Alignment::Center);
        frame.render_widget(hint, chunks[2]);
    }

    fn render_escaped(&self, frame: &mut Frame, area: Rect) {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Congratulations, you escaped!",
                Style::default().fg(self.theme.success).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(format!(
                "{} riddles solved in {} scans",
                self.game.catalog().len(),
                self.game.stats.scans_submitted
            )),
            Line::from(""),
            Line::from("Press Q to quit"),
        ];

        let escaped = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(styled_block("Vendeta", &self.theme));
        frame.render_widget(escaped, area);
    }

    fn render_notice(&self, frame: &mut Frame, area: Rect) {
        let line = match self.active_notice() {
            Some(notice) => Line::from(vec![
                Span::styled(
                    format!("{} ", notice.level.symbol()),
                    Style::default().fg(self.theme.level_color(notice.level)),
                ),
                Span::styled(
                    notice.text.clone(),
                    Style::default()
                        .fg(self.theme.level_color(notice.level))
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            None => Line::from(""),
        };

        let notice = Paragraph::new(line)
            .alignment(Alignment::Center)
            .block(self.bordered(self.theme.border));
        frame.render_widget(notice, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let status_text = format!(" {} | Press ? for help ", self.game.check_status());

        let status = Paragraph::new(status_text)
            .style(Style::default().fg(self.theme.fg).bg(Color::DarkGray));
        frame.render_widget(status, area);
    }

    fn render_scanner(&self, frame: &mut Frame) {
        let popup_area = centered_rect(60, 9, frame.area());
        frame.render_widget(Clear, popup_area);

        let scanner = self.scan.scanner();
        let text = vec![
            Line::from(""),
            Line::from("Point the camera at the QR code"),
            Line::from("(type or paste its contents)"),
            Line::from(""),
            Line::from(vec![
                Span::styled("> ", Style::default().fg(self.theme.accent)),
                Span::styled(scanner.input().to_string(), Style::default().fg(self.theme.fg)),
                Span::styled(
                    "_",
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::SLOW_BLINK),
                ),
            ]),
            Line::from(""),
            Line::from("Enter to scan, Esc to cancel"),
        ];

        let prompt = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.accent))
                    .title(format!(" {} scanner ", scanner.context().title)),
            );
        frame.render_widget(prompt, popup_area);
    }

    fn render_permission_dialog(&self, frame: &mut Frame) {
        let popup_area = centered_rect(50, 8, frame.area());
        frame.render_widget(Clear, popup_area);

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Allow camera access?",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from("The camera is needed to scan clues."),
            Line::from(""),
            Line::from("[Y] Allow   [N] Deny"),
        ];

        let dialog = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(" Camera Permission "),
            );
        frame.render_widget(dialog, popup_area);
    }

    fn render_help_overlay(&self, frame: &mut Frame) {
        let popup_area = centered_rect(52, 22, frame.area());
        frame.render_widget(Clear, popup_area);

        let help = Paragraph::new(HELP_TEXT)
            .style(Style::default().fg(self.theme.fg))
            .block(self.bordered(self.theme.accent));
        frame.render_widget(help, popup_area);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Game::default(), &Config::default(), ScanContext::new("Vendeta"))
    }
}
