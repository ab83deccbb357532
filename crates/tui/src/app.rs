use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use memtui_core::{
    AppConfig, Banner, CardId, CardView, GameController, Session, Status, TimerEvent,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::banner;

const TICK_RATE: Duration = Duration::from_millis(250);
const TIMER_CHANNEL_CAPACITY: usize = 16;
const MENU_ITEMS: [&str; 2] = ["Start Game", "Quit"];
const CARD_BACK: &str = "░░░░";

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    success: Color,
    warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Menu,
    Play,
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// Terminal front end for the memory game.
pub struct MemoryApp {
    controller: GameController,
    timer_rx: mpsc::Receiver<TimerEvent>,
    columns: usize,
    screen: Screen,
    state: UiState,
    theme: Theme,
}

impl MemoryApp {
    pub fn new(config: &AppConfig) -> Self {
        let (timer_tx, timer_rx) = mpsc::channel(TIMER_CHANNEL_CAPACITY);
        Self {
            controller: GameController::new(config, timer_tx),
            timer_rx,
            columns: config.columns.max(1),
            screen: Screen::Menu,
            state: UiState::default(),
            theme: Theme::default(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal).await;
        restore_terminal(&mut terminal)?;
        info!(moves = self.controller.session().moves(), "Exiting");
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }

            tokio::select! {
                maybe_event = event_rx.recv() => {
                    match maybe_event {
                        Some(AppEvent::Input(event)) => self.handle_input(event),
                        Some(AppEvent::Tick) => {}
                        None => break,
                    }
                }
                Some(timer) = self.timer_rx.recv() => {
                    self.controller.handle_timer(timer);
                }
            }
        }
        Ok(())
    }

    fn handle_input(&mut self, event: Event) {
        match (self.screen, event) {
            (Screen::Menu, Event::Key(key)) if key.kind == KeyEventKind::Press => {
                self.handle_menu_key(key)
            }
            (Screen::Play, Event::Key(key)) if key.kind == KeyEventKind::Press => {
                self.handle_play_key(key)
            }
            (Screen::Play, Event::Mouse(mouse)) => self.handle_play_mouse(mouse),
            _ => {}
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.state.should_quit = true;
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.move_menu_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_menu_cursor(-1),
            KeyCode::Enter => match self.state.menu_cursor {
                0 => {
                    if self.controller.session().status() == Status::NotStarted {
                        self.controller.start_game();
                    } else {
                        self.controller.reset_game();
                    }
                    self.state.cursor = 0;
                    self.screen = Screen::Play;
                }
                _ => self.state.should_quit = true,
            },
            _ => {}
        }
    }

    fn handle_play_key(&mut self, key: KeyEvent) {
        let total = self.controller.session().cards().len();
        match key.code {
            KeyCode::Esc => self.screen = Screen::Menu,
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.state.should_quit = true;
            }
            KeyCode::Left | KeyCode::Char('h') => self.state.move_cursor(0, -1, self.columns, total),
            KeyCode::Right | KeyCode::Char('l') => self.state.move_cursor(0, 1, self.columns, total),
            KeyCode::Up | KeyCode::Char('k') => self.state.move_cursor(-1, 0, self.columns, total),
            KeyCode::Down | KeyCode::Char('j') => self.state.move_cursor(1, 0, self.columns, total),
            KeyCode::Enter | KeyCode::Char(' ') => self.click_at(self.state.cursor),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.controller.reset_game();
                self.state.cursor = 0;
            }
            _ => {}
        }
    }

    fn handle_play_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let hit = self
            .state
            .card_areas
            .iter()
            .position(|area| contains(*area, mouse.column, mouse.row));
        if let Some(index) = hit {
            self.state.cursor = index;
            self.click_at(index);
        }
    }

    fn click_at(&mut self, index: usize) {
        let target: Option<CardId> = self
            .controller
            .session()
            .card_views()
            .nth(index)
            .and_then(|view| view.click());
        match target {
            Some(card) => self.controller.select_card(card),
            None => debug!(index, "Click ignored"),
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        match self.screen {
            Screen::Menu => self.draw_menu(frame),
            Screen::Play => self.draw_play(frame),
        }
    }

    fn draw_menu(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let banner_lines = banner::render("MEMORY");
        let banner_height = banner_lines.len() as u16;
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length((banner_height + 2).min(area.height)),
                Constraint::Min(3),
            ])
            .split(area);

        let banner_content: Vec<Line> = banner_lines
            .into_iter()
            .map(|line| {
                Line::from(Span::styled(
                    line,
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD),
                ))
            })
            .collect();
        let banner = Paragraph::new(banner_content).alignment(Alignment::Center);
        frame.render_widget(banner, layout[0]);

        let menu_height = (MENU_ITEMS.len() as u16)
            .saturating_mul(2)
            .saturating_add(2)
            .min(layout[1].height);
        let menu_width = 28.min(layout[1].width.max(1));
        let menu_area = centered_rect(menu_width, menu_height, layout[1]);

        let menu_lines: Vec<Line> = MENU_ITEMS
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                if idx == self.state.menu_cursor {
                    Line::from(Span::styled(
                        format!("▶ {item}"),
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(Span::styled(
                        format!("  {item}"),
                        Style::default().fg(self.theme.primary_fg),
                    ))
                }
            })
            .collect();

        let menu = Paragraph::new(menu_lines)
            .block(Block::default().borders(Borders::ALL).title("Memory Game"))
            .alignment(Alignment::Center);
        frame.render_widget(menu, menu_area);
    }

    fn draw_play(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(3),
                Constraint::Length(3),
            ])
            .split(area);

        let session = self.controller.session();
        self.render_status(frame, layout[0], session);
        let card_areas = self.render_grid(frame, layout[1], session);
        self.render_help(frame, layout[2]);
        if session.status() == Status::Won {
            self.render_game_over(frame, area, session);
        }
        self.state.card_areas = card_areas;
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, session: &Session) {
        let pairs = session.cards().len() / 2;
        let summary = format!(
            "Moves: {}   Pairs: {}/{}",
            session.moves(),
            session.deck().matched_pairs(),
            pairs
        );
        let banner_line = match session.banner() {
            Some(banner @ Banner::Match) => Line::from(Span::styled(
                banner.message(),
                Style::default().fg(self.theme.success),
            )),
            Some(banner @ Banner::Victory) => Line::from(Span::styled(
                banner.message(),
                Style::default()
                    .fg(self.theme.warning)
                    .add_modifier(Modifier::BOLD),
            )),
            None => Line::from(""),
        };
        let paragraph = Paragraph::new(vec![Line::from(summary), banner_line])
            .block(Block::default().borders(Borders::ALL).title("Memory Game"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_grid(&self, frame: &mut Frame, area: Rect, session: &Session) -> Vec<Rect> {
        let views: Vec<CardView<'_>> = session.card_views().collect();
        if views.is_empty() {
            return Vec::new();
        }
        let columns = self.columns.min(views.len());
        let rows = views.len().div_ceil(columns);

        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
            .split(area);

        let mut card_areas = Vec::with_capacity(views.len());
        for (row_index, chunk) in views.chunks(columns).enumerate() {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
                .split(row_areas[row_index]);
            for (col_index, view) in chunk.iter().enumerate() {
                let index = row_index * columns + col_index;
                let cell = cells[col_index];
                self.render_card(frame, cell, view, index == self.state.cursor);
                card_areas.push(cell);
            }
        }
        card_areas
    }

    fn render_card(&self, frame: &mut Frame, area: Rect, view: &CardView<'_>, focused: bool) {
        let (label, style) = if view.card.matched {
            (view.card.image.label(), Style::default().fg(self.theme.success))
        } else if view.face_up {
            (
                view.card.image.label(),
                Style::default()
                    .fg(self.theme.warning)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            (CARD_BACK.to_string(), Style::default().fg(self.theme.muted))
        };

        let border_style = if focused {
            Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            style
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);
        let padding = inner.height.saturating_sub(1) / 2;
        let mut lines: Vec<Line> = (0..padding).map(|_| Line::from("")).collect();
        lines.push(Line::from(Span::styled(label, style)));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let help = "←↓↑→/hjkl move • Enter/Space/click flip • r new deal • Esc menu • q quit";
        let paragraph = Paragraph::new(Line::from(Span::styled(
            help,
            Style::default().fg(self.theme.muted),
        )))
        .block(Block::default().borders(Borders::ALL).title("Keys"))
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn render_game_over(&self, frame: &mut Frame, area: Rect, session: &Session) {
        let popup = centered_rect(36, 6, area);
        let lines = vec![
            Line::from(Span::styled(
                "You won!",
                Style::default()
                    .fg(self.theme.success)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("Finished in {} moves", session.moves())),
            Line::from(""),
            Line::from("Press r to play again"),
        ];
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Game Over"))
            .alignment(Alignment::Center);
        frame.render_widget(Clear, popup);
        frame.render_widget(paragraph, popup);
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

#[derive(Default)]
struct UiState {
    menu_cursor: usize,
    cursor: usize,
    card_areas: Vec<Rect>,
    should_quit: bool,
}

impl UiState {
    fn move_menu_cursor(&mut self, delta: isize) {
        let last = MENU_ITEMS.len() as isize - 1;
        self.menu_cursor = (self.menu_cursor as isize + delta).clamp(0, last) as usize;
    }

    /// Move the grid cursor, staying on a dealt card.
    fn move_cursor(&mut self, row_delta: isize, col_delta: isize, columns: usize, total: usize) {
        if total == 0 {
            self.cursor = 0;
            return;
        }
        let columns = columns.max(1) as isize;
        let row = self.cursor as isize / columns + row_delta;
        let col = (self.cursor as isize % columns + col_delta).clamp(0, columns - 1);
        let candidate = row * columns + col;
        if row >= 0 && candidate >= 0 && (candidate as usize) < total {
            self.cursor = candidate as usize;
        }
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
