use anyhow::{Context as _, Result};
use clap::Parser;
use crossterm::{
    ExecutableCommand,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::fs::File;
use std::io::{Stdout, stdout};
use std::sync::Mutex;
use std::time::{Duration, Instant};

mod app;
mod config;
mod connectivity;
mod feed;
mod palette;
mod widgets;

use app::App;
use config::Cli;
use widgets::header::{self, HeaderLayout};
use widgets::help::Help;

/// Redraw cadence while the badge is fading between tones.
const FRAME_RATE: Duration = Duration::from_millis(30);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let feed = cli.feed_monitor().context("invalid --feed")?;
    tracing::info!(source = feed.source(), "starting livewatch");

    let mut app = App::new(feed);
    app.set_crumbs(cli.crumbs.clone());
    app.on_notifications_click(|| tracing::info!("notifications opened"));

    // Setup terminal
    let mut terminal = setup_terminal()?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    restore_terminal(terminal)?;
    app.shutdown().await;

    result
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = stdout();
    enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(DisableMouseCapture)?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(250);

    loop {
        terminal.draw(|f| draw(f, app, Instant::now()))?;

        let mut timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if app.is_fading(Instant::now()) {
            timeout = timeout.min(FRAME_RATE);
        }

        if crossterm::event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match handle_key(key, app) {
                        Action::Continue => {}
                        Action::Quit => break,
                    }
                }
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    handle_mouse(mouse, app, header_area(Rect::new(0, 0, size.width, size.height)));
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

enum Action {
    Continue,
    Quit,
}

fn handle_key(key: KeyEvent, app: &mut App) -> Action {
    if app.show_help() {
        // Any key closes help
        app.toggle_help();
        return Action::Continue;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return Action::Quit,
        KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Char('n') => app.notifications_clicked(),
        KeyCode::Char('c') => app.toggle_connectivity(),
        KeyCode::Esc => app.clear_message(),
        _ => {}
    }
    Action::Continue
}

fn handle_mouse(mouse: MouseEvent, app: &mut App, header: Rect) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    let pos = Position::new(mouse.column, mouse.row);
    if HeaderLayout::new(header).hits_bell(pos) {
        app.notifications_clicked();
    }
}

fn header_area(area: Rect) -> Rect {
    split(area)[0]
}

fn split(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(header::HEIGHT), // Status header
            Constraint::Min(5),                 // Main content
            Constraint::Length(1),              // Key hints
        ])
        .split(area)
}

fn draw(f: &mut Frame, app: &App, now: Instant) {
    let chunks = split(f.area());

    let crumbs = app.crumbs();
    f.render_widget(app.header(now).crumbs(&crumbs), chunks[0]);
    draw_content(f, app, chunks[1]);
    draw_status(f, app, chunks[2]);

    if app.show_help() {
        f.render_widget(Help::new(), centered_rect(70, 60, f.area()));
    }
}

fn draw_content(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Live Monitoring ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette::rule()));

    let label = Style::default().fg(palette::muted());
    let presentation = app.connectivity().presentation();
    let last_change = app
        .last_change()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Feed         ", label),
            Span::raw(app.feed_source().to_string()),
        ]),
        Line::from(vec![
            Span::styled("State        ", label),
            Span::styled(
                presentation.label,
                Style::default()
                    .fg(presentation.tone.swatch().text)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Last change  ", label),
            Span::raw(last_change),
        ]),
    ];
    if let Some(msg) = app.message() {
        lines.push(Line::raw(""));
        lines.push(Line::styled(msg.to_string(), Style::default().fg(palette::yellow())));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let mode_str = if app.is_manual() {
        "[manual]"
    } else {
        "[probe]"
    };

    let mut hints = String::from("n:notifications ");
    if app.is_manual() {
        hints.push_str("c:toggle feed ");
    }
    hints.push_str("?:help ");

    let status = Line::from(vec![
        Span::raw(format!("{} ", mode_str)),
        Span::raw(hints),
        Span::styled(
            "q:quit",
            Style::default()
                .fg(palette::rose())
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(status), area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
