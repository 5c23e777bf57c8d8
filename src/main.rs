mod app;
mod catalog;
mod config;
mod engine;
mod error;
mod event;
mod keyboard;
mod session;
mod ui;

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use app::App;
use catalog::record::Difficulty;
use config::{Config, ConfigFile};
use engine::matcher::InputMode;
use event::{AppEvent, EventHandler};
use session::state::Phase;
use session::view::Outcome;
use ui::components::progress_bar::ProgressBar;
use ui::components::quiz_card::QuizCard;
use ui::components::results_card::ResultsCard;
use ui::layout::{AppLayout, pack_hint_lines};

#[derive(Parser)]
#[command(name = "chordquiz", version, about = "Timed terminal quiz for keyboard shortcuts")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Input mode (immediate, buffered)")]
    mode: Option<InputMode>,

    #[arg(short, long, help = "Shortcut platform (auto, mac, win)")]
    platform: Option<String>,

    #[arg(short, long, help = "Shortcut catalog JSON file")]
    catalog: Option<PathBuf>,

    #[arg(short, long, help = "Number of questions per quiz")]
    questions: Option<usize>,

    #[arg(short, long, help = "Seconds allowed per question")]
    seconds: Option<u32>,

    #[arg(long, help = "Write logs here instead of the data directory")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(theme) = &self.theme {
            config.theme = theme.clone();
        }
        if let Some(mode) = self.mode {
            config.input_mode = mode;
        }
        if let Some(platform) = &self.platform {
            config.platform = platform.clone();
        }
        if let Some(path) = &self.catalog {
            config.catalog_path = Some(path.clone());
        }
        if let Some(questions) = self.questions {
            config.question_count = questions;
        }
        if let Some(seconds) = self.seconds {
            config.question_secs = seconds;
        }
        config.normalize();
    }
}

fn init_logging(path: &Path) -> Option<WorkerGuard> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name()?;
    std::fs::create_dir_all(dir).ok()?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_env("CHORDQUIZ_LOG")
        .unwrap_or_else(|_| EnvFilter::new("chordquiz=info"));
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(()) => Some(guard),
        Err(_) => None,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(Config::log_path);
    let _log_guard = init_logging(&log_path);

    let config_file = ConfigFile::open(Config::config_path());
    let mut config = config_file.config();
    cli.apply(&mut config);

    let mut app = App::new(config, config_file)?;
    tracing::info!(
        platform = %app.session.platform(),
        mode = %app.input_mode(),
        shortcuts = app.session.catalog().len(),
        "chordquiz starting"
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Needed to see bare modifier presses and Super/Meta on some terminals.
    let keyboard_enhanced = execute!(
        io::stdout(),
        PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
        )
    )
    .is_ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    if keyboard_enhanced {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(%err, "exited with error");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        let event = events.next()?;
        let now = Instant::now();
        match event {
            AppEvent::Key(key) => handle_key(app, key, now),
            AppEvent::Tick | AppEvent::Resize => {}
        }
        app.tick(now);

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    let phase = app.phase();

    // Ctrl+C is a quiz answer while a question is live.
    if phase != Phase::Active
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && key.code == KeyCode::Char('c')
    {
        app.should_quit = true;
        return;
    }

    if phase.in_quiz() {
        match key.code {
            KeyCode::F(9) => return app.retake(now),
            KeyCode::F(10) => return app.go_to_menu(),
            _ => {}
        }
    }

    match phase {
        Phase::Welcome => handle_menu_key(app, key, now),
        Phase::Active => handle_quiz_key(app, key, now),
        Phase::Locked(outcome) => handle_locked_key(app, key, outcome),
        Phase::Revealed => handle_revealed_key(app, key, now),
        Phase::Results(_) => handle_results_key(app, key, now),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('1') => app.start(Difficulty::Easy, now),
        KeyCode::Char('2') => app.start(Difficulty::Medium, now),
        KeyCode::Char('3') => app.start(Difficulty::Hard, now),
        KeyCode::Char('i') => app.toggle_input_mode(),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => app.start_selected(now),
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent, now: Instant) {
    if app.input_mode() == InputMode::Buffered {
        match key.code {
            KeyCode::F(2) => return app.submit(now),
            KeyCode::F(4) => return app.clear_input(),
            _ => {}
        }
    }
    app.answer_key(&key, now);
}

fn handle_locked_key(app: &mut App, key: KeyEvent, outcome: Outcome) {
    if outcome == Outcome::Correct {
        return;
    }
    if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('r')) {
        app.reveal();
    }
}

fn handle_revealed_key(app: &mut App, key: KeyEvent, now: Instant) {
    if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
        app.continue_quiz(now);
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Enter | KeyCode::Char('p') | KeyCode::Esc => app.go_to_menu(),
        KeyCode::Char('h') => app.try_harder(now),
        KeyCode::Char('r') => app.retake(now),
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.phase() {
        Phase::Welcome => render_menu(frame, app),
        Phase::Results(_) => render_results(frame, app),
        _ => render_quiz(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, info: &str) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " chordquiz ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default()
                .fg(colors.text_dim())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, hints: &[&str]) {
    let lines: Vec<Line> = pack_hint_lines(hints, area.width as usize)
        .into_iter()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(app.theme.colors.text_dim()))))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let header_info = format!(" | {} shortcuts", app.session.catalog().len());
    render_header(frame, app, layout[0], &header_info);

    let menu_area = ui::layout::centered_rect(50, 80, layout[1]);
    frame.render_widget(&app.menu, menu_area);

    if let Some(notice) = &app.notice {
        let line = Line::from(Span::styled(
            format!(" {notice}"),
            Style::default().fg(colors.incorrect()),
        ));
        frame.render_widget(Paragraph::new(line), layout[2]);
    }

    render_footer(
        frame,
        app,
        layout[3],
        &["[1-3] Start", "[Enter] Start selected", "[i] Input mode", "[q] Quit"],
    );
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let screen = app.screen();
    let app_layout = AppLayout::new(frame.area());

    let difficulty = app
        .session
        .state()
        .map(|s| s.difficulty)
        .or(app.session.last_difficulty())
        .map_or("", Difficulty::label);
    let header_info = format!(" | {difficulty} | {} input", app.input_mode());
    render_header(frame, app, app_layout.header, &header_info);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(app_layout.main);

    frame.render_widget(
        ProgressBar::for_question(screen.index, screen.total, screen.progress(), app.theme),
        main[0],
    );
    let card_area = ui::layout::centered_rect(70, 90, main[1]);
    frame.render_widget(QuizCard::new(screen, app.input_mode(), app.theme), card_area);

    let hints: &[&str] = match app.phase() {
        Phase::Active if app.input_mode() == InputMode::Buffered => {
            &["[F2] Submit", "[F4] Clear", "[F9] Retake", "[F10] Exit"]
        }
        Phase::Active => &["Press the shortcut", "[F9] Retake", "[F10] Exit"],
        Phase::Locked(Outcome::Correct) => &["[F9] Retake", "[F10] Exit"],
        Phase::Locked(_) => &["[Enter] Show answer", "[F9] Retake", "[F10] Exit"],
        Phase::Revealed => &["[Enter] Continue", "[F9] Retake", "[F10] Exit"],
        _ => &[],
    };
    render_footer(frame, app, app_layout.footer, hints);
}

fn render_results(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let app_layout = AppLayout::new(area);
    render_header(frame, app, app_layout.header, " | results");

    if let Some(results) = app.screen().results {
        let card_area = ui::layout::centered_rect(60, 60, app_layout.main);
        frame.render_widget(
            ResultsCard::new(results, app.session.last_difficulty(), app.theme),
            card_area,
        );
        let hints: &[&str] = if results.offer_harder {
            &["[h] Try Hard", "[r] Retake", "[Enter] Play again", "[q] Quit"]
        } else {
            &["[r] Retake", "[Enter] Play again", "[q] Quit"]
        };
        render_footer(frame, app, app_layout.footer, hints);
    }
}
