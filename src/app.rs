use std::time::Instant;

use anyhow::Result;
use crossterm::event::KeyEvent;

use crate::catalog::Catalog;
use crate::catalog::record::Difficulty;
use crate::config::{Config, ConfigFile};
use crate::engine::matcher::InputMode;
use crate::keyboard::observed::ObservedKey;
use crate::session::QuizSession;
use crate::session::state::Phase;
use crate::ui::components::menu::Menu;
use crate::ui::screen::ScreenModel;
use crate::ui::theme::Theme;

pub struct App {
    /// Effective settings for this run, CLI overrides included.
    pub config: Config,
    pub config_file: ConfigFile,
    pub theme: &'static Theme,
    pub menu: Menu<'static>,
    pub session: QuizSession<ScreenModel>,
    pub notice: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, config_file: ConfigFile) -> Result<Self> {
        let catalog = Catalog::load(config.catalog_path.as_deref())?;
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        Ok(Self::with_catalog(config, config_file, catalog, theme))
    }

    pub fn with_catalog(
        config: Config,
        config_file: ConfigFile,
        catalog: Catalog,
        theme: &'static Theme,
    ) -> Self {
        let platform = config.platform();
        let mut menu = Menu::new(&catalog, theme);
        menu.input_mode = config.input_mode;
        menu.platform = platform;

        let session = QuizSession::new(
            catalog,
            platform,
            config.input_mode,
            config.session_settings(),
            ScreenModel::default(),
        );

        Self {
            config,
            config_file,
            theme,
            menu,
            session,
            notice: None,
            should_quit: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn screen(&self) -> &ScreenModel {
        self.session.view()
    }

    pub fn input_mode(&self) -> InputMode {
        self.session.input_mode()
    }

    pub fn tick(&mut self, now: Instant) {
        self.session.poll(now);
    }

    pub fn start(&mut self, difficulty: Difficulty, now: Instant) {
        self.menu.select(difficulty);
        match self.session.start_game(difficulty, now) {
            Ok(()) => self.notice = None,
            Err(err) => {
                tracing::warn!(%err, difficulty = difficulty.as_str(), "could not start quiz");
                self.notice = Some(err.to_string());
            }
        }
    }

    pub fn start_selected(&mut self, now: Instant) {
        self.start(self.menu.selected_difficulty(), now);
    }

    pub fn retake(&mut self, now: Instant) {
        if let Err(err) = self.session.retake(now) {
            tracing::warn!(%err, "retake failed");
            self.notice = Some(err.to_string());
        }
    }

    pub fn try_harder(&mut self, now: Instant) {
        if let Err(err) = self.session.try_harder(now) {
            tracing::warn!(%err, "try harder failed");
            self.notice = Some(err.to_string());
        }
    }

    pub fn go_to_menu(&mut self) {
        if let Some(last) = self.session.last_difficulty() {
            self.menu.select(last);
        }
        self.session.reset_game();
    }

    /// Flips immediate/buffered input and persists the choice, and nothing
    /// else, to the config file.
    pub fn toggle_input_mode(&mut self) {
        let mode = self.session.input_mode().toggled();
        if !self.session.set_input_mode(mode) {
            return;
        }
        self.menu.input_mode = mode;
        self.config.input_mode = mode;
        match self.config_file.save_input_mode(mode) {
            Ok(true) => {}
            Ok(false) => tracing::debug!("config file unreadable, input mode not saved"),
            Err(err) => tracing::warn!(
                path = %self.config_file.path().display(),
                "could not save config: {err:#}"
            ),
        }
    }

    pub fn answer_key(&mut self, key: &KeyEvent, now: Instant) {
        if let Some(observed) = ObservedKey::from_key_event(key) {
            self.session.handle_key(&observed, now);
        }
    }

    pub fn submit(&mut self, now: Instant) {
        self.session.submit(now);
    }

    pub fn clear_input(&mut self) {
        self.session.clear_input();
    }

    pub fn reveal(&mut self) {
        self.session.reveal();
    }

    pub fn continue_quiz(&mut self, now: Instant) {
        self.session.continue_quiz(now);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::session::view::Outcome;
    use crate::ui::screen::FeedbackKind;

    fn app_with_file(config: Config, config_file: ConfigFile) -> App {
        let theme: &'static Theme = Box::leak(Box::new(Theme::default()));
        App::with_catalog(config, config_file, Catalog::bundled().unwrap(), theme)
    }

    fn test_app() -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            platform: "win".to_string(),
            ..Config::default()
        };
        let file = ConfigFile::open(dir.path().join("config.toml"));
        (app_with_file(config, file), dir)
    }

    #[test]
    fn test_start_from_menu_activates_first_question() {
        let (mut app, _dir) = test_app();
        app.menu.next();
        app.start_selected(Instant::now());
        assert_eq!(app.phase(), Phase::Active);
        assert_eq!(app.session.last_difficulty(), Some(Difficulty::Medium));
        assert_eq!(app.screen().total, 10);
        assert_eq!(app.screen().remaining, 15);
    }

    #[test]
    fn test_stray_key_shows_incorrect_feedback() {
        let (mut app, _dir) = test_app();
        let t0 = Instant::now();
        app.start(Difficulty::Easy, t0);
        // F12 is not part of any bundled shortcut.
        app.answer_key(&KeyEvent::new(KeyCode::F(12), KeyModifiers::NONE), t0);
        assert_eq!(app.phase(), Phase::Locked(Outcome::Incorrect));
        let feedback = app.screen().feedback.clone().unwrap();
        assert_eq!(feedback.kind, FeedbackKind::Incorrect);

        app.reveal();
        assert_eq!(app.phase(), Phase::Revealed);
        app.continue_quiz(t0 + Duration::from_secs(1));
        assert_eq!(app.phase(), Phase::Active);
        assert_eq!(app.screen().index, 1);
    }

    #[test]
    fn test_go_to_menu_remembers_difficulty() {
        let (mut app, _dir) = test_app();
        app.start(Difficulty::Hard, Instant::now());
        app.go_to_menu();
        assert_eq!(app.phase(), Phase::Welcome);
        assert_eq!(app.menu.selected_difficulty(), Difficulty::Hard);
        assert_eq!(*app.screen(), ScreenModel::default());
    }

    #[test]
    fn test_toggle_saves_only_input_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "question_secs = 20\n").unwrap();

        let file = ConfigFile::open(path.clone());
        let mut config = file.config();
        config.question_count = 3;
        config.platform = "mac".to_string();
        let mut app = app_with_file(config, file);

        app.toggle_input_mode();
        assert_eq!(app.input_mode(), InputMode::Buffered);
        assert_eq!(app.config.input_mode, InputMode::Buffered);
        assert_eq!(app.config.question_count, 3);

        let on_disk = Config::load_from(&path).unwrap();
        assert_eq!(on_disk.input_mode, InputMode::Buffered);
        assert_eq!(on_disk.question_secs, 20);
        assert_eq!(on_disk.question_count, 10);
        assert_eq!(on_disk.platform, "auto");
    }
}
