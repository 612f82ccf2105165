use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseEvent, MouseEventKind,
};
use ratatui::{DefaultTerminal, Frame};
use tilt_clock_config::Config;
use tilt_clock_core::{DigitalReadout, OrientationSample, TiltFilter, TiltPermission};
use tilt_clock_scene::{AssetLoader, AssetSources, ClockView};

use crate::input::VirtualDevice;
use crate::scheduler::FrameScheduler;
use crate::sound::{Muted, TerminalBell, TickSound};

mod input;
mod logging;
mod scheduler;
mod sound;
mod ui;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    logging::init();
    let (config, save_path) = load_config(Config::default_path());
    let terminal = ratatui::init();
    let result = App::new(config, save_path).run(terminal);
    ratatui::restore();
    result
}

/// Load settings from `path`. Also returns where toggled settings may be
/// saved: nowhere if the file could not be loaded, so a broken file is
/// never replaced with defaults.
fn load_config(path: Option<PathBuf>) -> (Config, Option<PathBuf>) {
    let Some(path) = path else {
        tracing::warn!("no config directory available, settings will not be saved");
        return (Config::default(), None);
    };
    match Config::load_from(&path) {
        Ok(config) => (config, Some(path)),
        Err(err) => {
            tracing::warn!(
                error = %err,
                path = %path.display(),
                "could not load config, using defaults without saving"
            );
            (Config::default(), None)
        }
    }
}

fn fresh_readout(config: &Config) -> DigitalReadout {
    DigitalReadout::new(&Local::now().naive_local(), config.time_format)
}

/// The main application which holds the state and logic of the application.
pub struct App {
    /// Is the application running?
    running: bool,
    config: Config,
    /// Where toggled settings are written back, if anywhere.
    save_path: Option<PathBuf>,
    tilt: TiltFilter,
    device: VirtualDevice,
    view: ClockView,
    scheduler: FrameScheduler<Box<dyn TickSound>>,
    /// Date and time overlays, absent while hidden.
    readout: Option<DigitalReadout>,
    assets: AssetLoader,
    mouse_captured: bool,
    /// Terminal size in cells, for mapping the pointer.
    size: (u16, u16),
}

impl App {
    /// Construct a new instance of [`App`] and start loading assets.
    pub fn new(config: Config, save_path: Option<PathBuf>) -> Self {
        let sound: Box<dyn TickSound> = if config.tick_sound {
            Box::new(TerminalBell::new(io::stdout()))
        } else {
            Box::new(Muted)
        };
        let assets = AssetLoader::spawn(AssetSources {
            backdrop: config.assets.backdrop_texture.clone(),
            environment: config.assets.environment_map.clone(),
            font: config.assets.numeral_font.clone(),
        });
        Self {
            running: false,
            tilt: TiltFilter::new(
                config.tilt.max_tilt_deg,
                config.tilt.damping,
                config.tilt.require_permission,
            ),
            device: VirtualDevice::new(config.tilt.key_step_deg),
            view: ClockView::new(config.framing.framer()),
            scheduler: FrameScheduler::new(sound, config.time_format),
            readout: config.show_readout.then(|| fresh_readout(&config)),
            assets,
            mouse_captured: false,
            size: (0, 0),
            config,
            save_path,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        if self.tilt.permission() == TiltPermission::NotRequired {
            self.capture_mouse();
        }
        let size = terminal.size()?;
        self.size = (size.width, size.height);
        let budget = Duration::from_secs_f64(1.0 / f64::from(self.config.frame_rate.max(1)));

        while self.running {
            let deadline = Instant::now() + budget;
            for asset in self.assets.poll() {
                self.view.apply(asset);
            }
            self.scheduler.advance(
                Local::now().naive_local(),
                &self.tilt,
                &mut self.view,
                self.readout.as_mut(),
            );
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events(deadline)?;
        }

        self.release_mouse();
        Ok(())
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let color = self.config.color_theme.color();
        let (scene, help) = ui::split(frame.area());

        self.view.draw(frame, scene);
        if let Some(readout) = &self.readout {
            ui::render_readout(frame, scene, readout, color);
        }
        if self.tilt.permission() == TiltPermission::Pending {
            ui::render_tilt_prompt(frame, scene, color);
        }
        ui::render_help(frame, help, color);
    }

    /// Reads the crossterm events until the frame deadline.
    fn handle_crossterm_events(&mut self, deadline: Instant) -> color_eyre::Result<()> {
        while self.running {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::Resize(width, height) => {
                    tracing::debug!(width, height, "terminal resized");
                    self.size = (width, height);
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Enter | KeyCode::Char('y')) => self.resolve_permission(true),
            (_, KeyCode::Char('n')) => self.resolve_permission(false),
            (_, KeyCode::Char('t')) => self.toggle_time_format(),
            (_, KeyCode::Char('c')) => self.cycle_color_theme(),
            (_, KeyCode::Char('d')) => self.toggle_readout(),
            (_, KeyCode::Char('0')) => {
                let sample = self.device.level();
                self.feed(sample);
            }
            (_, code) => {
                if let Some(sample) = self.device.nudge(code) {
                    self.feed(sample);
                }
            }
        }
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        if let MouseEventKind::Moved | MouseEventKind::Drag(_) = mouse.kind {
            let (width, height) = self.size;
            let sample = self.device.point(mouse.column, mouse.row, width, height);
            self.feed(sample);
        }
    }

    fn feed(&mut self, sample: OrientationSample) {
        if !self.tilt.on_sample(sample) {
            tracing::trace!(?sample, "orientation sample ignored");
        }
    }

    /// Settle the "Enable Tilt" prompt. Only the first answer counts.
    fn resolve_permission(&mut self, granted: bool) {
        if !self.tilt.resolve_permission(granted) {
            return;
        }
        tracing::info!(granted, "tilt permission resolved");
        if granted {
            self.capture_mouse();
        }
    }

    fn capture_mouse(&mut self) {
        match crossterm::execute!(io::stdout(), EnableMouseCapture) {
            Ok(()) => self.mouse_captured = true,
            Err(err) => tracing::warn!(error = %err, "mouse capture unavailable, use arrow keys"),
        }
    }

    fn release_mouse(&mut self) {
        if self.mouse_captured {
            if let Err(err) = crossterm::execute!(io::stdout(), DisableMouseCapture) {
                tracing::warn!(error = %err, "failed to release mouse capture");
            }
            self.mouse_captured = false;
        }
    }

    /// Toggle between 12-hour and 24-hour time format.
    fn toggle_time_format(&mut self) {
        self.config.time_format = self.config.time_format.toggle();
        self.scheduler.set_time_format(self.config.time_format);
        self.persist();
    }

    /// Cycle through available color themes.
    fn cycle_color_theme(&mut self) {
        self.config.color_theme = self.config.color_theme.next();
        self.persist();
    }

    /// Show or hide the date and time overlays.
    fn toggle_readout(&mut self) {
        self.config.show_readout = !self.config.show_readout;
        self.readout = self.config.show_readout.then(|| fresh_readout(&self.config));
        self.persist();
    }

    fn persist(&self) {
        let Some(path) = &self.save_path else {
            return;
        };
        if let Err(err) = self.config.save_to(path) {
            tracing::warn!(error = %err, "failed to save config");
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tilt_clock_core::{ColorTheme, TimeFormat};

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tilt-clock-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn quiet(mut config: Config) -> Config {
        config.tick_sound = false;
        config
    }

    #[test]
    fn test_broken_config_is_never_overwritten() {
        let dir = scratch_dir("broken");
        let path = dir.join("config.toml");
        let original = r#"
color_theme = "red"
frame_rate = 500

[assets]
backdrop_texture = "/home/me/oak.jpg"
"#;
        fs::write(&path, original).unwrap();

        let (config, save_path) = load_config(Some(path.clone()));
        assert_eq!(config, Config::default());
        assert!(save_path.is_none());

        let mut app = App::new(quiet(config), save_path);
        app.toggle_time_format();
        app.cycle_color_theme();
        app.toggle_readout();

        assert_eq!(fs::read_to_string(&path).unwrap(), original);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_toggles_saved_to_loaded_path() {
        let dir = scratch_dir("saved");
        let path = dir.join("config.toml");
        fs::write(&path, "color_theme = \"red\"\ntick_sound = false\n").unwrap();

        let (config, save_path) = load_config(Some(path.clone()));
        assert_eq!(save_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.color_theme, ColorTheme::Red);

        let mut app = App::new(config, save_path);
        app.toggle_time_format();

        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.time_format, TimeFormat::TwelveHour);
        assert_eq!(saved.color_theme, ColorTheme::Red);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_no_config_dir_means_no_saving() {
        let (config, save_path) = load_config(None);
        assert_eq!(config, Config::default());
        assert!(save_path.is_none());
    }
}
