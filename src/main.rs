use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    cursor::Show,
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
    tty::IsTty,
};
use keycast::{
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging::init_tracing,
    runtime::{CrosstermEventSource, EventSource, FixedTicker, MonotonicClock, Runner, Ticker},
    sound::{self, ClickSound, SoundKind},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Stdout, Write},
    path::PathBuf,
};

/// on-screen virtual keyboard with key highlighting and a live wpm counter
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Renders a virtual keyboard in the terminal, lights up the keys you press, shows what you type in a scrolling strip and estimates your words per minute. Esc quits, Shift clears the text."
)]
pub struct Cli {
    /// frames drawn per second
    #[clap(long)]
    fps: Option<u32>,

    /// blink the text cursor
    #[clap(long)]
    blink: bool,

    /// acknowledgement sound for key presses
    #[clap(long, value_enum)]
    sound: Option<SoundKind>,

    /// wav file played when --sound wav is selected
    #[clap(long)]
    sound_file: Option<PathBuf>,

    /// config file to read instead of the default location
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// write the effective settings back to the config file
    #[clap(long)]
    save_config: bool,

    /// write logs to a file (default location when no path is given)
    #[clap(long, num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,
}

impl Cli {
    /// Command-line values win over the stored configuration
    fn apply(&self, config: &mut Config) {
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if self.blink {
            config.cursor_blink = true;
        }
        if let Some(sound) = self.sound {
            config.sound = sound;
        }
        if let Some(file) = &self.sound_file {
            config.sound_file = Some(file.clone());
        }
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .as_ref()
            .map(|path| path.clone().unwrap_or_else(AppDirs::log_path))
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = cli.log_path() {
        init_tracing(&path)?;
    }

    let store = cli.config_store();
    let mut config = store.load();
    cli.apply(&mut config);
    if cli.save_config {
        store.save(&config)?;
        tracing::info!(path = %store.path().display(), "saved configuration");
    }

    let click = sound::from_config(config.sound, config.sound_file.as_deref());

    let (mut terminal, enhanced) = setup_terminal()?;

    // everything past setup restores the terminal before reporting an error
    let result = session(&mut terminal, &config, click, enhanced);

    restore_terminal(terminal.backend_mut(), enhanced)?;
    tracing::info!("keyboard closed");

    result
}

fn session(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    config: &Config,
    click: Box<dyn ClickSound>,
    enhanced: bool,
) -> Result<(), Box<dyn Error>> {
    let size = terminal.size()?;
    let clock = MonotonicClock::new();
    let mut app = App::new(
        config,
        click,
        Rect::new(0, 0, size.width, size.height),
        clock.now_ms(),
    );
    if enhanced {
        app.keyboard.set_auto_release(None);
    }

    tracing::info!(
        fps = config.fps,
        sound = %config.sound,
        blink = config.cursor_blink,
        enhanced,
        auto_release_ms = ?app.keyboard.auto_release_ms(),
        "starting keyboard"
    );

    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(config.frame_interval()),
    );
    run(terminal, &mut app, &mut runner, &clock)
}

/// Raw mode, alternate screen, mouse capture and, when the terminal speaks
/// it, the enhanced keyboard protocol. A failure part way through undoes
/// what was already switched on.
fn setup_terminal() -> io::Result<(Terminal<CrosstermBackend<Stdout>>, bool)> {
    enable_raw_mode()?;

    let mut enhanced = false;
    let prepared = (|| -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        // key releases and lone shift presses are only reported with the enhanced protocol
        enhanced = supports_keyboard_enhancement().unwrap_or(false);
        if enhanced {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                        | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
                )
            )?;
        }

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;
        Ok(terminal)
    })();

    match prepared {
        Ok(terminal) => Ok((terminal, enhanced)),
        Err(err) => {
            if let Err(restore_err) = restore_terminal(&mut io::stdout(), enhanced) {
                tracing::error!(error = %restore_err, "could not restore terminal");
            }
            Err(err)
        }
    }
}

/// Undo `setup_terminal`. Every step is attempted; the first failure is
/// returned.
fn restore_terminal<W: Write>(out: &mut W, enhanced: bool) -> io::Result<()> {
    let popped = if enhanced {
        execute!(out, PopKeyboardEnhancementFlags)
    } else {
        Ok(())
    };
    let raw = disable_raw_mode();
    let screen = execute!(out, DisableMouseCapture, LeaveAlternateScreen, Show);
    popped.and(raw).and(screen)
}

/// Frame loop: drain the frame's events in order, update, draw.
fn run<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &mut Runner<E, T>,
    clock: &MonotonicClock,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui(app, f))?;

    while app.is_running() {
        for event in runner.next_frame() {
            app.handle_event(&event, clock.now_ms());
            if !app.is_running() {
                break;
            }
        }

        if !app.is_running() {
            break;
        }

        app.on_frame(clock.now_ms());
        terminal.draw(|f| ui(app, f))?;

        if runner.is_disconnected() {
            tracing::warn!("event source closed, shutting down");
            app.quit();
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
