mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    sync::mpsc::{self, Receiver},
    time::Duration,
};

use hauntype::{
    config::{Config, ConfigStore, ConfigurationError, FileConfigStore},
    controller::SessionController,
    corpus::{self, PassageCorpus, WordCorpus},
    runtime::{self, ChannelEventSource, FixedTicker, Runner, Scheduler, SessionEvent},
    session::{Mode, Target},
};

const TICK_RATE_MS: u64 = 100;

/// haunted typing speed test with live wpm tracking
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A haunted typing speed test: race a countdown through a stream of spooky words or a fixed passage, with live wpm/accuracy and a post-session performance chart."
)]
pub struct Cli {
    /// number of seconds on the countdown
    #[clap(short = 's', long)]
    duration_secs: Option<u64>,

    /// typing mode
    #[clap(short = 'm', long, value_enum)]
    mode: Option<Mode>,

    /// number of words drawn for word-stream mode
    #[clap(short = 'w', long)]
    word_count: Option<usize>,

    /// corpus to draw words and passages from
    #[clap(short = 'c', long)]
    corpus: Option<String>,
}

/// CLI flags override the persisted config; the merged result is validated
/// and becomes the settings for every session this run.
fn resolve_config<S: ConfigStore>(cli: &Cli, store: &S) -> Result<Config, ConfigurationError> {
    let mut cfg = store.load();
    if let Some(secs) = cli.duration_secs {
        cfg.duration_secs = secs;
    }
    if let Some(mode) = cli.mode {
        cfg.mode = mode;
    }
    if let Some(count) = cli.word_count {
        cfg.word_count = count;
    }
    if let Some(corpus) = &cli.corpus {
        cfg.corpus = corpus.clone();
    }
    cfg.validate()?;
    Ok(cfg)
}

fn build_target(config: &Config) -> Result<Target, ConfigurationError> {
    let mut rng = rand::thread_rng();
    match config.mode {
        Mode::WordStream => {
            let words = WordCorpus::load(&config.corpus)?;
            Ok(Target::Words(corpus::generate_word_stream(
                &words,
                config.word_count,
                &mut rng,
            )?))
        }
        Mode::FixedPassage => {
            let passages = PassageCorpus::load(&config.corpus)?;
            Ok(Target::Passage(corpus::select_passage(
                &passages, &mut rng,
            )?))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Typing,
    Results,
}

pub struct App {
    pub config: Config,
    pub controller: SessionController,
    pub buffer: String,
    pub state: AppState,
}

impl App {
    pub fn new(config: Config, scheduler: Scheduler) -> Result<Self, ConfigurationError> {
        let target = build_target(&config)?;
        let controller = SessionController::new(target, config.duration_secs, scheduler)?;
        Ok(Self {
            config,
            controller,
            buffer: String::new(),
            state: AppState::Typing,
        })
    }

    /// Fresh Idle session with a newly drawn target; nothing carries over.
    pub fn reset(&mut self) -> Result<(), ConfigurationError> {
        let target = build_target(&self.config)?;
        self.controller.reset(target, self.config.duration_secs)?;
        self.buffer.clear();
        self.state = AppState::Typing;
        Ok(())
    }

    /// Feed the full buffer value to the engine, then mirror back the
    /// engine's view of the current input (a word commit clears it).
    fn sync_input(&mut self) {
        let value = self.buffer.clone();
        self.controller.handle_input(&value);
        self.buffer = self.controller.snapshot().current_input;
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let config = resolve_config(&cli, &store)?;
    // remember the merged settings as the defaults for next time
    let _ = store.save(&config);

    let (tx, rx) = mpsc::channel();
    runtime::spawn_terminal_reader(tx.clone());
    let scheduler = Scheduler::new(tx);
    let mut app = App::new(config, scheduler)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: Receiver<SessionEvent>,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        ChannelEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        match runner.step() {
            SessionEvent::Tick | SessionEvent::Resize => {}
            SessionEvent::ClockTick(epoch) => app.controller.handle_clock_tick(epoch),
            SessionEvent::SamplerTick(epoch) => app.controller.handle_sampler_tick(epoch),
            SessionEvent::Key(key) => match key.code {
                KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(())
                }
                KeyCode::Tab => app.reset()?,
                KeyCode::Backspace => {
                    app.buffer.pop();
                    app.sync_input();
                }
                KeyCode::Char(c) => {
                    app.buffer.push(c);
                    app.sync_input();
                }
                _ => {}
            },
        }

        if app.controller.session().has_finished() {
            app.state = AppState::Results;
        }
    }
}
