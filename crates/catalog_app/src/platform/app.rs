use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use catalog_core::{update, AppState, Msg};
use catalog_logging::catalog_info;

use super::config::AppConfig;
use super::effects::{EffectRunner, EffectSink};
use super::logging;
use super::ui::commands::{parse_command, Command, CommandError, HELP};
use super::ui::render::{render, SCROLL_MARKER};

pub(crate) enum LoopEvent {
    /// Message produced by the engine.
    Dispatch(Msg),
    /// Parsed line of user input.
    Input(Result<Command, CommandError>),
    InputClosed,
}

pub fn run_app() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref()).context("loading configuration")?;
    logging::initialize(config.log_destination);
    catalog_info!("Catalog API at {}", config.api_base_url);

    let (loop_tx, loop_rx) = mpsc::channel();
    let runner = EffectRunner::new(config.fetch_settings()?, loop_tx.clone())
        .context("starting catalog engine")?;
    spawn_input_reader(loop_tx);

    let state = AppState::with_page_size(config.provider_page_size);
    let mut app = App::new(state, runner, io::stdout().lock());
    app.write(HELP)?;
    app.dispatch(Msg::AppStarted)?;

    while let Ok(event) = loop_rx.recv() {
        match event {
            LoopEvent::Dispatch(msg) | LoopEvent::Input(Ok(Command::Dispatch(msg))) => {
                app.dispatch(msg)?
            }
            LoopEvent::Input(Ok(Command::Show)) => app.render()?,
            LoopEvent::Input(Ok(Command::Help)) => app.write(HELP)?,
            LoopEvent::Input(Ok(Command::Quit)) | LoopEvent::InputClosed => break,
            LoopEvent::Input(Err(err)) => app.write(&format!("{err}\n{HELP}"))?,
        }
    }
    catalog_info!("Catalog session ended");
    Ok(())
}

fn spawn_input_reader(loop_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if loop_tx.send(LoopEvent::Input(parse_command(&line))).is_err() {
                return;
            }
        }
        let _ = loop_tx.send(LoopEvent::InputClosed);
    });
}

/// Owns the state and is the only place it changes.
struct App<S, W> {
    state: AppState,
    effects: S,
    out: W,
}

impl<S: EffectSink, W: Write> App<S, W> {
    fn new(state: AppState, effects: S, out: W) -> Self {
        Self {
            state,
            effects,
            out,
        }
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;

        let scroll = self.effects.run(effects);
        if was_dirty {
            self.render()?;
        }
        if scroll {
            writeln!(self.out, "{SCROLL_MARKER}")?;
        }
        self.out.flush()
    }

    fn render(&mut self) -> io::Result<()> {
        let text = render(&self.state.view());
        self.write(&text)
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }
}
