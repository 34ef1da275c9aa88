//! TV Box launcher, terminal host.
//!
//! Reads one input per stdin line (key names, `click <section> <tile>`,
//! `:command` for the admin console, `quit`) and redraws the home screen
//! as text after every input and every clock tick.
//! Config path comes from the first argument or `TVBOX_CONFIG`.

mod commands;
mod input;
mod playback;

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use commands::{CommandOutput, Environment};
use input::Line;
use tvbox_core::activation::Host;
use tvbox_core::config::TvboxConfig;
use tvbox_core::input::InputEvent;
use tvbox_core::launcher::Launcher;
use tvbox_core::platform::{
    DesktopPlatform, FileStore, LogActivator, LogToaster, NullAudio, TimeService,
};
use tvbox_core::render::TextRenderer;

fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("TVBOX_CONFIG").ok())
        .map(PathBuf::from);
    let config = match &config_path {
        Some(path) => TvboxConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TvboxConfig::default(),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_filter.as_str()),
    )
    .init();
    log::info!("Starting TV Box launcher (data in {})", config.data_dir.display());

    let store = FileStore::open(&config.data_dir)
        .with_context(|| format!("opening settings store {}", config.data_dir.display()))?;
    let mut launcher = Launcher::new(Box::new(store), config.columns.into());

    // Platform services.
    let platform = DesktopPlatform::new();
    let mut activator = LogActivator::new();
    let mut toaster = LogToaster::new();
    let mut audio = NullAudio::default();

    let registry = commands::registry();
    let mut renderer = TextRenderer::new();

    // Stdin is read on its own thread so the clock keeps ticking while idle.
    let (tx, rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let tick = Duration::from_millis(config.clock_tick_ms.max(1));
    let mut last_frame = Instant::now();
    launcher.tick(&platform.now()?);
    draw(&launcher, &mut renderer, &toaster)?;

    // -- Main loop --
    loop {
        let mut dirty = false;
        match rx.recv_timeout(tick) {
            Ok(text) => match input::parse_line(&text) {
                Line::Event(InputEvent::Quit) => break,
                Line::Event(InputEvent::KeyDown(key)) => {
                    toaster.dismiss();
                    let mut host = Host::new(&mut activator, &mut toaster);
                    launcher.handle_key(&key, &mut host);
                    dirty = true;
                },
                Line::Event(InputEvent::Click { section, tile }) => {
                    toaster.dismiss();
                    let mut host = Host::new(&mut activator, &mut toaster);
                    launcher.click(section, tile, &mut host);
                    dirty = true;
                },
                Line::Command(command) => {
                    let mut env = Environment {
                        launcher: &mut launcher,
                        audio: &mut audio,
                        now_millis: chrono::Utc::now().timestamp_millis(),
                    };
                    match registry.execute(&command, &mut env) {
                        Ok(CommandOutput::Text(text)) => println!("{text}"),
                        Ok(CommandOutput::None) => {},
                        Ok(CommandOutput::Quit) => break,
                        Err(e) => println!("error: {e}"),
                    }
                    dirty = true;
                },
                Line::Invalid(message) => println!("{message}"),
                Line::Empty => {},
            },
            Err(RecvTimeoutError::Timeout) => {},
            Err(RecvTimeoutError::Disconnected) => {
                log::info!("stdin closed");
                break;
            },
        }

        let elapsed = last_frame.elapsed();
        last_frame = Instant::now();
        if playback::advance(&mut launcher, &mut audio, elapsed) {
            println!("Preview finished");
        }
        if launcher.tick(&platform.now()?) {
            dirty = true;
        }
        if dirty {
            draw(&launcher, &mut renderer, &toaster)?;
        }
    }

    log::info!(
        "TV Box launcher shut down after {}s",
        platform.uptime_secs()?
    );
    Ok(())
}

fn draw(launcher: &Launcher, renderer: &mut TextRenderer, toaster: &LogToaster) -> Result<()> {
    launcher.render(renderer)?;
    println!("{}", renderer.take_frame());
    if let Some(toast) = toaster.current() {
        println!("[{}] {}", toast.title, toast.body);
    }
    if launcher.is_admin() {
        println!("(admin)");
    }
    println!();
    Ok(())
}
