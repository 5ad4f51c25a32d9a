//! Main event loop for the TUI.
//!
//! Multiplexes terminal input, advisories from the sync cache, background
//! task completions, signals and a periodic tick.

use crate::app::{App, AppEvent};
use crate::sync::Advisory;
use anyhow::Result;
use crossterm::{
    event::{Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use super::events::handle_app_event;
use super::input::handle_input;
use super::render::render;

/// Result of handling a key press event.
pub enum Action {
    /// Continue the event loop and process more events.
    Continue,
    /// Exit the application and restore the terminal.
    Quit,
}

/// Runs the TUI application event loop.
///
/// Uses `tokio::select!` over:
/// - **Signals**: SIGTERM/SIGINT end the loop (Unix only)
/// - **Terminal input**: key presses from crossterm's async event stream
/// - **Advisories**: user-facing notices raised by the sync cache
/// - **Background tasks**: load/refresh completions via the `AppEvent` channel
/// - **Periodic tick**: 250ms timer for state polling, spinner and status expiry
///
/// Installs a panic hook that restores terminal state before unwinding.
pub async fn run(
    app: &mut App,
    mut advisories: mpsc::Receiver<Advisory>,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    // Install panic hook BEFORE setting up terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut event_stream = crossterm::event::EventStream::new();
    let mut tick_interval = tokio::time::interval(Duration::from_millis(250));

    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    let result = loop {
        if app.needs_redraw {
            if let Err(e) = terminal.draw(|f| render(f, app)) {
                break Err(e.into());
            }
            app.needs_redraw = false;
        }

        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = std::future::pending::<Option<()>>();

        tokio::select! {
            biased;

            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break Ok(());
            }

            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down gracefully");
                break Ok(());
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        app.needs_redraw = true;
                        if let Action::Quit = handle_input(app, key.code, key.modifiers, &event_tx) {
                            break Ok(());
                        }
                    }
                    Some(Ok(Event::Resize(_, _))) => app.needs_redraw = true,
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "Terminal event stream failed");
                        break Err(e.into());
                    }
                    None => break Ok(()),
                    _ => {}
                }
            }

            Some(advisory) = advisories.recv() => {
                tracing::debug!(?advisory, "Advisory received");
                app.show_advisory(&advisory);
                app.pull_sync_state();
                app.needs_redraw = true;
            }

            Some(event) = event_rx.recv() => {
                handle_app_event(app, event);
                app.needs_redraw = true;
            }

            _ = tick_interval.tick() => {
                handle_tick(app);
            }
        }
    };

    restore_terminal(terminal)?;
    result
}

/// Number of frames in the loading spinner animation.
const SPINNER_FRAMES: usize = 10;

/// Pick up state changes made outside the UI (connectivity, sync progress),
/// advance the spinner and expire the status message.
fn handle_tick(app: &mut App) {
    if app.pull_sync_state() {
        app.needs_redraw = true;
    }

    if app.snapshot.loading {
        app.spinner_frame = (app.spinner_frame + 1) % SPINNER_FRAMES;
        app.needs_redraw = true;
    }

    if app.clear_expired_status() {
        app.needs_redraw = true;
    }
}

/// Set up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state.
fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
