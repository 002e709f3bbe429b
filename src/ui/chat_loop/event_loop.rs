//! Event polling, dispatching, and UI rendering loop.
//!
//! Terminal input is read on a background task and forwarded over a channel.
//! Each gateway call runs on its own task and reports back, tagged with its
//! turn id, over a second channel. The loop owns the [`App`] and redraws
//! after every event and on a fixed tick while a turn is in flight.

use std::error::Error;
use std::io::Write;
use std::time::Duration;

use ratatui::crossterm::event::{self, Event};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::keybindings::{handle_key_event, handle_mouse_event};
use super::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
use crate::core::app::{App, AppSettings};
use crate::core::conversation::TurnRequest;
use crate::core::gateway::{GatewayError, ModelGateway};
use crate::ui::renderer::ui;

const MAX_FPS: u64 = 30;

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

/// Result of one gateway call, delivered back to the loop.
#[derive(Debug)]
pub struct TurnOutcome {
    pub turn_id: u64,
    pub result: Result<String, GatewayError>,
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

pub(crate) fn spawn_turn(
    gateway: ModelGateway,
    request: TurnRequest,
    outcome_tx: mpsc::UnboundedSender<TurnOutcome>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let result = request.execute(&gateway).await;
        let outcome = TurnOutcome {
            turn_id: request.turn_id,
            result,
        };
        if outcome_tx.send(outcome).is_err() {
            debug!(turn_id = request.turn_id, "Chat loop closed before turn finished");
        }
    })
}

/// Apply one terminal event. Returns a turn to dispatch when the event sent a
/// message.
pub(crate) fn process_ui_event(app: &mut App, event: UiEvent) -> Option<TurnRequest> {
    let UiEvent::Crossterm(event) = event;
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Mouse(mouse) => {
            handle_mouse_event(app, mouse);
            None
        }
        Event::Paste(text) => {
            app.paste(&text);
            None
        }
        _ => None,
    }
}

async fn run_loop<W: Write>(
    terminal: &mut ChatTerminal<W>,
    app: &mut App,
    gateway: &ModelGateway,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
) -> Result<(), Box<dyn Error>> {
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<TurnOutcome>();
    let mut ticker = tokio::time::interval(Duration::from_millis(1000 / MAX_FPS));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut request_redraw = true;

    loop {
        if app.exit_requested {
            return Ok(());
        }

        if request_redraw {
            terminal.draw(|f| ui(f, app))?;
            request_redraw = false;
        }

        tokio::select! {
            event = event_rx.recv() => {
                let Some(event) = event else {
                    return Err("terminal input closed".into());
                };
                if let Some(request) = process_ui_event(app, event) {
                    spawn_turn(gateway.clone(), request, outcome_tx.clone());
                }
                request_redraw = true;
            }
            Some(outcome) = outcome_rx.recv() => {
                if !app.complete_turn(outcome.turn_id, outcome.result) {
                    warn!(turn_id = outcome.turn_id, "Ignored stale turn outcome");
                }
                request_redraw = true;
            }
            _ = ticker.tick() => {
                // Animates the loading indicator.
                if app.is_loading() {
                    request_redraw = true;
                }
            }
        }
    }
}

pub async fn run_chat(settings: AppSettings, gateway: ModelGateway) -> Result<(), Box<dyn Error>> {
    let mut app = App::new(settings);
    info!(model = %gateway.model(), "Starting chat session");

    let mut terminal = setup_terminal()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);

    let result = run_loop(&mut terminal, &mut app, &gateway, &mut event_rx).await;

    event_reader_handle.abort();
    restore_terminal(&mut terminal)?;

    info!(messages = app.messages().len(), "Chat session ended");
    result
}
