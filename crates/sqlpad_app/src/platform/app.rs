use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use sqlpad_core::{update, AppState, AppViewModel, Msg};
use sqlpad_engine::EngineHandle;
use sqlpad_logging::{sqlpad_debug, sqlpad_info, sqlpad_warn};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::logging;
use super::ui;
use super::ui::input::{InputAction, LineEditor};
use crate::cli::Cli;

/// Everything the main loop reacts to, from input or from the engine.
#[derive(Debug)]
pub enum AppEvent {
    Msg(Msg),
    Redraw,
    /// Input reached end-of-file; exit once no request is pending.
    InputClosed,
    Quit,
}

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::resolve(&cli).context("loading configuration")?;
    logging::initialize(config.log, &config.log_file, config.log_level());
    config.log_summary();

    let engine = EngineHandle::new(config.client_settings()).context("starting request engine")?;
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let effects = EffectRunner::new(engine, event_tx.clone());
    spawn_input_reader(event_tx);

    // Not locked for the whole session: a terminal logger shares stdout.
    let mut out = io::stdout();
    let mut session = Session::new(effects);

    write!(out, "{}", ui::render::help_text())?;
    session.draw(&mut out)?;
    if config.probe_on_start {
        session.dispatch(Msg::AppStarted, &mut out)?;
    }

    let mut input_closed = false;
    for event in event_rx {
        match event {
            AppEvent::Msg(msg) => session.dispatch(msg, &mut out)?,
            AppEvent::Redraw => session.draw(&mut out)?,
            AppEvent::InputClosed => input_closed = true,
            AppEvent::Quit => break,
        }
        if input_closed && !session.awaiting_response() {
            break;
        }
    }

    sqlpad_info!("Session ended");
    Ok(())
}

struct Session {
    state: AppState,
    effects: EffectRunner,
    last_drawn: Option<AppViewModel>,
}

impl Session {
    fn new(effects: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            effects,
            last_drawn: None,
        }
    }

    fn awaiting_response(&self) -> bool {
        self.state.in_flight().is_some()
    }

    fn dispatch(&mut self, msg: Msg, out: &mut impl Write) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.effects.enqueue(effects);

        if was_dirty {
            let view = self.state.view();
            if ui::render::needs_redraw(self.last_drawn.as_ref(), &view) {
                self.draw(out)?;
            } else {
                self.last_drawn = Some(view);
            }
        }
        Ok(())
    }

    fn draw(&mut self, out: &mut impl Write) -> io::Result<()> {
        let view = self.state.view();
        writeln!(out)?;
        write!(out, "{}", ui::render::render(&view))?;
        out.flush()?;
        self.last_drawn = Some(view);
        Ok(())
    }
}

fn spawn_input_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        let mut editor = LineEditor::new();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    sqlpad_warn!("Failed to read input: {}", err);
                    break;
                }
            };
            let event = match editor.apply_line(&line) {
                InputAction::Edited(text) => AppEvent::Msg(Msg::InputChanged(text)),
                InputAction::Submit => AppEvent::Msg(Msg::SubmitClicked),
                InputAction::Redraw => AppEvent::Redraw,
                InputAction::Quit => AppEvent::Quit,
            };
            if event_tx.send(event).is_err() {
                return;
            }
        }
        sqlpad_debug!("Input closed");
        let _ = event_tx.send(AppEvent::InputClosed);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use sqlpad_core::SubmitOutcome;

    use crate::platform::test_support::{runner_with_stub, StubClient};

    fn session(client: StubClient) -> (Session, mpsc::Receiver<AppEvent>) {
        let (runner, event_rx) = runner_with_stub(client);
        (Session::new(runner), event_rx)
    }

    fn drawn(out: &mut Vec<u8>) -> String {
        String::from_utf8(std::mem::take(out)).expect("utf8")
    }

    #[test]
    fn typing_does_not_redraw_but_submitting_does() {
        let (mut session, _events) = session(StubClient::replying("1"));
        let mut out = Vec::new();

        session
            .dispatch(Msg::InputChanged("SELECT 1".to_string()), &mut out)
            .unwrap();
        assert!(out.is_empty());

        session.dispatch(Msg::SubmitClicked, &mut out).unwrap();
        let screen = drawn(&mut out);
        assert!(screen.contains("  SELECT 1\n"));
        assert!(screen.contains("(waiting for response)"));
        assert!(session.awaiting_response());
    }

    #[test]
    fn completion_draws_result() {
        let (mut session, _events) = session(StubClient::replying("unused"));
        let mut out = Vec::new();
        session.dispatch(Msg::SubmitClicked, &mut out).unwrap();
        let _ = drawn(&mut out);

        session
            .dispatch(
                Msg::SubmissionCompleted {
                    submission_id: 1,
                    outcome: SubmitOutcome::Failed,
                },
                &mut out,
            )
            .unwrap();
        let screen = drawn(&mut out);
        assert!(screen.ends_with("Result:\nAPI request failed\n"));
        assert!(!session.awaiting_response());
    }

    #[test]
    fn engine_reply_flows_through_to_the_screen() {
        let (mut session, events) = session(StubClient::replying("42"));
        let mut out = Vec::new();
        session.dispatch(Msg::SubmitClicked, &mut out).unwrap();
        let _ = drawn(&mut out);

        match events.recv_timeout(Duration::from_secs(5)) {
            Ok(AppEvent::Msg(msg)) => session.dispatch(msg, &mut out).unwrap(),
            other => panic!("expected completion, got {other:?}"),
        }
        assert!(drawn(&mut out).ends_with("Result:\n42\n"));
    }
}
