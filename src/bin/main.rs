//! Terminal player for the built-in sample dialogue.
//!
//! Key presses come from a fixed script and the sample's knock trigger is
//! raised a while after its paragraph starts, so a run needs no interaction.
//! Set `LECTERN_REALTIME=1` to pace ticks against the wall clock and
//! `LECTERN_TEXT_SPEED` to override the shared text speed.

use std::{env, io, thread, time::Duration};

use lectern_core::{
    AdvancePolicy, DialogueConfig, DialogueError, DialogueEvent, Sequence, TickResult,
    content::sample::{
        ADVANCE_KEY, DEFAULT_TEXT_SPEED_CPS, KNOCK_TRIGGER, TEXT_SPEED_SLOT,
        default_don_quijote_sequence,
    },
    input::{InputEvent, ScriptedInput},
    play_sequence,
    settings::{SettingsStore, SharedValues},
    trigger::LocalTriggerBus,
};
use log::{LevelFilter, debug, info, warn};

use console::ConsolePresenter;
use settings_env::EnvSettingsStore;

#[path = "main/console.rs"]
mod console;
#[path = "main/settings_env.rs"]
mod settings_env;

const TICK_MS: u64 = 16;
const REALTIME_VAR: &str = "LECTERN_REALTIME";
const FIRST_PRESS_MS: u64 = 1_500;
const PRESS_INTERVAL_MS: u64 = 2_000;
const PRESS_HOLD_MS: u64 = 120;
const SCRIPTED_PRESSES: u64 = 24;
const KNOCK_DELAY_MS: u64 = 2_500;
const SESSION_TIMEOUT_MS: u64 = 120_000;

fn main() -> Result<(), DialogueError> {
    env_logger::builder()
        .format_timestamp(None)
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let realtime = env::var(REALTIME_VAR).is_ok_and(|value| value.trim() == "1");
    let mut store = EnvSettingsStore::new();
    let shared = initial_shared_values(&mut store);

    let sequence = default_don_quijote_sequence()?;
    let script = press_script();
    let bus: LocalTriggerBus = LocalTriggerBus::new();
    let mut window = play_sequence(
        &sequence,
        ScriptedInput::new(&script),
        bus,
        DialogueConfig::default(),
        shared,
        0,
    )?;
    info!(
        "demo: playing {} paragraphs realtime={}",
        sequence.len(),
        realtime
    );

    let mut presenter = ConsolePresenter::new(io::stdout());
    let mut knock_at_ms = None;
    let mut now_ms = 0u64;
    loop {
        if window.tick(now_ms) == TickResult::RenderRequested {
            window.present(&mut presenter);
        }

        while let Some(event) = window.poll_event() {
            match event {
                DialogueEvent::StartedPrinting { paragraph } => {
                    debug!("demo: paragraph {} started", paragraph);
                    if waits_for_knock(&sequence, paragraph) {
                        knock_at_ms = Some(now_ms.saturating_add(KNOCK_DELAY_MS));
                    }
                }
                DialogueEvent::FinishedPrinting { paragraph } => {
                    debug!("demo: paragraph {} printed", paragraph);
                }
                DialogueEvent::Cue(cue) => info!("demo: cue {}", cue.0),
                DialogueEvent::Signal { listener, signal } => {
                    debug!("demo: listener {} got {:?}", listener.0, signal);
                }
                DialogueEvent::Fault(err) => warn!("demo: {}", err),
                DialogueEvent::Opened => debug!("demo: window opened"),
                DialogueEvent::Closed { exhausted } => {
                    info!("demo: window closed exhausted={}", exhausted);
                }
            }
        }

        if window.is_closed() {
            break;
        }

        if knock_at_ms.is_some_and(|at_ms| now_ms >= at_ms) {
            knock_at_ms = None;
            let reached = window.bus_mut().raise(KNOCK_TRIGGER);
            info!("demo: knock raised listeners={}", reached);
        }

        if now_ms >= SESSION_TIMEOUT_MS {
            warn!("demo: session timed out at {} ms, closing", now_ms);
            window.close(false)?;
        }

        if realtime {
            thread::sleep(Duration::from_millis(TICK_MS));
        }
        now_ms = now_ms.saturating_add(TICK_MS);
    }
    presenter.finish();

    if let Err(err) = store.save(&window.persisted_settings()) {
        warn!("settings: save failed: {}", err);
    }
    Ok(())
}

fn initial_shared_values(store: &mut EnvSettingsStore) -> SharedValues {
    let defaults = SharedValues::new().with(TEXT_SPEED_SLOT, DEFAULT_TEXT_SPEED_CPS);
    match store.load() {
        Ok(Some(settings)) => {
            info!(
                "settings: text_speed={:?}",
                settings.shared.get(TEXT_SPEED_SLOT)
            );
            settings.shared
        }
        Ok(None) => defaults,
        Err(err) => {
            warn!("settings: {}, using defaults", err);
            defaults
        }
    }
}

/// Press-and-release pairs of the advance key at a fixed interval.
fn press_script() -> Vec<(u64, InputEvent)> {
    (0..SCRIPTED_PRESSES)
        .flat_map(|index| {
            let at_ms = FIRST_PRESS_MS + index * PRESS_INTERVAL_MS;
            [
                (at_ms, InputEvent::Pressed(ADVANCE_KEY)),
                (at_ms + PRESS_HOLD_MS, InputEvent::Released(ADVANCE_KEY)),
            ]
        })
        .collect()
}

fn waits_for_knock(sequence: &Sequence, paragraph: u16) -> bool {
    sequence.paragraph(paragraph).is_some_and(|paragraph| {
        matches!(
            paragraph.policy(),
            AdvancePolicy::Event { trigger: Some(trigger) } if *trigger == KNOCK_TRIGGER
        )
    })
}
