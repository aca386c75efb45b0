//! Fullscreen overlay event loop.
//!
//! A single `tokio::select!` loop owns the engine and drives everything:
//! host player events, keyboard input, the frame-scheduler cadence, a slow
//! position re-anchor poll, and at most one in-flight lyric fetch. The
//! fetch is held as a pinned optional future so the loop keeps rendering
//! (and showing "Loading lyrics…") while the network answers.

use crate::Config;
use crate::engine::{LyricEngine, UpdateOrigin};
use crate::player::{
    PlayerEvent, TrackMetadata, get_playback_status, get_position_ms, watch_player,
};
use crate::source::fetch_raw_lyrics;
use crate::source::parse::plain_to_records;
use crate::timer::PlaybackTimer;
use crate::ui::render::TermSurface;
use crossterm::{
    event::{Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde_json::{Value, json};
use std::error::Error;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;

type FetchFuture = Pin<Box<dyn Future<Output = Option<Value>> + Send>>;

struct ScreenState {
    engine: LyricEngine<TermSurface>,
    timer: PlaybackTimer,
    playing: bool,
    service: String,
    current_track: Option<(String, String, String)>,
    pending_fetch: Option<FetchFuture>,
    should_exit: bool,
}

/// Run the fullscreen lyric overlay until the user quits.
pub async fn run_screen(cfg: Config) -> Result<(), Box<dyn Error + Send + Sync>> {
    let (player_tx, mut player_rx) = mpsc::channel(32);
    let watch_task = tokio::spawn(watch_player(
        player_tx,
        cfg.player.clone(),
        cfg.block.clone(),
    ));

    enable_raw_mode().map_err(to_boxed_err)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(to_boxed_err)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(to_boxed_err)?;

    let size = terminal.size().map_err(to_boxed_err)?;
    let mut state = ScreenState {
        engine: LyricEngine::new(),
        timer: PlaybackTimer::default(),
        playing: false,
        service: String::new(),
        current_track: None,
        pending_fetch: None,
        should_exit: false,
    };
    state.engine.attach(TermSurface::new(size.width, size.height));

    // Single OS thread polling crossterm events and forwarding them to the
    // async loop; spawn_blocking per read would grow the blocking pool.
    let (input_tx, mut input_rx) = mpsc::channel(32);
    thread::spawn(move || {
        loop {
            match crossterm::event::poll(Duration::from_millis(100)) {
                Ok(true) => {
                    if let Ok(ev) = crossterm::event::read()
                        && input_tx.blocking_send(ev).is_err()
                    {
                        break;
                    }
                }
                Ok(false) => {}
                Err(_) => thread::sleep(Duration::from_millis(100)),
            }
        }
    });

    let mut frame_interval =
        tokio::time::interval(Duration::from_millis(cfg.refresh_ms.max(8)));
    let mut poll_interval = tokio::time::interval(Duration::from_secs(1));

    while !state.should_exit {
        tokio::select! {
            biased;

            maybe_event = player_rx.recv() => {
                match maybe_event {
                    Some(event) => process_player_event(event, &mut state),
                    None => state.should_exit = true,
                }
                redraw(&mut terminal, &state.engine)?;
            }

            maybe_input = input_rx.recv() => {
                match maybe_input {
                    Some(event) => process_input(event, &mut state),
                    None => state.should_exit = true,
                }
                redraw(&mut terminal, &state.engine)?;
            }

            outcome = async {
                match state.pending_fetch.as_mut() {
                    Some(fetch) => fetch.as_mut().await,
                    None => futures_util::future::pending().await,
                }
            } => {
                state.pending_fetch = None;
                state.engine.complete_load(outcome.as_ref());
                let info = state.engine.debug_info();
                tracing::debug!(status = ?info.status, lines = info.lines.len(), "load resolved");
                redraw(&mut terminal, &state.engine)?;
            }

            _ = frame_interval.tick() => {
                if state.engine.is_loop_running() {
                    let position = state.timer.estimate(state.playing);
                    state.engine.tick(position);
                }
                redraw(&mut terminal, &state.engine)?;
            }

            _ = poll_interval.tick() => {
                resync_position(&mut state).await;
            }
        }
    }

    state.engine.teardown();
    watch_task.abort();
    disable_raw_mode().map_err(to_boxed_err)?;
    execute!(io::stdout(), LeaveAlternateScreen).map_err(to_boxed_err)?;
    Ok(())
}

fn process_player_event(event: PlayerEvent, state: &mut ScreenState) {
    match event {
        PlayerEvent::TrackChanged {
            meta,
            position_ms,
            playing,
            service,
        } => {
            state.service = service;
            state.playing = playing;
            state.timer.set_position(position_ms);
            if !playing {
                state.timer.mark_paused();
            }

            let track_key = track_key(&meta);
            if state.current_track.as_ref() == Some(&track_key) {
                return;
            }
            state.current_track = Some(track_key);
            start_load(meta, state);
        }
        PlayerEvent::Seeked { position_ms } => {
            state.timer.set_position(position_ms);
            if !state.playing {
                state.timer.mark_paused();
            }
            // Jump the active line right away rather than waiting a frame.
            state.engine.tick(state.timer.estimate(state.playing));
        }
        PlayerEvent::PlaybackChanged {
            playing,
            position_ms,
        } => {
            state.timer.set_position(position_ms);
            state.playing = playing;
            if playing {
                state.timer.mark_playing();
            } else {
                state.timer.mark_paused();
            }
        }
        PlayerEvent::PlayerGone => {
            state.service.clear();
            state.current_track = None;
            state.playing = false;
            state.pending_fetch = None;
            state.engine.begin_load(None);
        }
    }
}

fn start_load(meta: TrackMetadata, state: &mut ScreenState) {
    state.pending_fetch = None;

    let identifier = if meta.is_empty() {
        None
    } else {
        meta.track_id
            .clone()
            .or_else(|| Some(format!("{}/{}", meta.artist, meta.title)))
    };
    if !state.engine.begin_load(identifier.as_deref()) {
        return;
    }
    tracing::info!(artist = %meta.artist, title = %meta.title, "loading lyrics");

    // Lyrics the player itself publishes land first, as a pushed update;
    // the provider answer replaces them if it turns out richer.
    if let Some(text) = &meta.lyrics_text {
        let payload = json!({ "lines": plain_to_records(text) });
        state.engine.handle_update(UpdateOrigin::Player, &payload);
    }

    let TrackMetadata {
        artist,
        title,
        album,
        length_ms,
        ..
    } = meta;
    state.pending_fetch = Some(Box::pin(async move {
        match fetch_raw_lyrics(&artist, &title, &album, length_ms).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "lyric fetch failed");
                None
            }
        }
    }));
}

fn process_input(event: Event, state: &mut ScreenState) {
    match event {
        Event::Key(key) => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => state.should_exit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                state.should_exit = true;
            }
            KeyCode::Char('l') => {
                if let Some(surface) = state.engine.surface_mut() {
                    surface.toggle_hidden();
                }
            }
            _ => {}
        },
        Event::Resize(cols, rows) => {
            if let Some(surface) = state.engine.surface_mut() {
                surface.set_size(cols, rows);
            }
            state.engine.handle_resize();
        }
        _ => {}
    }
}

/// Re-anchor the timer from the host once a second; per-frame estimates in
/// between never touch D-Bus. Also corrects the playing flag for players
/// that change state without signalling it.
async fn resync_position(state: &mut ScreenState) {
    if state.service.is_empty() {
        return;
    }
    if let Ok(status) = get_playback_status(&state.service).await {
        let playing = status == "Playing";
        if playing != state.playing {
            state.playing = playing;
            if playing {
                state.timer.mark_playing();
            } else {
                state.timer.mark_paused();
            }
        }
    }
    if !state.playing {
        return;
    }
    if let Ok(position) = get_position_ms(&state.service).await {
        state.timer.set_position(position);
    }
}

fn redraw(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    engine: &LyricEngine<TermSurface>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    terminal
        .draw(|f| {
            if let Some(surface) = engine.surface() {
                surface.render(f);
            }
        })
        .map_err(to_boxed_err)?;
    Ok(())
}

fn track_key(meta: &TrackMetadata) -> (String, String, String) {
    (meta.artist.clone(), meta.title.clone(), meta.album.clone())
}

fn to_boxed_err<E: Error + Send + Sync + 'static>(e: E) -> Box<dyn Error + Send + Sync> {
    Box::new(e)
}
