use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::album_art::AlbumArt;
use crate::config::SongFormat;
use crate::mpd_client::{
    format_time, CurrentSong, PlaybackStatus, Session, SessionError, SessionResult, StatusSnapshot,
};
use crate::user_command::{ChangeReason, UserCommand};

pub const SONG_POLL_INTERVAL: Duration = Duration::from_millis(1000);
pub const PROGRESS_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Volume shown when MPD is stopped at startup and reports no mixer value.
const FALLBACK_VOLUME: u8 = 50;

/// The widgets the poller draws into.
pub trait DisplaySurface {
    fn render_song_text(&mut self, text: &str);
    fn render_progress(&mut self, percent: u8, elapsed: &str, total: &str);
    fn render_volume(&mut self, volume: u8);
    fn render_album_art(&mut self, art: Option<&AlbumArt>);
    fn render_status(&mut self, _status: PlaybackStatus) {}
}

/// What one song-change tick observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub song_changed: bool,
    pub state_changed: bool,
    pub refreshed: bool,
}

type SongListener = Box<dyn FnMut(&CurrentSong)>;

pub struct StatePoller<S: Session> {
    session: Rc<RefCell<S>>,
    format: SongFormat,
    user_command: UserCommand,
    last_song: Option<CurrentSong>,
    last_state: Option<PlaybackStatus>,
    last_volume: Option<u8>,
    songs_played: u64,
    listeners: Vec<SongListener>,
}

impl<S: Session> StatePoller<S> {
    pub fn new(session: Rc<RefCell<S>>, format: SongFormat, user_command: UserCommand) -> Self {
        Self {
            session,
            format,
            user_command,
            last_song: None,
            last_state: None,
            last_volume: None,
            songs_played: 0,
            listeners: Vec::new(),
        }
    }

    pub fn songs_played(&self) -> u64 {
        self.songs_played
    }

    pub fn current_song(&self) -> Option<&CurrentSong> {
        self.last_song.as_ref()
    }

    /// Registers a song-changed callback. Callbacks run in registration order
    /// and may borrow the session again.
    pub fn subscribe(&mut self, listener: impl FnMut(&CurrentSong) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Initial render before the timers start.
    pub fn startup(&mut self, display: &mut dyn DisplaySurface) -> SessionResult<()> {
        let (status, song) = self.snapshot()?;
        self.last_state = Some(status.state);
        let volume = match (status.state, status.volume) {
            (PlaybackStatus::Stopped, _) | (_, None) => FALLBACK_VOLUME,
            (_, Some(volume)) => volume,
        };
        self.last_volume = status.volume;
        display.render_volume(volume);
        self.render_text(display, &status, &song);
        Ok(())
    }

    /// Re-renders the now-playing line from fresh server state.
    pub fn refresh(&mut self, display: &mut dyn DisplaySurface) -> SessionResult<()> {
        let (status, song) = self.snapshot()?;
        self.render_text(display, &status, &song);
        Ok(())
    }

    /// The song-change poll. Only connection errors are returned; anything
    /// else is logged and the tick skipped.
    pub fn tick(&mut self, display: &mut dyn DisplaySurface) -> SessionResult<TickReport> {
        let (status, song) = match self.snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) if e.is_connection() => return Err(e),
            Err(e) => {
                log::warn!("Skipping poll: {}", e);
                return Ok(TickReport::default());
            }
        };

        let mut report = TickReport::default();
        let changed = self
            .last_song
            .as_ref()
            .map_or(true, |last| !last.same_song(&song));
        if changed {
            report.song_changed = true;
            self.last_song = Some(song.clone());
            for listener in self.listeners.iter_mut() {
                listener(&song);
            }
            self.user_command.run(ChangeReason::SongChange);
            // startup() already drew the song that is playing when we launch
            if self.songs_played > 0 {
                report.refreshed = true;
            }
            self.songs_played += 1;
        }

        let previous = self.last_state.replace(status.state);
        if let Some(reason) = previous.and_then(|prev| transition_reason(prev, status.state)) {
            report.state_changed = true;
            report.refreshed = true;
            self.user_command.run(reason);
        }

        if report.refreshed {
            self.render_text(display, &status, &song);
        }
        Ok(report)
    }

    /// The progress sub-poll; also mirrors server-side volume changes.
    pub fn update_progress(&mut self, display: &mut dyn DisplaySurface) -> SessionResult<()> {
        let polled = self.session.borrow_mut().status();
        let status = match polled {
            Ok(status) => status,
            Err(e) if e.is_connection() => return Err(e),
            Err(e) => {
                log::warn!("Skipping progress update: {}", e);
                return Ok(());
            }
        };

        match (status.state, status.elapsed, status.duration) {
            (PlaybackStatus::Playing | PlaybackStatus::Paused, Some(elapsed), Some(total)) => {
                display.render_progress(
                    progress_percent(elapsed, total),
                    &format_time(elapsed.as_secs() as f64),
                    &format_time(total.as_secs() as f64),
                );
            }
            _ => display.render_progress(0, &format_time(0.0), &format_time(0.0)),
        }

        if let Some(volume) = status.volume {
            if self.last_volume != Some(volume) {
                self.last_volume = Some(volume);
                display.render_volume(volume);
            }
        }
        Ok(())
    }

    /// Records a volume the user picked so the next progress poll does not
    /// echo it back.
    pub fn note_volume(&mut self, volume: u8) {
        self.last_volume = Some(volume);
    }

    pub fn shutdown(&mut self) {
        self.user_command.terminate();
        log::info!("Songs played: {}", self.songs_played);
        self.session.borrow_mut().disconnect();
    }

    fn snapshot(&self) -> SessionResult<(StatusSnapshot, CurrentSong)> {
        let mut session = self.session.borrow_mut();
        let song = session.current_song()?.unwrap_or_default();
        let status = session.status()?;
        Ok((status, song))
    }

    fn render_text(&self, display: &mut dyn DisplaySurface, status: &StatusSnapshot, song: &CurrentSong) {
        display.render_status(status.state);
        display.render_song_text(&self.format.render(status.state, song));
    }
}

fn transition_reason(from: PlaybackStatus, to: PlaybackStatus) -> Option<ChangeReason> {
    match (from, to) {
        (a, b) if a == b => None,
        (_, PlaybackStatus::Stopped) => Some(ChangeReason::Stopped),
        (_, PlaybackStatus::Paused) => Some(ChangeReason::Paused),
        (_, PlaybackStatus::Playing) => Some(ChangeReason::Resumed),
    }
}

/// Elapsed share of the song in whole percent, truncated.
pub fn progress_percent(elapsed: Duration, total: Duration) -> u8 {
    let total = total.as_secs();
    if total == 0 {
        return 0;
    }
    (elapsed.as_secs().saturating_mul(100) / total).min(100) as u8
}

/// True when a tick error means the window has to go.
pub fn is_fatal(err: &SessionError) -> bool {
    err.is_connection()
}
