//! In-memory `Session` shared by the unit tests.

use std::io;

use crate::mpd_client::{
    ArtPayload, CurrentSong, LibraryEntry, PlaybackStatus, Session, SessionError, SessionResult,
    StatusSnapshot,
};

#[derive(Debug, Default)]
pub struct FakeSession {
    pub status: StatusSnapshot,
    pub song: Option<CurrentSong>,
    /// Status and song queries fail with this I/O error kind.
    pub fail_with: Option<io::ErrorKind>,
    /// Status and song queries fail with a server error.
    pub server_error: bool,
    pub art: Option<ArtPayload>,
    pub art_error: Option<String>,
    pub art_lookups: usize,
    pub library: Vec<LibraryEntry>,
    pub queue: Vec<String>,
    /// `add` refuses this file.
    pub reject: Option<String>,
    pub options: Vec<(&'static str, bool)>,
    pub disconnected: bool,
}

impl FakeSession {
    pub fn playing(song: CurrentSong) -> Self {
        Self {
            status: StatusSnapshot {
                state: PlaybackStatus::Playing,
                volume: Some(70),
                ..Default::default()
            },
            song: Some(song),
            ..Default::default()
        }
    }

    pub fn with_art(art: Option<ArtPayload>) -> Self {
        Self {
            art,
            ..Default::default()
        }
    }

    pub fn failing_art(message: &str) -> Self {
        Self {
            art_error: Some(message.to_string()),
            ..Default::default()
        }
    }

    fn check(&self) -> SessionResult<()> {
        if let Some(kind) = self.fail_with {
            return Err(io::Error::new(kind, "socket closed").into());
        }
        if self.server_error {
            return Err(SessionError::Server("busy".into()));
        }
        Ok(())
    }

    fn set_option(&mut self, name: &'static str, enabled: bool) -> SessionResult<()> {
        self.options.push((name, enabled));
        Ok(())
    }
}

impl Session for FakeSession {
    fn status(&mut self) -> SessionResult<StatusSnapshot> {
        self.check()?;
        Ok(self.status.clone())
    }

    fn current_song(&mut self) -> SessionResult<Option<CurrentSong>> {
        self.check()?;
        Ok(self.song.clone())
    }

    fn play(&mut self) -> SessionResult<()> {
        self.status.state = PlaybackStatus::Playing;
        Ok(())
    }

    fn pause(&mut self) -> SessionResult<()> {
        self.status.state = PlaybackStatus::Paused;
        Ok(())
    }

    fn stop(&mut self) -> SessionResult<()> {
        self.status.state = PlaybackStatus::Stopped;
        Ok(())
    }

    fn next(&mut self) -> SessionResult<()> {
        Ok(())
    }

    fn previous(&mut self) -> SessionResult<()> {
        Ok(())
    }

    fn set_volume(&mut self, volume: u8) -> SessionResult<()> {
        self.status.volume = Some(volume);
        Ok(())
    }

    fn fetch_art(&mut self, _file: &str) -> SessionResult<Option<ArtPayload>> {
        self.art_lookups += 1;
        match &self.art_error {
            Some(message) => Err(SessionError::Server(message.clone())),
            None => Ok(self.art.clone()),
        }
    }

    fn list_all_songs(&mut self) -> SessionResult<Vec<LibraryEntry>> {
        Ok(self.library.clone())
    }

    fn add(&mut self, file: &str) -> SessionResult<()> {
        if self.reject.as_deref() == Some(file) {
            return Err(SessionError::Server(format!("no such file: {}", file)));
        }
        self.queue.push(file.to_string());
        Ok(())
    }

    fn clear_queue(&mut self) -> SessionResult<()> {
        self.queue.clear();
        Ok(())
    }

    fn set_random(&mut self, enabled: bool) -> SessionResult<()> {
        self.set_option("random", enabled)
    }

    fn set_consume(&mut self, enabled: bool) -> SessionResult<()> {
        self.set_option("consume", enabled)
    }

    fn set_single(&mut self, enabled: bool) -> SessionResult<()> {
        self.set_option("single", enabled)
    }

    fn set_repeat(&mut self, enabled: bool) -> SessionResult<()> {
        self.set_option("repeat", enabled)
    }

    fn disconnect(&mut self) {
        self.disconnected = true;
    }
}
