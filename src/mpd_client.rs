use mpd::{Client, Query, Song, State, Status, Term};
use std::collections::HashMap;
use std::io;
use std::net::TcpStream;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("connection to MPD lost: {0}")]
    Connection(#[from] io::Error),
    #[error("MPD refused the command: {0}")]
    Server(String),
    #[error("unexpected MPD response: {0}")]
    Protocol(String),
}

impl SessionError {
    /// Whether the session is unusable after this error.
    pub fn is_connection(&self) -> bool {
        matches!(self, SessionError::Connection(_))
    }
}

impl From<mpd::error::Error> for SessionError {
    fn from(err: mpd::error::Error) -> Self {
        match err {
            mpd::error::Error::Io(e) => SessionError::Connection(e),
            mpd::error::Error::Server(e) => SessionError::Server(e.to_string()),
            other => SessionError::Protocol(other.to_string()),
        }
    }
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Playing,
    Paused,
    Stopped,
}

impl PlaybackStatus {
    pub fn label(self) -> &'static str {
        match self {
            PlaybackStatus::Playing => "Playing:",
            PlaybackStatus::Paused => "Paused:",
            PlaybackStatus::Stopped => "Not Playing!",
        }
    }
}

impl From<State> for PlaybackStatus {
    fn from(state: State) -> Self {
        match state {
            State::Play => PlaybackStatus::Playing,
            State::Pause => PlaybackStatus::Paused,
            State::Stop => PlaybackStatus::Stopped,
        }
    }
}

/// The song MPD reports as current. An empty `file` means there is none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentSong {
    pub file: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

impl CurrentSong {
    pub fn is_none(&self) -> bool {
        self.file.is_empty()
    }

    /// Two snapshots are the same song exactly when their file paths match.
    pub fn same_song(&self, other: &CurrentSong) -> bool {
        self.file == other.file
    }
}

impl From<Song> for CurrentSong {
    fn from(song: Song) -> Self {
        let album = find_tag(&song.tags, "Album");
        Self {
            file: song.file,
            title: song.title,
            artist: song.artist.or_else(|| find_tag(&song.tags, "Artist")),
            album,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub state: PlaybackStatus,
    pub volume: Option<u8>,
    pub elapsed: Option<Duration>,
    pub duration: Option<Duration>,
    pub random: bool,
    pub consume: bool,
    pub single: bool,
    pub repeat: bool,
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self {
            state: PlaybackStatus::Stopped,
            volume: None,
            elapsed: None,
            duration: None,
            random: false,
            consume: false,
            single: false,
            repeat: false,
        }
    }
}

impl From<Status> for StatusSnapshot {
    fn from(status: Status) -> Self {
        Self {
            state: status.state.into(),
            // MPD reports -1 when no mixer is available
            volume: u8::try_from(status.volume).ok().map(|v| v.min(100)),
            elapsed: status.elapsed,
            duration: status.duration,
            random: status.random,
            consume: status.consume,
            single: status.single,
            repeat: status.repeat,
        }
    }
}

/// Album art as handed back by the server, either the raw picture or a
/// response map carrying it under `binary`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtPayload {
    RawBytes(Vec<u8>),
    Structured(HashMap<String, Vec<u8>>),
}

impl ArtPayload {
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        let bytes = match self {
            ArtPayload::RawBytes(bytes) => bytes,
            ArtPayload::Structured(mut map) => map.remove("binary")?,
        };
        if bytes.is_empty() {
            None
        } else {
            Some(bytes)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    pub file: String,
    pub title: Option<String>,
    pub artist: Option<String>,
}

impl From<Song> for LibraryEntry {
    fn from(song: Song) -> Self {
        Self {
            file: song.file,
            title: song.title,
            artist: song.artist,
        }
    }
}

/// Everything the player needs from a live MPD connection.
pub trait Session {
    fn status(&mut self) -> SessionResult<StatusSnapshot>;
    fn current_song(&mut self) -> SessionResult<Option<CurrentSong>>;
    fn play(&mut self) -> SessionResult<()>;
    fn pause(&mut self) -> SessionResult<()>;
    fn stop(&mut self) -> SessionResult<()>;
    fn next(&mut self) -> SessionResult<()>;
    fn previous(&mut self) -> SessionResult<()>;
    fn set_volume(&mut self, volume: u8) -> SessionResult<()>;
    fn fetch_art(&mut self, file: &str) -> SessionResult<Option<ArtPayload>>;
    fn list_all_songs(&mut self) -> SessionResult<Vec<LibraryEntry>>;
    fn add(&mut self, file: &str) -> SessionResult<()>;
    fn clear_queue(&mut self) -> SessionResult<()>;
    fn set_random(&mut self, enabled: bool) -> SessionResult<()>;
    fn set_consume(&mut self, enabled: bool) -> SessionResult<()>;
    fn set_single(&mut self, enabled: bool) -> SessionResult<()>;
    fn set_repeat(&mut self, enabled: bool) -> SessionResult<()>;
    fn disconnect(&mut self);
}

pub struct MpdSession {
    client: Option<Client<TcpStream>>,
}

impl MpdSession {
    pub fn connect(host: &str, port: u16) -> SessionResult<Self> {
        let client = Client::connect(format!("{}:{}", host, port))?;
        log::info!("Connected to MPD at {}:{}", host, port);
        Ok(Self {
            client: Some(client),
        })
    }

    fn client(&mut self) -> SessionResult<&mut Client<TcpStream>> {
        self.client.as_mut().ok_or_else(|| {
            SessionError::Connection(io::Error::new(
                io::ErrorKind::NotConnected,
                "session already disconnected",
            ))
        })
    }
}

// The mpd crate addresses songs through `ToSongPath`, which `Song` implements.
fn song_path(file: &str) -> Song {
    Song {
        file: file.to_string(),
        ..Default::default()
    }
}

impl Session for MpdSession {
    fn status(&mut self) -> SessionResult<StatusSnapshot> {
        Ok(self.client()?.status()?.into())
    }

    fn current_song(&mut self) -> SessionResult<Option<CurrentSong>> {
        Ok(self.client()?.currentsong()?.map(CurrentSong::from))
    }

    fn play(&mut self) -> SessionResult<()> {
        Ok(self.client()?.play()?)
    }

    fn pause(&mut self) -> SessionResult<()> {
        Ok(self.client()?.pause(true)?)
    }

    fn stop(&mut self) -> SessionResult<()> {
        Ok(self.client()?.stop()?)
    }

    fn next(&mut self) -> SessionResult<()> {
        Ok(self.client()?.next()?)
    }

    fn previous(&mut self) -> SessionResult<()> {
        Ok(self.client()?.prev()?)
    }

    fn set_volume(&mut self, volume: u8) -> SessionResult<()> {
        Ok(self.client()?.volume(volume.min(100) as i8)?)
    }

    fn fetch_art(&mut self, file: &str) -> SessionResult<Option<ArtPayload>> {
        let bytes = self.client()?.albumart(&song_path(file))?;
        Ok(if bytes.is_empty() {
            None
        } else {
            Some(ArtPayload::RawBytes(bytes))
        })
    }

    fn list_all_songs(&mut self) -> SessionResult<Vec<LibraryEntry>> {
        // `listall` carries no tags; an empty file filter matches every song
        // and returns full song info.
        let mut query = Query::new();
        query.and(Term::File, "");
        let songs = self.client()?.search(&query, None::<(u32, u32)>)?;
        Ok(songs.into_iter().map(LibraryEntry::from).collect())
    }

    fn add(&mut self, file: &str) -> SessionResult<()> {
        self.client()?.push(song_path(file))?;
        Ok(())
    }

    fn clear_queue(&mut self) -> SessionResult<()> {
        Ok(self.client()?.clear()?)
    }

    fn set_random(&mut self, enabled: bool) -> SessionResult<()> {
        Ok(self.client()?.random(enabled)?)
    }

    fn set_consume(&mut self, enabled: bool) -> SessionResult<()> {
        Ok(self.client()?.consume(enabled)?)
    }

    fn set_single(&mut self, enabled: bool) -> SessionResult<()> {
        Ok(self.client()?.single(enabled)?)
    }

    fn set_repeat(&mut self, enabled: bool) -> SessionResult<()> {
        Ok(self.client()?.repeat(enabled)?)
    }

    fn disconnect(&mut self) {
        if let Some(mut client) = self.client.take() {
            if let Err(e) = client.close() {
                log::debug!("Closing MPD connection failed: {}", e);
            }
        }
    }
}

fn find_tag(tags: &[(String, String)], key: &str) -> Option<String> {
    tags.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.clone())
}

pub fn format_time(seconds: f64) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    format!("{}:{:02}", mins, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_payload_uses_binary_key() {
        let mut map = HashMap::new();
        map.insert("size".to_string(), b"4".to_vec());
        map.insert("binary".to_string(), vec![1, 2, 3, 4]);
        assert_eq!(ArtPayload::Structured(map).into_bytes(), Some(vec![1, 2, 3, 4]));
    }

    #[test]
    fn structured_payload_without_binary_is_empty() {
        let mut map = HashMap::new();
        map.insert("size".to_string(), b"0".to_vec());
        assert_eq!(ArtPayload::Structured(map).into_bytes(), None);
        assert_eq!(ArtPayload::RawBytes(Vec::new()).into_bytes(), None);
    }

    #[test]
    fn only_io_errors_are_connection_errors() {
        let io = SessionError::from(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        assert!(io.is_connection());
        assert!(!SessionError::Server("no such file".into()).is_connection());
        assert!(!SessionError::Protocol("bad line".into()).is_connection());
    }

    #[test]
    fn song_identity_is_the_file_path() {
        let a = CurrentSong {
            file: "a/b.flac".into(),
            title: Some("One".into()),
            ..Default::default()
        };
        let retagged = CurrentSong {
            title: Some("Two".into()),
            ..a.clone()
        };
        assert!(a.same_song(&retagged));
        assert!(!a.same_song(&CurrentSong::default()));
    }

    #[test]
    fn album_comes_from_tags() {
        let song = Song {
            file: "x.mp3".into(),
            title: Some("T".into()),
            tags: vec![("album".into(), "Record".into())],
            ..Default::default()
        };
        let current = CurrentSong::from(song);
        assert_eq!(current.album.as_deref(), Some("Record"));
        assert_eq!(current.artist, None);
    }

    #[test]
    fn library_entry_keeps_search_tags() {
        let song = Song {
            file: "Band/Record/01 Song.flac".into(),
            title: Some("Song".into()),
            artist: Some("Band".into()),
            tags: vec![("Album".into(), "Record".into())],
            ..Default::default()
        };
        let entry = LibraryEntry::from(song);
        assert_eq!(entry.file, "Band/Record/01 Song.flac");
        assert_eq!(entry.title.as_deref(), Some("Song"));
        assert_eq!(entry.artist.as_deref(), Some("Band"));
        assert_eq!(crate::picker::entry_label(&entry), "Song - Band");
        assert!(crate::picker::matches_query(&crate::picker::entry_label(&entry), "band"));
    }

    #[test]
    fn format_time_pads_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.4), "1:05");
        assert_eq!(format_time(3600.0), "60:00");
    }
}
