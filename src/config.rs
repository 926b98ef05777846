use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::mpd_client::{CurrentSong, PlaybackStatus};

const APP_DIR: &str = "cassette";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    #[serde(deserialize_with = "lenient_song_format")]
    pub song_format: Vec<String>,
    pub run_on_song_change: String,
    pub theme: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6600,
            song_format: vec!["title".into(), "artist".into(), "album".into()],
            run_on_song_change: String::new(),
            theme: "main".to_string(),
            music_dir: None,
        }
    }
}

// Anything other than a list of strings is treated as an empty format so the
// default template kicks in instead of rejecting the whole file.
fn lenient_song_format<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = toml::Value::deserialize(deserializer)?;
    let fields = match value {
        toml::Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                toml::Value::String(s) => Some(s),
                _ => None,
            })
            .collect::<Option<Vec<_>>>(),
        _ => None,
    };
    Ok(fields.unwrap_or_else(|| {
        log::warn!("song_format must be a list of field names");
        Vec::new()
    }))
}

impl Config {
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    pub fn default_path() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE)
    }

    /// Loads the config at `path`, writing the defaults there first if the
    /// file does not exist yet.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            log::info!("Wrote default config to {}", path.display());
            return Ok(config);
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Root of the music library as MPD sees it, used to find files on disk.
    pub fn resolved_music_dir(&self) -> Option<PathBuf> {
        self.music_dir
            .clone()
            .or_else(|| std::env::var_os("MUSIC_DIR").map(PathBuf::from))
            .or_else(dirs::audio_dir)
            .or_else(|| dirs::home_dir().map(|home| home.join("Music")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SongField {
    Title,
    Artist,
    Album,
}

impl SongField {
    fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "title" => Some(SongField::Title),
            "artist" => Some(SongField::Artist),
            "album" => Some(SongField::Album),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            SongField::Title => "title",
            SongField::Artist => "artist",
            SongField::Album => "album",
        }
    }

    fn value(self, song: &CurrentSong) -> Option<&str> {
        match self {
            SongField::Title => song.title.as_deref(),
            SongField::Artist => song.artist.as_deref(),
            SongField::Album => song.album.as_deref(),
        }
        .filter(|v| !v.is_empty())
    }
}

pub const DEFAULT_TEMPLATE: &str = "{state} {title} - {artist} - {album}";

/// Ordered fields making up the now-playing line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongFormat {
    fields: Vec<SongField>,
}

impl Default for SongFormat {
    fn default() -> Self {
        Self {
            fields: vec![SongField::Title, SongField::Artist, SongField::Album],
        }
    }
}

impl SongFormat {
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        if names.is_empty() {
            log::warn!("Song format is empty, falling back to the default format");
            return Self::default();
        }
        let fields: Option<Vec<SongField>> =
            names.iter().map(|n| SongField::parse(n.as_ref())).collect();
        match fields {
            Some(fields) => Self { fields },
            None => {
                log::warn!(
                    "Song format {:?} names an unknown field, falling back to the default format",
                    names.iter().map(AsRef::as_ref).collect::<Vec<_>>()
                );
                Self::default()
            }
        }
    }

    pub fn template(&self) -> String {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|f| format!("{{{}}}", f.name()))
            .collect();
        format!("{{state}} {}", parts.join(" - "))
    }

    pub fn render(&self, state: PlaybackStatus, song: &CurrentSong) -> String {
        if state == PlaybackStatus::Stopped {
            return PlaybackStatus::Stopped.label().to_string();
        }
        let parts: Vec<&str> = self
            .fields
            .iter()
            .map(|f| f.value(song).unwrap_or("Unknown"))
            .collect();
        format!("{} {}", state.label(), parts.join(" - "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_format_matches_fixed_template() {
        assert_eq!(SongFormat::default().template(), DEFAULT_TEMPLATE);
        assert_eq!(
            SongFormat::from_names(&["title", "artist", "album"]).template(),
            DEFAULT_TEMPLATE
        );
    }

    #[test]
    fn empty_or_unknown_fields_fall_back() {
        let empty: [&str; 0] = [];
        assert_eq!(SongFormat::from_names(&empty).template(), DEFAULT_TEMPLATE);
        assert_eq!(
            SongFormat::from_names(&["title", "genre"]).template(),
            DEFAULT_TEMPLATE
        );
    }

    #[test]
    fn custom_order_is_kept() {
        let format = SongFormat::from_names(&["Artist", " title "]);
        assert_eq!(format.template(), "{state} {artist} - {title}");

        let song = CurrentSong {
            file: "a.flac".into(),
            title: Some("Song".into()),
            artist: Some("Band".into()),
            album: None,
        };
        assert_eq!(format.render(PlaybackStatus::Paused, &song), "Paused: Band - Song");
    }

    #[test]
    fn missing_fields_render_unknown() {
        let song = CurrentSong {
            file: "a.flac".into(),
            title: Some("Song".into()),
            artist: Some(String::new()),
            album: None,
        };
        assert_eq!(
            SongFormat::default().render(PlaybackStatus::Playing, &song),
            "Playing: Song - Unknown - Unknown"
        );
    }

    #[test]
    fn stopped_renders_not_playing() {
        let song = CurrentSong {
            file: "a.flac".into(),
            title: Some("Song".into()),
            ..Default::default()
        };
        assert_eq!(
            SongFormat::default().render(PlaybackStatus::Stopped, &song),
            "Not Playing!"
        );
    }

    #[test]
    fn missing_config_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_or_create(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let reloaded = Config::load_or_create(&path).unwrap();
        assert_eq!(reloaded, Config::default());
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: Config = toml::from_str("port = 6700\ntheme = \"midnight_pipe\"\n").unwrap();
        assert_eq!(config.port, 6700);
        assert_eq!(config.host, "localhost");
        assert_eq!(config.theme, "midnight_pipe");
        assert_eq!(config.song_format, vec!["title", "artist", "album"]);
    }

    #[test]
    fn malformed_song_format_becomes_empty() {
        let config: Config = toml::from_str("song_format = \"title\"\n").unwrap();
        assert!(config.song_format.is_empty());
        assert_eq!(
            SongFormat::from_names(&config.song_format).template(),
            DEFAULT_TEMPLATE
        );

        let config: Config = toml::from_str("song_format = [\"title\", 3]\n").unwrap();
        assert!(config.song_format.is_empty());
    }

    #[test]
    fn explicit_music_dir_wins() {
        let config = Config {
            music_dir: Some(PathBuf::from("/srv/music")),
            ..Default::default()
        };
        assert_eq!(config.resolved_music_dir(), Some(PathBuf::from("/srv/music")));
    }
}
