use std::path::Path;

use crate::mpd_client::{LibraryEntry, Session, SessionResult, StatusSnapshot};

/// Text shown for a library song: its title, or the file name when untagged.
pub fn entry_label(entry: &LibraryEntry) -> String {
    match entry.title.as_deref().filter(|t| !t.is_empty()) {
        Some(title) => match entry.artist.as_deref().filter(|a| !a.is_empty()) {
            Some(artist) => format!("{} - {}", title, artist),
            None => title.to_string(),
        },
        None => Path::new(&entry.file)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| entry.file.clone()),
    }
}

/// Case-insensitive substring match against the label.
pub fn matches_query(label: &str, query: &str) -> bool {
    let query = query.trim();
    query.is_empty() || label.to_lowercase().contains(&query.to_lowercase())
}

pub fn filter<'a>(entries: &'a [LibraryEntry], query: &str) -> Vec<&'a LibraryEntry> {
    entries
        .iter()
        .filter(|entry| matches_query(&entry_label(entry), query))
        .collect()
}

/// Appends `files` to the queue in order, stopping at the first failure.
pub fn enqueue<S: Session + ?Sized>(session: &mut S, files: &[String]) -> SessionResult<usize> {
    for file in files {
        session.add(file)?;
    }
    log::info!("Added {} song(s) to the queue", files.len());
    Ok(files.len())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOption {
    Random,
    Consume,
    Single,
    Repeat,
}

impl PlaybackOption {
    pub const ALL: [PlaybackOption; 4] = [
        PlaybackOption::Random,
        PlaybackOption::Consume,
        PlaybackOption::Single,
        PlaybackOption::Repeat,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PlaybackOption::Random => "Random",
            PlaybackOption::Consume => "Consume",
            PlaybackOption::Single => "Single",
            PlaybackOption::Repeat => "Repeat",
        }
    }

    pub fn label(self, enabled: bool) -> String {
        format!("{} {}", self.name(), if enabled { "ON" } else { "OFF" })
    }

    pub fn is_enabled(self, status: &StatusSnapshot) -> bool {
        match self {
            PlaybackOption::Random => status.random,
            PlaybackOption::Consume => status.consume,
            PlaybackOption::Single => status.single,
            PlaybackOption::Repeat => status.repeat,
        }
    }

    pub fn apply<S: Session + ?Sized>(self, session: &mut S, enabled: bool) -> SessionResult<()> {
        match self {
            PlaybackOption::Random => session.set_random(enabled),
            PlaybackOption::Consume => session.set_consume(enabled),
            PlaybackOption::Single => session.set_single(enabled),
            PlaybackOption::Repeat => session.set_repeat(enabled),
        }
    }
}
