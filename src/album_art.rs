use image::DynamicImage;
use lofty::config::ParseOptions;
use lofty::file::TaggedFileExt;
use lofty::picture::PictureType;
use lofty::probe::Probe;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::mpd_client::{CurrentSong, Session};

const ART_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtSource {
    Protocol,
    EmbeddedTag,
    Directory(PathBuf),
}

#[derive(Debug, Clone)]
pub struct AlbumArt {
    pub source: ArtSource,
    pub data: Vec<u8>,
    pub image: DynamicImage,
}

impl AlbumArt {
    fn decode(source: ArtSource, data: Vec<u8>) -> Option<Self> {
        match image::load_from_memory(&data) {
            Ok(image) => Some(Self { source, data, image }),
            Err(e) => {
                log::debug!("Undecodable album art from {:?}: {}", source, e);
                None
            }
        }
    }
}

/// Where a song lives on disk: the file to read tags from, if any, and the
/// directory to scan for loose cover images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongLocation {
    pub tag_path: Option<PathBuf>,
    pub scan_dir: Option<PathBuf>,
}

pub struct ArtResolver {
    music_dir: Option<PathBuf>,
}

impl ArtResolver {
    pub fn new(music_dir: Option<PathBuf>) -> Self {
        Self { music_dir }
    }

    /// Resolution order: server `albumart`, then embedded tags, then image
    /// files next to the song. Every failure just moves on to the next source.
    pub fn resolve<S: Session + ?Sized>(&self, session: &mut S, song: &CurrentSong) -> Option<AlbumArt> {
        if song.is_none() {
            return None;
        }
        if let Some(art) = Self::from_protocol(session, &song.file) {
            return Some(art);
        }

        let location = self.locate(&song.file)?;
        if let Some(art) = location.tag_path.as_deref().and_then(Self::from_tags) {
            return Some(art);
        }
        let art = location.scan_dir.as_deref().and_then(Self::from_directory);
        if art.is_none() {
            log::debug!("No album art found for {}", song.file);
        }
        art
    }

    pub fn locate(&self, file: &str) -> Option<SongLocation> {
        let music_dir = self.music_dir.as_ref()?;
        let relative = Path::new(file);

        // Songs inside a cue sheet are reported as `<dir>/<sheet>.cue/trackNNNN`.
        let mut cue_parent = PathBuf::new();
        for component in relative.components() {
            if let Component::Normal(name) = component {
                if name.to_string_lossy().to_ascii_lowercase().contains(".cue") {
                    return Some(SongLocation {
                        tag_path: None,
                        scan_dir: Some(music_dir.join(cue_parent)),
                    });
                }
            }
            cue_parent.push(component);
        }

        let full = music_dir.join(relative);
        Some(SongLocation {
            scan_dir: full.parent().map(Path::to_path_buf),
            tag_path: Some(full),
        })
    }

    fn from_protocol<S: Session + ?Sized>(session: &mut S, file: &str) -> Option<AlbumArt> {
        match session.fetch_art(file) {
            Ok(Some(payload)) => AlbumArt::decode(ArtSource::Protocol, payload.into_bytes()?),
            Ok(None) => None,
            Err(e) => {
                log::debug!("Server art lookup failed for {}: {}", file, e);
                None
            }
        }
    }

    fn from_tags(path: &Path) -> Option<AlbumArt> {
        if !path.is_file() {
            return None;
        }
        let data = Self::embedded_picture(path)?;
        AlbumArt::decode(ArtSource::EmbeddedTag, data)
    }

    fn embedded_picture(path: &Path) -> Option<Vec<u8>> {
        let ext = path.extension()?.to_string_lossy().to_ascii_lowercase();
        match ext.as_str() {
            "mp3" => {
                let tag = id3::Tag::read_from_path(path)
                    .map_err(|e| log::debug!("No ID3 tag in {}: {}", path.display(), e))
                    .ok()?;
                let data = tag.frames().find_map(|frame| match frame.content() {
                    id3::frame::Content::Picture(pic) => Some(pic.data.clone()),
                    _ => None,
                });
                data
            }
            "flac" => {
                let tag = metaflac::Tag::read_from_path(path)
                    .map_err(|e| log::debug!("No FLAC metadata in {}: {}", path.display(), e))
                    .ok()?;
                let data = tag.pictures().next().map(|picture| picture.data.clone());
                data
            }
            _ => Self::container_picture(path),
        }
    }

    // MP4, Ogg, Opus and the rest. Front covers win over other pictures.
    fn container_picture(path: &Path) -> Option<Vec<u8>> {
        let tagged = Probe::open(path)
            .and_then(|file| file.options(ParseOptions::new().read_properties(false)).read())
            .map_err(|e| log::debug!("No readable tags in {}: {}", path.display(), e))
            .ok()?;
        let pictures: Vec<_> = tagged.tags().iter().flat_map(|tag| tag.pictures()).collect();
        let data = pictures
            .iter()
            .find(|picture| picture.pic_type() == PictureType::CoverFront)
            .or_else(|| pictures.first())
            .map(|picture| picture.data().to_vec());
        data
    }

    fn from_directory(dir: &Path) -> Option<AlbumArt> {
        let entries = fs::read_dir(dir)
            .map_err(|e| log::debug!("Cannot list {}: {}", dir.display(), e))
            .ok()?;
        let mut candidates: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && has_art_extension(path))
            .collect();
        candidates.sort();

        candidates.into_iter().find_map(|path| {
            let data = fs::read(&path).ok()?;
            AlbumArt::decode(ArtSource::Directory(path), data)
        })
    }
}

fn has_art_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .map_or(false, |ext| ART_EXTENSIONS.contains(&ext.as_str()))
}
