//! Library destinations and safe file relocation
//!
//! Computes where an item belongs inside the managed library, copies it
//! there without ever overwriting an unrelated file, and supports the
//! delete-after-move rule: only originals whose real path actually changed
//! may be removed afterwards.

use crate::{ImportError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tonearm_core::types::{AlbumInfo, Item};
use tracing::{debug, info};

const UNKNOWN_ARTIST: &str = "Unknown Artist";
const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Apply a matched release's metadata to the in-memory items, zipping the
/// release's track list onto the (already reordered) item sequence. Must run
/// before any file move so destinations reflect the new metadata.
pub fn apply_metadata(info: &AlbumInfo, items: &mut [Item]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.album = Some(info.album.clone());
        item.album_artist = Some(info.artist.clone());
        item.year = info.year.or(item.year);

        if let Some(track) = info.tracks.get(index) {
            item.title = track.title.clone();
            item.artist = track
                .artist
                .clone()
                .or_else(|| Some(info.artist.clone()));
            item.track_number = track.track_number.or(Some(index as u32 + 1));
        }
    }
}

/// The library location implied by an item's metadata: an
/// `Artist/Album/` structure when an album is being created, flat
/// `Artist - Title.ext` placement otherwise.
pub fn destination_for(library_path: &Path, item: &Item, in_album: bool) -> PathBuf {
    if in_album {
        let artist = item
            .album_artist
            .as_deref()
            .or(item.artist.as_deref())
            .unwrap_or(UNKNOWN_ARTIST);
        let album = item.album.as_deref().unwrap_or(UNKNOWN_ALBUM);
        library_path
            .join(sanitize_filename_part(artist))
            .join(sanitize_filename_part(album))
            .join(track_filename(item))
    } else {
        library_path.join(singleton_filename(item))
    }
}

/// Filename inside an album directory: "NN Title.ext" when a track number is
/// known, otherwise the original filename.
fn track_filename(item: &Item) -> String {
    let extension = item.path.extension().and_then(|ext| ext.to_str());
    match (item.track_number, extension) {
        (Some(n), Some(ext)) => {
            format!("{:02} {}.{}", n, sanitize_filename_part(&item.title), ext)
        }
        _ => item
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .map(ToString::to_string)
            .unwrap_or_else(|| sanitize_filename_part(&item.title)),
    }
}

/// Filename for an unaffiliated track: "Artist - Title.ext", degrading
/// gracefully when fields are missing.
fn singleton_filename(item: &Item) -> String {
    let extension = item.path.extension().and_then(|ext| ext.to_str());
    let artist = item.artist.as_deref().or(item.album_artist.as_deref());

    let stem = match artist {
        Some(artist) => format!(
            "{} - {}",
            sanitize_filename_part(artist),
            sanitize_filename_part(&item.title)
        ),
        None => sanitize_filename_part(&item.title),
    };
    match extension {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}

/// Sanitize a string for use in filenames.
///
/// Removes/replaces characters that are invalid on common filesystems.
pub fn sanitize_filename_part(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            // Invalid on Windows: < > : " / \ | ? *
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Copy `source` to `dest`, creating parent directories and resolving name
/// conflicts with a numeric suffix. When the destination is the source
/// itself the copy is a no-op, so a later delete-after-move pass leaves the
/// file alone. Returns the final path.
pub fn relocate(source: &Path, dest: &Path) -> Result<PathBuf> {
    if source == dest {
        debug!("{} already in place", source.display());
        return Ok(dest.to_path_buf());
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let dest = if dest.exists() {
        if real_path(source) == real_path(dest) {
            debug!("{} already in place", source.display());
            return Ok(dest.to_path_buf());
        }
        resolve_filename_conflict(dest)?
    } else {
        dest.to_path_buf()
    };

    fs::copy(source, &dest)?;
    info!("copied {} -> {}", source.display(), dest.display());
    Ok(dest)
}

/// Resolve filename conflict by appending a counter:
/// "song.mp3" -> "song-1.mp3" -> "song-2.mp3" etc.
fn resolve_filename_conflict(dest: &Path) -> Result<PathBuf> {
    let stem = dest
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ImportError::InvalidPath("invalid destination filename".to_string()))?;
    let extension = dest.extension().and_then(|ext| ext.to_str()).unwrap_or("");
    let parent = dest.parent().unwrap_or(Path::new(""));

    for counter in 1..1000 {
        let name = if extension.is_empty() {
            format!("{stem}-{counter}")
        } else {
            format!("{stem}-{counter}.{extension}")
        };
        let candidate = parent.join(name);
        if !candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(ImportError::Unknown(
        "could not resolve filename conflict after 1000 attempts".to_string(),
    ))
}

/// The item's resolved real path; falls back to the recorded path when the
/// file cannot be resolved.
pub fn real_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Snapshot the items' current real paths before any move.
pub fn snapshot_real_paths(items: &[Item]) -> Vec<PathBuf> {
    items.iter().map(|item| real_path(&item.path)).collect()
}

/// Delete the pre-move originals that were actually relocated: an old path
/// still present among the items' current real paths was never moved and is
/// preserved.
pub fn remove_superseded_originals(old_paths: &[PathBuf], items: &[Item]) -> Result<()> {
    let new_paths = snapshot_real_paths(items);
    for old in old_paths {
        if !new_paths.contains(old) {
            fs::remove_file(old)?;
            debug!("removed superseded original {}", old.display());
        }
    }
    Ok(())
}
