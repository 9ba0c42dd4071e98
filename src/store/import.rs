use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use walkdir::WalkDir;

use crate::store::sqlite::SqliteLibrary;
use crate::types::{AssetRecord, MediaKind};

const PHOTO_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "heic", "heif", "png", "gif", "tif", "tiff", "webp",
    "dng", "nef", "cr2", "cr3", "arw", "raf", "orf", "rw2",
];

const VIDEO_EXTENSIONS: &[&str] = &["mov", "mp4", "m4v", "avi", "3gp", "mkv"];

/// Stills that pair with a same-named `.mov` into a live photo.
const LIVE_STILL_EXTENSIONS: &[&str] = &["jpg", "jpeg", "heic", "heif"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    pub live_photos: usize,
}

struct Candidate {
    path: PathBuf,
    ext: String,
}

/// Walk `folder` and add every photo and video to the catalog in one batch.
pub fn import_folder(library: &SqliteLibrary, folder: &Path) -> Result<ImportReport> {
    if !folder.is_dir() {
        anyhow::bail!("not a directory: {}", folder.display());
    }

    // Group by directory and stem so live photo halves meet each other.
    let mut by_stem: BTreeMap<(PathBuf, String), Vec<Candidate>> = BTreeMap::new();
    for entry in WalkDir::new(folder)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().map(|e| e.to_string_lossy().to_lowercase()) else {
            continue;
        };
        if media_kind_for(&ext).is_none() {
            continue;
        }
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
        by_stem
            .entry((parent, stem))
            .or_default()
            .push(Candidate { path: path.to_path_buf(), ext });
    }

    let mut assets = Vec::new();
    let mut live_photos = 0;
    for candidates in by_stem.values() {
        let still = candidates
            .iter()
            .find(|c| LIVE_STILL_EXTENSIONS.contains(&c.ext.as_str()));
        let motion = candidates.iter().find(|c| c.ext == "mov");

        if let (Some(still), Some(motion)) = (still, motion) {
            live_photos += 1;
            assets.push(build_asset(&still.path, MediaKind::LivePhoto)?);
            for other in candidates {
                if !std::ptr::eq(other, still) && !std::ptr::eq(other, motion) {
                    if let Some(kind) = media_kind_for(&other.ext) {
                        assets.push(build_asset(&other.path, kind)?);
                    }
                }
            }
            continue;
        }

        for candidate in candidates {
            if let Some(kind) = media_kind_for(&candidate.ext) {
                assets.push(build_asset(&candidate.path, kind)?);
            }
        }
    }

    assets.sort_by_key(|a| a.created_at);
    tracing::info!("scanned {} ({} media files)", folder.display(), assets.len());

    let report = library.insert_assets(&assets)?;
    Ok(ImportReport {
        imported: report.inserted,
        skipped: report.skipped,
        live_photos,
    })
}

pub fn media_kind_for(ext: &str) -> Option<MediaKind> {
    let ext = ext.to_lowercase();
    if PHOTO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Photo)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

fn build_asset(path: &Path, media_kind: MediaKind) -> Result<AssetRecord> {
    let metadata = std::fs::metadata(path)?;
    let created = metadata.created().or_else(|_| metadata.modified())?;
    Ok(AssetRecord {
        id: uuid::Uuid::new_v4().to_string(),
        created_at: DateTime::<Utc>::from(created),
        is_favorite: false,
        media_kind,
        path: Some(path.to_string_lossy().to_string()),
    })
}
