/*
 * Copyright (c) 2017, Alan Chen
 * See LICENCE file for BSD-2 terms
 */

//! a single picture or video file and where it should go

use std::ffi::OsStr;
use std::fmt;
use std::path::{ Component, Path, PathBuf };

use crate::error::Result;
use crate::metadata::CreationDateSource;
use crate::paths::check_directory_name;

pub const PICTURE_EXTENSIONS: &[&str] = &["jpg", "jpeg"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mov"];

/// destination subdirectory for files without a usable date
pub const DATE_UNKNOWN: &str = "Date_Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Picture,
    Video,
    Unsupported,
}

impl FileKind {
    /// Classify by extension, case insensitive
    pub fn from_path(path: &Path) -> FileKind {
        let ext = match path.extension().and_then(OsStr::to_str) {
            Some(ext) => ext.to_lowercase(),
            None => return FileKind::Unsupported,
        };
        if PICTURE_EXTENSIONS.contains(&ext.as_str()) {
            FileKind::Picture
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            FileKind::Video
        } else {
            FileKind::Unsupported
        }
    }

    pub fn is_supported(self) -> bool {
        self != FileKind::Unsupported
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FileKind::Picture => write!(f, "Picture"),
            FileKind::Video => write!(f, "Video"),
            FileKind::Unsupported => Ok(()),
        }
    }
}

/// One source file. Kind, date and destination are settled in `new()` and
/// only the copy flag changes afterwards.
#[derive(Debug)]
pub struct MediaFile {
    pub(crate) path: PathBuf,
    pub(crate) base_destination: PathBuf,
    pub(crate) destination: PathBuf,
    pub(crate) kind: FileKind,
    pub(crate) date_created: String,
    pub(crate) copy_successful: bool,
}

impl MediaFile {
    pub fn new<P: AsRef<Path>, B: AsRef<Path>>(
        path: P,
        base_destination: B,
        dates: &dyn CreationDateSource,
    ) -> Result<MediaFile>
    {
        let path = path.as_ref().to_path_buf();
        let kind = FileKind::from_path(&path);
        let mut mf = MediaFile {
            base_destination: check_directory_name(base_destination)?,
            destination: PathBuf::new(),
            kind,
            date_created: String::new(),
            copy_successful: false,
            path,
        };
        if kind.is_supported() {
            mf.date_created = resolve_date(&mf.path, dates);
            mf.destination = destination_dir(&mf.base_destination, &mf.date_created);
        }
        Ok(mf)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// empty for unsupported files
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// `YYYY-MM-DD`, or empty when unresolved
    pub fn date_created(&self) -> &str {
        &self.date_created
    }

    pub fn copy_successful(&self) -> bool {
        self.copy_successful
    }

    pub fn details(&self) -> Details<'_> {
        Details(self)
    }
}

pub struct Details<'a>(&'a MediaFile);

impl<'a> fmt::Display for Details<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mf = self.0;
        writeln!(f, "File details:")?;
        writeln!(f, "    File: {}", mf.path.display())?;
        writeln!(f, "    Destination directory: {}", mf.destination.display())?;
        writeln!(f, "    File type: {}", mf.kind)?;
        writeln!(f, "    Date created: {}", mf.date_created)?;
        write!(f, "    Copy successful: {}", mf.copy_successful)
    }
}

/// Date token from a path segment: first 10 chars with `_` turned into `-`.
/// Anything starting with "20" counts, valid calendar date or not.
/// The token becomes a directory name, so stray non-UTF-8 bytes inside it
/// come out as U+FFFD; the source path itself is never rewritten.
fn date_token(segment: &OsStr) -> Option<String>
{
    let segment = segment.to_string_lossy();
    if !segment.starts_with("20") {
        return None;
    }
    Some(segment.chars().take(10).collect::<String>().replace('_', "-"))
}

/// Parent directory name first, then the file name, then file metadata.
/// Returns an empty string if all three come up empty.
pub fn resolve_date(path: &Path, dates: &dyn CreationDateSource) -> String
{
    let segs: Vec<&OsStr> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s),
            _ => None,
        })
        .collect();

    let n = segs.len();
    let parent = if n >= 2 { segs.get(n - 2) } else { None };
    if let Some(d) = parent.and_then(|s| date_token(s)) {
        return d;
    }
    if let Some(d) = segs.last().and_then(|s| date_token(s)) {
        return d;
    }
    dates.creation_date(path).unwrap_or_default()
}

/// `<base>Date_Unknown` or `<base><yyyy>/<yyyy-mm-dd>`
pub fn destination_dir(base: &Path, date: &str) -> PathBuf
{
    let mut dst = base.to_path_buf();
    if date.is_empty() {
        dst.push(DATE_UNKNOWN);
    } else {
        let year: String = date.chars().take(4).collect();
        dst.push(year);
        dst.push(date);
    }
    dst
}
