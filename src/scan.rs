/*
 * Copyright (c) 2017, Alan Chen
 * See LICENCE file for BSD-2 terms
 */

//! source tree scanning and the copy pass over it

use std::fmt;
use std::fs;
use std::path::{ Path, PathBuf };

use ignore::WalkBuilder;
use log::{ debug, info, warn };

use crate::actions::CopyOutcome;
use crate::error::{ Error, Result };
use crate::media::{ FileKind, MediaFile };
use crate::metadata::CreationDateSource;
use crate::paths::check_directory_name;

/// Results of a single `copy_files()` pass
#[derive(Debug, Default)]
pub struct CopyReport {
    pub copied: usize,
    pub already_present: usize,
    pub failed: Vec<Error>,
}

impl CopyReport {
    pub fn not_copied(&self) -> usize {
        self.already_present + self.failed.len()
    }
}

/// A source tree and the two roots its pictures and videos get sorted into
#[derive(Debug)]
pub struct Directory {
    pub directory_path: PathBuf,
    pub picture_destination: PathBuf,
    pub video_destination: PathBuf,
    pub files: Vec<MediaFile>,
    pub number_of_picture_files: usize,
    pub number_of_video_files: usize,
    pub files_copied: usize,
    pub files_not_copied: usize,
}

impl Directory {
    /// Normalize the three roots and collect every picture and video under
    /// `source`. Dates and destinations are resolved here. A source that
    /// isn't there just yields no files.
    pub fn new(
        source: impl AsRef<Path>,
        picture_destination: impl AsRef<Path>,
        video_destination: impl AsRef<Path>,
        dates: &dyn CreationDateSource,
    ) -> Result<Directory>
    {
        let directory_path = check_directory_name(source)?;
        let mut dir = Directory {
            directory_path,
            picture_destination: check_directory_name(picture_destination)?,
            video_destination: check_directory_name(video_destination)?,
            files: Vec::new(),
            number_of_picture_files: 0,
            number_of_video_files: 0,
            files_copied: 0,
            files_not_copied: 0,
        };
        if dir.directory_path.is_dir() {
            dir.collect_all_files(dates)?;
        } else {
            warn!("source {} is not a directory, nothing to copy", dir.directory_path.display());
        }
        Ok(dir)
    }

    fn collect_all_files(&mut self, dates: &dyn CreationDateSource) -> Result<()>
    {
        let mut walk = WalkBuilder::new(&self.directory_path);
        walk.standard_filters(false)
            .sort_by_file_name(|a, b| a.cmp(b));

        for res in walk.build() {
            let ent = match res {
                Ok(ent) => ent,
                Err(e) => {
                    warn!("skipping unreadable entry: {}", e);
                    continue;
                }
            };
            let p = ent.path();
            // links to files count, linked directories are not descended
            let is_file = match ent.file_type() {
                Some(ft) if ft.is_symlink() => fs::metadata(p).map(|md| md.is_file()).unwrap_or(false),
                Some(ft) => ft.is_file(),
                None => false,
            };
            if !is_file {
                continue;
            }

            let base = match FileKind::from_path(p) {
                FileKind::Picture => {
                    self.number_of_picture_files += 1;
                    &self.picture_destination
                }
                FileKind::Video => {
                    self.number_of_video_files += 1;
                    &self.video_destination
                }
                FileKind::Unsupported => {
                    info!("file is not supported: {}", p.display());
                    continue;
                }
            };
            let mf = MediaFile::new(p, base, dates)?;
            debug!("{} {} [{}] -> {}",
                mf.kind(), mf.path().display(), mf.date_created(), mf.destination().display());
            self.files.push(mf);
        }
        Ok(())
    }

    /// Copy every file, then add the pass to `files_copied` and
    /// `files_not_copied`. The counters keep accumulating across calls until
    /// `reset_counts()`.
    pub fn copy_files(&mut self) -> CopyReport
    {
        let outcomes: Vec<CopyOutcome> = self.files
            .iter_mut()
            .map(|f| f.copy_to_destination())
            .collect();

        let mut report = CopyReport::default();
        for oc in outcomes {
            match oc {
                CopyOutcome::Copied => report.copied += 1,
                CopyOutcome::AlreadyPresent => report.already_present += 1,
                CopyOutcome::Failed(e) => report.failed.push(e),
                // never collected
                CopyOutcome::Unsupported => {}
            }
        }

        for f in self.files.iter() {
            if f.copy_successful() {
                self.files_copied += 1;
            } else {
                self.files_not_copied += 1;
            }
        }
        report
    }

    pub fn reset_counts(&mut self) {
        self.files_copied = 0;
        self.files_not_copied = 0;
    }

    pub fn summary(&self) -> Summary<'_> {
        Summary(self)
    }
}

impl fmt::Display for Directory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.directory_path.display())
    }
}

pub struct Summary<'a>(&'a Directory);

impl<'a> fmt::Display for Summary<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let d = self.0;
        writeln!(f, "Directory Summary:")?;
        writeln!(f, "------------------")?;
        writeln!(f, "Directory path: {}", d.directory_path.display())?;
        writeln!(f, "Destination path (Pictures): {}", d.picture_destination.display())?;
        writeln!(f, "Destination path (Videos): {}", d.video_destination.display())?;
        writeln!(f, "Number of files: {}", d.files.len())?;
        writeln!(f, "Number of Picture files: {}", d.number_of_picture_files)?;
        writeln!(f, "Number of Video files: {}", d.number_of_video_files)?;
        writeln!(f, "Number of files copied: {}", d.files_copied)?;
        write!(f, "Number of files not copied: {}", d.files_not_copied)
    }
}
