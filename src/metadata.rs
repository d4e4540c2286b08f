/*
 * Copyright (c) 2017, Alan Chen
 * See LICENCE file for BSD-2 terms
 */

//! creation date lookup from file metadata
//!
//! This is the last resort of the date resolution in `media`, used only when
//! neither the parent directory nor the file name carries a date.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::process::{ Command, Stdio };

use chrono::NaiveDateTime;
use exif::{ In, Tag };
use log::{ debug, warn };

pub const HACHOIR_CMD: &str = "hachoir-metadata";

/// Something that can tell when a file was created.
/// Returns a `YYYY-MM-DD` string, or `None` when no date is known.
pub trait CreationDateSource {
    fn creation_date(&self, path: &Path) -> Option<String>;
}

/// Runs the hachoir-metadata tool and scrapes its output
pub struct Hachoir {
    cmd: String,
}

impl Hachoir {
    pub fn with_command(cmd: &str) -> Hachoir {
        Hachoir { cmd: String::from(cmd) }
    }
}

impl CreationDateSource for Hachoir {
    fn creation_date(&self, path: &Path) -> Option<String> {
        // output() waits on the child and closes its pipes before returning
        let out = match Command::new(&self.cmd)
            .arg(path)
            .stdin(Stdio::null())
            .output()
        {
            Ok(out) => out,
            Err(e) => {
                warn!("can't run {}: {}", self.cmd, e);
                return None;
            }
        };

        if !out.status.success() {
            warn!("{} returned {} for {}", self.cmd, out.status, path.display());
            return None;
        }

        let stdout = String::from_utf8_lossy(&out.stdout);
        let date = parse_hachoir_output(&stdout);
        match date {
            Some(ref d) => debug!("found creation date {} in {}", d, path.display()),
            None => debug!("no creation date in {}", path.display()),
        }
        date
    }
}

/// Pick the date out of hachoir-metadata output, e.g.
/// `- Creation date: 2019-05-04 12:54:13` -> `2019-05-04`
pub fn parse_hachoir_output(stdout: &str) -> Option<String>
{
    let line = stdout
        .lines()
        .find(|l| l.trim_start_matches(|c| c == ' ' || c == '-').starts_with("Creation date"))?;

    let date: String = line.chars().skip(17).take(10).collect();
    if date.is_empty() {
        None
    } else {
        Some(date)
    }
}

/// Reads the EXIF original date/time from the file itself
pub struct Exif;

impl CreationDateSource for Exif {
    fn creation_date(&self, path: &Path) -> Option<String> {
        let f = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("can't open {}: {}", path.display(), e);
                return None;
            }
        };

        let exif = match exif::Reader::new().read_from_container(&mut BufReader::new(f)) {
            Ok(exif) => exif,
            Err(e) => {
                debug!("no EXIF data in {} ({})", path.display(), e);
                return None;
            }
        };

        exif.get_field(Tag::DateTimeOriginal, In::PRIMARY)
            .or_else(|| exif.get_field(Tag::DateTime, In::PRIMARY))
            .map(|f| f.display_value().to_string())
            .and_then(|s| NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S").ok())
            .map(|dt| dt.format("%Y-%m-%d").to_string())
    }
}

/// Never finds a date
pub struct NoMetadata;

impl CreationDateSource for NoMetadata {
    fn creation_date(&self, _path: &Path) -> Option<String> {
        None
    }
}
