/*
 * Copyright (c) 2017, Alan Chen
 * See LICENCE file for BSD-2 terms
 */

use std::fs;
use std::fs::{ create_dir_all, File, OpenOptions };
use std::io;
use std::path::Path;

use filetime::{ set_file_times, FileTime };
use log::{ debug, error, info, warn };

use crate::error::Error;
use crate::media::MediaFile;

/// What happened to one file on a copy pass
#[derive(Debug)]
pub enum CopyOutcome {
    Copied,
    /// a file with the same name is already in the destination directory
    AlreadyPresent,
    Unsupported,
    Failed(Error),
}

/// Permissions plus access/modify times of `src` onto `dst`
pub fn copy_metadata(src: &Path, dst: &Path) -> io::Result<()>
{
    let md = fs::metadata(src)?;
    fs::set_permissions(dst, md.permissions())?;
    set_file_times(
        dst,
        FileTime::from_last_access_time(&md),
        FileTime::from_last_modification_time(&md),
    )
}

/// Copy contents into a new file at `dst`, then metadata where the platform
/// allows. An existing `dst` is an `AlreadyExists` error and is left as is.
pub fn copy_file_with_metadata(src: &Path, dst: &Path) -> io::Result<()>
{
    copy_file_then(src, dst, copy_metadata)
}

fn copy_file_then<F>(src: &Path, dst: &Path, apply_metadata: F) -> io::Result<()>
    where F: FnOnce(&Path, &Path) -> io::Result<()>
{
    let mut fin = File::open(src)?;
    let mut fout = OpenOptions::new().write(true).create_new(true).open(dst)?;
    if let Err(e) = io::copy(&mut fin, &mut fout) {
        drop(fout);
        // don't leave a partial file to be mistaken for a backup next run
        let _ = fs::remove_file(dst);
        return Err(e);
    }
    drop(fout);

    if let Err(e) = apply_metadata(src, dst) {
        warn!("copied {} without metadata: {}", dst.display(), e);
    }
    Ok(())
}

impl MediaFile {
    /// Copy into the destination directory unless a file of the same name is
    /// already there. Never overwrites. Errors stay with this file.
    pub fn copy_to_destination(&mut self) -> CopyOutcome
    {
        self.copy_successful = false;
        if !self.kind.is_supported() {
            info!("not copying {}, not a picture or video", self.path.display());
            return CopyOutcome::Unsupported;
        }

        let name = match self.path.file_name() {
            Some(n) => n.to_owned(),
            None => return CopyOutcome::Failed(Error::NoFileName(self.path.clone())),
        };

        if !self.destination.is_dir() {
            info!("creating {}", self.destination.display());
            if let Err(e) = create_dir_all(&self.destination) {
                let err = Error::CreateDir { path: self.destination.clone(), source: e };
                error!("{}", err);
                return CopyOutcome::Failed(err);
            }
        }

        let target = self.destination.join(&name);
        if target.exists() {
            debug!("{} already in {}", name.to_string_lossy(), self.destination.display());
            return CopyOutcome::AlreadyPresent;
        }

        info!("copying {} to {}", self.path.display(), self.destination.display());
        match copy_file_with_metadata(&self.path, &target) {
            Ok(()) => {
                self.copy_successful = true;
                CopyOutcome::Copied
            }
            Err(ref e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!("{} appeared in {}", name.to_string_lossy(), self.destination.display());
                CopyOutcome::AlreadyPresent
            }
            Err(e) => {
                let err = Error::Copy { from: self.path.clone(), to: target, source: e };
                error!("{}", err);
                CopyOutcome::Failed(err)
            }
        }
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::media::DATE_UNKNOWN;
    use crate::metadata::test::FixedDate;
    use std::path::PathBuf;

    #[test]
    fn t_copy_creates_dated_dir() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let day = src.path().join("2019_05_06");
        fs::create_dir_all(&day).unwrap();
        let p = day.join("IMG_1.jpg");
        fs::write(&p, b"jpeg bytes").unwrap();

        let mut mf = MediaFile::new(&p, out.path(), &FixedDate::new(None)).unwrap();
        assert!(matches!(mf.copy_to_destination(), CopyOutcome::Copied));
        assert!(mf.copy_successful());

        let copied = out.path().join("2019").join("2019-05-06").join("IMG_1.jpg");
        assert_eq!(fs::read(&copied).unwrap(), b"jpeg bytes");
    }

    #[test]
    fn t_copy_date_unknown() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let p = src.path().join("IMG_2.mov");
        fs::write(&p, b"mov").unwrap();

        let mut mf = MediaFile::new(&p, out.path(), &FixedDate::new(None)).unwrap();
        assert!(matches!(mf.copy_to_destination(), CopyOutcome::Copied));
        assert!(out.path().join(DATE_UNKNOWN).join("IMG_2.mov").is_file());
    }

    #[test]
    fn t_existing_not_overwritten() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let p = src.path().join("IMG_3.jpg");
        fs::write(&p, b"new").unwrap();
        let existing = out.path().join(DATE_UNKNOWN);
        fs::create_dir_all(&existing).unwrap();
        fs::write(existing.join("IMG_3.jpg"), b"old").unwrap();

        let mut mf = MediaFile::new(&p, out.path(), &FixedDate::new(None)).unwrap();
        match mf.copy_to_destination() {
            CopyOutcome::AlreadyPresent => {}
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(!mf.copy_successful());
        assert_eq!(fs::read(existing.join("IMG_3.jpg")).unwrap(), b"old");
    }

    #[test]
    fn t_unsupported_is_noop() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let p = src.path().join("notes.txt");
        fs::write(&p, b"text").unwrap();

        let mut mf = MediaFile::new(&p, out.path(), &FixedDate::new(None)).unwrap();
        match mf.copy_to_destination() {
            CopyOutcome::Unsupported => {}
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(!mf.copy_successful());
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn t_missing_source_fails() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let p = src.path().join("gone.jpg");

        let mut mf = MediaFile::new(&p, out.path(), &FixedDate::new(None)).unwrap();
        match mf.copy_to_destination() {
            CopyOutcome::Failed(Error::Copy { .. }) => {}
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(!mf.copy_successful());
    }

    #[test]
    fn t_mkdir_failure() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let p = src.path().join("IMG_4.jpg");
        fs::write(&p, b"x").unwrap();
        // a plain file where the destination root should be
        let blocker: PathBuf = out.path().join("blocker");
        fs::write(&blocker, b"").unwrap();

        let mut mf = MediaFile::new(&p, &blocker, &FixedDate::new(None)).unwrap();
        match mf.copy_to_destination() {
            CopyOutcome::Failed(Error::CreateDir { .. }) => {}
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(!mf.copy_successful());
    }

    #[test]
    fn t_copy_keeps_mtime() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let p = src.path().join("a.jpg");
        fs::write(&p, b"x").unwrap();
        let then = FileTime::from_unix_time(1_500_000_000, 0);
        set_file_times(&p, then, then).unwrap();

        let dst = out.path().join("a.jpg");
        copy_file_with_metadata(&p, &dst).unwrap();
        let md = fs::metadata(&dst).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&md), then);
    }

    #[test]
    fn t_copy_refuses_existing_target() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let p = src.path().join("a.jpg");
        fs::write(&p, b"new").unwrap();
        let dst = out.path().join("a.jpg");
        fs::write(&dst, b"old").unwrap();

        let err = copy_file_with_metadata(&p, &dst).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&dst).unwrap(), b"old");
    }

    #[test]
    fn t_metadata_failure_keeps_copy() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let p = src.path().join("a.jpg");
        fs::write(&p, b"bytes").unwrap();
        let dst = out.path().join("a.jpg");

        let res = copy_file_then(&p, &dst, |_, _| {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "no utimes here"))
        });
        assert!(res.is_ok());
        assert_eq!(fs::read(&dst).unwrap(), b"bytes");
    }

    #[test]
    fn t_missing_source_leaves_no_file() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let dst = out.path().join("a.jpg");

        assert!(copy_file_with_metadata(&src.path().join("gone.jpg"), &dst).is_err());
        assert!(!dst.exists());
    }
}
