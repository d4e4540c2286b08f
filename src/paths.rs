/*
 * Copyright (c) 2017, Alan Chen
 * See LICENCE file for BSD-2 terms
 */

//! directory name normalization

use std::env;
use std::path::{ Component, Path, PathBuf, MAIN_SEPARATOR };

use crate::error::{ Error, Result };

/// Make `dir` absolute and make sure it ends with the platform separator.
/// An empty path resolves to the current directory. The path is not
/// required to exist. Non-UTF-8 names pass through untouched.
pub fn check_directory_name<P: AsRef<Path>>(dir: P) -> Result<PathBuf>
{
    let p = dir.as_ref();
    let abs = if p.is_absolute() {
        PathBuf::from(p)
    } else {
        env::current_dir().map_err(Error::CurrentDir)?.join(p)
    };

    // lexical cleanup only, symlinks are left alone
    let mut clean = PathBuf::new();
    for comp in abs.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => { clean.pop(); }
            other => clean.push(other.as_os_str()),
        }
    }

    // only a bare root already ends in a separator
    let is_root = clean.parent().is_none();
    let mut out = clean.into_os_string();
    if !is_root {
        out.push(MAIN_SEPARATOR.to_string());
    }
    Ok(PathBuf::from(out))
}
