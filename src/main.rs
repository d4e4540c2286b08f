/*
 * Copyright (c) 2017, Alan Chen
 * See LICENCE file for BSD-2 terms
 */

use std::process;

use log::{ error, info };

mod actions;
mod error;
mod media;
mod metadata;
mod options;
mod paths;
mod scan;

use options::args_to_opts;
use scan::Directory;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = args_to_opts();
    info!("scan {}", opts.in_dir.display());
    info!("  pictures to: {}", opts.picture_dir.display());
    info!("  videos to: {}", opts.video_dir.display());

    let dates = opts.date_source();
    let mut dir = match Directory::new(&opts.in_dir, &opts.picture_dir, &opts.video_dir, dates.as_ref()) {
        Ok(dir) => dir,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    info!("found {} files in {}", dir.files.len(), dir);

    let report = dir.copy_files();
    for e in report.failed.iter() {
        error!("not copied: {}", e);
    }
    info!("{} copied, {} already present, {} failed ({} not copied)",
        report.copied, report.already_present, report.failed.len(), report.not_copied());

    if opts.verbose {
        for f in dir.files.iter() {
            println!("{}", f.details());
        }
    }
    println!("{}", dir.summary());
}
