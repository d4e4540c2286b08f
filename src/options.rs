/*
 * Copyright (c) 2017, Alan Chen
 * See LICENCE file for BSD-2 terms
 */

 //! command line options

use std::path::PathBuf;

use clap::{ App, Arg, ArgMatches };

use crate::metadata::{ CreationDateSource, Exif, Hachoir, NoMetadata, HACHOIR_CMD };

/// where the last-resort creation date comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataTool {
    Hachoir,
    Exif,
    Disabled,
}

impl MetadataTool {
    fn from_name(name: &str) -> Option<MetadataTool> {
        match name {
            "hachoir" => Some(MetadataTool::Hachoir),
            "exif" => Some(MetadataTool::Exif),
            "none" => Some(MetadataTool::Disabled),
            _ => None,
        }
    }
}

/// store options selections parsed by args_to_opts()
pub struct Options {
    pub verbose: bool,
    pub metadata: MetadataTool,
    pub hachoir_cmd: String,
    pub in_dir: PathBuf,
    pub picture_dir: PathBuf,
    pub video_dir: PathBuf,
}


pub fn default() -> Options
{
    Options {
        verbose: false,
        metadata: MetadataTool::Hachoir,
        hachoir_cmd: String::from(HACHOIR_CMD),
        in_dir: PathBuf::new(),
        picture_dir: PathBuf::new(),
        video_dir: PathBuf::new(),
    }
}

impl Options {
    pub fn date_source(&self) -> Box<dyn CreationDateSource> {
        match self.metadata {
            MetadataTool::Hachoir => Box::new(Hachoir::with_command(&self.hachoir_cmd)),
            MetadataTool::Exif => Box::new(Exif),
            MetadataTool::Disabled => Box::new(NoMetadata),
        }
    }
}


fn app<'a, 'b>() -> App<'a, 'b>
{
    App::new("mediasort")
        .version(env!("CARGO_PKG_VERSION"))
        .about("mediasort copies pictures and videos from a source tree \n\
            into year/date directories, skipping files already there")
        .arg(Arg::with_name("dir")
            .value_name("SOURCE_DIR")
            .help("directory to scan")
            .required(true)
            )
        .arg(Arg::with_name("picture_dir")
            .value_name("PICTURE_DIR")
            .help("destination root for pictures (.jpg, .jpeg)")
            .required(true)
            )
        .arg(Arg::with_name("video_dir")
            .value_name("VIDEO_DIR")
            .help("destination root for videos (.mov)")
            .required(true)
            )
        .arg(Arg::with_name("metadata")
            .short("m")
            .long("metadata")
            .takes_value(true)
            .possible_values(&["hachoir", "exif", "none"])
            .default_value("hachoir")
            .help("Where to look for a creation date when the path has none")
            )
        .arg(Arg::with_name("hachoir_cmd")
            .long("hachoir-cmd")
            .takes_value(true)
            .value_name("CMD")
            .default_value(HACHOIR_CMD)
            .help("hachoir-metadata executable to run")
            )
        .arg(Arg::with_name("verbose")
            .short("v")
            .long("verbose")
            .help("Print details for every file after copying")
            )
}

fn matches_to_opts(amats: &ArgMatches) -> Options
{
    let mut opts = default();

    // required args, clap has already rejected a missing value.
    // paths are taken as OsStr so non-UTF-8 names survive
    let path_of = |name: &str| amats.value_of_os(name).map(PathBuf::from).unwrap_or_default();
    opts.in_dir = path_of("dir");
    opts.picture_dir = path_of("picture_dir");
    opts.video_dir = path_of("video_dir");

    if let Some(tool) = amats.value_of("metadata").and_then(MetadataTool::from_name) {
        opts.metadata = tool;
    }
    if let Some(cmd) = amats.value_of("hachoir_cmd") {
        opts.hachoir_cmd = String::from(cmd);
    }
    opts.verbose = amats.is_present("verbose");

    opts
}

pub fn args_to_opts() -> Options
{
    matches_to_opts(&app().get_matches())
}


#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> Options {
        let amats = app().get_matches_from_safe(args).unwrap();
        matches_to_opts(&amats)
    }

    #[test]
    fn t_defaults() {
        let opts = parse(&["mediasort", "src", "pics", "vids"]);
        assert_eq!(opts.in_dir, PathBuf::from("src"));
        assert_eq!(opts.picture_dir, PathBuf::from("pics"));
        assert_eq!(opts.video_dir, PathBuf::from("vids"));
        assert_eq!(opts.metadata, MetadataTool::Hachoir);
        assert_eq!(opts.hachoir_cmd, HACHOIR_CMD);
        assert!(!opts.verbose);
    }

    #[test]
    fn t_flags() {
        let opts = parse(&["mediasort", "-v", "-m", "exif", "--hachoir-cmd", "/opt/hm", "s", "p", "v"]);
        assert_eq!(opts.metadata, MetadataTool::Exif);
        assert_eq!(opts.hachoir_cmd, "/opt/hm");
        assert!(opts.verbose);
    }

    #[test]
    fn t_rejects_bad_input() {
        assert!(app().get_matches_from_safe(&["mediasort", "src", "pics"]).is_err());
        assert!(app().get_matches_from_safe(&["mediasort", "-m", "ffprobe", "s", "p", "v"]).is_err());
    }
}
