use std::path::PathBuf;

/// A batch run configuration.
#[derive(Clone, Debug)]
pub struct Options {
    /// A directory tree with `.svg` sources.
    pub input_dir: PathBuf,

    /// A directory tree with reference PNG images,
    /// mirroring the structure of `input_dir`.
    pub reference_dir: PathBuf,

    /// The renderer executable.
    ///
    /// Will be invoked as `<renderer> --no-display <svg-path>` and is
    /// expected to write `<stem>.png` alongside the input file.
    pub renderer: PathBuf,

    /// The image-comparison executable.
    ///
    /// Will be invoked as
    /// `<comparator> -metric RMSE <rendered-png> <reference-png> <diff-path>`
    /// and is expected to print the metric to stderr.
    ///
    /// Default: `compare`.
    pub comparator: PathBuf,

    /// A path the comparator should write its difference image to.
    ///
    /// Default: `diff.png`.
    pub diff_path: PathBuf,

    /// An optional per-child timeout in seconds.
    ///
    /// When set, a renderer or comparator process that outlives it
    /// will be killed and reported as failed.
    ///
    /// Default: `None`.
    pub timeout: Option<u64>,
}

impl Options {
    /// Creates a new `Options` for the provided trees and renderer.
    pub fn new(input_dir: PathBuf, reference_dir: PathBuf, renderer: PathBuf) -> Self {
        Options {
            input_dir,
            reference_dir,
            renderer,
            comparator: PathBuf::from("compare"),
            diff_path: PathBuf::from("diff.png"),
            timeout: None,
        }
    }
}
