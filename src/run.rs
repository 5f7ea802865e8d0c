use std::fmt;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use wait_timeout::ChildExt;
use walkdir::WalkDir;

use crate::options::Options;
use crate::paths;

/// A per-file failure kind.
#[derive(Debug)]
pub enum ErrorKind {
    /// The file is not under the input directory,
    /// so no reference path can be derived for it.
    NotUnderInputDir,
    /// The renderer exited with an error, crashed or timed out.
    RenderFailed(io::Error),
    /// The comparator exited with an error, crashed or timed out.
    CompareFailed(io::Error),
}

/// A per-file failure.
#[derive(Debug)]
pub struct Error {
    /// What went wrong.
    pub kind: ErrorKind,
    /// The SVG file it went wrong for.
    pub svg_file: PathBuf,
}

impl Error {
    fn new(kind: ErrorKind, svg_file: &Path) -> Self {
        Error { kind, svg_file: svg_file.to_path_buf() }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = self.svg_file.display();
        match self.kind {
            ErrorKind::NotUnderInputDir => {
                write!(f, "{} is not under the input directory", file)
            }
            ErrorKind::RenderFailed(ref e) => {
                write!(f, "{} rendering failed cause {}", file, e)
            }
            ErrorKind::CompareFailed(ref e) => {
                write!(f, "{} comparison failed cause {}", file, e)
            }
        }
    }
}

impl std::error::Error for Error {}

/// Collects all `.svg` files under `root`, recursively.
///
/// The extension match is case-sensitive, so `.SVG` files are skipped.
/// The resulting list is sorted for deterministic runs.
pub(crate) fn collect_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() && is_svg(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();

    Ok(files)
}

fn is_svg(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("svg")
}

/// Renders and compares every `.svg` file under `opt.input_dir`,
/// sequentially and in sorted order.
///
/// Prints a `<path> : <metric>` progress line per file.
/// Per-file failures do not stop the batch; they are returned
/// for the caller to report. A traversal failure aborts the run.
pub fn run(opt: &Options) -> io::Result<Vec<Error>> {
    let files = collect_files(&opt.input_dir)?;

    let mut errors = Vec::new();
    for svg_path in &files {
        print!("{} : ", svg_path.display());
        io::stdout().flush()?;

        match process_file(opt, svg_path) {
            Ok(metric) => println!("{}", metric),
            Err(e) => {
                println!("failed");
                errors.push(e);
            }
        }
    }

    Ok(errors)
}

/// Runs the renderer and then the comparator for a single file.
///
/// The comparator is invoked even when the renderer fails,
/// but the render error takes precedence in the result.
fn process_file(opt: &Options, svg_path: &Path) -> Result<String, Error> {
    let render_result = render(opt, svg_path);

    let png_path = paths::render_path(svg_path);
    let ref_path = paths::reference_path(svg_path, &opt.input_dir, &opt.reference_dir)
        .map_err(|_| Error::new(ErrorKind::NotUnderInputDir, svg_path))?;

    if !ref_path.exists() {
        log::warn!("reference image {} does not exist", ref_path.display());
    }

    let compare_result = compare(opt, &png_path, &ref_path);

    if let Err(e) = render_result {
        return Err(Error::new(ErrorKind::RenderFailed(e), svg_path));
    }

    compare_result.map_err(|e| Error::new(ErrorKind::CompareFailed(e), svg_path))
}

fn render(opt: &Options, svg_path: &Path) -> io::Result<()> {
    Command::new(&opt.renderer)
        .arg("--no-display")
        .arg(svg_path)
        .run(opt.timeout)
}

fn compare(opt: &Options, png_path: &Path, ref_path: &Path) -> io::Result<String> {
    let (code, stderr) = Command::new(&opt.comparator)
        .args(&["-metric", "RMSE"])
        .arg(png_path)
        .arg(ref_path)
        .arg(&opt.diff_path)
        .run_captured(opt.timeout)?;

    // `compare` exits with 1 when the images are different
    // and still prints the metric.
    if code == 0 || code == 1 {
        Ok(stderr.trim().to_string())
    } else {
        Err(exit_error(code, &stderr))
    }
}

fn exit_error(code: i32, stderr: &str) -> io::Error {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        io::Error::new(io::ErrorKind::Other, format!("exited with code {}", code))
    } else {
        io::Error::new(io::ErrorKind::Other, stderr.to_string())
    }
}

trait CommandExt {
    fn run(&mut self, timeout: Option<u64>) -> io::Result<()>;
    fn run_captured(&mut self, timeout: Option<u64>) -> io::Result<(i32, String)>;
}

impl CommandExt for Command {
    fn run(&mut self, timeout: Option<u64>) -> io::Result<()> {
        let (code, stderr) = self.run_captured(timeout)?;
        if code == 0 {
            Ok(())
        } else {
            Err(exit_error(code, &stderr))
        }
    }

    fn run_captured(&mut self, timeout: Option<u64>) -> io::Result<(i32, String)> {
        let mut child = self.stderr(Stdio::piped()).spawn()?;

        let mut stderr = String::new();
        let status = match timeout {
            Some(sec) => {
                let status = match child.wait_timeout(Duration::from_secs(sec))? {
                    Some(status) => status,
                    None => {
                        child.kill()?;
                        child.wait()?;
                        return Err(io::ErrorKind::TimedOut.into());
                    }
                };

                if let Some(mut pipe) = child.stderr.take() {
                    pipe.read_to_string(&mut stderr)?;
                }

                status
            }
            None => {
                // Drain the pipe before waiting,
                // otherwise a child that writes more than
                // the pipe buffer would block forever.
                if let Some(mut pipe) = child.stderr.take() {
                    pipe.read_to_string(&mut stderr)?;
                }

                child.wait()?
            }
        };

        // A missing code means the child was killed by a signal.
        Ok((status.code().unwrap_or(-1), stderr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_svg_is_case_sensitive() {
        assert!(is_svg(Path::new("icons/a.svg")));
        assert!(!is_svg(Path::new("icons/a.SVG")));
        assert!(!is_svg(Path::new("icons/a.png")));
        assert!(!is_svg(Path::new("icons/svg")));
    }
}
