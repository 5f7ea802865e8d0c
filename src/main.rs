use std::path::PathBuf;

use png_gof::Options;

const HELP: &str = "\
png-gof renders a tree of SVG icons and scores each render
against a reference PNG tree.

USAGE:
  png-gof [OPTIONS] --renderer PATH <icons-dir> <images-dir>

  png-gof --renderer ./svg_parser icons images
  png-gof --renderer ./svg_parser --timeout 15 icons images

OPTIONS:
      --help                Prints this help
  -V, --version             Prints version

      --renderer PATH       Sets the SVG renderer executable.
                            Invoked as: <renderer> --no-display <svg>
      --comparator PATH     Sets the image comparison executable.
                            Invoked as: <comparator> -metric RMSE
                            <rendered-png> <reference-png> <diff>
                            [default: compare]
      --diff PATH           Sets the difference image path
                            [default: diff.png]
      --timeout SEC         Kills a renderer or comparator process
                            after SEC seconds
                            [possible values: 1..3600]
      --quiet               Disables warnings

ARGS:
  <icons-dir>               Directory tree with .svg sources
  <images-dir>              Directory tree with reference PNG images
";

#[derive(Debug)]
struct CliArgs {
    renderer: PathBuf,
    comparator: PathBuf,
    diff_path: PathBuf,
    timeout: Option<u64>,
    quiet: bool,
    input_dir: PathBuf,
    reference_dir: PathBuf,
}

fn collect_args() -> Result<CliArgs, pico_args::Error> {
    let mut input = pico_args::Arguments::from_env();

    if input.contains("--help") {
        print!("{}", HELP);
        std::process::exit(0);
    }

    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        std::process::exit(0);
    }

    let args = CliArgs {
        renderer:       input.value_from_str("--renderer")?,
        comparator:     input.opt_value_from_str("--comparator")?
                             .unwrap_or_else(|| PathBuf::from("compare")),
        diff_path:      input.opt_value_from_str("--diff")?
                             .unwrap_or_else(|| PathBuf::from("diff.png")),
        timeout:        input.opt_value_from_fn("--timeout", parse_timeout)?,
        quiet:          input.contains("--quiet"),
        input_dir:      input.free_from_str()?,
        reference_dir:  input.free_from_str()?,
    };

    let remaining = input.finish();
    if !remaining.is_empty() {
        return Err(pico_args::Error::ArgumentParsingFailed {
            cause: format!("unexpected arguments: {:?}", remaining),
        });
    }

    Ok(args)
}

fn parse_timeout(s: &str) -> Result<u64, String> {
    let n: u64 = s.parse().map_err(|_| "invalid number")?;

    if (1..=3600).contains(&n) {
        Ok(n)
    } else {
        Err("timeout out of bounds".to_string())
    }
}

fn main() {
    if let Err(e) = process() {
        eprintln!("Error: {}.", e);
        std::process::exit(1);
    }
}

fn process() -> Result<(), String> {
    let args = match collect_args() {
        Ok(args) => args,
        Err(e) => {
            print!("{}", HELP);
            return Err(e.to_string());
        }
    };

    if !args.quiet {
        if let Ok(()) = log::set_logger(&LOGGER) {
            log::set_max_level(log::LevelFilter::Warn);
        }
    }

    if !args.input_dir.is_dir() {
        return Err(format!("{} is not a directory", args.input_dir.display()));
    }

    let mut opt = Options::new(args.input_dir, args.reference_dir, args.renderer);
    opt.comparator = args.comparator;
    opt.diff_path = args.diff_path;
    opt.timeout = args.timeout;

    let errors = png_gof::run(&opt).map_err(|e| e.to_string())?;

    if !errors.is_empty() {
        for e in errors {
            eprintln!("Failed: {}.", e);
        }

        std::process::exit(1);
    }

    Ok(())
}

/// A simple stderr logger.
static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::LevelFilter::Warn
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            let line = record.line().unwrap_or(0);

            match record.level() {
                log::Level::Error => eprintln!("Error (in {}:{}): {}", target, line, record.args()),
                log::Level::Warn  => eprintln!("Warning (in {}:{}): {}", target, line, record.args()),
                log::Level::Info  => eprintln!("Info (in {}:{}): {}", target, line, record.args()),
                log::Level::Debug => eprintln!("Debug (in {}:{}): {}", target, line, record.args()),
                log::Level::Trace => eprintln!("Trace (in {}:{}): {}", target, line, record.args()),
            }
        }
    }

    fn flush(&self) {}
}
