use std::path::{Path, PathBuf, StripPrefixError};

/// Returns the path the renderer is expected to write its output to.
///
/// This is the SVG path with its extension replaced by `png`.
pub fn render_path(svg_path: &Path) -> PathBuf {
    svg_path.with_extension("png")
}

/// Returns the reference image path for an SVG file.
///
/// The SVG path is re-rooted from `input_dir` onto `reference_dir`,
/// the leftmost path component named exactly `svg` (if any) is replaced
/// by `png` and the extension is replaced by `png`.
///
/// Unlike the substring replacement it evolved from, the `svg` -> `png`
/// rewrite matches a whole path component, so `svgs/` directories and
/// the file extension itself are never touched.
///
/// Errors when `svg_path` is not under `input_dir`.
pub fn reference_path(
    svg_path: &Path,
    input_dir: &Path,
    reference_dir: &Path,
) -> Result<PathBuf, StripPrefixError> {
    let rel = svg_path.strip_prefix(input_dir)?;

    let mut path = reference_dir.to_path_buf();
    let mut replaced = false;
    for component in rel.components() {
        if !replaced && component.as_os_str() == "svg" {
            path.push("png");
            replaced = true;
        } else {
            path.push(component);
        }
    }

    path.set_extension("png");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_path_replaces_extension() {
        assert_eq!(
            render_path(Path::new("icons/foo/bar.svg")),
            PathBuf::from("icons/foo/bar.png")
        );
    }

    #[test]
    fn reference_path_mirrors_the_tree() {
        let path = reference_path(
            Path::new("icons/foo/bar.svg"),
            Path::new("icons"),
            Path::new("images"),
        ).unwrap();
        assert_eq!(path, PathBuf::from("images/foo/bar.png"));
    }

    #[test]
    fn reference_path_replaces_svg_component() {
        let path = reference_path(
            Path::new("icons/svg/flat/x.svg"),
            Path::new("icons"),
            Path::new("images"),
        ).unwrap();
        assert_eq!(path, PathBuf::from("images/png/flat/x.png"));
    }

    #[test]
    fn reference_path_replaces_leftmost_svg_component_once() {
        let path = reference_path(
            Path::new("icons/svg/a/svg/x.svg"),
            Path::new("icons"),
            Path::new("images"),
        ).unwrap();
        assert_eq!(path, PathBuf::from("images/png/a/svg/x.png"));
    }

    #[test]
    fn reference_path_ignores_components_containing_svg() {
        let path = reference_path(
            Path::new("icons/svgs/svg.svg"),
            Path::new("icons"),
            Path::new("images"),
        ).unwrap();
        assert_eq!(path, PathBuf::from("images/svgs/svg.png"));
    }

    #[test]
    fn reference_path_outside_root() {
        assert!(reference_path(
            Path::new("other/bar.svg"),
            Path::new("icons"),
            Path::new("images"),
        ).is_err());
    }

    #[test]
    fn reference_path_with_absolute_roots() {
        let path = reference_path(
            Path::new("/data/icons/foo/bar.svg"),
            Path::new("/data/icons"),
            Path::new("/data/images"),
        ).unwrap();
        assert_eq!(path, PathBuf::from("/data/images/foo/bar.png"));
    }
}
