/*!
`png-gof` is a batch "goodness of fit" checker for an SVG rasterizer.

It walks a directory tree of `.svg` icons, runs an external renderer on
each one and then runs an external image-comparison tool
(ImageMagick-style `compare -metric RMSE`) to score the rendered PNG
against a reference PNG from a parallel directory tree.

The renderer and the comparator are opaque collaborators: this crate
never parses SVG, never decodes PNG and never computes the metric itself.
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod options;
mod paths;
mod run;

pub use crate::options::Options;
pub use crate::paths::{reference_path, render_path};
pub use crate::run::{run, Error, ErrorKind};
