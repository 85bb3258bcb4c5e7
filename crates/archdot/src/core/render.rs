//! Renderer bridge to the external Graphviz layout engine
//!
//! This crate computes no geometry itself. Rendering spawns the `dot`
//! executable, feeds it the exported description on stdin, and lets it write
//! the image file. Graphviz must be installed separately.

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::core::error::{DiagramError, Result};

/// Image formats the renderer bridge knows how to request from Graphviz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum OutputFormat {
    /// Raster PNG output (default)
    #[default]
    Png,
    /// Vector SVG output
    Svg,
}

impl OutputFormat {
    /// The value passed to Graphviz as `-T<format>`
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        }
    }

    /// Conventional file extension for this format
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Render DOT text to an image file via the external `dot` process
///
/// Fails with a `Render` error when the executable cannot be found or exits
/// nonzero; Graphviz's stderr is carried in the error message.
pub fn render_dot(dot: &str, path: &Path, format: OutputFormat) -> Result<()> {
    debug!(output = %path.display(), format = %format, "Invoking Graphviz");

    let mut child = Command::new("dot")
        .arg(format!("-T{}", format.as_str()))
        .arg("-o")
        .arg(path)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DiagramError::render_error(
                    "`dot` executable not found; install Graphviz to render diagrams",
                )
            } else {
                DiagramError::from(e)
            }
        })?;

    if let Some(stdin) = child.stdin.as_mut() {
        stdin.write_all(dot.as_bytes())?;
    }

    let output = child.wait_with_output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DiagramError::render_error(format!(
            "dot exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    info!(output = %path.display(), "Rendered diagram");
    Ok(())
}
