//! SVG renderer for overlay artifacts, with optional PNG rasterization.

pub mod canvas;
pub mod color;
pub mod config;
pub mod layout;
pub mod output;
pub mod plots;
pub mod primitives;
pub mod text;

use sc_analysis::{OverlayArtifact, VariableOverlay};
use thiserror::Error;

use config::VizConfig;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown variable: {0}")]
    UnknownVariable(String),
    #[error("unknown output format: {0}")]
    UnknownFormat(String),
    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "png")]
    #[error("PNG encoding error: {0}")]
    Png(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

fn find_variable<'a>(art: &'a OverlayArtifact, variable: &str) -> Result<&'a VariableOverlay> {
    art.variables
        .iter()
        .find(|v| v.name == variable)
        .ok_or_else(|| RenderError::UnknownVariable(variable.to_string()))
}

/// Render one variable of an overlay artifact to an SVG string.
pub fn render_svg(art: &OverlayArtifact, variable: &str, config: &VizConfig) -> Result<String> {
    let var = find_variable(art, variable)?;
    plots::overlay::render(&art.region_label, var, config)
}

/// Render one variable to bytes in the given format (`svg` or `png`).
pub fn render_to_bytes(
    art: &OverlayArtifact,
    variable: &str,
    format: &str,
    config: &VizConfig,
) -> Result<Vec<u8>> {
    let svg = render_svg(art, variable, config)?;
    match format {
        "svg" => Ok(svg.into_bytes()),
        #[cfg(feature = "png")]
        "png" => output::png::svg_to_png(&svg, config.output.dpi),
        other => Err(RenderError::UnknownFormat(other.to_string())),
    }
}

/// Render one variable to a file (format inferred from the extension).
pub fn render_to_file(
    art: &OverlayArtifact,
    variable: &str,
    path: &std::path::Path,
    config: &VizConfig,
) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("svg");
    let bytes = render_to_bytes(art, variable, ext, config)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
