use serde::Deserialize;

use crate::color::Color;

/// Top-level visualization configuration (YAML or programmatic).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub figure: FigureConfig,
    pub font: FontConfig,
    pub axes: AxesConfig,
    pub colors: ColorsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 518.4,  // 7.2" * 72
            height: 345.6, // 4.8" * 72
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub size: f64,
    pub label_size: f64,
    pub tick_size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self { size: 10.0, label_size: 11.0, tick_size: 8.5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub show_top_ticks: bool,
    pub show_right_ticks: bool,
    pub tick_length: f64,
    pub minor_tick_length: f64,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            show_top_ticks: true,
            show_right_ticks: true,
            tick_length: 5.0,
            minor_tick_length: 3.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    /// Signal outline and fill color.
    pub signal: Color,
    /// Background outline and hatch color.
    pub background: Color,
    /// Opacity of the signal fill.
    pub signal_fill_alpha: f64,
    /// Annotation text color (region label).
    pub annotation: Color,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            signal: Color::hex("#1D4ED8"),
            background: Color::hex("#DC2626"),
            signal_fill_alpha: 0.35,
            annotation: Color::hex("#111827"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: String,
    pub dpi: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { format: "svg".into(), dpi: 220 }
    }
}

/// Resolve a VizConfig from an optional YAML string.
/// User YAML overrides the defaults field by field.
pub fn resolve_config(user_yaml: Option<&str>) -> crate::Result<VizConfig> {
    match user_yaml {
        None => Ok(VizConfig::default()),
        Some(yaml) => {
            let config: VizConfig = serde_yaml_ng::from_str(yaml)
                .map_err(|e| crate::RenderError::Config(e.to_string()))?;
            Ok(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve() {
        let c = resolve_config(None).unwrap();
        assert_eq!(c.output.format, "svg");
        assert!(c.axes.show_top_ticks);
        assert_eq!(c.axes.tick_length, 5.0);
    }

    #[test]
    fn yaml_overrides_partially() {
        let yaml = "figure:\n  width: 720\ncolors:\n  signal: \"#000080\"\n";
        let c = resolve_config(Some(yaml)).unwrap();
        assert_eq!(c.figure.width, 720.0);
        assert_eq!(c.figure.height, FigureConfig::default().height);
        assert_eq!(c.colors.signal, Color::hex("#000080"));
    }

    #[test]
    fn bad_yaml_is_config_error() {
        let err = resolve_config(Some(": not yaml")).unwrap_err();
        assert!(matches!(err, crate::RenderError::Config(_)));
    }
}
