//! Heuristic text measurement for layout.
//!
//! The SVG output uses generic `sans-serif`, so exact glyph metrics are not
//! available at layout time. Per-character advance-width classes are close
//! enough for margins and legend sizing.

#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
}

/// Estimate rendered text extent in points for a given font size.
pub fn measure_text(text: &str, size_pt: f64) -> TextMetrics {
    let mut width = 0.0;
    for ch in text.chars() {
        width += advance_factor(ch) * size_pt;
    }
    TextMetrics { width, height: size_pt * 1.2, ascent: size_pt * 0.78 }
}

fn advance_factor(ch: char) -> f64 {
    match ch {
        'i' | 'j' | 'l' | 't' | 'f' | 'I' | '.' | ',' | ':' | ';' | '\'' | '|' | '(' | ')'
        | '[' | ']' => 0.30,
        'm' | 'w' | 'M' | 'W' => 0.85,
        ' ' => 0.28,
        c if c.is_ascii_uppercase() || c.is_ascii_digit() => 0.62,
        _ => 0.52,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_hello() {
        let m = measure_text("Hello", 12.0);
        assert!(m.width > 20.0);
        assert!(m.height > 8.0);
        assert!(m.ascent > 0.0);
    }

    #[test]
    fn wider_text_measures_wider() {
        let a = measure_text("iii", 10.0);
        let b = measure_text("mmm", 10.0);
        assert!(b.width > a.width);
    }

    #[test]
    fn scales_with_size() {
        let a = measure_text("Fraction of events", 10.0);
        let b = measure_text("Fraction of events", 20.0);
        assert!((b.width - 2.0 * a.width).abs() < 1e-9);
    }
}
