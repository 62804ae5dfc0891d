//! Estimated text measurement.
//!
//! Character-based estimation of text extents. A real renderer swaps in
//! platform font metrics; layout only needs stable, deterministic numbers
//! with a first-line baseline and a truncation signal.

/// Text measurement configuration.
#[derive(Debug, Clone)]
pub struct TextStyle {
    /// Font size in points.
    pub font_size: f64,
    /// Font weight (100-900, normal=400, bold=700).
    pub font_weight: u16,
    /// Line height as a multiplier (e.g., 1.5 = 150%).
    pub line_height: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            font_weight: 400,
            line_height: 1.2,
        }
    }
}

/// Measured text metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextMetrics {
    /// Width of the widest laid-out line.
    pub width: f64,
    /// Height of all laid-out lines.
    pub height: f64,
    /// Baseline offset of the first line from the top.
    pub baseline: f64,
    /// Number of laid-out lines.
    pub lines: u32,
    /// Whether content was dropped by the line limit or clipped by the
    /// width constraint.
    pub truncated: bool,
}

/// Measure text with the given style.
///
/// `max_width` enables word wrapping; without it the text is measured as
/// a single unbounded line. `line_limit` drops lines past the limit and
/// reports the drop through `truncated`.
pub fn measure_text(
    text: &str,
    style: &TextStyle,
    max_width: Option<f64>,
    line_limit: Option<u32>,
) -> TextMetrics {
    let line_height = style.font_size * style.line_height;
    let baseline = style.font_size * 0.8;

    if text.is_empty() {
        return TextMetrics {
            width: 0.0,
            height: line_height,
            baseline,
            lines: 1,
            truncated: false,
        };
    }

    let char_width = estimate_char_width(style);

    match max_width {
        Some(max_width) if max_width > 0.0 => {
            measure_wrapped(text, max_width, char_width, line_height, baseline, line_limit)
        }
        _ => {
            let width = text.chars().count() as f64 * char_width;
            TextMetrics {
                width,
                height: line_height,
                baseline,
                lines: 1,
                truncated: false,
            }
        }
    }
}

/// Average glyph advance for the style.
///
/// Roughly half an em for proportional faces, slightly wider for bold
/// weights.
fn estimate_char_width(style: &TextStyle) -> f64 {
    let base = style.font_size * 0.55;
    if style.font_weight >= 600 {
        base * 1.05
    } else {
        base
    }
}

fn measure_wrapped(
    text: &str,
    max_width: f64,
    char_width: f64,
    line_height: f64,
    baseline: f64,
    line_limit: Option<u32>,
) -> TextMetrics {
    let space_width = char_width;
    let mut truncated = false;

    let mut lines: Vec<f64> = Vec::new();
    let mut current_width = 0.0;

    for word in text.split_whitespace() {
        let word_width = word.chars().count() as f64 * char_width;

        if current_width == 0.0 {
            current_width = word_width;
        } else if current_width + space_width + word_width <= max_width {
            current_width += space_width + word_width;
        } else {
            lines.push(current_width);
            current_width = word_width;
        }
    }
    if current_width > 0.0 {
        lines.push(current_width);
    }

    // A single word wider than the constraint is clipped to it.
    for line in &mut lines {
        if *line > max_width {
            *line = max_width;
            truncated = true;
        }
    }

    if let Some(limit) = line_limit {
        let limit = limit.max(1) as usize;
        if lines.len() > limit {
            lines.truncate(limit);
            truncated = true;
        }
    }

    let count = lines.len().max(1) as u32;
    let width = lines.iter().copied().fold(0.0_f64, f64::max);

    TextMetrics {
        width,
        height: count as f64 * line_height,
        baseline,
        lines: count,
        truncated,
    }
}
