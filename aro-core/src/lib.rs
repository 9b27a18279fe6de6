mod table;

use serde::{Deserialize, Serialize};

pub use table::{RING_SIZE_CHART, ReferenceEntry};

/// Text shown in place of a size when the input does not resolve.
pub const PLACEHOLDER: &str = "--";

/// Visual range (mm) the ring drawing is clamped to.
pub const VISUAL_MIN_DIAMETER_MM: f64 = 11.0;
pub const VISUAL_MAX_DIAMETER_MM: f64 = 24.0;
/// Radius (display units) drawn for the smallest clamped diameter.
pub const VISUAL_BASE_RADIUS: f64 = 30.0;
/// Extra radius added across the clamped range.
pub const VISUAL_RADIUS_SPAN: f64 = 25.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiameterError {
    #[error("empty input")]
    Empty,
    #[error("not a number: {0}")]
    NotANumber(String),
    #[error("diameter must be finite")]
    NotFinite,
    #[error("diameter must be positive, got {0}")]
    NotPositive(f64),
}

/// Outcome of resolving one input string against a size chart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub size: Option<u32>,
    pub is_valid: bool,
}

impl ConversionResult {
    pub const INVALID: ConversionResult = ConversionResult {
        size: None,
        is_valid: false,
    };

    /// The size as text, or the placeholder when invalid.
    pub fn display(&self) -> String {
        match (self.is_valid, self.size) {
            (true, Some(s)) => s.to_string(),
            _ => PLACEHOLDER.to_string(),
        }
    }
}

/// Parse a user-entered diameter. Accepts `,` as decimal separator.
pub fn parse_diameter(input: &str) -> Result<f64, DiameterError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DiameterError::Empty);
    }
    // Only the first comma is a separator; a second one leaves an unparsable tail.
    let normalized = trimmed.replacen(',', ".", 1);
    let value: f64 = normalized
        .parse()
        .map_err(|_| DiameterError::NotANumber(trimmed.to_string()))?;
    if value.is_nan() {
        return Err(DiameterError::NotANumber(trimmed.to_string()));
    }
    if value.is_infinite() {
        return Err(DiameterError::NotFinite);
    }
    if value <= 0.0 {
        return Err(DiameterError::NotPositive(value));
    }
    Ok(value)
}

/// Closest entry to `diameter`; the first of equally close entries wins.
pub fn nearest_entry(diameter: f64, table: &[ReferenceEntry]) -> Option<&ReferenceEntry> {
    let mut best: Option<(&ReferenceEntry, f64)> = None;
    for e in table {
        let diff = (e.diameter - diameter).abs();
        match best {
            Some((_, min)) if diff >= min => {}
            _ => best = Some((e, diff)),
        }
    }
    best.map(|(e, _)| e)
}

/// Map free-form input to the nearest ring size in `table`.
pub fn resolve(input: &str, table: &[ReferenceEntry]) -> ConversionResult {
    let Ok(diameter) = parse_diameter(input) else {
        return ConversionResult::INVALID;
    };
    match nearest_entry(diameter, table) {
        Some(e) => ConversionResult {
            size: Some(e.size),
            is_valid: true,
        },
        None => ConversionResult::INVALID,
    }
}

/// [`resolve`] against the built-in Brazilian chart.
pub fn resolve_chart(input: &str) -> ConversionResult {
    resolve(input, RING_SIZE_CHART)
}

/// Text-entry guard: digits, at most one `.` or `,`, digits.
/// The empty string is accepted so the field can be cleared.
pub fn accepts_input(candidate: &str) -> bool {
    let mut seen_sep = false;
    for c in candidate.chars() {
        match c {
            '0'..='9' => {}
            '.' | ',' if !seen_sep => seen_sep = true,
            _ => return false,
        }
    }
    true
}

/// Diameter used to drive the ring drawing: the parsed value, or 0 when the
/// input does not parse.
pub fn display_diameter(input: &str) -> f64 {
    input
        .trim()
        .replacen(',', ".", 1)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Radius of the drawn ring for a diameter, clamped to the visual range.
pub fn ring_radius(diameter: f64) -> f64 {
    let d = if diameter.is_finite() { diameter } else { 0.0 };
    let clamped = d.clamp(VISUAL_MIN_DIAMETER_MM, VISUAL_MAX_DIAMETER_MM);
    VISUAL_BASE_RADIUS
        + (clamped - VISUAL_MIN_DIAMETER_MM) / (VISUAL_MAX_DIAMETER_MM - VISUAL_MIN_DIAMETER_MM)
            * VISUAL_RADIUS_SPAN
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size_of(input: &str) -> Option<u32> {
        resolve_chart(input).size
    }

    #[test]
    fn example_diameter_resolves_to_closest_entry() {
        let r = resolve_chart("18.7");
        assert!(r.is_valid);
        assert_eq!(r.size, Some(19));
    }

    #[test]
    fn invalid_inputs() {
        for s in ["", "0", "-5", ",", ".", "abc", "1,2,3", "1.2.3", "12abc", "NaN", "inf", "0,0"] {
            assert_eq!(resolve_chart(s), ConversionResult::INVALID, "input {s:?}");
        }
    }

    #[test]
    fn comma_and_dot_agree() {
        for (a, b) in [("16,5", "16.5"), ("18,7", "18.7"), ("22,", "22."), (",9", ".9")] {
            assert_eq!(resolve_chart(a), resolve_chart(b));
        }
        assert_eq!(size_of("16,5"), Some(12));
    }

    #[test]
    fn partial_input_parses_as_whole_number() {
        assert_eq!(resolve_chart("1."), resolve_chart("1"));
        assert_eq!(size_of("1,"), Some(1));
    }

    #[test]
    fn out_of_range_clamps_to_boundary_entries() {
        assert_eq!(size_of("5"), Some(1));
        assert_eq!(size_of("0.1"), Some(1));
        assert_eq!(size_of("24.5"), Some(35));
        assert_eq!(size_of("900"), Some(35));
    }

    #[test]
    fn exact_diameters_map_to_their_size() {
        for e in RING_SIZE_CHART {
            let input = format!("{:.1}", e.diameter);
            assert_eq!(size_of(&input), Some(e.size));
        }
    }

    #[test]
    fn ties_prefer_the_lower_size() {
        let table = [
            ReferenceEntry { size: 10, diameter: 16.0 },
            ReferenceEntry { size: 11, diameter: 17.0 },
            ReferenceEntry { size: 12, diameter: 18.0 },
        ];
        assert_eq!(resolve("16.5", &table).size, Some(10));
        assert_eq!(resolve("17,5", &table).size, Some(11));
        assert_eq!(resolve("16.51", &table).size, Some(11));
    }

    #[test]
    fn result_is_brute_force_minimum() {
        let mut d = 10.0;
        while d < 26.0 {
            let input = format!("{d:.2}");
            let parsed: f64 = input.parse().unwrap();
            let best = RING_SIZE_CHART
                .iter()
                .map(|e| (e.diameter - parsed).abs())
                .fold(f64::INFINITY, f64::min);
            let got = resolve_chart(&input).size.unwrap();
            let entry = RING_SIZE_CHART.iter().find(|e| e.size == got).unwrap();
            assert_eq!((entry.diameter - parsed).abs(), best, "input {input}");
            d += 0.03;
        }
    }

    #[test]
    fn resolve_is_idempotent() {
        for s in ["18.7", "", "16,5", "-1", "30"] {
            assert_eq!(resolve_chart(s), resolve_chart(s));
        }
    }

    #[test]
    fn empty_table_is_invalid() {
        assert_eq!(resolve("18", &[]), ConversionResult::INVALID);
    }

    #[test]
    fn parse_reports_reason() {
        assert_eq!(parse_diameter("  "), Err(DiameterError::Empty));
        assert_eq!(parse_diameter("0"), Err(DiameterError::NotPositive(0.0)));
        assert_eq!(parse_diameter("-5"), Err(DiameterError::NotPositive(-5.0)));
        assert_eq!(parse_diameter("infinity"), Err(DiameterError::NotFinite));
        assert!(matches!(parse_diameter("x1"), Err(DiameterError::NotANumber(_))));
        assert_eq!(parse_diameter(" 16,5 "), Ok(16.5));
    }

    #[test]
    fn input_filter() {
        for s in ["", "1", "1.", "1,", ",", ".", "16,5", "16.5", ".5", "0018"] {
            assert!(accepts_input(s), "should accept {s:?}");
        }
        for s in ["1.2.3", "1,2.3", "1..", "a", "-5", " 1", "1e3", "+2", "１"] {
            assert!(!accepts_input(s), "should reject {s:?}");
        }
    }

    #[test]
    fn display_uses_placeholder() {
        assert_eq!(resolve_chart("18.7").display(), "19");
        assert_eq!(resolve_chart("").display(), PLACEHOLDER);
    }

    #[test]
    fn display_diameter_falls_back_to_zero() {
        assert_eq!(display_diameter("18,25"), 18.25);
        assert_eq!(display_diameter(""), 0.0);
        assert_eq!(display_diameter(","), 0.0);
        assert_eq!(display_diameter("-3"), -3.0);
    }

    #[test]
    fn ring_radius_is_clamped_and_monotonic() {
        assert_eq!(ring_radius(0.0), 30.0);
        assert_eq!(ring_radius(11.0), 30.0);
        assert_eq!(ring_radius(24.0), 55.0);
        assert_eq!(ring_radius(40.0), 55.0);
        assert_eq!(ring_radius(f64::NAN), 30.0);
        assert!((ring_radius(17.5) - 42.5).abs() < 1e-9);
        let mut prev = ring_radius(10.0);
        let mut d = 10.0;
        while d < 25.0 {
            let r = ring_radius(d);
            assert!(r >= prev);
            prev = r;
            d += 0.25;
        }
    }

    #[test]
    fn result_serializes_camel_case() {
        let json = serde_json::to_string(&resolve_chart("18.7")).unwrap();
        assert_eq!(json, r#"{"size":19,"isValid":true}"#);
    }
}
