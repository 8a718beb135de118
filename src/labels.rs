//! Display helpers: verdict colours and score formatting.

use ratatui::style::Color;

use crate::state::{FitLabel, PlayerAnalysis, SimulationResult};

pub const DEFAULT_LABEL_HEX: &str = "#757575";

pub fn label_color_hex(label: &FitLabel) -> &'static str {
    match label {
        FitLabel::FranchiseSavior => "#9C27B0",
        FitLabel::PerfectFit => "#4CAF50",
        FitLabel::Starter => "#8BC34A",
        FitLabel::SixthMan => "#2196F3",
        FitLabel::RotationPlayer => "#00BCD4",
        FitLabel::Situational => "#FF9800",
        FitLabel::BadFit => "#F44336",
        FitLabel::Redundant => "#795548",
        FitLabel::Other(_) => DEFAULT_LABEL_HEX,
    }
}

/// Colour for a raw label string. Unknown labels get the neutral default.
pub fn color_for_label(raw: &str) -> &'static str {
    label_color_hex(&FitLabel::parse(raw))
}

pub fn label_color(label: &FitLabel) -> Color {
    hex_to_color(label_color_hex(label)).unwrap_or(Color::Gray)
}

pub fn hex_to_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Rounds half away from zero; `None` for NaN and infinities.
pub fn display_score(score: f64) -> Option<i64> {
    if !score.is_finite() {
        return None;
    }
    Some(score.round() as i64)
}

pub fn format_score(score: f64) -> String {
    display_score(score)
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn format_minutes(minutes: f64) -> String {
    if !minutes.is_finite() {
        return "-".to_string();
    }
    format!("{minutes:.1} min")
}

pub fn humanize_category(raw: &str) -> String {
    let spaced = raw.replace('_', " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn format_per(per: Option<f64>) -> String {
    match per {
        Some(value) if value.is_finite() => format!("{value:.1}"),
        _ => "-".to_string(),
    }
}

pub fn analysis_flags(analysis: &PlayerAnalysis) -> Vec<&'static str> {
    let mut flags = Vec::new();
    if analysis.is_ball_dominant {
        flags.push("Ball dominant");
    }
    if analysis.is_elite_shooter {
        flags.push("Elite shooter");
    }
    if analysis.is_defensive_anchor {
        flags.push("Defensive anchor");
    }
    flags
}

/// One-line profile, e.g. `F | PER 23.7 | Ball dominant`.
pub fn analysis_summary(analysis: &PlayerAnalysis) -> String {
    let position = if analysis.position.trim().is_empty() {
        "-"
    } else {
        analysis.position.trim()
    };
    let mut parts = vec![position.to_string(), format!("PER {}", format_per(analysis.per))];
    parts.extend(analysis_flags(analysis).into_iter().map(str::to_string));
    parts.join(" | ")
}

/// Breakdown entries, largest absolute contribution first.
pub fn breakdown_rows(result: &SimulationResult) -> Vec<(String, f64)> {
    let mut rows: Vec<(String, f64)> = result
        .breakdown
        .iter()
        .filter(|(_, v)| v.is_finite())
        .map(|(k, v)| (humanize_category(k), *v))
        .collect();
    rows.sort_by(|a, b| {
        b.1.abs()
            .total_cmp(&a.1.abs())
            .then_with(|| a.0.cmp(&b.0))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_label_has_its_own_colour() {
        let mut seen = Vec::new();
        for label in FitLabel::KNOWN.iter() {
            let hex = label_color_hex(label);
            assert_ne!(hex, DEFAULT_LABEL_HEX, "{label} fell through to default");
            assert_eq!(color_for_label(label.as_str()), hex);
            assert!(!seen.contains(&hex));
            seen.push(hex);
        }
    }

    #[test]
    fn unknown_labels_use_default() {
        assert_eq!(color_for_label(""), DEFAULT_LABEL_HEX);
        assert_eq!(color_for_label("starter"), DEFAULT_LABEL_HEX);
        assert_eq!(color_for_label("Titular"), DEFAULT_LABEL_HEX);
        assert_eq!(
            label_color(&FitLabel::Other("Mystery".to_string())),
            Color::Rgb(0x75, 0x75, 0x75)
        );
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(hex_to_color("#4CAF50"), Some(Color::Rgb(0x4C, 0xAF, 0x50)));
        assert_eq!(hex_to_color("4CAF50"), None);
        assert_eq!(hex_to_color("#4CAF5"), None);
        assert_eq!(hex_to_color("#GGGGGG"), None);
    }

    #[test]
    fn scores_round_half_away_from_zero() {
        assert_eq!(display_score(84.5), Some(85));
        assert_eq!(display_score(84.49), Some(84));
        assert_eq!(display_score(-2.5), Some(-3));
        assert_eq!(display_score(f64::NAN), None);
        assert_eq!(format_score(f64::INFINITY), "-");
        assert_eq!(format_score(85.0), "85");
    }

    #[test]
    fn minutes_have_one_decimal() {
        assert_eq!(format_minutes(32.0), "32.0 min");
        assert_eq!(format_minutes(15.26), "15.3 min");
    }

    fn analysis(position: &str, per: Option<f64>) -> PlayerAnalysis {
        PlayerAnalysis {
            player_id: 1,
            player_name: "P".to_string(),
            position: position.to_string(),
            archetypes: Vec::new(),
            is_ball_dominant: false,
            is_elite_shooter: false,
            is_defensive_anchor: false,
            per,
            estimated_minutes: 0.0,
        }
    }

    #[test]
    fn analysis_summary_lists_position_per_and_flags() {
        let mut a = analysis("F", Some(23.71));
        a.is_ball_dominant = true;
        a.is_defensive_anchor = true;
        assert_eq!(
            analysis_summary(&a),
            "F | PER 23.7 | Ball dominant | Defensive anchor"
        );
    }

    #[test]
    fn analysis_summary_handles_missing_values() {
        assert_eq!(analysis_summary(&analysis("  ", None)), "- | PER -");
        assert_eq!(format_per(Some(f64::NAN)), "-");
        assert!(analysis_flags(&analysis("G", None)).is_empty());
    }

    #[test]
    fn category_names_are_humanized() {
        assert_eq!(humanize_category("archetype_match"), "Archetype match");
        assert_eq!(humanize_category("friction_penalty"), "Friction penalty");
        assert_eq!(humanize_category(""), "");
    }
}
