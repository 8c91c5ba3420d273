//! Weather condition code → display glyph.
//!
//! Ranges are tested in order and the first match wins. Several ranges
//! overlap at their edges (200, 227..=232, 248, 260); the earlier row takes
//! precedence.

use crate::model::DayPhase;

struct GlyphRule {
    lower: u16,
    upper: u16,
    day: &'static str,
    night: &'static str,
}

const fn rule(lower: u16, upper: u16, day: &'static str, night: &'static str) -> GlyphRule {
    GlyphRule { lower, upper, day, night }
}

const fn both(lower: u16, upper: u16, glyph: &'static str) -> GlyphRule {
    rule(lower, upper, glyph, glyph)
}

const RULES: &[GlyphRule] = &[
    rule(113, 113, "☀️", "🌙"),
    rule(116, 116, "⛅", "🌤️"),
    both(119, 119, "☁️"),
    both(122, 122, "☁️"),
    both(143, 143, "🌫️"),
    both(248, 248, "🌫️"),
    both(260, 260, "🌫️"),
    both(176, 182, "🌦️"),
    both(185, 200, "🌧️"),
    both(200, 232, "⛈️"),
    both(227, 260, "❄️"),
    both(263, 282, "🌧️"),
    both(284, 296, "🌨️"),
    both(299, 314, "🌧️"),
    both(317, 330, "🌨️"),
    both(332, 350, "❄️"),
    both(353, 368, "🌦️"),
    both(371, 395, "❄️"),
];

const FALLBACK: GlyphRule = rule(0, 0, "🌤️", "🌙");

pub fn weather_glyph(code: u16, phase: DayPhase) -> &'static str {
    let rule = RULES
        .iter()
        .find(|r| (r.lower..=r.upper).contains(&code))
        .unwrap_or(&FALLBACK);

    if phase.is_day() { rule.day } else { rule.night }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_and_partly_cloudy_depend_on_daylight() {
        assert_eq!(weather_glyph(113, DayPhase::Day), "☀️");
        assert_eq!(weather_glyph(113, DayPhase::Night), "🌙");
        assert_eq!(weather_glyph(116, DayPhase::Day), "⛅");
        assert_eq!(weather_glyph(116, DayPhase::Night), "🌤️");
    }

    #[test]
    fn boundary_codes_take_first_listed_range() {
        assert_eq!(weather_glyph(200, DayPhase::Day), "🌧️");
        assert_eq!(weather_glyph(227, DayPhase::Day), "⛈️");
        assert_eq!(weather_glyph(232, DayPhase::Day), "⛈️");
        assert_eq!(weather_glyph(233, DayPhase::Day), "❄️");
        assert_eq!(weather_glyph(248, DayPhase::Day), "🌫️");
        assert_eq!(weather_glyph(260, DayPhase::Night), "🌫️");
    }

    #[test]
    fn representative_codes() {
        assert_eq!(weather_glyph(122, DayPhase::Night), "☁️");
        assert_eq!(weather_glyph(176, DayPhase::Day), "🌦️");
        assert_eq!(weather_glyph(266, DayPhase::Day), "🌧️");
        assert_eq!(weather_glyph(293, DayPhase::Day), "🌨️");
        assert_eq!(weather_glyph(338, DayPhase::Day), "❄️");
        assert_eq!(weather_glyph(356, DayPhase::Day), "🌦️");
        assert_eq!(weather_glyph(395, DayPhase::Day), "❄️");
    }

    #[test]
    fn unmapped_codes_use_fallback() {
        assert_eq!(weather_glyph(0, DayPhase::Day), "🌤️");
        assert_eq!(weather_glyph(150, DayPhase::Night), "🌙");
        assert_eq!(weather_glyph(396, DayPhase::Day), "🌤️");
    }

    #[test]
    fn every_code_yields_a_glyph() {
        for code in 0..=1000u16 {
            for phase in [DayPhase::Day, DayPhase::Night] {
                assert!(!weather_glyph(code, phase).is_empty(), "code {code}");
            }
        }
    }
}
