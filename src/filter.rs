//! Recoloring of monochrome images with a CSS `filter` chain.
//!
//! An `<img>` pointing at a single-color SVG cannot be recolored with
//! `color`. Instead the image is first flattened to black
//! (`brightness(0) saturate(100%)`) and then pushed towards the target color
//! with `invert`, `sepia`, `saturate`, `hue-rotate` and `brightness`.
//!
//! The approximation is deterministic and cheap; it favours stable output for
//! the same input over perceptual accuracy.

use std::sync::LazyLock;

use palette::{Hsl, IntoColor, Srgb};
use regex::Regex;

use crate::error::{Error, Result};

/// Filter that turns a flattened image white. Also used for unparseable colors.
pub const WHITE_FILTER: &str = "brightness(0) saturate(100%) invert(1)";

/// Filter that leaves a flattened image black.
pub const BLACK_FILTER: &str = "brightness(0) saturate(100%)";

/// Approximate hue of the `sepia()` base that `hue-rotate` starts from.
const SEPIA_BASE_HUE: i64 = 30;

const MAX_SATURATE: f64 = 2000.0;

static RGB_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^rgba?\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)").expect("static regex is valid")
});

// ============================================================================
// Parsing
// ============================================================================

/// Parses `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()` or `rgba()`.
///
/// Alpha is ignored. Channels above 255 in the functional forms are clamped.
pub fn parse_rgb(color: &str) -> Result<Srgb<u8>> {
    let trimmed = color.trim();
    let malformed = || Error::MalformedColor {
        input: color.to_string(),
    };

    if let Some(hex) = trimmed.strip_prefix('#') {
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| malformed());
        if !hex.is_ascii() {
            return Err(malformed());
        }
        return match hex.len() {
            3 => {
                let doubled: String = hex.chars().flat_map(|c| [c, c]).collect();
                Ok(Srgb::new(
                    channel(&doubled[0..2])?,
                    channel(&doubled[2..4])?,
                    channel(&doubled[4..6])?,
                ))
            }
            6 | 8 => Ok(Srgb::new(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            _ => Err(malformed()),
        };
    }

    let captures = RGB_FUNCTION.captures(trimmed).ok_or_else(malformed)?;
    let channel = |i: usize| -> Result<u8> {
        let digits = captures.get(i).map(|m| m.as_str()).ok_or_else(malformed)?;
        let value: u32 = digits.parse().unwrap_or(u32::MAX);
        Ok(value.min(255) as u8)
    };
    Ok(Srgb::new(channel(1)?, channel(2)?, channel(3)?))
}

// ============================================================================
// Filter Generation
// ============================================================================

/// Converts a CSS color into a filter chain that paints a black image in
/// approximately that color.
///
/// Never fails: unparseable colors produce [`WHITE_FILTER`].
///
/// # Example
///
/// ```
/// use floatmenu_styler::color_to_filter;
///
/// assert_eq!(color_to_filter("#ffffff"), "brightness(0) saturate(100%) invert(1)");
/// assert_eq!(
///     color_to_filter("rgba(26,26,24,1)"),
///     "brightness(0) saturate(100%) invert(10%) sepia(100%) saturate(80%) hue-rotate(30deg) brightness(0.5)"
/// );
/// ```
pub fn color_to_filter(color: &str) -> String {
    match parse_rgb(color) {
        Ok(rgb) => rgb_to_filter(rgb),
        Err(err) => {
            tracing::debug!(%err, "falling back to white icon filter");
            WHITE_FILTER.to_string()
        }
    }
}

/// Builds the filter chain for an already parsed color.
pub fn rgb_to_filter(rgb: Srgb<u8>) -> String {
    let (r, g, b) = rgb.into_components();
    if r > 250 && g > 250 && b > 250 {
        return WHITE_FILTER.to_string();
    }
    if r < 10 && g < 10 && b < 10 {
        return BLACK_FILTER.to_string();
    }

    let hsl: Hsl<palette::encoding::Srgb, f64> = rgb.into_format::<f64>().into_color();
    let hue = hsl.hue.into_positive_degrees().round() as i64;
    let saturation = (hsl.saturation * 100.0).round();
    let lightness = (hsl.lightness * 100.0).round();

    if saturation == 0.0 {
        return format!(
            "{BLACK_FILTER} invert({}%) brightness({})",
            lightness,
            round4(lightness / 100.0)
        );
    }

    let invert = if lightness > 50.0 {
        ((1.0 - lightness / 100.0) * 100.0).round()
    } else {
        lightness
    };
    let saturate = (saturation * 20.0).round().min(MAX_SATURATE);
    let hue_rotate = (hue - SEPIA_BASE_HUE + 360).rem_euclid(360);
    let brightness = if lightness > 50.0 {
        0.5 + lightness / 200.0
    } else {
        lightness / 50.0
    }
    .clamp(0.5, 2.0);
    let brightness = round4(brightness);

    format!(
        "{BLACK_FILTER} invert({invert}%) sepia(100%) saturate({saturate}%) hue-rotate({hue_rotate}deg) brightness({brightness})"
    )
}

/// Rounds to four decimal places.
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_and_black() {
        assert_eq!(color_to_filter("#ffffff"), WHITE_FILTER);
        assert_eq!(color_to_filter("#fbfbfb"), WHITE_FILTER);
        assert_eq!(color_to_filter("#000"), BLACK_FILTER);
        assert_eq!(color_to_filter("rgb(9, 9, 9)"), BLACK_FILTER);
    }

    #[test]
    fn reference_colors() {
        assert_eq!(
            color_to_filter("rgba(26,26,24,1)"),
            "brightness(0) saturate(100%) invert(10%) sepia(100%) saturate(80%) hue-rotate(30deg) brightness(0.5)"
        );
        assert_eq!(
            color_to_filter("#ff0000"),
            "brightness(0) saturate(100%) invert(50%) sepia(100%) saturate(2000%) hue-rotate(330deg) brightness(1)"
        );
        assert_eq!(
            color_to_filter("#3366ff"),
            "brightness(0) saturate(100%) invert(40%) sepia(100%) saturate(2000%) hue-rotate(195deg) brightness(0.8)"
        );
        assert_eq!(
            color_to_filter("rgb(0, 128, 0)"),
            "brightness(0) saturate(100%) invert(25%) sepia(100%) saturate(2000%) hue-rotate(90deg) brightness(0.5)"
        );
    }

    #[test]
    fn brightness_is_rounded() {
        assert_eq!(
            color_to_filter("#ff2424"),
            "brightness(0) saturate(100%) invert(43%) sepia(100%) saturate(2000%) hue-rotate(330deg) brightness(0.785)"
        );
    }

    #[test]
    fn grayscale_skips_hue_steps() {
        assert_eq!(
            color_to_filter("#808080"),
            "brightness(0) saturate(100%) invert(50%) brightness(0.5)"
        );
        assert_eq!(
            color_to_filter("#646464"),
            "brightness(0) saturate(100%) invert(39%) brightness(0.39)"
        );
    }

    #[test]
    fn alpha_is_ignored() {
        assert_eq!(color_to_filter("#ffffffd9"), WHITE_FILTER);
        assert_eq!(color_to_filter("#ff000080"), color_to_filter("#ff0000"));
    }

    #[test]
    fn malformed_colors_fall_back_to_white() {
        for input in ["", "red", "#12", "#ggg", "hsl(0, 50%, 50%)", "#ffé"] {
            assert_eq!(color_to_filter(input), WHITE_FILTER, "{input}");
        }
        assert!(matches!(parse_rgb("red"), Err(Error::MalformedColor { .. })));
    }

    #[test]
    fn short_hex_is_expanded() {
        let rgb = parse_rgb("#f80").unwrap();
        assert_eq!(rgb.into_components(), (0xff, 0x88, 0x00));
    }
}
