//! Canvas color codes
//!
//! Canvas documents store colors either as one of six preset codes (`"1"` to
//! `"6"`) or as an arbitrary string such as a hex value. Only the presets have
//! a human-readable name; anything else passes through unchanged.

/// Preset color names indexed by code `"1"..="6"`
pub const PRESET_COLORS: [(&str, &str); 6] = [
    ("1", "red"),
    ("2", "orange"),
    ("3", "yellow"),
    ("4", "green"),
    ("5", "cyan"),
    ("6", "purple"),
];

/// Translate a canvas color code into its display name.
///
/// Unknown codes are returned as-is, so custom colors like `"#ff8800"` keep
/// working in the presentation layer.
///
/// # Examples
///
/// ```rust
/// use opencanvas_core::models::translate_color;
///
/// assert_eq!(translate_color("4"), "green");
/// assert_eq!(translate_color("#ff8800"), "#ff8800");
/// ```
pub fn translate_color(code: &str) -> &str {
    PRESET_COLORS
        .iter()
        .find(|(preset, _)| *preset == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

/// Whether `code` is one of the six preset codes
pub fn is_preset_color(code: &str) -> bool {
    PRESET_COLORS.iter().any(|(preset, _)| *preset == code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_all_presets() {
        let names: Vec<&str> = ["1", "2", "3", "4", "5", "6"]
            .iter()
            .map(|code| translate_color(code))
            .collect();
        assert_eq!(
            names,
            vec!["red", "orange", "yellow", "green", "cyan", "purple"]
        );
    }

    #[test]
    fn test_translate_passes_unknown_through() {
        assert_eq!(translate_color("#123456"), "#123456");
        assert_eq!(translate_color("7"), "7");
        assert_eq!(translate_color(""), "");
    }

    #[test]
    fn test_is_preset_color() {
        assert!(is_preset_color("1"));
        assert!(!is_preset_color("0"));
        assert!(!is_preset_color("red"));
    }
}
