use iced::color;
use iced::theme::Palette;
use iced::{Color, Theme};

use rollcall_core::pipeline::annotate::BoxColor;

use crate::settings::Appearance;

/// Resolve the iced Theme from appearance + high_contrast settings.
pub fn resolve_theme(appearance: Appearance, high_contrast: bool) -> Theme {
    let is_dark = match appearance {
        Appearance::Dark => true,
        Appearance::Light => false,
        Appearance::System => detect_system_dark_mode(),
    };

    let palette = match (is_dark, high_contrast) {
        (true, false) => dark_palette(),
        (false, false) => light_palette(),
        (true, true) => high_contrast_dark_palette(),
        (false, true) => high_contrast_light_palette(),
    };

    Theme::custom("Rollcall", palette)
}

/// Secondary text, e.g. field labels and hints.
pub fn muted_color(theme: &Theme) -> Color {
    Color {
        a: 0.70,
        ..theme.palette().text
    }
}

/// Placeholder and caption text.
pub fn tertiary_color(theme: &Theme) -> Color {
    Color {
        a: 0.50,
        ..theme.palette().text
    }
}

/// Background of cards and the camera panel, a step off the window colour.
pub fn surface_color(theme: &Theme) -> Color {
    let bg = theme.palette().background;
    let luma = bg.r * 0.299 + bg.g * 0.587 + bg.b * 0.114;
    let shift = if luma > 0.5 { -0.03 } else { 0.06 };
    Color {
        r: (bg.r + shift).clamp(0.0, 1.0),
        g: (bg.g + shift).clamp(0.0, 1.0),
        b: (bg.b + shift).clamp(0.0, 1.0),
        a: 1.0,
    }
}

pub fn box_color(color: BoxColor) -> Color {
    let [r, g, b] = color.rgb();
    Color::from_rgb8(r, g, b)
}

fn dark_palette() -> Palette {
    Palette {
        background: color!(0x17, 0x1f, 0x1e),
        text: color!(0xdf, 0xe7, 0xe4),
        primary: color!(0x2f, 0xb3, 0x9c),
        success: color!(0x4c, 0xc2, 0x6a),
        warning: color!(0xf2, 0xa9, 0x3b),
        danger: color!(0xef, 0x5b, 0x4f),
    }
}

fn light_palette() -> Palette {
    Palette {
        background: color!(0xf3, 0xf6, 0xf4),
        text: color!(0x1f, 0x33, 0x2e),
        primary: color!(0x12, 0x7f, 0x6e),
        success: color!(0x2b, 0x8a, 0x3e),
        warning: color!(0xc7, 0x7c, 0x02),
        danger: color!(0xc9, 0x2a, 0x2a),
    }
}

fn high_contrast_dark_palette() -> Palette {
    Palette {
        background: Color::BLACK,
        text: Color::WHITE,
        primary: color!(0x5e, 0xea, 0xd4),
        success: color!(0x4a, 0xde, 0x80),
        warning: color!(0xfa, 0xcc, 0x15),
        danger: color!(0xff, 0x6b, 0x6b),
    }
}

fn high_contrast_light_palette() -> Palette {
    Palette {
        background: Color::WHITE,
        text: Color::BLACK,
        primary: color!(0x00, 0x5f, 0x52),
        success: color!(0x16, 0x6b, 0x2e),
        warning: color!(0x8a, 0x4b, 0x00),
        danger: color!(0xb0, 0x00, 0x20),
    }
}

fn detect_system_dark_mode() -> bool {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
            .map(|o| {
                String::from_utf8_lossy(&o.stdout)
                    .trim()
                    .eq_ignore_ascii_case("dark")
            })
            .unwrap_or(false)
    }
    #[cfg(target_os = "windows")]
    {
        // AppsUseLightTheme is 0x0 in dark mode
        std::process::Command::new("reg")
            .args([
                "query",
                r"HKCU\Software\Microsoft\Windows\CurrentVersion\Themes\Personalize",
                "/v",
                "AppsUseLightTheme",
            ])
            .output()
            .map(|o| String::from_utf8_lossy(&o.stdout).contains("0x0"))
            .unwrap_or(false)
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_colors_match_annotations() {
        assert_eq!(box_color(BoxColor::Green), Color::from_rgb8(0, 200, 0));
        assert_eq!(box_color(BoxColor::Red), Color::from_rgb8(220, 0, 0));
    }

    #[test]
    fn test_explicit_appearance_ignores_system() {
        let dark = resolve_theme(Appearance::Dark, false);
        let light = resolve_theme(Appearance::Light, false);
        assert_eq!(dark.palette().background, dark_palette().background);
        assert_eq!(light.palette().background, light_palette().background);
    }

    #[test]
    fn test_high_contrast_uses_pure_background() {
        let theme = resolve_theme(Appearance::Dark, true);
        assert_eq!(theme.palette().background, Color::BLACK);
    }
}
