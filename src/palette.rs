//! Color tokens for the dashboard.
//!
//! Terminals have no alpha channel, so translucent fills are emulated by
//! blending a color over the header background with [`mix`].

use ratatui::style::Color;

pub fn white() -> Color {
    Color::Rgb(0xff, 0xff, 0xff)
}

pub fn black() -> Color {
    Color::Rgb(0x02, 0x06, 0x17)
}

/// Header background.
pub fn surface() -> Color {
    black()
}

/// Borders and divider rules.
pub fn rule() -> Color {
    Color::Rgb(0x1e, 0x29, 0x3b)
}

/// Breadcrumb separator.
pub fn faint() -> Color {
    Color::Rgb(0x47, 0x55, 0x69)
}

/// Secondary text and idle icons.
pub fn muted() -> Color {
    Color::Rgb(0x94, 0xa3, 0xb8)
}

pub fn emerald() -> Color {
    Color::Rgb(0x10, 0xb9, 0x81)
}

pub fn emerald_light() -> Color {
    Color::Rgb(0x34, 0xd3, 0x99)
}

pub fn rose() -> Color {
    Color::Rgb(0xf4, 0x3f, 0x5e)
}

pub fn rose_light() -> Color {
    Color::Rgb(0xfb, 0x71, 0x85)
}

pub fn blue() -> Color {
    Color::Rgb(0x3b, 0x82, 0xf6)
}

pub fn yellow() -> Color {
    Color::Rgb(0xfa, 0xcc, 0x15)
}

/// Paint `fg` over `bg` at the given opacity.
///
/// Non-RGB colors cannot be blended and are returned as-is.
pub fn mix(fg: Color, bg: Color, alpha: f32) -> Color {
    let alpha = alpha.clamp(0.0, 1.0);
    match (fg, bg) {
        (Color::Rgb(fr, fg_, fb), Color::Rgb(br, bg_, bb)) => Color::Rgb(
            channel(fr, br, alpha),
            channel(fg_, bg_, alpha),
            channel(fb, bb, alpha),
        ),
        (fg, _) => fg,
    }
}

fn channel(fg: u8, bg: u8, alpha: f32) -> u8 {
    let v = f32::from(fg) * alpha + f32::from(bg) * (1.0 - alpha);
    v.round().clamp(0.0, 255.0) as u8
}
