//! Color parsing, categorical palettes and sequential interpolators.

use strand_protocol::Color;

use crate::spec::ColorScheme;

/// Default categorical palette for nominal color channels.
pub const CATEGORICAL: [&str; 7] = [
    "#E79F00", "#029F73", "#0072B2", "#CB7AA7", "#D45E00", "#57B4E9", "#EFE441",
];

const VIRIDIS: &[&str] = &[
    "#440154", "#472d7b", "#3b528b", "#2c728e", "#21918c", "#28ae80", "#5ec962", "#addc30",
    "#fde725",
];
const GREY: &[&str] = &["#ffffff", "#000000"];
const WARM: &[&str] = &[
    "#6e40aa", "#a83cb3", "#df40a1", "#ff507a", "#ff704e", "#f89b31", "#d2c934", "#aff05b",
];
const SPECTRAL: &[&str] = &[
    "#9e0142", "#d53e4f", "#f46d43", "#fdae61", "#fee08b", "#e6f598", "#abdda4", "#66c2a5",
    "#3288bd", "#5e4fa2",
];

pub fn scheme_stops(scheme: ColorScheme) -> &'static [&'static str] {
    match scheme {
        ColorScheme::Viridis => VIRIDIS,
        ColorScheme::Grey => GREY,
        ColorScheme::Warm => WARM,
        ColorScheme::Spectral => SPECTRAL,
    }
}

/// Parse any CSS color string: hex, `rgb()`/`hsl()`/`oklch()` functions
/// or a named color. Components outside sRGB are clamped.
pub fn parse_color(input: &str) -> Option<Color> {
    let parsed = color::parse_color(input.trim()).ok()?;
    let [r, g, b, a] = parsed.to_alpha_color::<color::Srgb>().components;
    Some(Color::rgba(
        r.clamp(0.0, 1.0),
        g.clamp(0.0, 1.0),
        b.clamp(0.0, 1.0),
        a.clamp(0.0, 1.0),
    ))
}

pub fn lerp_color(a: Color, b: Color, t: f64) -> Color {
    let t = t.clamp(0.0, 1.0) as f32;
    Color::rgba(
        a.r + (b.r - a.r) * t,
        a.g + (b.g - a.g) * t,
        a.b + (b.b - a.b) * t,
        a.a + (b.a - a.a) * t,
    )
}

/// Piecewise-linear interpolation through evenly spaced color stops.
/// Unparseable stops are skipped.
pub fn interpolate(stops: &[&str], t: f64) -> Color {
    let colors: Vec<Color> = stops.iter().filter_map(|s| parse_color(s)).collect();
    interpolate_colors(&colors, t)
}

pub fn interpolate_colors(colors: &[Color], t: f64) -> Color {
    match colors {
        [] => Color::BLACK,
        [only] => *only,
        _ => {
            let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
            let scaled = t * (colors.len() - 1) as f64;
            let i = (scaled.floor() as usize).min(colors.len() - 2);
            lerp_color(colors[i], colors[i + 1], scaled - i as f64)
        }
    }
}
