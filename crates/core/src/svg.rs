//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use std::fmt::Write as _;

use strand_protocol::{Color, Point, RenderCommand, TextAlign};

use crate::theme::Theme;

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions; the theme
/// supplies the page background and font.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, theme: &Theme) -> String {
    let mut svg = String::with_capacity(commands.len() * 120);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif">"#,
    );
    let _ = write!(
        svg,
        r#"<rect width="{width}" height="{height}" fill="{}"/>"#,
        Theme::color(&theme.background).to_hex(),
    );

    let mut clips = 0usize;
    let mut clip_open = false;
    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                fill,
                stroke,
                stroke_width,
                opacity,
            } => {
                let _ = write!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}"{}{}/>"#,
                    rect.x,
                    rect.y,
                    rect.w,
                    rect.h,
                    paint("fill", *fill, *opacity),
                    outline(*stroke, *stroke_width, *opacity),
                );
            }
            RenderCommand::DrawPolygon {
                points,
                fill,
                stroke,
                stroke_width,
                opacity,
            } => {
                let _ = write!(
                    svg,
                    r#"<polygon points="{}"{}{}/>"#,
                    point_list(points),
                    paint("fill", *fill, *opacity),
                    outline(*stroke, *stroke_width, *opacity),
                );
            }
            RenderCommand::DrawPolyline {
                points,
                color,
                width: line_width,
                opacity,
            } => {
                let _ = write!(
                    svg,
                    r#"<polyline points="{}" fill="none"{} stroke-width="{line_width}"/>"#,
                    point_list(points),
                    paint("stroke", *color, *opacity),
                );
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
                opacity,
            } => {
                let _ = write!(
                    svg,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{} stroke-width="{line_width}"/>"#,
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    paint("stroke", *color, *opacity),
                );
            }
            RenderCommand::DrawCircle {
                center,
                radius,
                fill,
                stroke,
                stroke_width,
                opacity,
            } => {
                let _ = write!(
                    svg,
                    r#"<circle cx="{}" cy="{}" r="{radius}"{}{}/>"#,
                    center.x,
                    center.y,
                    paint("fill", *fill, *opacity),
                    outline(*stroke, *stroke_width, *opacity),
                );
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
                rotation,
                opacity,
            } => {
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                let transform = if *rotation != 0.0 {
                    format!(
                        r#" transform="rotate({} {} {})""#,
                        rotation.to_degrees(),
                        position.x,
                        position.y
                    )
                } else {
                    String::new()
                };
                let _ = write!(
                    svg,
                    r#"<text x="{}" y="{}" font-size="{font_size}" text-anchor="{anchor}" dominant-baseline="middle"{}{transform}>{}</text>"#,
                    position.x,
                    position.y,
                    paint("fill", *color, *opacity),
                    escape_xml(text),
                );
            }
            RenderCommand::SetClip { rect } => {
                if clip_open {
                    svg.push_str("</g>");
                }
                clips += 1;
                let _ = write!(
                    svg,
                    r#"<clipPath id="clip{clips}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath><g clip-path="url(#clip{clips})">"#,
                    rect.x, rect.y, rect.w, rect.h,
                );
                clip_open = true;
            }
            RenderCommand::ClearClip => {
                if clip_open {
                    svg.push_str("</g>");
                    clip_open = false;
                }
            }
            RenderCommand::BeginGroup { id, label } => {
                let _ = write!(svg, r#"<g id="{}">"#, escape_xml(id));
                if let Some(label) = label {
                    let _ = write!(svg, "<title>{}</title>", escape_xml(label));
                }
            }
            RenderCommand::EndGroup => {
                if clip_open {
                    svg.push_str("</g>");
                    clip_open = false;
                }
                svg.push_str("</g>");
            }
        }
    }
    if clip_open {
        svg.push_str("</g>");
    }

    svg.push_str("</svg>");
    svg
}

/// ` fill="#rrggbb"` plus an opacity attribute when not fully opaque.
fn paint(attribute: &str, color: Color, opacity: f64) -> String {
    let alpha = f64::from(color.a) * opacity;
    if alpha >= 1.0 {
        format!(r#" {attribute}="{}""#, color.to_hex())
    } else {
        format!(
            r#" {attribute}="{}" {attribute}-opacity="{}""#,
            color.to_hex(),
            round(alpha)
        )
    }
}

fn outline(stroke: Option<Color>, width: f64, opacity: f64) -> String {
    match stroke {
        Some(color) if width > 0.0 => {
            format!(r#"{} stroke-width="{width}""#, paint("stroke", color, opacity))
        }
        _ => String::new(),
    }
}

fn point_list(points: &[Point]) -> String {
    let mut out = String::with_capacity(points.len() * 16);
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{},{}", round(p.x), round(p.y));
    }
    out
}

fn round(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
