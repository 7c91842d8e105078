//! Rendering theme: mark defaults, palettes and surface colors.
//!
//! Themes are plain serde config. Every field has a default, so a theme
//! file only needs the keys it changes.

use serde::{Deserialize, Serialize};
use strand_protocol::Color;
use thiserror::Error;

use crate::encoding::color::{CATEGORICAL, parse_color};
use crate::spec::ColorScheme;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("invalid theme JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown built-in theme `{0}`")]
    UnknownBuiltin(String),
    #[error("theme field `{field}` has unparseable color `{value}`")]
    InvalidColor { field: String, value: String },
}

/// Values used for channels a track leaves unspecified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkDefaults {
    pub color: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub opacity: f64,
    pub size: f64,
    pub text: String,
    pub font_size: f64,
}

impl Default for MarkDefaults {
    fn default() -> Self {
        Self {
            color: "black".into(),
            stroke: "black".into(),
            stroke_width: 0.0,
            opacity: 1.0,
            size: 10.0,
            text: String::new(),
            font_size: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    pub name: String,
    pub background: String,
    pub track_background: Option<String>,
    pub axis: String,
    pub text: String,
    pub marks: MarkDefaults,
    pub categorical: Vec<String>,
    pub sequential: ColorScheme,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "light".into(),
            background: "#ffffff".into(),
            track_background: None,
            axis: "#343a40".into(),
            text: "#1a1a2e".into(),
            marks: MarkDefaults::default(),
            categorical: CATEGORICAL.iter().map(|c| (*c).to_string()).collect(),
            sequential: ColorScheme::Viridis,
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark".into(),
            background: "#181818".into(),
            track_background: Some("#1e1e2e".into()),
            axis: "#a6adc8".into(),
            text: "#cdd6f4".into(),
            marks: MarkDefaults {
                color: "#cdd6f4".into(),
                stroke: "#cdd6f4".into(),
                ..MarkDefaults::default()
            },
            categorical: CATEGORICAL.iter().map(|c| (*c).to_string()).collect(),
            sequential: ColorScheme::Viridis,
        }
    }

    pub fn builtin(name: &str) -> Result<Self, ThemeError> {
        match name {
            "light" => Ok(Self::light()),
            "dark" => Ok(Self::dark()),
            other => Err(ThemeError::UnknownBuiltin(other.to_string())),
        }
    }

    /// Parse a theme document. Missing keys take the light theme's values;
    /// every color must parse.
    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        let theme: Self = serde_json::from_str(json)?;
        theme.validate()?;
        Ok(theme)
    }

    fn validate(&self) -> Result<(), ThemeError> {
        let mut fields = vec![
            ("background", self.background.as_str()),
            ("axis", self.axis.as_str()),
            ("text", self.text.as_str()),
            ("marks.color", self.marks.color.as_str()),
            ("marks.stroke", self.marks.stroke.as_str()),
        ];
        if let Some(bg) = &self.track_background {
            fields.push(("trackBackground", bg.as_str()));
        }
        for color in &self.categorical {
            fields.push(("categorical", color.as_str()));
        }
        for (field, value) in fields {
            if parse_color(value).is_none() {
                return Err(ThemeError::InvalidColor {
                    field: field.to_string(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Parse a theme color, falling back to black.
    pub fn color(value: &str) -> Color {
        parse_color(value).unwrap_or(Color::BLACK)
    }

    pub fn categorical_colors(&self) -> Vec<Color> {
        self.categorical.iter().filter_map(|c| parse_color(c)).collect()
    }
}
