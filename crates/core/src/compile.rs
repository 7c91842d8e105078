//! Compile entry point: raw spec JSON to resolved, laid-out tracks.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::{ResolvedTrack, canvas_size, layout_tracks};
use crate::normalize::{NormalizeError, normalize};
use crate::spec::View;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation: {}", .0.join("; "))]
    Validator(Vec<String>),
    #[error("normalize: {0}")]
    Normalize(#[from] NormalizeError),
}

/// A check run on the raw spec document before it is parsed. Hosts plug
/// in full schema validation here; [`StructuralValidator`] covers the
/// shape the compiler itself relies on.
pub trait SpecValidator {
    fn validate(&self, spec: &serde_json::Value) -> Result<(), Vec<String>>;
}

/// Accepts every document.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValidation;

impl SpecValidator for NoValidation {
    fn validate(&self, _spec: &serde_json::Value) -> Result<(), Vec<String>> {
        Ok(())
    }
}

/// Checks that every view node is an object with exactly one of a
/// `views` or `tracks` array.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

impl SpecValidator for StructuralValidator {
    fn validate(&self, spec: &serde_json::Value) -> Result<(), Vec<String>> {
        let mut problems = Vec::new();
        check_view(spec, "root", &mut problems);
        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }
}

fn check_view(node: &serde_json::Value, path: &str, problems: &mut Vec<String>) {
    let Some(object) = node.as_object() else {
        problems.push(format!("{path} must be an object"));
        return;
    };
    match (object.get("views"), object.get("tracks")) {
        (Some(views), None) => match views.as_array() {
            Some(children) => {
                for (i, child) in children.iter().enumerate() {
                    check_view(child, &format!("{path}.views[{i}]"), problems);
                }
            }
            None => problems.push(format!("{path}.views must be an array")),
        },
        (None, Some(tracks)) => match tracks.as_array() {
            Some(tracks) => {
                for (i, track) in tracks.iter().enumerate() {
                    if !track.is_object() {
                        problems.push(format!("{path}.tracks[{i}] must be an object"));
                    }
                }
            }
            None => problems.push(format!("{path}.tracks must be an array")),
        },
        (Some(_), Some(_)) => problems.push(format!("{path} has both `views` and `tracks`")),
        (None, None) => problems.push(format!("{path} has neither `views` nor `tracks`")),
    }
}

/// Output of a successful compile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compiled {
    pub spec: View,
    pub tracks: Vec<ResolvedTrack>,
    pub width: f64,
    pub height: f64,
}

impl Compiled {
    /// Diagnostics for every invalid track.
    pub fn warnings(&self) -> Vec<String> {
        self.tracks
            .iter()
            .filter_map(|t| {
                t.reason
                    .as_ref()
                    .map(|reason| format!("{}: {reason}", t.track.label()))
            })
            .collect()
    }
}

pub fn compile_spec(json: &str, validator: &dyn SpecValidator) -> Result<Compiled, CompileError> {
    let raw: serde_json::Value = serde_json::from_str(json)?;
    validator.validate(&raw).map_err(CompileError::Validator)?;
    let parsed: View = serde_json::from_value(raw)?;
    let spec = normalize(&parsed)?;
    let tracks = layout_tracks(&spec);
    let (width, height) = canvas_size(&tracks);
    tracing::debug!(tracks = tracks.len(), width, height, "compiled spec");
    Ok(Compiled {
        spec,
        tracks,
        width,
        height,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompileState {
    Success,
    Error,
}

/// The host-facing report of one compile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileResult {
    pub state: CompileState,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiled: Option<Compiled>,
}

/// Compile and fold the outcome into a [`CompileResult`]. Invalid tracks
/// do not fail the compile; they are reported as warnings.
pub fn compile(json: &str, validator: &dyn SpecValidator) -> CompileResult {
    match compile_spec(json, validator) {
        Ok(compiled) => CompileResult {
            state: CompileState::Success,
            message: "compiled".to_string(),
            warnings: compiled.warnings(),
            compiled: Some(compiled),
        },
        Err(err) => {
            tracing::warn!(error = %err, "compile failed");
            CompileResult {
                state: CompileState::Error,
                message: err.to_string(),
                warnings: Vec::new(),
                compiled: None,
            }
        }
    }
}
