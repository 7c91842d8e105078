use serde::{Deserialize, Serialize};

use crate::spec::{Channel, ChannelKey, FieldType, Mark, Track};

/// Outcome of checking a track's channel bindings against its mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Validation {
    pub fn ok() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

pub fn validate_spec(track: &Track) -> Validation {
    match check(track) {
        Ok(()) => Validation::ok(),
        Err(reason) => Validation::invalid(reason),
    }
}

fn check(track: &Track) -> Result<(), String> {
    let mark = track.mark.ok_or("a mark is required")?;

    if !track
        .x
        .as_ref()
        .is_some_and(|x| x.is_deep_of(FieldType::Genomic))
    {
        return Err("a genomic `x` channel bound to a field is required".into());
    }

    let has = |key: ChannelKey| track.channel(key).is_some();
    match mark {
        Mark::Bar | Mark::Area | Mark::Line if !has(ChannelKey::Y) => {
            return Err(format!("`{}` marks require a `y` channel", mark_name(mark)));
        }
        Mark::Rect if !has(ChannelKey::Xe) => {
            return Err("`rect` marks require an `xe` channel".into());
        }
        Mark::Link if !has(ChannelKey::Xe) && !(has(ChannelKey::X1) && has(ChannelKey::X1e)) => {
            return Err("`link` marks require `xe`, or both `x1` and `x1e`".into());
        }
        Mark::Text if !has(ChannelKey::Text) => {
            return Err("`text` marks require a `text` channel".into());
        }
        _ => {}
    }

    for key in [ChannelKey::Row, ChannelKey::Column] {
        if let Some(Channel::Deep(deep)) = track.channel(key)
            && deep.field_type != Some(FieldType::Nominal)
        {
            return Err(format!("`{key}` must be a nominal channel"));
        }
    }
    Ok(())
}

fn mark_name(mark: Mark) -> String {
    serde_json::to_value(mark)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(json: &str) -> Validation {
        validate_spec(&serde_json::from_str(json).unwrap())
    }

    const X: &str = r#""x": {"field": "s", "type": "genomic"}"#;

    #[test]
    fn mark_and_genomic_x_are_required() {
        assert!(!validate("{}").valid);
        assert!(!validate(r#"{"mark": "point"}"#).valid);
        assert!(
            !validate(r#"{"mark": "point", "x": {"field": "s", "type": "quantitative"}}"#).valid
        );
        assert!(validate(&format!(r#"{{"mark": "point", {X}}}"#)).valid);
    }

    #[test]
    fn mark_specific_requirements() {
        let bar = validate(&format!(r#"{{"mark": "bar", {X}}}"#));
        assert_eq!(bar.reason.as_deref(), Some("`bar` marks require a `y` channel"));
        assert!(!validate(&format!(r#"{{"mark": "rect", {X}}}"#)).valid);
        assert!(!validate(&format!(r#"{{"mark": "text", {X}}}"#)).valid);
        assert!(!validate(&format!(r#"{{"mark": "link", {X}, "x1": {{"field": "a", "type": "genomic"}}}}"#)).valid);
        assert!(
            validate(&format!(
                r#"{{"mark": "link", {X}, "x1": {{"field": "a", "type": "genomic"}}, "x1e": {{"field": "b", "type": "genomic"}}}}"#
            ))
            .valid
        );
    }

    #[test]
    fn row_must_be_nominal() {
        let v = validate(&format!(
            r#"{{"mark": "point", {X}, "row": {{"field": "r", "type": "quantitative"}}}}"#
        ));
        assert_eq!(v.reason.as_deref(), Some("`row` must be a nominal channel"));
        assert!(validate(&format!(r#"{{"mark": "point", {X}, "row": {{"value": 0}}}}"#)).valid);
    }
}
