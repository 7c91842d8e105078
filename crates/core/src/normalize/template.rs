//! Default visual encodings for tiled formats, used when a track names a
//! tiled data source but no mark.

use serde_json::{Value, json};

use crate::spec::DataSource;

/// Partial track JSON for `source`, or `None` for untiled formats.
pub fn template_for(source: &DataSource) -> Option<Value> {
    let template = match source {
        DataSource::Vector(data) | DataSource::Bigwig(data) => json!({
            "mark": "bar",
            "x": {"field": data.start.as_deref().unwrap_or("start"), "type": "genomic"},
            "xe": {"field": data.end.as_deref().unwrap_or("end"), "type": "genomic"},
            "y": {"field": data.value, "type": "quantitative"},
        }),
        DataSource::Multivec(data) => json!({
            "mark": "rect",
            "x": {"field": data.start.as_deref().unwrap_or("start"), "type": "genomic"},
            "xe": {"field": data.end.as_deref().unwrap_or("end"), "type": "genomic"},
            "row": {"field": data.row, "type": "nominal", "legend": true},
            "color": {"field": data.value, "type": "quantitative"},
        }),
        DataSource::Beddb(data) => match data.genomic_fields.as_slice() {
            [start, end, ..] => json!({
                "mark": "rect",
                "x": {"field": start.name, "type": "genomic"},
                "xe": {"field": end.name, "type": "genomic"},
                "size": {"value": 12},
            }),
            [position] => json!({
                "mark": "point",
                "x": {"field": position.name, "type": "genomic"},
            }),
            [] => return None,
        },
        DataSource::Matrix(_) => json!({
            "mark": "rect",
            "x": {"field": "xs", "type": "genomic"},
            "xe": {"field": "xe", "type": "genomic"},
            "y": {"field": "ys", "type": "genomic"},
            "ye": {"field": "ye", "type": "genomic"},
            "color": {"field": "value", "type": "quantitative"},
        }),
        DataSource::Json(_) | DataSource::Csv(_) | DataSource::Bam(_) => return None,
    };
    Some(template)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_template_is_a_bar_chart() {
        let source: DataSource = serde_json::from_str(
            r#"{"type": "vector", "url": "u", "column": "position", "value": "peak"}"#,
        )
        .unwrap();
        let template = template_for(&source).unwrap();
        assert_eq!(template["mark"], "bar");
        assert_eq!(template["y"]["field"], "peak");
        assert_eq!(template["xe"]["field"], "end");
    }

    #[test]
    fn inline_data_has_no_template() {
        let source: DataSource = serde_json::from_str(r#"{"type": "json", "values": []}"#).unwrap();
        assert!(template_for(&source).is_none());
    }
}
