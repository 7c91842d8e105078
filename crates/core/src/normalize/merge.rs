use serde_json::{Map, Value};

/// Recursively merge `over` onto `base`. Objects merge key by key; any
/// other value in `over` replaces the one in `base`.
pub fn deep_merge(base: &Value, over: &Value) -> Value {
    match (base, over) {
        (Value::Object(base), Value::Object(over)) => Value::Object(merge_maps(base, over)),
        (_, over) => over.clone(),
    }
}

pub fn merge_maps(base: &Map<String, Value>, over: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, value) in over {
        let next = match merged.get(key) {
            Some(existing) => deep_merge(existing, value),
            None => value.clone(),
        };
        merged.insert(key.clone(), next);
    }
    merged
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn nested_objects_merge_and_scalars_replace() {
        let base = json!({"mark": "bar", "x": {"field": "start", "type": "genomic"}, "width": 100});
        let over = json!({"x": {"axis": "top"}, "width": 300});
        assert_eq!(
            deep_merge(&base, &over),
            json!({"mark": "bar", "x": {"field": "start", "type": "genomic", "axis": "top"}, "width": 300})
        );
    }

    #[test]
    fn arrays_are_replaced_not_concatenated() {
        let base = json!({"domain": [0, 1]});
        let over = json!({"domain": [5]});
        assert_eq!(deep_merge(&base, &over), json!({"domain": [5]}));
    }
}
