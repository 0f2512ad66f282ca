//! 分区浅合并：只合并一层，分区内已有字段保留，请求中提供的字段覆盖，
//! 嵌套值（如 language 列表）整体替换。合并结果重新走完整校验。

use domain::{ProfileSections, SECTION_KEYS};
use serde_json::{Map, Value};

pub fn merge_sections(current: &ProfileSections, patch: &Value) -> Result<ProfileSections, String> {
    let patch = patch
        .as_object()
        .ok_or_else(|| "request body must be a JSON object".to_string())?;
    let mut document = match serde_json::to_value(current).map_err(|err| err.to_string())? {
        Value::Object(map) => map,
        _ => return Err("stored profile is not an object".to_string()),
    };

    for (key, value) in patch {
        // 顶层未知字段忽略
        if !SECTION_KEYS.contains(&key.as_str()) {
            continue;
        }
        let fields = match value {
            Value::Null => continue,
            Value::Object(fields) => fields,
            _ => return Err(format!("{key} must be an object")),
        };
        let section = document
            .entry(key.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        match section {
            Value::Object(existing) => {
                existing.extend(fields.iter().map(|(field, value)| (field.clone(), value.clone())));
            }
            other => *other = Value::Object(fields.clone()),
        }
    }

    let merged: ProfileSections =
        serde_json::from_value(Value::Object(document)).map_err(|err| err.to_string())?;
    merged.validate()?;
    Ok(merged)
}
