use serde_json::Value;
use thiserror::Error;

/// Ways a serialized block can violate the target shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("block is not a JSON object")]
    NotAnObject,

    #[error("block has no string `type`")]
    MissingType,

    #[error("block of type `{0}` has no `{0}` object")]
    MissingPayload(String),

    #[error("block of type `{type_name}` has unexpected key `{key}`")]
    UnexpectedKey { type_name: String, key: String },

    #[error("`has_children` of `{0}` block is not a boolean")]
    HasChildrenNotBool(String),
}

/// Checks the root of a serialized block: exactly `type`, the object named
/// by it, and optionally a boolean `has_children`.
pub fn validate_block(block: &Value) -> Result<(), ValidationError> {
    let object = block.as_object().ok_or(ValidationError::NotAnObject)?;
    let type_name = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ValidationError::MissingType)?;

    if !object.get(type_name).is_some_and(Value::is_object) {
        return Err(ValidationError::MissingPayload(type_name.to_string()));
    }
    if let Some(key) = object
        .keys()
        .find(|k| !matches!(k.as_str(), "type" | "has_children") && k.as_str() != type_name)
    {
        return Err(ValidationError::UnexpectedKey {
            type_name: type_name.to_string(),
            key: key.clone(),
        });
    }
    if object.get("has_children").is_some_and(|v| !v.is_boolean()) {
        return Err(ValidationError::HasChildrenNotBool(type_name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!({"type": "divider", "divider": {}}))]
    #[case(json!({"type": "paragraph", "paragraph": {"rich_text": []}, "has_children": true}))]
    fn valid_blocks(#[case] block: Value) {
        assert_eq!(validate_block(&block), Ok(()));
    }

    #[rstest]
    #[case(json!([]), ValidationError::NotAnObject)]
    #[case(json!({"paragraph": {}}), ValidationError::MissingType)]
    #[case(json!({"type": "paragraph"}), ValidationError::MissingPayload("paragraph".into()))]
    #[case(json!({"type": "paragraph", "paragraph": "x"}), ValidationError::MissingPayload("paragraph".into()))]
    #[case(
        json!({"type": "paragraph", "paragraph": {}, "id": 1}),
        ValidationError::UnexpectedKey { type_name: "paragraph".into(), key: "id".into() }
    )]
    #[case(
        json!({"type": "quote", "quote": {}, "has_children": "yes"}),
        ValidationError::HasChildrenNotBool("quote".into())
    )]
    fn invalid_blocks(#[case] block: Value, #[case] expected: ValidationError) {
        assert_eq!(validate_block(&block), Err(expected));
    }
}
