use serde_json::Value as JsonValue;

use crate::utils::{error::ArgumentError, types::AttributeValue};

/// Parse each literal as JSON and convert it to a statement parameter.
///
/// The output keeps input order, so it lines up with the statement's `?`
/// placeholders. The first literal that fails to parse aborts the whole
/// conversion.
pub fn convert_arguments<S: AsRef<str>>(args: &[S]) -> Result<Vec<AttributeValue>, ArgumentError> {
    args.iter()
        .enumerate()
        .map(|(index, literal)| convert_argument(index, literal.as_ref()))
        .collect()
}

fn convert_argument(index: usize, literal: &str) -> Result<AttributeValue, ArgumentError> {
    let value: JsonValue = serde_json::from_str(literal).map_err(|e| ArgumentError::InvalidJson {
        index,
        literal: literal.to_string(),
        reason: e.to_string(),
    })?;
    Ok(AttributeValue::from(value))
}
