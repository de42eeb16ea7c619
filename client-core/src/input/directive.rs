use serde_json::Value;

use crate::error::DirectiveError;
use crate::models::OutboundMessage;

/// Lines starting with this prefix are sent out-of-band instead of as text.
pub const DIRECTIVE_PREFIX: &str = "##send ";

/// Parse a `##send <channel> <json object>` line.
///
/// Returns `None` when the line is not a directive (including the bare
/// prefix with nothing after it). The channel is the first space-separated
/// token; the rest of the line must be a JSON object and becomes the named
/// arguments.
pub fn parse_directive(line: &str) -> Option<Result<OutboundMessage, DirectiveError>> {
    let body = line.strip_prefix(DIRECTIVE_PREFIX)?;
    if body.is_empty() {
        return None;
    }
    Some(parse_body(body))
}

fn parse_body(body: &str) -> Result<OutboundMessage, DirectiveError> {
    let (channel, kwargs_text) = body.split_once(' ').unwrap_or((body, ""));
    if channel.is_empty() {
        return Err(DirectiveError::MissingChannel);
    }

    match serde_json::from_str::<Value>(kwargs_text)? {
        Value::Object(kwargs) => Ok(OutboundMessage::directive(channel, kwargs)),
        other => Err(DirectiveError::NotAnObject(json_kind(&other))),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_text_is_not_a_directive() {
        assert!(parse_directive("look").is_none());
        assert!(parse_directive("say ##send hi {}").is_none());
        assert!(parse_directive("##sendlook {}").is_none());
    }

    #[test]
    fn test_bare_prefix_is_not_a_directive() {
        assert!(parse_directive("##send ").is_none());
    }

    #[test]
    fn test_empty_object() {
        let msg = parse_directive("##send look {}").unwrap().unwrap();
        assert_eq!(msg, OutboundMessage::directive("look", serde_json::Map::new()));
    }

    #[test]
    fn test_payload_keeps_inner_spacing() {
        let msg = parse_directive(r#"##send say {"text": "two  spaces"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(msg.channel, "say");
        assert!(msg.args.is_empty());
        assert_eq!(msg.kwargs["text"], json!("two  spaces"));
    }

    #[test]
    fn test_missing_payload_is_invalid_json() {
        let err = parse_directive("##send look").unwrap().unwrap_err();
        assert!(matches!(err, DirectiveError::InvalidPayload(_)));
    }

    #[test]
    fn test_malformed_payload() {
        let err = parse_directive("##send look {width: 80}").unwrap().unwrap_err();
        assert!(matches!(err, DirectiveError::InvalidPayload(_)));
    }

    #[test]
    fn test_non_object_payload() {
        let err = parse_directive("##send look [1, 2]").unwrap().unwrap_err();
        assert!(matches!(err, DirectiveError::NotAnObject("an array")));
    }

    #[test]
    fn test_missing_channel() {
        let err = parse_directive("##send  {}").unwrap().unwrap_err();
        assert!(matches!(err, DirectiveError::MissingChannel));
    }
}
