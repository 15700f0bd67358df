use serde::{ Serialize, Deserialize };
use serde_json::{ Map, Value };

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Body of `POST /api/chat`. `messages` is kept as raw JSON: only its
/// array-ness is checked before the elements are forwarded upstream.
#[derive(Debug, Default)]
pub struct RelayRequest {
    pub messages: Option<Value>,
}

impl RelayRequest {
    /// Parses a request body. Anything but a JSON object is an error;
    /// a derived `Deserialize` would also take a positional array.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let mut fields: Map<String, Value> = serde_json::from_slice(body)?;
        Ok(Self { messages: fields.remove("messages") })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RelayResponse {
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn roles_serialize_lowercase() {
        let msg = ChatMessage::assistant("hola");
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({ "role": "assistant", "content": "hola" })
        );
    }

    #[test]
    fn relay_request_tolerates_missing_messages() {
        let req = RelayRequest::from_slice(b"{}").unwrap();
        assert!(req.messages.is_none());

        let req = RelayRequest::from_slice(br#"{"messages":"nope"}"#).unwrap();
        assert_eq!(req.messages, Some(json!("nope")));
    }

    #[test]
    fn relay_request_must_be_an_object() {
        assert!(RelayRequest::from_slice(br#"[[{"role":"user","content":"hola"}]]"#).is_err());
        assert!(RelayRequest::from_slice(b"[]").is_err());
        assert!(RelayRequest::from_slice(b"null").is_err());
    }
}
