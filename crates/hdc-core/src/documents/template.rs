//! Request body template document
//!
//! The body holds `%token%` placeholders substituted at runtime. Its
//! format is keyed strictly to the API's content type; the escape mode
//! and token-exception policy are decided by the compiler's codec, not
//! by the caller.

use serde::{Deserialize, Serialize};

/// Token escaping applied when substituting into the body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscapeMode {
    None,
    Json,
    Xml,
}

/// Body template document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub template_id: String,
    pub template_body: String,
    pub escape_tokens: EscapeMode,
    pub default_token_value: String,
    pub throw_token_exception: bool,
}

impl Template {
    pub fn new(
        template_id: impl Into<String>,
        template_body: impl Into<String>,
        escape_tokens: EscapeMode,
        throw_token_exception: bool,
    ) -> Self {
        Self {
            template_id: template_id.into(),
            template_body: template_body.into(),
            escape_tokens,
            default_token_value: String::new(),
            throw_token_exception,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_wire_names() {
        let t = Template::new("Demo-Tem", "a=%a%", EscapeMode::None, true);
        let json = serde_json::to_value(&t).unwrap();

        assert_eq!(json["templateId"], "Demo-Tem");
        assert_eq!(json["templateBody"], "a=%a%");
        assert_eq!(json["escapeTokens"], "None");
        assert_eq!(json["defaultTokenValue"], "");
        assert_eq!(json["throwTokenException"], true);
    }
}
