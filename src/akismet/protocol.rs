use serde::Serialize;

use crate::filters::OracleError;

pub const VERIFY_KEY_URL: &str = "https://rest.akismet.com/1.1/verify-key";
pub const DEBUG_HELP_HEADER: &str = "x-akismet-debug-help";
const COMMENT_TYPE: &str = "contact-form";

pub fn comment_check_url(api_key: &str) -> String {
    format!("https://{api_key}.rest.akismet.com/1.1/comment-check")
}

#[derive(Debug, Serialize)]
pub struct CommentCheck<'a> {
    pub blog: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_ip: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<&'a str>,
    pub comment_type: &'static str,
    pub comment_author: &'a str,
    pub comment_author_email: &'a str,
    pub comment_content: &'a str,
}

#[derive(Debug, Serialize)]
pub struct VerifyKey<'a> {
    pub key: &'a str,
    pub blog: &'a str,
}

pub fn build_comment_check<'a>(
    blog: &'a str,
    context: &'a RequestContext,
    author: &'a str,
    email: &'a str,
    content: &'a str,
) -> CommentCheck<'a> {
    CommentCheck {
        blog,
        user_ip: context.user_ip.as_deref(),
        user_agent: context.user_agent.as_deref(),
        comment_type: COMMENT_TYPE,
        comment_author: author,
        comment_author_email: email,
        comment_content: content,
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user_ip: Option<String>,
    pub user_agent: Option<String>,
}

pub fn interpret_comment_check(
    body: &str,
    debug_help: Option<String>,
) -> Result<bool, OracleError> {
    match body.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        "invalid" => Err(OracleError::InvalidKey),
        other => Err(OracleError::UnexpectedResponse {
            body: other.to_string(),
            debug_help,
        }),
    }
}

pub fn interpret_verify_key(body: &str) -> Result<bool, OracleError> {
    match body.trim() {
        "valid" => Ok(true),
        "invalid" => Ok(false),
        other => Err(OracleError::UnexpectedResponse {
            body: other.to_string(),
            debug_help: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_check_url_embeds_key() {
        assert_eq!(
            comment_check_url("abc123"),
            "https://abc123.rest.akismet.com/1.1/comment-check"
        );
    }

    #[test]
    fn comment_check_bodies() {
        assert!(interpret_comment_check("true", None).unwrap());
        assert!(!interpret_comment_check("false\n", None).unwrap());
        assert!(matches!(
            interpret_comment_check("invalid", None),
            Err(OracleError::InvalidKey)
        ));
        match interpret_comment_check("", Some("Empty \"blog\" value".into())) {
            Err(OracleError::UnexpectedResponse { debug_help, .. }) => {
                assert_eq!(debug_help.as_deref(), Some("Empty \"blog\" value"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn verify_key_bodies() {
        assert!(interpret_verify_key("valid").unwrap());
        assert!(!interpret_verify_key("invalid").unwrap());
        assert!(interpret_verify_key("huh").is_err());
    }

    #[test]
    fn optional_context_is_omitted_from_payload() {
        let context = RequestContext::default();
        let payload = build_comment_check("https://example.com", &context, "Ann", "a@b.c", "hi");
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("user_ip").is_none());
        assert_eq!(json["comment_type"], "contact-form");
        assert_eq!(json["comment_author_email"], "a@b.c");
    }
}
