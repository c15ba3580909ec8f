use crate::error::ToolError;
use crate::mcp::contracts::*;
use crate::social::comments::{data_items, default_keywords, filter_negative};
use crate::social::facebook::FacebookClient;
use crate::social::{MediaKind, MediaRequest, Target};
use crate::tools::{parse_args, require_text};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct MessageArgs {
    message: String,
}

#[derive(Deserialize)]
struct PostMediaArgs {
    caption: String,
    media_urls: Vec<String>,
    media_type: MediaKind,
    platforms: Vec<Target>,
}

impl PostMediaArgs {
    fn into_request(self) -> Result<MediaRequest, ToolError> {
        if self.platforms.is_empty() {
            return Err(ToolError::invalid("platforms must not be empty"));
        }
        if self.media_urls.iter().any(|url| url.trim().is_empty()) {
            return Err(ToolError::invalid("media_urls must not contain empty URLs"));
        }
        Ok(MediaRequest {
            caption: self.caption,
            media_urls: self.media_urls,
            kind: self.media_type,
            targets: self.platforms,
        })
    }
}

#[derive(Deserialize)]
struct ReplyArgs {
    // Accepted for compatibility; the Graph API addresses replies by comment id alone.
    #[allow(dead_code)]
    post_id: String,
    comment_id: String,
    message: String,
}

#[derive(Deserialize)]
struct PostIdArgs {
    post_id: String,
}

#[derive(Deserialize)]
struct FilterArgs {
    post_id: String,
    keywords: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct CommentIdArgs {
    comment_id: String,
}

pub fn call(name: &str, args: &Value, client: &FacebookClient) -> Result<Value, ToolError> {
    match name {
        TOOL_POST_TO_FACEBOOK => {
            let args: MessageArgs = parse_args(args)?;
            require_text("message", &args.message)?;
            client.post_to_facebook(&args.message)
        }
        TOOL_POST_MEDIA => {
            let args: PostMediaArgs = parse_args(args)?;
            Ok(client.post_media(&args.into_request()?))
        }
        TOOL_REPLY_TO_COMMENT => {
            let args: ReplyArgs = parse_args(args)?;
            require_text("message", &args.message)?;
            client.reply_to_comment(&args.comment_id, &args.message)
        }
        TOOL_GET_PAGE_POSTS => client.get_page_posts(),
        TOOL_GET_POST_COMMENTS => {
            let args: PostIdArgs = parse_args(args)?;
            client.get_post_comments(&args.post_id)
        }
        TOOL_FILTER_NEGATIVE_COMMENTS => {
            let args: FilterArgs = parse_args(args)?;
            let keywords = args.keywords.unwrap_or_else(default_keywords);
            let comments = client.get_post_comments(&args.post_id)?;
            Ok(Value::Array(filter_negative(data_items(&comments), &keywords)))
        }
        TOOL_DELETE_POST => {
            let args: PostIdArgs = parse_args(args)?;
            client.delete_post(&args.post_id)
        }
        TOOL_DELETE_COMMENT => {
            let args: CommentIdArgs = parse_args(args)?;
            client.delete_comment(&args.comment_id)
        }
        _ => Err(ToolError::UnknownTool(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FacebookCredentials;
    use crate::http::fake::FakeTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn client(transport: &Arc<FakeTransport>) -> FacebookClient {
        FacebookClient::new(
            FacebookCredentials {
                page_id: "42".to_string(),
                page_access_token: "token".to_string(),
                instagram_account_id: None,
            },
            transport.clone(),
        )
    }

    #[test]
    fn unsupported_media_type_is_rejected_locally() {
        let transport = Arc::new(FakeTransport::new());
        let err = call(
            TOOL_POST_MEDIA,
            &json!({
                "caption": "c",
                "media_urls": ["https://x"],
                "media_type": "link",
                "platforms": ["facebook"]
            }),
            &client(&transport),
        )
        .expect_err("error");
        assert!(matches!(err, ToolError::InvalidArgument(_)));
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn empty_platforms_rejected() {
        let transport = Arc::new(FakeTransport::new());
        let err = call(
            TOOL_POST_MEDIA,
            &json!({"caption": "c", "media_urls": [], "media_type": "image", "platforms": []}),
            &client(&transport),
        )
        .expect_err("error");
        assert_eq!(err.to_string(), "platforms must not be empty");
    }

    #[test]
    fn filter_uses_default_keywords() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(
            200,
            json!({"data": [
                {"id": "1", "message": "This is awful"},
                {"id": "2", "message": "Great"}
            ]}),
        );
        let result = call(
            TOOL_FILTER_NEGATIVE_COMMENTS,
            &json!({"post_id": "42_1"}),
            &client(&transport),
        )
        .expect("filtered");
        assert_eq!(result, json!([{"id": "1", "message": "This is awful"}]));
    }

    #[test]
    fn filter_accepts_custom_keywords() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(
            200,
            json!({"data": [
                {"id": "1", "message": "This is awful"},
                {"id": "2", "message": "Shipping was slow"}
            ]}),
        );
        let result = call(
            TOOL_FILTER_NEGATIVE_COMMENTS,
            &json!({"post_id": "42_1", "keywords": ["slow"]}),
            &client(&transport),
        )
        .expect("filtered");
        assert_eq!(result, json!([{"id": "2", "message": "Shipping was slow"}]));
    }

    #[test]
    fn reply_targets_comment() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(200, json!({"id": "r1"}));
        call(
            TOOL_REPLY_TO_COMMENT,
            &json!({"post_id": "42_1", "comment_id": "42_1_9", "message": "Thanks"}),
            &client(&transport),
        )
        .expect("replied");
        let requests = transport.requests();
        let request = &requests[0];
        assert!(request.url.ends_with("/42_1_9/comments"));
        assert_eq!(request.query_value("message"), Some("Thanks"));
    }
}
