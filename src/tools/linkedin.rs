use crate::error::ToolError;
use crate::mcp::contracts::*;
use crate::social::linkedin::LinkedInClient;
use crate::tools::{parse_args, require_text};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct TextPostArgs {
    text: String,
    #[serde(default)]
    hashtags: Vec<String>,
}

#[derive(Deserialize)]
struct ImagePostArgs {
    text: String,
    image_url: String,
    #[serde(default)]
    hashtags: Vec<String>,
}

#[derive(Deserialize)]
struct CarouselPostArgs {
    text: String,
    image_urls: Vec<String>,
    #[serde(default)]
    hashtags: Vec<String>,
}

#[derive(Deserialize)]
struct LinkPostArgs {
    text: String,
    link_url: String,
    #[serde(default)]
    hashtags: Vec<String>,
}

#[derive(Deserialize)]
struct ListArgs {
    count: Option<u64>,
}

#[derive(Deserialize)]
struct CommentArgs {
    post_urn: String,
    message: String,
}

#[derive(Deserialize)]
struct PostUrnArgs {
    post_urn: String,
}

pub fn call(name: &str, args: &Value, client: &LinkedInClient) -> Result<Value, ToolError> {
    match name {
        TOOL_LINKEDIN_TEXT_POST => {
            let args: TextPostArgs = parse_args(args)?;
            require_text("text", &args.text)?;
            client.create_text_post(&args.text, &args.hashtags)
        }
        TOOL_LINKEDIN_IMAGE_POST => {
            let args: ImagePostArgs = parse_args(args)?;
            require_text("image_url", &args.image_url)?;
            client.create_image_post(&args.text, &args.image_url, &args.hashtags)
        }
        TOOL_LINKEDIN_CAROUSEL_POST => {
            let args: CarouselPostArgs = parse_args(args)?;
            if args.image_urls.is_empty() {
                return Err(ToolError::invalid("image_urls must not be empty"));
            }
            client.create_carousel_post(&args.text, &args.image_urls, &args.hashtags)
        }
        TOOL_LINKEDIN_LINK_POST => {
            let args: LinkPostArgs = parse_args(args)?;
            require_text("link_url", &args.link_url)?;
            client.create_link_post(&args.text, &args.link_url, &args.hashtags)
        }
        TOOL_LINKEDIN_LIST_POSTS => {
            let args: ListArgs = parse_args(args)?;
            let count = args.count.unwrap_or(DEFAULT_LINKEDIN_POST_COUNT);
            if count == 0 {
                return Err(ToolError::invalid("count must be at least 1"));
            }
            client.list_recent_posts(count)
        }
        TOOL_LINKEDIN_COMMENT => {
            let args: CommentArgs = parse_args(args)?;
            require_text("message", &args.message)?;
            client.comment_on_post(&args.post_urn, &args.message)
        }
        TOOL_LINKEDIN_GET_COMMENTS => {
            let args: PostUrnArgs = parse_args(args)?;
            client.get_comments(&args.post_urn)
        }
        TOOL_LINKEDIN_DELETE_POST => {
            let args: PostUrnArgs = parse_args(args)?;
            client.delete_post(&args.post_urn)
        }
        _ => Err(ToolError::UnknownTool(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EmptyCarouselPolicy, LinkedInCredentials};
    use crate::http::fake::FakeTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn client(transport: &Arc<FakeTransport>) -> LinkedInClient {
        LinkedInClient::new(
            LinkedInCredentials {
                access_token: "token".to_string(),
                organization_id: "1".to_string(),
                empty_carousel: EmptyCarouselPolicy::Post,
            },
            transport.clone(),
        )
    }

    #[test]
    fn list_defaults_to_five() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(200, json!({"elements": []}));
        call(TOOL_LINKEDIN_LIST_POSTS, &json!({}), &client(&transport)).expect("listed");
        assert_eq!(transport.requests()[0].query_value("count"), Some("5"));
    }

    #[test]
    fn empty_carousel_list_is_rejected() {
        let transport = Arc::new(FakeTransport::new());
        let err = call(
            TOOL_LINKEDIN_CAROUSEL_POST,
            &json!({"text": "t", "image_urls": []}),
            &client(&transport),
        )
        .expect_err("error");
        assert_eq!(err.to_string(), "image_urls must not be empty");
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn hashtags_must_be_strings() {
        let transport = Arc::new(FakeTransport::new());
        let err = call(
            TOOL_LINKEDIN_TEXT_POST,
            &json!({"text": "t", "hashtags": [1]}),
            &client(&transport),
        )
        .expect_err("error");
        assert!(err.to_string().starts_with("invalid arguments"));
    }

    #[test]
    fn comment_body_uses_organization_actor() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(201, json!({"id": "c1"}));
        call(
            TOOL_LINKEDIN_COMMENT,
            &json!({"post_urn": "urn:li:share:1", "message": "Nice"}),
            &client(&transport),
        )
        .expect("commented");
        let requests = transport.requests();
        assert!(requests[0].url.ends_with("/socialActions/urn:li:share:1/comments"));
        let body = requests[0].json_body().expect("json body");
        assert_eq!(body["actor"], json!("urn:li:organization:1"));
        assert_eq!(body["message"]["text"], json!("Nice"));
    }
}
