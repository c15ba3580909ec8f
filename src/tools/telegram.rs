use crate::error::ToolError;
use crate::mcp::contracts::*;
use crate::social::telegram::TelegramClient;
use crate::tools::{parse_args, require_text};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct MessageArgs {
    text: String,
    #[serde(default)]
    hashtags: Vec<String>,
    #[serde(default)]
    disable_preview: bool,
}

#[derive(Deserialize)]
struct PhotoArgs {
    photo_url: String,
    caption: Option<String>,
    #[serde(default)]
    hashtags: Vec<String>,
}

#[derive(Deserialize)]
struct MediaGroupArgs {
    media_urls: Vec<String>,
    caption: Option<String>,
    #[serde(default)]
    hashtags: Vec<String>,
}

#[derive(Deserialize)]
struct LinkArgs {
    text: String,
    link_url: String,
    #[serde(default)]
    hashtags: Vec<String>,
}

#[derive(Deserialize)]
struct UpdatesArgs {
    limit: Option<u64>,
}

pub fn call(name: &str, args: &Value, client: &TelegramClient) -> Result<Value, ToolError> {
    match name {
        TOOL_TELEGRAM_MESSAGE => {
            let args: MessageArgs = parse_args(args)?;
            require_text("text", &args.text)?;
            client.send_message(&args.text, &args.hashtags, args.disable_preview)
        }
        TOOL_TELEGRAM_PHOTO => {
            let args: PhotoArgs = parse_args(args)?;
            require_text("photo_url", &args.photo_url)?;
            client.send_photo(&args.photo_url, args.caption.as_deref(), &args.hashtags)
        }
        TOOL_TELEGRAM_MEDIA_GROUP => {
            let args: MediaGroupArgs = parse_args(args)?;
            client.send_media_group(&args.media_urls, args.caption.as_deref(), &args.hashtags)
        }
        TOOL_TELEGRAM_LINK => {
            let args: LinkArgs = parse_args(args)?;
            require_text("link_url", &args.link_url)?;
            client.send_link_with_preview(&args.text, &args.link_url, &args.hashtags)
        }
        TOOL_TELEGRAM_UPDATES => {
            let args: UpdatesArgs = parse_args(args)?;
            let limit = args.limit.unwrap_or(DEFAULT_TELEGRAM_UPDATE_LIMIT);
            if limit == 0 {
                return Err(ToolError::invalid("limit must be at least 1"));
            }
            client.get_updates(limit)
        }
        _ => Err(ToolError::UnknownTool(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TelegramCredentials;
    use crate::http::fake::FakeTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn client(transport: &Arc<FakeTransport>) -> TelegramClient {
        TelegramClient::new(
            TelegramCredentials {
                bot_token: "t".to_string(),
                chat_id: "c".to_string(),
            },
            transport.clone(),
        )
    }

    #[test]
    fn single_url_group_is_validation_error() {
        let transport = Arc::new(FakeTransport::new());
        let err = call(
            TOOL_TELEGRAM_MEDIA_GROUP,
            &json!({"media_urls": ["https://a"]}),
            &client(&transport),
        )
        .expect_err("error");
        assert!(matches!(err, ToolError::InvalidArgument(_)));
        assert!(err.to_string().contains("at least 2"));
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn message_preview_defaults_on() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(200, json!({"ok": true}));
        call(TOOL_TELEGRAM_MESSAGE, &json!({"text": "hi"}), &client(&transport)).expect("sent");
        let requests = transport.requests();
        let body = requests[0].json_body().expect("json body");
        assert_eq!(body["disable_web_page_preview"], json!(false));
    }

    #[test]
    fn zero_limit_rejected() {
        let transport = Arc::new(FakeTransport::new());
        let err = call(TOOL_TELEGRAM_UPDATES, &json!({"limit": 0}), &client(&transport))
            .expect_err("error");
        assert_eq!(err.to_string(), "limit must be at least 1");
    }
}
