use crate::config::TelegramCredentials;
use crate::error::ToolError;
use crate::http::{HttpRequest, Transport};
use crate::social::{caption_with_hashtags, format_with_hashtags};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub const TELEGRAM_API_BASE_URL: &str = "https://api.telegram.org";
pub const MEDIA_GROUP_MIN: usize = 2;
pub const MEDIA_GROUP_MAX: usize = 10;

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

#[derive(Serialize)]
struct SendPhoto<'a> {
    chat_id: &'a str,
    photo: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<String>,
}

#[derive(Serialize)]
struct SendMediaGroup<'a> {
    chat_id: &'a str,
    media: Vec<InputMediaPhoto<'a>>,
}

#[derive(Debug, Serialize)]
pub struct InputMediaPhoto<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    media: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<String>,
}

/// Album items for `sendMediaGroup`; only the first carries the caption because
/// Telegram renders a single caption per group.
pub fn build_media_group(
    media_urls: &[String],
    caption: Option<String>,
) -> Result<Vec<InputMediaPhoto<'_>>, ToolError> {
    if media_urls.len() < MEDIA_GROUP_MIN {
        return Err(ToolError::invalid(format!(
            "Media group requires at least {MEDIA_GROUP_MIN} images"
        )));
    }
    if media_urls.len() > MEDIA_GROUP_MAX {
        return Err(ToolError::invalid(format!(
            "Telegram supports max {MEDIA_GROUP_MAX} media items per group"
        )));
    }

    let mut caption = caption;
    Ok(media_urls
        .iter()
        .map(|url| InputMediaPhoto {
            kind: "photo",
            media: url,
            caption: caption.take(),
        })
        .collect())
}

pub struct TelegramClient {
    credentials: TelegramCredentials,
    transport: Arc<dyn Transport>,
}

impl TelegramClient {
    pub fn new(credentials: TelegramCredentials, transport: Arc<dyn Transport>) -> Self {
        Self {
            credentials,
            transport,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{TELEGRAM_API_BASE_URL}/bot{}/{method}",
            self.credentials.bot_token
        )
    }

    fn send<T: Serialize>(&self, method: &str, payload: &T) -> Result<Value, ToolError> {
        let body = serde_json::to_value(payload)
            .map_err(|err| ToolError::invalid(format!("failed to encode {method}: {err}")))?;
        self.transport
            .send_json(HttpRequest::post(self.method_url(method)).json(body))
    }

    pub fn send_message(
        &self,
        text: &str,
        hashtags: &[String],
        disable_preview: bool,
    ) -> Result<Value, ToolError> {
        let text = format_with_hashtags(text, hashtags);
        self.send(
            "sendMessage",
            &SendMessage {
                chat_id: &self.credentials.chat_id,
                text: &text,
                disable_web_page_preview: disable_preview,
            },
        )
    }

    pub fn send_photo(
        &self,
        photo_url: &str,
        caption: Option<&str>,
        hashtags: &[String],
    ) -> Result<Value, ToolError> {
        self.send(
            "sendPhoto",
            &SendPhoto {
                chat_id: &self.credentials.chat_id,
                photo: photo_url,
                caption: caption_with_hashtags(caption, hashtags),
            },
        )
    }

    pub fn send_media_group(
        &self,
        media_urls: &[String],
        caption: Option<&str>,
        hashtags: &[String],
    ) -> Result<Value, ToolError> {
        let media = build_media_group(media_urls, caption_with_hashtags(caption, hashtags))?;
        self.send(
            "sendMediaGroup",
            &SendMediaGroup {
                chat_id: &self.credentials.chat_id,
                media,
            },
        )
    }

    pub fn send_link_with_preview(
        &self,
        text: &str,
        link_url: &str,
        hashtags: &[String],
    ) -> Result<Value, ToolError> {
        let text = format!("{text}\n\n{link_url}");
        self.send_message(&text, hashtags, false)
    }

    pub fn get_updates(&self, limit: u64) -> Result<Value, ToolError> {
        let request =
            HttpRequest::get(self.method_url("getUpdates")).query("limit", limit.to_string());
        self.transport.send_json(request)
    }
}
