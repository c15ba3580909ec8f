//! Instagram content publishing: create container(s), then publish.

use crate::error::ToolError;
use crate::http::{HttpRequest, Transport};
use crate::social::facebook::GRAPH_API_BASE_URL;
use crate::social::staging::{response_id, stage_each};
use crate::social::{MediaKind, MediaRequest};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const CONTAINER_FAILED: &str = "Failed to create Instagram media container.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstagramPost<'a> {
    Image { url: &'a str },
    Video { url: &'a str, reel: bool },
    Carousel { urls: &'a [String] },
}

/// Chooses the container layout for a request before anything is sent.
pub fn plan(request: &MediaRequest) -> Result<InstagramPost<'_>, ToolError> {
    let Some(first) = request.media_urls.first() else {
        return Err(ToolError::invalid(
            "Instagram requires at least one media item",
        ));
    };
    Ok(match request.kind {
        MediaKind::Image if request.media_urls.len() == 1 => InstagramPost::Image { url: first },
        MediaKind::Image | MediaKind::Carousel => InstagramPost::Carousel {
            urls: &request.media_urls,
        },
        MediaKind::Video => InstagramPost::Video {
            url: first,
            reel: false,
        },
        MediaKind::Reel => InstagramPost::Video {
            url: first,
            reel: true,
        },
    })
}

enum ContainerMedia<'a> {
    Image(&'a str),
    Video { url: &'a str, reel: bool },
}

struct Container<'a> {
    media: ContainerMedia<'a>,
    caption: Option<&'a str>,
    carousel_item: bool,
}

pub struct InstagramClient {
    account_id: String,
    access_token: String,
    transport: Arc<dyn Transport>,
}

impl InstagramClient {
    pub fn new(account_id: String, access_token: String, transport: Arc<dyn Transport>) -> Self {
        Self {
            account_id,
            access_token,
            transport,
        }
    }

    pub fn publish(&self, caption: &str, post: InstagramPost<'_>) -> Result<Value, ToolError> {
        let creation_id = match post {
            InstagramPost::Image { url } => self.create_container(Container {
                media: ContainerMedia::Image(url),
                caption: Some(caption),
                carousel_item: false,
            })?,
            InstagramPost::Video { url, reel } => self.create_container(Container {
                media: ContainerMedia::Video { url, reel },
                caption: Some(caption),
                carousel_item: false,
            })?,
            InstagramPost::Carousel { urls } => {
                let children = stage_each("instagram_carousel_item", urls, |url| {
                    let child = self.create_container(Container {
                        media: ContainerMedia::Image(url),
                        caption: None,
                        carousel_item: true,
                    });
                    match child {
                        Ok(id) => Ok(id),
                        Err(ToolError::Upstream { message, .. }) => {
                            warn!(url = %url, error = %message, "carousel item rejected");
                            Ok(None)
                        }
                        Err(err) => Err(err),
                    }
                })?;
                if children.is_empty() {
                    error!("no Instagram carousel item could be created");
                    return Err(ToolError::upstream(CONTAINER_FAILED, None));
                }
                self.create_carousel_container(&children.ids, caption)?
            }
        };

        let Some(creation_id) = creation_id else {
            return Err(ToolError::upstream(CONTAINER_FAILED, None));
        };
        info!(creation_id = %creation_id, "publishing Instagram container");
        self.publish_container(&creation_id)
    }

    fn media_endpoint(&self) -> String {
        format!("{GRAPH_API_BASE_URL}/{}/media", self.account_id)
    }

    fn create_container(&self, container: Container<'_>) -> Result<Option<String>, ToolError> {
        let mut request = HttpRequest::post(self.media_endpoint())
            .query("access_token", self.access_token.as_str());
        request = match container.media {
            ContainerMedia::Image(url) => request.query("image_url", url),
            ContainerMedia::Video { url, reel } => request
                .query("media_type", if reel { "REELS" } else { "VIDEO" })
                .query("video_url", url),
        };
        if !container.carousel_item
            && let Some(caption) = container.caption.filter(|caption| !caption.is_empty())
        {
            request = request.query("caption", caption);
        }
        if container.carousel_item {
            request = request.query("is_carousel_item", "true");
        }

        let response = self.transport.send_json(request)?;
        let id = response_id(&response);
        if id.is_none() {
            error!(response = %response, "Instagram container response has no id");
        }
        Ok(id)
    }

    fn create_carousel_container(
        &self,
        children: &[String],
        caption: &str,
    ) -> Result<Option<String>, ToolError> {
        let request = HttpRequest::post(self.media_endpoint())
            .query("media_type", "CAROUSEL")
            .query("children", children.join(","))
            .query("caption", caption)
            .query("access_token", self.access_token.as_str());
        let response = self.transport.send_json(request)?;
        Ok(response_id(&response))
    }

    fn publish_container(&self, creation_id: &str) -> Result<Value, ToolError> {
        let request = HttpRequest::post(format!(
            "{GRAPH_API_BASE_URL}/{}/media_publish",
            self.account_id
        ))
        .query("creation_id", creation_id)
        .query("access_token", self.access_token.as_str());
        self.transport.send_json(request)
    }
}
