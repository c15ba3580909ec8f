//! LinkedIn UGC posts for an organization page.
//!
//! Image posts are a three-step sequence per image: register an upload slot, fetch the
//! source bytes, PUT them to the slot. The returned asset URNs are then attached to a
//! single `ugcPosts` call.

use crate::config::{EmptyCarouselPolicy, LinkedInCredentials};
use crate::error::ToolError;
use crate::http::{HttpRequest, Transport};
use crate::social::format_with_hashtags;
use crate::social::staging::stage_each;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

pub const LINKEDIN_API_BASE_URL: &str = "https://api.linkedin.com/v2";
const IMAGE_RECIPE: &str = "urn:li:digitalmediaRecipe:feedshare-image";
const RESTLI_PROTOCOL_VERSION: &str = "2.0.0";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UgcPost<'a> {
    author: &'a str,
    lifecycle_state: &'static str,
    specific_content: SpecificContent<'a>,
    visibility: Visibility,
}

#[derive(Serialize)]
struct SpecificContent<'a> {
    #[serde(rename = "com.linkedin.ugc.ShareContent")]
    share_content: ShareContent<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareContent<'a> {
    share_commentary: Commentary<'a>,
    share_media_category: ShareMediaCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    media: Option<Vec<ShareMedia>>,
}

#[derive(Serialize)]
struct Commentary<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum ShareMediaCategory {
    None,
    Image,
    Article,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareMedia {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    media: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    original_url: Option<String>,
}

#[derive(Serialize)]
struct Visibility {
    #[serde(rename = "com.linkedin.ugc.MemberNetworkVisibility")]
    member_network: &'static str,
}

enum PostContent {
    Text,
    Images(Vec<String>),
    Article(String),
}

impl PostContent {
    fn into_share(self) -> (ShareMediaCategory, Option<Vec<ShareMedia>>) {
        match self {
            PostContent::Text => (ShareMediaCategory::None, None),
            PostContent::Images(assets) => (
                ShareMediaCategory::Image,
                Some(
                    assets
                        .into_iter()
                        .map(|asset| ShareMedia {
                            status: "READY",
                            media: Some(asset),
                            original_url: None,
                        })
                        .collect(),
                ),
            ),
            PostContent::Article(url) => (
                ShareMediaCategory::Article,
                Some(vec![ShareMedia {
                    status: "READY",
                    media: None,
                    original_url: Some(url),
                }]),
            ),
        }
    }
}

#[derive(Deserialize)]
struct RegisterUploadResponse {
    value: RegisterUploadValue,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterUploadValue {
    asset: String,
    upload_mechanism: UploadMechanism,
}

#[derive(Deserialize)]
struct UploadMechanism {
    #[serde(rename = "com.linkedin.digitalmedia.uploading.MediaUploadHttpRequest")]
    http_request: UploadHttpRequest,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadHttpRequest {
    upload_url: String,
}

struct UploadSlot {
    asset: String,
    upload_url: String,
}

pub struct LinkedInClient {
    credentials: LinkedInCredentials,
    organization_urn: String,
    transport: Arc<dyn Transport>,
}

impl LinkedInClient {
    pub fn new(credentials: LinkedInCredentials, transport: Arc<dyn Transport>) -> Self {
        let organization_urn = format!("urn:li:organization:{}", credentials.organization_id);
        Self {
            credentials,
            organization_urn,
            transport,
        }
    }

    fn authed(&self, request: HttpRequest) -> HttpRequest {
        request
            .bearer(&self.credentials.access_token)
            .header("X-Restli-Protocol-Version", RESTLI_PROTOCOL_VERSION)
    }

    pub fn create_text_post(&self, text: &str, hashtags: &[String]) -> Result<Value, ToolError> {
        let text = format_with_hashtags(text, hashtags);
        self.create_post(&text, PostContent::Text)
    }

    pub fn create_image_post(
        &self,
        text: &str,
        image_url: &str,
        hashtags: &[String],
    ) -> Result<Value, ToolError> {
        let text = format_with_hashtags(text, hashtags);
        let slot = self.register_upload()?;
        self.upload_image(&slot, image_url)?;
        self.create_post(&text, PostContent::Images(vec![slot.asset]))
    }

    pub fn create_carousel_post(
        &self,
        text: &str,
        image_urls: &[String],
        hashtags: &[String],
    ) -> Result<Value, ToolError> {
        let text = format_with_hashtags(text, hashtags);
        let staged = stage_each("linkedin_carousel_image", image_urls, |url| {
            let slot = match self.register_upload() {
                Ok(slot) => slot,
                Err(err @ ToolError::Upstream { .. }) => {
                    warn!(url = %url, error = %err, "upload registration failed");
                    return Ok(None);
                }
                Err(err) => return Err(err),
            };
            self.upload_image(&slot, url)?;
            Ok(Some(slot.asset))
        })?;

        if staged.is_empty() && self.credentials.empty_carousel == EmptyCarouselPolicy::Fail {
            return Err(ToolError::upstream(
                "Failed to register any image for the carousel",
                None,
            ));
        }
        info!(
            images = staged.ids.len(),
            skipped = staged.skipped.len(),
            "creating LinkedIn carousel post"
        );
        self.create_post(&text, PostContent::Images(staged.ids))
    }

    pub fn create_link_post(
        &self,
        text: &str,
        link_url: &str,
        hashtags: &[String],
    ) -> Result<Value, ToolError> {
        let text = format_with_hashtags(text, hashtags);
        self.create_post(&text, PostContent::Article(link_url.to_string()))
    }

    pub fn list_recent_posts(&self, count: u64) -> Result<Value, ToolError> {
        let request = HttpRequest::get(format!("{LINKEDIN_API_BASE_URL}/ugcPosts"))
            .query("q", "authors")
            .query("authors", format!("List({})", self.organization_urn))
            .query("sortBy", "LAST_MODIFIED")
            .query("count", count.to_string());
        self.transport.send_json(self.authed(request))
    }

    pub fn comment_on_post(&self, post_urn: &str, message: &str) -> Result<Value, ToolError> {
        let request = HttpRequest::post(format!(
            "{LINKEDIN_API_BASE_URL}/socialActions/{post_urn}/comments"
        ))
        .json(serde_json::json!({
            "actor": self.organization_urn,
            "message": { "text": message },
        }));
        self.transport.send_json(self.authed(request))
    }

    pub fn get_comments(&self, post_urn: &str) -> Result<Value, ToolError> {
        let request = HttpRequest::get(format!(
            "{LINKEDIN_API_BASE_URL}/socialActions/{post_urn}/comments"
        ));
        self.transport.send_json(self.authed(request))
    }

    pub fn delete_post(&self, post_urn: &str) -> Result<Value, ToolError> {
        let request = HttpRequest::delete(format!("{LINKEDIN_API_BASE_URL}/ugcPosts/{post_urn}"));
        self.transport.send_json(self.authed(request))
    }

    fn register_upload(&self) -> Result<UploadSlot, ToolError> {
        let request = HttpRequest::post(format!(
            "{LINKEDIN_API_BASE_URL}/assets?action=registerUpload"
        ))
        .json(serde_json::json!({
            "registerUploadRequest": {
                "recipes": [IMAGE_RECIPE],
                "owner": self.organization_urn,
                "serviceRelationships": [{
                    "relationshipType": "OWNER",
                    "identifier": "urn:li:userGeneratedContent"
                }]
            }
        }));
        let response = self.transport.send_json(self.authed(request))?;
        match serde_json::from_value::<RegisterUploadResponse>(response.clone()) {
            Ok(registered) => Ok(UploadSlot {
                asset: registered.value.asset,
                upload_url: registered.value.upload_mechanism.http_request.upload_url,
            }),
            Err(_) => Err(ToolError::upstream(
                "Failed to register upload",
                Some(response),
            )),
        }
    }

    fn upload_image(&self, slot: &UploadSlot, image_url: &str) -> Result<(), ToolError> {
        let source = self.transport.execute(HttpRequest::get(image_url))?;
        if !source.is_success() {
            return Err(ToolError::Upstream {
                status: Some(source.status),
                message: format!("failed to fetch image {image_url}"),
                payload: None,
            });
        }

        let upload = HttpRequest::put(slot.upload_url.as_str())
            .bearer(&self.credentials.access_token)
            .bytes(source.body);
        let response = self.transport.execute(upload)?;
        if !response.is_success() {
            return Err(ToolError::Upstream {
                status: Some(response.status),
                message: format!("failed to upload image for {}", slot.asset),
                payload: serde_json::from_slice(&response.body).ok(),
            });
        }
        Ok(())
    }

    fn create_post(&self, text: &str, content: PostContent) -> Result<Value, ToolError> {
        let (category, media) = content.into_share();
        let post = UgcPost {
            author: &self.organization_urn,
            lifecycle_state: "PUBLISHED",
            specific_content: SpecificContent {
                share_content: ShareContent {
                    share_commentary: Commentary { text },
                    share_media_category: category,
                    media,
                },
            },
            visibility: Visibility {
                member_network: "PUBLIC",
            },
        };
        let body = serde_json::to_value(&post)
            .map_err(|err| ToolError::invalid(format!("failed to encode post: {err}")))?;
        let request = HttpRequest::post(format!("{LINKEDIN_API_BASE_URL}/ugcPosts")).json(body);
        self.transport.send_json(self.authed(request))
    }
}
