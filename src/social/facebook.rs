use crate::config::FacebookCredentials;
use crate::error::ToolError;
use crate::http::{HttpRequest, Transport};
use crate::social::instagram::{self, InstagramClient};
use crate::social::staging::{response_id, stage_each};
use crate::social::{MediaKind, MediaRequest, Target};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const GRAPH_API_BASE_URL: &str = "https://graph.facebook.com/v18.0";

#[derive(Debug, Clone, PartialEq, Eq)]
enum FacebookPost<'a> {
    Text,
    Photo { url: &'a str },
    Album { urls: &'a [String] },
    Video { url: &'a str },
}

fn plan(request: &MediaRequest) -> FacebookPost<'_> {
    let Some(first) = request.media_urls.first() else {
        return FacebookPost::Text;
    };
    match request.kind {
        MediaKind::Image if request.media_urls.len() == 1 => FacebookPost::Photo { url: first },
        MediaKind::Image | MediaKind::Carousel => FacebookPost::Album {
            urls: &request.media_urls,
        },
        // Reels go through the regular video endpoint.
        MediaKind::Video | MediaKind::Reel => FacebookPost::Video { url: first },
    }
}

pub struct FacebookClient {
    credentials: FacebookCredentials,
    transport: Arc<dyn Transport>,
}

impl FacebookClient {
    pub fn new(credentials: FacebookCredentials, transport: Arc<dyn Transport>) -> Self {
        Self {
            credentials,
            transport,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{GRAPH_API_BASE_URL}/{path}")
    }

    fn page_endpoint(&self, edge: &str) -> String {
        self.endpoint(&format!("{}/{edge}", self.credentials.page_id))
    }

    fn authed(&self, request: HttpRequest) -> HttpRequest {
        request.query("access_token", self.credentials.page_access_token.as_str())
    }

    pub fn post_to_facebook(&self, message: &str) -> Result<Value, ToolError> {
        let request = HttpRequest::post(self.page_endpoint("feed")).query("message", message);
        self.transport.send_json(self.authed(request))
    }

    pub fn reply_to_comment(&self, comment_id: &str, message: &str) -> Result<Value, ToolError> {
        let request = HttpRequest::post(self.endpoint(&format!("{comment_id}/comments")))
            .query("message", message);
        self.transport.send_json(self.authed(request))
    }

    pub fn get_page_posts(&self) -> Result<Value, ToolError> {
        let request = HttpRequest::get(self.page_endpoint("posts"))
            .query("fields", "id,message,created_time");
        self.transport.send_json(self.authed(request))
    }

    pub fn get_post_comments(&self, post_id: &str) -> Result<Value, ToolError> {
        let request = HttpRequest::get(self.endpoint(&format!("{post_id}/comments")))
            .query("fields", "id,message,from,created_time");
        self.transport.send_json(self.authed(request))
    }

    pub fn delete_post(&self, post_id: &str) -> Result<Value, ToolError> {
        let request = HttpRequest::delete(self.endpoint(post_id));
        self.transport.send_json(self.authed(request))
    }

    pub fn delete_comment(&self, comment_id: &str) -> Result<Value, ToolError> {
        let request = HttpRequest::delete(self.endpoint(comment_id));
        self.transport.send_json(self.authed(request))
    }

    /// Instagram business account connected to the page, if any.
    pub fn instagram_business_account_id(&self) -> Result<Option<String>, ToolError> {
        let request = HttpRequest::get(self.endpoint(&self.credentials.page_id))
            .query("fields", "instagram_business_account");
        let response = self.transport.send_json(self.authed(request))?;
        Ok(response
            .get("instagram_business_account")
            .and_then(response_id))
    }

    fn instagram(&self) -> Result<InstagramClient, ToolError> {
        let account_id = self
            .credentials
            .instagram_account_id
            .clone()
            .ok_or(ToolError::NotConfigured("INSTAGRAM_ACCOUNT_ID"))?;
        Ok(InstagramClient::new(
            account_id,
            self.credentials.page_access_token.clone(),
            self.transport.clone(),
        ))
    }

    /// Publishes to every requested target. Each target reports its own outcome and a
    /// failure on one never prevents the attempt on the other.
    pub fn post_media(&self, request: &MediaRequest) -> Value {
        let mut results = Map::new();

        if request.targets.contains(&Target::Facebook) {
            let outcome = self.publish_facebook(request);
            results.insert(
                Target::Facebook.as_str().to_string(),
                target_outcome(Target::Facebook, outcome),
            );
        }

        if request.targets.contains(&Target::Instagram) {
            let outcome = self.instagram().and_then(|client| {
                let post = instagram::plan(request)?;
                client.publish(&request.caption, post)
            });
            results.insert(
                Target::Instagram.as_str().to_string(),
                target_outcome(Target::Instagram, outcome),
            );
        }

        Value::Object(results)
    }

    fn publish_facebook(&self, request: &MediaRequest) -> Result<Value, ToolError> {
        let caption = request.caption.as_str();
        match plan(request) {
            FacebookPost::Text => self.post_to_facebook(caption),
            FacebookPost::Photo { url } => {
                let request = HttpRequest::post(self.page_endpoint("photos"))
                    .query("url", url)
                    .query("caption", caption);
                self.transport.send_json(self.authed(request))
            }
            FacebookPost::Album { urls } => {
                let photos = stage_each("facebook_album_photo", urls, |url| {
                    match self.upload_unpublished_photo(url) {
                        Err(ToolError::Upstream { message, .. }) => {
                            warn!(url = %url, error = %message, "photo upload rejected");
                            Ok(None)
                        }
                        other => other,
                    }
                })?;
                if photos.is_empty() {
                    return Err(ToolError::upstream(
                        "Failed to upload any photo to Facebook.",
                        None,
                    ));
                }
                let attached_media: Vec<Value> = photos
                    .ids
                    .iter()
                    .map(|id| json!({ "media_fbid": id }))
                    .collect();
                let request = HttpRequest::post(self.page_endpoint("feed")).json(json!({
                    "message": caption,
                    "attached_media": attached_media,
                    "access_token": self.credentials.page_access_token,
                }));
                self.transport.send_json(request)
            }
            FacebookPost::Video { url } => {
                let request = HttpRequest::post(self.page_endpoint("videos"))
                    .query("file_url", url)
                    .query("description", caption);
                self.transport.send_json(self.authed(request))
            }
        }
    }

    fn upload_unpublished_photo(&self, url: &str) -> Result<Option<String>, ToolError> {
        let request = HttpRequest::post(self.page_endpoint("photos"))
            .query("url", url)
            .query("published", "false");
        let response = self.transport.send_json(self.authed(request))?;
        Ok(response_id(&response))
    }
}

fn target_outcome(target: Target, outcome: Result<Value, ToolError>) -> Value {
    match outcome {
        Ok(value) => {
            info!(platform = target.as_str(), "media published");
            value
        }
        Err(err) => {
            error!(platform = target.as_str(), error = %err, "media publishing failed");
            let mut failure = json!({ "error": err.to_string(), "kind": err.kind() });
            if let Some(details) = err.details()
                && let Some(obj) = failure.as_object_mut()
            {
                obj.insert("details".to_string(), details.clone());
            }
            failure
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;
    use crate::http::fake::FakeTransport;

    fn credentials(instagram: Option<&str>) -> FacebookCredentials {
        FacebookCredentials {
            page_id: "42".to_string(),
            page_access_token: "page-token".to_string(),
            instagram_account_id: instagram.map(str::to_string),
        }
    }

    fn client(transport: &Arc<FakeTransport>, instagram: Option<&str>) -> FacebookClient {
        FacebookClient::new(credentials(instagram), transport.clone())
    }

    fn media(kind: MediaKind, urls: &[&str], targets: &[Target]) -> MediaRequest {
        MediaRequest {
            caption: "Hello".to_string(),
            media_urls: urls.iter().map(|url| url.to_string()).collect(),
            kind,
            targets: targets.to_vec(),
        }
    }

    #[test]
    fn text_post_hits_feed() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(200, json!({"id": "42_1"}));
        let result = client(&transport, None)
            .post_to_facebook("hi")
            .expect("posted");
        assert_eq!(result, json!({"id": "42_1"}));

        let requests = transport.requests();
        let request = &requests[0];
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, format!("{GRAPH_API_BASE_URL}/42/feed"));
        assert_eq!(request.query_value("message"), Some("hi"));
        assert_eq!(request.query_value("access_token"), Some("page-token"));
    }

    #[test]
    fn delete_comment_uses_delete() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(200, json!({"success": true}));
        client(&transport, None)
            .delete_comment("42_1_7")
            .expect("deleted");
        let requests = transport.requests();
        let request = &requests[0];
        assert_eq!(request.method, Method::Delete);
        assert!(request.url.ends_with("/42_1_7"));
    }

    #[test]
    fn empty_media_degrades_to_text_post() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(200, json!({"id": "42_2"}));
        let result = client(&transport, None).post_media(&media(
            MediaKind::Image,
            &[],
            &[Target::Facebook],
        ));

        assert_eq!(result["facebook"], json!({"id": "42_2"}));
        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.ends_with("/42/feed"));
    }

    #[test]
    fn album_uploads_unpublished_then_posts_feed() {
        let transport = Arc::new(FakeTransport::new());
        transport
            .respond(200, json!({"id": "p1"}))
            .respond(200, json!({"id": "p2"}))
            .respond(200, json!({"id": "42_3"}));
        let result = client(&transport, None).post_media(&media(
            MediaKind::Carousel,
            &["a", "b"],
            &[Target::Facebook],
        ));

        assert_eq!(result["facebook"], json!({"id": "42_3"}));
        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].query_value("published"), Some("false"));
        assert_eq!(requests[1].query_value("url"), Some("b"));
        let body = requests[2].json_body().expect("json body");
        assert_eq!(
            body["attached_media"],
            json!([{"media_fbid": "p1"}, {"media_fbid": "p2"}])
        );
        assert_eq!(body["message"], json!("Hello"));
    }

    #[test]
    fn album_without_photos_is_error() {
        let transport = Arc::new(FakeTransport::new());
        transport
            .respond(400, json!({"error": {"message": "Invalid image"}}))
            .respond(200, json!({}));
        let result = client(&transport, None).post_media(&media(
            MediaKind::Carousel,
            &["a", "b"],
            &[Target::Facebook],
        ));

        assert_eq!(
            result["facebook"],
            json!({
                "error": "Failed to upload any photo to Facebook.",
                "kind": "upstream_error"
            })
        );
        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|request| !request.url.ends_with("/feed")));
    }

    #[test]
    fn album_transport_failure_aborts() {
        let transport = Arc::new(FakeTransport::new());
        transport
            .respond(200, json!({"id": "p1"}))
            .fail("connection reset")
            .respond(200, json!({"id": "p3"}));
        let result = client(&transport, None).post_media(&media(
            MediaKind::Carousel,
            &["a", "b", "c"],
            &[Target::Facebook],
        ));

        assert_eq!(result["facebook"]["kind"], json!("transport_error"));
        assert_eq!(transport.request_count(), 2);
    }

    #[test]
    fn reel_posts_as_video() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(200, json!({"id": "v1"}));
        client(&transport, None).post_media(&media(
            MediaKind::Reel,
            &["https://v"],
            &[Target::Facebook],
        ));

        let requests = transport.requests();
        let request = &requests[0];
        assert!(request.url.ends_with("/42/videos"));
        assert_eq!(request.query_value("file_url"), Some("https://v"));
        assert_eq!(request.query_value("description"), Some("Hello"));
    }

    #[test]
    fn instagram_without_account_is_isolated() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(200, json!({"id": "ph1"}));
        let result = client(&transport, None).post_media(&media(
            MediaKind::Image,
            &["https://img"],
            &[Target::Facebook, Target::Instagram],
        ));

        assert_eq!(result["facebook"], json!({"id": "ph1"}));
        let message = result["instagram"]["error"].as_str().expect("error message");
        assert!(message.contains("INSTAGRAM_ACCOUNT_ID"));
        assert_eq!(transport.request_count(), 1);
    }

    #[test]
    fn facebook_failure_does_not_block_instagram() {
        let transport = Arc::new(FakeTransport::new());
        transport
            .respond(400, json!({"error": {"message": "Invalid OAuth access token."}}))
            .respond(200, json!({"id": "c1"}))
            .respond(200, json!({"id": "m1"}));
        let result = client(&transport, Some("1784")).post_media(&media(
            MediaKind::Image,
            &["https://img"],
            &[Target::Facebook, Target::Instagram],
        ));

        assert_eq!(
            result["facebook"]["error"],
            json!("Invalid OAuth access token.")
        );
        assert!(result["facebook"].get("details").is_some());
        assert_eq!(result["instagram"], json!({"id": "m1"}));
    }

    #[test]
    fn instagram_without_media_makes_no_call() {
        let transport = Arc::new(FakeTransport::new());
        let result = client(&transport, Some("1784")).post_media(&media(
            MediaKind::Image,
            &[],
            &[Target::Instagram],
        ));

        assert!(result["instagram"]["error"].is_string());
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn instagram_account_lookup() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(
            200,
            json!({"instagram_business_account": {"id": "1784"}, "id": "42"}),
        );
        let id = client(&transport, None)
            .instagram_business_account_id()
            .expect("lookup");
        assert_eq!(id, Some("1784".to_string()));
        assert_eq!(
            transport.requests()[0].query_value("fields"),
            Some("instagram_business_account")
        );
    }
}
