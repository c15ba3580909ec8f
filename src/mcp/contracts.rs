use serde_json::{Value, json};

pub const TOOL_POST_TO_FACEBOOK: &str = "post_to_facebook";
pub const TOOL_POST_MEDIA: &str = "post_media";
pub const TOOL_REPLY_TO_COMMENT: &str = "reply_to_comment";
pub const TOOL_GET_PAGE_POSTS: &str = "get_page_posts";
pub const TOOL_GET_POST_COMMENTS: &str = "get_post_comments";
pub const TOOL_FILTER_NEGATIVE_COMMENTS: &str = "filter_negative_comments";
pub const TOOL_DELETE_POST: &str = "delete_post";
pub const TOOL_DELETE_COMMENT: &str = "delete_comment";

pub const TOOL_LINKEDIN_TEXT_POST: &str = "linkedin_create_text_post";
pub const TOOL_LINKEDIN_IMAGE_POST: &str = "linkedin_create_image_post";
pub const TOOL_LINKEDIN_CAROUSEL_POST: &str = "linkedin_create_carousel_post";
pub const TOOL_LINKEDIN_LINK_POST: &str = "linkedin_create_link_post";
pub const TOOL_LINKEDIN_LIST_POSTS: &str = "linkedin_list_posts";
pub const TOOL_LINKEDIN_COMMENT: &str = "linkedin_comment_on_post";
pub const TOOL_LINKEDIN_GET_COMMENTS: &str = "linkedin_get_comments";
pub const TOOL_LINKEDIN_DELETE_POST: &str = "linkedin_delete_post";

pub const TOOL_TELEGRAM_MESSAGE: &str = "telegram_send_message";
pub const TOOL_TELEGRAM_PHOTO: &str = "telegram_send_photo";
pub const TOOL_TELEGRAM_MEDIA_GROUP: &str = "telegram_send_media_group";
pub const TOOL_TELEGRAM_LINK: &str = "telegram_send_link";
pub const TOOL_TELEGRAM_UPDATES: &str = "telegram_get_updates";

pub const DEFAULT_LINKEDIN_POST_COUNT: u64 = 5;
pub const DEFAULT_TELEGRAM_UPDATE_LIMIT: u64 = 20;

/// Service whose credentials back a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Facebook,
    LinkedIn,
    Telegram,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Facebook, Platform::LinkedIn, Platform::Telegram];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::LinkedIn => "linkedin",
            Platform::Telegram => "telegram",
        }
    }
}

pub struct ToolContract {
    pub name: &'static str,
    pub platform: Platform,
    pub description: &'static str,
    pub required: &'static [&'static str],
    properties: fn() -> Value,
}

impl ToolContract {
    pub fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": (self.properties)(),
            "required": self.required,
        })
    }
}

pub const CONTRACTS: &[ToolContract] = &[
    ToolContract {
        name: TOOL_POST_TO_FACEBOOK,
        platform: Platform::Facebook,
        description: "Posts a message to the Facebook Page (use post_media for images, videos and carousels)",
        required: &["message"],
        properties: post_to_facebook_properties,
    },
    ToolContract {
        name: TOOL_POST_MEDIA,
        platform: Platform::Facebook,
        description: "Posts media (images, videos, reels, carousels) to Facebook and/or Instagram.",
        required: &["caption", "media_urls", "media_type", "platforms"],
        properties: post_media_properties,
    },
    ToolContract {
        name: TOOL_REPLY_TO_COMMENT,
        platform: Platform::Facebook,
        description: "Replies to a comment on a specific post",
        required: &["post_id", "comment_id", "message"],
        properties: reply_to_comment_properties,
    },
    ToolContract {
        name: TOOL_GET_PAGE_POSTS,
        platform: Platform::Facebook,
        description: "Retrieves posts published on the Facebook Page",
        required: &[],
        properties: empty_properties,
    },
    ToolContract {
        name: TOOL_GET_POST_COMMENTS,
        platform: Platform::Facebook,
        description: "Retrieves comments for a specific post",
        required: &["post_id"],
        properties: post_id_properties,
    },
    ToolContract {
        name: TOOL_FILTER_NEGATIVE_COMMENTS,
        platform: Platform::Facebook,
        description: "Filters negative comments from a post",
        required: &["post_id"],
        properties: filter_negative_comments_properties,
    },
    ToolContract {
        name: TOOL_DELETE_POST,
        platform: Platform::Facebook,
        description: "Deletes a post from the Facebook Page.",
        required: &["post_id"],
        properties: post_id_properties,
    },
    ToolContract {
        name: TOOL_DELETE_COMMENT,
        platform: Platform::Facebook,
        description: "Deletes a comment from a post.",
        required: &["comment_id"],
        properties: comment_id_properties,
    },
    ToolContract {
        name: TOOL_LINKEDIN_TEXT_POST,
        platform: Platform::LinkedIn,
        description: "Create a LinkedIn text post with optional hashtags",
        required: &["text"],
        properties: linkedin_text_properties,
    },
    ToolContract {
        name: TOOL_LINKEDIN_IMAGE_POST,
        platform: Platform::LinkedIn,
        description: "Create a LinkedIn post with a single image and optional hashtags",
        required: &["text", "image_url"],
        properties: linkedin_image_properties,
    },
    ToolContract {
        name: TOOL_LINKEDIN_CAROUSEL_POST,
        platform: Platform::LinkedIn,
        description: "Create a LinkedIn carousel post with multiple images and optional hashtags",
        required: &["text", "image_urls"],
        properties: linkedin_carousel_properties,
    },
    ToolContract {
        name: TOOL_LINKEDIN_LINK_POST,
        platform: Platform::LinkedIn,
        description: "Share an article or link on LinkedIn with optional hashtags",
        required: &["text", "link_url"],
        properties: linkedin_link_properties,
    },
    ToolContract {
        name: TOOL_LINKEDIN_LIST_POSTS,
        platform: Platform::LinkedIn,
        description: "List recent LinkedIn posts",
        required: &[],
        properties: linkedin_list_properties,
    },
    ToolContract {
        name: TOOL_LINKEDIN_COMMENT,
        platform: Platform::LinkedIn,
        description: "Comment on a LinkedIn post",
        required: &["post_urn", "message"],
        properties: linkedin_comment_properties,
    },
    ToolContract {
        name: TOOL_LINKEDIN_GET_COMMENTS,
        platform: Platform::LinkedIn,
        description: "Get comments for a LinkedIn post",
        required: &["post_urn"],
        properties: post_urn_properties,
    },
    ToolContract {
        name: TOOL_LINKEDIN_DELETE_POST,
        platform: Platform::LinkedIn,
        description: "Delete a LinkedIn post",
        required: &["post_urn"],
        properties: post_urn_properties,
    },
    ToolContract {
        name: TOOL_TELEGRAM_MESSAGE,
        platform: Platform::Telegram,
        description: "Send a text message with optional hashtags and link preview control",
        required: &["text"],
        properties: telegram_message_properties,
    },
    ToolContract {
        name: TOOL_TELEGRAM_PHOTO,
        platform: Platform::Telegram,
        description: "Send a single photo with optional caption and hashtags",
        required: &["photo_url"],
        properties: telegram_photo_properties,
    },
    ToolContract {
        name: TOOL_TELEGRAM_MEDIA_GROUP,
        platform: Platform::Telegram,
        description: "Send multiple photos as carousel/album (2-10 images) with optional caption and hashtags",
        required: &["media_urls"],
        properties: telegram_media_group_properties,
    },
    ToolContract {
        name: TOOL_TELEGRAM_LINK,
        platform: Platform::Telegram,
        description: "Send a link with preview enabled and optional hashtags",
        required: &["text", "link_url"],
        properties: telegram_link_properties,
    },
    ToolContract {
        name: TOOL_TELEGRAM_UPDATES,
        platform: Platform::Telegram,
        description: "Fetch recent updates for the bot",
        required: &[],
        properties: telegram_updates_properties,
    },
];

pub fn find(name: &str) -> Option<&'static ToolContract> {
    CONTRACTS.iter().find(|contract| contract.name == name)
}

fn string_property(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn string_list_property(description: &str) -> Value {
    json!({
        "type": "array",
        "items": { "type": "string" },
        "description": description
    })
}

fn hashtags_property() -> Value {
    string_list_property("Optional hashtags (a leading # is optional)")
}

fn empty_properties() -> Value {
    json!({})
}

fn post_to_facebook_properties() -> Value {
    json!({ "message": string_property("Message to post") })
}

fn post_media_properties() -> Value {
    json!({
        "caption": string_property("Caption/Message for the post."),
        "media_urls": string_list_property("List of public URLs for the media files."),
        "media_type": {
            "type": "string",
            "enum": ["image", "video", "reel", "carousel"],
            "description": "Type of media to post."
        },
        "platforms": {
            "type": "array",
            "items": { "type": "string", "enum": ["facebook", "instagram"] },
            "description": "Platforms to post to."
        }
    })
}

fn reply_to_comment_properties() -> Value {
    json!({
        "post_id": string_property("ID of the post"),
        "comment_id": string_property("ID of the comment"),
        "message": string_property("Reply message")
    })
}

fn post_id_properties() -> Value {
    json!({ "post_id": string_property("ID of the post") })
}

fn comment_id_properties() -> Value {
    json!({ "comment_id": string_property("ID of the comment") })
}

fn filter_negative_comments_properties() -> Value {
    json!({
        "post_id": string_property("ID of the post"),
        "keywords": string_list_property(
            "Keywords that mark a comment as negative (defaults to a built-in list)"
        )
    })
}

fn linkedin_text_properties() -> Value {
    json!({
        "text": string_property("Post text"),
        "hashtags": hashtags_property()
    })
}

fn linkedin_image_properties() -> Value {
    json!({
        "text": string_property("Post caption"),
        "image_url": string_property("Public URL of the image"),
        "hashtags": hashtags_property()
    })
}

fn linkedin_carousel_properties() -> Value {
    json!({
        "text": string_property("Post caption"),
        "image_urls": string_list_property("List of public image URLs"),
        "hashtags": hashtags_property()
    })
}

fn linkedin_link_properties() -> Value {
    json!({
        "text": string_property("Post text/commentary"),
        "link_url": string_property("URL of the article/link to share"),
        "hashtags": hashtags_property()
    })
}

fn linkedin_list_properties() -> Value {
    json!({
        "count": {
            "type": "integer",
            "minimum": 1,
            "description": "Number of posts to fetch (default 5)"
        }
    })
}

fn linkedin_comment_properties() -> Value {
    json!({
        "post_urn": string_property("URN of the LinkedIn post"),
        "message": string_property("Comment text")
    })
}

fn post_urn_properties() -> Value {
    json!({ "post_urn": string_property("URN of the LinkedIn post") })
}

fn telegram_message_properties() -> Value {
    json!({
        "text": string_property("Message text"),
        "hashtags": hashtags_property(),
        "disable_preview": {
            "type": "boolean",
            "description": "Disable link preview (default: false)"
        }
    })
}

fn telegram_photo_properties() -> Value {
    json!({
        "photo_url": string_property("URL of the photo"),
        "caption": string_property("Optional caption"),
        "hashtags": hashtags_property()
    })
}

fn telegram_media_group_properties() -> Value {
    json!({
        "media_urls": string_list_property("List of image URLs (2-10 images)"),
        "caption": string_property("Optional caption for the media group"),
        "hashtags": hashtags_property()
    })
}

fn telegram_link_properties() -> Value {
    json!({
        "text": string_property("Message text to accompany the link"),
        "link_url": string_property("URL to share"),
        "hashtags": hashtags_property()
    })
}

fn telegram_updates_properties() -> Value {
    json!({
        "limit": {
            "type": "integer",
            "minimum": 1,
            "description": "Number of updates to fetch (default 20)"
        }
    })
}
