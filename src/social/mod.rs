use serde::Deserialize;

pub mod comments;
pub mod facebook;
pub mod instagram;
pub mod linkedin;
pub mod staging;
pub mod telegram;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Reel,
    Carousel,
}

/// Destination of a `post_media` request. Both are served by the page token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Facebook,
    Instagram,
}

impl Target {
    pub fn as_str(self) -> &'static str {
        match self {
            Target::Facebook => "facebook",
            Target::Instagram => "instagram",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MediaRequest {
    pub caption: String,
    pub media_urls: Vec<String>,
    pub kind: MediaKind,
    pub targets: Vec<Target>,
}

/// Space-separated tags, each with exactly one leading `#`.
pub fn hashtag_line(hashtags: &[String]) -> String {
    hashtags
        .iter()
        .map(|tag| format!("#{}", tag.trim_start_matches('#')))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_with_hashtags(text: &str, hashtags: &[String]) -> String {
    if hashtags.is_empty() {
        return text.to_string();
    }
    format!("{text}\n\n{}", hashtag_line(hashtags))
}

/// Caption for media messages: `None` when there is neither caption nor hashtags.
pub fn caption_with_hashtags(caption: Option<&str>, hashtags: &[String]) -> Option<String> {
    match caption.filter(|caption| !caption.is_empty()) {
        Some(caption) => Some(format_with_hashtags(caption, hashtags)),
        None if hashtags.is_empty() => None,
        None => Some(hashtag_line(hashtags)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn hashtags_get_exactly_one_hash() {
        let text = format_with_hashtags("Launch day", &tags(&["rust", "#mcp", "##social"]));
        assert_eq!(text, "Launch day\n\n#rust #mcp #social");
    }

    #[test]
    fn no_hashtags_keeps_text() {
        assert_eq!(format_with_hashtags("Plain", &[]), "Plain");
    }

    #[test]
    fn caption_falls_back_to_hashtags() {
        assert_eq!(caption_with_hashtags(None, &[]), None);
        assert_eq!(caption_with_hashtags(Some(""), &[]), None);
        assert_eq!(
            caption_with_hashtags(None, &tags(&["news"])),
            Some("#news".to_string())
        );
        assert_eq!(
            caption_with_hashtags(Some("Hi"), &tags(&["news"])),
            Some("Hi\n\n#news".to_string())
        );
    }

    #[test]
    fn media_kind_parses_lowercase() {
        let kind: MediaKind = serde_json::from_str("\"reel\"").expect("kind");
        assert_eq!(kind, MediaKind::Reel);
        assert!(serde_json::from_str::<MediaKind>("\"link\"").is_err());
    }
}
