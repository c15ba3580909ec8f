use serde_json::Value;

pub const DEFAULT_NEGATIVE_KEYWORDS: [&str; 7] = [
    "bad", "terrible", "awful", "hate", "dislike", "problem", "issue",
];

pub fn default_keywords() -> Vec<String> {
    DEFAULT_NEGATIVE_KEYWORDS
        .iter()
        .map(|keyword| keyword.to_string())
        .collect()
}

/// Items of a Graph API `{data: [...]}` listing; anything else yields none.
pub fn data_items(response: &Value) -> &[Value] {
    response
        .get("data")
        .and_then(|data| data.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Comments whose `message` contains any keyword, case-insensitively, in input order.
pub fn filter_negative(comments: &[Value], keywords: &[String]) -> Vec<Value> {
    let keywords: Vec<String> = keywords
        .iter()
        .map(|keyword| keyword.to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .collect();

    comments
        .iter()
        .filter(|comment| {
            let Some(message) = comment.get("message").and_then(|value| value.as_str()) else {
                return false;
            };
            let message = message.to_lowercase();
            keywords.iter().any(|keyword| message.contains(keyword))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filters_and_preserves_order() {
        let response = json!({
            "data": [
                {"id": "1", "message": "Terrible service, awful problem"},
                {"id": "2", "message": "Love it"},
                {"id": "3"},
                {"id": "4", "message": "I have an ISSUE"}
            ]
        });
        let negative = filter_negative(data_items(&response), &default_keywords());
        let ids: Vec<&str> = negative
            .iter()
            .filter_map(|comment| comment.get("id").and_then(|id| id.as_str()))
            .collect();
        assert_eq!(ids, vec!["1", "4"]);
    }

    #[test]
    fn custom_keywords_are_case_insensitive() {
        let comments = vec![json!({"message": "too SLOW"}), json!({"message": "bad"})];
        let negative = filter_negative(&comments, &["Slow".to_string()]);
        assert_eq!(negative, vec![json!({"message": "too SLOW"})]);
    }

    #[test]
    fn missing_data_is_empty() {
        assert!(data_items(&json!({"error": {"message": "nope"}})).is_empty());
    }
}
