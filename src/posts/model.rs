use serde::{Deserialize, Serialize};

use super::error::ApiError;

/// A blog post as stored and as sent on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub content: String,
}

impl Post {
    pub fn new(id: u64, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self { id, title: title.into(), content: content.into() }
    }
}

/// The JSON body of a create or update request.
///
/// Both fields are optional at this level; unknown keys (including a
/// client-sent `id`) are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PostFields {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl PostFields {
    /// The title, if it was supplied: present, not null and not empty.
    pub fn title(&self) -> Option<&str> {
        supplied(self.title.as_deref())
    }

    /// The content, if it was supplied: present, not null and not empty.
    pub fn content(&self) -> Option<&str> {
        supplied(self.content.as_deref())
    }
}

fn supplied(field: Option<&str>) -> Option<&str> {
    field.filter(|v| !v.is_empty())
}

/// A create request that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

impl TryFrom<PostFields> for NewPost {
    type Error = ApiError;

    fn try_from(fields: PostFields) -> Result<Self, Self::Error> {
        let mut missing = Vec::new();
        if fields.title().is_none() {
            missing.push("title");
        }
        if fields.content().is_none() {
            missing.push("content");
        }
        if !missing.is_empty() {
            return Err(ApiError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            title: fields.title.unwrap_or_default(),
            content: fields.content.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(title: Option<&str>, content: Option<&str>) -> PostFields {
        PostFields { title: title.map(Into::into), content: content.map(Into::into) }
    }

    #[test]
    fn empty_strings_are_not_supplied() {
        let f = fields(Some(""), Some("body"));
        assert_eq!(f.title(), None);
        assert_eq!(f.content(), Some("body"));
    }

    #[test]
    fn new_post_requires_both_fields() {
        let err = NewPost::try_from(fields(None, Some(""))).unwrap_err();
        assert_eq!(err, ApiError::Validation("Missing required fields: title, content".into()));

        let err = NewPost::try_from(fields(Some("t"), None)).unwrap_err();
        assert_eq!(err, ApiError::Validation("Missing required fields: content".into()));
    }

    #[test]
    fn new_post_keeps_values_verbatim() {
        let post = NewPost::try_from(fields(Some("  Title "), Some("Body"))).unwrap();
        assert_eq!(post, NewPost { title: "  Title ".into(), content: "Body".into() });
    }

    #[test]
    fn body_ignores_client_id_and_unknown_keys() {
        let f: PostFields = serde_json::from_str(r#"{"id": 99, "title": "t", "tags": []}"#).unwrap();
        assert_eq!(f.title(), Some("t"));
        assert_eq!(f.content(), None);
    }

    #[test]
    fn post_serialises_in_field_order() {
        let json = serde_json::to_string(&Post::new(1, "First post", "This is the first post.")).unwrap();
        assert_eq!(json, r#"{"id":1,"title":"First post","content":"This is the first post."}"#);
    }
}
