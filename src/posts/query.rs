//! Query-string parameters for listing and searching posts.

use std::str::FromStr;

use super::error::ApiError;
use super::model::Post;

/// A post field that listings can be ordered by.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortField {
    Title,
    Content,
}

impl SortField {
    const VALID: &'static str = "title, content";

    pub fn of(self, post: &Post) -> &str {
        match self {
            Self::Title => &post.title,
            Self::Content => &post.content,
        }
    }
}

impl FromStr for SortField {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "content" => Ok(Self::Content),
            _ => Err(ApiError::Validation(format!(
                "Invalid sort field '{s}'. Valid options are: {}",
                Self::VALID
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    const VALID: &'static str = "asc, desc";
}

impl FromStr for Direction {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ApiError::Validation(format!(
                "Invalid direction '{s}'. Valid options are: {}",
                Self::VALID
            ))),
        }
    }
}

/// How a listing should be ordered.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: Direction,
}

impl SortOrder {
    /// Validates the raw `sort` and `direction` parameters.
    ///
    /// Checks run in a fixed order: unknown field, unknown direction, then
    /// direction without a field. `Ok(None)` means stored order.
    pub fn from_params(sort: Option<&str>, direction: Option<&str>) -> Result<Option<Self>, ApiError> {
        let field = sort.map(str::parse::<SortField>).transpose()?;
        let direction = direction.map(str::parse::<Direction>).transpose()?;

        match (field, direction) {
            (None, None) => Ok(None),
            (None, Some(_)) => Err(ApiError::Validation(
                "Direction parameter requires a sort field. \
                 Please provide both 'sort' and 'direction' parameters."
                    .to_owned(),
            )),
            (Some(field), direction) => Ok(Some(Self {
                field,
                direction: direction.unwrap_or_default(),
            })),
        }
    }

    /// Orders `posts` in place by the chosen field, ignoring case.
    ///
    /// Stable in both directions: posts with equal keys keep their relative
    /// order.
    pub fn apply(self, posts: &mut [Post]) {
        match self.direction {
            Direction::Asc => posts.sort_by_cached_key(|p| self.field.of(p).to_lowercase()),
            Direction::Desc => {
                posts.sort_by_cached_key(|p| std::cmp::Reverse(self.field.of(p).to_lowercase()))
            }
        }
    }
}

/// Case-insensitive substring search over titles and contents.
///
/// A post matches when either supplied term matches; an unsupplied term
/// never matches anything.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SearchQuery {
    title: Option<String>,
    content: Option<String>,
}

impl SearchQuery {
    pub fn new(title: Option<&str>, content: Option<&str>) -> Self {
        let lower = |term: Option<&str>| term.filter(|t| !t.is_empty()).map(str::to_lowercase);
        Self { title: lower(title), content: lower(content) }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }

    pub fn matches(&self, post: &Post) -> bool {
        let hit = |term: &Option<String>, text: &str| {
            term.as_deref().is_some_and(|t| text.to_lowercase().contains(t))
        };
        hit(&self.title, &post.title) || hit(&self.content, &post.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn no_params_means_stored_order() {
        assert_eq!(SortOrder::from_params(None, None), Ok(None));
    }

    #[test]
    fn direction_defaults_to_ascending() {
        let order = SortOrder::from_params(Some("content"), None).unwrap().unwrap();
        assert_eq!(order, SortOrder { field: SortField::Content, direction: Direction::Asc });
    }

    #[test]
    fn direction_without_sort_is_rejected() {
        let err = SortOrder::from_params(None, Some("asc")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Direction parameter requires a sort field. Please provide both 'sort' and 'direction' parameters."
        );
    }

    #[test]
    fn invalid_field_is_reported_before_invalid_direction() {
        let err = SortOrder::from_params(Some("author"), Some("sideways")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid sort field 'author'. Valid options are: title, content");
    }

    #[test]
    fn invalid_direction_is_reported_before_missing_sort() {
        let err = SortOrder::from_params(None, Some("sideways")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid direction 'sideways'. Valid options are: asc, desc");
    }

    #[test]
    fn sorts_case_insensitively_both_ways() {
        let mut posts = vec![
            Post::new(1, "banana", "x"),
            Post::new(2, "Apple", "y"),
            Post::new(3, "cherry", "z"),
        ];
        SortOrder { field: SortField::Title, direction: Direction::Asc }.apply(&mut posts);
        assert_eq!(titles(&posts), ["Apple", "banana", "cherry"]);

        SortOrder { field: SortField::Title, direction: Direction::Desc }.apply(&mut posts);
        assert_eq!(titles(&posts), ["cherry", "banana", "Apple"]);
    }

    #[test]
    fn equal_keys_keep_relative_order() {
        let mut posts = vec![
            Post::new(1, "Same", "b"),
            Post::new(2, "same", "a"),
            Post::new(3, "SAME", "c"),
        ];
        SortOrder { field: SortField::Title, direction: Direction::Desc }.apply(&mut posts);
        let ids: Vec<u64> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, [1_u64, 2, 3]);
    }

    #[test]
    fn search_terms_are_or_combined() {
        let q = SearchQuery::new(Some("FIRST"), Some("second"));
        assert!(q.matches(&Post::new(1, "First post", "This is the first post.")));
        assert!(q.matches(&Post::new(2, "Other", "This is the second post.")));
        assert!(!q.matches(&Post::new(3, "Third", "Nothing here.")));
    }

    #[test]
    fn title_term_does_not_search_content() {
        let q = SearchQuery::new(Some("first"), None);
        assert!(!q.matches(&Post::new(1, "Untitled", "the first of many")));
    }

    #[test]
    fn empty_terms_make_an_empty_query() {
        assert!(SearchQuery::new(Some(""), None).is_empty());
        assert!(!SearchQuery::new(None, Some("x")).is_empty());
    }
}
