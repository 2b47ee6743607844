mod request;
mod response;
mod wrapper;

pub use request::*;
pub use response::*;
pub use wrapper::*;

use serde::{
    de::{value::Error as ValueError, DeserializeOwned, IntoDeserializer},
    Deserialize, Serialize,
};

use crate::discovery::DiscoveryQuery;

/// Query string of `GET /api/articles`. `tags` is a comma separated list.
///
/// Every field is taken as raw text so a malformed value degrades to its
/// default (or to an empty page) instead of rejecting the request.
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct ArticleQueryParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

impl ArticleQueryParams {
    pub fn into_query(self, default_limit: u32) -> DiscoveryQuery {
        let tag_names = self
            .tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();
        DiscoveryQuery {
            free_text: self.q,
            tag_names,
            sort_field: parse_or_default(self.sort.as_deref()),
            sort_direction: parse_or_default(self.order.as_deref()),
            page_number: parse_count(self.page.as_deref()).unwrap_or(1),
            page_size: parse_count(self.limit.as_deref()).unwrap_or(default_limit),
        }
    }
}

fn parse_or_default<T: DeserializeOwned + Default>(value: Option<&str>) -> T {
    value
        .and_then(|raw| {
            T::deserialize(IntoDeserializer::<ValueError>::into_deserializer(raw.trim())).ok()
        })
        .unwrap_or_default()
}

/// Negative numbers clamp to 0, which `discover` answers with an empty page.
fn parse_count(value: Option<&str>) -> Option<u32> {
    let number = value?.trim().parse::<i64>().ok()?;
    Some(number.clamp(0, i64::from(u32::MAX)) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{SortDirection, SortField};

    #[test]
    fn query_params_build_a_discovery_query() {
        let params = ArticleQueryParams {
            q: Some("react".into()),
            tags: Some("Next.js, React,,".into()),
            sort: Some("like".into()),
            order: Some("asc".into()),
            page: Some("2".into()),
            limit: None,
        };
        let query = params.into_query(9);
        assert_eq!(query.free_text.as_deref(), Some("react"));
        assert_eq!(
            query.tag_names.into_iter().collect::<Vec<_>>(),
            vec!["Next.js".to_string(), "React".to_string()]
        );
        assert_eq!(query.sort_field, SortField::Like);
        assert_eq!(query.sort_direction, SortDirection::Asc);
        assert_eq!(query.page_number, 2);
        assert_eq!(query.page_size, 9);
    }

    #[test]
    fn missing_params_fall_back_to_defaults() {
        let params: ArticleQueryParams = serde_json::from_str("{}").unwrap();
        let query = params.into_query(12);
        assert_eq!(query.page_number, 1);
        assert_eq!(query.page_size, 12);
        assert_eq!(query.sort_field, SortField::PublishedAt);
        assert_eq!(query.sort_direction, SortDirection::Desc);
        assert!(query.tag_names.is_empty());
    }

    #[test]
    fn malformed_params_degrade_instead_of_failing() {
        let params: ArticleQueryParams = serde_json::from_value(serde_json::json!({
            "sort": "bogus",
            "order": "sideways",
            "page": "-1",
            "limit": "-5",
        }))
        .unwrap();
        let query = params.into_query(9);
        assert_eq!(query.sort_field, SortField::PublishedAt);
        assert_eq!(query.sort_direction, SortDirection::Desc);
        assert_eq!(query.page_number, 0);
        assert_eq!(query.page_size, 0);

        let params = ArticleQueryParams {
            sort: Some("readingTime".into()),
            page: Some("abc".into()),
            limit: Some("99999999999".into()),
            ..Default::default()
        };
        let query = params.into_query(9);
        assert_eq!(query.sort_field, SortField::ReadingTime);
        assert_eq!(query.page_number, 1);
        assert_eq!(query.page_size, u32::MAX);
    }
}
