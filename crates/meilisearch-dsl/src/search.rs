//! Search request options.
//!
//! [`IndexQuery`] holds the recognized option slots for one index and query
//! string and validates assignments by name. [`IndexSearch`] wraps it with a
//! typed, chainable API. Both render to a [`SearchRequest`] in the shape of
//! one entry of the engine's multi-search payload.

use std::str::FromStr;

use serde::Serialize;
use tracing::trace;

use crate::error::{DslError, Result};
use crate::query::Q;

/// A recognized search option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchOption {
    Filter,
    Limit,
    Offset,
    HitsPerPage,
    Page,
    Facets,
    AttributesToRetrieve,
    AttributesToCrop,
    CropLength,
    CropMarker,
    AttributesToHighlight,
    HighlightPreTag,
    HighlightPostTag,
    ShowMatchesPosition,
    Sort,
    MatchingStrategy,
}

/// Shape of value a slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Filter,
    Integer,
    Text,
    TextList,
    Flag,
    Strategy,
}

impl OptionKind {
    fn describe(self) -> &'static str {
        match self {
            OptionKind::Filter => "filter expression",
            OptionKind::Integer => "integer",
            OptionKind::Text => "text",
            OptionKind::TextList => "list of text",
            OptionKind::Flag => "boolean",
            OptionKind::Strategy => "matching strategy",
        }
    }
}

impl SearchOption {
    pub const ALL: [SearchOption; 16] = [
        SearchOption::Filter,
        SearchOption::Limit,
        SearchOption::Offset,
        SearchOption::HitsPerPage,
        SearchOption::Page,
        SearchOption::Facets,
        SearchOption::AttributesToRetrieve,
        SearchOption::AttributesToCrop,
        SearchOption::CropLength,
        SearchOption::CropMarker,
        SearchOption::AttributesToHighlight,
        SearchOption::HighlightPreTag,
        SearchOption::HighlightPostTag,
        SearchOption::ShowMatchesPosition,
        SearchOption::Sort,
        SearchOption::MatchingStrategy,
    ];

    /// The option's name as accepted by [`IndexQuery::set`].
    pub fn name(self) -> &'static str {
        match self {
            SearchOption::Filter => "filter",
            SearchOption::Limit => "limit",
            SearchOption::Offset => "offset",
            SearchOption::HitsPerPage => "hits_per_page",
            SearchOption::Page => "page",
            SearchOption::Facets => "facets",
            SearchOption::AttributesToRetrieve => "attributes_to_retrieve",
            SearchOption::AttributesToCrop => "attributes_to_crop",
            SearchOption::CropLength => "crop_length",
            SearchOption::CropMarker => "crop_marker",
            SearchOption::AttributesToHighlight => "attributes_to_highlight",
            SearchOption::HighlightPreTag => "highlight_pre_tag",
            SearchOption::HighlightPostTag => "highlight_post_tag",
            SearchOption::ShowMatchesPosition => "show_matches_position",
            SearchOption::Sort => "sort",
            SearchOption::MatchingStrategy => "matching_strategy",
        }
    }

    /// The key the option is rendered under in a request.
    pub fn key(self) -> &'static str {
        match self {
            SearchOption::Filter => "filter",
            SearchOption::Limit => "limit",
            SearchOption::Offset => "offset",
            SearchOption::HitsPerPage => "hitsPerPage",
            SearchOption::Page => "page",
            SearchOption::Facets => "facets",
            SearchOption::AttributesToRetrieve => "attributesToRetrieve",
            SearchOption::AttributesToCrop => "attributesToCrop",
            SearchOption::CropLength => "cropLength",
            SearchOption::CropMarker => "cropMarker",
            SearchOption::AttributesToHighlight => "attributesToHighlight",
            SearchOption::HighlightPreTag => "highlightPreTag",
            SearchOption::HighlightPostTag => "highlightPostTag",
            SearchOption::ShowMatchesPosition => "showMatchesPosition",
            SearchOption::Sort => "sort",
            SearchOption::MatchingStrategy => "matchingStrategy",
        }
    }

    pub fn kind(self) -> OptionKind {
        match self {
            SearchOption::Filter => OptionKind::Filter,
            SearchOption::Limit
            | SearchOption::Offset
            | SearchOption::HitsPerPage
            | SearchOption::Page
            | SearchOption::CropLength => OptionKind::Integer,
            SearchOption::CropMarker
            | SearchOption::HighlightPreTag
            | SearchOption::HighlightPostTag => OptionKind::Text,
            SearchOption::Facets
            | SearchOption::AttributesToRetrieve
            | SearchOption::AttributesToCrop
            | SearchOption::AttributesToHighlight
            | SearchOption::Sort => OptionKind::TextList,
            SearchOption::ShowMatchesPosition => OptionKind::Flag,
            SearchOption::MatchingStrategy => OptionKind::Strategy,
        }
    }
}

impl FromStr for SearchOption {
    type Err = DslError;

    fn from_str(name: &str) -> Result<Self> {
        SearchOption::ALL
            .into_iter()
            .find(|option| option.name() == name)
            .ok_or_else(|| DslError::UnknownOption(name.to_string()))
    }
}

impl std::fmt::Display for SearchOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How the engine matches query terms against documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchingStrategy {
    Last,
    All,
    Frequency,
}

impl MatchingStrategy {
    pub const ALL: [MatchingStrategy; 3] = [
        MatchingStrategy::Last,
        MatchingStrategy::All,
        MatchingStrategy::Frequency,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MatchingStrategy::Last => "last",
            MatchingStrategy::All => "all",
            MatchingStrategy::Frequency => "frequency",
        }
    }
}

impl FromStr for MatchingStrategy {
    type Err = DslError;

    fn from_str(name: &str) -> Result<Self> {
        MatchingStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == name)
            .ok_or_else(|| DslError::InvalidMatchingStrategy(name.to_string()))
    }
}

impl std::fmt::Display for MatchingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A value assigned to a search option by name.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Filter(Q),
    /// Any integer; integer slots reject negative values on assignment.
    Integer(i64),
    Text(String),
    TextList(Vec<String>),
    Flag(bool),
    Strategy(MatchingStrategy),
}

impl OptionValue {
    fn kind(&self) -> &'static str {
        match self {
            OptionValue::Filter(_) => OptionKind::Filter.describe(),
            OptionValue::Integer(_) => OptionKind::Integer.describe(),
            OptionValue::Text(_) => OptionKind::Text.describe(),
            OptionValue::TextList(_) => OptionKind::TextList.describe(),
            OptionValue::Flag(_) => OptionKind::Flag.describe(),
            OptionValue::Strategy(_) => OptionKind::Strategy.describe(),
        }
    }
}

impl From<Q> for OptionValue {
    fn from(q: Q) -> Self {
        OptionValue::Filter(q)
    }
}

macro_rules! integer_option {
    ($($source:ty),+) => {
        $(
            impl From<$source> for OptionValue {
                fn from(n: $source) -> Self {
                    OptionValue::Integer(i64::try_from(n).unwrap_or(i64::MAX))
                }
            }
        )+
    };
}

integer_option!(i32, i64, u32, u64, usize);

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Text(s)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_string())
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(items: Vec<String>) -> Self {
        OptionValue::TextList(items)
    }
}

impl From<Vec<&str>> for OptionValue {
    fn from(items: Vec<&str>) -> Self {
        OptionValue::TextList(items.into_iter().map(String::from).collect())
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Flag(b)
    }
}

impl From<MatchingStrategy> for OptionValue {
    fn from(strategy: MatchingStrategy) -> Self {
        OptionValue::Strategy(strategy)
    }
}

/// Every option except the filter, serialized under its request key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hits_per_page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes_to_retrieve: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes_to_crop: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_marker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes_to_highlight: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_pre_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_post_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_matches_position: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching_strategy: Option<MatchingStrategy>,
}

/// One rendered request of a multi-search batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub index_uid: String,
    pub q: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(flatten)]
    pub options: SearchOptions,
}

impl SearchRequest {
    /// The request as a JSON object; unset options are absent.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Option slots for one index and query string.
///
/// # Example
///
/// ```
/// use meilisearch_dsl::{IndexQuery, Q};
///
/// let mut query = IndexQuery::new("movies", "batman");
/// query.set("filter", Q::cond("year__gte", 2000))?.set("limit", 5)?;
///
/// let request = query.build()?;
/// assert_eq!(request.filter.as_deref(), Some("year >= 2000"));
/// assert_eq!(request.options.limit, Some(5));
///
/// assert!(query.set("colour", "red").is_err());
/// # Ok::<(), meilisearch_dsl::DslError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IndexQuery {
    index_uid: String,
    query: String,
    filter: Option<Q>,
    options: SearchOptions,
}

impl IndexQuery {
    pub fn new(index_uid: impl Into<String>, query: impl Into<String>) -> Self {
        IndexQuery {
            index_uid: index_uid.into(),
            query: query.into(),
            filter: None,
            options: SearchOptions::default(),
        }
    }

    pub fn index_uid(&self) -> &str {
        &self.index_uid
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filter(&self) -> Option<&Q> {
        self.filter.as_ref()
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Assigns an option by name.
    ///
    /// Unknown names fail with [`DslError::UnknownOption`] and values of the
    /// wrong shape, including negative integers, with
    /// [`DslError::InvalidValueType`]; either way nothing is changed.
    pub fn set(&mut self, name: &str, value: impl Into<OptionValue>) -> Result<&mut Self> {
        let option: SearchOption = name.parse()?;
        self.set_option(option, value.into())
    }

    /// Assigns a known option.
    pub fn set_option(&mut self, option: SearchOption, value: OptionValue) -> Result<&mut Self> {
        let opts = &mut self.options;
        match (option, value) {
            (SearchOption::Filter, OptionValue::Filter(q)) => self.filter = Some(q),
            (SearchOption::Limit, OptionValue::Integer(n)) => {
                opts.limit = Some(non_negative(option, n)?)
            }
            (SearchOption::Offset, OptionValue::Integer(n)) => {
                opts.offset = Some(non_negative(option, n)?)
            }
            (SearchOption::HitsPerPage, OptionValue::Integer(n)) => {
                opts.hits_per_page = Some(non_negative(option, n)?)
            }
            (SearchOption::Page, OptionValue::Integer(n)) => {
                opts.page = Some(non_negative(option, n)?)
            }
            (SearchOption::CropLength, OptionValue::Integer(n)) => {
                opts.crop_length = Some(non_negative(option, n)?)
            }
            (SearchOption::Facets, OptionValue::TextList(v)) => opts.facets = Some(v),
            (SearchOption::AttributesToRetrieve, OptionValue::TextList(v)) => {
                opts.attributes_to_retrieve = Some(v)
            }
            (SearchOption::AttributesToCrop, OptionValue::TextList(v)) => {
                opts.attributes_to_crop = Some(v)
            }
            (SearchOption::AttributesToHighlight, OptionValue::TextList(v)) => {
                opts.attributes_to_highlight = Some(v)
            }
            (SearchOption::Sort, OptionValue::TextList(v)) => opts.sort = Some(v),
            (SearchOption::CropMarker, OptionValue::Text(s)) => opts.crop_marker = Some(s),
            (SearchOption::HighlightPreTag, OptionValue::Text(s)) => {
                opts.highlight_pre_tag = Some(s)
            }
            (SearchOption::HighlightPostTag, OptionValue::Text(s)) => {
                opts.highlight_post_tag = Some(s)
            }
            (SearchOption::ShowMatchesPosition, OptionValue::Flag(b)) => {
                opts.show_matches_position = Some(b)
            }
            (SearchOption::MatchingStrategy, OptionValue::Strategy(s)) => {
                opts.matching_strategy = Some(s)
            }
            (SearchOption::MatchingStrategy, OptionValue::Text(s)) => {
                opts.matching_strategy = Some(s.parse()?)
            }
            (option, value) => {
                return Err(DslError::InvalidValueType {
                    target: option.name().to_string(),
                    expected: option.kind().describe(),
                    actual: value.kind(),
                })
            }
        }
        Ok(self)
    }

    /// Returns `true` if the option has been assigned.
    pub fn is_set(&self, option: SearchOption) -> bool {
        let opts = &self.options;
        match option {
            SearchOption::Filter => self.filter.is_some(),
            SearchOption::Limit => opts.limit.is_some(),
            SearchOption::Offset => opts.offset.is_some(),
            SearchOption::HitsPerPage => opts.hits_per_page.is_some(),
            SearchOption::Page => opts.page.is_some(),
            SearchOption::Facets => opts.facets.is_some(),
            SearchOption::AttributesToRetrieve => opts.attributes_to_retrieve.is_some(),
            SearchOption::AttributesToCrop => opts.attributes_to_crop.is_some(),
            SearchOption::CropLength => opts.crop_length.is_some(),
            SearchOption::CropMarker => opts.crop_marker.is_some(),
            SearchOption::AttributesToHighlight => opts.attributes_to_highlight.is_some(),
            SearchOption::HighlightPreTag => opts.highlight_pre_tag.is_some(),
            SearchOption::HighlightPostTag => opts.highlight_post_tag.is_some(),
            SearchOption::ShowMatchesPosition => opts.show_matches_position.is_some(),
            SearchOption::Sort => opts.sort.is_some(),
            SearchOption::MatchingStrategy => opts.matching_strategy.is_some(),
        }
    }

    /// Renders the request, rendering the filter expression to a string.
    pub fn build(&self) -> Result<SearchRequest> {
        let filter = self.filter.as_ref().map(Q::render).transpose()?;
        let request = SearchRequest {
            index_uid: self.index_uid.clone(),
            q: self.query.clone(),
            filter,
            options: self.options.clone(),
        };
        trace!(index = %request.index_uid, q = %request.q, "built search request");
        Ok(request)
    }
}

/// Chainable builder for one multi-search request.
///
/// # Example
///
/// ```
/// use meilisearch_dsl::{IndexSearch, Q};
///
/// let search = IndexSearch::new("people", "John")
///     .filter(Q::cond("age__gt", 19))
///     .limit(2)
///     .facets(["category"])
///     .sort(["age:asc"]);
///
/// let json = search.to_json().unwrap();
/// assert_eq!(json["indexUid"], "people");
/// assert_eq!(json["filter"], "age > 19");
/// assert!(json.get("offset").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSearch {
    index_query: IndexQuery,
}

impl IndexSearch {
    pub fn new(index_uid: impl Into<String>, search: impl Into<String>) -> Self {
        IndexSearch {
            index_query: IndexQuery::new(index_uid, search),
        }
    }

    pub fn filter(mut self, filter: Q) -> Self {
        self.index_query.filter = Some(filter);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.index_query.options.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.index_query.options.offset = Some(offset);
        self
    }

    pub fn hits_per_page(mut self, hits_per_page: usize) -> Self {
        self.index_query.options.hits_per_page = Some(hits_per_page);
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.index_query.options.page = Some(page);
        self
    }

    pub fn facets<I, S>(mut self, facets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index_query.options.facets = Some(collect_strings(facets));
        self
    }

    /// Sets `attributesToRetrieve`.
    pub fn retrieve_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index_query.options.attributes_to_retrieve = Some(collect_strings(attributes));
        self
    }

    /// Sets `attributesToCrop`.
    pub fn crop_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index_query.options.attributes_to_crop = Some(collect_strings(attributes));
        self
    }

    pub fn crop_length(mut self, crop_length: usize) -> Self {
        self.index_query.options.crop_length = Some(crop_length);
        self
    }

    pub fn crop_marker(mut self, crop_marker: impl Into<String>) -> Self {
        self.index_query.options.crop_marker = Some(crop_marker.into());
        self
    }

    /// Sets `attributesToHighlight`.
    pub fn highlight_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index_query.options.attributes_to_highlight = Some(collect_strings(attributes));
        self
    }

    pub fn highlight_pre_tag(mut self, tag: impl Into<String>) -> Self {
        self.index_query.options.highlight_pre_tag = Some(tag.into());
        self
    }

    pub fn highlight_post_tag(mut self, tag: impl Into<String>) -> Self {
        self.index_query.options.highlight_post_tag = Some(tag.into());
        self
    }

    pub fn show_matches_position(mut self, show: bool) -> Self {
        self.index_query.options.show_matches_position = Some(show);
        self
    }

    /// Sort rules such as `"age:asc"`.
    pub fn sort<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index_query.options.sort = Some(collect_strings(rules));
        self
    }

    pub fn matching_strategy(mut self, strategy: MatchingStrategy) -> Self {
        self.index_query.options.matching_strategy = Some(strategy);
        self
    }

    /// Assigns an option by name. See [`IndexQuery::set`].
    pub fn set(&mut self, name: &str, value: impl Into<OptionValue>) -> Result<&mut Self> {
        self.index_query.set(name, value)?;
        Ok(self)
    }

    pub fn index_query(&self) -> &IndexQuery {
        &self.index_query
    }

    /// Renders the request.
    pub fn query(&self) -> Result<SearchRequest> {
        self.index_query.build()
    }

    /// Renders the request straight to JSON.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        self.query()?.to_json()
    }
}

impl From<IndexQuery> for IndexSearch {
    fn from(index_query: IndexQuery) -> Self {
        IndexSearch { index_query }
    }
}

fn non_negative(option: SearchOption, n: i64) -> Result<usize> {
    usize::try_from(n).map_err(|_| DslError::InvalidValueType {
        target: option.name().to_string(),
        expected: "non-negative integer",
        actual: "negative integer",
    })
}

fn collect_strings<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn option_names_and_keys() {
        for option in SearchOption::ALL {
            assert_eq!(option.name().parse::<SearchOption>().unwrap(), option);
        }
        assert_eq!(SearchOption::HitsPerPage.key(), "hitsPerPage");
        assert_eq!(SearchOption::ShowMatchesPosition.key(), "showMatchesPosition");
        assert_eq!(SearchOption::Sort.key(), "sort");
    }

    #[test]
    fn unknown_option_name() {
        assert_eq!(
            "hitsPerPage".parse::<SearchOption>(),
            Err(DslError::UnknownOption("hitsPerPage".into()))
        );
    }

    #[test]
    fn serialized_keys_match_option_keys() {
        let search = IndexSearch::new("i", "q")
            .filter(Q::cond("a", 1))
            .limit(1)
            .offset(1)
            .hits_per_page(1)
            .page(1)
            .facets(["f"])
            .retrieve_attributes(["r"])
            .crop_attributes(["c"])
            .crop_length(1)
            .crop_marker("…")
            .highlight_attributes(["h"])
            .highlight_pre_tag("<em>")
            .highlight_post_tag("</em>")
            .show_matches_position(true)
            .sort(["a:asc"])
            .matching_strategy(MatchingStrategy::All);

        let json = search.to_json().unwrap();
        let object = json.as_object().unwrap();
        for option in SearchOption::ALL {
            assert!(object.contains_key(option.key()), "missing {}", option.key());
            assert!(search.index_query().is_set(option));
        }
        assert_eq!(object.len(), SearchOption::ALL.len() + 2);
        assert_eq!(json["matchingStrategy"], "all");
    }

    #[test]
    fn unset_options_are_omitted() {
        let json = IndexSearch::new("movies", "").to_json().unwrap();
        assert_eq!(json, json!({ "indexUid": "movies", "q": "" }));
    }

    #[test]
    fn set_by_name() {
        let mut query = IndexQuery::new("movies", "alien");
        query
            .set("hits_per_page", 20usize)
            .unwrap()
            .set("highlight_pre_tag", "<b>")
            .unwrap()
            .set("attributes_to_crop", vec!["overview"])
            .unwrap()
            .set("show_matches_position", false)
            .unwrap()
            .set("matching_strategy", "frequency")
            .unwrap();

        let json = query.build().unwrap().to_json().unwrap();
        assert_eq!(
            json,
            json!({
                "indexUid": "movies",
                "q": "alien",
                "hitsPerPage": 20,
                "highlightPreTag": "<b>",
                "attributesToCrop": ["overview"],
                "showMatchesPosition": false,
                "matchingStrategy": "frequency",
            })
        );
    }

    #[test]
    fn wrong_value_shape_is_rejected() {
        let mut query = IndexQuery::new("movies", "");
        let err = query.set("limit", "ten").unwrap_err();
        assert_eq!(
            err,
            DslError::InvalidValueType {
                target: "limit".into(),
                expected: "integer",
                actual: "text",
            }
        );
        assert!(!query.is_set(SearchOption::Limit));
    }

    #[test]
    fn integer_literals_and_negative_values() {
        let mut query = IndexQuery::new("movies", "");
        query.set("limit", 5).unwrap().set("page", 2u64).unwrap();
        assert_eq!(query.options().limit, Some(5));
        assert_eq!(query.options().page, Some(2));

        let err = query.set("offset", -1).unwrap_err();
        assert_eq!(
            err,
            DslError::InvalidValueType {
                target: "offset".into(),
                expected: "non-negative integer",
                actual: "negative integer",
            }
        );
        assert!(!query.is_set(SearchOption::Offset));
    }

    #[test]
    fn matching_strategy_names() {
        for strategy in MatchingStrategy::ALL {
            assert_eq!(strategy.to_string().parse::<MatchingStrategy>(), Ok(strategy));
            assert_eq!(
                serde_json::to_value(strategy).unwrap(),
                json!(strategy.as_str())
            );
        }
    }

    #[test]
    fn bad_matching_strategy() {
        let mut query = IndexQuery::new("movies", "");
        assert_eq!(
            query.set("matching_strategy", "most").unwrap_err(),
            DslError::InvalidMatchingStrategy("most".into())
        );
        assert!(!query.is_set(SearchOption::MatchingStrategy));
    }

    #[test]
    fn filter_render_errors_surface_at_build() {
        let search = IndexSearch::new("movies", "").filter(Q::cond("year__after", 2000));
        assert!(matches!(
            search.query(),
            Err(DslError::InvalidOperator { .. })
        ));
    }

    #[test]
    fn setters_overwrite() {
        let request = IndexSearch::new("movies", "")
            .limit(5)
            .limit(10)
            .query()
            .unwrap();
        assert_eq!(request.options.limit, Some(10));
    }

    #[test]
    fn from_index_query() {
        let mut query = IndexQuery::new("movies", "x");
        query.set("page", 3usize).unwrap();
        let search = IndexSearch::from(query.clone());
        assert_eq!(search.index_query(), &query);
        assert_eq!(search.query().unwrap().options.page, Some(3));
    }
}
