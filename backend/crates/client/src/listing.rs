//! Listing Query State
//!
//! The app listing page keeps its filters in the URL query string
//! (`page`, `featured`, `category`, `sort`). Every change yields the new
//! query string for a non-navigating URL replace.

use crate::api::{AppsParams, HubClient};
use crate::config::{EnabledModules, Module};
use crate::error::ClientResult;
use crate::models::{AppListing, Pagination};
use url::form_urlencoded;

/// Apps per listing page
pub const PAGE_SIZE: u32 = 12;
/// `sort` value that switches to the boosted ranking
pub const SORT_BOOST: &str = "boost";

/// Top-level filter buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    All,
    Featured,
    Boost,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    /// Explicit page from the URL; absent means page 1
    page: Option<u32>,
    featured: bool,
    category: Option<String>,
    sort: Option<String>,
    /// Unrelated keys, kept across category and page changes
    extra: Vec<(String, String)>,
}

impl ListingQuery {
    /// Parse a query string with or without the leading `?`.
    ///
    /// Malformed or zero pages read as page 1; empty values are ignored.
    pub fn from_query_str(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let mut query = Self::default();

        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "page" => query.page = value.parse::<u32>().ok().filter(|p| *p >= 1),
                "featured" => query.featured = value == "true",
                "category" => query.category = Some(value.into_owned()).filter(|c| !c.is_empty()),
                "sort" => query.sort = Some(value.into_owned()).filter(|s| !s.is_empty()),
                _ => query.extra.push((key.into_owned(), value.into_owned())),
            }
        }
        query
    }

    /// Query string without the leading `?`
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.extra {
            serializer.append_pair(key, value);
        }
        if self.featured {
            serializer.append_pair("featured", "true");
        }
        if let Some(category) = &self.category {
            serializer.append_pair("category", category);
        }
        if let Some(sort) = &self.sort {
            serializer.append_pair("sort", sort);
        }
        if let Some(page) = self.page {
            serializer.append_pair("page", &page.to_string());
        }
        serializer.finish()
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn featured(&self) -> bool {
        self.featured
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    pub fn is_boost_sort(&self) -> bool {
        self.sort.as_deref() == Some(SORT_BOOST)
    }

    /// Select or clear a category; pagination restarts
    pub fn with_category(&self, category: Option<&str>) -> Self {
        Self {
            category: category.filter(|c| !c.is_empty()).map(str::to_string),
            page: None,
            ..self.clone()
        }
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: Some(page.max(1)),
            ..self.clone()
        }
    }

    /// Switch the top-level filter. Only the category survives.
    pub fn with_filter(&self, filter: Filter) -> Self {
        Self {
            page: None,
            featured: filter == Filter::Featured,
            category: self.category.clone(),
            sort: (filter == Filter::Boost).then(|| SORT_BOOST.to_string()),
            extra: Vec::new(),
        }
    }

    pub fn active_filter(&self) -> Filter {
        if self.featured {
            Filter::Featured
        } else if self.is_boost_sort() {
            Filter::Boost
        } else {
            Filter::All
        }
    }

    /// Listing heading, e.g. "Featured Apps" or "DeFi Apps"
    pub fn heading(&self) -> String {
        if self.featured {
            "Featured Apps".to_string()
        } else if let Some(category) = &self.category {
            format!("{category} Apps")
        } else if self.is_boost_sort() {
            "Top Boosted Apps".to_string()
        } else {
            "All Apps".to_string()
        }
    }

    /// Which backend call serves this query
    pub fn request(&self, modules: EnabledModules) -> ListingRequest {
        if self.is_boost_sort() && modules.is_enabled(Module::Boosting) {
            ListingRequest::Boosted
        } else {
            ListingRequest::Apps(AppsParams {
                page: self.page(),
                page_size: PAGE_SIZE,
                featured: self.featured,
                category: self.category.clone(),
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingRequest {
    /// Paginated, filtered listing
    Apps(AppsParams),
    /// Boosted ranking as a single page
    Boosted,
}

/// One app card
#[derive(Debug, Clone, PartialEq)]
pub struct ListingCard {
    pub app: AppListing,
    /// Present only in the boosted ranking
    pub boost_total: Option<f64>,
}

/// What the listing page renders
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage {
    pub cards: Vec<ListingCard>,
    pub pagination: Pagination,
    /// Distinct tags of the shown apps, in first-seen order
    pub categories: Vec<String>,
}

impl ListingPage {
    pub fn new(cards: Vec<ListingCard>, pagination: Pagination) -> Self {
        let mut categories: Vec<String> = Vec::new();
        for tag in cards.iter().flat_map(|card| card.app.tags.iter()) {
            if !tag.is_empty() && !categories.contains(tag) {
                categories.push(tag.clone());
            }
        }
        Self {
            cards,
            pagination,
            categories,
        }
    }

    pub fn show_pagination(&self) -> bool {
        self.pagination.pages > 1
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Fetch the page a query describes
pub async fn fetch_listing(client: &HubClient, query: &ListingQuery) -> ClientResult<ListingPage> {
    match query.request(client.modules()) {
        ListingRequest::Boosted => {
            let response = client.boosted_apps().await?;
            let count = response.apps.len();
            let cards = response
                .apps
                .into_iter()
                .map(|boosted| ListingCard {
                    app: boosted.app,
                    boost_total: Some(boosted.boost_total),
                })
                .collect();
            let pagination = Pagination {
                total: count as u64,
                page: 1,
                page_size: count as u32,
                pages: 1,
            };
            Ok(ListingPage::new(cards, pagination))
        }
        ListingRequest::Apps(params) => {
            let response = client.list_apps(&params).await?;
            let cards = response
                .apps
                .into_iter()
                .map(|app| ListingCard {
                    app,
                    boost_total: None,
                })
                .collect();
            Ok(ListingPage::new(cards, response.pagination))
        }
    }
}
