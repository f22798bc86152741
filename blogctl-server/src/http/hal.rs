//! Hypermedia envelopes
//!
//! Items carry `_links`; collections carry `_embedded.<rel>`, paging links
//! and a `page` block.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Direction, Page, PageRequest};

/// API path prefix
pub const API_BASE: &str = "/api/v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub templated: bool,
}

impl Link {
    pub fn new(href: String) -> Self {
        Self {
            href,
            templated: false,
        }
    }

    pub fn templated(href: String) -> Self {
        Self {
            href,
            templated: true,
        }
    }
}

/// Relation name to link, serialized in name order
pub type Links = BTreeMap<&'static str, Link>;

/// A single resource with its links
#[derive(Debug, Serialize)]
pub struct Resource<T> {
    #[serde(flatten)]
    pub body: T,
    #[serde(rename = "_links")]
    pub links: Links,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub size: u32,
    pub total_elements: i64,
    pub total_pages: u32,
    pub number: u32,
}

/// One page of embedded resources
#[derive(Debug, Serialize)]
pub struct Collection<T> {
    #[serde(rename = "_embedded")]
    pub embedded: BTreeMap<&'static str, Vec<Resource<T>>>,
    #[serde(rename = "_links")]
    pub links: Links,
    pub page: PageMetadata,
}

/// Builds hrefs under the configured public URL
#[derive(Debug, Clone, Default)]
pub struct LinkBuilder {
    base: String,
}

impl LinkBuilder {
    /// `public_url` may be empty (host-relative links) or an absolute origin.
    pub fn new(public_url: &str) -> Self {
        Self {
            base: format!("{}{}", public_url.trim_end_matches('/'), API_BASE),
        }
    }

    pub fn href(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn item(&self, collection: &str, rel: &'static str, id: i64) -> Links {
        let self_href = self.href(&format!("/{collection}/{id}"));
        let mut links = Links::new();
        links.insert(rel, Link::templated(format!("{self_href}{{?projection}}")));
        links.insert("self", Link::new(self_href));
        links
    }

    pub fn user(&self, id: i64) -> Links {
        let mut links = self.item("users", "user", id);
        links.insert("posts", Link::new(self.href(&format!("/users/{id}/posts"))));
        links.insert("comments", Link::new(self.href(&format!("/users/{id}/comments"))));
        links
    }

    pub fn post(&self, id: i64) -> Links {
        let mut links = self.item("posts", "post", id);
        links.insert("user", Link::new(self.href(&format!("/posts/{id}/user"))));
        links.insert("comments", Link::new(self.href(&format!("/posts/{id}/comments"))));
        links
    }

    pub fn comment(&self, id: i64) -> Links {
        let mut links = self.item("postComments", "postComment", id);
        links.insert("post", Link::new(self.href(&format!("/postComments/{id}/post"))));
        links.insert("user", Link::new(self.href(&format!("/postComments/{id}/user"))));
        links
    }

    /// Wrap a page of resources as the collection at `path`.
    pub fn collection<T>(
        &self,
        rel: &'static str,
        path: &str,
        page: Page<Resource<T>>,
        request: &PageRequest,
    ) -> Collection<T> {
        let total_pages = page.total_pages();
        let page_href = |number: u32| {
            let mut href = format!("{}?page={}&size={}", self.href(path), number, page.size);
            if let Some(sort) = &request.sort {
                let direction = match sort.direction {
                    Direction::Asc => "asc",
                    Direction::Desc => "desc",
                };
                href.push_str(&format!("&sort={},{}", sort.property, direction));
            }
            href
        };

        let mut links = Links::new();
        links.insert("self", Link::new(page_href(page.page)));
        links.insert("first", Link::new(page_href(0)));
        links.insert("last", Link::new(page_href(total_pages.saturating_sub(1))));
        if page.has_prev() {
            links.insert("prev", Link::new(page_href(page.page - 1)));
        }
        if page.has_next() {
            links.insert("next", Link::new(page_href(page.page + 1)));
        }

        let metadata = PageMetadata {
            size: page.size,
            total_elements: page.total,
            total_pages,
            number: page.page,
        };

        let mut embedded = BTreeMap::new();
        embedded.insert(rel, page.items);

        Collection {
            embedded,
            links,
            page: metadata,
        }
    }
}
