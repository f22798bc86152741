//! Pagination and sorting types
//!
//! Pages are 0-indexed, matching the `page`/`size`/`sort` query convention of
//! the collection endpoints.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Maximum items per page
pub const MAX_PAGE_SIZE: u32 = 2000;

/// Default items per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maps API property names to the SQL column they sort on.
pub type SortableColumns = &'static [(&'static str, &'static str)];

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A single sort key, e.g. `firstName,desc`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub property: String,
    pub direction: Direction,
}

impl Sort {
    /// Parse `property[,asc|desc]`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let mut parts = raw.split(',').map(str::trim);
        let property = parts.next().unwrap_or_default();

        if property.is_empty() {
            return Err(ValidationError::Empty { field: "sort" });
        }

        let direction = match parts.next() {
            None | Some("") => Direction::Asc,
            Some(dir) if dir.eq_ignore_ascii_case("asc") => Direction::Asc,
            Some(dir) if dir.eq_ignore_ascii_case("desc") => Direction::Desc,
            Some(other) => {
                return Err(ValidationError::InvalidVariant {
                    field: "sort direction",
                    value: other.to_owned(),
                })
            }
        };

        Ok(Self {
            property: property.to_owned(),
            direction,
        })
    }
}

/// Pagination request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number (0-indexed)
    pub page: u32,
    /// Items per page (1..=2000)
    pub size: u32,
    pub sort: Option<Sort>,
}

impl PageRequest {
    /// Create a page request. A zero size means the default size; larger
    /// sizes are capped at 2000.
    pub fn new(page: u32, size: u32) -> Self {
        let size = if size == 0 { DEFAULT_PAGE_SIZE } else { size.min(MAX_PAGE_SIZE) };
        Self {
            page,
            size,
            sort: None,
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Build a request from query parameters, rejecting sort properties the
    /// resource does not expose.
    pub fn from_params(
        params: PageParams,
        sortable: SortableColumns,
    ) -> Result<Self, ValidationError> {
        let mut request = Self::new(
            params.page.unwrap_or(0),
            params.size.unwrap_or(DEFAULT_PAGE_SIZE),
        );

        if let Some(raw) = params.sort.as_deref() {
            let sort = Sort::parse(raw)?;
            if !sortable.iter().any(|(property, _)| *property == sort.property) {
                return Err(ValidationError::InvalidVariant {
                    field: "sort property",
                    value: sort.property,
                });
            }
            request = request.with_sort(sort);
        }

        Ok(request)
    }

    /// SQL OFFSET value.
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    /// SQL LIMIT value.
    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    /// ORDER BY clause body. Unknown properties fall back to id order; `id`
    /// is always appended so pages are stable.
    pub fn order_by(&self, sortable: SortableColumns) -> String {
        let column = self.sort.as_ref().and_then(|sort| {
            sortable
                .iter()
                .find(|(property, _)| *property == sort.property)
                .map(|(_, column)| (*column, sort.direction))
        });

        match column {
            Some(("id", direction)) => format!("id {}", direction.as_sql()),
            Some((column, direction)) => format!("{} {}, id ASC", column, direction.as_sql()),
            None => "id ASC".to_owned(),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Items for current page
    pub items: Vec<T>,
    /// Total count across all pages
    pub total: i64,
    /// Current page number (0-indexed)
    pub page: u32,
    /// Requested page size
    pub size: u32,
}

impl<T> Page<T> {
    /// Total number of pages; zero when there are no elements.
    pub fn total_pages(&self) -> u32 {
        let size = i64::from(self.size.max(1));
        let pages = (self.total.max(0) + size - 1) / size;
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            size: self.size,
        }
    }
}

/// Query parameters for pagination
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
}
