//! Query catalog: typed request kinds rendered into GraphQL documents.
//!
//! Every request the client can make is one [`QueryRequest`] variant. Rendering
//! is pure string formatting; parameter values are not validated.
//!
//! # Example
//!
//! ```
//! use katunog_core::query::{Pagination, QueryRequest};
//!
//! let request = QueryRequest::ListLocations(Pagination::new(2, 25));
//! assert!(request.to_graphql().contains("instruments(page: 2, limit: 25)"));
//! ```

mod templates;

use std::fmt;

/// Catalog filter used when a listing does not specify one.
pub const DEFAULT_FILTER: &str = "katunog";

/// Page number used when a listing does not specify one.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when a listing does not specify one.
pub const DEFAULT_LIMIT: u32 = 10;

/// Page selection for paginated listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pagination {
    /// 1-based page number.
    pub page: u32,
    /// Objects per page.
    pub limit: u32,
}

impl Pagination {
    /// Creates a page selection.
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

/// Logical request kinds, without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    ListInstruments,
    ListLocations,
    ListDescriptions,
    ListMediaFiles,
    GetInstrumentById,
    ListRegions,
    ListProvinces,
}

impl QueryKind {
    /// Stable identifier used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ListInstruments => "list_instruments",
            Self::ListLocations => "list_locations",
            Self::ListDescriptions => "list_descriptions",
            Self::ListMediaFiles => "list_media_files",
            Self::GetInstrumentById => "get_instrument_by_id",
            Self::ListRegions => "list_regions",
            Self::ListProvinces => "list_provinces",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request kind together with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryRequest {
    /// Full instrument records: location, taxonomy, descriptions and file manifest.
    ListInstruments {
        /// Page selection.
        pagination: Pagination,
        /// Catalog filter string.
        filter: String,
    },
    /// Instrument id with its province / region / island hierarchy.
    ListLocations(Pagination),
    /// Instrument id with English and Filipino descriptions.
    ListDescriptions(Pagination),
    /// Instrument id, display name and file manifest.
    ListMediaFiles(Pagination),
    /// One instrument's control number, names and file manifest.
    GetInstrumentById {
        /// Opaque service identifier.
        id: String,
    },
    /// Region to island hierarchy, unpaginated.
    ListRegions,
    /// Province id and name list, unpaginated.
    ListProvinces,
}

impl QueryRequest {
    /// Full instrument listing with the default filter.
    #[must_use]
    pub fn list_instruments(pagination: Pagination) -> Self {
        Self::ListInstruments {
            pagination,
            filter: DEFAULT_FILTER.to_string(),
        }
    }

    /// Single instrument lookup.
    #[must_use]
    pub fn instrument_by_id(id: impl Into<String>) -> Self {
        Self::GetInstrumentById { id: id.into() }
    }

    /// The parameterless kind of this request.
    #[must_use]
    pub fn kind(&self) -> QueryKind {
        match self {
            Self::ListInstruments { .. } => QueryKind::ListInstruments,
            Self::ListLocations(_) => QueryKind::ListLocations,
            Self::ListDescriptions(_) => QueryKind::ListDescriptions,
            Self::ListMediaFiles(_) => QueryKind::ListMediaFiles,
            Self::GetInstrumentById { .. } => QueryKind::GetInstrumentById,
            Self::ListRegions => QueryKind::ListRegions,
            Self::ListProvinces => QueryKind::ListProvinces,
        }
    }

    /// Renders the GraphQL document for this request.
    #[must_use]
    pub fn to_graphql(&self) -> String {
        match self {
            Self::ListInstruments { pagination, filter } => {
                templates::list_instruments(pagination.page, pagination.limit, filter)
            }
            Self::ListLocations(p) => templates::list_locations(p.page, p.limit),
            Self::ListDescriptions(p) => templates::list_descriptions(p.page, p.limit),
            Self::ListMediaFiles(p) => templates::list_media_files(p.page, p.limit),
            Self::GetInstrumentById { id } => templates::instrument_by_id(id),
            Self::ListRegions => templates::LIST_REGIONS.to_string(),
            Self::ListProvinces => templates::LIST_PROVINCES.to_string(),
        }
    }
}

/// Collapses runs of whitespace so documents can be compared structurally.
#[must_use]
pub fn normalize_whitespace(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}
