//! Filtered, paginated views over the scraped job-listing dataset.

pub mod domain;
pub mod filter;
pub mod repository;
pub mod router;

pub use domain::JobListing;
pub use filter::{
    AppliedFilters, FilterQuery, ListingFilterEngine, ListingPage, ListingParams, PageMeta,
};
pub use repository::{
    FileListingRepository, InMemoryListingRepository, ListingRepository, RepositoryError,
};
pub use router::{listings_router, ListingsState};
