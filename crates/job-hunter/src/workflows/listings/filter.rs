use serde::Serialize;

use super::domain::JobListing;

pub const DEFAULT_LIMIT: usize = 50;
pub const DEFAULT_SKIP: usize = 0;

/// Tags that mark a listing as suitable for entry-level candidates.
pub const ENTRY_LEVEL_TAGS: [&str; 3] = ["entry-level", "junior", "fresher"];

/// Query string exactly as received; every field is optional and untyped.
#[derive(Debug, Clone, Default)]
pub struct ListingParams {
    pub role: Option<String>,
    pub remote: Option<String>,
    pub entry_level: Option<String>,
    pub limit: Option<String>,
    pub skip: Option<String>,
}

impl ListingParams {
    /// Collects raw query pairs. A repeated key keeps its first value; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "role" => &mut params.role,
                "remote" => &mut params.remote,
                "entry_level" => &mut params.entry_level,
                "limit" => &mut params.limit,
                "skip" => &mut params.skip,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }
}

/// Parsed listing query. `limit`/`skip` always carry a value.
///
/// A present but empty flag still filters (as `false`) while echoing `null`, so the
/// echo is kept apart from the predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery {
    pub role: Option<String>,
    pub remote: Option<bool>,
    pub entry_level: Option<bool>,
    pub limit: usize,
    pub skip: usize,
    filters: AppliedFilters,
}

impl Default for FilterQuery {
    fn default() -> Self {
        Self {
            role: None,
            remote: None,
            entry_level: None,
            limit: DEFAULT_LIMIT,
            skip: DEFAULT_SKIP,
            filters: AppliedFilters::default(),
        }
    }
}

impl FilterQuery {
    pub fn from_params(params: &ListingParams) -> Self {
        let role = params
            .role
            .as_deref()
            .filter(|role| !role.is_empty())
            .map(str::to_string);

        Self {
            filters: AppliedFilters {
                role: role.clone(),
                remote: echo_flag(params.remote.as_deref()),
                entry_level: echo_flag(params.entry_level.as_deref()),
            },
            role,
            remote: params.remote.as_deref().map(parse_flag),
            entry_level: params.entry_level.as_deref().map(parse_flag),
            limit: parse_count(params.limit.as_deref(), DEFAULT_LIMIT),
            skip: parse_count(params.skip.as_deref(), DEFAULT_SKIP),
        }
    }

    pub fn echo(&self) -> AppliedFilters {
        self.filters.clone()
    }
}

fn parse_flag(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

fn echo_flag(raw: Option<&str>) -> Option<bool> {
    raw.filter(|value| !value.is_empty()).map(parse_flag)
}

/// Absent or non-integer values fall back to `default`; negatives clamp to zero.
fn parse_count(raw: Option<&str>, default: usize) -> usize {
    match raw.map(|value| value.trim().parse::<i64>()) {
        Some(Ok(value)) if value < 0 => 0,
        Some(Ok(value)) => usize::try_from(value).unwrap_or(usize::MAX),
        _ => default,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppliedFilters {
    pub role: Option<String>,
    pub remote: Option<bool>,
    pub entry_level: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub total: usize,
    pub returned: usize,
    pub limit: usize,
    pub skip: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage {
    pub listings: Vec<JobListing>,
    pub meta: PageMeta,
}

/// Conjunctive role/remote/entry-level predicates followed by offset pagination.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingFilterEngine;

impl ListingFilterEngine {
    pub fn apply(&self, listings: &[JobListing], query: &FilterQuery) -> ListingPage {
        let role = query.role.as_deref().map(str::to_lowercase);

        let matched: Vec<&JobListing> = listings
            .iter()
            .filter(|listing| role.as_deref().map_or(true, |role| matches_role(listing, role)))
            .filter(|listing| query.remote.map_or(true, |remote| listing.is_remote == remote))
            // The flag's value is not consulted: `entry_level=false` narrows exactly like `true`.
            .filter(|listing| query.entry_level.is_none() || is_entry_level(listing))
            .collect();

        let total = matched.len();
        let page: Vec<JobListing> = matched
            .into_iter()
            .skip(query.skip)
            .take(query.limit)
            .cloned()
            .collect();

        ListingPage {
            meta: PageMeta {
                total,
                returned: page.len(),
                limit: query.limit,
                skip: query.skip,
            },
            listings: page,
        }
    }
}

fn matches_role(listing: &JobListing, role: &str) -> bool {
    listing.title.to_lowercase().contains(role)
        || listing.description.to_lowercase().contains(role)
        || listing
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(role))
}

fn is_entry_level(listing: &JobListing) -> bool {
    ENTRY_LEVEL_TAGS.iter().any(|tag| listing.has_tag(tag))
}
