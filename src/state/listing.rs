//! Local filtering and ordering of fetched posts for the browse view.

use crate::net::types::{Category, Post};

/// Ordering for the browse view; both keys put the largest value first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Date,
    Award,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "award" | "incentive" => Ok(Self::Award),
            other => Err(format!("unknown sort key `{other}` (expected date or award)")),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListingFilter {
    /// Case-insensitive substring of the pet name; empty matches all.
    pub search: String,
    pub category: Option<Category>,
    /// Case-insensitive exact pet type, e.g. `dog`.
    pub pet_type: Option<String>,
    pub sort: SortKey,
}

impl ListingFilter {
    #[must_use]
    pub fn matches(&self, post: &Post) -> bool {
        let needle = self.search.to_lowercase();
        post.pet_name.to_lowercase().contains(&needle)
            && self.category.map_or(true, |c| post.category == c)
            && self.pet_type.as_deref().map_or(true, |t| post.pet_type.eq_ignore_ascii_case(t))
    }

    /// Filtered, sorted copy of `posts`. Ties keep their fetched order.
    #[must_use]
    pub fn apply(&self, posts: &[Post]) -> Vec<Post> {
        let mut out: Vec<Post> = posts.iter().filter(|p| self.matches(p)).cloned().collect();
        match self.sort {
            SortKey::Date => out.sort_by(|a, b| b.date.cmp(&a.date)),
            SortKey::Award => out.sort_by(|a, b| b.award_amount.cmp(&a.award_amount)),
        }
        out
    }
}

#[cfg(test)]
#[path = "listing_test.rs"]
mod tests;
