//! Company profile and feed post records.
//!
//! Every field is an opaque display string exactly as the page rendered it
//! (`"1,234"`, `"2d"`, `"50,000 followers"`). Nothing is coerced to numbers
//! here; a field the page did not provide is the empty string, never absent.

use serde::{Deserialize, Serialize};

/// A single feed post as rendered on the company page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Name of the organization that published the post.
    pub organization: String,
    /// Follower line shown next to the author at post time.
    pub followers: String,
    /// Relative or absolute publish time (e.g. `"2d"`, `"1w"`).
    pub date: String,
    /// Body text, after any "See more" expansion.
    pub text: String,
    /// Reaction count, or `"No likes info"` when the page shows none.
    pub likes: String,
    /// Comment count, or `"No comments info"` when the page shows none.
    pub comments_count: String,
    /// Permalink to the post.
    pub link: String,
}

/// Organization attributes plus the posts loaded from its feed.
///
/// A profile is created once per target by the session worker that scrapes
/// it, filled in place by the profile extractor and the feed loader, and
/// returned by value. It is never shared between workers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// The page this profile was scraped from.
    pub source_url: String,
    pub name: String,
    pub industry: String,
    pub location: String,
    pub followers: String,
    pub description: String,
    pub total_employees: String,
    pub job_opportunities_link: String,
    pub follow_link: String,
    pub about_us: String,
    pub website: String,
    pub company_size: String,
    pub headquarters: String,
    pub company_type: String,
    pub founded_year: String,
    pub specialties: String,
    /// Posts in feed order.
    pub posts: Vec<Post>,
}

impl CompanyProfile {
    /// Empty profile bound to the page it will be scraped from.
    #[must_use]
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            ..Self::default()
        }
    }

    /// Attaches the feed posts, replacing any previously attached sequence.
    #[must_use]
    pub fn with_posts(mut self, posts: Vec<Post>) -> Self {
        self.posts = posts;
        self
    }

    /// `true` when none of the scalar fields were populated.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        [
            &self.name,
            &self.industry,
            &self.location,
            &self.followers,
            &self.description,
            &self.total_employees,
            &self.job_opportunities_link,
            &self.follow_link,
            &self.about_us,
            &self.website,
            &self.company_size,
            &self.headquarters,
            &self.company_type,
            &self.founded_year,
            &self.specialties,
        ]
        .iter()
        .all(|field| field.is_empty())
    }
}
