//! Row-oriented flattening of scraped profiles for tabular export.
//!
//! Each post becomes one row with the company columns repeated. A profile
//! with no posts still yields a single row so the company is not lost from
//! the export.

use serde::Serialize;

use crate::profile::{CompanyProfile, Post};

/// One exported row: company columns followed by post columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileRow {
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
    pub post_organization: String,
    pub post_followers: String,
    pub post_time: String,
    pub post_text: String,
    pub post_likes: String,
    pub post_comments: String,
    pub post_link: String,
}

impl ProfileRow {
    fn company(profile: &CompanyProfile) -> Self {
        Self {
            source_url: profile.source_url.clone(),
            name: profile.name.clone(),
            industry: profile.industry.clone(),
            location: profile.location.clone(),
            followers: profile.followers.clone(),
            description: profile.description.clone(),
            total_employees: profile.total_employees.clone(),
            job_opportunities_link: profile.job_opportunities_link.clone(),
            follow_link: profile.follow_link.clone(),
            about_us: profile.about_us.clone(),
            website: profile.website.clone(),
            company_size: profile.company_size.clone(),
            headquarters: profile.headquarters.clone(),
            company_type: profile.company_type.clone(),
            founded_year: profile.founded_year.clone(),
            specialties: profile.specialties.clone(),
            ..Self::default()
        }
    }

    fn with_post(mut self, post: &Post) -> Self {
        self.post_organization.clone_from(&post.organization);
        self.post_followers.clone_from(&post.followers);
        self.post_time.clone_from(&post.date);
        self.post_text.clone_from(&post.text);
        self.post_likes.clone_from(&post.likes);
        self.post_comments.clone_from(&post.comments_count);
        self.post_link.clone_from(&post.link);
        self
    }
}

/// Flattens profiles into rows, preserving profile order and feed order.
#[must_use]
pub fn flatten_profiles(profiles: &[CompanyProfile]) -> Vec<ProfileRow> {
    let mut rows = Vec::new();
    for profile in profiles {
        let company = ProfileRow::company(profile);
        if profile.posts.is_empty() {
            rows.push(company);
            continue;
        }
        rows.extend(
            profile
                .posts
                .iter()
                .map(|post| company.clone().with_post(post)),
        );
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(text: &str) -> Post {
        Post {
            organization: "Acme".to_string(),
            text: text.to_string(),
            likes: "12".to_string(),
            ..Post::default()
        }
    }

    #[test]
    fn one_row_per_post_with_company_columns_repeated() {
        let mut profile = CompanyProfile::new("https://example.com/company/acme");
        profile.name = "Acme".to_string();
        profile.posts = vec![post("hello"), post("world")];

        let rows = flatten_profiles(&[profile]);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.name == "Acme"));
        assert_eq!(rows[0].post_text, "hello");
        assert_eq!(rows[1].post_text, "world");
        assert_eq!(rows[1].post_likes, "12");
    }

    #[test]
    fn profile_without_posts_yields_single_company_row() {
        let mut profile = CompanyProfile::new("u");
        profile.name = "Quiet Co".to_string();

        let rows = flatten_profiles(&[profile]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Quiet Co");
        assert_eq!(rows[0].post_text, "");
    }

    #[test]
    fn every_column_is_snake_case() {
        let mut profile = CompanyProfile::new("u");
        profile.posts = vec![post("body")];
        let value = serde_json::to_value(&flatten_profiles(&[profile])[0]).unwrap();
        assert_eq!(value["post_text"], "body");
        assert_eq!(value["post_organization"], "Acme");
        assert_eq!(value["name"], "");

        let columns = value.as_object().unwrap();
        assert_eq!(columns.len(), 23);
        for column in columns.keys() {
            assert!(
                column
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c == '_'),
                "column `{column}` is not snake_case"
            );
        }
    }

    #[test]
    fn no_profiles_no_rows() {
        assert!(flatten_profiles(&[]).is_empty());
    }
}
