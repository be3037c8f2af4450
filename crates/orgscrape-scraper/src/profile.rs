//! Company attribute extraction from the top-card and core-details regions.

use std::time::Duration;

use orgscrape_core::CompanyProfile;

use crate::error::{ScraperError, SessionError};
use crate::field::read_field;
use crate::parse::{employee_count, split_location_followers};
use crate::selectors::{core_details, top_card};
use crate::session::{Element, PageSession};

/// Fills the fifteen scalar fields of `profile` from the loaded page.
///
/// Individual field misses leave that field empty. If the top card never
/// appears the whole profile is left as passed in; if only the core-details
/// region is missing, the top-card fields are kept and the rest stay empty.
/// Both cases are logged and are not errors.
///
/// # Errors
///
/// Returns [`ScraperError::Session`] only when the session itself is gone
/// (see [`SessionError::is_fatal`]).
pub async fn extract_profile(
    page: &dyn PageSession,
    mut profile: CompanyProfile,
    target: &str,
    region_wait: Duration,
) -> Result<CompanyProfile, ScraperError> {
    tracing::debug!(target, "extracting top card");
    let Some(top) = wait_for_region(page, top_card::REGION, target, region_wait).await? else {
        return Ok(profile);
    };
    read_top_card(top.as_ref(), &mut profile).await;

    tracing::debug!(target, "extracting core details");
    let Some(core) = wait_for_region(page, core_details::REGION, target, region_wait).await?
    else {
        return Ok(profile);
    };
    read_core_details(core.as_ref(), &mut profile).await;

    Ok(profile)
}

/// `Ok(None)` when the region did not show up in time.
async fn wait_for_region(
    page: &dyn PageSession,
    selector: &'static str,
    target: &str,
    timeout: Duration,
) -> Result<Option<Box<dyn Element>>, ScraperError> {
    match page.wait_for(selector, timeout).await {
        Ok(region) => Ok(Some(region)),
        Err(source) if source.is_fatal() => Err(ScraperError::Session {
            target: target.to_string(),
            stage: "profile extraction",
            source,
        }),
        Err(error) => {
            log_region_miss(target, selector, &error);
            Ok(None)
        }
    }
}

fn log_region_miss(target: &str, selector: &str, error: &SessionError) {
    tracing::warn!(
        target,
        region = selector,
        error = %error,
        "region not available, leaving its fields empty"
    );
}

async fn read_top_card(top: &dyn Element, profile: &mut CompanyProfile) {
    profile.name = read_field(top, top_card::NAME).await.or_empty();
    profile.industry = read_field(top, top_card::HEADLINE).await.or_empty();
    profile.description = read_field(top, top_card::DESCRIPTION).await.or_empty();
    profile.job_opportunities_link = read_field(top, top_card::JOBS_LINK).await.or_empty();
    profile.follow_link = read_field(top, top_card::FOLLOW_LINK).await.or_empty();

    let location_followers = read_field(top, top_card::LOCATION_FOLLOWERS)
        .await
        .or_empty();
    (profile.location, profile.followers) = split_location_followers(&location_followers);

    let employees = read_field(top, top_card::EMPLOYEES).await.or_empty();
    profile.total_employees = employee_count(&employees);
}

async fn read_core_details(core: &dyn Element, profile: &mut CompanyProfile) {
    profile.about_us = read_field(core, core_details::ABOUT_US).await.or_empty();
    profile.website = read_field(core, core_details::WEBSITE).await.or_empty();
    // The labelled industry is more specific than the top-card headline.
    profile.industry = read_field(core, core_details::INDUSTRY).await.or_empty();
    profile.company_size = read_field(core, core_details::COMPANY_SIZE).await.or_empty();
    profile.headquarters = read_field(core, core_details::HEADQUARTERS).await.or_empty();
    profile.company_type = read_field(core, core_details::COMPANY_TYPE).await.or_empty();
    profile.founded_year = read_field(core, core_details::FOUNDED).await.or_empty();
    profile.specialties = read_field(core, core_details::SPECIALTIES).await.or_empty();
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
