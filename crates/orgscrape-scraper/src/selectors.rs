//! CSS locators for the public company page layout.

use crate::field::FieldLocator;

/// Modal shown to signed-out visitors on first load.
pub const OVERLAY_DISMISS: &str = ".modal__dismiss";

pub mod top_card {
    use super::FieldLocator;

    pub const REGION: &str = ".top-card-layout__card";

    pub const NAME: FieldLocator = FieldLocator::text(".top-card-layout__title");
    pub const HEADLINE: FieldLocator = FieldLocator::text(".top-card-layout__headline");
    /// `"<location> <followers> followers"` on one line.
    pub const LOCATION_FOLLOWERS: FieldLocator =
        FieldLocator::text(".top-card-layout__first-subline");
    pub const DESCRIPTION: FieldLocator = FieldLocator::text(".top-card-layout__second-subline");
    pub const JOBS_LINK: FieldLocator =
        FieldLocator::attribute("a.top-card-layout__cta--primary", "href");
    pub const FOLLOW_LINK: FieldLocator =
        FieldLocator::attribute("a.top-card-layout__cta--secondary", "href");
    /// `"View all 1,234 employees"`.
    pub const EMPLOYEES: FieldLocator = FieldLocator::text("p.face-pile__text");
}

pub mod core_details {
    use super::FieldLocator;

    pub const REGION: &str = ".core-section-container__content";

    pub const ABOUT_US: FieldLocator =
        FieldLocator::text("p[data-test-id='about-us__description']");
    pub const WEBSITE: FieldLocator =
        FieldLocator::attribute("div[data-test-id='about-us__website'] a", "href");
    pub const INDUSTRY: FieldLocator =
        FieldLocator::text("div[data-test-id='about-us__industry'] dd");
    pub const COMPANY_SIZE: FieldLocator =
        FieldLocator::text("div[data-test-id='about-us__size'] dd");
    pub const HEADQUARTERS: FieldLocator =
        FieldLocator::text("div[data-test-id='about-us__headquarters'] dd");
    pub const COMPANY_TYPE: FieldLocator =
        FieldLocator::text("div[data-test-id='about-us__organizationType'] dd");
    pub const FOUNDED: FieldLocator =
        FieldLocator::text("div[data-test-id='about-us__foundedOn'] dd");
    pub const SPECIALTIES: FieldLocator =
        FieldLocator::text("div[data-test-id='about-us__specialties'] dd");
}

pub mod feed {
    use super::FieldLocator;

    pub const ITEMS: &str = "ul.updates__list > li";

    pub const LINK: FieldLocator =
        FieldLocator::attribute("a.main-feed-card__overlay-link", "href");
    pub const ORGANIZATION: FieldLocator = FieldLocator::text("a.text-sm");
    pub const FOLLOWERS: FieldLocator = FieldLocator::text("p.text-color-text-low-emphasis");
    pub const TIME: FieldLocator = FieldLocator::text("time");
    pub const BODY: FieldLocator = FieldLocator::text("p.attributed-text-segment-list__content");
    pub const LIKES: FieldLocator =
        FieldLocator::text("span[data-test-id='social-actions__reaction-count']");
    pub const COMMENTS: FieldLocator =
        FieldLocator::text("a[data-test-id='social-actions__comments']");

    /// Buttons are matched by label since the expander has no stable class.
    pub const EXPANDER_BUTTON: &str = "button";
    pub const EXPANDER_LABEL: &str = "See more";

    pub const NO_LIKES: &str = "No likes info";
    pub const NO_COMMENTS: &str = "No comments info";
}
