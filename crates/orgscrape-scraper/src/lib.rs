pub mod chromium;
pub mod error;
pub mod feed;
pub mod field;
pub mod orchestrator;
pub mod parse;
pub mod popup;
pub mod profile;
pub mod selectors;
pub mod session;
pub mod settings;
pub mod worker;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use chromium::{ChromiumConfig, ChromiumProvider};
pub use error::{ScraperError, SessionError};
pub use feed::{load_posts, FeedRequest};
pub use field::{read_field, Field, FieldLocator, FieldMiss};
pub use orchestrator::Orchestrator;
pub use parse::{employee_count, split_location_followers};
pub use popup::dismiss_overlay;
pub use profile::extract_profile;
pub use session::{Element, PageSession, SessionProvider};
pub use settings::{ScrapeSettings, DEFAULT_POST_TARGET, MAX_SCROLL_ATTEMPTS};
pub use worker::run_worker;
