//! Scripted in-memory page sessions for tests.
//!
//! Selectors are matched literally: a [`FakeNode`] answers `find("h1")` with
//! the first child registered under exactly `"h1"`. That is enough to drive
//! the extractors without a browser while still exercising every failure
//! path (missing elements, stale handles, region timeouts, lost sessions,
//! scroll failures, panics).

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::SessionError;
use crate::selectors::{core_details, feed, top_card, OVERLAY_DISMISS};
use crate::session::{Element, PageSession, SessionProvider};

/// Shared on/off state flipped by clicking one node and read by another.
#[derive(Debug, Clone, Default)]
pub struct Toggle(Arc<AtomicBool>);

impl Toggle {
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// An element in a scripted document.
#[derive(Debug, Clone, Default)]
pub struct FakeNode {
    text: String,
    attributes: HashMap<String, String>,
    children: Vec<(String, FakeNode)>,
    invalid_selectors: HashSet<String>,
    stale: bool,
    reveal: Option<(Toggle, String)>,
    toggles: Option<Toggle>,
    clicks: Arc<AtomicUsize>,
}

impl FakeNode {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn child(mut self, selector: &str, node: FakeNode) -> Self {
        self.children.push((selector.to_string(), node));
        self
    }

    /// Every read on this node fails as if it was detached from the document.
    #[must_use]
    pub fn stale(mut self) -> Self {
        self.stale = true;
        self
    }

    /// Lookups with `selector` fail as syntactically invalid.
    #[must_use]
    pub fn invalid_selector(mut self, selector: &str) -> Self {
        self.invalid_selectors.insert(selector.to_string());
        self
    }

    /// Text switches to `expanded` once `toggle` is on.
    #[must_use]
    pub fn reveals(mut self, toggle: &Toggle, expanded: &str) -> Self {
        self.reveal = Some((toggle.clone(), expanded.to_string()));
        self
    }

    /// Clicking this node turns `toggle` on.
    #[must_use]
    pub fn toggles(mut self, toggle: &Toggle) -> Self {
        self.toggles = Some(toggle.clone());
        self
    }

    /// Number of times this node (or any clone of it) was clicked.
    #[must_use]
    pub fn clicks(&self) -> usize {
        self.clicks.load(Ordering::SeqCst)
    }

    fn check_selector(&self, selector: &str) -> Result<(), SessionError> {
        if self.invalid_selectors.contains(selector) {
            return Err(SessionError::InvalidSelector {
                selector: selector.to_string(),
                reason: "unexpected end of input".to_string(),
            });
        }
        if self.stale {
            return Err(SessionError::Stale);
        }
        Ok(())
    }
}

#[async_trait]
impl Element for FakeNode {
    async fn find(&self, selector: &str) -> Result<Box<dyn Element>, SessionError> {
        self.check_selector(selector)?;
        self.children
            .iter()
            .find(|(s, _)| s == selector)
            .map(|(_, node)| Box::new(node.clone()) as Box<dyn Element>)
            .ok_or_else(|| SessionError::NotFound {
                selector: selector.to_string(),
            })
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<Box<dyn Element>>, SessionError> {
        self.check_selector(selector)?;
        Ok(self
            .children
            .iter()
            .filter(|(s, _)| s == selector)
            .map(|(_, node)| Box::new(node.clone()) as Box<dyn Element>)
            .collect())
    }

    async fn text(&self) -> Result<String, SessionError> {
        if self.stale {
            return Err(SessionError::Stale);
        }
        match &self.reveal {
            Some((toggle, expanded)) if toggle.is_on() => Ok(expanded.clone()),
            _ => Ok(self.text.clone()),
        }
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, SessionError> {
        if self.stale {
            return Err(SessionError::Stale);
        }
        Ok(self.attributes.get(name).cloned())
    }

    async fn click(&self) -> Result<(), SessionError> {
        if self.stale {
            return Err(SessionError::Stale);
        }
        self.clicks.fetch_add(1, Ordering::SeqCst);
        if let Some(toggle) = &self.toggles {
            toggle.0.store(true, Ordering::SeqCst);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum Region {
    Present(FakeNode),
    Lost,
}

/// Observable state of one opened session.
#[derive(Debug, Default)]
pub struct PageState {
    scrolls: AtomicU32,
    closed: AtomicBool,
    navigated_to: Mutex<Option<String>>,
}

impl PageState {
    #[must_use]
    pub fn scrolls(&self) -> u32 {
        self.scrolls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn navigated_to(&self) -> Option<String> {
        self.navigated_to
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// A scripted page. Cloning yields an independent session over the same
/// document with fresh [`PageState`].
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    regions: HashMap<String, Region>,
    feed: Vec<FakeNode>,
    growth: Vec<usize>,
    fail_navigation: bool,
    fail_scroll: bool,
    panic_on_scroll: bool,
    scroll_delay: Option<Duration>,
    state: Arc<PageState>,
}

impl FakePage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn region(mut self, selector: &str, node: FakeNode) -> Self {
        self.regions
            .insert(selector.to_string(), Region::Present(node));
        self
    }

    /// Waiting for `selector` reports a lost browser connection.
    #[must_use]
    pub fn lost_region(mut self, selector: &str) -> Self {
        self.regions.insert(selector.to_string(), Region::Lost);
        self
    }

    #[must_use]
    pub fn without_region(mut self, selector: &str) -> Self {
        self.regions.remove(selector);
        self
    }

    /// All feed items the page could ever show, in DOM order.
    #[must_use]
    pub fn feed(mut self, items: Vec<FakeNode>) -> Self {
        self.feed = items;
        self
    }

    /// Visible item count after `n` scrolls is `growth[min(n, len - 1)]`.
    /// With no schedule every item is visible from the start.
    #[must_use]
    pub fn growth(mut self, schedule: Vec<usize>) -> Self {
        self.growth = schedule;
        self
    }

    #[must_use]
    pub fn failing_navigation(mut self) -> Self {
        self.fail_navigation = true;
        self
    }

    #[must_use]
    pub fn failing_scroll(mut self) -> Self {
        self.fail_scroll = true;
        self
    }

    #[must_use]
    pub fn panicking_scroll(mut self) -> Self {
        self.panic_on_scroll = true;
        self
    }

    /// Every scroll blocks for `delay` before returning.
    #[must_use]
    pub fn slow_scroll(mut self, delay: Duration) -> Self {
        self.scroll_delay = Some(delay);
        self
    }

    #[must_use]
    pub fn state(&self) -> Arc<PageState> {
        Arc::clone(&self.state)
    }

    fn fresh_session(&self) -> Self {
        Self {
            state: Arc::new(PageState::default()),
            ..self.clone()
        }
    }

    fn visible_items(&self) -> usize {
        let visible = match self.growth.as_slice() {
            [] => self.feed.len(),
            schedule => {
                let step = usize::try_from(self.state.scrolls()).unwrap_or(usize::MAX);
                schedule[step.min(schedule.len() - 1)]
            }
        };
        visible.min(self.feed.len())
    }
}

#[async_trait]
impl PageSession for FakePage {
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        if self.fail_navigation {
            return Err(SessionError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        }
        *self
            .state
            .navigated_to
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(url.to_string());
        Ok(())
    }

    async fn wait_for(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Box<dyn Element>, SessionError> {
        match self.regions.get(selector) {
            Some(Region::Present(node)) => Ok(Box::new(node.clone())),
            Some(Region::Lost) => Err(SessionError::Disconnected(
                "websocket closed".to_string(),
            )),
            None => Err(SessionError::Timeout {
                selector: selector.to_string(),
                timeout,
            }),
        }
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<Box<dyn Element>>, SessionError> {
        if selector == feed::ITEMS {
            return Ok(self.feed[..self.visible_items()]
                .iter()
                .map(|node| Box::new(node.clone()) as Box<dyn Element>)
                .collect());
        }
        Ok(match self.regions.get(selector) {
            Some(Region::Present(node)) => vec![Box::new(node.clone()) as Box<dyn Element>],
            _ => Vec::new(),
        })
    }

    async fn scroll_to_bottom(&self) -> Result<(), SessionError> {
        if let Some(delay) = self.scroll_delay {
            tokio::time::sleep(delay).await;
        }
        assert!(!self.panic_on_scroll, "scripted scroll panic");
        if self.fail_scroll {
            return Err(SessionError::Script("window is not defined".to_string()));
        }
        self.state.scrolls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), SessionError> {
        self.state.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Serves [`FakePage`]s by target and records every session it opened.
#[derive(Debug, Clone, Default)]
pub struct FakeProvider {
    pages: HashMap<String, FakePage>,
    failing_open: HashSet<String>,
    opened: Arc<Mutex<Vec<(String, Arc<PageState>)>>>,
}

impl FakeProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn page(mut self, target: &str, page: FakePage) -> Self {
        self.pages.insert(target.to_string(), page);
        self
    }

    /// Opening a session for `target` fails before any page exists.
    #[must_use]
    pub fn failing_open(mut self, target: &str) -> Self {
        self.failing_open.insert(target.to_string());
        self
    }

    /// Every session opened so far, in open order.
    #[must_use]
    pub fn sessions(&self) -> Vec<(String, Arc<PageState>)> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// State of the most recent session opened for `target`.
    #[must_use]
    pub fn last_session(&self, target: &str) -> Option<Arc<PageState>> {
        self.sessions()
            .into_iter()
            .rev()
            .find(|(t, _)| t == target)
            .map(|(_, state)| state)
    }
}

#[async_trait]
impl SessionProvider for FakeProvider {
    async fn open(&self, target: &str) -> Result<Box<dyn PageSession>, SessionError> {
        if self.failing_open.contains(target) {
            return Err(SessionError::Browser(
                "failed to launch browser process".to_string(),
            ));
        }
        let page = self
            .pages
            .get(target)
            .map(FakePage::fresh_session)
            .unwrap_or_default();
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((target.to_string(), page.state()));
        Ok(Box::new(page))
    }
}

/// A feed item with every field present.
#[must_use]
pub fn feed_item(index: usize, organization: &str) -> FakeNode {
    FakeNode::new()
        .child(
            feed::LINK.selector,
            FakeNode::new().attr(
                "href",
                &format!("https://www.linkedin.com/feed/update/urn:li:activity:{index}"),
            ),
        )
        .child(feed::ORGANIZATION.selector, FakeNode::with_text(organization))
        .child(
            feed::FOLLOWERS.selector,
            FakeNode::with_text("50,000 followers"),
        )
        .child(feed::TIME.selector, FakeNode::with_text(&format!("{index}d")))
        .child(
            feed::BODY.selector,
            FakeNode::with_text(&format!("Post number {index}")),
        )
        .child(feed::LIKES.selector, FakeNode::with_text("1,234"))
        .child(feed::COMMENTS.selector, FakeNode::with_text("56 Comments"))
}

/// Top-card region for `name` with every field present.
#[must_use]
pub fn top_card_region(name: &str) -> FakeNode {
    FakeNode::new()
        .child(top_card::NAME.selector, FakeNode::with_text(name))
        .child(
            top_card::HEADLINE.selector,
            FakeNode::with_text("IT Services and IT Consulting"),
        )
        .child(
            top_card::LOCATION_FOLLOWERS.selector,
            FakeNode::with_text("Bengaluru, India 50,000 followers"),
        )
        .child(
            top_card::DESCRIPTION.selector,
            FakeNode::with_text("Navigate your next"),
        )
        .child(
            top_card::JOBS_LINK.selector,
            FakeNode::with_text("See jobs").attr("href", "https://www.linkedin.com/jobs/search"),
        )
        .child(
            top_card::FOLLOW_LINK.selector,
            FakeNode::with_text("Follow").attr("href", "https://www.linkedin.com/signup"),
        )
        .child(
            top_card::EMPLOYEES.selector,
            FakeNode::with_text("View all 1,234 employees"),
        )
}

/// Core-details region with every field present.
#[must_use]
pub fn core_details_region() -> FakeNode {
    FakeNode::new()
        .child(
            core_details::ABOUT_US.selector,
            FakeNode::with_text("We build software."),
        )
        .child(
            core_details::WEBSITE.selector,
            FakeNode::with_text("example.com").attr("href", "https://www.example.com"),
        )
        .child(
            core_details::INDUSTRY.selector,
            FakeNode::with_text("Software Development"),
        )
        .child(
            core_details::COMPANY_SIZE.selector,
            FakeNode::with_text("10,001+ employees"),
        )
        .child(
            core_details::HEADQUARTERS.selector,
            FakeNode::with_text("Bengaluru, Karnataka"),
        )
        .child(
            core_details::COMPANY_TYPE.selector,
            FakeNode::with_text("Public Company"),
        )
        .child(core_details::FOUNDED.selector, FakeNode::with_text("1981"))
        .child(
            core_details::SPECIALTIES.selector,
            FakeNode::with_text("Consulting, Cloud"),
        )
}

/// A complete company page for `name` whose feed holds `posts` items, all
/// visible without scrolling.
#[must_use]
pub fn company_page(name: &str, posts: usize) -> FakePage {
    FakePage::new()
        .region(top_card::REGION, top_card_region(name))
        .region(core_details::REGION, core_details_region())
        .region(OVERLAY_DISMISS, FakeNode::with_text("Dismiss"))
        .feed((0..posts).map(|i| feed_item(i, name)).collect())
}
