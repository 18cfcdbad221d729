//! Page bootstrap: one controller owning every element handle and timer,
//! driven either synchronously or as a single-writer task.

use crate::config::FolioConfig;
use crate::contact::{ContactForm, REPLY_DELAY};
use crate::debounce::{Debouncer, TimerQueue};
use crate::dom::{Document, NodeId};
use crate::feed::{self, CardFormat, FeedError, FeedOutcome};
use crate::listing::RepoListing;
use crate::model::{Layout, RepositorySummary};
use crate::nav::{self, CLICK_FADE, NAV_ID, NavToggle};
use crate::palette::{PaletteSwitcher, PreferenceStore};
use crate::scroll_spy::{
    INITIAL_DELAY, IndicatorState, RESIZE_DEBOUNCE, SCROLL_DEBOUNCE, ScrollSpy,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info};

pub const YEAR_ID: &str = "year";

#[derive(Clone, Debug)]
pub enum PageEvent {
    Click(NodeId),
    Scroll(Layout),
    Resize(Layout),
    Input { node: NodeId, value: String },
    Submit(NodeId),
    ReloadRepositories,
}

impl PageEvent {
    /// Element the event was dispatched on, if any.
    pub fn target(&self) -> Option<NodeId> {
        match self {
            PageEvent::Click(node) | PageEvent::Submit(node) => Some(*node),
            PageEvent::Input { node, .. } => Some(*node),
            PageEvent::Scroll(_) | PageEvent::Resize(_) | PageEvent::ReloadRepositories => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PageEffect {
    PreventDefault(NodeId),
    ScrollIntoView(NodeId),
    /// The host must fetch the listing for the ticket and hand the result to
    /// [`PageController::finish_feed`]. [`PageController::run`] does this
    /// itself and never forwards it.
    Fetch(FeedTicket),
    FeedRendered(FeedOutcome),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedTicket {
    pub generation: u64,
    pub identity: String,
}

#[derive(Clone, Debug, PartialEq)]
enum Timer {
    SettleIndicator,
    ContactReply,
    ClearClick(NodeId),
}

#[derive(Clone, Debug)]
pub struct PageOptions {
    pub identity: String,
    pub fallback_palette: String,
    pub card_format: CardFormat,
    pub year: i32,
}

impl PageOptions {
    pub fn from_config(config: &FolioConfig, year: i32) -> anyhow::Result<Self> {
        Ok(Self {
            identity: config.identity.clone(),
            fallback_palette: config.default_palette.clone(),
            card_format: CardFormat::new(&config.date_format)?,
            year,
        })
    }
}

type FeedDone = (u64, Result<Vec<RepositorySummary>, FeedError>);

pub struct PageController {
    document: Document,
    layout: Layout,
    options: PageOptions,
    store: Box<dyn PreferenceStore>,
    nav_toggle: Option<NavToggle>,
    spy: Option<ScrollSpy>,
    palette: PaletteSwitcher,
    contact: Option<ContactForm>,
    feed_container: Option<NodeId>,
    feed_generation: u64,
    scroll: Debouncer,
    resize: Debouncer,
    timers: TimerQueue<Timer>,
    indicator_updates: u64,
}

impl PageController {
    /// Wires every optional page feature that has its elements present.
    pub fn bootstrap(
        mut document: Document,
        layout: Layout,
        store: Box<dyn PreferenceStore>,
        options: PageOptions,
        now: Instant,
    ) -> Self {
        if let Some(year) = document.get_element_by_id(YEAR_ID) {
            document.set_text(year, &options.year.to_string());
        }
        let nav_toggle = NavToggle::find(&document);
        let mut timers = TimerQueue::default();
        let spy = document.get_element_by_id(NAV_ID).map(|nav_root| {
            timers.schedule(Timer::SettleIndicator, now + INITIAL_DELAY);
            ScrollSpy::init(&mut document, nav_root)
        });
        let palette = PaletteSwitcher::init(&mut document, store.as_ref(), &options.fallback_palette);
        let contact = ContactForm::find(&document);
        let feed_container = document.get_element_by_id(feed::CONTAINER_ID);
        info!(
            nav_toggle = nav_toggle.is_some(),
            scroll_spy = spy.is_some(),
            contact = contact.is_some(),
            repositories = feed_container.is_some(),
            "Page bootstrapped"
        );
        Self {
            document,
            layout,
            options,
            store,
            nav_toggle,
            spy,
            palette,
            contact,
            feed_container,
            feed_generation: 0,
            scroll: Debouncer::new(SCROLL_DEBOUNCE),
            resize: Debouncer::new(RESIZE_DEBOUNCE),
            timers,
            indicator_updates: 0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn indicator_state(&self) -> Option<IndicatorState> {
        self.spy.as_ref().map(ScrollSpy::state)
    }

    /// Number of times the indicator geometry has been recomputed.
    pub fn indicator_updates(&self) -> u64 {
        self.indicator_updates
    }

    /// Shows the skeleton cards and hands out a ticket for the fetch. Any
    /// earlier ticket becomes stale.
    pub fn begin_feed(&mut self) -> Option<FeedTicket> {
        let container = self.feed_container?;
        feed::render_skeletons(&mut self.document, container);
        self.feed_generation += 1;
        debug!(generation = self.feed_generation, "Repository feed started");
        Some(FeedTicket {
            generation: self.feed_generation,
            identity: self.options.identity.clone(),
        })
    }

    /// Renders a fetch result; results for stale tickets are dropped.
    pub fn finish_feed(
        &mut self,
        generation: u64,
        result: Result<Vec<RepositorySummary>, FeedError>,
    ) -> Option<FeedOutcome> {
        if generation != self.feed_generation {
            debug!(generation, current = self.feed_generation, "Dropping stale feed result");
            return None;
        }
        let container = self.feed_container?;
        Some(feed::render_result(
            &mut self.document,
            container,
            result,
            &self.options.card_format,
        ))
    }

    /// Events targeting a node this page does not hold are dropped.
    pub fn handle_event(&mut self, event: PageEvent, now: Instant) -> Vec<PageEffect> {
        if let Some(node) = event.target()
            && !self.document.contains(node)
        {
            debug!(node = %node, "Ignoring event for unknown node");
            return Vec::new();
        }
        match event {
            PageEvent::Click(node) => self.handle_click(node, now),
            PageEvent::Scroll(layout) => {
                self.layout = layout;
                if self.spy.is_some() {
                    self.scroll.trigger(now);
                }
                Vec::new()
            }
            PageEvent::Resize(layout) => {
                self.layout = layout;
                if self.spy.is_some() {
                    self.resize.trigger(now);
                }
                Vec::new()
            }
            PageEvent::Input { node, value } => {
                self.document.set_attr(node, "value", &value);
                Vec::new()
            }
            PageEvent::Submit(node) => self.handle_submit(node, now),
            PageEvent::ReloadRepositories => {
                self.begin_feed().map(PageEffect::Fetch).into_iter().collect()
            }
        }
    }

    fn handle_click(&mut self, node: NodeId, now: Instant) -> Vec<PageEffect> {
        if let Some(toggle) = self.nav_toggle
            && toggle.button() == node
        {
            toggle.toggle(&mut self.document);
            return Vec::new();
        }
        if self.palette.owns(node) {
            self.palette
                .handle_click(&mut self.document, self.store.as_mut(), node);
            return Vec::new();
        }
        let viewport_width = self.layout.viewport.width;
        match nav::follow_anchor(
            &mut self.document,
            self.nav_toggle.as_ref(),
            node,
            viewport_width,
        ) {
            Some(jump) => {
                self.timers
                    .schedule(Timer::ClearClick(jump.anchor), now + CLICK_FADE);
                vec![
                    PageEffect::PreventDefault(jump.anchor),
                    PageEffect::ScrollIntoView(jump.target),
                ]
            }
            None => Vec::new(),
        }
    }

    fn handle_submit(&mut self, node: NodeId, now: Instant) -> Vec<PageEffect> {
        let Some(contact) = self.contact.as_ref().filter(|form| form.form() == node) else {
            return Vec::new();
        };
        if contact.submit(&mut self.document).is_ok() {
            self.timers.schedule(Timer::ContactReply, now + REPLY_DELAY);
        }
        vec![PageEffect::PreventDefault(node)]
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.scroll.deadline(),
            self.resize.deadline(),
            self.timers.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Runs every debounced handler and timer whose deadline has passed.
    pub fn fire_due(&mut self, now: Instant) {
        if self.scroll.take_due(now)
            && let Some(spy) = self.spy.as_mut()
        {
            spy.refresh(&mut self.document, &self.layout);
            self.indicator_updates += 1;
        }
        if self.resize.take_due(now)
            && let Some(spy) = self.spy.as_mut()
        {
            spy.reposition(&mut self.document, &self.layout);
            self.indicator_updates += 1;
        }
        for timer in self.timers.pop_due(now) {
            match timer {
                Timer::SettleIndicator => {
                    if let Some(spy) = self.spy.as_mut() {
                        spy.settle(&mut self.document, &self.layout);
                        self.indicator_updates += 1;
                    }
                }
                Timer::ContactReply => {
                    if let Some(contact) = self.contact.as_ref() {
                        contact.complete(&mut self.document);
                    }
                }
                Timer::ClearClick(anchor) => nav::clear_click_mark(&mut self.document, anchor),
            }
        }
    }

    /// Drives the page until the event channel closes or the effect receiver
    /// is dropped, then returns the final document. Fetches run on spawned
    /// tasks; a reload aborts the fetch in flight.
    pub async fn run(
        mut self,
        listing: Arc<dyn RepoListing>,
        mut events: mpsc::Receiver<PageEvent>,
        effects: mpsc::UnboundedSender<PageEffect>,
    ) -> Document {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<FeedDone>();
        let mut in_flight: Option<JoinHandle<()>> = None;
        if let Some(ticket) = self.begin_feed() {
            in_flight = Some(spawn_fetch(&listing, ticket, done_tx.clone()));
        }

        'page: loop {
            let deadline = self.next_deadline();
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else { break 'page };
                    for effect in self.handle_event(event, Instant::now()) {
                        match effect {
                            PageEffect::Fetch(ticket) => {
                                if let Some(previous) = in_flight.take() {
                                    previous.abort();
                                }
                                in_flight = Some(spawn_fetch(&listing, ticket, done_tx.clone()));
                            }
                            other => {
                                if !emit(&effects, other) {
                                    break 'page;
                                }
                            }
                        }
                    }
                }
                Some((generation, result)) = done_rx.recv() => {
                    if let Some(outcome) = self.finish_feed(generation, result)
                        && !emit(&effects, PageEffect::FeedRendered(outcome))
                    {
                        break 'page;
                    }
                }
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.fire_due(Instant::now());
                }
            }
        }

        if let Some(handle) = in_flight {
            handle.abort();
        }
        self.document
    }
}

/// False once the host has dropped its effect receiver.
fn emit(effects: &mpsc::UnboundedSender<PageEffect>, effect: PageEffect) -> bool {
    match effects.send(effect) {
        Ok(()) => true,
        Err(err) => {
            debug!(effect = ?err.0, "Effect receiver closed; stopping page loop");
            false
        }
    }
}

fn spawn_fetch(
    listing: &Arc<dyn RepoListing>,
    ticket: FeedTicket,
    done: mpsc::UnboundedSender<FeedDone>,
) -> JoinHandle<()> {
    let listing = Arc::clone(listing);
    tokio::spawn(async move {
        let result = listing.list_repositories(&ticket.identity).await;
        let _ = done.send((ticket.generation, result));
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::tests::{FakeListing, repo};
    use crate::model::{Rect, Viewport};
    use crate::palette::{MemoryStore, PALETTE_KEY};
    use std::time::Duration;

    struct Page {
        doc: Document,
        toggle: NodeId,
        links: Vec<NodeId>,
        sections: Vec<NodeId>,
        nav: NodeId,
        repos: NodeId,
        form: NodeId,
        palette_buttons: Vec<NodeId>,
    }

    fn portfolio() -> Page {
        let mut doc = Document::new();
        let body = doc.body();
        let header = doc.element(body, "header");
        let toggle = doc.element_with_id(header, "button", nav::TOGGLE_ID);
        let nav = doc.element_with_id(header, "nav", NAV_ID);
        let links = ["#about", "#projects", "#contact"]
            .into_iter()
            .map(|href| {
                let link = doc.element(nav, "a");
                doc.set_attr(link, "href", href);
                link
            })
            .collect();
        let palette_buttons = ["red", "crimson", "charcoal"]
            .into_iter()
            .map(|name| {
                let button = doc.element(header, "button");
                doc.add_class(button, crate::palette::BUTTON_CLASS);
                doc.set_attr(button, "data-palette", name);
                button
            })
            .collect();
        let about = doc.element_with_id(body, "section", "about");
        let projects = doc.element_with_id(body, "section", "projects");
        let repos = doc.element_with_id(projects, "div", feed::CONTAINER_ID);
        let contact = doc.element_with_id(body, "section", "contact");
        let form = doc.element_with_id(contact, "form", crate::contact::FORM_ID);
        for name in ["name", "email", "message"] {
            let input = doc.element(form, "input");
            doc.set_attr(input, "name", name);
        }
        doc.element_with_id(contact, "p", crate::contact::STATUS_ID);
        let footer = doc.element(body, "footer");
        doc.element_with_id(footer, "span", YEAR_ID);
        Page {
            doc,
            toggle,
            links,
            sections: vec![about, projects, contact],
            nav,
            repos,
            form,
            palette_buttons,
        }
    }

    fn layout(page: &Page, width: f64, tops: [f64; 3], link_left: [f64; 3]) -> Layout {
        let mut layout = Layout::new(Viewport {
            width,
            height: 1000.0,
        })
        .with_rect(page.nav, Rect::new(200.0, 0.0, 500.0, 40.0));
        for idx in 0..3 {
            layout.set_rect(page.links[idx], Rect::new(link_left[idx], 0.0, 80.0, 20.0));
            layout.set_rect(page.sections[idx], Rect::new(0.0, tops[idx], width, 600.0));
        }
        layout
    }

    fn options() -> PageOptions {
        PageOptions {
            identity: "octocat".to_string(),
            fallback_palette: "red".to_string(),
            card_format: CardFormat::default(),
            year: 2026,
        }
    }

    fn controller(page: &Page, store: MemoryStore, now: Instant) -> PageController {
        let layout = layout(page, 1200.0, [480.0, 1200.0, 2000.0], [210.0, 310.0, 410.0]);
        PageController::bootstrap(page.doc.clone(), layout, Box::new(store), options(), now)
    }

    #[test]
    fn options_follow_config() {
        let config = FolioConfig {
            identity: "octocat".to_string(),
            default_palette: "charcoal".to_string(),
            ..FolioConfig::default()
        };
        let options = PageOptions::from_config(&config, 2026).unwrap();
        assert_eq!(options.identity, "octocat");
        assert_eq!(options.fallback_palette, "charcoal");

        let broken = FolioConfig {
            date_format: "[nonsense".to_string(),
            ..FolioConfig::default()
        };
        assert!(PageOptions::from_config(&broken, 2026).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn bootstrap_wires_static_features() {
        let page = portfolio();
        let mut store = MemoryStore::default();
        store.set(PALETTE_KEY, "charcoal").unwrap();
        let now = Instant::now();
        let mut page_ctl = controller(&page, store, now);

        let doc = page_ctl.document();
        let year = doc.get_element_by_id(YEAR_ID).unwrap();
        assert_eq!(doc.text_content(year), "2026");
        assert!(doc.has_class(doc.root(), "palette-charcoal"));
        assert_eq!(doc.select_by_class(page.nav, "nav-indicator").len(), 1);

        assert_eq!(page_ctl.next_deadline(), Some(now + INITIAL_DELAY));
        page_ctl.fire_due(now + INITIAL_DELAY);
        let state = page_ctl.indicator_state().unwrap();
        assert_eq!(state.active.map(|entry| entry.link), Some(page.links[0]));
        assert_eq!(state.offset, 10.0);
    }

    #[tokio::test(start_paused = true)]
    async fn resize_burst_recomputes_once_with_latest_layout() {
        let page = portfolio();
        let start = Instant::now();
        let mut page_ctl = controller(&page, MemoryStore::default(), start);
        page_ctl.fire_due(start + INITIAL_DELAY);
        let before = page_ctl.indicator_updates();

        let t0 = start + Duration::from_secs(1);
        let narrow = layout(&page, 900.0, [480.0, 1200.0, 2000.0], [250.0, 330.0, 410.0]);
        let narrower = layout(&page, 800.0, [480.0, 1200.0, 2000.0], [260.0, 340.0, 420.0]);
        page_ctl.handle_event(PageEvent::Resize(narrow), t0);
        page_ctl.handle_event(PageEvent::Resize(narrower), t0 + Duration::from_millis(10));

        page_ctl.fire_due(t0 + RESIZE_DEBOUNCE);
        assert_eq!(page_ctl.indicator_updates(), before);
        page_ctl.fire_due(t0 + Duration::from_millis(10) + RESIZE_DEBOUNCE);
        assert_eq!(page_ctl.indicator_updates(), before + 1);
        assert_eq!(page_ctl.indicator_state().unwrap().offset, 60.0);
        assert_eq!(page_ctl.next_deadline(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn scroll_moves_indicator_after_quiet_window() {
        let page = portfolio();
        let start = Instant::now();
        let mut page_ctl = controller(&page, MemoryStore::default(), start);
        page_ctl.fire_due(start + INITIAL_DELAY);

        let scrolled = layout(&page, 1200.0, [-900.0, -200.0, 450.0], [210.0, 310.0, 410.0]);
        let t0 = start + Duration::from_secs(1);
        page_ctl.handle_event(PageEvent::Scroll(scrolled), t0);
        page_ctl.fire_due(t0 + Duration::from_millis(40));
        let state = page_ctl.indicator_state().unwrap();
        assert_eq!(state.active.map(|entry| entry.link), Some(page.links[0]));

        page_ctl.fire_due(t0 + SCROLL_DEBOUNCE);
        let state = page_ctl.indicator_state().unwrap();
        assert_eq!(state.active.map(|entry| entry.link), Some(page.links[2]));
        let doc = page_ctl.document();
        assert!(doc.has_class(page.links[2], "active"));
        assert!(!doc.has_class(page.links[0], "active"));
    }

    #[tokio::test(start_paused = true)]
    async fn anchor_click_scrolls_and_fades_mark() {
        let page = portfolio();
        let now = Instant::now();
        let mut page_ctl = controller(&page, MemoryStore::default(), now);
        let effects = page_ctl.handle_event(PageEvent::Click(page.links[1]), now);
        assert_eq!(
            effects,
            vec![
                PageEffect::PreventDefault(page.links[1]),
                PageEffect::ScrollIntoView(page.sections[1]),
            ]
        );
        assert!(page_ctl.document().has_class(page.links[1], nav::CLICKED_CLASS));
        page_ctl.fire_due(now + CLICK_FADE);
        assert!(!page_ctl.document().has_class(page.links[1], nav::CLICKED_CLASS));
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_and_palette_clicks() {
        let page = portfolio();
        let now = Instant::now();
        let mut page_ctl = controller(&page, MemoryStore::default(), now);
        assert!(page_ctl.handle_event(PageEvent::Click(page.toggle), now).is_empty());
        assert_eq!(
            page_ctl.document().attr(page.toggle, "aria-expanded"),
            Some("true")
        );
        page_ctl.handle_event(PageEvent::Click(page.palette_buttons[1]), now);
        let doc = page_ctl.document();
        assert!(doc.has_class(doc.root(), "palette-crimson"));
        assert_eq!(page_ctl.store.get(PALETTE_KEY).as_deref(), Some("crimson"));
    }

    #[tokio::test(start_paused = true)]
    async fn contact_submit_replies_after_delay() {
        let page = portfolio();
        let now = Instant::now();
        let mut page_ctl = controller(&page, MemoryStore::default(), now);
        let inputs = page_ctl.document().select_by_tag(page.form, "input");
        for (input, value) in inputs.iter().zip(["Ann", "ann@example.com", "Hi"]) {
            page_ctl.handle_event(
                PageEvent::Input {
                    node: *input,
                    value: value.to_string(),
                },
                now,
            );
        }
        let effects = page_ctl.handle_event(PageEvent::Submit(page.form), now);
        assert_eq!(effects, vec![PageEffect::PreventDefault(page.form)]);
        let status = page_ctl
            .document()
            .get_element_by_id(crate::contact::STATUS_ID)
            .unwrap();
        assert_eq!(page_ctl.document().text_content(status), "Sending…");

        page_ctl.fire_due(now + REPLY_DELAY);
        assert_eq!(
            page_ctl.document().text_content(status),
            crate::contact::THANKS_MESSAGE
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stale_feed_results_are_dropped() {
        let page = portfolio();
        let now = Instant::now();
        let mut page_ctl = controller(&page, MemoryStore::default(), now);
        let first = page_ctl.begin_feed().unwrap();
        let effects = page_ctl.handle_event(PageEvent::ReloadRepositories, now);
        let [PageEffect::Fetch(second)] = effects.as_slice() else {
            panic!("expected a fetch effect, got {effects:?}");
        };
        assert_eq!(second.identity, "octocat");

        assert_eq!(page_ctl.finish_feed(first.generation, Ok(vec![repo("old", 1)])), None);
        assert!(page_ctl.document().has_class(
            page_ctl.document().element_children(page.repos)[0],
            "skeleton"
        ));
        let outcome = page_ctl.finish_feed(second.generation, Ok(vec![repo("new", 2)]));
        assert_eq!(outcome, Some(FeedOutcome::Rendered { cards: 1 }));
    }

    #[tokio::test(start_paused = true)]
    async fn events_for_unknown_nodes_are_ignored() {
        let page = portfolio();
        let now = Instant::now();
        let mut page_ctl = controller(&page, MemoryStore::default(), now);
        let ticket = page_ctl.begin_feed().unwrap();
        page_ctl.finish_feed(ticket.generation, Ok(vec![repo("alpha", 1)]));
        let card_link = page_ctl.document().select_by_tag(page.repos, "a")[0];
        page_ctl.handle_event(PageEvent::ReloadRepositories, now);

        let mut other = Document::new();
        let other_body = other.body();
        let foreign = (0..500)
            .map(|_| other.element(other_body, "a"))
            .last()
            .unwrap();
        let html = page_ctl.document().outer_html(page_ctl.document().root());
        for event in [
            PageEvent::Click(card_link),
            PageEvent::Click(foreign),
            PageEvent::Submit(foreign),
            PageEvent::Input {
                node: foreign,
                value: "x".to_string(),
            },
        ] {
            assert!(page_ctl.handle_event(event, now).is_empty());
        }
        assert_eq!(
            page_ctl.document().outer_html(page_ctl.document().root()),
            html
        );
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_reloads_and_submits_keep_node_count_flat() {
        let page = portfolio();
        let start = Instant::now();
        let mut page_ctl = controller(&page, MemoryStore::default(), start);
        let cycle = |page_ctl: &mut PageController, now: Instant| {
            let ticket = page_ctl.begin_feed().unwrap();
            page_ctl.finish_feed(
                ticket.generation,
                Ok(vec![repo("alpha", 1), repo("beta", 2)]),
            );
            page_ctl.handle_event(PageEvent::Submit(page.form), now);
            page_ctl.fire_due(now + REPLY_DELAY);
        };
        cycle(&mut page_ctl, start);
        let settled = page_ctl.document().node_count();
        for round in 1..1000u64 {
            cycle(&mut page_ctl, start + Duration::from_secs(round));
        }
        assert_eq!(page_ctl.document().node_count(), settled);
    }

    #[tokio::test(start_paused = true)]
    async fn run_stops_when_effect_receiver_is_dropped() {
        let page = portfolio();
        let listing: Arc<dyn RepoListing> =
            Arc::new(FakeListing::new(|| Ok(vec![repo("alpha", 10)])));
        let page_ctl = controller(&page, MemoryStore::default(), Instant::now());
        let (event_tx, event_rx) = mpsc::channel(8);
        let (effect_tx, effect_rx) = mpsc::unbounded_channel();
        drop(effect_rx);
        let task = tokio::spawn(page_ctl.run(listing, event_rx, effect_tx));

        let doc = task.await.unwrap();
        drop(event_tx);
        assert_eq!(doc.select_by_tag(page.repos, "a").len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn run_loads_feed_and_processes_events() {
        let page = portfolio();
        let listing: Arc<dyn RepoListing> = Arc::new(FakeListing::new(|| {
            Ok(vec![repo("alpha", 10), repo("beta", 30), repo("gamma", 20)])
        }));
        let page_ctl = controller(&page, MemoryStore::default(), Instant::now());
        let (event_tx, event_rx) = mpsc::channel(8);
        let (effect_tx, mut effect_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(page_ctl.run(listing, event_rx, effect_tx));

        assert_eq!(
            effect_rx.recv().await,
            Some(PageEffect::FeedRendered(FeedOutcome::Rendered { cards: 3 }))
        );
        event_tx.send(PageEvent::Click(page.toggle)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        drop(event_tx);
        let doc = task.await.unwrap();

        let names: Vec<_> = doc
            .select_by_tag(page.repos, "a")
            .into_iter()
            .map(|link| doc.text_content(link))
            .collect();
        assert_eq!(names, ["beta", "gamma", "alpha"]);
        assert_eq!(doc.attr(page.toggle, "aria-expanded"), Some("true"));
        assert!(doc.has_class(page.links[0], "active"));
    }
}
