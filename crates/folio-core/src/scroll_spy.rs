//! Scroll-spy indicator under the site navigation.
//!
//! The section whose top edge is closest to the vertical middle of the
//! viewport is active; the indicator element slides under its link.

use crate::dom::{Document, NodeId};
use crate::model::Geometry;
use std::time::Duration;
use tracing::trace;

pub const INDICATOR_CLASS: &str = "nav-indicator";
pub const ACTIVE_CLASS: &str = "active";
pub const SCROLL_DEBOUNCE: Duration = Duration::from_millis(80);
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(120);
pub const INITIAL_DELAY: Duration = Duration::from_millis(60);

/// A navigation link paired with the section its fragment points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavSection {
    pub link: NodeId,
    pub section: NodeId,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IndicatorState {
    pub offset: f64,
    pub width: f64,
    pub active: Option<NavSection>,
}

impl IndicatorState {
    pub fn is_hidden(&self) -> bool {
        self.active.is_none()
    }
}

#[derive(Debug)]
pub struct ScrollSpy {
    nav_root: NodeId,
    indicator: NodeId,
    links: Vec<NodeId>,
    sections: Vec<NavSection>,
    state: IndicatorState,
}

impl ScrollSpy {
    /// Creates the indicator element (or reuses an existing one) and pairs
    /// every same-page link under `nav_root` with its target section.
    pub fn init(doc: &mut Document, nav_root: NodeId) -> Self {
        let indicator = match doc.find_by_class(nav_root, INDICATOR_CLASS) {
            Some(existing) => existing,
            None => {
                let created = doc.element(nav_root, "span");
                doc.add_class(created, INDICATOR_CLASS);
                created
            }
        };
        let links = doc.same_page_anchors(nav_root);
        let sections = links
            .iter()
            .filter_map(|link| {
                let href = doc.attr(*link, "href")?;
                let section = doc.resolve_fragment(href)?;
                Some(NavSection {
                    link: *link,
                    section,
                })
            })
            .collect::<Vec<_>>();
        trace!(
            links = links.len(),
            sections = sections.len(),
            "Scroll-spy initialized"
        );
        Self {
            nav_root,
            indicator,
            links,
            sections,
            state: IndicatorState::default(),
        }
    }

    pub fn indicator(&self) -> NodeId {
        self.indicator
    }

    pub fn sections(&self) -> &[NavSection] {
        &self.sections
    }

    pub fn state(&self) -> IndicatorState {
        self.state
    }

    /// Section nearest the viewport middle; the first one wins ties.
    pub fn find_active(&self, geometry: &dyn Geometry) -> Option<NavSection> {
        let middle = geometry.viewport_height() / 2.0;
        let mut best: Option<NavSection> = None;
        let mut best_diff = f64::INFINITY;
        for entry in &self.sections {
            let Some(rect) = geometry.bounding_rect(entry.section) else {
                continue;
            };
            let diff = (rect.top - middle).abs();
            if diff < best_diff {
                best_diff = diff;
                best = Some(*entry);
            }
        }
        best
    }

    /// Scroll handler body.
    pub fn refresh(&mut self, doc: &mut Document, geometry: &dyn Geometry) {
        let active = self.find_active(geometry);
        self.show(doc, geometry, active);
    }

    /// Resize handler body: keeps the current section, or the first one when
    /// nothing is active yet, and re-measures it.
    pub fn reposition(&mut self, doc: &mut Document, geometry: &dyn Geometry) {
        let target = self.state.active.or_else(|| self.sections.first().copied());
        self.show(doc, geometry, target);
    }

    /// Initial placement: position under the current or first section, then
    /// settle on the section nearest the viewport middle.
    pub fn settle(&mut self, doc: &mut Document, geometry: &dyn Geometry) {
        self.reposition(doc, geometry);
        self.refresh(doc, geometry);
    }

    fn show(&mut self, doc: &mut Document, geometry: &dyn Geometry, target: Option<NavSection>) {
        let placement = target.and_then(|entry| {
            let link = geometry.bounding_rect(entry.link)?;
            let nav = geometry.bounding_rect(self.nav_root)?;
            Some((entry, link.left - nav.left, link.width))
        });
        match placement {
            Some((entry, offset, width)) => {
                doc.set_style(self.indicator, "transform", &format!("translateX({offset}px)"));
                doc.set_style(self.indicator, "width", &format!("{width}px"));
                self.state = IndicatorState {
                    offset,
                    width,
                    active: Some(entry),
                };
            }
            None => {
                doc.set_style(self.indicator, "width", "0px");
                self.state = IndicatorState {
                    offset: self.state.offset,
                    width: 0.0,
                    active: None,
                };
            }
        }
        let active_link = self.state.active.map(|entry| entry.link);
        for link in &self.links {
            doc.toggle_class(*link, ACTIVE_CLASS, Some(*link) == active_link);
        }
    }
}
