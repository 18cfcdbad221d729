use crate::dom::{Document, NodeId};
use std::time::Duration;

pub const TOGGLE_ID: &str = "nav-toggle";
pub const NAV_ID: &str = "site-nav";
pub const CLICKED_CLASS: &str = "nav-clicked";
pub const CLICK_FADE: Duration = Duration::from_millis(300);
/// Below this viewport width the nav is the collapsible mobile menu.
pub const MOBILE_BREAKPOINT: f64 = 700.0;

#[derive(Clone, Copy, Debug)]
pub struct NavToggle {
    button: NodeId,
    nav: NodeId,
}

impl NavToggle {
    pub fn find(doc: &Document) -> Option<Self> {
        Some(Self {
            button: doc.get_element_by_id(TOGGLE_ID)?,
            nav: doc.get_element_by_id(NAV_ID)?,
        })
    }

    pub fn button(&self) -> NodeId {
        self.button
    }

    pub fn is_expanded(&self, doc: &Document) -> bool {
        doc.attr(self.button, "aria-expanded") == Some("true")
    }

    pub fn toggle(&self, doc: &mut Document) {
        let expanded = self.is_expanded(doc);
        doc.set_attr(
            self.button,
            "aria-expanded",
            if expanded { "false" } else { "true" },
        );
        doc.set_style(self.nav, "display", if expanded { "none" } else { "block" });
    }

    pub fn collapse(&self, doc: &mut Document) {
        doc.set_attr(self.button, "aria-expanded", "false");
        doc.set_style(self.nav, "display", "none");
    }
}

/// Result of clicking an in-page anchor that points at an existing element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnchorJump {
    pub anchor: NodeId,
    pub target: NodeId,
}

/// Handles a click on a same-page anchor. Returns `None` when the click
/// should fall through to the default behaviour.
pub fn follow_anchor(
    doc: &mut Document,
    toggle: Option<&NavToggle>,
    anchor: NodeId,
    viewport_width: f64,
) -> Option<AnchorJump> {
    if doc.tag(anchor) != Some("a") {
        return None;
    }
    let href = doc.attr(anchor, "href")?;
    if href == "#" || !href.starts_with('#') {
        return None;
    }
    let target = doc.resolve_fragment(href)?;
    if viewport_width < MOBILE_BREAKPOINT
        && let Some(toggle) = toggle
    {
        toggle.collapse(doc);
    }
    doc.add_class(anchor, CLICKED_CLASS);
    Some(AnchorJump { anchor, target })
}

pub fn clear_click_mark(doc: &mut Document, anchor: NodeId) {
    doc.remove_class(anchor, CLICKED_CLASS);
}
