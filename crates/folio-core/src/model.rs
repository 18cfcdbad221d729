use crate::dom::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::OffsetDateTime;

/// One repository as returned by the listing endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct RepositorySummary {
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub updated_at: OffsetDateTime,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Read-only view of rendered geometry, in viewport coordinates.
pub trait Geometry {
    fn viewport_height(&self) -> f64;
    fn bounding_rect(&self, node: NodeId) -> Option<Rect>;
}

/// Snapshot of the page geometry at the moment an event fired.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
    pub viewport: Viewport,
    rects: HashMap<NodeId, Rect>,
}

impl Layout {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            rects: HashMap::new(),
        }
    }

    pub fn with_rect(mut self, node: NodeId, rect: Rect) -> Self {
        self.rects.insert(node, rect);
        self
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        self.rects.insert(node, rect);
    }
}

impl Geometry for Layout {
    fn viewport_height(&self) -> f64 {
        self.viewport.height
    }

    fn bounding_rect(&self, node: NodeId) -> Option<Rect> {
        self.rects.get(&node).copied()
    }
}
