use crate::dom::{Document, NodeId};
use anyhow::Context;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const PALETTE_KEY: &str = "site:palette";
pub const PALETTES: [&str; 3] = ["red", "crimson", "charcoal"];
pub const DEFAULT_PALETTE: &str = "red";
pub const BUTTON_CLASS: &str = "palette-btn";

pub fn is_known_palette(name: &str) -> bool {
    PALETTES.contains(&name)
}

/// String key/value storage surviving page reloads.
pub trait PreferenceStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object on disk, rewritten on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let values = if path.exists() {
            let data = fs::read_to_string(path).context("read preferences")?;
            serde_json::from_str(&data).context("parse preferences")?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("create preferences directory")?;
        }
        let data = serde_json::to_string_pretty(&self.values).context("serialize preferences")?;
        fs::write(&self.path, data).context("write preferences")?;
        Ok(())
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }
}

/// Sets `palette-<name>` on the root element and syncs `aria-pressed` on
/// every palette button under `root`.
pub fn apply_palette(doc: &mut Document, name: Option<&str>) {
    let root = doc.root();
    for palette in PALETTES {
        doc.remove_class(root, &format!("palette-{palette}"));
    }
    if let Some(name) = name {
        doc.add_class(root, &format!("palette-{name}"));
    }
    for button in doc.select_by_class(root, BUTTON_CLASS) {
        let pressed = name.is_some() && doc.attr(button, "data-palette") == name;
        doc.set_attr(button, "aria-pressed", if pressed { "true" } else { "false" });
    }
}

#[derive(Debug)]
pub struct PaletteSwitcher {
    buttons: Vec<NodeId>,
}

impl PaletteSwitcher {
    /// Applies the stored palette, or `fallback` when nothing is stored.
    pub fn init(doc: &mut Document, store: &dyn PreferenceStore, fallback: &str) -> Self {
        let initial = store
            .get(PALETTE_KEY)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| fallback.to_string());
        apply_palette(doc, Some(&initial));
        debug!(palette = %initial, "Applied palette");
        Self {
            buttons: doc.select_by_class(doc.root(), BUTTON_CLASS),
        }
    }

    pub fn owns(&self, node: NodeId) -> bool {
        self.buttons.contains(&node)
    }

    /// Returns the applied palette, if `button` is a palette button carrying
    /// a `data-palette` value.
    pub fn handle_click(
        &self,
        doc: &mut Document,
        store: &mut dyn PreferenceStore,
        button: NodeId,
    ) -> Option<String> {
        if !self.owns(button) {
            return None;
        }
        let palette = doc.attr(button, "data-palette")?.to_string();
        apply_palette(doc, Some(&palette));
        if let Err(err) = store.set(PALETTE_KEY, &palette) {
            warn!(error = %err, "Failed to persist palette preference");
        }
        Some(palette)
    }
}
