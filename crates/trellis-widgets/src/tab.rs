//! Tabs and tab panels, the children of a [`TabGroup`](crate::tab_group::TabGroup).

use ratatui::layout::Size;
use trellis_core::ElementId;
use unicode_width::UnicodeWidthStr;

/// Glyph drawn after the label of a closable tab.
pub(crate) const CLOSE_GLYPH: &str = "×";

/// A tab in the navigation strip. `panel` names the panel it controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub(crate) id: ElementId,
    pub(crate) panel: String,
    pub(crate) label: String,
    pub(crate) active: bool,
    pub(crate) disabled: bool,
    pub(crate) closable: bool,
    pub(crate) controls: Option<ElementId>,
}

impl Tab {
    pub fn new(panel: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: ElementId::new(),
            panel: panel.into(),
            label: label.into(),
            active: false,
            disabled: false,
            closable: false,
            controls: None,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Show a close button that requests the tab's removal.
    pub fn with_closable(mut self, closable: bool) -> Self {
        self.closable = closable;
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn panel(&self) -> &str {
        &self.panel
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_closable(&self) -> bool {
        self.closable
    }

    /// The panel this tab is linked to for assistive technology.
    pub fn controls(&self) -> Option<ElementId> {
        self.controls
    }

    /// The text drawn for the tab: the padded label and, when closable, the
    /// close glyph.
    pub fn text(&self) -> String {
        if self.closable {
            format!(" {} {CLOSE_GLYPH} ", self.label)
        } else {
            format!(" {} ", self.label)
        }
    }

    /// Rendered size in cells. Tabs are always one row tall.
    pub fn measure(&self) -> Size {
        let width = u16::try_from(self.text().width()).unwrap_or(u16::MAX);
        Size::new(width, 1)
    }
}

/// A panel of content shown while its tab is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabPanel {
    pub(crate) id: ElementId,
    pub(crate) name: String,
    pub(crate) active: bool,
    pub(crate) labelled_by: Option<ElementId>,
}

impl TabPanel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ElementId::new(),
            name: name.into(),
            active: false,
            labelled_by: None,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The tab that labels this panel for assistive technology.
    pub fn labelled_by(&self) -> Option<ElementId> {
        self.labelled_by
    }
}
