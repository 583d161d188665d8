use std::fmt;
use std::sync::Arc;

use crate::toolkit::{LabelWidget, SubmenuWidget};

/// A realized menu item, ready for the panel to display.
///
/// Entries are built only once the realization protocol completes: the
/// label widget, the submenu decision and the property subscription are
/// all established before an entry enters the sequence. Shared as
/// `Arc<MenuEntry>`; identity is pointer identity.
pub struct MenuEntry {
    label: Arc<dyn LabelWidget>,
    submenu: Option<Arc<dyn SubmenuWidget>>,
}

impl MenuEntry {
    pub(crate) fn new(
        label: Arc<dyn LabelWidget>,
        submenu: Option<Arc<dyn SubmenuWidget>>,
    ) -> Arc<Self> {
        Arc::new(MenuEntry { label, submenu })
    }

    pub fn label(&self) -> &Arc<dyn LabelWidget> {
        &self.label
    }

    /// The entry's submenu, if the remote item exposed one by the time it
    /// was finalized.
    pub fn submenu(&self) -> Option<&Arc<dyn SubmenuWidget>> {
        self.submenu.as_ref()
    }
}

impl fmt::Debug for MenuEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuEntry")
            .field("has_submenu", &self.submenu.is_some())
            .finish()
    }
}
