use std::sync::Arc;

/// A panel label widget for one menu-bar entry.
///
/// Implement this for your rendering toolkit's label type. All methods
/// take `&self`; widget handles are expected to carry their own interior
/// mutability.
pub trait LabelWidget: Send + Sync {
    fn set_text(&self, spec: &LabelSpec);
    fn show(&self);
    fn hide(&self);
    fn set_sensitive(&self, sensitive: bool);
}

/// A submenu widget the panel can re-parent under its own menu bar.
pub trait SubmenuWidget: Send + Sync {
    /// Detach from whatever transient container currently holds the menu.
    fn detach(&self);
}

/// Factory side of the rendering toolkit.
pub trait Toolkit: Send + Sync {
    fn create_label(&self, spec: &LabelSpec) -> Arc<dyn LabelWidget>;
}

/// Display text plus the mnemonic extracted from the `_` marker convention
/// used by remote menu labels: a single `_` marks the following character
/// as the mnemonic (first marker wins), `__` is a literal underscore, and
/// a trailing lone `_` is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSpec {
    pub text: String,
    pub mnemonic: Option<char>,
}

impl LabelSpec {
    pub fn parse(raw: &str) -> Self {
        let mut text = String::with_capacity(raw.len());
        let mut mnemonic = None;
        let mut chars = raw.chars();

        while let Some(c) = chars.next() {
            if c != '_' {
                text.push(c);
                continue;
            }
            match chars.next() {
                Some('_') => text.push('_'),
                Some(marked) => {
                    if mnemonic.is_none() {
                        mnemonic = Some(marked);
                    }
                    text.push(marked);
                }
                None => {}
            }
        }

        LabelSpec { text, mnemonic }
    }
}
