use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::entry::MenuEntry;
use crate::signal::Signal;

/// Sentinel returned by [`WindowMenuProvider::entry_location`]'s default
/// implementation when the entry is unknown.
pub const ENTRY_NOT_FOUND: u32 = u32::MAX;

/// Connectivity status of a window-menu source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MenuStatus {
    #[default]
    Normal,
    Active,
}

/// Payload for entry-added and entry-removed notifications.
///
/// `flag` is carried for interface compatibility and is always emitted as
/// `true`; consumers are not expected to read it.
#[derive(Clone, Debug)]
pub struct EntryEvent {
    pub entry: Arc<MenuEntry>,
    pub flag: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct ErrorStateEvent {
    pub error: bool,
    pub flag: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct StatusEvent {
    pub status: MenuStatus,
}

#[derive(Clone, Debug)]
pub struct ShowMenuEvent {
    pub entry: Arc<MenuEntry>,
    pub timestamp: u32,
}

#[derive(Clone, Debug)]
pub struct A11yEvent {
    pub entry: Arc<MenuEntry>,
}

/// The event vocabulary of a window-menu source.
///
/// Only concrete implementations fire these; the interface layer supplies
/// the broadcast mechanism. Delivery is synchronous, in registration
/// order, on the emitter's stack.
#[derive(Default)]
pub struct ProviderSignals {
    pub entry_added: Signal<EntryEvent>,
    pub entry_removed: Signal<EntryEvent>,
    pub error_state: Signal<ErrorStateEvent>,
    pub status_changed: Signal<StatusEvent>,
    pub show_menu: Signal<ShowMenuEvent>,
    pub a11y_update: Signal<A11yEvent>,
}

/// Capability set every window-menu source exposes to the panel.
///
/// Every method has a neutral default, so a source only implements what
/// it supports. The one deliberate asymmetry: an unimplemented
/// [`error_state`](Self::error_state) answers `true` — a source is
/// assumed broken until it proves otherwise.
pub trait WindowMenuProvider {
    /// The source's broadcast channels. Observers connect here.
    fn signals(&self) -> &ProviderSignals;

    /// Entries currently on offer, in order.
    fn entries(&self) -> Vec<Arc<MenuEntry>> {
        Vec::new()
    }

    /// Position of `entry`, or [`ENTRY_NOT_FOUND`].
    fn entry_location(&self, _entry: &Arc<MenuEntry>) -> u32 {
        ENTRY_NOT_FOUND
    }

    /// OS-level window this menu belongs to.
    fn window_id(&self) -> Option<u32> {
        None
    }

    fn error_state(&self) -> bool {
        true
    }

    fn status(&self) -> MenuStatus {
        MenuStatus::Normal
    }

    fn entry_restore(&self, _entry: &Arc<MenuEntry>) {}

    fn entry_activate(&self, _entry: &Arc<MenuEntry>, _timestamp: u32) {}
}
