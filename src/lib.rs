//! Bridges a window's remote application menu onto local panel entries.
//!
//! One [`WindowMenus`] instance per tracked window follows the remote menu
//! tree through realization, property updates and teardown, and publishes
//! the resulting menu-bar entries through [`WindowMenuProvider`]. The
//! remote tree protocol ([`MenuClient`], [`SessionBus`]) and the rendering
//! toolkit ([`Toolkit`]) are trait seams; plug in your transport and
//! widget set.

pub mod entry;
pub mod provider;
pub mod remote;
pub mod signal;
pub mod synchronizer;
pub mod toolkit;

pub use entry::MenuEntry;
pub use provider::{
    A11yEvent, EntryEvent, ErrorStateEvent, MenuStatus, ProviderSignals, ShowMenuEvent,
    StatusEvent, WindowMenuProvider, ENTRY_NOT_FOUND,
};
pub use remote::{ItemId, MenuClient, PropertiesWatch, SessionBus, TreeEvent};
pub use signal::{HandlerId, Signal};
pub use synchronizer::{DestroyEvent, WindowMenus};
pub use toolkit::{LabelSpec, LabelWidget, SubmenuWidget, Toolkit};
