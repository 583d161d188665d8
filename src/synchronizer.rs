use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, warn};
use parking_lot::Mutex;

use crate::entry::MenuEntry;
use crate::provider::{EntryEvent, ProviderSignals, WindowMenuProvider};
use crate::remote::{
    ItemId, MenuClient, PropertiesWatch, SessionBus, TreeEvent, PROP_ENABLED, PROP_LABEL,
    PROP_VISIBLE,
};
use crate::signal::{HandlerId, Signal};
use crate::toolkit::{LabelSpec, Toolkit};

/// Payload of the synchronizer's destroy notification. `flag` is carried
/// for interface compatibility and is always `true`.
#[derive(Clone, Copy, Debug)]
pub struct DestroyEvent {
    pub flag: bool,
}

/// Realization progress for one remote item that has not produced an
/// entry yet. Finalized and dropped items leave the pending map; those
/// are the only terminal states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    /// Waiting for the item's own realization.
    Subscribed,
    /// Realized without a submenu; waiting for its first child. Siblings
    /// of that child are not tracked.
    WaitingFirstChild { first_child: ItemId },
}

struct SyncState {
    client: Option<Arc<dyn MenuClient>>,
    props: Option<Box<dyn PropertiesWatch>>,
    entries: Vec<Arc<MenuEntry>>,
    pending: HashMap<ItemId, Pending>,
    watches: HashMap<ItemId, Arc<MenuEntry>>,
    root: Option<ItemId>,
}

/// Per-window synchronizer reconciling local entries with one window's
/// remote menu tree.
///
/// The transport adapter feeds remote notifications into
/// [`dispatch`](Self::dispatch) in emission order; each is processed to
/// completion before the next. Loss of the properties watch
/// ([`properties_destroyed`](Self::properties_destroyed)) tears the
/// synchronizer down; after that every operation is a no-op and every
/// accessor answers its neutral sentinel.
pub struct WindowMenus {
    window_id: u32,
    toolkit: Arc<dyn Toolkit>,
    state: Mutex<SyncState>,
    defunct: AtomicBool,
    signals: ProviderSignals,
    destroy: Signal<DestroyEvent>,
}

impl WindowMenus {
    /// Open the properties watch and menu-tree client for one window's
    /// menu publisher. Fails when the properties watch cannot be
    /// established; there is no partially-connected synchronizer.
    pub fn new(
        window_id: u32,
        bus_name: &str,
        object_path: &str,
        bus: &dyn SessionBus,
        toolkit: Arc<dyn Toolkit>,
    ) -> Result<Arc<Self>, String> {
        debug!(
            "creating window menus: 0x{:x}, {}, {}",
            window_id, bus_name, object_path
        );

        let props = match bus.properties_watch(bus_name, object_path) {
            Some(props) => props,
            None => {
                let msg = format!(
                    "unable to watch properties of '{}' object '{}'",
                    bus_name, object_path
                );
                warn!("{}", msg);
                return Err(msg);
            }
        };

        let client = bus.menu_client(bus_name, object_path);

        let menus = Arc::new(WindowMenus {
            window_id,
            toolkit,
            state: Mutex::new(SyncState {
                client: Some(client.clone()),
                props: Some(props),
                entries: Vec::new(),
                pending: HashMap::new(),
                watches: HashMap::new(),
                root: None,
            }),
            defunct: AtomicBool::new(false),
            signals: ProviderSignals::default(),
            destroy: Signal::new(),
        });

        // The root may have been published before we could subscribe;
        // handle it as if the change notification had just arrived.
        if let Some(root) = client.root() {
            menus.root_changed(Some(root));
        }

        Ok(menus)
    }

    /// Delivery point for remote menu-tree notifications.
    pub fn dispatch(&self, event: TreeEvent) {
        if self.defunct.load(Ordering::SeqCst) {
            return;
        }
        match event {
            TreeEvent::RootChanged { root } => self.root_changed(root),
            TreeEvent::ChildAdded { parent, child, .. } => {
                if self.is_current_root(parent) {
                    self.start_realization(child);
                } else {
                    debug!("child {:?} added under unsubscribed parent {:?}", child, parent);
                }
            }
            TreeEvent::ChildRemoved { parent, child } => {
                if self.is_current_root(parent) {
                    self.remove_last_entry();
                } else {
                    debug!(
                        "child {:?} removed under unsubscribed parent {:?}",
                        child, parent
                    );
                }
            }
            TreeEvent::ItemRealized { item } => self.item_realized(item),
            TreeEvent::PropertyChanged {
                item,
                property,
                value,
            } => self.property_changed(item, &property, &value),
        }
    }

    /// Delivery point for the properties watch reporting the remote side
    /// gone. The synchronizer tears itself down.
    pub fn properties_destroyed(&self) {
        debug!("properties watch lost for window 0x{:x}", self.window_id);
        self.shutdown();
    }

    /// Observe the destroy notification emitted during teardown.
    pub fn on_destroy(&self, handler: impl Fn(&DestroyEvent) + Send + Sync + 'static) -> HandlerId {
        self.destroy.connect(handler)
    }

    /// XID of the window this menu belongs to.
    pub fn xid(&self) -> u32 {
        self.window_id
    }

    /// Object path, queried from the live client connection. `None` once
    /// the synchronizer is torn down.
    pub fn path(&self) -> Option<String> {
        self.client().map(|c| c.object_path())
    }

    /// Bus address, queried from the live client connection. `None` once
    /// the synchronizer is torn down.
    pub fn address(&self) -> Option<String> {
        self.client().map(|c| c.bus_name())
    }

    fn client(&self) -> Option<Arc<dyn MenuClient>> {
        self.state.lock().client.clone()
    }

    fn is_current_root(&self, item: ItemId) -> bool {
        self.state.lock().root == Some(item)
    }

    fn root_changed(&self, new_root: Option<ItemId>) {
        // Drain the old entries, newest first. Anything mid-realization
        // belongs to the dead tree and must never append.
        let drained = {
            let mut state = self.state.lock();
            state.pending.clear();
            state.watches.clear();
            state.root = None;
            std::mem::take(&mut state.entries)
        };
        for entry in drained.into_iter().rev() {
            self.signals.entry_removed.emit(&EntryEvent { entry, flag: true });
        }

        let root = match new_root {
            Some(root) => root,
            None => {
                debug!("window 0x{:x} menu tree cleared", self.window_id);
                return;
            }
        };

        let client = match self.client() {
            Some(client) => client,
            None => return,
        };
        self.state.lock().root = Some(root);

        for child in client.children(root) {
            self.start_realization(child);
        }
    }

    /// Step one of the realization protocol: track the item and cover the
    /// case where it realized before we subscribed.
    fn start_realization(&self, item: ItemId) {
        let client = match self.client() {
            Some(client) => client,
            None => return,
        };

        self.state.lock().pending.insert(item, Pending::Subscribed);

        if client.is_realized(item) {
            self.item_realized(item);
        }
    }

    /// Route a realization notification: it may be for a tracked item
    /// itself, for the watched first child of one or more tracked items,
    /// or for nothing we care about.
    fn item_realized(&self, item: ItemId) {
        let (own, waiting_parents) = {
            let state = self.state.lock();
            let own = state.pending.get(&item) == Some(&Pending::Subscribed);
            let waiting_parents: Vec<ItemId> = state
                .pending
                .iter()
                .filter_map(|(&parent, pending)| match pending {
                    Pending::WaitingFirstChild { first_child } if *first_child == item => {
                        Some(parent)
                    }
                    _ => None,
                })
                .collect();
            (own, waiting_parents)
        };

        if !own && waiting_parents.is_empty() {
            debug!("realization of untracked item {:?} ignored", item);
            return;
        }

        if own {
            self.own_realized(item);
        }
        for parent in waiting_parents {
            self.finalize(parent);
        }
    }

    /// Step three: the item realized. Finalize if it already exposes a
    /// submenu, otherwise wait on its first child, otherwise drop it.
    fn own_realized(&self, item: ItemId) {
        let client = match self.client() {
            Some(client) => client,
            None => return,
        };

        if client.submenu(item).is_some() {
            self.finalize(item);
            return;
        }

        match client.children(item).first() {
            Some(&first_child) => {
                let mut state = self.state.lock();
                if state.pending.contains_key(&item) {
                    state
                        .pending
                        .insert(item, Pending::WaitingFirstChild { first_child });
                }
            }
            None => {
                warn!("menu item {:?} has no submenu and no children", item);
                self.state.lock().pending.remove(&item);
            }
        }
    }

    /// Step four: build the entry and append it. Uses whatever submenu
    /// the item exposes at this point, which may be none.
    fn finalize(&self, item: ItemId) {
        let client = match self.client() {
            Some(client) => client,
            None => return,
        };

        if self.state.lock().pending.remove(&item).is_none() {
            return;
        }

        let raw_label = client
            .property(item, PROP_LABEL)
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_default();
        let spec = LabelSpec::parse(&raw_label);
        let label = self.toolkit.create_label(&spec);

        let submenu = client.submenu(item);
        match &submenu {
            Some(menu) => menu.detach(),
            None => debug!("submenu for {:?} ({}) is unset", item, spec.text),
        }

        // Current property values. An unset visible means visible; an
        // unset enabled is left to the widget's own default.
        match client.property(item, PROP_VISIBLE).and_then(|v| v.as_bool()) {
            Some(false) => label.hide(),
            _ => label.show(),
        }
        if let Some(enabled) = client.property(item, PROP_ENABLED).and_then(|v| v.as_bool()) {
            label.set_sensitive(enabled);
        }

        let entry = MenuEntry::new(label, submenu);
        {
            let mut state = self.state.lock();
            state.watches.insert(item, entry.clone());
            state.entries.push(entry.clone());
        }
        self.signals.entry_added.emit(&EntryEvent { entry, flag: true });
    }

    // TODO: correlate the removed remote item to its local entry instead
    // of always dropping the newest one.
    fn remove_last_entry(&self) {
        let removed = self.state.lock().entries.pop();
        match removed {
            Some(entry) => {
                self.signals.entry_removed.emit(&EntryEvent { entry, flag: true });
            }
            None => debug!("child removal with no entries to drop"),
        }
    }

    fn property_changed(&self, item: ItemId, property: &str, value: &serde_json::Value) {
        let entry = match self.state.lock().watches.get(&item) {
            Some(entry) => entry.clone(),
            None => return,
        };

        match property {
            PROP_VISIBLE => match value.as_bool() {
                Some(true) => entry.label().show(),
                Some(false) => entry.label().hide(),
                None => debug!("non-boolean visible value for {:?}", item),
            },
            PROP_ENABLED => match value.as_bool() {
                Some(enabled) => entry.label().set_sensitive(enabled),
                None => debug!("non-boolean enabled value for {:?}", item),
            },
            PROP_LABEL => match value.as_str() {
                Some(text) => entry.label().set_text(&LabelSpec::parse(text)),
                None => debug!("non-string label value for {:?}", item),
            },
            _ => {}
        }
    }

    /// Emit the destroy notification, then release the connections, the
    /// remaining entries' widget holds and all tracking state. Idempotent.
    fn shutdown(&self) {
        if self.defunct.swap(true, Ordering::SeqCst) {
            return;
        }

        self.destroy.emit(&DestroyEvent { flag: true });

        let mut state = self.state.lock();
        state.props = None;
        state.client = None;
        state.entries.clear();
        state.pending.clear();
        state.watches.clear();
        state.root = None;
    }
}

impl Drop for WindowMenus {
    fn drop(&mut self) {
        debug!("window menus finalizing for 0x{:x}", self.window_id);
        self.shutdown();
    }
}

impl WindowMenuProvider for WindowMenus {
    fn signals(&self) -> &ProviderSignals {
        &self.signals
    }

    fn entries(&self) -> Vec<Arc<MenuEntry>> {
        self.state.lock().entries.clone()
    }

    /// Linear scan by identity. Absent entries report position zero,
    /// indistinguishable from the first slot; the panel's existing
    /// handling depends on that answer.
    fn entry_location(&self, entry: &Arc<MenuEntry>) -> u32 {
        self.state
            .lock()
            .entries
            .iter()
            .position(|e| Arc::ptr_eq(e, entry))
            .map(|i| i as u32)
            .unwrap_or(0)
    }

    fn window_id(&self) -> Option<u32> {
        Some(self.window_id)
    }

    /// Proven working while the properties watch holds; broken once it is
    /// lost.
    fn error_state(&self) -> bool {
        self.defunct.load(Ordering::SeqCst)
    }
}
