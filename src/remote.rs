use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::toolkit::SubmenuWidget;

/// Correlation key for one item in the remote menu tree.
///
/// Items are never owned locally; the id is only compared, used to route
/// notifications and to key property subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u64);

/// Remote item property names of interest.
pub const PROP_VISIBLE: &str = "visible";
pub const PROP_ENABLED: &str = "enabled";
pub const PROP_LABEL: &str = "label";

/// Notifications pushed by the remote menu-tree client, delivered to
/// [`WindowMenus::dispatch`](crate::WindowMenus::dispatch) in the order
/// the remote side emitted them.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "type")]
pub enum TreeEvent {
    RootChanged {
        root: Option<ItemId>,
    },
    ChildAdded {
        parent: ItemId,
        child: ItemId,
        position: u32,
    },
    ChildRemoved {
        parent: ItemId,
        child: ItemId,
    },
    ItemRealized {
        item: ItemId,
    },
    PropertyChanged {
        item: ItemId,
        property: String,
        value: serde_json::Value,
    },
}

/// Pull-side view of the remote menu-tree client.
///
/// Answers are expected to reflect the connection's live state; the
/// synchronizer caches nothing it can ask for.
pub trait MenuClient: Send + Sync {
    /// Bus name of the connection, queried live.
    fn bus_name(&self) -> String;

    /// Object path of the connection, queried live.
    fn object_path(&self) -> String;

    fn root(&self) -> Option<ItemId>;

    /// Children of `item`, in the remote tree's order.
    fn children(&self, item: ItemId) -> Vec<ItemId>;

    /// Whether the toolkit already holds a concrete widget for this item,
    /// i.e. it realized before anyone subscribed.
    fn is_realized(&self, item: ItemId) -> bool;

    fn submenu(&self, item: ItemId) -> Option<Arc<dyn SubmenuWidget>>;

    /// Current value of a property, or `None` when unset.
    fn property(&self, item: ItemId, name: &str) -> Option<serde_json::Value>;
}

/// Handle to the remote properties watch. Dropping it releases the watch.
pub trait PropertiesWatch: Send + Sync {}

/// Session-bus access needed to reach a window's menu publisher.
pub trait SessionBus: Send + Sync {
    /// Start watching the publisher's properties object. `None` means the
    /// remote side could not be reached.
    fn properties_watch(
        &self,
        bus_name: &str,
        object_path: &str,
    ) -> Option<Box<dyn PropertiesWatch>>;

    fn menu_client(&self, bus_name: &str, object_path: &str) -> Arc<dyn MenuClient>;
}
