use std::sync::Arc;

use parking_lot::Mutex;

/// Identifies one connected handler on a [`Signal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Synchronous observer fan-out for a single event type.
///
/// Handlers run on the emitter's call stack, in connection order. The
/// handler list is snapshotted before an emission, so a handler may
/// connect or disconnect (including itself) while the signal is firing;
/// handlers connected during an emission first see the next one.
pub struct Signal<E> {
    inner: Mutex<SignalInner<E>>,
}

struct SignalInner<E> {
    handlers: Vec<(HandlerId, Handler<E>)>,
    next_id: u64,
}

impl<E> Default for Signal<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Signal<E> {
    pub fn new() -> Self {
        Signal {
            inner: Mutex::new(SignalInner {
                handlers: Vec::new(),
                next_id: 0,
            }),
        }
    }

    /// Register a handler, returning an id usable with [`disconnect`](Self::disconnect).
    pub fn connect(&self, handler: impl Fn(&E) + Send + Sync + 'static) -> HandlerId {
        let mut inner = self.inner.lock();
        let id = HandlerId(inner.next_id);
        inner.next_id += 1;
        inner.handlers.push((id, Arc::new(handler)));
        id
    }

    /// Remove a handler. Returns false if the id was not connected.
    pub fn disconnect(&self, id: HandlerId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.handlers.len();
        inner.handlers.retain(|(hid, _)| *hid != id);
        inner.handlers.len() != before
    }

    /// Invoke every connected handler with `event`, in connection order.
    pub fn emit(&self, event: &E) {
        let handlers: Vec<Handler<E>> = self
            .inner
            .lock()
            .handlers
            .iter()
            .map(|(_, h)| h.clone())
            .collect();
        for handler in handlers {
            handler(event);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.inner.lock().handlers.len()
    }
}
