use std::fmt;

/// Handle returned by a subscription, used to remove it again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// The observable state changes of a ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LedgerEventKind {
    /// A value became the new last element. Payload: the value.
    Append,
    /// The list was emptied. Payload: the full pre-clear contents.
    Clear,
}

impl fmt::Display for LedgerEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Append => "append",
            Self::Clear => "clear",
        };
        write!(f, "{s}")
    }
}

type AppendListener<T> = Box<dyn FnMut(&T)>;
type ClearListener<T> = Box<dyn FnMut(&[T])>;

/// Per-instance listener registry.
///
/// Listeners run synchronously, in registration order, at the moment the
/// change becomes visible through `get()`. They receive borrowed data and
/// cannot reach back into the ledger that notified them.
pub(crate) struct Subscriptions<T> {
    next_id: u64,
    append: Vec<(SubscriptionId, AppendListener<T>)>,
    clear: Vec<(SubscriptionId, ClearListener<T>)>,
}

impl<T> Subscriptions<T> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            append: Vec::new(),
            clear: Vec::new(),
        }
    }

    fn allocate(&mut self) -> SubscriptionId {
        self.next_id += 1;
        SubscriptionId(self.next_id)
    }

    pub(crate) fn on_append(&mut self, listener: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = self.allocate();
        self.append.push((id, Box::new(listener)));
        id
    }

    pub(crate) fn on_clear(&mut self, listener: impl FnMut(&[T]) + 'static) -> SubscriptionId {
        let id = self.allocate();
        self.clear.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener of either kind. Returns `true` if it was registered.
    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.append.len() + self.clear.len();
        self.append.retain(|(sid, _)| *sid != id);
        self.clear.retain(|(sid, _)| *sid != id);
        before != self.append.len() + self.clear.len()
    }

    pub(crate) fn emit_append(&mut self, value: &T) {
        for (_, listener) in self.append.iter_mut() {
            listener(value);
        }
    }

    pub(crate) fn emit_clear(&mut self, values: &[T]) {
        for (_, listener) in self.clear.iter_mut() {
            listener(values);
        }
    }

    pub(crate) fn count(&self, kind: LedgerEventKind) -> usize {
        match kind {
            LedgerEventKind::Append => self.append.len(),
            LedgerEventKind::Clear => self.clear.len(),
        }
    }
}
