use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

/// Identifier returned when a handler is added to a [`HandlerList`].
pub type HandlerId = u32;

/// A notification handler.
///
/// Handlers are reference counted and `!Send`: notifications are raised and
/// observed on a single thread.
pub type Handler<A> = Rc<dyn Fn(&A)>;

/// The subscriber list behind one notification channel of a source.
///
/// Sources embed a `HandlerList` per event and forward
/// [`EventSource`](crate::EventSource) calls to it. Handlers are invoked in
/// subscription order. `raise` snapshots the list before invoking, so a
/// handler may add or remove handlers (or raise again) without invalidating
/// the iteration in progress.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use event_assert::HandlerList;
///
/// let clicks: HandlerList<u32> = HandlerList::new();
/// let id = clicks.add(Rc::new(|n: &u32| println!("clicked {n} times")));
/// clicks.raise(&1);
/// assert_eq!(clicks.len(), 1);
/// assert!(clicks.remove(id));
/// assert!(clicks.is_empty());
/// ```
pub struct HandlerList<A> {
    handlers: RefCell<Vec<(HandlerId, Handler<A>)>>,
    last_id: Cell<HandlerId>,
}

impl<A> HandlerList<A> {
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
            last_id: Cell::new(0),
        }
    }

    /// Append a handler and return its id.
    pub fn add(&self, handler: Handler<A>) -> HandlerId {
        let id = self.last_id.get();
        self.last_id.set(id.wrapping_add(1));
        self.handlers.borrow_mut().push((id, handler));
        id
    }

    /// Remove the handler with the given id.
    ///
    /// Returns `false` if no such handler is registered.
    pub fn remove(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        match handlers.iter().position(|(h, _)| *h == id) {
            Some(index) => {
                handlers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Invoke every registered handler with `args`.
    pub fn raise(&self, args: &A) {
        let snapshot: Vec<Handler<A>> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in snapshot {
            handler(args);
        }
    }

    /// Returns the number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.borrow().is_empty()
    }
}

impl<A> Default for HandlerList<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for HandlerList<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerList")
            .field("handlers.len()", &self.len())
            .field("last_id", &self.last_id.get())
            .finish()
    }
}
