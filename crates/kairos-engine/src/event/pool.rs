use parking_lot::{Mutex, MutexGuard};

/// Thread-safe event queue with transactional consumption.
///
/// Producers call [`add`](Self::add) from any thread. A single consumer opens a
/// [`Consumption`] with [`begin_consume`](Self::begin_consume), reads events in
/// arrival order, then ends it; consumed events are removed and anything left
/// unread stays queued, in order, for the next transaction.
///
/// ```
/// use kairos_engine::event::EventPool;
///
/// let pool = EventPool::new();
/// pool.add(65);
/// pool.add(66);
///
/// let mut tx = pool.begin_consume();
/// let mut c = 0;
/// while tx.consume(&mut c) {
///     println!("got character with code: {c}");
/// }
/// tx.end_consume();
///
/// assert!(pool.is_empty());
/// ```
///
/// # Locking
///
/// The pool lock is held for the whole transaction, so producers block in
/// `add` until the consumer ends it. Keep the work between `begin_consume` and
/// `end_consume` short.
///
/// # Deadlocks
///
/// Calling `begin_consume` (or `add`) on a pool while the same thread already
/// holds one of its transactions deadlocks. Only one transaction per pool may
/// be open at a time; other threads calling `begin_consume` wait for it.
///
/// # Growth
///
/// The queue is unbounded. A producer that outpaces its consumer grows it
/// without limit.
#[derive(Debug)]
pub struct EventPool<T> {
    events: Mutex<Vec<T>>,
}

impl<T> EventPool<T> {
    pub fn new() -> Self {
        Self { events: Mutex::new(Vec::new()) }
    }

    /// Creates a pool with room for `capacity` events before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { events: Mutex::new(Vec::with_capacity(capacity)) }
    }

    /// Appends `item` to the tail of the queue.
    ///
    /// Blocks while a transaction is open.
    pub fn add(&self, item: T) {
        self.events.lock().push(item);
    }

    /// Opens a consumption transaction over every event queued right now.
    ///
    /// Blocks until the pool lock is available. The lock is released when the
    /// returned guard is ended or dropped.
    pub fn begin_consume(&self) -> Consumption<'_, T> {
        let events = self.events.lock();
        let tail = events.len();
        Consumption { events, cursor: 0, tail }
    }

    /// Number of queued events. Blocks while a transaction is open.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for EventPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// An open consumption transaction on an [`EventPool`].
///
/// Holds the pool lock from `begin_consume` until [`end_consume`](Self::end_consume)
/// or drop. Ending the transaction removes the consumed prefix; when every
/// event was consumed the backing storage is cleared in one step.
///
/// Dropping the guard ends the transaction, so early returns and panics inside
/// the consumer loop still release the lock.
#[must_use = "dropping a transaction ends it immediately"]
pub struct Consumption<'a, T> {
    events: MutexGuard<'a, Vec<T>>,
    cursor: usize,
    tail: usize,
}

impl<T: Clone> Consumption<'_, T> {
    /// Copies the next event into `out` and returns `true`, or returns `false`
    /// without touching `out` once this transaction's events are exhausted.
    ///
    /// Exhaustion is final for the transaction; a new transaction sees events
    /// added after this one ends.
    pub fn consume(&mut self, out: &mut T) -> bool {
        match self.next() {
            Some(item) => {
                *out = item;
                true
            }
            None => false,
        }
    }
}

impl<T> Consumption<'_, T> {
    /// Events consumed so far in this transaction.
    pub fn consumed(&self) -> usize {
        self.cursor
    }

    /// Events still readable in this transaction.
    pub fn remaining(&self) -> usize {
        self.tail - self.cursor
    }

    /// Removes the consumed events and releases the pool lock.
    pub fn end_consume(self) {}

    fn finish(&mut self) {
        if self.cursor == self.events.len() {
            self.events.clear();
        } else if self.cursor > 0 {
            self.events.drain(..self.cursor);
        }
    }
}

impl<T: Clone> Iterator for Consumption<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.cursor >= self.tail {
            return None;
        }

        let item = self.events[self.cursor].clone();
        self.cursor += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl<T: Clone> ExactSizeIterator for Consumption<'_, T> {}

impl<T> Drop for Consumption<'_, T> {
    fn drop(&mut self) {
        let consumed = self.cursor;
        self.finish();
        log::trace!("event pool: consumed {consumed}, {} left queued", self.events.len());
    }
}

impl<T> std::fmt::Debug for Consumption<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Consumption")
            .field("cursor", &self.cursor)
            .field("tail", &self.tail)
            .finish()
    }
}
