use crate::{Factory, GetError, ObjectId, Poolable, Pooled, ReturnError};
use crossbeam_queue::ArrayQueue;
use parking_lot::Mutex;
use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(0);

/// In-use bookkeeping of a pool, indexed by arena slot.
struct Ledger {
    checked_out: Vec<bool>,
    in_use: usize,
    created: usize,
    // Slots whose object was lost to a panicking reset.
    vacant: Vec<usize>,
}

impl Ledger {
    fn new(capacity: usize) -> Self {
        Ledger {
            checked_out: vec![false; capacity],
            in_use: 0,
            created: 0,
            vacant: Vec::new(),
        }
    }

    fn next_slot(&mut self) -> usize {
        if let Some(slot) = self.vacant.pop() {
            return slot;
        }
        let slot = self.created;
        self.created += 1;
        slot
    }

    fn is_checked_out(&self, slot: usize) -> bool {
        self.checked_out.get(slot).copied().unwrap_or(false)
    }

    fn check_out(&mut self, slot: usize) {
        debug_assert!(!self.checked_out[slot], "slot {slot} is already in use");
        self.checked_out[slot] = true;
        self.in_use += 1;
    }

    fn check_in(&mut self, slot: usize) {
        debug_assert!(self.checked_out[slot], "slot {slot} is not in use");
        self.checked_out[slot] = false;
        self.in_use -= 1;
    }

    fn vacate(&mut self, slot: usize) {
        self.check_in(slot);
        self.vacant.push(slot);
    }
}

/// A fixed-capacity object pool.
///
/// The pool hands out at most `capacity` objects at a time. Objects are
/// created lazily by the [`Factory`] and recycled in FIFO order once they
/// are handed back with [`Pool::put`], which resets them first. When every
/// object is checked out, [`Pool::get`] fails immediately with
/// [`GetError::CapacityExhausted`] instead of waiting.
///
/// All bookkeeping happens under a single lock, so a pool can be shared
/// between threads.
pub struct Pool<F: Factory> {
    id: u64,
    factory: F,
    idle: ArrayQueue<Pooled<F::Object>>,
    ledger: Mutex<Ledger>,
}

impl<F: Factory> Pool<F> {
    /// Creates a new pool with a given capacity and factory.
    ///
    /// Unlike [`Self::new_prefilled`], this method does not create any
    /// object up front.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize, factory: F) -> Self {
        assert!(capacity > 0, "pool capacity must be non-zero");
        let id = NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(pool = id, capacity, "created fixed pool");
        Pool {
            id,
            factory,
            idle: ArrayQueue::new(capacity),
            ledger: Mutex::new(Ledger::new(capacity)),
        }
    }

    /// Creates a new pool and immediately fills it with `capacity` objects
    /// created by the factory.
    ///
    /// The first factory error aborts construction and is returned.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new_prefilled(capacity: usize, factory: F) -> Result<Self, F::Error> {
        let pool = Self::new(capacity, factory);
        {
            let mut ledger = pool.ledger.lock();
            for _ in 0..capacity {
                let obj = pool.factory.create()?;
                let id = ObjectId {
                    pool: pool.id,
                    slot: ledger.next_slot(),
                };
                pool.push_idle(Pooled::new(id, obj));
            }
        }
        Ok(pool)
    }

    /// Wraps the pool with an atomic reference counter, enabling the use of
    /// [`Self::lease_rc`].
    pub fn to_rc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Gets an object from the pool.
    ///
    /// An idle object is recycled if there is one. Otherwise a new object
    /// is created with the factory, as long as fewer than `capacity`
    /// objects are checked out. A factory error is returned as
    /// [`GetError::Factory`] and leaves the pool untouched.
    pub fn get(&self) -> Result<Pooled<F::Object>, GetError<F::Error>> {
        let mut ledger = self.ledger.lock();

        if let Some(obj) = self.idle.pop() {
            ledger.check_out(obj.id().slot);
            tracing::trace!(pool = self.id, slot = obj.id().slot, "recycled idle object");
            return Ok(obj);
        }

        if ledger.in_use >= self.capacity() {
            tracing::debug!(
                pool = self.id,
                capacity = self.capacity(),
                "fixed pool reached maximum capacity"
            );
            return Err(GetError::CapacityExhausted {
                capacity: self.capacity(),
            });
        }

        let obj = match self.factory.create() {
            Ok(obj) => obj,
            Err(err) => {
                tracing::warn!(pool = self.id, "factory failed to create a pooled object");
                return Err(GetError::Factory(err));
            }
        };
        let id = ObjectId {
            pool: self.id,
            slot: ledger.next_slot(),
        };
        ledger.check_out(id.slot);
        tracing::debug!(pool = self.id, slot = id.slot, "created pooled object");
        Ok(Pooled::new(id, obj))
    }

    /// Hands an object back to the pool.
    ///
    /// The object is reset and becomes idle. A handle that does not belong
    /// to this pool's in-use objects is rejected with a [`ReturnError`]
    /// that gives the handle back, without resetting it.
    ///
    /// If [`Poolable::reset`] panics, the object is dropped and the panic is
    /// resumed. Its slot is freed, so the pool keeps its full capacity.
    pub fn put(&self, mut obj: Pooled<F::Object>) -> Result<(), ReturnError<F::Object>> {
        let id = obj.id();
        if id.pool != self.id {
            tracing::warn!(pool = self.id, owner = id.pool, "rejected object from another pool");
            return Err(ReturnError(obj));
        }

        let mut ledger = self.ledger.lock();
        if !ledger.is_checked_out(id.slot) {
            tracing::warn!(pool = self.id, slot = id.slot, "rejected object that is not in use");
            return Err(ReturnError(obj));
        }

        // A panicking reset loses the object, its slot is handed to the next
        // object the factory creates.
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| obj.reset())) {
            tracing::warn!(pool = self.id, slot = id.slot, "reset panicked, object discarded");
            ledger.vacate(id.slot);
            drop(ledger);
            panic::resume_unwind(payload);
        }
        ledger.check_in(id.slot);
        self.push_idle(obj);
        tracing::trace!(pool = self.id, slot = id.slot, "object returned to pool");
        Ok(())
    }

    /// Gets the factory used to create new objects.
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Gets the capacity of the pool, the maximum number of objects that
    /// can be checked out at once.
    pub fn capacity(&self) -> usize {
        self.idle.capacity()
    }

    /// Gets the number of idle objects, ready to be recycled.
    pub fn idle(&self) -> usize {
        let _ledger = self.ledger.lock();
        self.idle.len()
    }

    /// Gets the number of objects currently checked out.
    ///
    /// Objects detached with [`Pooled::into_inner`] keep counting as in use.
    pub fn in_use(&self) -> usize {
        self.ledger.lock().in_use
    }

    /// Returns `true` if the next [`Self::get`] would fail with
    /// [`GetError::CapacityExhausted`].
    pub fn is_exhausted(&self) -> bool {
        let ledger = self.ledger.lock();
        self.idle.is_empty() && ledger.in_use >= self.capacity()
    }

    // Callers must hold the ledger lock.
    fn push_idle(&self, obj: Pooled<F::Object>) {
        if self.idle.push(obj).is_err() {
            unreachable!("idle storage is sized to the pool capacity");
        }
    }
}

impl<F: Factory> fmt::Debug for Pool<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ledger = self.ledger.lock();
        f.debug_struct("Pool")
            .field("id", &self.id)
            .field("capacity", &self.capacity())
            .field("idle", &self.idle.len())
            .field("in_use", &ledger.in_use)
            .finish()
    }
}
