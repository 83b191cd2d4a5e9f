use std::{
    borrow::{Borrow, BorrowMut},
    fmt,
    ops::{Deref, DerefMut},
};

/// Identity of a pooled object.
///
/// Made of the id of the pool that created the object and the arena slot the
/// object was assigned on creation. Two distinct objects never share an
/// `ObjectId`, even when they compare equal by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    pub(crate) pool: u64,
    pub(crate) slot: usize,
}

impl ObjectId {
    /// The arena slot of the object inside its pool, in `0..capacity`.
    pub fn slot(&self) -> usize {
        self.slot
    }
}

/// An object checked out of a [`Pool`](crate::Pool).
///
/// The handle is the only way to hand the object back with
/// [`Pool::put`](crate::Pool::put). It cannot be cloned, so the same object
/// can never be returned twice:
///
/// ```compile_fail
/// use fixed_pool::Pool;
///
/// let pool = Pool::new(1, || Ok::<_, ()>(String::new()));
/// let obj = pool.get().unwrap();
/// pool.put(obj).unwrap();
/// pool.put(obj).unwrap();
/// ```
///
/// Dropping a handle without returning it leaves its slot checked out.
pub struct Pooled<T> {
    id: ObjectId,
    obj: T,
}

impl<T> Pooled<T> {
    pub(crate) fn new(id: ObjectId, obj: T) -> Self {
        Pooled { id, obj }
    }

    /// Identity of the object, stable across recycling.
    #[inline(always)]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Consumes the handle and returns the object, detaching it from the
    /// pool.
    ///
    /// This method should be used with caution: the slot of the object is
    /// never reclaimed, so the pool permanently loses one unit of capacity.
    pub fn into_inner(self) -> T {
        tracing::debug!(
            pool = self.id.pool,
            slot = self.id.slot,
            "pooled object detached from its pool"
        );
        self.obj
    }
}

impl<T> Deref for Pooled<T> {
    type Target = T;
    #[inline(always)]
    fn deref(&self) -> &T {
        &self.obj
    }
}

impl<T> DerefMut for Pooled<T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.obj
    }
}

impl<T: fmt::Debug> fmt::Debug for Pooled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pooled")
            .field("id", &self.id)
            .field("obj", &self.obj)
            .finish()
    }
}
impl<T: fmt::Display> fmt::Display for Pooled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.obj, f)
    }
}
impl<T> fmt::Pointer for Pooled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&(&self.obj as *const T), f)
    }
}
impl<T> Borrow<T> for Pooled<T> {
    #[inline(always)]
    fn borrow(&self) -> &T {
        self
    }
}
impl<T> BorrowMut<T> for Pooled<T> {
    #[inline(always)]
    fn borrow_mut(&mut self) -> &mut T {
        self
    }
}
impl<T> AsRef<T> for Pooled<T> {
    #[inline(always)]
    fn as_ref(&self) -> &T {
        self
    }
}
impl<T> AsMut<T> for Pooled<T> {
    #[inline(always)]
    fn as_mut(&mut self) -> &mut T {
        self
    }
}
