use crate::{Factory, GetError, ObjectId, Pool, Pooled};
use std::{
    fmt,
    ops::{Deref, DerefMut},
    sync::Arc,
};

impl<F: Factory> Pool<F> {
    /// Gets an object wrapped in a guard that hands it back to the pool when
    /// dropped.
    pub fn lease(&self) -> Result<Lease<'_, F>, GetError<F::Error>> {
        let obj = self.get()?;
        Ok(Lease {
            obj: Some(obj),
            pool: self,
        })
    }

    /// Gets an object wrapped in a guard that holds an arc reference to the
    /// owning pool. Such guards are not limited by the pool lifetime, so
    /// they are easier to move around, for example into other threads.
    pub fn lease_rc(self: Arc<Self>) -> Result<RcLease<F>, GetError<F::Error>> {
        let obj = self.get()?;
        Ok(RcLease {
            obj: Some(obj),
            pool: self,
        })
    }
}

/// A guard over an object checked out of a borrowed pool.
///
/// The object is returned to the pool when the guard is dropped.
pub struct Lease<'a, F: Factory> {
    // Only `None` after the object was moved out in `into_pooled`.
    obj: Option<Pooled<F::Object>>,
    pool: &'a Pool<F>,
}

impl<'a, F: Factory> Lease<'a, F> {
    /// Identity of the leased object.
    pub fn id(&self) -> ObjectId {
        self.pooled().id()
    }

    /// Consumes the guard and returns the plain handle. The object is no
    /// longer returned automatically; use [`Pool::put`] instead.
    pub fn into_pooled(mut self) -> Pooled<F::Object> {
        take(&mut self.obj)
    }

    /// Consumes the guard and returns the object, without returning it to
    /// the pool. See [`Pooled::into_inner`].
    pub fn into_inner(self) -> F::Object {
        self.into_pooled().into_inner()
    }

    fn pooled(&self) -> &Pooled<F::Object> {
        self.obj.as_ref().unwrap_or_else(|| moved())
    }
}

impl<'a, F: Factory> Deref for Lease<'a, F> {
    type Target = F::Object;
    #[inline(always)]
    fn deref(&self) -> &F::Object {
        self.pooled()
    }
}

impl<'a, F: Factory> DerefMut for Lease<'a, F> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut F::Object {
        self.obj.as_mut().unwrap_or_else(|| moved())
    }
}

impl<'a, F: Factory> Drop for Lease<'a, F> {
    fn drop(&mut self) {
        if let Some(obj) = self.obj.take() {
            // A lease always belongs to the pool it borrows.
            let returned = self.pool.put(obj);
            debug_assert!(returned.is_ok(), "leased object rejected by its own pool");
        }
    }
}

impl<'a, F: Factory> fmt::Debug for Lease<'a, F>
where
    F::Object: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.pooled(), f)
    }
}

/// A guard over an object checked out of a reference counted pool.
///
/// The object is returned to the pool when the guard is dropped.
pub struct RcLease<F: Factory> {
    obj: Option<Pooled<F::Object>>,
    pool: Arc<Pool<F>>,
}

impl<F: Factory> RcLease<F> {
    /// Identity of the leased object.
    pub fn id(&self) -> ObjectId {
        self.pooled().id()
    }

    /// The pool this object will be returned to.
    pub fn pool(&self) -> &Arc<Pool<F>> {
        &self.pool
    }

    /// Consumes the guard and returns the plain handle. The object is no
    /// longer returned automatically; use [`Pool::put`] instead.
    pub fn into_pooled(mut self) -> Pooled<F::Object> {
        take(&mut self.obj)
    }

    /// Consumes the guard and returns the object, without returning it to
    /// the pool. See [`Pooled::into_inner`].
    pub fn into_inner(self) -> F::Object {
        self.into_pooled().into_inner()
    }

    fn pooled(&self) -> &Pooled<F::Object> {
        self.obj.as_ref().unwrap_or_else(|| moved())
    }
}

impl<F: Factory> Deref for RcLease<F> {
    type Target = F::Object;
    #[inline(always)]
    fn deref(&self) -> &F::Object {
        self.pooled()
    }
}

impl<F: Factory> DerefMut for RcLease<F> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut F::Object {
        self.obj.as_mut().unwrap_or_else(|| moved())
    }
}

impl<F: Factory> Drop for RcLease<F> {
    fn drop(&mut self) {
        if let Some(obj) = self.obj.take() {
            let returned = self.pool.put(obj);
            debug_assert!(returned.is_ok(), "leased object rejected by its own pool");
        }
    }
}

impl<F: Factory> fmt::Debug for RcLease<F>
where
    F::Object: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.pooled(), f)
    }
}

fn take<T>(slot: &mut Option<Pooled<T>>) -> Pooled<T> {
    slot.take().unwrap_or_else(|| moved())
}

#[cold]
fn moved() -> ! {
    unreachable!("leased object was already moved out")
}
