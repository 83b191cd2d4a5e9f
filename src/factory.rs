use std::collections::VecDeque;

/// An object that can be recycled by a [`Pool`](crate::Pool).
///
/// The pool calls [`Poolable::reset`] every time an object is handed back,
/// before it becomes available to the next caller.
pub trait Poolable {
    /// Returns the object to a state indistinguishable from a freshly
    /// created one.
    fn reset(&mut self);
}

/// A trait defining how a pool creates new objects.
///
/// Any closure returning `Result<T, E>` where `T: Poolable` is a factory:
///
/// ```
/// use fixed_pool::Pool;
///
/// let pool = Pool::new(4, || Ok::<_, std::io::Error>(Vec::<u8>::with_capacity(64)));
/// assert!(pool.get().is_ok());
/// ```
pub trait Factory {
    /// The type of object produced by this factory.
    type Object: Poolable;

    /// The error returned when creation fails.
    type Error;

    /// Creates a new object.
    ///
    /// Errors are handed back verbatim to the caller of
    /// [`Pool::get`](crate::Pool::get).
    fn create(&self) -> Result<Self::Object, Self::Error>;
}

impl<T, E, C> Factory for C
where
    T: Poolable,
    C: Fn() -> Result<T, E>,
{
    type Object = T;
    type Error = E;

    #[inline(always)]
    fn create(&self) -> Result<T, E> {
        self()
    }
}

impl<T> Poolable for Vec<T> {
    #[inline(always)]
    fn reset(&mut self) {
        self.clear()
    }
}

impl<T> Poolable for VecDeque<T> {
    #[inline(always)]
    fn reset(&mut self) {
        self.clear()
    }
}

impl Poolable for String {
    #[inline(always)]
    fn reset(&mut self) {
        self.clear()
    }
}
