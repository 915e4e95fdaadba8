//! # Supplied async function abstraction.
//!
//! A [`Task`] is the unit of work a [`Controller`](crate::Controller) invokes on
//! every accepted `resolve`. It takes the caller's arguments by value and returns a
//! fresh boxed future; the controller treats arguments, value and error types as
//! opaque.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by [`Task::invoke`].
pub type BoxTaskFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'static>>;

/// Shared handle to a task (`Arc<dyn Task<A, T, E>>`).
pub type TaskRef<A, T, E> = Arc<dyn Task<A, T, E>>;

/// # Asynchronous unit invoked by a controller.
///
/// # Example
/// ```
/// use taskslot::{BoxTaskFuture, Task};
///
/// struct Double;
///
/// impl Task<u32, u32, String> for Double {
///     fn name(&self) -> &str { "double" }
///
///     fn invoke(&self, n: u32) -> BoxTaskFuture<u32, String> {
///         Box::pin(async move { Ok(n * 2) })
///     }
/// }
/// ```
pub trait Task<A, T, E>: Send + Sync + 'static {
    /// Returns a stable, human-readable name.
    fn name(&self) -> &str;

    /// Creates the future for one invocation.
    fn invoke(&self, args: A) -> BoxTaskFuture<T, E>;
}
