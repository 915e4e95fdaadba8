//! # Function-backed task (`TaskFn`)
//!
//! [`TaskFn`] wraps a closure `F: Fn(A) -> Fut`, producing a fresh future per
//! invocation. State shared between invocations must be captured explicitly
//! (`Arc<...>`) inside the closure.
//!
//! ## Example
//! ```rust
//! use taskslot::{TaskFn, TaskRef};
//!
//! let add: TaskRef<(u32, u32), u32, String> =
//!     TaskFn::arc("add", |(a, b): (u32, u32)| async move { Ok::<_, String>(a + b) });
//!
//! assert_eq!(add.name(), "add");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use crate::tasks::task::{BoxTaskFuture, Task};

/// Function-backed task implementation.
#[derive(Debug)]
pub struct TaskFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new function-backed task.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the task and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<A, T, E, F, Fut> Task<A, T, E> for TaskFn<F>
where
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self, args: A) -> BoxTaskFuture<T, E> {
        Box::pin((self.f)(args))
    }
}
