#[cfg(feature = "reqwest-transport")]
pub(crate) mod http;

#[cfg(feature = "reqwest-transport")]
pub use self::http::HttpTransport;

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed future returned by [`Transport`] implementations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The channel used to reach the platform API.
///
/// This trait is object-safe and uses boxed futures. The default
/// implementation is [`HttpTransport`] (enabled via the `reqwest-transport`
/// feature). Implement it to route calls elsewhere, e.g. an in-memory fake
/// in tests.
///
/// # Example
///
/// ```rust
/// use whisk::transport::{BoxFuture, Transport};
///
/// #[derive(Debug)]
/// struct Echo;
///
/// impl Transport for Echo {
///     fn post(&self, _path: &str, body: Vec<u8>) -> BoxFuture<'_, whisk::Result<Vec<u8>>> {
///         Box::pin(async move { Ok(body) })
///     }
/// }
/// ```
pub trait Transport: Send + Sync + Debug {
    /// POST a JSON `body` to `path` (relative to the API host, query
    /// included) and return the raw response body.
    ///
    /// An `Err` means no usable response arrived at all. Non-success HTTP
    /// statuses still return their body, which the caller interprets.
    fn post(&self, path: &str, body: Vec<u8>) -> BoxFuture<'_, crate::Result<Vec<u8>>>;
}

/// A cloneable, type-erased transport handle.
pub type DynTransport = Arc<dyn Transport>;
