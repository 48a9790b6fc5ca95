use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use foundation::bounds::GeoBounds;

use crate::error::FetchError;
use crate::geojson::PoiBatch;

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Anything that can answer "which POIs are inside this box?".
///
/// Methods return boxed futures for dyn-compatibility.
pub trait PoiSource: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// One lookup for `bounds`. Either every record of the response is
    /// returned or an error is; there is no partial result.
    fn fetch(&self, bounds: GeoBounds) -> BoxFuture<'_, Result<PoiBatch, FetchError>>;
}

impl<T: PoiSource + ?Sized> PoiSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&self, bounds: GeoBounds) -> BoxFuture<'_, Result<PoiBatch, FetchError>> {
        (**self).fetch(bounds)
    }
}

impl<T: PoiSource + ?Sized> PoiSource for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&self, bounds: GeoBounds) -> BoxFuture<'_, Result<PoiBatch, FetchError>> {
        (**self).fetch(bounds)
    }
}
