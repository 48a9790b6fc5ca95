//! Test doubles shared by the overlay tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use foundation::bounds::GeoBounds;
use foundation::math::GeoPoint;
use poi::{BoxFuture, FetchError, PoiBatch, PoiRecord, PoiSource};

/// Answers lookups from a script; an exhausted script answers with no POIs.
#[derive(Default)]
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Result<PoiBatch, FetchError>>>,
    requests: Mutex<Vec<GeoBounds>>,
}

impl ScriptedSource {
    pub fn new(responses: Vec<Result<PoiBatch, FetchError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::default(),
        }
    }

    pub fn requests(&self) -> Vec<GeoBounds> {
        self.requests.lock().unwrap().clone()
    }
}

impl PoiSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    fn fetch(&self, bounds: GeoBounds) -> BoxFuture<'_, Result<PoiBatch, FetchError>> {
        self.requests.lock().unwrap().push(bounds);
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(PoiBatch::default()));
        Box::pin(async move { response })
    }
}

/// Scripted answers that each take `delay` to arrive.
pub struct DelayedSource {
    inner: ScriptedSource,
    delay: Duration,
}

impl DelayedSource {
    pub fn new(responses: Vec<Result<PoiBatch, FetchError>>, delay: Duration) -> Self {
        Self {
            inner: ScriptedSource::new(responses),
            delay,
        }
    }

    pub fn requests(&self) -> Vec<GeoBounds> {
        self.inner.requests()
    }
}

impl PoiSource for DelayedSource {
    fn name(&self) -> &str {
        "delayed"
    }

    fn fetch(&self, bounds: GeoBounds) -> BoxFuture<'_, Result<PoiBatch, FetchError>> {
        let response = self.inner.fetch(bounds);
        let delay = self.delay;
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            response.await
        })
    }
}

pub fn batch(ids: &[&str]) -> PoiBatch {
    PoiBatch {
        records: ids
            .iter()
            .enumerate()
            .map(|(i, id)| PoiRecord::new(*id, GeoPoint::new(10.0 + i as f64 * 0.001, 20.0)))
            .collect(),
        skipped_geometry: 0,
    }
}
