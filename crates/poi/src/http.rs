use foundation::bounds::GeoBounds;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::geojson::{PoiBatch, parse_feature_collection};
use crate::source::{BoxFuture, PoiSource};

/// Public map endpoint serving POI feature collections.
pub const DEFAULT_ENDPOINT: &str = "https://hikar.org/webapp/map";
pub const DEFAULT_LAYERS: &str = "poi";
/// EPSG code for the response coordinates (WGS84 lon/lat).
pub const DEFAULT_OUT_PROJ: &str = "4326";

/// POI lookup over HTTP: `GET <endpoint>?bbox=w,s,e,n&layers=poi&outProj=4326`.
///
/// No timeout or retry is applied; the caller decides what to do with a
/// failed lookup.
pub struct HttpPoiSource {
    endpoint: String,
    layers: String,
    out_proj: String,
    client: reqwest::Client,
}

impl HttpPoiSource {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("poi-overlay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Transport)?;
        Ok(Self::with_client(endpoint, client))
    }

    pub fn with_client(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            layers: DEFAULT_LAYERS.to_string(),
            out_proj: DEFAULT_OUT_PROJ.to_string(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Full request URL for `bounds`. The bbox commas are sent unescaped.
    pub fn request_url(&self, bounds: GeoBounds) -> String {
        let sep = if self.endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{}{}bbox={}&layers={}&outProj={}",
            self.endpoint,
            sep,
            bounds.to_query_value(),
            self.layers,
            self.out_proj
        )
    }
}

impl PoiSource for HttpPoiSource {
    fn name(&self) -> &str {
        &self.endpoint
    }

    fn fetch(&self, bounds: GeoBounds) -> BoxFuture<'_, Result<PoiBatch, FetchError>> {
        let url = self.request_url(bounds);

        Box::pin(async move {
            debug!(%url, "requesting POIs");
            let resp = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(FetchError::Transport)?;

            let status = resp.status();
            if !status.is_success() {
                warn!(%url, status = status.as_u16(), "POI service rejected request");
                return Err(FetchError::Status {
                    status: status.as_u16(),
                });
            }

            let body = resp.bytes().await.map_err(FetchError::Transport)?;
            let batch = parse_feature_collection(&body)?;
            debug!(
                records = batch.records.len(),
                skipped = batch.skipped_geometry,
                "POI response parsed"
            );
            Ok(batch)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use foundation::bounds::GeoBounds;
    use foundation::math::GeoPoint;
    use pretty_assertions::assert_eq;

    use super::HttpPoiSource;
    use crate::error::FetchError;
    use crate::source::PoiSource;

    type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

    #[derive(Clone)]
    struct Fixture {
        seen: Seen,
        status: StatusCode,
        body: &'static str,
    }

    async fn map_handler(
        State(fixture): State<Fixture>,
        Query(query): Query<HashMap<String, String>>,
    ) -> Response {
        fixture.seen.lock().unwrap().push(query);
        (
            fixture.status,
            [("content-type", "application/json")],
            fixture.body,
        )
            .into_response()
    }

    async fn serve(status: StatusCode, body: &'static str) -> (SocketAddr, Seen) {
        let seen: Seen = Arc::default();
        let app = Router::new()
            .route("/webapp/map", get(map_handler))
            .with_state(Fixture {
                seen: seen.clone(),
                status,
                body,
            });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (addr, seen)
    }

    fn source_for(addr: SocketAddr) -> HttpPoiSource {
        HttpPoiSource::new(format!("http://{addr}/webapp/map")).unwrap()
    }

    fn bounds() -> GeoBounds {
        GeoBounds::around(GeoPoint::new(10.0, 20.0), 0.02)
    }

    #[test]
    fn request_url_carries_bbox_layer_and_projection() {
        let source = HttpPoiSource::new("https://example.org/webapp/map").unwrap();
        assert_eq!(
            source.request_url(bounds()),
            "https://example.org/webapp/map?bbox=9.98,19.98,10.02,20.02&layers=poi&outProj=4326"
        );

        let with_query = HttpPoiSource::new("https://example.org/map?key=abc").unwrap();
        assert!(with_query.request_url(bounds()).starts_with("https://example.org/map?key=abc&bbox="));
    }

    #[tokio::test]
    async fn fetches_and_parses_features() {
        let body = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":{"type":"Point","coordinates":[10.01,20.01]},
             "properties":{"osm_id":42,"name":"Fountain"}}]}"#;
        let (addr, seen) = serve(StatusCode::OK, body).await;

        let batch = source_for(addr).fetch(bounds()).await.unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].id.as_str(), "42");
        assert_eq!(batch.records[0].name.as_deref(), Some("Fountain"));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0]["bbox"], "9.98,19.98,10.02,20.02");
        assert_eq!(seen[0]["layers"], "poi");
        assert_eq!(seen[0]["outProj"], "4326");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (addr, _seen) = serve(StatusCode::INTERNAL_SERVER_ERROR, "{}").await;
        let err = source_for(addr).fetch(bounds()).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 500 }), "{err}");
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let (addr, _seen) = serve(StatusCode::OK, "<html>maintenance</html>").await;
        let err = source_for(addr).fetch(bounds()).await.unwrap_err();
        assert_eq!(err.kind(), "malformed");
    }

    #[tokio::test]
    async fn connection_refused_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = source_for(addr).fetch(bounds()).await.unwrap_err();
        assert_eq!(err.kind(), "transport");
    }
}
