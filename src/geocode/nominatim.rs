use async_trait::async_trait;
use serde::Deserialize;

use crate::{config::GeocoderConfig, error::GeocodeError};
use super::{Coordinate, Geocoder};

/// One candidate in a Nominatim search response. Ordinates arrive as decimal strings.
#[derive(Debug, Clone, Deserialize)]
struct Place {
    lon: Ordinate,
    lat: Ordinate,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Ordinate {
    Text(String),
    Number(f64),
}

impl Ordinate {
    fn value(&self) -> Option<f64> {
        match self {
            Ordinate::Text(text) => text.trim().parse().ok(),
            Ordinate::Number(value) => Some(*value),
        }
    }
}

/// Geocoding adapter for a Nominatim-compatible search endpoint.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http_client: reqwest::Client,
    endpoint: String,
    country_codes: Option<String>,
    limit: Option<u32>,
}

impl NominatimClient {
    /// Build a client that sends the configured `User-Agent` on every call and
    /// gives up after the configured timeout.
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .map_err(|e| GeocodeError::Provider(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            country_codes: config.country_codes.clone(),
            limit: config.limit,
        })
    }

    fn query(&self, address: &str) -> Vec<(&'static str, String)> {
        let mut query = vec![("format", "json".to_string()), ("q", address.to_string())];
        if let Some(codes) = &self.country_codes {
            query.push(("countrycodes", codes.clone()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        tracing::debug!(address = %address, endpoint = %self.endpoint, "Querying geocoding provider");

        let response = self.http_client
            .get(&self.endpoint)
            .query(&self.query(address))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Provider(format!("HTTP {}: {}", status.as_u16(), error_text.trim())));
        }

        let body = response.text().await.map_err(transport_error)?;
        parse_places(&body, address)
    }
}

fn transport_error(err: reqwest::Error) -> GeocodeError {
    if err.is_timeout() {
        GeocodeError::Provider(format!("request timed out: {err}"))
    } else {
        GeocodeError::Provider(err.to_string())
    }
}

/// Pick the provider's first candidate from a search response body.
fn parse_places(body: &str, address: &str) -> Result<Coordinate, GeocodeError> {
    let places: Vec<Place> = serde_json::from_str(body)
        .map_err(|e| GeocodeError::Provider(format!("unexpected response: {e}")))?;

    let Some(first) = places.first() else {
        return Err(GeocodeError::AddressNotFound(address.to_string()));
    };
    if places.len() > 1 {
        tracing::warn!(
            address = %address,
            candidates = places.len(),
            chosen = first.display_name.as_deref().unwrap_or(""),
            "provider returned multiple candidates, using the first"
        );
    }

    let coord = match (first.lon.value(), first.lat.value()) {
        (Some(lon), Some(lat)) => Coordinate::new(lon, lat),
        _ => return Err(GeocodeError::Provider(format!("unparsable coordinates in {first:?}"))),
    };
    if !coord.is_valid() {
        return Err(GeocodeError::Provider(format!("coordinate out of range: {coord:?}")));
    }
    Ok(coord)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::{io::{AsyncReadExt, AsyncWriteExt}, net::TcpListener, sync::oneshot};

    #[test]
    fn empty_response_is_address_not_found() {
        assert_eq!(
            parse_places("[]", "zzz not an address zzz"),
            Err(GeocodeError::AddressNotFound("zzz not an address zzz".into()))
        );
    }

    #[test]
    fn first_candidate_wins() {
        let body = r#"[
            { "lon": "-93.30", "lat": "45.26", "display_name": "first" },
            { "lon": "-93.10", "lat": "45.10", "display_name": "second" }
        ]"#;
        assert_eq!(parse_places(body, "x"), Ok(Coordinate::new(-93.30, 45.26)));
    }

    #[test]
    fn numeric_ordinates_are_accepted() {
        assert_eq!(parse_places(r#"[{ "lon": 1.5, "lat": 2.5 }]"#, "x"), Ok(Coordinate::new(1.5, 2.5)));
    }

    #[test]
    fn malformed_responses_are_provider_errors() {
        for body in [
            "not json",
            r#"{ "error": "rate limited" }"#,
            r#"[{ "lon": "abc", "lat": "45.0" }]"#,
            r#"[{ "lat": "45.0" }]"#,
            r#"[{ "lon": "200.0", "lat": "45.0" }]"#,
        ] {
            assert!(matches!(parse_places(body, "x"), Err(GeocodeError::Provider(_))), "body {body}");
        }
    }

    /// Serve one canned HTTP response and hand back the raw request text.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/search", listener.local_addr().unwrap());
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 { break; }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = tx.send(String::from_utf8_lossy(&request).into_owned());
        });

        (endpoint, rx)
    }

    fn client(endpoint: String) -> NominatimClient {
        NominatimClient::new(&GeocoderConfig {
            endpoint,
            country_codes: Some("us".into()),
            ..GeocoderConfig::default()
        }).unwrap()
    }

    #[tokio::test]
    async fn sends_query_and_client_identifier() {
        let (endpoint, request) = serve_once("200 OK", r#"[{ "lon": "-93.30", "lat": "45.26" }]"#).await;

        let coord = client(endpoint).geocode("815 US-10, Some City, MN").await.unwrap();
        assert_eq!(coord, Coordinate::new(-93.30, 45.26));

        let request = request.await.unwrap().to_ascii_lowercase();
        assert!(request.starts_with("get /search?"), "{request}");
        assert!(request.contains("format=json"));
        assert!(request.contains("q=815+us-10%2c+some+city%2c+mn"), "{request}");
        assert!(request.contains("countrycodes=us"));
        assert!(request.contains("user-agent: district-lookup-prod"));
    }

    #[tokio::test]
    async fn zero_results_from_provider() {
        let (endpoint, _request) = serve_once("200 OK", "[]").await;
        let err = client(endpoint).geocode("zzz not an address zzz").await.unwrap_err();
        assert_eq!(err, GeocodeError::AddressNotFound("zzz not an address zzz".into()));
    }

    #[tokio::test]
    async fn error_status_is_provider_error() {
        let (endpoint, _request) = serve_once("503 Service Unavailable", "busy").await;
        let err = client(endpoint).geocode("9200 Inverness Ln NW").await.unwrap_err();
        assert_eq!(err, GeocodeError::Provider("HTTP 503: busy".into()));
    }

    #[tokio::test]
    async fn unreachable_provider_is_provider_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/search", listener.local_addr().unwrap());
        drop(listener);

        let err = client(endpoint).geocode("9200 Inverness Ln NW").await.unwrap_err();
        assert!(matches!(err, GeocodeError::Provider(_)));
    }

    /// Accept one connection and hold it open without ever answering.
    async fn serve_silently() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/search", listener.local_addr().unwrap());

        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        endpoint
    }

    #[tokio::test]
    async fn silent_provider_times_out() {
        let endpoint = serve_silently().await;
        let client = NominatimClient::new(&GeocoderConfig {
            endpoint,
            timeout_secs: 1,
            ..GeocoderConfig::default()
        }).unwrap();

        let err = tokio::time::timeout(Duration::from_secs(10), client.geocode("9200 Inverness Ln NW"))
            .await
            .expect("client timeout should fire first")
            .unwrap_err();
        match err {
            GeocodeError::Provider(message) => assert!(message.contains("timed out"), "{message}"),
            other => panic!("expected provider error, got {other:?}"),
        }
    }
}
