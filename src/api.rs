use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Method,
};
use serde::Serialize;
use serde_json::Value;

use crate::{
    constants::{
        EARNINGS_PATH, HEARTBEAT_PATH, PLACEHOLDER, PROFILE_PATH, SITE_URL, USER_AGENT,
    },
    errors::{Error, Result},
    proxy::{HttpTransport, ProxyDescriptor},
};

#[derive(Clone)]
pub struct RequestParams<'a, S: Serialize> {
    pub url: &'a str,
    pub method: Method,
    pub body: Option<S>,
}

#[derive(Serialize)]
struct HeartbeatBody {
    connected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub points_today: f64,
    pub total_points: f64,
}

pub async fn send_http_request(
    transport: &HttpTransport,
    request_params: &RequestParams<'_, impl Serialize>,
    headers: &HeaderMap,
    token: &str,
) -> Result<String> {
    let mut request = transport
        .client()
        .request(request_params.method.clone(), request_params.url)
        .headers(headers.clone())
        .bearer_auth(token);

    if let Some(body) = &request_params.body {
        request = request.json(&body);
    }

    let response = request
        .send()
        .await
        .inspect_err(|e| tracing::debug!("Request failed: {}", e))?
        .error_for_status()
        .inspect_err(|e| tracing::debug!("Non-successful status code: {}", e))?;

    let text = response
        .text()
        .await
        .inspect_err(|e| tracing::debug!("Failed to retrieve response text: {}", e))?;

    Ok(text)
}

/// Client for the Depined rewards API. Every call is a single attempt over a
/// transport built for the account's proxy.
#[derive(Debug, Clone)]
pub struct DepinedClient {
    base_url: String,
    timeout: Duration,
    headers: HeaderMap,
}

impl DepinedClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            headers: get_headers(),
        }
    }

    pub async fn fetch_profile(
        &self,
        token: &str,
        proxy: Option<&ProxyDescriptor>,
    ) -> Result<Profile> {
        let url = self.endpoint(PROFILE_PATH);
        let request_params = RequestParams::<()> {
            url: &url,
            method: Method::GET,
            body: None,
        };

        let body = self.send(&request_params, token, proxy).await?;
        tracing::debug!("Profile response: {body}");

        parse_profile(&body)
    }

    pub async fn send_heartbeat(
        &self,
        token: &str,
        proxy: Option<&ProxyDescriptor>,
    ) -> Result<String> {
        let url = self.endpoint(HEARTBEAT_PATH);
        let request_params = RequestParams {
            url: &url,
            method: Method::POST,
            body: Some(HeartbeatBody { connected: true }),
        };

        let body = self.send(&request_params, token, proxy).await?;
        tracing::debug!("Heartbeat response: {body}");

        Ok(body)
    }

    pub async fn fetch_stats(&self, token: &str, proxy: Option<&ProxyDescriptor>) -> Result<Stats> {
        let url = self.endpoint(EARNINGS_PATH);
        let request_params = RequestParams::<()> {
            url: &url,
            method: Method::GET,
            body: None,
        };

        let body = self.send(&request_params, token, proxy).await?;
        tracing::debug!("Earnings response: {body}");

        parse_stats(&body)
    }

    async fn send(
        &self,
        request_params: &RequestParams<'_, impl Serialize>,
        token: &str,
        proxy: Option<&ProxyDescriptor>,
    ) -> Result<String> {
        let transport = HttpTransport::new(proxy, self.timeout)?;
        tracing::debug!(
            "{} {} via {:?} transport",
            request_params.method,
            request_params.url,
            transport.kind()
        );
        send_http_request(&transport, request_params, &self.headers, token).await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn envelope_data(response_text: &str) -> Result<Value> {
    let mut envelope: Value = serde_json::from_str(response_text)
        .map_err(|e| Error::Parse(format!("response is not valid JSON: {e}")))?;

    match envelope.get_mut("data").map(Value::take) {
        Some(data @ Value::Object(_)) => Ok(data),
        _ => Err(Error::Parse("'data' envelope is missing or not an object".into())),
    }
}

fn text_or_placeholder(value: &Value) -> String {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .unwrap_or(PLACEHOLDER)
        .to_string()
}

pub fn parse_profile(response_text: &str) -> Result<Profile> {
    let data = envelope_data(response_text)?;

    Ok(Profile {
        username: text_or_placeholder(&data["profile"]["username"]),
        email: text_or_placeholder(&data["user_details"]["email"]),
    })
}

pub fn parse_stats(response_text: &str) -> Result<Stats> {
    let data = envelope_data(response_text)?;

    Ok(Stats {
        points_today: data["total_points_today"].as_f64().unwrap_or(0.0),
        total_points: data["total_points_balance"].as_f64().unwrap_or(0.0),
    })
}

fn get_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(
        HeaderName::from_static("accept"),
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        HeaderName::from_static("accept-language"),
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(
        HeaderName::from_static("connection"),
        HeaderValue::from_static("keep-alive"),
    );
    headers.insert(
        HeaderName::from_static("origin"),
        HeaderValue::from_static(SITE_URL),
    );
    headers.insert(
        HeaderName::from_static("referer"),
        HeaderValue::from_static(SITE_URL),
    );
    headers.insert(
        HeaderName::from_static("user-agent"),
        HeaderValue::from_static(USER_AGENT),
    );

    headers
}
