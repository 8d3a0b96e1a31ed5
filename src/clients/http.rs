use async_trait::async_trait;
use rquest::Client;
use rquest_util::Emulation;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use crate::clients::transport::{RawResponse, Transport};
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use tracing::{error, debug};

pub struct HttpClient {
    client: Client,
    headers: HeaderMap,
}

impl HttpClient {
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();

        for (key, value) in api.headers.iter() {
            if let (Ok(header_name), Ok(header_value)) = (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value)
            ) {
                headers.insert(header_name, header_value);
                debug!(
                    header_key = key,
                    header_value = value,
                    "Adding header"
                );
            } else {
                error!(
                    header_key = key,
                    header_value = value,
                    "Invalid header value"
                );
            }
        }

        let emulation = parse_emulation(&api.emulation)?;

        debug!(
            emulation = ?emulation,
            "Creating client with emulation"
        );

        let client = Client::builder()
            .emulation(emulation)
            .build()?;

        Ok(Self {
            client,
            headers,
        })
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn get(&self, url: &str) -> Result<RawResponse> {
        let mut request = self.client.get(url);

        for (key, value) in self.headers.iter() {
            request = request.header(key, value);
        }

        debug!(url = url, "Sending request");

        let response = request.send().await?;
        let status = response.status();

        debug!(
            status = status.as_u16(),
            url = %response.url(),
            "Response received"
        );

        let body = response.bytes().await?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn parse_emulation(name: &str) -> Result<Emulation> {
    match name.to_ascii_lowercase().as_str() {
        "chrome" => Ok(Emulation::Chrome133),
        "firefox" => Ok(Emulation::Firefox136),
        "safari" => Ok(Emulation::Safari18_3),
        "edge" => Ok(Emulation::Edge134),
        other => Err(Error::validation(format!(
            "unknown emulation '{}', expected one of chrome, firefox, safari, edge",
            other
        ))),
    }
}
