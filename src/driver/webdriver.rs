//! W3C WebDriver client
//!
//! Attaches to a remote session that someone else created (a test runner, a
//! grid, a fixture). The client never creates or deletes sessions.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::traits::{Driver, ElementHandle};
use crate::locator::By;
use crate::Error;

/// Key under which W3C WebDriver serialises element references
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

#[derive(Debug)]
struct Connection {
    http: reqwest::Client,
    session_url: String,
    session_id: String,
}

impl Connection {
    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, Error> {
        let url = format!("{}{}", self.session_url, path);
        debug!("WebDriver {} {}", method, url);

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        let status = response.status();
        let payload: Value = response.json().await?;

        if let Some(err) = response_error(&payload) {
            return Err(err);
        }
        if !status.is_success() {
            return Err(Error::driver(format!("HTTP {} from {}", status, url)));
        }

        Ok(payload.get("value").cloned().unwrap_or(Value::Null))
    }

    async fn find_one(self: &Arc<Self>, scope: Option<&str>, by: &By) -> Result<Arc<dyn ElementHandle>, Error> {
        let (using, value) = by.to_webdriver();
        let path = match scope {
            Some(id) => format!("/element/{}/element", id),
            None => "/element".to_string(),
        };
        let result = self
            .command(Method::POST, &path, Some(json!({ "using": using, "value": value })))
            .await
            .map_err(|e| match e {
                // Servers report the selector only in prose; name it ourselves
                Error::ElementNotFound(_) => Error::element_not_found(by.to_string()),
                other => other,
            })?;
        Ok(self.element(element_id(&result)?))
    }

    async fn find_many(self: &Arc<Self>, scope: Option<&str>, by: &By) -> Result<Vec<Arc<dyn ElementHandle>>, Error> {
        let (using, value) = by.to_webdriver();
        let path = match scope {
            Some(id) => format!("/element/{}/elements", id),
            None => "/elements".to_string(),
        };
        let result = self
            .command(Method::POST, &path, Some(json!({ "using": using, "value": value })))
            .await?;
        let items = result
            .as_array()
            .ok_or_else(|| Error::driver("find elements did not return an array"))?;

        items
            .iter()
            .map(|item| element_id(item).map(|id| self.element(id)))
            .collect()
    }

    fn element(self: &Arc<Self>, id: String) -> Arc<dyn ElementHandle> {
        Arc::new(WebDriverElement {
            connection: self.clone(),
            id,
        })
    }
}

/// Map a W3C error payload to the crate error taxonomy
pub fn response_error(payload: &Value) -> Option<Error> {
    let value = payload.get("value")?;
    let code = value.get("error")?.as_str()?;
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some(match code {
        "no such element" => Error::element_not_found(message),
        "stale element reference" => Error::stale_reference(message),
        "timeout" | "script timeout" => Error::timeout(message),
        "invalid session id" => Error::session_not_found(message),
        other => Error::driver(format!("{}: {}", other, message)),
    })
}

/// Extract an element id from a W3C element reference
pub fn element_id(value: &Value) -> Result<String, Error> {
    value
        .get(ELEMENT_KEY)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::driver(format!("not an element reference: {}", value)))
}

/// Driver backed by an existing remote WebDriver session
#[derive(Debug, Clone)]
pub struct WebDriverClient {
    connection: Arc<Connection>,
}

impl WebDriverClient {
    /// Attach to `session_id` on the WebDriver server at `endpoint`
    pub fn attach(endpoint: &str, session_id: &str) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::configuration(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(http, endpoint, session_id))
    }

    /// Attach using a preconfigured HTTP client
    pub fn with_client(http: reqwest::Client, endpoint: &str, session_id: &str) -> Self {
        let session_url = format!("{}/session/{}", endpoint.trim_end_matches('/'), session_id);
        Self {
            connection: Arc::new(Connection {
                http,
                session_url,
                session_id: session_id.to_string(),
            }),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.connection.session_id
    }

    /// Base URL of all session commands
    pub fn session_url(&self) -> &str {
        &self.connection.session_url
    }
}

#[async_trait]
impl Driver for WebDriverClient {
    #[instrument(skip(self))]
    async fn navigate(&self, url: &str) -> Result<(), Error> {
        self.connection
            .command(Method::POST, "/url", Some(json!({ "url": url })))
            .await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, Error> {
        let value = self.connection.command(Method::GET, "/url", None).await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::driver("current url is not a string"))
    }

    async fn find_element(&self, by: &By) -> Result<Arc<dyn ElementHandle>, Error> {
        self.connection.find_one(None, by).await
    }

    async fn find_elements(&self, by: &By) -> Result<Vec<Arc<dyn ElementHandle>>, Error> {
        self.connection.find_many(None, by).await
    }
}

/// Remote element reference
#[derive(Debug)]
pub struct WebDriverElement {
    connection: Arc<Connection>,
    id: String,
}

impl WebDriverElement {
    async fn get(&self, suffix: &str) -> Result<Value, Error> {
        self.connection
            .command(Method::GET, &format!("/element/{}/{}", self.id, suffix), None)
            .await
    }

    async fn post(&self, suffix: &str, body: Value) -> Result<Value, Error> {
        self.connection
            .command(Method::POST, &format!("/element/{}/{}", self.id, suffix), Some(body))
            .await
    }
}

#[async_trait]
impl ElementHandle for WebDriverElement {
    fn id(&self) -> &str {
        &self.id
    }

    async fn find_element(&self, by: &By) -> Result<Arc<dyn ElementHandle>, Error> {
        self.connection.find_one(Some(&self.id), by).await
    }

    async fn find_elements(&self, by: &By) -> Result<Vec<Arc<dyn ElementHandle>>, Error> {
        self.connection.find_many(Some(&self.id), by).await
    }

    async fn click(&self) -> Result<(), Error> {
        self.post("click", json!({})).await?;
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> Result<(), Error> {
        self.post("value", json!({ "text": text })).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        self.post("clear", json!({})).await?;
        Ok(())
    }

    async fn text(&self) -> Result<String, Error> {
        let value = self.get("text").await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, Error> {
        let value = self.get(&format!("attribute/{}", name)).await?;
        Ok(value.as_str().map(str::to_string))
    }

    async fn is_displayed(&self) -> Result<bool, Error> {
        let value = self.get("displayed").await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn is_enabled(&self) -> Result<bool, Error> {
        let value = self.get("enabled").await?;
        Ok(value.as_bool().unwrap_or(false))
    }
}
