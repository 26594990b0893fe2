//! JSON-over-GET transport shared by the source adapters.

use anyhow::Context;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

/// "GET with query parameters, returns parsed JSON".
///
/// Adapters only see this trait, so tests can swap in canned responses.
pub trait HttpGet: Send + Sync {
    fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> impl Future<Output = anyhow::Result<Value>> + Send;
}

/// reqwest-backed client bound to one backend's base URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("build reqwest client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        for (i, (key, value)) in query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(&urlencoding::encode(key));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }
}

impl HttpGet for HttpClient {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> anyhow::Result<Value> {
        let url = self.url(path, query);
        tracing::debug!(%url, "GET");

        let v: Value = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("send {path} request"))?
            .error_for_status()
            .with_context(|| format!("{path} http status"))?
            .json()
            .await
            .with_context(|| format!("parse {path} json"))?;
        Ok(v)
    }
}

/// Look up a nested field, failing with the missing JSON pointer.
pub(crate) fn field<'a>(v: &'a Value, pointer: &str) -> anyhow::Result<&'a Value> {
    v.pointer(pointer)
        .filter(|x| !x.is_null())
        .with_context(|| format!("response is missing `{pointer}`"))
}

pub(crate) fn array<'a>(v: &'a Value, pointer: &str) -> anyhow::Result<&'a Vec<Value>> {
    field(v, pointer)?
        .as_array()
        .with_context(|| format!("`{pointer}` is not an array"))
}

pub(crate) fn string<'a>(v: &'a Value, pointer: &str) -> anyhow::Result<&'a str> {
    field(v, pointer)?
        .as_str()
        .with_context(|| format!("`{pointer}` is not a string"))
}

/// Ids arrive as numbers from some endpoints and strings from others.
pub(crate) fn id_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Collect `name` from an array of `{ "name": ... }` objects.
pub(crate) fn names(v: Option<&Value>) -> Vec<String> {
    v.and_then(|x| x.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|a| a.get("name").and_then(|n| n.as_str()))
                .map(|n| n.to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::HttpGet;
    use anyhow::Context;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Debug, Clone)]
    struct Route {
        path: String,
        param: Option<(String, String)>,
        delay: Option<Duration>,
        body: Value,
    }

    /// Canned-response transport. Routes match on path and, optionally, one query param.
    #[derive(Debug, Clone, Default)]
    pub struct FakeHttp {
        routes: Arc<Mutex<Vec<Route>>>,
        calls: Arc<Mutex<Vec<(String, Vec<(String, String)>)>>>,
    }

    impl FakeHttp {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn route(self, path: &str, body: Value) -> Self {
            self.push(path, None, None, body)
        }

        pub fn route_param(self, path: &str, key: &str, value: &str, body: Value) -> Self {
            self.push(path, Some((key.into(), value.into())), None, body)
        }

        pub fn route_delayed(
            self,
            path: &str,
            key: &str,
            value: &str,
            delay: Duration,
            body: Value,
        ) -> Self {
            self.push(path, Some((key.into(), value.into())), Some(delay), body)
        }

        fn push(
            self,
            path: &str,
            param: Option<(String, String)>,
            delay: Option<Duration>,
            body: Value,
        ) -> Self {
            self.routes.lock().unwrap().push(Route {
                path: path.to_string(),
                param,
                delay,
                body,
            });
            self
        }

        pub fn calls(&self) -> Vec<(String, Vec<(String, String)>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl HttpGet for FakeHttp {
        async fn get_json(&self, path: &str, query: &[(&str, String)]) -> anyhow::Result<Value> {
            let query: Vec<(String, String)> = query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect();
            self.calls
                .lock()
                .unwrap()
                .push((path.to_string(), query.clone()));

            let route = self
                .routes
                .lock()
                .unwrap()
                .iter()
                .find(|r| {
                    r.path == path
                        && r.param
                            .as_ref()
                            .is_none_or(|p| query.iter().any(|q| q == p))
                })
                .cloned()
                .with_context(|| format!("no route for {path}"))?;

            if let Some(delay) = route.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(route.body)
        }
    }
}
