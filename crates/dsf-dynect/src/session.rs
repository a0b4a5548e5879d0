//! Session against the DynECT REST API

use async_trait::async_trait;
use dsf_core::model::{ApiMessage, Envelope, Status};
use dsf_core::traits::{ApiRequest, Method, Session, SessionState};
use dsf_core::{Credentials, Error, Result, TransportConfig};
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use serde_json::{Value, json};
use std::time::Instant;

/// Header carrying the session token
pub const AUTH_HEADER: &str = "Auth-Token";

/// One logged-in DynECT API session
///
/// # Security
///
/// The token and password never appear in logs or in `Debug` output.
pub struct DynSession {
    client: reqwest::Client,

    credentials: Credentials,

    transport: TransportConfig,

    /// ⚠️ NEVER log this value
    token: Option<String>,

    version: Option<String>,

    state: SessionState,
}

impl std::fmt::Debug for DynSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynSession")
            .field("base_url", &self.transport.base_url)
            .field("credentials", &self.credentials)
            .field("token", &self.token.as_ref().map(|_| "<REDACTED>"))
            .field("version", &self.version)
            .field("state", &self.state)
            .finish()
    }
}

impl DynSession {
    /// Create an unauthenticated session
    ///
    /// # Parameters
    ///
    /// - `credentials`: Customer, user and password used by [`Session::login`]
    /// - `transport`: Base URL, timeouts and the verbose flag
    ///
    /// Redirects are not followed: DynECT answers long-running requests with
    /// `307 Temporary Redirect` to a job URL, which is polled instead.
    pub fn new(credentials: Credentials, transport: &TransportConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(transport.request_timeout())
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            credentials,
            transport: transport.clone(),
            token: None,
            version: None,
            state: SessionState::Unauthenticated,
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.transport.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// One HTTP exchange, decoded into an envelope
    ///
    /// A `307` becomes an `incomplete` envelope carrying the job id from the
    /// `Location` header. `401`/`403` are authentication failures. Any other
    /// status is decoded as an envelope; the envelope status decides.
    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Envelope> {
        if self.transport.verbose {
            tracing::debug!("DynECT request: {} {}", method, path);
        }

        let mut builder = self
            .client
            .request(http_method(method), self.url(path))
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = &self.token {
            builder = builder.header(AUTH_HEADER, token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::http(format!("{} {} failed: {}", method, path, e)))?;

        let status = response.status();
        match status {
            StatusCode::TEMPORARY_REDIRECT => {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default();
                let job_id = job_id_from_location(location).ok_or_else(|| {
                    Error::http(format!("{} {} redirected to unexpected location {:?}", method, path, location))
                })?;
                tracing::debug!("{} {} continues as job {}", method, path, job_id);
                return Ok(Envelope {
                    status: Status::Incomplete,
                    job_id: Some(job_id),
                    messages: Vec::new(),
                    data: Value::Null,
                });
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(Error::auth(format!(
                    "{} {} was refused with status {}",
                    method, path, status
                )));
            }
            _ => {}
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response body: {}", e)))?;
        let envelope: Envelope = serde_json::from_str(&text).map_err(|e| {
            Error::http(format!(
                "{} {} returned an undecodable body (status {}): {}",
                method, path, status, e
            ))
        })?;

        if self.transport.verbose {
            tracing::debug!("DynECT response: {} {} -> {:?}", method, path, envelope.status);
        }
        Ok(envelope)
    }

    /// Poll a job until it resolves or the job timeout passes
    async fn wait_for_job(&self, job_id: u64) -> Result<Envelope> {
        let started = Instant::now();
        let timeout = self.transport.job_timeout();

        loop {
            if started.elapsed() >= timeout {
                tracing::warn!("Job {} still incomplete after {:?}", job_id, timeout);
                return Err(Error::OperationTimedOut {
                    job_id,
                    waited: started.elapsed(),
                });
            }

            tokio::time::sleep(self.transport.poll_interval()).await;

            let envelope = self.send(Method::Get, &format!("Job/{}", job_id), None).await?;
            match envelope.status {
                Status::Incomplete => {
                    tracing::debug!("Job {} still running", job_id);
                }
                _ => return Ok(envelope),
            }
        }
    }

    /// Map a resolved envelope to the caller's result
    fn resolve(&mut self, envelope: Envelope) -> Result<Envelope> {
        match envelope.status {
            Status::Success => Ok(envelope),
            Status::Failure if envelope.messages.iter().any(ApiMessage::is_token_error) => {
                self.token = None;
                self.state = SessionState::Unauthenticated;
                Err(Error::auth(describe(&envelope.messages)))
            }
            Status::Failure => Err(Error::rejected(envelope.messages)),
            Status::Incomplete => Err(Error::malformed("job resolved to incomplete")),
        }
    }
}

#[async_trait]
impl Session for DynSession {
    async fn login(&mut self) -> Result<()> {
        if self.state == SessionState::Closed {
            return Err(Error::invalid_state("cannot log in on a closed session"));
        }

        let body = json!({
            "customer_name": self.credentials.customer_name,
            "user_name": self.credentials.username,
            "password": self.credentials.password,
        });
        let envelope = self.send(Method::Post, "Session", Some(&body)).await?;

        if envelope.status != Status::Success {
            return Err(Error::auth(describe(&envelope.messages)));
        }

        let token = envelope.data["token"]
            .as_str()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::malformed("login response carries no token"))?;
        self.token = Some(token.to_string());
        self.version = envelope.data["version"].as_str().map(str::to_string);
        self.state = SessionState::Authenticated;

        tracing::info!(
            "Logged in to DynECT as {}/{} (API {})",
            self.credentials.customer_name,
            self.credentials.username,
            self.version.as_deref().unwrap_or("unknown")
        );
        Ok(())
    }

    async fn execute(&mut self, request: ApiRequest) -> Result<Envelope> {
        if self.state != SessionState::Authenticated {
            return Err(Error::invalid_state(format!(
                "session is {:?}, cannot send {} {}",
                self.state, request.method, request.path
            )));
        }

        let envelope = self
            .send(request.method, &request.path, request.body.as_ref())
            .await;
        let envelope = match envelope {
            Err(e) if e.is_auth_failure() => {
                self.token = None;
                self.state = SessionState::Unauthenticated;
                return Err(e);
            }
            other => other?,
        };

        let envelope = match (envelope.status, envelope.job_id) {
            (Status::Incomplete, Some(job_id)) => self.wait_for_job(job_id).await?,
            (Status::Incomplete, None) => {
                return Err(Error::malformed("incomplete response without a job id"));
            }
            _ => envelope,
        };

        self.resolve(envelope)
    }

    async fn close(&mut self) -> Result<()> {
        if self.state != SessionState::Authenticated {
            self.state = SessionState::Closed;
            return Ok(());
        }

        let result = self.send(Method::Delete, "Session", None).await;
        self.token = None;
        self.state = SessionState::Closed;

        let envelope = result?;
        if envelope.status == Status::Failure {
            return Err(Error::rejected(envelope.messages));
        }
        tracing::debug!("Logged out of DynECT");
        Ok(())
    }

    fn state(&self) -> SessionState {
        self.state
    }

    fn api_version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// `/REST/Job/123` → 123
fn job_id_from_location(location: &str) -> Option<u64> {
    let mut segments = location.trim_end_matches('/').rsplit('/');
    let id = segments.next()?.parse().ok()?;
    (segments.next()? == "Job").then_some(id)
}

fn describe(messages: &[ApiMessage]) -> String {
    if messages.is_empty() {
        return "no message from server".to_string();
    }
    messages
        .iter()
        .map(|m| m.info.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
