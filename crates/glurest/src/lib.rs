//! # glurest
//!
//! Blocking REST client for the glu orchestration console.
//!
//! The console owns all planning and execution logic. This crate only:
//! - builds system filters and plan requests
//! - creates, inspects and executes plans, then polls until they complete
//! - loads a model into a fabric
//! - fetches the static (expected) or live (current) model
//!
//! ## Example
//!
//! ```no_run
//! use glurest::{Action, Client, ConsoleConfig, LogReporter, Order, Selector};
//!
//! let config = ConsoleConfig::new("http://localhost:8080/console", "glu-dev-1", "admin", "admin");
//! let client = Client::new(&config).expect("invalid console URL");
//!
//! let selector = Selector { agent: Some("agent-1".to_string()), ..Default::default() };
//! let filter = selector.system_filter();
//! let outcome = client
//!     .execute_plan(Action::Bounce, filter, Order::Sequential, false, &mut LogReporter)
//!     .expect("plan failed");
//!
//! println!("{outcome}");
//! ```
//!
//! ## Testing
//!
//! Swap the HTTP transport for [`transport::MockTransport`] with
//! [`Client::with_transport`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod filter;
pub mod progress;
pub mod transport;
pub mod types;

pub use error::{Error, ErrorCategory, Result};
pub use filter::{Selector, SystemFilter};
pub use progress::{LogReporter, ProgressReporter};
pub use types::{
    Action, Completion, ModelLoad, ModelSource, Order, PlanOutcome, PlanRequest, StatusQuery,
};

use std::fs;
use std::thread;
use std::time::Duration;
use transport::http::UreqTransport;
use transport::{Method, Request, Response, Transport};
use url::Url;

/// Default REST API version.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Default delay between two completion polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Header carrying plan execution progress.
pub const COMPLETION_HEADER: &str = "x-glu-completion";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";
const MODEL_CONTENT_TYPE: &str = "text/json";

/// Absolute path of a fabric's REST root, with trailing slash.
#[must_use]
pub fn fabric_root(api_version: &str, fabric: &str) -> String {
    format!("/console/rest/{api_version}/{fabric}/")
}

/// Connection settings for one fabric on one console.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Console URL; only scheme, host and port are used.
    pub url: String,
    /// Fabric to act on.
    pub fabric: String,
    /// User for basic auth.
    pub username: String,
    /// Password for basic auth.
    pub password: String,
    /// REST API version segment.
    pub api_version: String,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Delay between completion polls.
    pub poll_interval: Duration,
}

impl ConsoleConfig {
    /// Create a config with default API version, user agent and poll interval.
    pub fn new(
        url: impl Into<String>,
        fabric: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            fabric: fabric.into(),
            username: username.into(),
            password: password.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            user_agent: concat!("glurest/", env!("CARGO_PKG_VERSION")).to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set the REST API version.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the `User-Agent` header value.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Client for one fabric of a console.
pub struct Client {
    transport: Box<dyn Transport>,
    root: String,
    poll_interval: Duration,
}

impl Client {
    /// Create a client talking HTTP to the configured console.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidUrl` if the console URL cannot be parsed.
    pub fn new(config: &ConsoleConfig) -> Result<Self> {
        let transport = UreqTransport::new(config)?;
        Ok(Self {
            transport: Box::new(transport),
            root: fabric_root(&config.api_version, &config.fabric),
            poll_interval: config.poll_interval,
        })
    }

    /// Create a client over a custom transport (useful for testing).
    #[must_use]
    pub fn with_transport(fabric: &str, transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            root: fabric_root(DEFAULT_API_VERSION, fabric),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the delay between completion polls.
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    // =========================================================================
    // Plans
    // =========================================================================

    /// Create a plan; returns the response of the creation call.
    ///
    /// A 204 response means the console found nothing to do.
    pub fn create_plan(&self, plan: &PlanRequest) -> Result<Response> {
        log::debug!("plan request = {}", plan.to_form());
        let request =
            Request::new(Method::Post, "plans").body(FORM_CONTENT_TYPE, plan.to_form());
        self.send(&request)
    }

    /// Create a plan, then execute it and wait for it to complete.
    ///
    /// With `dry_run`, the plan is created and fetched but never executed;
    /// its description is returned instead.
    ///
    /// # Errors
    ///
    /// Any error status from the console, or a response missing the
    /// `Location` / `x-glu-completion` headers.
    pub fn execute_plan(
        &self,
        action: Action,
        filter: Option<SystemFilter>,
        order: Order,
        dry_run: bool,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<PlanOutcome> {
        let created = self.create_plan(&PlanRequest::new(action, filter, order))?;

        if created.status == 204 {
            return Ok(PlanOutcome::NothingToDo(created.reason));
        }

        let plan_path = self.location(&created)?;
        log::debug!("plan url = {plan_path}");

        let plan = self.send(&Request::new(Method::Get, plan_path.as_str()))?;
        log::debug!("body = {}", plan.body);

        if dry_run {
            return Ok(PlanOutcome::DryRun(plan.body));
        }

        let execution_path = format!("{plan_path}/execution");
        log::info!("executing plan: {execution_path}");
        let execution = self.send(&Request::new(Method::Post, execution_path))?;

        let status_path = self.location(&execution)?;
        log::info!("status url = {status_path}");

        self.wait_for_completion(&status_path, reporter)
            .map(PlanOutcome::Completed)
    }

    /// Poll a plan execution until its completion reaches 100%.
    ///
    /// Polls every poll interval with no timeout. Each unfinished poll is
    /// reported through [`ProgressReporter::update`], the final one through
    /// [`ProgressReporter::finish`].
    pub fn wait_for_completion(
        &self,
        status_path: &str,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<Completion> {
        loop {
            let response = self.send(&Request::new(Method::Head, status_path))?;
            let raw = response
                .header(COMPLETION_HEADER)
                .ok_or(Error::MissingHeader(COMPLETION_HEADER))?;
            let completion = Completion::parse(raw)?;

            if completion.is_complete() {
                reporter.finish(&completion);
                return Ok(completion);
            }

            reporter.update(&completion);
            thread::sleep(self.poll_interval);
        }
    }

    // =========================================================================
    // Model
    // =========================================================================

    /// Load a model into the fabric.
    ///
    /// 400 and 404 come back as [`ModelLoad`] failures rather than errors;
    /// 401 and other error statuses are still errors.
    pub fn load_model(&self, source: &ModelSource) -> Result<ModelLoad> {
        let request = match source {
            ModelSource::Url(model_url) => {
                let form = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("modelUrl", model_url)
                    .finish();
                Request::new(Method::Post, "model/static").body(FORM_CONTENT_TYPE, form)
            }
            ModelSource::File(path) => {
                let model = fs::read(path).map_err(|e| Error::io(path, e))?;
                Request::new(Method::Post, "model/static").body(MODEL_CONTENT_TYPE, model)
            }
        };

        let response = self.transport.execute(&request)?;
        match response.status {
            400 | 404 => Ok(ModelLoad::from_response(response.status, response.body)),
            status => match Error::from_status(status, response.body.clone()) {
                Some(err) => Err(err),
                None => Ok(ModelLoad::from_response(status, response.body)),
            },
        }
    }

    /// Fetch the static or live model as JSON text.
    pub fn status(&self, query: &StatusQuery) -> Result<String> {
        let response = self.send(&Request::new(Method::Get, query.path()))?;
        Ok(response.body)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Send a request and turn error statuses into errors.
    fn send(&self, request: &Request) -> Result<Response> {
        let response = self.transport.execute(request)?;
        match Error::from_status(response.status, response.body.clone()) {
            Some(err) => Err(err),
            None => Ok(response),
        }
    }

    /// Fabric-relative path of a response's `Location` header.
    fn location(&self, response: &Response) -> Result<String> {
        let location = response
            .header("location")
            .ok_or(Error::MissingHeader("location"))?;
        Ok(self.relative_path(location))
    }

    /// Strip scheme, host and fabric root from a console URL.
    ///
    /// Anything that does not live under the fabric root is returned as-is.
    fn relative_path(&self, location: &str) -> String {
        let path = match Url::parse(location) {
            Ok(url) => match url.query() {
                Some(query) => format!("{}?{query}", url.path()),
                None => url.path().to_string(),
            },
            Err(_) => location.to_string(),
        };

        match path.strip_prefix(&self.root) {
            Some(relative) => relative.to_string(),
            None => path,
        }
    }
}
