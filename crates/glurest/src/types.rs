//! Core types for console requests and their outcomes.

use crate::error::{Error, Result};
use crate::filter::SystemFilter;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::form_urlencoded;

// =============================================================================
// Plan actions
// =============================================================================

/// Deployment action a plan performs on the selected entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Start applications.
    Start,
    /// Stop applications.
    Stop,
    /// Stop then start.
    Bounce,
    /// Bring entries to their expected state.
    Deploy,
    /// Remove applications.
    Undeploy,
    /// Undeploy then deploy.
    Redeploy,
}

impl Action {
    /// Every supported action, in usage order.
    pub const ALL: [Action; 6] = [
        Action::Start,
        Action::Stop,
        Action::Bounce,
        Action::Deploy,
        Action::Undeploy,
        Action::Redeploy,
    ];

    /// Name sent as `planAction`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Stop => "stop",
            Action::Bounce => "bounce",
            Action::Deploy => "deploy",
            Action::Undeploy => "undeploy",
            Action::Redeploy => "redeploy",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| Error::InvalidAction(s.to_string()))
    }
}

/// Whether plan steps run one after another or all at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    /// One entry at a time.
    #[default]
    Sequential,
    /// All entries at once.
    Parallel,
}

impl Order {
    /// Pick the order from a `--parallel` switch.
    #[must_use]
    pub fn from_parallel(parallel: bool) -> Self {
        if parallel {
            Order::Parallel
        } else {
            Order::Sequential
        }
    }

    /// Name sent as `order`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Sequential => "sequential",
            Order::Parallel => "parallel",
        }
    }
}

/// Body of a plan creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    /// Action to plan.
    pub action: Action,
    /// Entries to act on; `None` means every entry in the fabric.
    pub filter: Option<SystemFilter>,
    /// Step ordering.
    pub order: Order,
}

impl PlanRequest {
    /// Create a request.
    pub fn new(action: Action, filter: Option<SystemFilter>, order: Order) -> Self {
        Self {
            action,
            filter,
            order,
        }
    }

    /// Encode as `application/x-www-form-urlencoded`.
    #[must_use]
    pub fn to_form(&self) -> String {
        let mut form = form_urlencoded::Serializer::new(String::new());
        form.append_pair("planAction", self.action.as_str());
        if let Some(filter) = &self.filter {
            form.append_pair("systemFilter", filter.as_str());
        }
        form.append_pair("order", self.order.as_str());
        form.finish()
    }
}

// =============================================================================
// Plan execution
// =============================================================================

/// Parsed `x-glu-completion` header (`<percent>:<status>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Percentage reported by the console.
    pub percent: u8,
    /// Status label after the colon, empty while running.
    pub status: String,
    /// Header value as received.
    pub raw: String,
}

impl Completion {
    /// Parse a header value.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let (percent, status) = raw.split_once(':').unwrap_or((raw, ""));
        let percent = percent
            .trim()
            .parse::<u8>()
            .map_err(|_| Error::InvalidCompletion(raw.to_string()))?;

        Ok(Self {
            percent,
            status: status.to_string(),
            raw: raw.to_string(),
        })
    }

    /// Whether the plan is done executing.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.raw.starts_with("100")
    }

    /// Whether a finished plan ended without failure or cancellation.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.is_complete() && !matches!(self.status.as_str(), "FAILED" | "CANCELLED")
    }
}

/// What happened to a plan submitted with [`crate::Client::execute_plan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOutcome {
    /// The console had nothing to plan (HTTP 204); carries its message.
    NothingToDo(String),
    /// Dry run: the plan was created and fetched but not executed.
    DryRun(String),
    /// The plan ran to completion.
    Completed(Completion),
}

impl PlanOutcome {
    /// Whether the outcome counts as success for the exit code.
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            PlanOutcome::NothingToDo(_) | PlanOutcome::DryRun(_) => true,
            PlanOutcome::Completed(completion) => completion.succeeded(),
        }
    }
}

impl fmt::Display for PlanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanOutcome::NothingToDo(message) => write!(f, "GLU Console message: {message}"),
            PlanOutcome::DryRun(plan) => f.write_str(plan),
            PlanOutcome::Completed(completion) => f.write_str(&completion.raw),
        }
    }
}

// =============================================================================
// Model
// =============================================================================

/// Where a model to load comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// URL the console fetches the model from.
    Url(String),
    /// Local JSON file uploaded as the request body.
    File(PathBuf),
}

/// Result of loading a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelLoad {
    /// 201: the model was loaded; carries the console's message.
    Loaded(String),
    /// 204: the model is identical to the current one.
    Unchanged,
    /// 400: the console rejected the model.
    Invalid(String),
    /// 404: the model URL could not be fetched.
    NotFound(String),
    /// Any other unexpected status.
    Rejected(u16),
}

impl ModelLoad {
    /// Map a response status and body to a load result.
    #[must_use]
    pub fn from_response(status: u16, body: String) -> Self {
        match status {
            201 => ModelLoad::Loaded(body),
            204 => ModelLoad::Unchanged,
            400 => ModelLoad::Invalid(body),
            404 => ModelLoad::NotFound(body),
            other => ModelLoad::Rejected(other),
        }
    }

    /// Whether the model is now in place.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ModelLoad::Loaded(_) | ModelLoad::Unchanged)
    }
}

impl fmt::Display for ModelLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelLoad::Loaded(body) => write!(f, "Model loaded successfully: {body}"),
            ModelLoad::Unchanged => f.write_str("Model applied, but was not updated."),
            ModelLoad::Invalid(_) => f.write_str("Error: Invalid model."),
            ModelLoad::NotFound(_) => f.write_str("Error: model not found."),
            ModelLoad::Rejected(status) => write!(f, "Error: model rejected (HTTP {status})."),
        }
    }
}

/// Parameters of a model status query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusQuery {
    /// Live (current) model instead of the loaded (expected) one.
    pub live: bool,
    /// Ask the console to pretty-print the JSON.
    pub beautify: bool,
    /// Restrict the model to matching entries.
    pub filter: Option<SystemFilter>,
}

impl StatusQuery {
    /// Relative path including the query string, if any.
    #[must_use]
    pub fn path(&self) -> String {
        let base = if self.live { "model/live" } else { "model/static" };

        let mut query = form_urlencoded::Serializer::new(String::new());
        let mut has_params = false;
        if self.beautify {
            query.append_pair("prettyPrint", "true");
            has_params = true;
        }
        if let Some(filter) = &self.filter {
            query.append_pair("systemFilter", filter.as_str());
            has_params = true;
        }

        if has_params {
            format!("{base}?{}", query.finish())
        } else {
            base.to_string()
        }
    }
}
