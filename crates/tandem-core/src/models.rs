//! Domain and wire types: workflow kinds, timeline entries, request bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Agent identity used for synthetic error entries.
pub const SYSTEM_AGENT: &str = "System";
/// Agent identity used for demo task grouping headers.
pub const TASK_AGENT: &str = "Task";

/// Collapsed entries show at most this many characters of text.
pub const PREVIEW_CHARS: usize = 300;

/// A named agent chain. The recognized set is extensible: anything other
/// than the built-in kinds is preserved verbatim and passed through to the
/// backend, which owns validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowKind {
    /// Planner → Writer → Reviewer
    Editorial,
    /// Researcher → CodeWriter → Tester
    Dev,
    /// Unrecognized kind, forwarded as-is.
    Other(String),
}

impl WorkflowKind {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "editorial" => WorkflowKind::Editorial,
            "dev" => WorkflowKind::Dev,
            _ => WorkflowKind::Other(s.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            WorkflowKind::Editorial => "editorial",
            WorkflowKind::Dev => "dev",
            WorkflowKind::Other(s) => s,
        }
    }
}

impl std::fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for WorkflowKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WorkflowKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(WorkflowKind::parse(&s))
    }
}

/// One agent's contribution to a timeline.
///
/// Identity is positional (index in the timeline). After append, only
/// `expanded` may change; `agent` / `text` / `created_at` are immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub agent: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub expanded: bool,
}

impl TimelineEntry {
    pub fn new(agent: impl Into<String>, text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            agent: agent.into(),
            text: text.into(),
            created_at,
            expanded: false,
        }
    }

    /// A pre-expanded `System` entry carrying an error message, so failures
    /// are visible without a user action.
    pub fn system_error(text: impl Into<String>) -> Self {
        Self {
            agent: SYSTEM_AGENT.to_string(),
            text: text.into(),
            created_at: Utc::now(),
            expanded: true,
        }
    }

    /// A pre-expanded `Task` grouping header for a demo task.
    pub fn task_header(prompt: &str, workflow: &WorkflowKind) -> Self {
        Self {
            agent: TASK_AGENT.to_string(),
            text: format!("Task: {} (workflow: {})", prompt, workflow),
            created_at: Utc::now(),
            expanded: true,
        }
    }

    /// Collapsed rendering: the first 300 characters, plus an ellipsis
    /// marker only when the text is longer than that.
    pub fn preview(&self) -> String {
        if self.text.chars().count() <= PREVIEW_CHARS {
            self.text.clone()
        } else {
            let head: String = self.text.chars().take(PREVIEW_CHARS).collect();
            format!("{}…", head)
        }
    }
}

/// One timeline element as the upstream returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentStep {
    pub agent: String,
    pub text: String,
}

/// Tolerant public-surface request body.
///
/// Malformed or non-JSON bodies decode as the empty request rather than
/// being rejected; `prompt` wins over the legacy `input` alias.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub workflow: Option<String>,
}

impl PromptRequest {
    /// Decode a request body, substituting the empty request on failure.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// The input text to forward upstream.
    pub fn input_text(&self) -> &str {
        self.prompt
            .as_deref()
            .or(self.input.as_deref())
            .unwrap_or("")
    }
}

/// Success body of `POST /api/ai`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiReply {
    pub response: String,
}

/// Success body of `POST /api/agents/workflow`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowReply {
    #[serde(default)]
    pub timeline: Vec<AgentStep>,
}

/// Transient copy-to-clipboard status for one timeline index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStatus {
    Copied,
    Failed,
}

impl CopyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CopyStatus::Copied => "Copied",
            CopyStatus::Failed => "Failed",
        }
    }
}

/// One scripted demo invocation.
#[derive(Debug, Clone)]
pub struct DemoTask {
    pub prompt: String,
    pub workflow: WorkflowKind,
}
