//! Manager configuration and capability flags.

use crate::tree::ExpandPolicy;

/// Default API base URL for a local backend.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Default size of the "recent files" list.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Which interactions a front end offers.
///
/// One parameterized manager serves every variant (browse-only tree, full
/// file manager, agent assignment picker); a disabled operation is refused
/// before any state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub enable_dnd: bool,
    pub enable_edit: bool,
    pub enable_assignment: bool,
    pub enable_upload: bool,
    pub enable_delete: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}

impl Capabilities {
    /// Everything enabled.
    pub fn all() -> Self {
        Self {
            enable_dnd: true,
            enable_edit: true,
            enable_assignment: true,
            enable_upload: true,
            enable_delete: true,
        }
    }

    /// Browse only: expand, collapse, open.
    pub fn read_only() -> Self {
        Self {
            enable_dnd: false,
            enable_edit: false,
            enable_assignment: false,
            enable_upload: false,
            enable_delete: false,
        }
    }
}

/// Configuration for a [`KnowledgeBaseManager`](crate::manager::KnowledgeBaseManager).
///
/// # Example
///
/// ```ignore
/// use kbtree::config::ManagerConfig;
///
/// let config = ManagerConfig::default()
///     .with_base_url("https://kb.example.com/api")
///     .with_agent_id("agent-7")
///     .with_assignment_mode(true);
/// ```
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// API base URL without trailing slash (default: http://localhost:8000/api)
    pub base_url: String,
    /// Static bearer token; falls back to the session file when unset
    pub token: Option<String>,
    /// Agent whose assignment set is edited
    pub agent_id: Option<String>,
    /// Number of recent entries to fetch (default: 5)
    pub recent_limit: usize,
    /// Show every folder expanded and load all entries up front
    pub assignment_mode: bool,
    pub capabilities: Capabilities,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: None,
            agent_id: None,
            recent_limit: DEFAULT_RECENT_LIMIT,
            assignment_mode: false,
            capabilities: Capabilities::default(),
        }
    }
}

impl ManagerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API base URL. A trailing slash is removed.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    pub fn with_assignment_mode(mut self, enabled: bool) -> Self {
        self.assignment_mode = enabled;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn expand_policy(&self) -> ExpandPolicy {
        if self.assignment_mode {
            ExpandPolicy::AllExpanded
        } else {
            ExpandPolicy::Preserve
        }
    }

    /// Build config from `KBTREE_*` environment variables.
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("KBTREE_API_URL") {
            if !url.trim().is_empty() {
                config = config.with_base_url(url.trim());
            }
        }
        if let Ok(token) = std::env::var("KBTREE_TOKEN") {
            if !token.trim().is_empty() {
                config = config.with_token(token.trim());
            }
        }
        if let Ok(agent) = std::env::var("KBTREE_AGENT_ID") {
            if !agent.trim().is_empty() {
                config = config.with_agent_id(agent.trim());
            }
        }
        if let Ok(limit) = std::env::var("KBTREE_RECENT_LIMIT") {
            match limit.trim().parse::<usize>() {
                Ok(n) => config.recent_limit = n,
                Err(_) => tracing::warn!("Ignoring invalid KBTREE_RECENT_LIMIT: {}", limit),
            }
        }
        if let Ok(mode) = std::env::var("KBTREE_ASSIGNMENT_MODE") {
            config.assignment_mode = matches!(mode.trim(), "1" | "true" | "yes");
        }

        config
    }
}
