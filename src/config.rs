use std::path::PathBuf;

const DEFAULT_LOG_FILTER: &str = "examd=info";

/// Startup configuration loaded from environment variables.
///
/// | Env Var           | Default       |
/// |-------------------|---------------|
/// | `EXAMD_LOG`       | `examd=info`  |
/// | `EXAMD_WORKSPACE` | none          |
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
    /// Workspace opened before the first request, as if by `workspace.select`.
    pub workspace: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let log_filter = var("EXAMD_LOG")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.into());
        let workspace = var("EXAMD_WORKSPACE")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self {
            log_filter,
            workspace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset_or_blank() {
        let cfg = Config::from_vars(|name| match name {
            "EXAMD_WORKSPACE" => Some("  ".into()),
            _ => None,
        });
        assert_eq!(cfg.log_filter, "examd=info");
        assert_eq!(cfg.workspace, None);
    }

    #[test]
    fn reads_both_variables() {
        let cfg = Config::from_vars(|name| match name {
            "EXAMD_LOG" => Some("examd=debug".into()),
            "EXAMD_WORKSPACE" => Some("/tmp/exams".into()),
            _ => None,
        });
        assert_eq!(cfg.log_filter, "examd=debug");
        assert_eq!(cfg.workspace, Some(PathBuf::from("/tmp/exams")));
    }
}
