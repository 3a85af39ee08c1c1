//! Python runtime manager for the explainer engines.
//!
//! Runs short Python scripts as managed subprocesses: the request goes in as
//! JSON on stdin, the answer comes back as JSON on stdout.

use serde::{Deserialize, Serialize};
use shapformel_core::ExplainError;
use shapformel_core::config::PythonConfig;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

const INTERPRETERS: [&str; 2] = ["python3", "python"];

const IMPORT_CHECK: &str = r#"
import importlib.util, json, sys
names = json.load(sys.stdin)["packages"]
print(json.dumps({n: importlib.util.find_spec(n) is not None for n in names}))
"#;

/// Information about the detected Python installation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PythonInfo {
    pub path: PathBuf,
    pub version: String,
    pub venv_path: Option<PathBuf>,
}

/// Managed Python subprocess runner.
#[derive(Debug, Clone)]
pub struct PythonRuntime {
    python_path: PathBuf,
    venv_path: Option<PathBuf>,
    workspace: PathBuf,
    timeout: Duration,
}

impl PythonRuntime {
    /// Create a runtime using `python3` from `PATH`.
    pub fn new(workspace: PathBuf) -> Self {
        Self {
            python_path: PathBuf::from("python3"),
            venv_path: None,
            workspace,
            timeout: Duration::from_secs(300),
        }
    }

    /// Create from the `[python]` configuration section.
    pub fn from_config(config: &PythonConfig, workspace: PathBuf) -> Self {
        Self {
            python_path: config
                .python_path
                .clone()
                .unwrap_or_else(|| PathBuf::from("python3")),
            venv_path: config.venv_path.clone(),
            workspace,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Find the first interpreter on `PATH` that answers `--version`.
    pub async fn detect() -> Result<PythonInfo, ExplainError> {
        for candidate in INTERPRETERS {
            let Ok(output) = Command::new(candidate).arg("--version").output().await else {
                continue;
            };
            if !output.status.success() {
                continue;
            }
            let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
            // Python 2 answers on stderr
            if version.is_empty() {
                continue;
            }
            return Ok(PythonInfo {
                path: PathBuf::from(candidate),
                version,
                venv_path: detect_venv(),
            });
        }

        Err(ExplainError::python(
            "no Python 3 interpreter found; shap and pyxai need one to compute explanations",
        ))
    }

    /// Effective Python command, accounting for a virtual environment.
    fn python_cmd(&self) -> PathBuf {
        if let Some(venv) = &self.venv_path {
            let bin_dir = if cfg!(windows) { "Scripts" } else { "bin" };
            venv.join(bin_dir).join("python")
        } else {
            self.python_path.clone()
        }
    }

    /// Run a Python script with JSON input on stdin and JSON output on stdout.
    pub async fn run_script(
        &self,
        script: &str,
        input: &serde_json::Value,
        timeout: Option<Duration>,
    ) -> Result<serde_json::Value, ExplainError> {
        let timeout = timeout.unwrap_or(self.timeout);
        let input_json = serde_json::to_vec(input)?;

        debug!(script_len = script.len(), input_len = input_json.len(), "Running Python script");

        let result = tokio::time::timeout(timeout, async {
            let mut child = Command::new(self.python_cmd())
                .args(["-c", script])
                .current_dir(&self.workspace)
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn()
                .map_err(|e| ExplainError::python(format!("Failed to spawn Python: {e}")))?;

            // Scripts that exit without reading stdin close the pipe early.
            if let Some(mut stdin) = child.stdin.take() {
                if let Err(e) = stdin.write_all(&input_json).await {
                    if e.kind() != std::io::ErrorKind::BrokenPipe {
                        return Err(e.into());
                    }
                }
            }

            let output = child.wait_with_output().await?;
            decode_output(output)
        })
        .await;

        result.unwrap_or_else(|_| {
            Err(ExplainError::Timeout(format!(
                "explainer script exceeded {}s",
                timeout.as_secs()
            )))
        })
    }

    /// Importability of each package, checked in one interpreter run.
    pub async fn check_packages(&self, packages: &[&str]) -> HashMap<String, bool> {
        let request = serde_json::json!({ "packages": packages });
        match self.run_script(IMPORT_CHECK, &request, None).await {
            Ok(found) => serde_json::from_value(found).unwrap_or_default(),
            Err(e) => {
                debug!(error = %e, "Package import check failed");
                packages.iter().map(|p| (p.to_string(), false)).collect()
            }
        }
    }
}

/// Turn a finished script into its JSON answer.
fn decode_output(output: Output) -> Result<serde_json::Value, ExplainError> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let last = stderr.lines().last().unwrap_or_default();
        return Err(ExplainError::python(format!("script exited with {}: {last}", output.status)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    match stdout.trim() {
        "" => Ok(serde_json::Value::Null),
        text => serde_json::from_str(text)
            .map_err(|e| ExplainError::python(format!("script printed invalid JSON: {e}"))),
    }
}

/// Detect a virtual environment from `VIRTUAL_ENV` or common directory names.
fn detect_venv() -> Option<PathBuf> {
    if let Ok(venv) = std::env::var("VIRTUAL_ENV") {
        let path = PathBuf::from(venv);
        if path.exists() {
            return Some(path);
        }
    }

    [".venv", "venv"]
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}
