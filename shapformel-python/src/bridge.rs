//! Blocking front for the Python runtime.
//!
//! The explanation core is synchronous. The bridge owns a current-thread
//! tokio runtime and blocks on each subprocess call, so every oracle call
//! runs to completion on the caller's thread.

use crate::runtime::PythonRuntime;
use serde_json::Value;
use shapformel_core::ExplainError;
use shapformel_core::config::PythonConfig;
use std::path::PathBuf;
use tracing::debug;

/// Packages the scripts import.
pub const REQUIRED_PACKAGES: &[&str] = &["sklearn", "pandas", "numpy", "shap", "pyxai"];

pub struct PythonBridge {
    runtime: PythonRuntime,
    executor: tokio::runtime::Runtime,
}

impl PythonBridge {
    pub fn new(runtime: PythonRuntime) -> Result<Self, ExplainError> {
        let executor = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self { runtime, executor })
    }

    pub fn from_config(config: &PythonConfig, workspace: PathBuf) -> Result<Self, ExplainError> {
        Self::new(PythonRuntime::from_config(config, workspace))
    }

    /// Run `script` with `input` and unwrap the error envelope.
    pub fn call(&self, script: &str, input: &Value) -> Result<Value, ExplainError> {
        let output = self
            .executor
            .block_on(self.runtime.run_script(script, input, None))?;
        debug!("Python script returned");
        unwrap_envelope(output)
    }

    /// Fail with the names of any [`REQUIRED_PACKAGES`] the interpreter lacks.
    pub fn ensure_packages(&self) -> Result<(), ExplainError> {
        require(self.missing_packages(REQUIRED_PACKAGES))
    }

    /// Those of `packages` that cannot be imported, sorted.
    pub fn missing_packages(&self, packages: &[&str]) -> Vec<String> {
        let status = self.executor.block_on(self.runtime.check_packages(packages));
        let mut missing: Vec<String> = status
            .into_iter()
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| name)
            .collect();
        missing.sort();
        missing
    }
}

fn require(missing: Vec<String>) -> Result<(), ExplainError> {
    if missing.is_empty() {
        return Ok(());
    }
    Err(ExplainError::python(format!(
        "missing Python packages: {} (pip install {})",
        missing.join(", "),
        missing.join(" ")
    )))
}

/// Turn `{"error": kind, "message": text}` into the matching error.
pub fn unwrap_envelope(output: Value) -> Result<Value, ExplainError> {
    let Some(kind) = output.get("error").and_then(Value::as_str) else {
        return Ok(output);
    };
    let message = output
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    match kind {
        "unsupported_model" => Err(ExplainError::UnsupportedModel(message)),
        _ => Err(ExplainError::Oracle(message)),
    }
}
