use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::Variable;
use crate::solver::CancelToken;

/// Supplies the variables for one solve.
///
/// This is the only data-acquisition hook of the solver. It is called once per
/// [`Solver::solve`](crate::Solver::solve) and may perform I/O; any error it
/// returns is surfaced unchanged as a peripheral failure.
#[async_trait]
pub trait VariableSource: Send + Sync {
    async fn get_variables(&self, cancel: &CancelToken) -> Result<Vec<Variable>>;
}

/// A fixed list of variables.
#[async_trait]
impl VariableSource for Vec<Variable> {
    async fn get_variables(&self, _cancel: &CancelToken) -> Result<Vec<Variable>> {
        Ok(self.clone())
    }
}

#[async_trait]
impl<S: VariableSource + ?Sized> VariableSource for std::sync::Arc<S> {
    async fn get_variables(&self, cancel: &CancelToken) -> Result<Vec<Variable>> {
        (**self).get_variables(cancel).await
    }
}

/// Reads a JSON array of variables from disk on every solve.
///
/// ```json
/// [
///   {"id": "app", "constraints": [{"kind": "mandatory"}, {"kind": "dependency", "ids": ["lib"]}]},
///   {"id": "lib"}
/// ]
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl VariableSource for JsonFileSource {
    async fn get_variables(&self, _cancel: &CancelToken) -> Result<Vec<Variable>> {
        let contents = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read variables from {}", self.path.display()))?;

        serde_json::from_slice(&contents)
            .with_context(|| format!("Failed to parse variables in {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{dependency, mandatory};
    use std::io::Write;

    #[tokio::test]
    async fn test_vec_source_returns_variables() {
        let variables = vec![Variable::new("1", vec![mandatory()]), Variable::new("2", vec![])];
        let fetched = variables.get_variables(&CancelToken::new()).await.unwrap();
        assert_eq!(fetched, variables);
    }

    #[tokio::test]
    async fn test_json_file_source_reads_variables() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": "app", "constraints": [{{"kind": "mandatory"}}, {{"kind": "dependency", "ids": ["lib"]}}]}},
                {{"id": "lib"}}
            ]"#
        )
        .unwrap();

        let source = JsonFileSource::new(file.path());
        let fetched = source.get_variables(&CancelToken::new()).await.unwrap();

        assert_eq!(
            fetched,
            vec![
                Variable::new("app", vec![mandatory(), dependency(["lib"])]),
                Variable::new("lib", vec![]),
            ]
        );
    }

    #[tokio::test]
    async fn test_json_file_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileSource::new(dir.path().join("missing.json"));

        let err = source.get_variables(&CancelToken::new()).await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to read variables from"));
    }
}
