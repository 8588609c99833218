//! Compiler options.
//!
//! Options tune the nodes the compiler emits without changing which fields
//! are matched. Everything is unset by default.
//!
//! ```yaml
//! fuzziness: AUTO
//! analyzer: standard
//! tie_breaker: 0.3
//! default_language: en
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Options applied by [`QueryCompiler`](crate::QueryCompiler).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerOptions {
    /// `fuzziness` set on every `multi_match` node.
    pub fuzziness: Option<String>,
    /// `analyzer` set on every `multi_match` node.
    pub analyzer: Option<String>,
    /// `tie_breaker` set on every `dis_max` node.
    pub tie_breaker: Option<f64>,
    /// Language used when a compile call passes an empty language code.
    pub default_language: Option<String>,
}

impl CompilerOptions {
    /// Parses options from YAML.
    ///
    /// # Example
    ///
    /// ```rust
    /// use docquery::CompilerOptions;
    ///
    /// let options = CompilerOptions::from_yaml("fuzziness: AUTO\ntie_breaker: 0.3\n").unwrap();
    /// assert_eq!(options.fuzziness.as_deref(), Some("AUTO"));
    /// assert_eq!(options.tie_breaker, Some(0.3));
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let options: CompilerOptions = serde_yaml::from_str(yaml)?;
        options.validate()?;
        Ok(options)
    }

    /// Reads options from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|err| match err {
            Error::Config { message } => Error::Config {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })
    }

    pub fn with_fuzziness(mut self, fuzziness: impl Into<String>) -> Self {
        self.fuzziness = Some(fuzziness.into());
        self
    }

    pub fn with_analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    pub fn with_tie_breaker(mut self, tie_breaker: f64) -> Self {
        self.tie_breaker = Some(tie_breaker);
        self
    }

    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = Some(language.into());
        self
    }

    fn validate(&self) -> Result<()> {
        if let Some(t) = self.tie_breaker {
            if !(0.0..=1.0).contains(&t) {
                return Err(Error::Config {
                    message: format!("tie_breaker must be between 0 and 1, got {}", t),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(CompilerOptions::from_yaml("").unwrap(), CompilerOptions::default());
    }

    #[test]
    fn parses_all_keys() {
        let options = CompilerOptions::from_yaml(
            "fuzziness: AUTO\nanalyzer: standard\ntie_breaker: 0.5\ndefault_language: ru\n",
        )
        .unwrap();
        assert_eq!(
            options,
            CompilerOptions::default()
                .with_fuzziness("AUTO")
                .with_analyzer("standard")
                .with_tie_breaker(0.5)
                .with_default_language("ru")
        );
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = CompilerOptions::from_yaml("fuzzyness: AUTO").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn tie_breaker_out_of_range() {
        let err = CompilerOptions::from_yaml("tie_breaker: 1.5").unwrap_err();
        assert!(err.to_string().contains("tie_breaker"));
    }

    #[test]
    fn from_file_reads_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fuzziness: \"1\"").unwrap();
        let options = CompilerOptions::from_file(file.path()).unwrap();
        assert_eq!(options.fuzziness.as_deref(), Some("1"));
    }

    #[test]
    fn from_file_prefixes_path_on_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "nope: 1").unwrap();
        let err = CompilerOptions::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = CompilerOptions::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
