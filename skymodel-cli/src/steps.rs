//! TOML step files.
//!
//! ```toml
//! skymodel = "field.sky"
//!
//! [[steps]]
//! operation = "concatenate"
//! skymodel2 = "extra.sky"
//! match_by = "position"
//! radius = 0.003
//! keep_matches = "from1"
//! out_file = "merged.sky"
//!
//! [[steps]]
//! operation = "add"
//! [steps.columns]
//! ReferenceFrequency = 1.5e8
//! SpectralIndex = [-0.7, 0.1]
//! ```
//!
//! Relative paths are resolved against the directory of the step file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use skymodel_lib::merge::DEFAULT_RADIUS;
use skymodel_lib::{ConcatenateOptions, KeepMatches, MatchBy};

use crate::error::CliError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct StepFile {
    pub skymodel: PathBuf,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "operation", rename_all = "lowercase")]
pub(crate) enum Step {
    Concatenate {
        skymodel2: PathBuf,
        match_by: Option<String>,
        radius: Option<f64>,
        keep_matches: Option<String>,
        out_file: Option<PathBuf>,
    },
    Add {
        #[serde(default)]
        columns: BTreeMap<String, ColumnLiteral>,
        out_file: Option<PathBuf>,
    },
}

/// A column value as written in TOML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum ColumnLiteral {
    Number(f64),
    List(Vec<f64>),
    Text(String),
}

impl ColumnLiteral {
    /// The literal in the textual form column parsers accept.
    pub(crate) fn to_literal(&self) -> String {
        match self {
            ColumnLiteral::Number(v) => format!("{v:?}"),
            ColumnLiteral::List(v) => v
                .iter()
                .map(|x| format!("{x:?}"))
                .collect::<Vec<_>>()
                .join(";"),
            ColumnLiteral::Text(s) => s.clone(),
        }
    }
}

impl StepFile {
    /// Load a step file and resolve its paths.
    pub(crate) fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path)?;
        let mut file = Self::parse(&text)?;
        let base = path.parent().unwrap_or(Path::new(""));
        file.resolve_paths(base);
        Ok(file)
    }

    pub(crate) fn parse(text: &str) -> Result<Self, CliError> {
        toml::from_str(text).map_err(|e| CliError::config(e.to_string()))
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.skymodel);
        for step in &mut self.steps {
            match step {
                Step::Concatenate {
                    skymodel2,
                    out_file,
                    ..
                } => {
                    resolve(skymodel2);
                    if let Some(p) = out_file {
                        resolve(p);
                    }
                }
                Step::Add { out_file, .. } => {
                    if let Some(p) = out_file {
                        resolve(p);
                    }
                }
            }
        }
    }
}

impl Step {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Step::Concatenate { .. } => "concatenate",
            Step::Add { .. } => "add",
        }
    }
}

/// Merge options from a concatenate step, with defaults for missing keys.
pub(crate) fn concatenate_options(
    match_by: Option<&str>,
    radius: Option<f64>,
    keep_matches: Option<&str>,
) -> Result<ConcatenateOptions, CliError> {
    Ok(ConcatenateOptions {
        match_by: match_by.map(str::parse).transpose()?.unwrap_or(MatchBy::Name),
        radius: radius.unwrap_or(DEFAULT_RADIUS),
        keep: keep_matches
            .map(str::parse)
            .transpose()?
            .unwrap_or(KeepMatches::All),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEPS: &str = r#"
skymodel = "field.sky"

[[steps]]
operation = "concatenate"
skymodel2 = "extra.sky"
match_by = "position"
keep_matches = "from2"

[[steps]]
operation = "add"
out_file = "/tmp/out.sky"
[steps.columns]
ReferenceFrequency = 1.5e8
SpectralIndex = [-0.7, 0.1]
Type = "POINT"
"#;

    #[test]
    fn test_parse_steps() {
        let mut file = StepFile::parse(STEPS).unwrap();
        file.resolve_paths(Path::new("/data"));
        assert_eq!(file.skymodel, PathBuf::from("/data/field.sky"));
        assert_eq!(file.steps.len(), 2);

        let Step::Concatenate {
            skymodel2,
            match_by,
            radius,
            keep_matches,
            out_file,
        } = &file.steps[0]
        else {
            panic!("expected concatenate");
        };
        assert_eq!(skymodel2, &PathBuf::from("/data/extra.sky"));
        assert!(out_file.is_none());
        let opts =
            concatenate_options(match_by.as_deref(), *radius, keep_matches.as_deref()).unwrap();
        assert_eq!(opts.match_by, MatchBy::Position);
        assert_eq!(opts.keep, KeepMatches::From2);
        assert_eq!(opts.radius, DEFAULT_RADIUS);

        let Step::Add { columns, out_file } = &file.steps[1] else {
            panic!("expected add");
        };
        assert_eq!(out_file.as_deref(), Some(Path::new("/tmp/out.sky")));
        assert_eq!(columns["ReferenceFrequency"].to_literal(), "150000000.0");
        assert_eq!(columns["SpectralIndex"].to_literal(), "-0.7;0.1");
        assert_eq!(columns["Type"], ColumnLiteral::Text("POINT".into()));
    }

    #[test]
    fn test_unknown_operation() {
        let err = StepFile::parse("skymodel = \"a\"\n[[steps]]\noperation = \"select\"\n").unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_bad_option_value() {
        let err = concatenate_options(Some("flux"), None, None).unwrap_err();
        assert!(matches!(err, CliError::Operation(_)));
    }
}
