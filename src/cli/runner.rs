//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OptionArgs, OutputFormat};
use crate::config::{load_options, InferenceOptions};
use crate::error::{Result, ResultExt};
use crate::reader::{ReaderMode, WireKind};
use crate::schema::{classify, infer_from_str, Annotation, TypeDescriptor};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command and print its output
    pub fn run(&self) -> Result<()> {
        let output = self.execute()?;
        print!("{output}");
        if !output.ends_with('\n') {
            println!();
        }
        Ok(())
    }

    /// Run the CLI command and return the rendered output
    pub fn execute(&self) -> Result<String> {
        match &self.cli.command {
            Commands::Infer {
                input,
                mode,
                options,
            } => self.infer(input.as_deref(), (*mode).into(), options),
            Commands::Kinds { options } => self.kinds(options),
        }
    }

    /// Merge the options file (if any) with flag overrides
    fn resolve_options(&self, args: &OptionArgs) -> Result<InferenceOptions> {
        let mut options = match &self.cli.config {
            Some(path) => {
                debug!("Loading inference options from {}", path.display());
                load_options(path)?
            }
            None => InferenceOptions::default(),
        };

        if let Some(name) = &args.name {
            options.root_schema_name.clone_from(name);
        }
        if args.no_minimize_integers {
            options.minimize_integer_size = false;
        }
        if args.truncate_integers {
            options.truncate_integers = true;
        }
        if let Some(limit) = args.array_depth_limit {
            options.array_depth_limit = limit;
        }
        options.validate()?;

        if options.truncate_integers && !options.minimize_integer_size {
            warn!("truncate_integers has no effect while integer narrowing is disabled");
        }
        Ok(options)
    }

    /// Infer schemas from a file or stdin
    fn infer(&self, input: Option<&Path>, mode: ReaderMode, args: &OptionArgs) -> Result<String> {
        let options = self.resolve_options(args)?;
        let text = match input {
            Some(path) => fs::read_to_string(path)
                .context(format!("Failed to read input '{}'", path.display()))?,
            None => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("Failed to read input from stdin")?;
                text
            }
        };

        let result = infer_from_str(&text, mode, &options)?;
        info!(
            "Inferred {} schema(s) rooted at '{}'",
            result.len(),
            result.root().name
        );
        self.render(&result)
    }

    /// List every scalar wire kind with its classification
    fn kinds(&self, args: &OptionArgs) -> Result<String> {
        let options = self.resolve_options(args)?;
        let rows = WireKind::ALL
            .into_iter()
            .filter(|kind| !kind.is_composite())
            .map(|kind| {
                let classification = classify(kind, &options)?;
                Ok(KindRow {
                    kind,
                    ty: classification.ty,
                    annotations: classification.annotations,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.render(&KindTable(rows))
    }

    /// Render a value in the selected output format
    fn render<T: Serialize + fmt::Display>(&self, value: &T) -> Result<String> {
        Ok(match self.cli.format {
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
            // Through a JSON value so enum variants become plain mappings
            // rather than YAML tags
            OutputFormat::Yaml => serde_yaml::to_string(&serde_json::to_value(value)?)?,
            OutputFormat::Pretty => value.to_string(),
        })
    }
}

/// One line of the `kinds` listing
#[derive(Debug, Serialize)]
struct KindRow {
    kind: WireKind,
    #[serde(rename = "type")]
    ty: TypeDescriptor,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    annotations: Vec<Annotation>,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
struct KindTable(Vec<KindRow>);

impl fmt::Display for KindTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.0 {
            write!(f, "{:<16} {}", row.kind, row.ty)?;
            for annotation in &row.annotations {
                write!(f, " {}", annotation.tag())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn runner(args: &[&str]) -> Runner {
        let mut argv = vec!["docshape"];
        argv.extend_from_slice(args);
        Runner::new(Cli::try_parse_from(argv).unwrap())
    }

    fn input_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut config = tempfile::NamedTempFile::new().unwrap();
        writeln!(config, "root_schema_name: FromFile\narray_depth_limit: 1").unwrap();
        let config_path = config.path().to_str().unwrap();

        let runner = runner(&["-C", config_path, "kinds", "--name", "FromFlag", "--truncate-integers"]);
        let Commands::Kinds { options } = &runner.cli.command else {
            panic!("expected kinds");
        };
        let resolved = runner.resolve_options(options).unwrap();

        assert_eq!(
            resolved,
            InferenceOptions::default()
                .with_root_schema_name("FromFlag")
                .with_array_depth_limit(1)
                .with_truncate_integers(true)
        );
    }

    #[test]
    fn test_empty_name_flag_rejected() {
        let file = input_file("{}");
        let err = runner(&["infer", file.path().to_str().unwrap(), "--name", ""])
            .execute()
            .unwrap_err();
        assert!(err.to_string().contains("root_schema_name"));
    }

    #[test]
    fn test_infer_pretty() {
        let file = input_file(r#"{"id": 1, "tags": ["a"]}"#);
        let output = runner(&["--format", "pretty", "infer", file.path().to_str().unwrap()])
            .execute()
            .unwrap();

        assert_eq!(
            output,
            "Example\n  id: int32 `id`\n  tags: []string `tags,omitempty`\n"
        );
    }

    #[test]
    fn test_infer_simple_mode_flag() {
        let file = input_file(r#"{"n": 5.0, "id": {"$oid": "5f1b2c3d4e5f6a7b8c9d0e1f"}}"#);
        let path = file.path().to_str().unwrap();

        let simple = runner(&["--format", "pretty", "infer", path, "--mode", "simple"])
            .execute()
            .unwrap();
        assert_eq!(
            simple,
            "Example\n  n: int32 `n`\n  id: Id `id`\n\nId\n  $oid: string `$oid`\n"
        );

        let extended = runner(&["--format", "pretty", "infer", path])
            .execute()
            .unwrap();
        assert_eq!(extended, "Example\n  n: double `n`\n  id: object_id `id`\n");
    }

    #[test]
    fn test_infer_missing_file() {
        let err = runner(&["infer", "/nonexistent/input.json"])
            .execute()
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to read input"));
    }

    #[test]
    fn test_kinds_pretty() {
        let output = runner(&["--format", "pretty", "kinds", "--no-minimize-integers"])
            .execute()
            .unwrap();

        assert!(output.contains("int32            double\n"));
        assert!(output.contains("null             dynamic omitempty\n"));
        assert!(!output.contains("document"));
        assert!(!output.contains("array"));
    }
}
