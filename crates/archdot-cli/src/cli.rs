//! Command-line interface for the archdot utility
//!
//! Provides a CLI to regenerate the built-in gallery diagrams, render DOT
//! text through Graphviz, and inspect the category style mapping.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use archdot::core::logging::init_logging;
use archdot::{render_dot, Category, OutputFormat};

use crate::gallery;

/// Archdot - Architecture diagrams as code, rendered via Graphviz
#[derive(Parser)]
#[command(name = "archdot")]
#[command(about = "Generate architecture diagrams as code and render them via Graphviz")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Regenerate the built-in gallery diagrams
    Gallery {
        /// Directory the artifacts are written to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Artifact format (dot skips Graphviz entirely)
        #[arg(long, value_enum, default_value_t = ArtifactChoice::Png)]
        format: ArtifactChoice,

        /// Only regenerate gallery diagrams whose name contains this string
        #[arg(long)]
        only: Option<String>,
    },

    /// Render existing DOT text through Graphviz
    Render {
        /// Input DOT file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output image file
        #[arg(short, long)]
        output: PathBuf,

        /// Image format
        #[arg(long, value_enum, default_value_t = ImageChoice::Png)]
        format: ImageChoice,
    },

    /// Show the category style mapping
    Categories {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Artifact formats the gallery command can produce
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ArtifactChoice {
    /// Render to PNG via Graphviz
    #[default]
    Png,
    /// Render to SVG via Graphviz
    Svg,
    /// Write the DOT text itself
    Dot,
}

/// Image formats for the render command
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ImageChoice {
    #[default]
    Png,
    Svg,
}

impl From<ImageChoice> for OutputFormat {
    fn from(value: ImageChoice) -> Self {
        match value {
            ImageChoice::Png => OutputFormat::Png,
            ImageChoice::Svg => OutputFormat::Svg,
        }
    }
}

/// One row of the category listing
#[derive(Debug, Serialize)]
struct CategoryInfo {
    name: String,
    shape: &'static str,
    fill: &'static str,
}

impl CategoryInfo {
    fn collect() -> Vec<CategoryInfo> {
        Category::all()
            .iter()
            .map(|c| CategoryInfo {
                name: c.to_string(),
                shape: c.shape(),
                fill: c.fill(),
            })
            .collect()
    }
}

/// Main CLI application
pub struct ArchdotApp;

impl ArchdotApp {
    /// Create a new application instance
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over CLI flags
        let log_level_str = std::env::var("ARCHDOT_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("ARCHDOT_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Archdot v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Gallery {
                output_dir,
                format,
                only,
            } => self.gallery_command(&output_dir, format, only.as_deref(), cli.verbose),
            Commands::Render {
                input,
                output,
                format,
            } => self.render_command(input, &output, format, cli.verbose),
            Commands::Categories { json } => self.categories_command(json),
        }
    }

    /// Handle the gallery command
    fn gallery_command(
        &self,
        output_dir: &Path,
        format: ArtifactChoice,
        only: Option<&str>,
        verbose: bool,
    ) -> Result<()> {
        fs::create_dir_all(output_dir).map_err(|e| {
            anyhow!(
                "Failed to create output directory '{}': {}",
                output_dir.display(),
                e
            )
        })?;

        for entry in gallery::matching(only)? {
            let path = match format {
                ArtifactChoice::Dot => {
                    let path = output_dir.join(format!("{}.dot", entry.name));
                    let dot = entry.diagram.export()?;
                    fs::write(&path, dot).map_err(|e| {
                        anyhow!("Failed to write '{}': {}", path.display(), e)
                    })?;
                    path
                }
                ArtifactChoice::Png => {
                    let path = output_dir.join(format!("{}.png", entry.name));
                    entry.diagram.render_to(&path, OutputFormat::Png)?;
                    path
                }
                ArtifactChoice::Svg => {
                    let path = output_dir.join(format!("{}.svg", entry.name));
                    entry.diagram.render_to(&path, OutputFormat::Svg)?;
                    path
                }
            };

            if verbose {
                eprintln!(
                    "{}: {} nodes, {} edges, {} clusters",
                    entry.name,
                    entry.diagram.node_count(),
                    entry.diagram.edge_count(),
                    entry.diagram.cluster_count()
                );
            }
            info!(diagram = entry.name, output = %path.display(), "Generated gallery artifact");
            println!("Generated: {}", path.display());
        }

        Ok(())
    }

    /// Handle the render command
    fn render_command(
        &self,
        input: Option<PathBuf>,
        output: &Path,
        format: ImageChoice,
        verbose: bool,
    ) -> Result<()> {
        let dot = self.read_input(input)?;
        debug!(bytes = dot.len(), "Read DOT input");

        if verbose {
            eprintln!("Read {} bytes of DOT input", dot.len());
        }

        render_dot(&dot, output, format.into())?;
        println!("Generated: {}", output.display());
        Ok(())
    }

    /// Handle the categories command
    fn categories_command(&self, json: bool) -> Result<()> {
        let categories = CategoryInfo::collect();

        if json {
            let listing = serde_json::json!({
                "categories": categories,
                "total": categories.len(),
            });
            println!("{}", serde_json::to_string_pretty(&listing)?);
        } else {
            println!("Node categories and their styles:");
            for info in &categories {
                println!("  {:<10} shape={:<14} fill={}", info.name, info.shape, info.fill);
            }
            println!();
            println!("Total: {} categories", categories.len());
        }

        Ok(())
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) => {
                if path.to_string_lossy() == "-" {
                    let mut content = String::new();
                    io::stdin().read_to_string(&mut content)?;
                    Ok(content)
                } else {
                    fs::read_to_string(&path).map_err(|e| {
                        anyhow!("Failed to read input file '{}': {}", path.display(), e)
                    })
                }
            }
            None => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) => {
                if path.to_string_lossy() == "-" {
                    print!("{}", content);
                    io::stdout().flush()?;
                } else {
                    fs::write(&path, content).map_err(|e| {
                        anyhow!("Failed to write output file '{}': {}", path.display(), e)
                    })?;
                }
            }
            None => {
                print!("{}", content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

impl Default for ArchdotApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing_gallery_command() {
        let args = vec![
            "archdot",
            "gallery",
            "--output-dir",
            "out",
            "--format",
            "dot",
            "--only",
            "detailed",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Gallery {
                output_dir,
                format,
                only,
            } => {
                assert_eq!(output_dir.to_string_lossy(), "out");
                assert_eq!(format, ArtifactChoice::Dot);
                assert_eq!(only.as_deref(), Some("detailed"));
            }
            _ => panic!("Expected Gallery command"),
        }
    }

    #[test]
    fn test_cli_parsing_gallery_defaults() {
        let cli = Cli::try_parse_from(vec!["archdot", "gallery"]).unwrap();
        match cli.command {
            Commands::Gallery {
                output_dir,
                format,
                only,
            } => {
                assert_eq!(output_dir.to_string_lossy(), ".");
                assert_eq!(format, ArtifactChoice::Png);
                assert!(only.is_none());
            }
            _ => panic!("Expected Gallery command"),
        }
    }

    #[test]
    fn test_cli_parsing_render_command() {
        let args = vec![
            "archdot",
            "render",
            "--input",
            "graph.dot",
            "--output",
            "graph.svg",
            "--format",
            "svg",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Render {
                input,
                output,
                format,
            } => {
                assert_eq!(input.unwrap().to_string_lossy(), "graph.dot");
                assert_eq!(output.to_string_lossy(), "graph.svg");
                assert_eq!(format, ImageChoice::Svg);
            }
            _ => panic!("Expected Render command"),
        }
    }

    #[test]
    fn test_cli_parsing_categories_command() {
        let cli = Cli::try_parse_from(vec!["archdot", "categories", "--json"]).unwrap();
        match cli.command {
            Commands::Categories { json } => assert!(json),
            _ => panic!("Expected Categories command"),
        }
    }

    #[test]
    fn test_verbose_flag() {
        let cli = Cli::try_parse_from(vec!["archdot", "--verbose", "categories"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_image_choice_conversion() {
        assert_eq!(OutputFormat::from(ImageChoice::Png), OutputFormat::Png);
        assert_eq!(OutputFormat::from(ImageChoice::Svg), OutputFormat::Svg);
    }

    #[test]
    fn test_category_info_covers_all_categories() {
        let infos = CategoryInfo::collect();
        assert_eq!(infos.len(), Category::all().len());
        assert!(infos.iter().any(|i| i.name == "database"));
    }

    #[test]
    fn test_gallery_dot_artifacts_are_written() {
        let dir = tempdir().unwrap();
        let app = ArchdotApp::new();
        app.gallery_command(dir.path(), ArtifactChoice::Dot, None, false)
            .unwrap();

        for name in ["architecture", "architecture_detailed", "event_flow"] {
            let path = dir.path().join(format!("{}.dot", name));
            let dot = fs::read_to_string(&path).unwrap();
            assert!(dot.starts_with("digraph"), "{} must hold DOT text", name);
        }
    }

    #[test]
    fn test_gallery_only_filter_limits_output() {
        let dir = tempdir().unwrap();
        let app = ArchdotApp::new();
        app.gallery_command(dir.path(), ArtifactChoice::Dot, Some("event"), false)
            .unwrap();

        assert!(dir.path().join("event_flow.dot").exists());
        assert!(!dir.path().join("architecture.dot").exists());
    }

    #[test]
    fn test_gallery_unknown_filter_fails() {
        let dir = tempdir().unwrap();
        let app = ArchdotApp::new();
        let result = app.gallery_command(dir.path(), ArtifactChoice::Dot, Some("nope"), false);
        assert!(result.is_err());
    }

    #[test]
    fn test_read_input_from_file() {
        let app = ArchdotApp::new();
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("graph.dot");
        fs::write(&file_path, "digraph {}").unwrap();

        let content = app.read_input(Some(file_path)).unwrap();
        assert_eq!(content, "digraph {}");
    }

    #[test]
    fn test_write_output_to_file() {
        let app = ArchdotApp::new();
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("out.dot");

        app.write_output(Some(file_path.clone()), "digraph {}").unwrap();
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "digraph {}");
    }

    #[test]
    fn test_categories_command_runs() {
        let app = ArchdotApp::new();
        assert!(app.categories_command(false).is_ok());
        assert!(app.categories_command(true).is_ok());
    }
}
