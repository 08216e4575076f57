//! Creator CLI - Project scaffolding for applications and libraries

mod logging;

use anyhow::Result;
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use colored::Colorize;
use creator_core::tui::CreateArgs;
use creator_core::{ConfigValue, Configuration, ProductConfig, TemplateRegistry};
use std::path::{Path, PathBuf};

/// Creator product configuration
#[derive(Clone)]
pub struct CreatorConfig;

impl ProductConfig for CreatorConfig {
    fn name(&self) -> &'static str {
        "creator"
    }

    fn display_name(&self) -> &'static str {
        "Creator"
    }

    fn default_templates_dir(&self) -> PathBuf {
        // Prefer templates shipped next to the binary
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("templates")))
            .filter(|dir| dir.is_dir())
            .unwrap_or_else(|| PathBuf::from("templates"))
    }

    fn next_steps(&self, dir: &Path, template_id: &str) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }

        match template_id {
            "web-library" | "node-library" => {
                steps.push("npm install          # Install dependencies".to_string());
                steps.push("npm run dev          # Development mode".to_string());
                steps.push("npm run build        # Build for production".to_string());
                steps.push("./publish.sh         # Publish to npm".to_string());
            }
            "static" | "spa-api" => {
                steps.push("./run.sh dev         # Local development".to_string());
                steps.push("./run.sh deploy      # Deploy to production".to_string());
            }
            _ => steps.push("npm install          # Install dependencies".to_string()),
        }

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "creator")]
#[command(about = "Project scaffolding for applications and libraries")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project
    New(CliCreateArgs),
    /// List available templates and their options
    List(ListArgs),
}

#[derive(ClapArgs, Debug)]
pub struct CliCreateArgs {
    /// Project name (letters, numbers, hyphens, and underscores)
    pub project_name: Option<String>,

    /// Template to use
    #[arg(short, long)]
    pub template: Option<String>,

    /// Directory containing templates
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Template-specific option, repeatable (e.g. --set port=3000)
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub values: Vec<(String, String)>,

    /// Accept template defaults without prompting (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            template_dir: args.template_dir,
            template: args.template,
            project_name: args.project_name,
            values: args
                .values
                .iter()
                .map(|(k, v)| (k.clone(), ConfigValue::parse_cli(v)))
                .collect::<Configuration>(),
            yes: args.yes,
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct ListArgs {
    /// Directory containing templates
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,
}

/// Parse a `key=value` pair
fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim().trim_start_matches("--");
    if key.is_empty() {
        return Err(format!("missing key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Print templates with their prompt options
fn list_templates<C: ProductConfig>(config: &C, template_dir: Option<&Path>) -> Result<()> {
    let dir = config.templates_dir(template_dir);
    let registry = TemplateRegistry::discover(&dir)?;

    println!("{}", "Available Templates:".bold());
    println!(
        "{}",
        format!("  from {}", registry.root().display()).dimmed()
    );
    println!();

    for template in registry.templates() {
        println!(
            "  {} - {}",
            template.id.yellow(),
            template.manifest.description
        );
        if !template.manifest.prompts.is_empty() {
            let options: Vec<String> = template
                .manifest
                .prompts
                .iter()
                .map(|p| format!("--set {}=...", p.name))
                .collect();
            println!("{}", format!("    Options: {}", options.join(", ")).dimmed());
        }
        if !template.manifest.inherits.is_empty() {
            println!(
                "{}",
                format!("    Inherits: {}", template.manifest.inherits.join(", ")).dimmed()
            );
        }
        println!();
    }

    for (id, reason) in registry.invalid() {
        eprintln!("{} {}: {}", "Warning:".yellow(), id, reason);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    logging::init_logging(args.verbose, args.quiet)?;
    let config = CreatorConfig;

    match args.command {
        Some(Command::List(list_args)) => list_templates(&config, list_args.template_dir.as_deref()),
        Some(Command::New(create_args)) => {
            let result = creator_core::run(&config, create_args.into()).await;

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
        None => {
            // No subcommand provided, default to interactive create
            let result = creator_core::run(&config, CreateArgs::default()).await;

            let _ = console::Term::stderr().show_cursor();

            result
        }
    }
}
