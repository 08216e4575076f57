//! Charm-style CLI prompts using cliclack

use crate::config::{validate_project_name, ConfigBuilder, ConfigValue, Configuration};
use crate::error::CreatorError;
use crate::product::ProductConfig;
use crate::templates::{self, PromptKind, PromptSpec, Template, TemplateRegistry};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Directory holding the template folders (overrides the product default)
    pub template_dir: Option<PathBuf>,

    /// Template identifier to use
    pub template: Option<String>,

    /// Name of the project, also the directory created
    pub project_name: Option<String>,

    /// Values given on the command line, keyed by prompt name
    pub values: Configuration,

    /// Accept declared defaults instead of prompting (non-interactive mode)
    pub yes: bool,
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs) -> Result<()> {
    cliclack::intro(config.display_name())?;

    // Step 1: Project name and destination
    let project_name = select_project_name(&args)?;
    let project_dir = std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(&project_name);
    if project_dir.exists() {
        return Err(CreatorError::DestinationExists(project_dir).into());
    }

    // Step 2: Discover templates
    let templates_dir = config.templates_dir(args.template_dir.as_deref());
    let registry = load_registry(&templates_dir)?;

    // Step 3: Select template
    let template = select_template(&registry, args.template.as_deref())?;

    // Step 4: Collect prompt values
    let configuration = collect_configuration(template, &project_name, &args)?;

    // Step 5: Create project
    create_project(&registry, template, &project_dir, &configuration).await?;

    // Step 6: Show next steps
    print_next_steps(config, &project_dir, &template.id)?;

    Ok(())
}

fn select_project_name(args: &CreateArgs) -> Result<String> {
    let name = match &args.project_name {
        Some(name) => name.clone(),
        None => cliclack::input("Project name")
            .placeholder("my-app")
            .validate(|input: &String| validate_project_name(input))
            .interact()?,
    };

    validate_project_name(&name)
        .map_err(|e| anyhow::anyhow!("{} (examples: my-app, my_app, webapp123)", e))?;
    Ok(name)
}

fn load_registry(templates_dir: &Path) -> Result<TemplateRegistry> {
    let spinner = cliclack::spinner();
    spinner.start("Loading templates...");

    let registry = match TemplateRegistry::discover(templates_dir) {
        Ok(registry) => registry,
        Err(e) => {
            spinner.stop("Failed to load templates");
            return Err(e).with_context(|| {
                format!("Failed to discover templates in {}", templates_dir.display())
            });
        }
    };

    spinner.stop(format!(
        "Templates loaded from {}",
        registry.root().display()
    ));

    for (id, reason) in registry.invalid() {
        cliclack::log::warning(format!("Skipping template '{}': {}", id, reason))?;
    }

    if registry.is_empty() {
        anyhow::bail!("No templates found.");
    }

    Ok(registry)
}

fn select_template<'r>(
    registry: &'r TemplateRegistry,
    specified_template: Option<&str>,
) -> Result<&'r Template> {
    // If a template was specified via --template flag, use it directly
    if let Some(id) = specified_template {
        let template = registry.get(id).with_context(|| {
            format!("Available templates: {}", registry.ids().join(", "))
        })?;
        cliclack::log::info(format!("Using template: {}", template.manifest.name))?;
        return Ok(template);
    }

    let templates: Vec<&Template> = registry.templates().collect();

    // If only one template, use it automatically
    if let [only] = templates.as_slice() {
        cliclack::log::info(format!(
            "Using template: {} - {}",
            only.manifest.name, only.manifest.description
        ))?;
        return Ok(*only);
    }

    let mut select = cliclack::select("What type of app?");
    for (idx, template) in templates.iter().enumerate() {
        select = select.item(idx, &template.manifest.name, &template.manifest.description);
    }
    let selected_idx: usize = select.interact()?;

    templates
        .get(selected_idx)
        .copied()
        .ok_or_else(|| anyhow::anyhow!("Invalid template selection"))
}

fn collect_configuration(
    template: &Template,
    project_name: &str,
    args: &CreateArgs,
) -> Result<Configuration> {
    let manifest = &template.manifest;
    let builder = ConfigBuilder::new()
        .project_name(project_name)
        .cli_values(args.values.clone());

    let missing: Vec<&PromptSpec> = builder
        .missing_prompts(manifest)
        .into_iter()
        .filter_map(|name| manifest.prompt(name))
        .collect();

    let mut answers = Configuration::new();
    if args.yes {
        let unanswered: Vec<&str> = missing
            .iter()
            .filter(|p| p.initial.is_none())
            .map(|p| p.name.as_str())
            .collect();
        if !unanswered.is_empty() {
            cliclack::log::warning(format!(
                "No default for: {} (placeholders left as-is)",
                unanswered.join(", ")
            ))?;
        }
    } else {
        for prompt in missing {
            answers.insert(prompt.name.clone(), ask(prompt)?);
        }
    }

    Ok(builder.answers(answers).defaults_from(manifest).build())
}

/// Ask a single prompt, pre-filled with its declared default
fn ask(prompt: &PromptSpec) -> Result<ConfigValue> {
    let initial = prompt.initial.as_ref().map(ConfigValue::to_string);

    let value = match prompt.kind {
        PromptKind::Bool => {
            let initial = matches!(prompt.initial, Some(ConfigValue::Bool(true)));
            let answer: bool = cliclack::confirm(&prompt.message)
                .initial_value(initial)
                .interact()?;
            ConfigValue::Bool(answer)
        }
        PromptKind::Number => {
            let mut input = cliclack::input(&prompt.message).validate(|input: &String| {
                match input.trim().parse::<f64>() {
                    Ok(n) if n.is_finite() => Ok(()),
                    _ => Err("Please enter a number"),
                }
            });
            if let Some(initial) = &initial {
                input = input.default_input(initial);
            }
            let answer: String = input.interact()?;
            ConfigValue::parse_cli(&answer)
        }
        PromptKind::Text => {
            let mut input = cliclack::input(&prompt.message);
            if let Some(initial) = &initial {
                input = input.default_input(initial);
            }
            let answer: String = input.interact()?;
            ConfigValue::Text(answer)
        }
    };

    Ok(value)
}

async fn create_project(
    registry: &TemplateRegistry,
    template: &Template,
    project_dir: &Path,
    configuration: &Configuration,
) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Creating project...");

    let report =
        match templates::create_project(registry, &template.id, project_dir, configuration).await
        {
            Ok(report) => report,
            Err(e) => {
                spinner.stop("Failed to create project");
                return Err(match partial_write_note(&e, project_dir) {
                    Some(note) => anyhow::Error::new(e).context(note),
                    None => e.into(),
                });
            }
        };

    spinner.stop(format!(
        "Created {} files in {}",
        report.written.len(),
        project_dir.display()
    ));

    for issue in &report.issues {
        cliclack::log::warning(issue.to_string())?;
    }

    Ok(())
}

/// Note for failures that may have left files behind.
///
/// Only I/O errors happen after the destination is claimed; everything else
/// is raised before the first write.
fn partial_write_note(err: &CreatorError, project_dir: &Path) -> Option<String> {
    match err {
        CreatorError::Io { .. } if project_dir.exists() => Some(format!(
            "Project at {} may be partially written",
            project_dir.display()
        )),
        _ => None,
    }
}

fn print_next_steps<C: ProductConfig>(
    config: &C,
    project_dir: &Path,
    template_id: &str,
) -> Result<()> {
    let steps = config.next_steps(project_dir, template_id);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Check README.md for detailed instructions")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tempfile::TempDir;

    fn io_error(path: &Path) -> CreatorError {
        CreatorError::Io {
            operation: "write",
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        }
    }

    #[test]
    fn test_io_failure_after_claim_mentions_partial_project() {
        let temp = TempDir::new().unwrap();
        let note = partial_write_note(&io_error(temp.path()), temp.path()).unwrap();
        assert!(note.contains("may be partially written"));
    }

    #[test]
    fn test_failures_before_any_write_have_no_note() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("never-created");

        for err in [
            CreatorError::DestinationExists(temp.path().to_path_buf()),
            CreatorError::TemplateNotFound("ghost".to_string()),
            CreatorError::CircularInheritance("a".to_string()),
            CreatorError::ManifestParse {
                path: temp.path().join("template.json"),
                reason: "bad".to_string(),
            },
        ] {
            assert!(partial_write_note(&err, temp.path()).is_none(), "{}", err);
        }
        assert!(partial_write_note(&io_error(&missing), &missing).is_none());
    }
}
