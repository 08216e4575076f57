//! Inheritance chain resolution

use super::registry::TemplateRegistry;
use crate::error::{CreatorError, Result};

/// Ancestors of `template_id`, root ancestors first.
///
/// Each parent's own chain is expanded before the parent itself, parents are
/// visited in declared order, and the template itself is not included.
/// A template reachable through several parents appears once per path.
pub fn resolve(registry: &TemplateRegistry, template_id: &str) -> Result<Vec<String>> {
    let mut path = Vec::new();
    let mut chain = Vec::new();
    expand(registry, template_id, &mut path, &mut chain)?;
    Ok(chain)
}

fn expand(
    registry: &TemplateRegistry,
    template_id: &str,
    path: &mut Vec<String>,
    chain: &mut Vec<String>,
) -> Result<()> {
    if path.iter().any(|id| id == template_id) {
        return Err(CreatorError::CircularInheritance(template_id.to_string()));
    }

    let template = registry.get(template_id)?;
    path.push(template_id.to_string());

    for parent in &template.manifest.inherits {
        expand(registry, parent, path, chain)?;
        chain.push(parent.clone());
    }

    path.pop();
    Ok(())
}
