//! CLI command implementations.
//!
//! These commands work from configuration alone, without starting the server.

use anyhow::{Context, Result};

use crate::asset;
use crate::config::Config;
use crate::resource::{ResourceCatalog, ResourceRegistry};

/// Copy the built assets into the public web root.
pub fn cmd_publish(config: &Config, force: bool) -> Result<()> {
    let target = config.published_dir();
    let report = asset::publish(&config.dist_dir, &target, force)
        .context("failed to publish assets")?;

    for file in &report.copied {
        println!("published  {file}");
    }
    for file in &report.skipped {
        println!("skipped    {file} (exists, use --force to overwrite)");
    }

    println!(
        "{} file(s) published to {}, {} skipped.",
        report.copied.len(),
        target.display(),
        report.skipped.len()
    );

    Ok(())
}

/// List the resources the panel discovers.
pub fn cmd_resources(config: &Config) -> Result<()> {
    let catalog = ResourceCatalog::new()
        .with_directory(&config.resources_dir, config.resource_namespace.clone());
    let registrations = catalog.discover()?;
    let registry = ResourceRegistry::build(&registrations)?;

    if registry.is_empty() {
        println!("No resources found in {}.", config.resources_dir.display());
        return Ok(());
    }

    println!("{:<24} {:<48} {:<10}", "SLUG", "IDENTIFIER", "NAVIGATION");
    println!("{}", "-".repeat(84));

    for (slug, entry) in registry.iter() {
        let navigation = if entry.resource().has_default_action() {
            "yes"
        } else {
            "no"
        };
        println!("{:<24} {:<48} {}", slug, entry.identifier(), navigation);
    }

    Ok(())
}
