//! Config and hook listing commands

use anyhow::{Context, Result, bail};
use hooks::{HookRegistry, ResponseShape};
use sentiment_core::{Config, is_url_source};
use std::path::{Path, PathBuf};

/// Where `config --init` writes: the explicit path, else the user config path
fn init_target(explicit: Option<&str>) -> Result<PathBuf> {
  if let Some(path) = explicit {
    if is_url_source(path) {
      bail!("Cannot write a config template to a url: {}", path);
    }
    return Ok(PathBuf::from(path));
  }

  Config::user_config_path().context("Could not determine the user config directory")
}

fn write_template(path: &Path) -> Result<()> {
  if path.exists() {
    bail!("Config file already exists: {:?} (delete it first to regenerate)", path);
  }

  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent).with_context(|| format!("Failed to create {:?}", parent))?;
  }

  std::fs::write(path, Config::generate_template()).with_context(|| format!("Failed to write {:?}", path))?;
  Ok(())
}

/// Write a commented config template
pub async fn cmd_config_init(explicit: Option<&str>) -> Result<()> {
  let path = init_target(explicit)?;
  write_template(&path)?;

  println!("Created config: {:?}", path);
  println!("Edit the hooks section, then run: sentimentd serve");
  Ok(())
}

/// Print the effective configuration as TOML
pub async fn cmd_config_show(config: &Config, explicit: Option<&str>) -> Result<()> {
  match Config::resolve_source(explicit) {
    Some(source) => println!("Using config: {}", source),
    None => println!("Using default configuration (no config file found)"),
  }
  println!();

  let toml_str = toml::to_string_pretty(config)?;
  println!("{}", toml_str);
  Ok(())
}

/// List configured hooks and the default
pub async fn cmd_hooks(config: &Config) -> Result<()> {
  let registry = HookRegistry::from_config(config);

  if registry.is_empty() {
    println!("No hooks configured");
    return Ok(());
  }

  for (id, hook) in registry.iter() {
    let marker = if registry.default_hook() == Some(id) { "*" } else { " " };
    let shape = match ResponseShape::of(hook) {
      ResponseShape::RawText => "raw text".to_string(),
      ResponseShape::KeyedText => format!("text at '{}'", hook.key().unwrap_or_default()),
      ResponseShape::KeyedSeries => format!("series at '{}'", hook.key().unwrap_or_default()),
      ResponseShape::BareSeries => "series".to_string(),
    };
    println!("{} {:<16} {}  [{}]", marker, id, hook.url, shape);
  }
  println!();
  println!("* default hook");

  Ok(())
}
