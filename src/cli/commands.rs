// ABOUTME: Command implementations for the tfx CLI
// ABOUTME: Handles execution of render, check and vars commands

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use super::args::{Args, VariableArgs};
use super::config::Config;
use crate::template::TemplateEngine;

/// Substitute a template file (or stdin) and write the result
pub async fn render_template(
    input: PathBuf,
    variables: VariableArgs,
    output: Option<PathBuf>,
    stream: bool,
    config: &Config,
) -> Result<()> {
    let engine = build_engine(&variables, config).await?;
    let from_stdin = input.as_os_str() == "-";

    if stream {
        if from_stdin {
            anyhow::bail!("--stream needs a file input, not stdin");
        }
        return stream_template(&engine, &input, output.as_deref()).await;
    }

    info!("Rendering template: {}", input.display());
    let rendered = if from_stdin {
        engine.substitute_reader(std::io::stdin().lock())?
    } else {
        engine
            .substitute_file(&input)
            .with_context(|| format!("Failed to render '{}'", input.display()))?
    };

    match output {
        Some(path) => {
            fs::write(&path, rendered)
                .await
                .with_context(|| format!("Failed to write output file '{}'", path.display()))?;
            info!("Output written to: {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

async fn stream_template(
    engine: &TemplateEngine,
    input: &Path,
    output: Option<&Path>,
) -> Result<()> {
    info!("Streaming template: {}", input.display());

    // Newlines go between lines, so the output matches a whole-file render
    let mut lines = Vec::new();
    let mut first = true;
    let mut stdout = std::io::stdout().lock();
    engine
        .substitute_lines(input, |line| {
            if output.is_some() {
                lines.push(line);
            } else {
                if !first {
                    stdout.write_all(b"\n")?;
                }
                stdout.write_all(line.as_bytes())?;
                first = false;
            }
            Ok(())
        })
        .with_context(|| format!("Failed to render '{}'", input.display()))?;
    stdout.flush()?;
    drop(stdout);

    if let Some(path) = output {
        fs::write(path, lines.join("\n"))
            .await
            .with_context(|| format!("Failed to write output file '{}'", path.display()))?;
        info!("Output written to: {}", path.display());
    }

    Ok(())
}

/// List placeholders that would stay unresolved; fails if there are any
pub async fn check_template(input: PathBuf, variables: VariableArgs, config: &Config) -> Result<()> {
    let engine = build_engine(&variables, config).await?;

    let options = engine.options();
    let bytes = fs::read(&input)
        .await
        .with_context(|| format!("Failed to read template '{}'", input.display()))?;
    let content = options.encoding.decode(bytes)?;

    let total = engine.placeholders(&content).len();
    let unresolved = engine.unresolved(&content);

    if unresolved.is_empty() {
        println!(
            "✓ All {} placeholder(s) in '{}' resolve",
            total,
            input.display()
        );
        return Ok(());
    }

    println!(
        "✗ {} of {} placeholder(s) in '{}' are unresolved:",
        unresolved.len(),
        total,
        input.display()
    );
    for key in &unresolved {
        println!("  - {}", engine.anchor(key));
    }

    anyhow::bail!("{} unresolved placeholder(s)", unresolved.len())
}

/// Print the registered variables and function names
pub async fn list_variables(variables: VariableArgs, config: &Config) -> Result<()> {
    let engine = build_engine(&variables, config).await?;
    let registry = engine.registry();

    println!("Variables ({}):", registry.variable_count());
    for (name, value) in registry.variables() {
        println!("  {} = {}", name, value);
    }

    println!("Functions ({}):", registry.function_count());
    for name in registry.function_names() {
        println!("  {}()", name);
    }

    Ok(())
}

/// Build an engine with the merged variable set and, unless disabled, the built-ins
pub async fn build_engine(variables: &VariableArgs, config: &Config) -> Result<TemplateEngine> {
    let mut engine = TemplateEngine::with_options(config.engine_options()?)?;

    let merged = collect_variables(variables, config).await?;
    debug!("Registering {} template variables", merged.len());
    engine.register_map(merged)?;

    if config.builtins && !variables.no_builtins {
        engine.register_builtins()?;
    } else {
        debug!("Built-in functions disabled");
    }

    Ok(engine)
}

/// Merge config variables, the variables file and `-V` flags, later sources winning
pub async fn collect_variables(
    variables: &VariableArgs,
    config: &Config,
) -> Result<BTreeMap<String, String>> {
    let mut merged = config.variables.clone();

    if let Some(path) = &variables.vars_file {
        merged.extend(load_variables_file(path).await?);
    }

    merged.extend(Args::parse_variables(&variables.vars)?);
    Ok(merged)
}

/// Load a flat name/value map from a YAML file, or JSON when the extension is `.json`
pub async fn load_variables_file(path: &Path) -> Result<BTreeMap<String, String>> {
    let contents = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read variables file '{}'", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let variables = if is_json {
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid JSON variables file '{}'", path.display()))?
    } else {
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Invalid YAML variables file '{}'", path.display()))?
    };

    Ok(variables)
}
