// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Provides temp directories, template files and ready-made engines for tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::fs;

use tfx::template::{literal, FunctionResult, Literal, TemplateEngine};

pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn template_file(&self, name: &str) -> PathBuf {
        self.path().join(format!("{}.txt", name))
    }

    pub fn output_file(&self, name: &str) -> PathBuf {
        self.path().join(format!("{}_output.txt", name))
    }

    pub async fn create_template_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.template_file(name);
        fs::write(&path, content)
            .await
            .expect("Failed to write template file");
        path
    }

    pub async fn create_file(&self, file_name: &str, content: &str) -> PathBuf {
        let path = self.path().join(file_name);
        fs::write(&path, content).await.expect("Failed to write file");
        path
    }
}

/// `minus(a, b)`: integer math for two integers, float math otherwise
pub fn minus(args: &[Literal]) -> FunctionResult {
    literal::expect_arity(args, 2)?;
    if let (Literal::Integer(a), Literal::Integer(b)) = (&args[0], &args[1]) {
        return Ok(Some((a - b).to_string()));
    }
    let a = literal::float_arg(args, 0)?;
    let b = literal::float_arg(args, 1)?;
    Ok(Some((a - b).to_string()))
}

pub fn greet(args: &[Literal]) -> FunctionResult {
    literal::expect_arity(args, 0)?;
    Ok(Some("hi".to_string()))
}

pub fn noop(_args: &[Literal]) -> FunctionResult {
    Ok(None)
}

/// Echoes its arguments as `type:value` pairs, for inspecting coercion
pub fn describe(args: &[Literal]) -> FunctionResult {
    let parts: Vec<String> = args
        .iter()
        .map(|arg| format!("{}:{}", arg.type_name(), arg))
        .collect();
    Ok(Some(parts.join("|")))
}

/// Engine with a couple of variables and the test functions above
pub fn sample_engine() -> TemplateEngine {
    let mut engine = TemplateEngine::new().expect("Failed to create engine");
    engine.register_variable("name", "nexus").unwrap();
    engine.register_variable("x", "z").unwrap();
    engine.register_function("minus", minus).unwrap();
    engine.register_function("greet", greet).unwrap();
    engine.register_function("noop", noop).unwrap();
    engine.register_function("describe", describe).unwrap();
    engine
}
