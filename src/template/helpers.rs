// ABOUTME: Built-in template functions
// ABOUTME: Implements env, text, arithmetic, timestamp, uuid, hostname and base64 functions

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use std::env;
use std::fmt::Write as _;
use uuid::Uuid;

use super::error::{InvocationError, Result};
use super::literal::{expect_arity, float_arg, int_arg, text_arg, Literal};
use super::registry::{FunctionResult, Registry};

/// Environment variable function - `env(name)` or `env(name, default)`
pub fn env_function(args: &[Literal]) -> FunctionResult {
    if args.is_empty() || args.len() > 2 {
        return Err(InvocationError::arity("1..=2", args.len()));
    }

    let name = text_arg(args, 0)?;
    if name.is_empty() || name.contains(['=', '\0']) {
        return Err(InvocationError::argument(0, "invalid environment variable name"));
    }
    let default = match args.get(1) {
        Some(_) => text_arg(args, 1)?,
        None => String::new(),
    };

    Ok(Some(env::var(name).unwrap_or(default)))
}

pub fn upper_function(args: &[Literal]) -> FunctionResult {
    expect_arity(args, 1)?;
    Ok(Some(text_arg(args, 0)?.to_uppercase()))
}

pub fn lower_function(args: &[Literal]) -> FunctionResult {
    expect_arity(args, 1)?;
    Ok(Some(text_arg(args, 0)?.to_lowercase()))
}

pub fn trim_function(args: &[Literal]) -> FunctionResult {
    expect_arity(args, 1)?;
    Ok(Some(text_arg(args, 0)?.trim().to_string()))
}

/// Largest output `repeat` will build, in bytes
pub const MAX_REPEAT_LEN: usize = 16 * 1024 * 1024;

/// `repeat(text, count)`
pub fn repeat_function(args: &[Literal]) -> FunctionResult {
    expect_arity(args, 2)?;
    let text = text_arg(args, 0)?;
    let count = usize::try_from(int_arg(args, 1)?)
        .map_err(|_| InvocationError::argument(1, "count is out of range"))?;

    match text.len().checked_mul(count) {
        Some(len) if len <= MAX_REPEAT_LEN => Ok(Some(text.repeat(count))),
        _ => Err(InvocationError::argument(1, "count is out of range")),
    }
}

/// `add(a, b)`; integer inputs stay integers, anything else is float math
pub fn add_function(args: &[Literal]) -> FunctionResult {
    arithmetic(args, i64::checked_add, |a, b| a + b)
}

/// `sub(a, b)`
pub fn sub_function(args: &[Literal]) -> FunctionResult {
    arithmetic(args, i64::checked_sub, |a, b| a - b)
}

fn arithmetic(
    args: &[Literal],
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> FunctionResult {
    expect_arity(args, 2)?;

    if let (Literal::Integer(a), Literal::Integer(b)) = (&args[0], &args[1]) {
        return int_op(*a, *b)
            .map(|value| Some(value.to_string()))
            .ok_or_else(|| InvocationError::failed("integer overflow"));
    }

    // Float results keep their decimal point, so 1.5 + 1.5 renders as "3.0"
    let a = float_arg(args, 0)?;
    let b = float_arg(args, 1)?;
    Ok(Some(format!("{:?}", float_op(a, b))))
}

/// Timestamp function - current UTC time with an optional strftime format
pub fn timestamp_function(args: &[Literal]) -> FunctionResult {
    let format = match args {
        [] => "%Y-%m-%d %H:%M:%S".to_string(),
        [_] => text_arg(args, 0)?,
        _ => return Err(InvocationError::arity("0..=1", args.len())),
    };

    let mut formatted = String::new();
    write!(formatted, "{}", Utc::now().format(&format)).map_err(|_| {
        InvocationError::argument(0, format!("invalid timestamp format '{}'", format))
    })?;

    Ok(Some(formatted))
}

/// UUID function - generates a new UUID v4
pub fn uuid_function(args: &[Literal]) -> FunctionResult {
    expect_arity(args, 0)?;
    Ok(Some(Uuid::new_v4().to_string()))
}

/// Hostname function - returns the system hostname
pub fn hostname_function(args: &[Literal]) -> FunctionResult {
    expect_arity(args, 0)?;
    let hostname =
        hostname::get().map_err(|_| InvocationError::failed("Failed to get hostname"))?;
    Ok(Some(hostname.to_string_lossy().into_owned()))
}

pub fn base64_encode_function(args: &[Literal]) -> FunctionResult {
    expect_arity(args, 1)?;
    Ok(Some(BASE64.encode(text_arg(args, 0)?.as_bytes())))
}

pub fn base64_decode_function(args: &[Literal]) -> FunctionResult {
    expect_arity(args, 1)?;
    let input = text_arg(args, 0)?;

    let decoded = BASE64
        .decode(input.as_bytes())
        .map_err(|e| InvocationError::failed(format!("Invalid base64 input: {}", e)))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|e| InvocationError::failed(format!("Invalid UTF-8 in decoded data: {}", e)))?;

    Ok(Some(decoded))
}

/// Register all built-in functions
pub fn register_builtins(registry: &mut Registry) -> Result<()> {
    registry.register_function("env", env_function)?;
    registry.register_function("upper", upper_function)?;
    registry.register_function("lower", lower_function)?;
    registry.register_function("trim", trim_function)?;
    registry.register_function("repeat", repeat_function)?;
    registry.register_function("add", add_function)?;
    registry.register_function("sub", sub_function)?;
    registry.register_function("timestamp", timestamp_function)?;
    registry.register_function("uuid", uuid_function)?;
    registry.register_function("hostname", hostname_function)?;
    registry.register_function("base64_encode", base64_encode_function)?;
    registry.register_function("base64_decode", base64_decode_function)?;
    Ok(())
}
