use serde_json::{json, Value};
use std::io::{BufRead, Write};

use crate::cli::OutputFormat;
use crate::error::ClientError;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// JSON body for a failed command
pub fn error_body(message: &str, error_code: Option<&str>) -> Value {
    let mut response = json!({
        "success": false,
        "error": message
    });

    if let Some(code) = error_code {
        response["error_code"] = json!(code);
    }
    response
}

/// Turn a backend failure into the command's error. JSON callers also get a
/// machine-readable body on stdout; the binary prints the message either way.
pub fn report_failure(output_format: &OutputFormat, err: ClientError) -> anyhow::Error {
    emit_json_error(
        &mut std::io::stdout(),
        output_format,
        &err.to_string(),
        Some(err.error_code()),
    );
    err.into()
}

/// `report_failure` for errors that do not come from the backend
pub fn report_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Error {
    emit_json_error(&mut std::io::stdout(), output_format, message, error_code);
    anyhow::anyhow!("{}", message)
}

/// Writes the JSON error body in JSON mode only
pub fn emit_json_error(
    out: &mut impl Write,
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) {
    if let OutputFormat::Json = output_format {
        let written = serde_json::to_string_pretty(&error_body(message, error_code))
            .map_err(std::io::Error::from)
            .and_then(|body| writeln!(out, "{}", body));
        if let Err(e) = written {
            tracing::warn!("Failed to write error body: {}", e);
        }
    }
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Ask a yes/no question on stdin; anything but y/yes is a no
pub fn confirm(prompt: &str) -> anyhow::Result<bool> {
    confirm_from(prompt, &mut std::io::stdin().lock(), &mut std::io::stderr())
}

pub fn confirm_from(
    prompt: &str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> anyhow::Result<bool> {
    write!(output, "{} [y/N] ", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
