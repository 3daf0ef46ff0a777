pub mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use imgconv_api_client::ProcessedImage;
use imgconv_core::{ClientConfig, ConvertData, FormatInfo, ResizeData};
use serde::Serialize;

pub use cli::{run, Cli, Commands};

/// Initialize tracing for the CLI. Logs go to stderr so stdout stays parseable.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Build the client config from the environment, letting command-line flags
/// take precedence over IMGCONV_API_KEY / IMGCONV_API_URL.
pub fn load_config<F>(
    lookup: F,
    api_key: Option<String>,
    api_url: Option<String>,
) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let config = ClientConfig::from_lookup(|name| match name {
        "IMGCONV_API_KEY" if api_key.is_some() => api_key.clone(),
        "IMGCONV_API_URL" if api_url.is_some() => api_url.clone(),
        _ => lookup(name),
    })?;
    Ok(config)
}

pub fn print_json(value: &impl Serialize) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

pub fn convert_summary(input: &Path, result: &ProcessedImage<ConvertData>) -> Vec<String> {
    let mut lines = vec![format!(
        "Converted: {} -> {}",
        input.display(),
        result.output.display()
    )];
    if let Some(data) = &result.data {
        lines.push(format!("   Original: {} bytes", data.original.size));
        lines.push(format!("   Converted: {} bytes", data.converted.size));
        if let Some(compression) = data.compression {
            lines.push(format!("   Compression: {}%", compression));
        }
    }
    lines
}

pub fn resize_summary(input: &Path, result: &ProcessedImage<ResizeData>) -> Vec<String> {
    let mut lines = vec![format!(
        "Resized: {} -> {}",
        input.display(),
        result.output.display()
    )];
    if let Some(data) = &result.data {
        if let (Some(from), Some(to)) = (data.original.describe(), data.resized.describe()) {
            lines.push(format!("   {} -> {}", from, to));
        }
    }
    lines
}

/// Single-line summary for crop, rotate and flip. `detail` is appended in parentheses.
pub fn transform_summary(verb: &str, input: &Path, output: &Path, detail: Option<&str>) -> String {
    match detail {
        Some(d) => format!("{}: {} -> {} ({})", verb, input.display(), output.display(), d),
        None => format!("{}: {} -> {}", verb, input.display(), output.display()),
    }
}

pub fn formats_summary(formats: &[FormatInfo]) -> String {
    let names: Vec<&str> = formats.iter().map(|f| f.format.as_str()).collect();
    format!("Supported formats: {}", names.join(", "))
}
