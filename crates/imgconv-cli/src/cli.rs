//! Command-line definition and dispatch for the `imgconv` binary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use imgconv_api_client::ApiClient;
use imgconv_core::{ConvertParams, CropParams, Fit, FlipDirection, ResizeParams, RotateParams};

use crate::{
    convert_summary, formats_summary, load_config, print_json, resize_summary, transform_summary,
};

#[derive(Parser, Debug)]
#[command(name = "imgconv", about = "Image Converter API CLI", version)]
pub struct Cli {
    /// Print the structured result as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// API base URL (overrides IMGCONV_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// API key (overrides IMGCONV_API_KEY)
    #[arg(long, global = true, value_name = "KEY")]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert an image to another format
    Convert {
        input: PathBuf,
        output: PathBuf,
        /// Target format, e.g. webp, png, jpeg, avif
        #[arg(long)]
        format: String,
        /// Encoder quality (1-100)
        #[arg(long, default_value_t = 80, value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: u8,
    },
    /// Resize an image
    Resize {
        input: PathBuf,
        output: PathBuf,
        /// Width in pixels
        #[arg(long)]
        width: Option<u32>,
        /// Height in pixels
        #[arg(long)]
        height: Option<u32>,
        /// cover, contain, fill, inside or outside
        #[arg(long, default_value = "cover", value_parser = parse_fit)]
        fit: Fit,
    },
    /// Crop a region from an image
    Crop {
        input: PathBuf,
        output: PathBuf,
        #[arg(long)]
        left: u32,
        #[arg(long)]
        top: u32,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
    },
    /// Rotate an image
    Rotate {
        input: PathBuf,
        output: PathBuf,
        /// Angle in degrees
        #[arg(long, allow_negative_numbers = true)]
        angle: i32,
    },
    /// Flip an image
    Flip {
        input: PathBuf,
        output: PathBuf,
        /// horizontal or vertical
        #[arg(long, value_parser = parse_direction)]
        direction: FlipDirection,
    },
    /// List supported formats
    Formats,
}

fn parse_fit(s: &str) -> Result<Fit, String> {
    s.parse().map_err(|e: imgconv_core::ApiError| e.to_string())
}

fn parse_direction(s: &str) -> Result<FlipDirection, String> {
    s.parse().map_err(|e: imgconv_core::ApiError| e.to_string())
}

/// Execute one parsed command. `lookup` reads configuration variables.
///
/// Errors from the client are returned as-is, so a failure envelope reaches
/// the user as the service's own message.
pub async fn run<F>(cli: Cli, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let config = load_config(lookup, cli.api_key, cli.api_url)
        .context("Failed to load configuration. Set IMGCONV_API_KEY or pass --api-key")?;
    let client = ApiClient::new(&config).context("Failed to create API client")?;

    match cli.command {
        Commands::Convert {
            input,
            output,
            format,
            quality,
        } => {
            let params = ConvertParams::new(format).with_quality(quality);
            let result = client.convert_image(&input, &output, &params).await?;
            if cli.json {
                print_json(&result)?;
            } else {
                for line in convert_summary(&input, &result) {
                    println!("{}", line);
                }
            }
        }
        Commands::Resize {
            input,
            output,
            width,
            height,
            fit,
        } => {
            let params = ResizeParams::new(width, height).with_fit(fit);
            let result = client.resize_image(&input, &output, &params).await?;
            if cli.json {
                print_json(&result)?;
            } else {
                for line in resize_summary(&input, &result) {
                    println!("{}", line);
                }
            }
        }
        Commands::Crop {
            input,
            output,
            left,
            top,
            width,
            height,
        } => {
            let params = CropParams {
                left,
                top,
                width,
                height,
            };
            let result = client.crop_image(&input, &output, &params).await?;
            if cli.json {
                print_json(&result)?;
            } else {
                println!("{}", transform_summary("Cropped", &input, &output, None));
            }
        }
        Commands::Rotate {
            input,
            output,
            angle,
        } => {
            let result = client
                .rotate_image(&input, &output, &RotateParams::new(angle))
                .await?;
            if cli.json {
                print_json(&result)?;
            } else {
                let detail = format!("{}°", angle);
                println!(
                    "{}",
                    transform_summary("Rotated", &input, &output, Some(&detail))
                );
            }
        }
        Commands::Flip {
            input,
            output,
            direction,
        } => {
            let result = client.flip_image(&input, &output, direction).await?;
            if cli.json {
                print_json(&result)?;
            } else {
                println!(
                    "{}",
                    transform_summary("Flipped", &input, &output, Some(direction.as_str()))
                );
            }
        }
        Commands::Formats => {
            let formats = client.list_formats().await?;
            if cli.json {
                print_json(&formats)?;
            } else {
                println!("{}", formats_summary(&formats));
            }
        }
    }

    Ok(())
}
