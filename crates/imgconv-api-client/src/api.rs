//! Domain methods for the converter API client.
//!
//! Every image operation validates its parameters, uploads the input file in
//! the `image` field, decodes the returned base64 image and writes it to the
//! output path. Nothing is written unless the service reports success.

use std::path::{Path, PathBuf};

use crate::{ApiClient, Payload};
use anyhow::{Context, Result};
use imgconv_core::{
    content_type_for_path, decode_image, upload_file_name, ApiError, ConvertData, ConvertParams,
    CropParams, FlipDirection, FormatInfo, FormatsData, ResizeData, ResizeParams, RotateParams,
};
use serde::de::DeserializeOwned;

pub mod endpoints {
    pub const CONVERT: &str = "/api/convert";
    pub const RESIZE: &str = "/api/resize";
    pub const CROP: &str = "/api/crop";
    pub const ROTATE: &str = "/api/transform/rotate";
    pub const FLIP: &str = "/api/transform/flip";
    pub const FORMATS: &str = "/api/formats";
}

/// Result of an image operation whose output has been written to disk.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProcessedImage<D> {
    pub output: PathBuf,
    pub bytes_written: usize,
    pub data: Option<D>,
}

impl ApiClient {
    /// Convert an image to another format.
    pub async fn convert_image(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        params: &ConvertParams,
    ) -> Result<ProcessedImage<ConvertData>> {
        params.validate()?;
        self.process(endpoints::CONVERT, input.as_ref(), output.as_ref(), params.form_fields())
            .await
    }

    /// Resize an image. Dimensions left out are computed by the service.
    pub async fn resize_image(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        params: &ResizeParams,
    ) -> Result<ProcessedImage<ResizeData>> {
        params.validate()?;
        self.process(endpoints::RESIZE, input.as_ref(), output.as_ref(), params.form_fields())
            .await
    }

    /// Crop a region from an image.
    pub async fn crop_image(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        params: &CropParams,
    ) -> Result<ProcessedImage<serde_json::Value>> {
        params.validate()?;
        self.process(endpoints::CROP, input.as_ref(), output.as_ref(), params.form_fields())
            .await
    }

    /// Rotate an image by `params.angle` degrees.
    pub async fn rotate_image(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        params: &RotateParams,
    ) -> Result<ProcessedImage<serde_json::Value>> {
        params.validate()?;
        self.process(endpoints::ROTATE, input.as_ref(), output.as_ref(), params.form_fields())
            .await
    }

    /// Mirror an image horizontally or vertically. Any `FlipDirection` is valid.
    pub async fn flip_image(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        direction: FlipDirection,
    ) -> Result<ProcessedImage<serde_json::Value>> {
        self.process(endpoints::FLIP, input.as_ref(), output.as_ref(), direction.form_fields())
            .await
    }

    /// List the formats the service can convert to.
    pub async fn list_formats(&self) -> Result<Vec<FormatInfo>> {
        let payload: Payload<FormatsData> = self.get_envelope(endpoints::FORMATS).await?;
        let data = payload.data.ok_or_else(|| {
            ApiError::MalformedResponse("formats response has no data".to_string())
        })?;
        tracing::info!(count = data.formats.len(), "Fetched supported formats");
        Ok(data.formats)
    }

    async fn process<D: DeserializeOwned>(
        &self,
        path: &str,
        input: &Path,
        output: &Path,
        fields: Vec<(&'static str, String)>,
    ) -> Result<ProcessedImage<D>> {
        let form = image_form(input, fields)?;
        let payload: Payload<D> = self.post_multipart(path, form).await?;

        let encoded = payload.image.ok_or_else(|| {
            ApiError::MalformedResponse("success response has no image".to_string())
        })?;
        let bytes = decode_image(&encoded)?;
        write_output(output, &bytes)?;

        tracing::info!(
            endpoint = %path,
            input = %input.display(),
            output = %output.display(),
            bytes = bytes.len(),
            "Image processed"
        );

        Ok(ProcessedImage {
            output: output.to_path_buf(),
            bytes_written: bytes.len(),
            data: payload.data,
        })
    }
}

/// Multipart form with the input file in `image` followed by `fields`.
fn image_form(
    input: &Path,
    fields: Vec<(&'static str, String)>,
) -> Result<reqwest::multipart::Form> {
    let buffer = std::fs::read(input)
        .with_context(|| format!("Failed to read file: {}", input.display()))?;

    let part = reqwest::multipart::Part::bytes(buffer)
        .file_name(upload_file_name(input))
        .mime_str(content_type_for_path(input))
        .context("Invalid content type for upload")?;

    let form = fields
        .into_iter()
        .fold(reqwest::multipart::Form::new().part("image", part), |form, (name, value)| {
            form.text(name, value)
        });

    Ok(form)
}

fn write_output(output: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(output, bytes)
        .with_context(|| format!("Failed to write file: {}", output.display()))
}
