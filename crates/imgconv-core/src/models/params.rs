use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const DEFAULT_QUALITY: u8 = 80;

/// Parameters for `POST /api/convert`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertParams {
    /// Target format (e.g. "webp", "png"). `new` normalises it to lower case.
    pub format: String,
    /// Encoder quality, 1-100.
    #[serde(default = "default_quality")]
    pub quality: u8,
}

fn default_quality() -> u8 {
    DEFAULT_QUALITY
}

impl ConvertParams {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into().trim().to_ascii_lowercase(),
            quality: DEFAULT_QUALITY,
        }
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.format.is_empty() {
            return Err(ApiError::InvalidInput(
                "Target format must not be empty".to_string(),
            ));
        }
        if !self.format.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ApiError::InvalidInput(format!(
                "Target format '{}' must be alphanumeric",
                self.format
            )));
        }
        if !(1..=100).contains(&self.quality) {
            return Err(ApiError::InvalidInput(format!(
                "Quality must be between 1 and 100, got {}",
                self.quality
            )));
        }
        Ok(())
    }

    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("format", self.format.clone()),
            ("quality", self.quality.to_string()),
        ]
    }
}

/// How the image is fitted into the requested box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    #[default]
    Cover,
    Contain,
    Fill,
    Inside,
    Outside,
}

impl Fit {
    pub const ALL: [Fit; 5] = [Fit::Cover, Fit::Contain, Fit::Fill, Fit::Inside, Fit::Outside];

    pub fn as_str(&self) -> &'static str {
        match self {
            Fit::Cover => "cover",
            Fit::Contain => "contain",
            Fit::Fill => "fill",
            Fit::Inside => "inside",
            Fit::Outside => "outside",
        }
    }
}

impl fmt::Display for Fit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Fit {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Fit::ALL
            .into_iter()
            .find(|fit| fit.as_str() == wanted)
            .ok_or_else(|| {
                ApiError::InvalidInput(format!(
                    "Invalid fit '{}'. Must be one of: cover, contain, fill, inside, outside",
                    s
                ))
            })
    }
}

/// Parameters for `POST /api/resize`. Absent dimensions are left to the
/// service (aspect ratio preserved).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeParams {
    pub width: Option<u32>,
    pub height: Option<u32>,
    #[serde(default)]
    pub fit: Fit,
}

impl ResizeParams {
    pub fn new(width: Option<u32>, height: Option<u32>) -> Self {
        Self {
            width,
            height,
            fit: Fit::default(),
        }
    }

    pub fn with_fit(mut self, fit: Fit) -> Self {
        self.fit = fit;
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.width.is_none() && self.height.is_none() {
            return Err(ApiError::InvalidInput(
                "At least width or height must be specified".to_string(),
            ));
        }
        if self.width == Some(0) || self.height == Some(0) {
            return Err(ApiError::InvalidInput(
                "Width and height must be at least 1 pixel".to_string(),
            ));
        }
        Ok(())
    }

    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::with_capacity(3);
        if let Some(w) = self.width {
            fields.push(("width", w.to_string()));
        }
        if let Some(h) = self.height {
            fields.push(("height", h.to_string()));
        }
        fields.push(("fit", self.fit.to_string()));
        fields
    }
}

/// Parameters for `POST /api/crop`: a `width` x `height` region whose
/// top-left corner is at (`left`, `top`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropParams {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl CropParams {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.width == 0 || self.height == 0 {
            return Err(ApiError::InvalidInput(format!(
                "Crop region must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.left.checked_add(self.width).is_none() || self.top.checked_add(self.height).is_none()
        {
            return Err(ApiError::InvalidInput(
                "Crop region overflows image coordinates".to_string(),
            ));
        }
        Ok(())
    }

    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("left", self.left.to_string()),
            ("top", self.top.to_string()),
            ("width", self.width.to_string()),
            ("height", self.height.to_string()),
        ]
    }
}

/// Parameters for `POST /api/transform/rotate`. Degrees, sent as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotateParams {
    pub angle: i32,
}

impl RotateParams {
    pub fn new(angle: i32) -> Self {
        Self { angle }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }

    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![("angle", self.angle.to_string())]
    }
}

/// Mirror axis for `POST /api/transform/flip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipDirection {
    Horizontal,
    Vertical,
}

impl FlipDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlipDirection::Horizontal => "horizontal",
            FlipDirection::Vertical => "vertical",
        }
    }

    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![("direction", self.as_str().to_string())]
    }
}

impl fmt::Display for FlipDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlipDirection {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Ok(FlipDirection::Horizontal),
            "vertical" => Ok(FlipDirection::Vertical),
            _ => Err(ApiError::InvalidInput(format!(
                "Invalid flip direction '{}'. Must be: horizontal or vertical",
                s
            ))),
        }
    }
}
