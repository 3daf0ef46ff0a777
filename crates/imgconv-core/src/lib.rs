//! imgconv core library
//!
//! This crate provides the wire types, request parameters, error type and
//! client configuration shared by the API client and the CLI.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::ApiError;
pub use models::{
    ConvertData, ConvertParams, CropParams, Dimensions, Envelope, ErrorBody, Fit, FlipDirection,
    FormatInfo, FormatsData, ResizeData, ResizeParams, RotateParams, SizeInfo,
};
pub use models::decode_image;
pub use validation::{content_type_for_path, upload_file_name};
