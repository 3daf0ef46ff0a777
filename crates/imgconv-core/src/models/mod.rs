pub mod envelope;
pub mod params;

pub use envelope::{
    decode_image, ConvertData, Dimensions, Envelope, ErrorBody, FormatInfo, FormatsData,
    ResizeData, SizeInfo,
};
pub use params::{ConvertParams, CropParams, Fit, FlipDirection, ResizeParams, RotateParams};
