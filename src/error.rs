use thiserror::Error;

/// The single fallible outcome exposed by this crate: an image file that
/// could not be opened or decoded. Everything that can go wrong once pixels
/// are in hand (a candidate that doesn't decode, a sample at the border of
/// the image) is absorbed internally and never surfaces as an error.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
}
