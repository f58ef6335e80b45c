//! A scanner for detecting and decoding TopCode fiducial markers in an
//! image.
//!
//! TopCodes are black-and-white circular fiducials designed to be recognized
//! quickly by low-resolution cameras with poor optics. A symbol is a
//! concentric bullseye surrounded by a 13-sector data ring; each sector
//! encodes one bit, white for one and black for zero.
//!
//! The primary entry point is [`Scanner`], which locates and decodes every
//! TopCode present in an image:
//!
//! ```no_run
//! use topcodes::Scanner;
//!
//! let mut scanner = Scanner::new();
//! let codes = scanner.scan_by_filename("photo.png").unwrap();
//! for code in &codes {
//!     println!("{:?} at ({:.1}, {:.1})", code.code(), code.x(), code.y());
//! }
//! ```

mod candidate;
mod codeword;
mod decode;
mod error;
mod pixel_buffer;
mod scanner;
mod threshold;
mod utils;

pub use codeword::{Code, Codeword, SECTORS};
pub use error::ScanError;
pub use scanner::{ImageSource, Preview, Scanner};
