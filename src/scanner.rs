use log::{debug, trace};

use crate::candidate;
use crate::codeword::Codeword;
use crate::decode;
use crate::error::ScanError;
use crate::pixel_buffer::PixelBuffer;
use crate::threshold;

/// Default maximum diameter, in pixels, of a TopCode the scanner will
/// attempt to recognize. Equivalent to `max_unit = 80`.
const DEFAULT_MAX_DIAMETER: usize = 640;

/// Abstracts over whatever in-memory image representation a caller already
/// has, so the scan pipeline never needs to know about a specific image
/// crate's pixel type.
pub trait ImageSource {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Red, green, blue for the pixel at `(x, y)`. Alpha, if present in the
    /// underlying representation, is ignored.
    fn pixel(&self, x: usize, y: usize) -> (u8, u8, u8);
}

impl ImageSource for image::RgbImage {
    fn width(&self) -> usize {
        image::GenericImageView::width(self) as usize
    }

    fn height(&self) -> usize {
        image::GenericImageView::height(self) as usize
    }

    fn pixel(&self, x: usize, y: usize) -> (u8, u8, u8) {
        let p = self.get_pixel(x as u32, y as u32);
        (p[0], p[1], p[2])
    }
}

impl ImageSource for image::RgbaImage {
    fn width(&self) -> usize {
        image::GenericImageView::width(self) as usize
    }

    fn height(&self) -> usize {
        image::GenericImageView::height(self) as usize
    }

    fn pixel(&self, x: usize, y: usize) -> (u8, u8, u8) {
        let p = self.get_pixel(x as u32, y as u32);
        (p[0], p[1], p[2])
    }
}

impl ImageSource for image::DynamicImage {
    fn width(&self) -> usize {
        image::GenericImageView::width(self) as usize
    }

    fn height(&self) -> usize {
        image::GenericImageView::height(self) as usize
    }

    fn pixel(&self, x: usize, y: usize) -> (u8, u8, u8) {
        let p = self.get_pixel(x as u32, y as u32);
        (p[0], p[1], p[2])
    }
}

/// A tightly packed RGB8 buffer, wrapped so it can be scanned without going
/// through the `image` crate at all.
struct RawRgbBuffer<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> ImageSource for RawRgbBuffer<'a> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn pixel(&self, x: usize, y: usize) -> (u8, u8, u8) {
        let i = (y * self.width + x) * 3;
        (self.data[i], self.data[i + 1], self.data[i + 2])
    }
}

/// A grayscale rendering of the binary image produced by the last scan's
/// adaptive-thresholding pass, lazily computed and cached by [`Scanner`].
#[derive(Clone)]
pub struct Preview {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Preview {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// 0 (black) or 255 (white) for the given pixel.
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.width + x]
    }

    pub fn into_image(self) -> image::GrayImage {
        image::GrayImage::from_raw(self.width as u32, self.height as u32, self.pixels)
            .expect("preview buffer size matches its declared dimensions")
    }
}

/// Loads and scans images for TopCodes. The algorithm does a single sweep of
/// an image (scanning one horizontal line at a time) looking for TopCode
/// bullseye patterns. If the pattern matches and the black and white regions
/// meet certain ratio constraints, then the pixel is tested as the center of
/// a candidate TopCode.
pub struct Scanner {
    width: usize,
    height: usize,
    buffer: PixelBuffer,
    image: Option<image::RgbImage>,
    candidate_count: usize,
    tested_count: usize,
    max_unit: usize,
    preview: Option<Preview>,
}

impl Default for Scanner {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            buffer: PixelBuffer::new(0, 0),
            image: None,
            candidate_count: 0,
            tested_count: 0,
            max_unit: Self::unit_for_diameter(DEFAULT_MAX_DIAMETER),
            preview: None,
        }
    }
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    fn unit_for_diameter(diameter: usize) -> usize {
        (diameter as f64 / 8.0).ceil() as usize
    }

    /// Sets the maximum allowable diameter (in pixels) for a TopCode
    /// identified by the scanner. Setting this to a reasonable value for
    /// your application will reduce false positives (recognizing codes that
    /// aren't actually there) and improve performance (because fewer
    /// candidate codes will be tested). Setting this value to as low as 50
    /// or 60 pixels could be advisable for some applications. However,
    /// setting the maximum diameter too low will prevent valid codes from
    /// being recognized. The default value is 640 pixels.
    pub fn set_max_code_diameter(&mut self, diameter: usize) {
        self.max_unit = Self::unit_for_diameter(diameter);
    }

    pub fn image_width(&self) -> usize {
        self.width
    }

    pub fn image_height(&self) -> usize {
        self.height
    }

    /// The original, unaltered image from the last scan, reconstructed as an
    /// owned RGB image. `None` until a scan has been performed.
    pub fn image(&self) -> Option<&image::RgbImage> {
        self.image.as_ref()
    }

    /// Number of candidate codes flagged during the last scan's thresholding
    /// pass.
    pub fn candidate_count(&self) -> usize {
        self.candidate_count
    }

    /// Number of confirmed, non-overlapping candidates actually handed to
    /// the decoder during the last scan.
    pub fn tested_count(&self) -> usize {
        self.tested_count
    }

    /// Opens an image file from disk and scans it. The only fallible entry
    /// point in this crate: a file that cannot be decoded returns
    /// [`ScanError::Image`] rather than panicking or returning a partial
    /// result.
    pub fn scan_by_filename(&mut self, path: &str) -> Result<Vec<Codeword>, ScanError> {
        let img = image::open(path)?;
        let rgb = img.into_rgb8();
        Ok(self.scan_image(&rgb))
    }

    /// Scans a raw, tightly packed RGB8 buffer directly, without going
    /// through the `image` crate.
    pub fn scan_rgb_buffer(&mut self, data: &[u8], width: usize, height: usize) -> Vec<Codeword> {
        let source = RawRgbBuffer {
            data,
            width,
            height,
        };
        self.scan_image(&source)
    }

    /// Scans any in-memory image exposing width, height, and per-pixel RGB.
    pub fn scan_image(&mut self, image: &impl ImageSource) -> Vec<Codeword> {
        let width = image.width();
        let height = image.height();
        debug!("scanning {}x{} image", width, height);

        self.width = width;
        self.height = height;
        self.preview = None;
        self.buffer = PixelBuffer::new(width, height);

        let mut original = Vec::with_capacity(width * height * 3);
        for y in 0..height {
            for x in 0..width {
                let (r, g, b) = image.pixel(x, y);
                original.push(r);
                original.push(g);
                original.push(b);
                let word = ((r as u32) << 16) | ((g as u32) << 8) | b as u32;
                let k = self.buffer.index(x, y);
                self.buffer.set(k, word);
            }
        }
        self.image = image::RgbImage::from_raw(width as u32, height as u32, original);

        self.candidate_count = threshold::run(&mut self.buffer, self.max_unit);
        trace!("thresholding flagged {} candidates", self.candidate_count);

        let codewords = self.find_codes();
        debug!(
            "scan complete: {} valid codes from {} tested",
            codewords.len(),
            self.tested_count
        );
        codewords
    }

    fn find_codes(&mut self) -> Vec<Codeword> {
        let mut accepted: Vec<Codeword> = Vec::new();
        self.tested_count = 0;

        for c in candidate::confirmed(&self.buffer) {
            if candidate::overlaps(&accepted, c.x, c.y) {
                continue;
            }
            self.tested_count += 1;
            let codeword = decode::decode(&self.buffer, c.x, c.y);
            if codeword.is_valid() {
                accepted.push(codeword);
            }
        }

        accepted
    }

    /// Renders a grayscale preview of the binary image produced by the last
    /// scan's thresholding pass. Computed lazily on first request and cached
    /// until the next scan.
    pub fn get_preview(&mut self) -> Option<&Preview> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        if self.preview.is_none() {
            let mut pixels = vec![0u8; self.width * self.height];
            for y in 0..self.height {
                for x in 0..self.width {
                    let k = self.buffer.index(x, y);
                    pixels[k] = if self.buffer.bw(x, y) != 0 { 255 } else { 0 };
                }
            }
            self.preview = Some(Preview {
                width: self.width,
                height: self.height,
                pixels,
            });
        }
        self.preview.as_ref()
    }
}
