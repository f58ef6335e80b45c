//! Wellner adaptive thresholding, run as a single serpentine sweep that also
//! flags horizontal bullseye-row-crossing candidates inline.
//!
//! "Adaptive Thresholding for the DigitalDesk", EuroPARC Technical Report
//! EPC-93-110.

use crate::pixel_buffer::{PixelBuffer, SUM_MASK};

/// Window size over which the running intensity sum is averaged.
const S: isize = 30;
/// Threshold factor applied to the running average.
const F: f64 = 0.975;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Level {
    WhiteRegion,
    BlackRegion,
    WhiteRegionSecond,
    BlackRegionSecond,
}

/// Threshold `buffer` in place (it must already hold packed RGB intensity
/// words) and return the number of pixels marked as horizontal candidates
/// (always a multiple of 3 — one accepted run marks its midpoint and its two
/// horizontal neighbors).
pub(crate) fn run(buffer: &mut PixelBuffer, max_unit: usize) -> usize {
    let width = buffer.width();
    let height = buffer.height();
    let max_u = max_unit as isize;

    let mut candidate_count = 0usize;
    let mut sum: isize = 128;

    for j in 0..height {
        let mut level = Level::WhiteRegion;
        let mut b1: isize = 0;
        let mut w1: isize = 0;
        let mut b2: isize = 0;

        let left_to_right = j % 2 == 0;
        let mut k: isize = if left_to_right {
            0
        } else {
            width as isize - 1
        };
        k += (j * width) as isize;

        for _ in 0..width {
            let ku = k as usize;
            let pixel = buffer.get(ku);
            let r = (pixel >> 16) & 0xFF;
            let g = (pixel >> 8) & 0xFF;
            let b = pixel & 0xFF;
            let mut a: isize = (r + g + b) as isize / 3;

            sum += a - (sum / S);

            let threshold = if ku >= width {
                let prev_sum = (buffer.get(ku - width) & SUM_MASK) as isize;
                (sum + prev_sum) / (2 * S)
            } else {
                sum / S
            };

            a = if (a as f64) < threshold as f64 * F {
                0
            } else {
                1
            };

            buffer.set(ku, ((a << 24) as u32) | (sum as u32 & SUM_MASK));

            match level {
                Level::WhiteRegion => {
                    if a == 0 {
                        level = Level::BlackRegion;
                        b1 = 1;
                        w1 = 0;
                        b2 = 0;
                    }
                }
                Level::BlackRegion => {
                    if a == 0 {
                        b1 += 1;
                    } else {
                        level = Level::WhiteRegionSecond;
                        w1 = 1;
                    }
                }
                Level::WhiteRegionSecond => {
                    if a == 0 {
                        level = Level::BlackRegionSecond;
                        b2 = 1;
                    } else {
                        w1 += 1;
                    }
                }
                Level::BlackRegionSecond => {
                    if a == 0 {
                        b2 += 1;
                    } else {
                        if b1 >= 2
                            && b2 >= 2
                            && b1 <= max_u
                            && b2 <= max_u
                            && w1 <= max_u + max_u
                            && (b1 + b2 - w1).abs() <= b1 + b2
                            && (b1 + b2 - w1).abs() <= w1
                            && (b1 - b2).abs() <= b1
                            && (b1 - b2).abs() <= b2
                        {
                            let offset = 1 + b2 + w1 / 2;
                            let dk = if left_to_right { k - offset } else { k + offset };
                            if dk > 0 && ((dk + 1) as usize) < width * height {
                                let dku = dk as usize;
                                buffer.mark_candidate(dku - 1);
                                buffer.mark_candidate(dku);
                                buffer.mark_candidate(dku + 1);
                                candidate_count += 3;
                            }
                        }
                        b1 = b2;
                        w1 = 1;
                        b2 = 0;
                        level = Level::WhiteRegionSecond;
                    }
                }
            }

            k += if left_to_right { 1 } else { -1 };
        }
    }

    candidate_count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_buffer(width: usize, height: usize, value: u8) -> PixelBuffer {
        let mut buf = PixelBuffer::new(width, height);
        let word = ((value as u32) << 16) | ((value as u32) << 8) | value as u32;
        for k in 0..width * height {
            buf.set(k, word);
        }
        buf
    }

    #[test]
    fn uniform_image_flags_no_candidates() {
        let mut buf = rgb_buffer(50, 50, 255);
        assert_eq!(run(&mut buf, 80), 0);

        let mut buf = rgb_buffer(50, 50, 0);
        assert_eq!(run(&mut buf, 80), 0);
    }

    #[test]
    fn candidate_count_is_always_a_multiple_of_three() {
        let mut buf = rgb_buffer(60, 60, 200);
        let count = run(&mut buf, 80);
        assert_eq!(count % 3, 0);
    }
}
