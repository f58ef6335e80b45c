//! Synthesizes TopCode bitmaps for end-to-end scenario tests, so the test
//! suite doesn't depend on checked-in photo fixtures.

use std::f64::consts::PI;

const SECTORS: usize = 13;
const ARC: f64 = 2.0 * PI / SECTORS as f64;

/// A checksum-valid 13-bit codeword (five bits set) with its ones already
/// packed into the lowest five positions, so it is its own minimal rotation.
pub const CODE_31: u32 = 0b0_0000_0001_1111;

/// Renders a solid white `width`x`height` RGB8 buffer with a single TopCode
/// of the given `bits`, centered at `(cx, cy)`, each ring `unit` pixels
/// wide, rotated by `orientation` radians.
pub fn render_topcode(
    bits: u32,
    cx: f64,
    cy: f64,
    unit: f64,
    orientation: f64,
    width: usize,
    height: usize,
) -> Vec<u8> {
    let mut buf = vec![255u8; width * height * 3];
    paint_topcode(&mut buf, width, bits, cx, cy, unit, orientation);
    buf
}

/// Paints a TopCode directly into an existing buffer, for scenes with
/// multiple codes.
pub fn paint_topcode(
    buf: &mut [u8],
    width: usize,
    bits: u32,
    cx: f64,
    cy: f64,
    unit: f64,
    orientation: f64,
) {
    let height = buf.len() / (width * 3);
    let radius_px = 4.0 * unit;
    let y0 = ((cy - radius_px).floor().max(0.0)) as usize;
    let y1 = ((cy + radius_px).ceil() as usize).min(height - 1);
    let x0 = ((cx - radius_px).floor().max(0.0)) as usize;
    let x1 = ((cx + radius_px).ceil() as usize).min(width - 1);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f64 + 0.5 - cx;
            let dy = y as f64 + 0.5 - cy;
            let r_units = (dx * dx + dy * dy).sqrt() / unit;

            // Center disc white, first ring black, second ring white, then
            // the bit-dependent data ring; matches the radial pattern the
            // decoder's shape check expects at 0.5/1.5/2.5/3.5 unit radii.
            let white = if r_units < 1.0 {
                true
            } else if r_units < 2.0 {
                false
            } else if r_units < 3.0 {
                true
            } else if r_units < 4.0 {
                let angle = dy.atan2(dx) - orientation;
                let angle = angle.rem_euclid(2.0 * PI);
                let sector = ((angle / ARC).floor() as usize) % SECTORS;
                (bits >> sector) & 1 == 1
            } else {
                true
            };

            let v: u8 = if white { 255 } else { 0 };
            let i = (y * width + x) * 3;
            buf[i] = v;
            buf[i + 1] = v;
            buf[i + 2] = v;
        }
    }
}

/// Paints a black/white/black striped rectangle, independent of any
/// concentric bullseye geometry, spanning `rows` scan lines starting at
/// `y0` and `bar` pixels per stripe starting at `x0`. Used to contrive
/// horizontal run-length candidates that have nothing to do with a real
/// TopCode's rings, to exercise overlap suppression against candidates of
/// a different shape.
pub fn paint_stripes(buf: &mut [u8], width: usize, x0: usize, y0: usize, bar: usize, rows: usize) {
    for y in y0..y0 + rows {
        for (band, &white) in [false, true, false].iter().enumerate() {
            let v: u8 = if white { 255 } else { 0 };
            for dx in 0..bar {
                let x = x0 + band * bar + dx;
                let i = (y * width + x) * 3;
                buf[i] = v;
                buf[i + 1] = v;
                buf[i + 2] = v;
            }
        }
    }
}
