use crate::codeword::Codeword;
use crate::pixel_buffer::PixelBuffer;

/// A pixel confirmed, by 4-connected neighborhood, as the center of a
/// bullseye candidate.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Candidate {
    pub x: usize,
    pub y: usize,
}

impl Candidate {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Scans the thresholded buffer for pixels flagged as horizontal candidates
/// whose four 4-connected neighbors were flagged too, in row-major order.
pub(crate) fn confirmed(buffer: &PixelBuffer) -> Vec<Candidate> {
    let width = buffer.width();
    let height = buffer.height();
    let mut out = Vec::new();

    if height < 4 || width < 3 {
        return out;
    }

    for j in 2..height - 2 {
        for i in 1..width - 1 {
            if buffer.is_candidate(i, j)
                && buffer.is_candidate(i - 1, j)
                && buffer.is_candidate(i + 1, j)
                && buffer.is_candidate(i, j - 1)
                && buffer.is_candidate(i, j + 1)
            {
                out.push(Candidate::new(i, j));
            }
        }
    }

    out
}

/// Tests whether `(x, y)` falls inside the bullseye of any already-accepted
/// codeword, so repeated or spurious candidates near a real code are
/// suppressed before decoding is attempted.
pub(crate) fn overlaps(accepted: &[Codeword], x: usize, y: usize) -> bool {
    accepted.iter().any(|c| c.in_bullseye(x as f64, y as f64))
}
