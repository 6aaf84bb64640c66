use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

const PIXEL_COUNT: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT;

/// # FrameBuffer
/// The on/off state of every pixel of the 64x32 display, stored row by row.
///
/// Pixels are 1 (lit) or 0 (dark). A pixel at column `x` of row `y` lives at
/// `y * DISPLAY_WIDTH + x`; coordinates are wrapped onto the grid before
/// indexing so out-of-range values wrap around the screen edges.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: [u8; PIXEL_COUNT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            pixels: [0; PIXEL_COUNT],
        }
    }

    pub fn width(&self) -> usize {
        DISPLAY_WIDTH
    }

    pub fn height(&self) -> usize {
        DISPLAY_HEIGHT
    }

    fn index(x: usize, y: usize) -> usize {
        (y % DISPLAY_HEIGHT) * DISPLAY_WIDTH + (x % DISPLAY_WIDTH)
    }

    /// Turns every pixel off
    pub fn clear(&mut self) {
        self.pixels = [0; PIXEL_COUNT];
    }

    /// Whether the pixel at (x, y) is lit
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[Self::index(x, y)] == 1
    }

    /// Flips the pixel at (x, y).
    ///
    /// Returns true if the pixel was lit and has been erased.
    pub fn xor_pixel(&mut self, x: usize, y: usize) -> bool {
        let pixel = &mut self.pixels[Self::index(x, y)];
        let erased = *pixel == 1;
        *pixel ^= 1;
        erased
    }

    /// Every pixel, row by row
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Iterates over the rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.pixels.chunks_exact(DISPLAY_WIDTH)
    }

    /// How many pixels are lit
    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p == 1).count()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|&p| if p == 1 { '#' } else { '.' }).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
