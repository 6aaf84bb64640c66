use log::info;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Texture, TextureCreator, TextureValueError, WindowCanvas};
use sdl2::video::{WindowBuildError, WindowContext};
use sdl2::IntegerOrSdlError;

use emu8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use emu8_core::{FrameBuffer, FrameError, Screen};

/// Bytes per pixel of an RGB24 texture
const RGB: usize = 3;

#[derive(thiserror::Error, Debug)]
pub enum DisplayError {
    #[error("SDL2 error: {0}")]
    Sdl(String),
    #[error("unable to open window")]
    Window(#[from] WindowBuildError),
    #[error("unable to create canvas")]
    Canvas(#[from] IntegerOrSdlError),
    #[error("unable to create texture")]
    Texture(#[from] TextureValueError),
}

/// # Display
/// The Chip-8 display is composed of 64x32 black/white pixels.
/// The on/off state of these pixels arrives as a FrameBuffer of 1s and 0s.
/// The display only gets a call to `render` when the Chip-8 FrameBuffer is updated.
///
/// The streaming texture is created once and borrows the canvas' texture
/// creator, which the caller keeps alive:
/// ```ignore
/// let canvas = open_window(&sdl, 10)?;
/// let creator = canvas.texture_creator();
/// let mut display = Display::new(canvas, &creator)?;
/// ```
pub struct Display<'a> {
    canvas: WindowCanvas,
    texture: Texture<'a>,
}

/// Opens a centered window sized for the Chip-8 screen.
///
/// # Arguments
/// * `sdl` an sdl2 context with which to draw
/// * `scale` the size multiplier for each pixel
pub fn open_window(sdl: &sdl2::Sdl, scale: u32) -> Result<WindowCanvas, DisplayError> {
    let video_subsystem = sdl.video().map_err(DisplayError::Sdl)?;
    let (width, height) = (DISPLAY_WIDTH as u32 * scale, DISPLAY_HEIGHT as u32 * scale);
    let window = video_subsystem
        .window("Emu-8", width, height)
        .position_centered()
        .build()?;
    let mut canvas = window.into_canvas().build()?;
    canvas.clear();
    canvas.present();
    info!("opened {}x{} window", width, height);
    Ok(canvas)
}

/// Copies packed RGB rows into a texture buffer whose rows are `pitch` bytes apart
fn copy_rows(pixels: &[u8], buffer: &mut [u8], pitch: usize) {
    for (row, src) in pixels.chunks_exact(DISPLAY_WIDTH * RGB).enumerate() {
        let start = row * pitch;
        buffer[start..start + src.len()].copy_from_slice(src);
    }
}

impl<'a> Display<'a> {
    /// Creates a new display drawing into `canvas`.
    ///
    /// # Arguments
    /// * `canvas` a window canvas, usually from `open_window`
    /// * `creator` the canvas' texture creator
    pub fn new(
        canvas: WindowCanvas,
        creator: &'a TextureCreator<WindowContext>,
    ) -> Result<Self, DisplayError> {
        let texture = creator.create_texture_streaming(
            PixelFormatEnum::RGB24,
            DISPLAY_WIDTH as u32,
            DISPLAY_HEIGHT as u32,
        )?;
        Ok(Display { canvas, texture })
    }

    /// Formats a Chip-8 FrameBuffer for rendering as an SDL2 texture.
    ///
    /// An SDL2 texture is a 1D array of bytes that represent concatenated rows of RGB pixels.
    ///
    /// This creates a black and white rendering by:
    /// - Triplicating each pixel to represent its RGB values
    /// - Multiplying each value by 255 to convert from a binary state to 0-255 intensity
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    fn frame_to_sdl_texture(frame: &FrameBuffer) -> Vec<u8> {
        frame
            .pixels()
            .iter()
            .flat_map(|&a| std::iter::repeat(a * 255).take(RGB))
            .collect()
    }

    /// Formats the Chip-8 FrameBuffer as an SDL2 RGB24 texture and renders it.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError> {
        let pixels = Display::frame_to_sdl_texture(frame);
        // rows may be padded past width * 3 bytes
        self.texture
            .with_lock(None, |buffer: &mut [u8], pitch: usize| {
                copy_rows(&pixels, buffer, pitch)
            })
            .map_err(DisplayError::Sdl)?;

        self.canvas
            .copy(&self.texture, None, None)
            .map_err(DisplayError::Sdl)?;
        self.canvas.present();
        Ok(())
    }
}

impl Screen for Display<'_> {
    fn present(&mut self, frame: &FrameBuffer) -> Result<(), FrameError> {
        self.render(frame)
            .map_err(|e| FrameError::Frontend(e.to_string()))
    }
}
