pub use display::{open_window, Display, DisplayError};

mod display;
