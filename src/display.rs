// Licensed under the Apache-2.0 license

//! Text output consumed by the radar console.
//!
//! Glyph rendering, wrapping and refresh belong to the display driver; the
//! console only needs a cursor and a way to put strings and numbers on it.

/// Console-style text surface.
///
/// A `'\n'` inside a string moves the cursor to the start of the next line,
/// exactly like [`end_line`](Self::end_line).
pub trait TextRenderer {
    /// Blank the whole surface.
    fn clear(&mut self);
    /// Move the text cursor to column `x`, row `y`.
    fn set_cursor(&mut self, x: u8, y: u8);
    fn write_string(&mut self, s: &str);
    /// Decimal rendering of `n`.
    fn write_uint(&mut self, n: u32);
    fn end_line(&mut self);
}

impl<R: TextRenderer + ?Sized> TextRenderer for &mut R {
    fn clear(&mut self) {
        (**self).clear();
    }
    fn set_cursor(&mut self, x: u8, y: u8) {
        (**self).set_cursor(x, y);
    }
    fn write_string(&mut self, s: &str) {
        (**self).write_string(s);
    }
    fn write_uint(&mut self, n: u32) {
        (**self).write_uint(n);
    }
    fn end_line(&mut self) {
        (**self).end_line();
    }
}
