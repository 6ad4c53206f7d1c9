//! Progress indicator for the slow key derivation step.

use std::io::{self, Write};

use super::context::UiContext;

const FRAMES_UNICODE: &[&str] = &[
    "\u{280B}", "\u{2819}", "\u{2839}", "\u{2838}", "\u{283C}", "\u{2834}", "\u{2826}",
    "\u{2827}", "\u{2807}", "\u{280F}",
];
const FRAMES_ASCII: &[&str] = &["|", "/", "-", "\\"];

/// A spinner for indeterminate progress, drawn on stderr.
pub struct Spinner<'a> {
    ctx: &'a UiContext,
    message: String,
    frame: usize,
}

impl<'a> Spinner<'a> {
    pub fn new(ctx: &'a UiContext, message: &str) -> Self {
        Self {
            ctx,
            message: message.to_string(),
            frame: 0,
        }
    }

    /// Advance to the next frame; a no-op when animation is off.
    pub fn tick(&mut self) {
        if !self.ctx.allows_animation() {
            return;
        }
        let frames = self.frames();
        self.frame = (self.frame + 1) % frames.len();
        eprint!("\r\x1b[K{} {}...", frames[self.frame], self.message);
        let _ = io::stderr().flush();
    }

    /// Clear the spinner line.
    pub fn clear(&self) {
        if self.ctx.allows_animation() {
            eprint!("\r\x1b[K");
            let _ = io::stderr().flush();
        }
    }

    fn frames(&self) -> &'static [&'static str] {
        if self.ctx.unicode {
            FRAMES_UNICODE
        } else {
            FRAMES_ASCII
        }
    }
}
