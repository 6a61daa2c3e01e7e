// src/output.rs
// =============================================================================
// Human-readable summary of a scan, optionally painted as a rainbow.
//
// The summary is built as one string before anything is colored, so the
// gradient runs across the whole block instead of restarting on each line.
// =============================================================================

use anstyle::{RgbColor, Style};
use std::fmt::Write as _;

use crate::scanner::MalUrl;

// Degrees of hue advanced per visible character.
const HUE_STEP: f32 = 6.0;

impl MalUrl {
    /// Format a limited set of fields from the last result.
    ///
    /// A failed lookup shows the message and status code and is never
    /// colored.
    pub fn render(&self, rainbow: bool) -> String {
        let domain = self.domain();
        let mut output = String::new();

        // Writing to a String cannot fail, so the fmt::Results are dropped.
        let _ = writeln!(output, "{}", domain);
        let _ = write!(output, "{}", "-".repeat(domain.chars().count()));

        if !self.success() {
            let _ = writeln!(output);
            let _ = writeln!(output, "message: {}", self.message());
            let _ = write!(output, "status:  {}", self.status_code());
            return output;
        }

        let _ = writeln!(output);
        let _ = writeln!(output, "IP Address: {}", self.ip_address());
        let _ = writeln!(output, "Category:   {}", self.category());
        let _ = writeln!(output, "Adult:      {}", self.adult());
        let _ = writeln!(output, "Malware:    {}", self.malware());
        let _ = writeln!(output, "Phishing:   {}", self.phishing());
        let _ = writeln!(output, "Spamming:   {}", self.spamming());
        let _ = writeln!(output, "Suspicious: {}", self.suspicious());
        let _ = writeln!(output, "Unsafe:     {}", self.is_unsafe());
        let _ = write!(output, "Risk score: {}", self.risk_score());

        // The gradient needs the whole block at once
        if rainbow {
            paint_rainbow(&output)
        } else {
            output
        }
    }

    /// Print [`render`](Self::render) to standard output.
    pub fn print(&self, rainbow: bool) {
        println!("{}", self.render(rainbow));
    }
}

/// Color `text` with a left-to-right hue gradient. Whitespace is left
/// unstyled so line breaks stay clean.
pub fn paint_rainbow(text: &str) -> String {
    let mut painted = String::with_capacity(text.len() * 20);
    let mut hue = 0.0_f32;

    for ch in text.chars() {
        if ch.is_whitespace() {
            painted.push(ch);
            continue;
        }

        let (r, g, b) = hue_to_rgb(hue);
        let style = Style::new().fg_color(Some(RgbColor(r, g, b).into()));
        let _ = write!(painted, "{}{}{}", style.render(), ch, style.render_reset());
        hue = (hue + HUE_STEP) % 360.0;
    }

    painted
}

// Full saturation, full value HSV to RGB.
fn hue_to_rgb(hue: f32) -> (u8, u8, u8) {
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = 1.0 - ((h % 2.0) - 1.0).abs();

    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };

    let scale = |v: f32| (v * 255.0).round() as u8;
    (scale(r), scale(g), scale(b))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is there an `impl MalUrl` block in this file?
//    - Inherent impls can live in any module of the crate that owns the type
//    - Keeping presentation here leaves scanner/ focused on the API itself
//
// 2. What does `let _ = write!(...)` do?
//    - write! on a String goes through std::fmt::Write and returns fmt::Result
//    - A String never fails to grow, so the result is ignored on purpose
//
// 3. How does the rainbow work?
//    - Each visible character gets its own 24-bit color from anstyle
//    - The hue moves a few degrees per character, wrapping at 360
//    - style.render() emits the escape code, render_reset() turns it off
// -----------------------------------------------------------------------------
