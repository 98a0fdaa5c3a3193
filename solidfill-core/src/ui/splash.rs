//! Boot splash animation
//!
//! The frames are drawn on top of each other without clearing; the blank
//! opaque frame wipes the progress bar before the final message.

use crate::traits::{Color, DisplayDriver, DisplayError, DisplayExt};

/// One step of the splash animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplashFrame {
    pub text: &'static str,
    pub size: u8,
    pub y: u8,
    /// How long the frame stays before the next one
    pub hold_ms: u16,
    /// Draw with a black background instead of transparently
    pub opaque: bool,
}

const fn frame(text: &'static str, size: u8, y: u8, hold_ms: u16) -> SplashFrame {
    SplashFrame {
        text,
        size,
        y,
        hold_ms,
        opaque: false,
    }
}

/// Frames in playback order
pub const SPLASH_FRAMES: [SplashFrame; 8] = [
    frame("SolidFill", 2, 10, 250),
    frame("VACUUM CASTING", 1, 33, 350),
    frame("Initializing", 1, 49, 350),
    frame("<              >", 1, 49, 100),
    frame("<               >", 1, 49, 100),
    frame("<                >", 1, 49, 100),
    SplashFrame {
        opaque: true,
        ..frame("                  ", 1, 49, 100)
    },
    frame("SYSTEM READY", 1, 49, 750),
];

/// Clear the panel and draw the splash border
pub fn begin<D: DisplayDriver>(display: &mut D) {
    display.clear();
    display.rounded_rect(0, 0, 127, 63, 7, Color::White);
}

/// Draw one frame and push it to the panel
pub fn draw_frame<D: DisplayDriver>(
    display: &mut D,
    frame: &SplashFrame,
) -> Result<(), DisplayError> {
    let background = frame.opaque.then_some(Color::Black);
    display.set_text_color(Color::White, background);
    display.print_centered(frame.text, frame.size, frame.y);
    display.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::mock::{Op, RecordingDisplay};

    #[test]
    fn test_frames_end_ready() {
        let last = SPLASH_FRAMES[SPLASH_FRAMES.len() - 1];
        assert_eq!(last.text, "SYSTEM READY");
        assert_eq!(SPLASH_FRAMES.iter().filter(|f| f.opaque).count(), 1);
    }

    #[test]
    fn test_draw_frame_centers_and_flushes() {
        let mut display = RecordingDisplay::new();
        begin(&mut display);
        draw_frame(&mut display, &SPLASH_FRAMES[0]).unwrap();

        // 9 glyphs at size 2 => 108px, centered in 128
        assert!(display.has_text_at("SolidFill", 10, 10));
        assert_eq!(display.flushes, 1);
        assert!(display.ops.contains(&Op::RoundedRect(0, 0, 127, 63, 7)));
    }

    #[test]
    fn test_opaque_frame_sets_background() {
        let mut display = RecordingDisplay::new();
        draw_frame(&mut display, &SPLASH_FRAMES[6]).unwrap();
        assert_eq!(display.background, Some(Color::Black));
    }
}
