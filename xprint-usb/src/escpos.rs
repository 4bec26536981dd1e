//! ESC/POS command builder
//!
//! Provides a fluent API for building the ESC/POS byte sequences sent
//! over a USB session.

/// Horizontal justification (ESC a n)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Lenient parse: case-insensitive, anything unknown becomes `Left`
    pub fn normalize(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "center" => Self::Center,
            "right" => Self::Right,
            _ => Self::Left,
        }
    }

    fn code(self) -> u8 {
        match self {
            Self::Left => 0x00,
            Self::Center => 0x01,
            Self::Right => 0x02,
        }
    }
}

/// ESC/POS command builder
///
/// Text is appended verbatim, so it must already be in a form the
/// printer understands (see [`crate::strip_non_ascii`]).
#[derive(Debug, Default)]
pub struct EscPosBuilder {
    buf: Vec<u8>,
}

impl EscPosBuilder {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
        }
    }

    // === Text Output ===

    /// Write raw text
    pub fn text(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(s.as_bytes());
        self
    }

    // === Alignment ===

    pub fn align(&mut self, align: Alignment) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, align.code()]);
        self
    }

    // === Text Style ===

    /// Emphasis on/off (ESC E n)
    pub fn bold(&mut self, on: bool) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, u8::from(on)]);
        self
    }

    // === Paper Control ===

    /// Full cut with feed: GS V 66 n
    ///
    /// Lets the printer advance past the cutter before severing, so the
    /// last printed line is not cut through.
    pub fn cut_feed(&mut self, lines: u8) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x42, lines]);
        self
    }

    // === Build ===

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_bytes() {
        let mut b = EscPosBuilder::new();
        b.align(Alignment::Left)
            .align(Alignment::Center)
            .align(Alignment::Right);

        assert_eq!(
            b.build(),
            vec![0x1B, 0x61, 0x00, 0x1B, 0x61, 0x01, 0x1B, 0x61, 0x02]
        );
    }

    #[test]
    fn test_bold_toggle() {
        let mut b = EscPosBuilder::new();
        b.bold(true).text("Hi\n").bold(false);

        assert_eq!(
            b.build(),
            vec![0x1B, 0x45, 0x01, b'H', b'i', b'\n', 0x1B, 0x45, 0x00]
        );
    }

    #[test]
    fn test_cut_feed() {
        let mut b = EscPosBuilder::new();
        b.cut_feed(3);
        assert_eq!(b.build(), vec![0x1D, 0x56, 0x42, 0x03]);
    }

    #[test]
    fn test_normalize_known_values() {
        assert_eq!(Alignment::normalize("left"), Alignment::Left);
        assert_eq!(Alignment::normalize("CENTER"), Alignment::Center);
        assert_eq!(Alignment::normalize("Right"), Alignment::Right);
    }

    #[test]
    fn test_normalize_unknown_falls_back_to_left() {
        for value in ["", "middle", "justify", " center", "centre", "rightt"] {
            assert_eq!(Alignment::normalize(value), Alignment::Left, "{value:?}");
        }
    }
}
