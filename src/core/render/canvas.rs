//=========================================================================
// Canvas
//=========================================================================
//
// Retained render surface owned by each scene.
//
// Records draw calls as an ordered op stream. A fill covers everything
// drawn before it, so `fill` starts a fresh stream. That keeps one frame
// worth of ops in the canvas at any time.
//
//=========================================================================

use super::{Color, Image, Rect, Size, Surface};

//=== DrawOp ==============================================================

/// A single recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Whole-surface fill.
    Fill(Color),

    /// Image copied into a destination rectangle.
    Blit { image: Image, dest: Rect },

    /// Whole-surface translucent overlay (fades, dimming).
    Overlay { color: Color, alpha: u8 },
}

//=== Canvas ==============================================================

/// Recording [`Surface`] handed from a scene to the presenter.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    size: Size,
    ops: Vec<DrawOp>,
}

impl Canvas {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ops: Vec::with_capacity(64),
        }
    }

    /// Recorded ops in paint order.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Changes the logical size. Recorded ops are kept.
    pub fn resize(&mut self, size: Size) {
        self.size = size;
    }

    /// Drops all recorded ops, keeping capacity.
    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Surface for Canvas {
    fn size(&self) -> Size {
        self.size
    }

    fn fill(&mut self, color: Color) {
        self.ops.clear();
        self.ops.push(DrawOp::Fill(color));
    }

    fn blit(&mut self, image: &Image, dest: Rect) {
        self.ops.push(DrawOp::Blit {
            image: image.clone(),
            dest,
        });
    }

    fn overlay(&mut self, color: Color, alpha: u8) {
        self.ops.push(DrawOp::Overlay { color, alpha });
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::Point;

    #[test]
    fn fill_starts_new_stream() {
        let mut canvas = Canvas::new(Size::new(10, 10));
        let image = Image::new("a", Size::new(1, 1));

        canvas.fill(Color::BLACK);
        canvas.blit(&image, Rect::new(0, 0, 1, 1));
        assert_eq!(canvas.len(), 2);

        canvas.fill(Color::WHITE);
        assert_eq!(canvas.ops(), &[DrawOp::Fill(Color::WHITE)]);
    }

    #[test]
    fn ops_keep_paint_order() {
        let mut canvas = Canvas::new(Size::new(10, 10));
        let a = Image::new("a", Size::new(2, 2));
        let b = Image::new("b", Size::new(2, 2));

        canvas.blit(&a, Rect::at(Point::new(1, 1), a.size()));
        canvas.blit(&b, Rect::at(Point::new(3, 3), b.size()));
        canvas.overlay(Color::BLACK, 128);

        let keys: Vec<_> = canvas
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Blit { image, .. } => Some(image.key().to_owned()),
                _ => None,
            })
            .collect();
        assert_eq!(keys, ["a", "b"]);
        assert!(matches!(canvas.ops().last(), Some(DrawOp::Overlay { alpha: 128, .. })));
    }

    #[test]
    fn resize_updates_rect() {
        let mut canvas = Canvas::new(Size::new(10, 10));
        canvas.resize(Size::new(1024, 768));
        assert_eq!(canvas.rect(), Rect::new(0, 0, 1024, 768));
    }
}
