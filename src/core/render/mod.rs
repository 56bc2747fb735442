//=========================================================================
// Render Interface
//=========================================================================
//
// Renderer-agnostic drawing contract between entities and the backend.
//
// The stage never rasterizes. Entities draw into a `Surface`; scenes own
// a `Canvas` that records those calls and the driver hands the finished
// canvas to a presenter.
//
// Architecture:
// ```text
//   Drawable::perform_draw ──► &mut dyn Surface (Canvas)
//                                   │
//                                   └─► Presenter::present(&Canvas)
// ```
//
//=========================================================================

//=== Module Declarations =================================================

mod canvas;

//=== Public API ==========================================================

pub use canvas::{Canvas, DrawOp};

//=== External Dependencies ===============================================

use std::rc::Rc;

use serde::{Deserialize, Serialize};

//=== Geometry ============================================================

/// Dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if either dimension is zero.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Position in surface space (pixels, top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle at `origin` spanning `size`.
    pub const fn at(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Rectangle at the origin spanning `size`.
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

//=== Color ===============================================================

/// RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

//=== Image ===============================================================

/// Opaque handle to an image owned by the rendering backend.
///
/// The stage only needs a stable key to hand back to the backend and the
/// image dimensions for layout. Decoding and storage happen elsewhere.
/// Cloning is cheap (the key is reference counted).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Image {
    key: Rc<str>,
    size: Size,
}

impl Image {
    pub fn new(key: impl Into<Rc<str>>, size: Size) -> Self {
        Self {
            key: key.into(),
            size,
        }
    }

    /// Backend lookup key.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn size(&self) -> Size {
        self.size
    }
}

//=== Surface Trait =======================================================

/// Drawing target handed to [`Drawable`](crate::core::capability::Drawable) entities.
///
/// Implemented by [`Canvas`]; backends may implement it directly for
/// immediate-mode targets.
pub trait Surface {
    /// Current surface dimensions.
    fn size(&self) -> Size;

    /// Bounds of the surface, anchored at the origin.
    fn rect(&self) -> Rect {
        Rect::from_size(self.size())
    }

    /// Fills the whole surface with `color`.
    fn fill(&mut self, color: Color);

    /// Copies `image` into `dest`.
    fn blit(&mut self, image: &Image, dest: Rect);

    /// Blends `color` over the whole surface with the given alpha.
    fn overlay(&mut self, color: Color, alpha: u8);
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_from_tuple() {
        assert_eq!(Size::from((800, 600)), Size::new(800, 600));
    }

    #[test]
    fn empty_size_detection() {
        assert!(Size::new(0, 10).is_empty());
        assert!(Size::new(10, 0).is_empty());
        assert!(!Size::new(1, 1).is_empty());
    }

    #[test]
    fn rect_at_point_keeps_size() {
        let rect = Rect::at(Point::new(4, -2), Size::new(16, 8));
        assert_eq!(rect.origin(), Point::new(4, -2));
        assert_eq!(rect.size(), Size::new(16, 8));
    }

    #[test]
    fn image_clone_shares_key() {
        let image = Image::new("player/idle_0", Size::new(32, 32));
        let copy = image.clone();
        assert_eq!(copy.key(), "player/idle_0");
        assert_eq!(copy, image);
    }

    #[test]
    fn rgb_is_opaque() {
        assert_eq!(Color::rgb(1, 2, 3).a, 255);
    }
}
