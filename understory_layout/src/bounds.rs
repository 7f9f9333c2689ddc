// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport bounds in, content bounds out.

use kurbo::{Point, Rect, Size, Vec2};

use crate::LayoutError;

/// Sizing constraints and scroll position of the viewport a layout fills.
///
/// An explicit dimension fixes the viewport along that axis. Without one, the
/// viewport takes the content extent clamped into `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportBounds {
    /// Fixed viewport width, if any.
    pub explicit_width: Option<f64>,
    /// Fixed viewport height, if any.
    pub explicit_height: Option<f64>,
    /// Lower bound for an auto-sized width.
    pub min_width: f64,
    /// Lower bound for an auto-sized height.
    pub min_height: f64,
    /// Upper bound for an auto-sized width.
    pub max_width: f64,
    /// Upper bound for an auto-sized height.
    pub max_height: f64,
    /// Current scroll position of the viewport within the content.
    pub scroll: Vec2,
}

impl Default for ViewportBounds {
    fn default() -> Self {
        Self {
            explicit_width: None,
            explicit_height: None,
            min_width: 0.0,
            min_height: 0.0,
            max_width: f64::INFINITY,
            max_height: f64::INFINITY,
            scroll: Vec2::ZERO,
        }
    }
}

impl ViewportBounds {
    /// Bounds with both dimensions fixed.
    #[must_use]
    pub fn fixed(size: Size) -> Self {
        Self {
            explicit_width: Some(size.width),
            explicit_height: Some(size.height),
            ..Self::default()
        }
    }

    /// Returns a copy scrolled to `scroll`.
    #[must_use]
    pub fn with_scroll(mut self, scroll: Vec2) -> Self {
        self.scroll = scroll;
        self
    }

    /// Rejects NaN anywhere and negative or infinite minimums.
    pub fn validate(&self) -> Result<(), LayoutError> {
        fn check(value: f64, field: &'static str) -> Result<(), LayoutError> {
            if value.is_nan() {
                Err(LayoutError::InvalidValue { field })
            } else {
                Ok(())
            }
        }
        if let Some(w) = self.explicit_width {
            check(w, "explicit_width")?;
        }
        if let Some(h) = self.explicit_height {
            check(h, "explicit_height")?;
        }
        check(self.max_width, "max_width")?;
        check(self.max_height, "max_height")?;
        check(self.scroll.x, "scroll.x")?;
        check(self.scroll.y, "scroll.y")?;
        if !self.min_width.is_finite() || self.min_width < 0.0 {
            return Err(LayoutError::InvalidValue { field: "min_width" });
        }
        if !self.min_height.is_finite() || self.min_height < 0.0 {
            return Err(LayoutError::InvalidValue {
                field: "min_height",
            });
        }
        Ok(())
    }

    /// Resolves the viewport width for a given content width.
    #[must_use]
    pub fn resolve_width(&self, content_width: f64) -> f64 {
        self.explicit_width
            .unwrap_or_else(|| content_width.min(self.max_width).max(self.min_width))
    }

    /// Resolves the viewport height for a given content height.
    #[must_use]
    pub fn resolve_height(&self, content_height: f64) -> f64 {
        self.explicit_height
            .unwrap_or_else(|| content_height.min(self.max_height).max(self.min_height))
    }

    /// Resolves both viewport dimensions for a given content size.
    #[must_use]
    pub fn resolve(&self, content: Size) -> Size {
        Size::new(
            self.resolve_width(content.width),
            self.resolve_height(content.height),
        )
    }
}

/// Output of one layout pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutResult {
    /// Top-left corner of the content.
    pub content_origin: Point,
    /// Total scrollable content size.
    pub content_size: Size,
    /// Size the viewport resolved to.
    pub viewport_size: Size,
}

impl LayoutResult {
    /// The content bounds as a rectangle.
    #[must_use]
    pub fn content_rect(&self) -> Rect {
        Rect::from_origin_size(self.content_origin, self.content_size)
    }

    /// Largest scroll offset that keeps the viewport inside the content.
    #[must_use]
    pub fn max_scroll(&self) -> Vec2 {
        Vec2::new(
            (self.content_size.width - self.viewport_size.width).max(0.0),
            (self.content_size.height - self.viewport_size.height).max(0.0),
        )
    }
}

/// Notifications a layout records while it runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayoutEvent {
    /// Cached item extents changed, so the content size may have shifted.
    ExtentsChanged,
    /// Items before the scroll position changed size; scroll by this delta to
    /// keep the visible content still.
    Scroll(Vec2),
}

#[cfg(test)]
mod tests {
    use super::ViewportBounds;
    use crate::LayoutError;
    use kurbo::Size;

    #[test]
    fn auto_size_clamps_to_bounds() {
        let bounds = ViewportBounds {
            min_width: 50.0,
            max_height: 100.0,
            ..ViewportBounds::default()
        };
        assert_eq!(bounds.resolve(Size::new(10.0, 400.0)), Size::new(50.0, 100.0));
        let fixed = ViewportBounds::fixed(Size::new(30.0, 40.0));
        assert_eq!(fixed.resolve(Size::new(10.0, 400.0)), Size::new(30.0, 40.0));
    }

    #[test]
    fn nan_is_rejected() {
        let bounds = ViewportBounds {
            explicit_height: Some(f64::NAN),
            ..ViewportBounds::default()
        };
        assert_eq!(
            bounds.validate(),
            Err(LayoutError::InvalidValue {
                field: "explicit_height"
            })
        );
        assert!(ViewportBounds::default().validate().is_ok());
    }
}
