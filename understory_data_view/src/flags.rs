// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty bits.

bitflags::bitflags! {
    /// What a view port must recompute on its next validation.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct InvalidationFlags: u16 {
        /// The data collection changed.
        const DATA             = 1 << 0;
        /// The scroll position changed.
        const SCROLL           = 1 << 1;
        /// The viewport bounds changed.
        const SIZE             = 1 << 2;
        /// The selection changed.
        const SELECTION        = 1 << 3;
        /// Recyclers were added, removed, or replaced.
        const RENDERER_FACTORY = 1 << 4;
        /// Renderer styling changed.
        const STYLES           = 1 << 5;
        /// Enabled state changed.
        const STATE            = 1 << 6;
        /// Layout configuration changed.
        const LAYOUT           = 1 << 7;
        /// Any change that requires a recycling pass.
        const BASICS = Self::SIZE.bits()
            | Self::DATA.bits()
            | Self::LAYOUT.bits()
            | Self::RENDERER_FACTORY.bits();
    }
}

impl InvalidationFlags {
    /// Returns `true` if a recycling pass is required.
    #[must_use]
    pub const fn basics(self) -> bool {
        self.intersects(Self::BASICS)
    }
}

#[cfg(test)]
mod tests {
    use super::InvalidationFlags;

    #[test]
    fn basics_cover_structural_flags() {
        assert!(InvalidationFlags::DATA.basics());
        assert!(InvalidationFlags::RENDERER_FACTORY.basics());
        assert!(!InvalidationFlags::SCROLL.basics());
        assert!(!(InvalidationFlags::SELECTION | InvalidationFlags::STATE).basics());
    }
}
