//! Viewport assignment.

/// Viewport used for every document when rotation is off.
pub const FIXED_VIEWPORT: (u32, u32) = (1920, 1080);

/// Common device viewports: phones, 4:3, 3:2, 16:10 and 16:9 screens.
pub const DEVICE_VIEWPORTS: [(u32, u32); 16] = [
    (600, 1320),
    (720, 1280),
    (720, 1600),
    (1024, 768),
    (1440, 1080),
    (1600, 1200),
    (1200, 800),
    (1440, 960),
    (1280, 800),
    (1440, 900),
    (1680, 1050),
    (1280, 720),
    (1366, 768),
    (1536, 864),
    (1600, 900),
    (1920, 1080),
];

/// Viewport for the document at `index`: rotates through
/// [`DEVICE_VIEWPORTS`] unless `fixed`.
pub fn viewport_for(index: usize, fixed: bool) -> (u32, u32) {
    if fixed {
        FIXED_VIEWPORT
    } else {
        DEVICE_VIEWPORTS[index % DEVICE_VIEWPORTS.len()]
    }
}
