//! Commands scoped to one tab.

mod core;
mod emulation;
mod js;
mod navigation;

pub use self::core::PageSession;
pub use self::navigation::Navigation;
