//! Daymap Data Model
//!
//! Defines the core data contracts shared by every Daymap crate:
//! - **Events:** Opaque records carrying an ISO-8601 timestamp plus pass-through fields
//! - **Days:** Timezone-normalized calendar days and their `(week, weekday)` grid coordinates
//! - **Layout:** The CSS-pixel placement transform shared by renderers and hit testing
//!
//! Layout values are expressed in CSS pixels. Backing-buffer pixels are
//! derived from them through [`layout::SurfaceSize`] so that the same
//! layout survives device-pixel-ratio changes.

pub mod day;
pub mod event;
pub mod layout;

pub use day::*;
pub use event::*;
pub use layout::*;
