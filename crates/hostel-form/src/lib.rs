//! Review-form helper that reveals the "new hostel" fields.
//!
//! The page offers a hostel `<select>` with an extra `__new__` option for
//! reviewing a hostel that is not listed yet. Picking that option shows the
//! auxiliary fields (name, location, image); any other choice hides them.

pub mod config;
pub mod error;
pub mod platform;
pub mod toggle;

pub use config::ToggleConfig;
pub use error::{ToggleError, ToggleResult};
pub use toggle::{
    AuxiliaryRegion, DisplayState, Mounted, NEW_ENTITY_SENTINEL, SelectionControl,
    VisibilityToggler,
};
