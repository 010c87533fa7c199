//! Built-in transition implementations.

mod cut;
mod dissolve;
mod fade;
mod push;
mod wipe;
mod zoom;

pub use cut::Cut;
pub use dissolve::Dissolve;
pub use fade::Fade;
pub use push::Push;
pub use wipe::Wipe;
pub use zoom::Zoom;
