pub mod frame;
pub mod state;

pub use frame::ViewFrame;
pub use state::{ActionButton, Breadcrumb, FrameState};
