//! oui-panel: obstruction-aware placement of a floating AR panel
//!
//! This crate keeps a single world-space UI panel readable while real-world
//! objects detected by a server move through the view:
//! - 3D spatial primitives in the host's Y-up, Z-forward frame
//! - Anchor registry with fixed-lifetime expiry
//! - Main/side obstruction sets fed by per-anchor ray results
//! - A five-state movement controller (center, sway, hold, re-center)
//! - Yaw-locked "face the viewer" rotation
//! - Decoding of the server's detection and danger messages
//!
//! [`PanelSession`] drives all of it once per rendered frame.

pub mod anchor;
pub mod error;
pub mod facing;
pub mod movement;
pub mod protocol;
pub mod session;
pub mod spatial;
pub mod viewer;

// Re-export commonly used types
pub use anchor::{AnchorRegistry, AnchorUpdate, Obstruction, ObstructionSets, RayHit};
pub use error::MessageError;
pub use movement::{GuiMovementMachine, GuiMovementState, MovementConfig, MovementInput, SwayDirection};
pub use protocol::{DangerNotice, FrameData, GuiColors, ServerMessage};
pub use session::{PanelSession, SessionConfig, TickReport};
pub use spatial::{Point3D, Quaternion, Transform, Vector3D};
pub use viewer::ViewerPose;
