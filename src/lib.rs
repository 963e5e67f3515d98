//! Force-directed class diagrams: box geometry, visual construction, a
//! d3-style force simulation and pointer dragging, tied together by [`draw`].

pub mod config;
pub mod diagram;
pub mod drag;
pub mod draw;
pub mod error;
pub mod geometry;
pub mod physics;
pub mod render;

pub use config::{DiagramConfig, GeometryConfig, LayoutConfig};
pub use diagram::{DiagramData, Endpoint, Entity, Relation, load_diagram, parse_diagram, sample_diagram};
pub use drag::{DragController, DragState};
pub use draw::{Diagram, SurfaceHost, draw, draw_diagram};
pub use error::{ConfigError, DrawError, LoadError};
pub use physics::{FrameClock, Kinematics, Regime, Simulation};
pub use render::{RenderSurface, Visuals};
