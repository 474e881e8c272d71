pub mod distance_culling;
pub mod filter;
pub mod frustum_culling;
pub mod render_manager;
pub mod shading;
pub mod sink;

pub use distance_culling::DistanceCullingFilter;
pub use filter::{FilterId, VisibilityFilter};
pub use frustum_culling::FrustumCullingFilter;
pub use render_manager::RenderManager;
pub use shading::{NopShadingStrategy, OverrideShadingStrategy, ShadingStrategy};
pub use sink::{DrawCommand, DrawList, RenderSink};
