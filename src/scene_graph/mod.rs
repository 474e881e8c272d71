pub mod light;
pub mod model_builder;
pub mod model_node;
pub mod scene;
pub mod transform;

// Re-export main types for convenience
pub use light::LightSource;
pub use model_builder::{group_imported_meshes, load_model};
pub use model_node::{CompositeModel, MaterialId, MeshId, ModelKind, ModelNode, ModelPart};
pub use scene::{FrameStats, LightKey, ModelKey, Scene};
pub use transform::Transform;
