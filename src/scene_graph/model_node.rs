use std::any::Any;
use std::fmt;

use glam::{Mat4, Vec3};

use crate::math::{BoundingSphere, AABB};
use crate::scene_graph::transform::Transform;

/// Handle to mesh data owned by the rasterization backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub u32);

/// Handle to a material owned by the rasterization backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

/// Renderable leaf. Its bounds are fixed when the part is baked.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPart {
    mesh: MeshId,
    material: Option<MaterialId>,
    bounds: AABB,
}

impl ModelPart {
    pub fn new(mesh: MeshId, bounds: AABB) -> Self {
        Self {
            mesh,
            material: None,
            bounds,
        }
    }

    /// Bakes a part from its vertex positions.
    pub fn bake(mesh: MeshId, positions: impl IntoIterator<Item = Vec3>) -> Self {
        Self::new(mesh, AABB::from_points(positions))
    }

    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = Some(material);
        self
    }

    pub fn mesh(&self) -> MeshId {
        self.mesh
    }

    pub fn material(&self) -> Option<MaterialId> {
        self.material
    }

    pub fn bounds(&self) -> &AABB {
        &self.bounds
    }
}

/// Structural grouping node. Owns its children exclusively.
#[derive(Debug, Default)]
pub struct CompositeModel {
    children: Vec<ModelNode>,
}

impl CompositeModel {
    pub fn new(children: Vec<ModelNode>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[ModelNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [ModelNode] {
        &mut self.children
    }

    pub fn add_child(&mut self, child: ModelNode) {
        self.children.push(child);
    }

    pub fn remove_child(&mut self, index: usize) -> Option<ModelNode> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug)]
pub enum ModelKind {
    Composite(CompositeModel),
    Part(ModelPart),
}

/// Node of a model tree: either a composite of child nodes or a renderable
/// part. Trees are strict ownership forests, so traversal always terminates.
pub struct ModelNode {
    name: String,
    transform: Transform,
    ignore_filters: bool,
    tag: Option<Box<dyn Any>>,
    kind: ModelKind,
}

impl fmt::Debug for ModelNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelNode")
            .field("name", &self.name)
            .field("transform", &self.transform)
            .field("ignore_filters", &self.ignore_filters)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl ModelNode {
    pub fn new(name: impl Into<String>, kind: ModelKind) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            ignore_filters: false,
            tag: None,
            kind,
        }
    }

    pub fn part(name: impl Into<String>, part: ModelPart) -> Self {
        Self::new(name, ModelKind::Part(part))
    }

    pub fn composite(name: impl Into<String>, children: Vec<ModelNode>) -> Self {
        Self::new(name, ModelKind::Composite(CompositeModel::new(children)))
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Nodes that ignore filters are rendered no matter which visibility
    /// filters are installed.
    pub fn ignore_filters(&self) -> bool {
        self.ignore_filters
    }

    pub fn set_ignore_filters(&mut self, ignore_filters: bool) {
        self.ignore_filters = ignore_filters;
    }

    pub fn tag<T: Any>(&self) -> Option<&T> {
        self.tag.as_deref().and_then(|tag| tag.downcast_ref())
    }

    pub fn set_tag<T: Any>(&mut self, tag: T) {
        self.tag = Some(Box::new(tag));
    }

    pub fn take_tag(&mut self) -> Option<Box<dyn Any>> {
        self.tag.take()
    }

    pub fn kind(&self) -> &ModelKind {
        &self.kind
    }

    pub fn as_part(&self) -> Option<&ModelPart> {
        match &self.kind {
            ModelKind::Part(part) => Some(part),
            ModelKind::Composite(_) => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeModel> {
        match &self.kind {
            ModelKind::Composite(composite) => Some(composite),
            ModelKind::Part(_) => None,
        }
    }

    pub fn as_composite_mut(&mut self) -> Option<&mut CompositeModel> {
        match &mut self.kind {
            ModelKind::Composite(composite) => Some(composite),
            ModelKind::Part(_) => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, ModelKind::Part(_))
    }

    /// Local-space bounds. A composite reports the union of its children's
    /// bounds, each moved by the child's own transform.
    pub fn bounds(&self) -> AABB {
        match &self.kind {
            ModelKind::Part(part) => *part.bounds(),
            ModelKind::Composite(composite) => composite
                .children
                .iter()
                .map(|child| child.bounds().transformed(&child.transform.matrix()))
                .reduce(|a, b| a.union(&b))
                .unwrap_or_default(),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.bounds().center()
    }

    pub fn minimum(&self) -> Vec3 {
        self.bounds().min
    }

    pub fn maximum(&self) -> Vec3 {
        self.bounds().max
    }

    pub fn size(&self) -> Vec3 {
        self.bounds().size()
    }

    pub fn transformed_center(&self) -> Vec3 {
        self.transform.transform(self.center())
    }

    /// Sphere around the transformed center whose radius is the length of the
    /// full extent. Deliberately loose.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        self.world_bounding_sphere(self.transform.matrix())
    }

    /// Same sphere placed by a resolved `world` matrix. The radius grows with
    /// the largest axis scale so the sphere never shrinks below the mesh.
    pub fn world_bounding_sphere(&self, world: Mat4) -> BoundingSphere {
        let local = BoundingSphere::enclosing(&self.bounds());
        let scale = world
            .x_axis
            .truncate()
            .length()
            .max(world.y_axis.truncate().length())
            .max(world.z_axis.truncate().length());
        BoundingSphere::new(world.transform_point3(local.center), local.radius * scale)
    }

    /// Calls `visit` once for every leaf, depth-first in child insertion
    /// order. Composites are never visited themselves.
    pub fn traverse_tree<F>(&self, mut visit: F)
    where
        F: FnMut(&ModelNode),
    {
        self.visit_leaves(&mut visit);
    }

    fn visit_leaves<F>(&self, visit: &mut F)
    where
        F: FnMut(&ModelNode),
    {
        match &self.kind {
            ModelKind::Composite(composite) => {
                for child in &composite.children {
                    child.visit_leaves(visit);
                }
            }
            ModelKind::Part(_) => visit(self),
        }
    }

    /// Same order as [`ModelNode::traverse_tree`], additionally resolving each
    /// leaf's world matrix from `parent` down through every ancestor.
    pub fn traverse_tree_with_transform<F>(&self, parent: Mat4, mut visit: F)
    where
        F: FnMut(&ModelNode, Mat4),
    {
        self.visit_leaves_with_transform(parent, &mut visit);
    }

    fn visit_leaves_with_transform<F>(&self, parent: Mat4, visit: &mut F)
    where
        F: FnMut(&ModelNode, Mat4),
    {
        let world = parent * self.transform.matrix();

        match &self.kind {
            ModelKind::Composite(composite) => {
                for child in &composite.children {
                    child.visit_leaves_with_transform(world, visit);
                }
            }
            ModelKind::Part(_) => visit(self, world),
        }
    }

    /// The leaves of [`ModelNode::traverse_tree`], collected.
    pub fn stream_tree(&self) -> Vec<&ModelNode> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a ModelNode>) {
        match &self.kind {
            ModelKind::Composite(composite) => {
                for child in &composite.children {
                    child.collect_leaves(leaves);
                }
            }
            ModelKind::Part(_) => leaves.push(self),
        }
    }

    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        self.traverse_tree(|_| count += 1);
        count
    }
}
