use glam::Mat4;
use log::{debug, trace};

use crate::rendering::filter::{FilterId, VisibilityFilter};
use crate::rendering::shading::{NopShadingStrategy, ShadingStrategy};
use crate::scene_graph::ModelNode;

struct RegisteredFilter {
    id: FilterId,
    filter: Box<dyn VisibilityFilter>,
}

/// Ordered chain of visibility filters, combined with AND, plus the active
/// shading strategy.
///
/// Filters run in registration order. Order only affects how early a
/// rejection short-circuits, never the result.
pub struct RenderManager {
    filters: Vec<RegisteredFilter>,
    next_filter_id: u64,
    shading_strategy: Box<dyn ShadingStrategy>,
    fresh: bool,
}

impl Default for RenderManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderManager {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            next_filter_id: 0,
            shading_strategy: Box::new(NopShadingStrategy),
            fresh: false,
        }
    }

    pub fn add_model_filter(&mut self, filter: impl VisibilityFilter + 'static) -> FilterId {
        self.add_boxed_model_filter(Box::new(filter))
    }

    pub fn add_boxed_model_filter(&mut self, filter: Box<dyn VisibilityFilter>) -> FilterId {
        let id = FilterId(self.next_filter_id);
        self.next_filter_id += 1;

        debug!("Registered visibility filter '{}'", filter.name());
        self.filters.push(RegisteredFilter { id, filter });
        // The new filter has not seen this frame's update yet.
        self.fresh = false;

        id
    }

    pub fn remove_model_filter(&mut self, id: FilterId) -> Option<Box<dyn VisibilityFilter>> {
        let index = self.filters.iter().position(|entry| entry.id == id)?;
        let entry = self.filters.remove(index);
        debug!("Removed visibility filter '{}'", entry.filter.name());
        Some(entry.filter)
    }

    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    pub fn filters(&self) -> impl Iterator<Item = &dyn VisibilityFilter> + '_ {
        self.filters.iter().map(|entry| entry.filter.as_ref())
    }

    /// Refreshes every filter once, in registration order.
    pub fn update(&mut self) {
        for entry in &mut self.filters {
            entry.filter.update();
        }

        trace!("Refreshed {} visibility filters", self.filters.len());
        self.fresh = true;
    }

    /// True when every filter accepts the node placed at `world`. No filters
    /// accepts everything.
    pub fn should_render(&self, node: &ModelNode, world: Mat4) -> bool {
        self.filters
            .iter()
            .all(|entry| entry.filter.should_render(node, world))
    }

    /// Marks the filter state as belonging to a previous frame.
    pub fn mark_stale(&mut self) {
        self.fresh = false;
    }

    /// Whether `update` has run since the frame began and no filter was
    /// registered afterwards.
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    pub fn shading_strategy(&self) -> &dyn ShadingStrategy {
        self.shading_strategy.as_ref()
    }

    /// Installs a new strategy and hands back the previous one.
    pub fn set_shading_strategy(
        &mut self,
        shading_strategy: impl ShadingStrategy + 'static,
    ) -> Box<dyn ShadingStrategy> {
        debug!("Shading strategy set to '{}'", shading_strategy.name());
        std::mem::replace(&mut self.shading_strategy, Box::new(shading_strategy))
    }
}
