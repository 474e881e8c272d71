use glam::{Quat, Vec3};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use orrery::engine::{App, AppContext};
use orrery::math::AABB;
use orrery::rendering::{DistanceCullingFilter, FrustumCullingFilter, RenderSink};
use orrery::scene_graph::{
    load_model, FrameStats, LightSource, MaterialId, MeshId, ModelKey, ModelNode, ModelPart,
    Transform,
};

const CRATE_COUNT: u32 = 240;
const LAMP_COUNT: u32 = 12;
const FIELD_EXTENT: f32 = 400.0;
const VIEW_DISTANCE: f32 = 250.0;

/// Orbits the camera through a procedurally scattered depot while a probe
/// bobs in front of it.
#[derive(Default)]
pub struct DemoApp {
    tick: u64,
    probe: Option<ModelKey>,
    last_stats: FrameStats,
}

impl DemoApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Imported meshes carry world-space vertices, like a level exported
    /// from a modelling tool.
    fn depot_meshes(rng: &mut StdRng) -> Vec<ModelNode> {
        let mut meshes = Vec::new();
        let mut next_mesh = 0;
        let mut mesh_id = || {
            next_mesh += 1;
            MeshId(next_mesh)
        };

        for index in 0..CRATE_COUNT {
            let base = Vec3::new(
                rng.gen_range(-FIELD_EXTENT..FIELD_EXTENT),
                0.0,
                rng.gen_range(-FIELD_EXTENT..FIELD_EXTENT),
            );
            let size = rng.gen_range(1.0..4.0);

            let body = AABB::new(base, base + Vec3::splat(size));
            let lid_base = base + Vec3::new(0.0, size, 0.0);
            let lid = AABB::new(lid_base, lid_base + Vec3::new(size, 0.2, size));

            meshes.push(ModelNode::part(
                format!("OBJ_Crate_{}", index),
                ModelPart::bake(mesh_id(), body.corners()).with_material(MaterialId(1)),
            ));
            meshes.push(ModelNode::part(
                "Lid",
                ModelPart::bake(mesh_id(), lid.corners()).with_material(MaterialId(2)),
            ));
        }

        for index in 0..LAMP_COUNT {
            let angle = index as f32 / LAMP_COUNT as f32 * std::f32::consts::TAU;
            let position = Vec3::new(angle.cos(), 0.0, angle.sin()) * (FIELD_EXTENT * 0.5)
                + Vec3::new(0.0, 12.0, 0.0);
            let lamp = AABB::new(position - Vec3::splat(0.5), position + Vec3::splat(0.5));

            meshes.push(ModelNode::part(
                format!("OBJ_Luces_{}", index),
                ModelPart::bake(mesh_id(), lamp.corners()).with_material(MaterialId(3)),
            ));
        }

        meshes
    }

    fn sky() -> ModelNode {
        let mut sky = ModelNode::part(
            "Sky",
            ModelPart::new(MeshId(0), AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0)))
                .with_material(MaterialId(0)),
        )
        .with_transform(Transform::new(Vec3::ZERO, Quat::IDENTITY, Vec3::splat(900.0)));
        sky.set_ignore_filters(true);
        sky
    }

    fn probe() -> ModelNode {
        ModelNode::part(
            "Probe",
            ModelPart::new(MeshId(10_000), AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0))),
        )
    }
}

impl App for DemoApp {
    fn on_initialize(&mut self, ctx: &mut AppContext<'_>) -> anyhow::Result<()> {
        let camera = ctx.camera_handle();
        let render_manager = ctx.scene.render_manager_mut();
        render_manager.add_model_filter(FrustumCullingFilter::new(camera.clone()));
        render_manager.add_model_filter(DistanceCullingFilter::new(camera, VIEW_DISTANCE));
        for filter in render_manager.filters() {
            debug!("Active filter: {}", filter.name());
        }

        let mut rng = StdRng::seed_from_u64(0x0DE9_07);
        let depot = load_model("depot", Self::depot_meshes(&mut rng));

        ctx.scene.add_model(depot);

        let lamps: Vec<Vec3> = ctx
            .scene
            .find_leaves_by_name("Luces")
            .iter()
            .map(|leaf| leaf.transformed_center())
            .collect();
        for position in lamps {
            ctx.scene.add_light(LightSource::new(position));
        }

        ctx.scene.add_model(Self::sky());
        self.probe = Some(ctx.scene.add_model(Self::probe()));

        let mut camera = ctx.camera.borrow_mut();
        camera.position = Vec3::new(0.0, 6.0, 0.0);
        camera.pitch = -5.0;

        Ok(())
    }

    fn on_update(&mut self, ctx: &mut AppContext<'_>, _partial: f32) -> anyhow::Result<()> {
        self.tick += 1;
        let time = self.tick as f32 * ctx.timer.interval().as_secs_f32();

        let forward = {
            let mut camera = ctx.camera.borrow_mut();
            camera.yaw = (camera.yaw + 0.5) % 360.0;
            camera.position = Vec3::new(time.cos(), 0.0, time.sin()) * 60.0 + Vec3::Y * 6.0;
            camera.position + camera.forward() * 15.0
        };

        let Some(probe) = self.probe else {
            return Ok(());
        };

        if let Some(probe) = ctx.scene.model_mut(probe) {
            let bob = Vec3::Y * (time * 2.0).sin() * 0.5;
            probe.transform_mut().set_transform(
                forward + bob,
                Quat::from_axis_angle(Vec3::Y, time * 0.5),
                Vec3::ONE,
            );
        }

        Ok(())
    }

    fn on_render_deferred(
        &mut self,
        ctx: &mut AppContext<'_>,
        sink: &mut dyn RenderSink,
    ) -> anyhow::Result<FrameStats> {
        let stats = ctx.scene.render_frame(sink);

        if ctx.scene.frame_index() % 120 == 0 {
            info!(
                "Frame {}: drew {} of {} parts ({} culled), {} lights",
                ctx.scene.frame_index(),
                stats.leaves_drawn,
                stats.leaves_visited,
                stats.leaves_culled,
                ctx.scene.lights().count()
            );
        }

        self.last_stats = stats;
        Ok(stats)
    }

    fn on_resize(&mut self, _ctx: &mut AppContext<'_>, width: u32, height: u32) {
        debug!("Viewport resized to {}x{}", width, height);
    }

    fn on_destroy(&mut self, _ctx: &mut AppContext<'_>) -> anyhow::Result<()> {
        info!(
            "Demo finished after {} ticks, last frame drew {} parts",
            self.tick, self.last_stats.leaves_drawn
        );
        Ok(())
    }
}
