use scene::World;
use scene::components::{Arrow, Transform};
use scene::entity::EntityId;
use tracing::trace;

use crate::camera::{Mat4, PerspectiveCamera};

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RenderCommand {
    DrawArrow {
        entity: EntityId,
        transform: Transform,
        arrow: Arrow,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub view_projection: Mat4,
    pub commands: Vec<RenderCommand>,
}

/// Draw target for the scene.
///
/// `set_size` tracks the drawable surface in pixels; `render` draws one frame
/// of `world` as seen from `camera`.
pub trait Renderer {
    fn set_size(&mut self, width: u32, height: u32);
    fn render(&mut self, world: &World, camera: &PerspectiveCamera);
}

/// Build the draw list for one frame.
///
/// Arrows whose origin lies beyond the camera far plane distance are culled.
pub fn collect_frame(world: &World, camera: &PerspectiveCamera) -> RenderFrame {
    let mut commands = Vec::new();
    for (entity, transform, arrow) in world.arrows() {
        if (transform.position - camera.position).length() > camera.far {
            continue;
        }
        commands.push(RenderCommand::DrawArrow {
            entity,
            transform,
            arrow,
        });
    }
    RenderFrame {
        view_projection: camera.view_projection(),
        commands,
    }
}

/// Renderer that builds frames without a GPU surface.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    width: u32,
    height: u32,
    frames_rendered: u64,
    last_frame: Option<RenderFrame>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn last_frame(&self) -> Option<&RenderFrame> {
        self.last_frame.as_ref()
    }
}

impl Renderer for HeadlessRenderer {
    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn render(&mut self, world: &World, camera: &PerspectiveCamera) {
        let frame = collect_frame(world, camera);
        self.frames_rendered += 1;
        trace!(
            frame = self.frames_rendered,
            draws = frame.commands.len(),
            "rendered"
        );
        self.last_frame = Some(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::{HeadlessRenderer, RenderCommand, Renderer, collect_frame};
    use crate::camera::PerspectiveCamera;
    use foundation::math::Vec3;
    use scene::World;
    use scene::components::{Arrow, Transform};

    fn world_with_arrows_at(positions: &[Vec3]) -> World {
        let mut world = World::new();
        for p in positions {
            let e = world.spawn();
            world.set_transform(e, Transform::translate(*p));
            world.set_arrow(e, Arrow::new(Vec3::new(0.0, 1.0, 0.0), 20.0, 0xffff00));
        }
        world
    }

    #[test]
    fn collect_arrow_commands() {
        let world = world_with_arrows_at(&[Vec3::new(0.0, 0.0, -50.0)]);
        let camera = PerspectiveCamera::new(80.0, 1.0, 0.001, 1000.0);
        let frame = collect_frame(&world, &camera);
        assert!(matches!(
            frame.commands.as_slice(),
            [RenderCommand::DrawArrow { .. }]
        ));
    }

    #[test]
    fn arrows_beyond_far_plane_are_culled() {
        let world = world_with_arrows_at(&[Vec3::new(0.0, 0.0, -50.0), Vec3::new(0.0, 0.0, -1500.0)]);
        let camera = PerspectiveCamera::new(80.0, 1.0, 0.001, 1000.0);
        assert_eq!(collect_frame(&world, &camera).commands.len(), 1);
    }

    #[test]
    fn headless_renderer_counts_frames_and_tracks_size() {
        let world = world_with_arrows_at(&[Vec3::new(10.0, 0.0, 0.0)]);
        let camera = PerspectiveCamera::new(80.0, 1.0, 0.001, 1000.0);
        let mut renderer = HeadlessRenderer::new();
        renderer.set_size(640, 480);
        renderer.render(&world, &camera);
        renderer.render(&world, &camera);

        assert_eq!(renderer.size(), (640, 480));
        assert_eq!(renderer.frames_rendered(), 2);
        assert_eq!(renderer.last_frame().map(|f| f.commands.len()), Some(1));
    }
}
