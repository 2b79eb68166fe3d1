//! The two demo arrangements and their per-frame driver.

use std::f32::consts::{FRAC_PI_2, PI};
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use lumen_core::{Mesh, Node, ObjectKey, Scene, Transform};
use lumen_fx::{flare_offsets, Beam, Hover, PrismEffect};
use lumen_math::Vec3;
use lumen_tracer::Reflector;

use crate::cli::SceneKind;
use crate::config::DemoConfig;

/// Visible area of the orthographic view at zoom 100 on a 1280x720 window.
const VIEWPORT: (f32, f32) = (12.8, 7.2);
const FRAME_TIME: f32 = 1.0 / 60.0;

enum Effects {
    Blocks { hovers: Vec<(ObjectKey, Hover)> },
    Prism { prism: PrismEffect },
}

/// What one simulated frame produced.
#[derive(Debug, Serialize)]
pub struct FrameReport {
    pub frame: u32,
    pub count: usize,
    pub vertices: Vec<[f32; 3]>,
    pub streaks: usize,
    pub glows: usize,
    pub lit: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rainbow: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flare: Option<[[f32; 3]; 5]>,
}

pub struct Demo {
    scene: Scene,
    reflector: Reflector,
    beam: Beam,
    effects: Effects,
    end: Vec3,
}

impl Demo {
    pub fn new(kind: SceneKind, config: &DemoConfig) -> Result<Self> {
        let mut scene = Scene::new();
        let effects = match kind {
            SceneKind::Blocks => build_blocks(&mut scene)?,
            SceneKind::Prism => build_prism(&mut scene)?,
        };

        let reflector = Reflector::from_config(&config.reflector);
        let beam = Beam::for_reflector(&reflector, config.style());
        log::info!(
            "Built {:?} scene: {} node(s), bounce limit {}, far {}",
            kind,
            scene.node_count(),
            reflector.bounce_limit(),
            reflector.far()
        );

        Ok(Self {
            scene,
            reflector,
            beam,
            effects,
            end: config.reflector.end(),
        })
    }

    /// Pointer position in normalized device coordinates at `time` seconds.
    pub fn pointer(time: f32) -> (f32, f32) {
        (0.9 * (time * 0.5).cos(), 0.9 * (time * 0.7).sin())
    }

    /// Trace one frame with the beam starting under the pointer.
    pub fn step(&mut self, frame: u32) -> FrameReport {
        let time = frame as f32 * FRAME_TIME;
        let (x, y) = Self::pointer(time);
        let origin = Vec3::new(x * VIEWPORT.0 / 2.0, y * VIEWPORT.1 / 2.0, 0.0);

        self.reflector.set_ray(origin, self.end);
        let count = self.reflector.update(&mut self.scene);

        let (tail, rainbow, flare) = match &mut self.effects {
            Effects::Blocks { hovers } => {
                for (_, hover) in hovers.iter_mut() {
                    hover.tick();
                }
                (None, None, None)
            }
            Effects::Prism { prism } => {
                let state = prism.state();
                let flare = state
                    .hit
                    .then(|| flare_offsets(time).map(|offset| (offset + state.flare_position).to_array()));
                (prism.tail(), state.hit.then_some(state.rotation), flare)
            }
        };
        self.beam.update(&self.reflector, tail);

        FrameReport {
            frame,
            count,
            vertices: self.beam.points().iter().map(|p| p.to_array()).collect(),
            streaks: self.beam.streaks().count(),
            glows: self.beam.glows().count(),
            lit: self.lit_names(),
            rainbow,
            flare,
        }
    }

    fn lit_names(&self) -> Vec<String> {
        self.reflector
            .hits()
            .filter_map(|hit| self.scene.node(hit.key))
            .map(|node| node.name.clone())
            .collect()
    }

    pub fn reflector(&self) -> &Reflector {
        &self.reflector
    }
}

fn build_blocks(scene: &mut Scene) -> Result<Effects> {
    let cube = Arc::new(Mesh::cuboid(Vec3::ONE));
    let triangle = Arc::new(Mesh::cylinder(1.0, 1.0, 1.0, 3));

    let placements = [
        ("block", cube.clone(), Transform::from_translation(Vec3::new(0.25, -0.15, 0.0)).with_uniform_scale(0.5)),
        (
            "tilted block",
            cube,
            Transform::from_translation(Vec3::new(-1.1, 0.9, 0.0))
                .with_euler(0.0, 0.0, -1.0)
                .with_uniform_scale(0.5),
        ),
        (
            "triangle",
            triangle,
            Transform::from_translation(Vec3::new(-1.1, -1.2, 0.0))
                .with_euler(FRAC_PI_2, PI, 0.0)
                .with_uniform_scale(0.4),
        ),
    ];

    let mut hovers = Vec::with_capacity(placements.len());
    for (name, mesh, transform) in placements {
        let hover = Hover::new();
        let key = scene.add_node(
            None,
            Node::new(name)
                .with_mesh(mesh)
                .with_transform(transform)
                .with_handlers(hover.handlers()),
        )?;
        hovers.push((key, hover));
    }
    Ok(Effects::Blocks { hovers })
}

fn build_prism(scene: &mut Scene) -> Result<Effects> {
    let prism = PrismEffect::new(Vec3::ZERO);
    let group = scene.add_node(
        None,
        Node::new("prism").with_transform(Transform::from_translation(Vec3::new(0.0, -0.5, 0.0)).with_uniform_scale(0.6)),
    )?;
    scene.add_node(
        Some(group),
        Node::new("prism proxy")
            .with_mesh(Arc::new(Mesh::cylinder(1.0, 1.0, 1.0, 3)))
            .with_transform(Transform::default().with_euler(FRAC_PI_2, PI, 0.0).with_uniform_scale(1.9))
            .with_handlers(prism.handlers())
            .hidden(),
    )?;
    Ok(Effects::Prism { prism })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_frames_trace() {
        let config = DemoConfig::for_scene(SceneKind::Blocks);
        let mut demo = Demo::new(SceneKind::Blocks, &config).unwrap();

        for frame in 0..120 {
            let report = demo.step(frame);
            assert!(report.count >= 2);
            assert_eq!(report.vertices.len(), report.count);
            assert_eq!(report.streaks, report.count - 1);
        }
    }

    #[test]
    fn test_prism_lights_when_beam_points_at_it() {
        let config = DemoConfig::for_scene(SceneKind::Prism);
        let mut demo = Demo::new(SceneKind::Prism, &config).unwrap();

        // Every pointer position aims the beam at the origin, inside the prism.
        let report = demo.step(0);
        assert_eq!(report.lit, vec!["prism proxy".to_string()]);
        assert_eq!(report.count, 2);
        assert_eq!(report.vertices.len(), 3);
        assert_eq!(report.vertices[2], [0.0; 3]);
        assert!(report.rainbow.is_some());
        assert!(report.flare.is_some());
    }
}
