//! The demo's scene catalog: one scene per texture comparison.

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use glam::Vec3;

use tessel_engine::geometry::Primitive;
use tessel_engine::paint::Color;
use tessel_engine::render::GraphicsBackend;
use tessel_engine::scene::{Scene, Shape};
use tessel_engine::texture::{Texture, TexturePreset, load_texture, loader::decode_file};

// ── viewing defaults ───────────────────────────────────────────────────────

pub const EYE: Vec3 = Vec3::new(0.0, 0.0, 1.0);
pub const AT: Vec3 = Vec3::ZERO;
pub const UP: Vec3 = Vec3::Y;

pub const FOVY_DEGREES: f32 = 80.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 20.0;

/// Index into the image list of the picture every preset is built from.
const PRESET_IMAGE: usize = 1;

// ── layouts ────────────────────────────────────────────────────────────────

const LOCS: [Vec3; 5] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(-0.4, -0.4, -0.1),
    Vec3::new(0.4, 0.4, -0.15),
    Vec3::new(-0.4, 0.4, -0.2),
    Vec3::new(0.4, -0.4, -0.2),
];
const SIZES: [f32; 5] = [0.5, 0.2, 0.2, 0.2, 0.2];
const WEIGHTS: [f32; 5] = [1.0, 1.0, 0.75, 0.5, 1.0];

/// Texture of each shape in the single-primitive scenes.
const MIXED: [Tex; 5] = [Tex::Image(1), Tex::Image(1), Tex::Image(1), Tex::Image(1), Tex::Image(0)];

// second member of a comparison pair
const RIGHT_LOCS: [Vec3; 2] = [Vec3::new(0.7, 0.0, -0.2), Vec3::new(0.7, 0.5, -0.2)];
const UPPER_LOCS: [Vec3; 2] = [Vec3::new(0.0, 0.7, -0.2), Vec3::new(0.9, 0.5, -0.2)];
const RIGHT_SIZES: [f32; 2] = [0.5, 0.3];
const WIDE_SIZES: [f32; 2] = [0.6, 0.4];

const CYLINDER_LOCS: [Vec3; 2] = [Vec3::new(0.0, 0.0, 0.0), Vec3::new(-0.4, -0.4, -0.1)];
const CYLINDER_SIZES: [f32; 2] = [0.7, 0.5];

/// Where a shape's texture comes from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Tex {
    /// Loaded image with default sampling.
    Image(usize),
    /// The preset image under `TexturePreset::ALL[i]`.
    Preset(usize),
}

/// Side-by-side comparison of two presets: two shapes per preset.
struct Comparison {
    title: &'static str,
    left: usize,
    right: usize,
    right_locs: &'static [Vec3; 2],
    right_sizes: &'static [f32; 2],
}

const COMPARISONS: [Comparison; 8] = [
    Comparison {
        title: "Scene 1 ,Left - Mipmapped image & Right - Non Mipmapped image",
        left: 0,
        right: 3,
        right_locs: &RIGHT_LOCS,
        right_sizes: &RIGHT_SIZES,
    },
    Comparison {
        title: "Right - Min_near_mipmap_Linear + MagLinear & Left - Min Linear + Mag Linear",
        left: 1,
        right: 2,
        right_locs: &RIGHT_LOCS,
        right_sizes: &RIGHT_SIZES,
    },
    Comparison {
        title: "Right -Min_near_mipamap_near + magLinear & Left - MinLinear_Mipmap_linear+MagLinear",
        left: 3,
        right: 4,
        right_locs: &RIGHT_LOCS,
        right_sizes: &RIGHT_SIZES,
    },
    Comparison {
        title: "Right -Min_Linear_mipmapLinear + Mag Near & Left - MinLinear_Mipmap_near+MagLinear",
        left: 5,
        right: 6,
        right_locs: &RIGHT_LOCS,
        right_sizes: &RIGHT_SIZES,
    },
    Comparison {
        title: "Wrap -clamtoedge+clamptoEdge + Mag Linear & Min_Linear_mipmapLinear + Mag Linear",
        left: 6,
        right: 7,
        right_locs: &RIGHT_LOCS,
        right_sizes: &WIDE_SIZES,
    },
    Comparison {
        title: "Wrap -clamtoborder+clamptoborder, Left - clamtoedge+clamptoborder",
        left: 8,
        right: 9,
        right_locs: &UPPER_LOCS,
        right_sizes: &WIDE_SIZES,
    },
    Comparison {
        title: "Wrap - clamtoborder+glRepeat, clamtoborder+clamtoedge",
        left: 10,
        right: 11,
        right_locs: &UPPER_LOCS,
        right_sizes: &WIDE_SIZES,
    },
    Comparison {
        title: "clamtoedge+clamtoborder,   clamtoedge+repeat",
        left: 12,
        right: 11,
        right_locs: &UPPER_LOCS,
        right_sizes: &WIDE_SIZES,
    },
];

/// Inputs for [`build_catalog`].
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub images: Vec<PathBuf>,
    pub cylinder_faces: u32,
}

/// Loaded textures, shared by every scene that shows them.
///
/// A slot is `None` when its image could not be loaded; shapes that would
/// use it are drawn untextured.
pub struct TextureSet<B: GraphicsBackend> {
    images: Vec<Option<Rc<Texture<B>>>>,
    presets: Vec<Option<Rc<Texture<B>>>>,
}

impl<B: GraphicsBackend> TextureSet<B> {
    pub fn load(backend: &mut B, paths: &[PathBuf]) -> Self {
        let images = paths
            .iter()
            .map(|path| match load_texture(backend, path, None) {
                Ok(tex) => Some(tex),
                Err(e) => {
                    log::warn!("{:#}; drawing untextured", anyhow::Error::from(e));
                    None
                }
            })
            .collect();

        let presets = match paths.get(PRESET_IMAGE).map(|p| decode_file(p)) {
            Some(Ok(image)) => TexturePreset::ALL
                .iter()
                .map(|preset| match Texture::new(backend, &image, preset.params()) {
                    Ok(tex) => Some(Rc::new(tex)),
                    Err(e) => {
                        log::warn!("preset {} ({}): {e}", preset.index(), preset.label());
                        None
                    }
                })
                .collect(),
            Some(Err(e)) => {
                log::warn!("{:#}; preset scenes drawn untextured", anyhow::Error::from(e));
                Vec::new()
            }
            None => {
                log::warn!("no preset image given; preset scenes drawn untextured");
                Vec::new()
            }
        };

        Self { images, presets }
    }

    fn get(&self, tex: Tex) -> Option<Rc<Texture<B>>> {
        let slot = match tex {
            Tex::Image(i) => self.images.get(i),
            Tex::Preset(i) => self.presets.get(i),
        };
        slot.and_then(Option::clone)
    }

    /// Number of textures actually created.
    pub fn loaded(&self) -> usize {
        self.images.iter().chain(&self.presets).filter(|t| t.is_some()).count()
    }
}

/// Builds every scene in browsing order.
pub fn build_catalog<B: GraphicsBackend>(backend: &mut B, config: &CatalogConfig) -> Result<Vec<Scene<B>>> {
    let textures = TextureSet::load(backend, &config.images);
    log::info!("catalog: {} textures loaded", textures.loaded());

    let mut builder = Builder { backend, textures: &textures, cylinder_faces: config.cylinder_faces };
    let mut scenes = Vec::new();

    // ----------- single-primitive scenes
    let mut scene = Scene::with_title("Quad scene; with/without textures");
    for q in 0..LOCS.len() {
        builder.add(&mut scene, Primitive::QuadTiled, LOCS[q], SIZES[q], MIXED[q], WEIGHTS[q])?;
    }
    scenes.push(with_view(scene, FOVY_DEGREES));

    let mut scene = Scene::with_title("Box scene; with/without textures");
    for q in 0..LOCS.len() {
        builder.add(&mut scene, Primitive::Cube, LOCS[q], SIZES[q], MIXED[q], WEIGHTS[q])?;
    }
    scenes.push(with_view(scene, FOVY_DEGREES - 1.0));

    scenes.push(builder.cylinders("cylinderScene; with customtextures", Tex::Image(3))?);

    // ----------- preset comparisons
    for cmp in &COMPARISONS {
        let mut scene = Scene::with_title(cmp.title);
        for q in 0..2 {
            builder.add(&mut scene, Primitive::QuadTiled, LOCS[q], SIZES[q], Tex::Preset(cmp.left), WEIGHTS[q])?;
            builder.add(
                &mut scene,
                Primitive::QuadTiled,
                cmp.right_locs[q],
                cmp.right_sizes[q],
                Tex::Preset(cmp.right),
                WEIGHTS[q],
            )?;
        }
        scenes.push(with_view(scene, FOVY_DEGREES));
    }

    let mut scene = Scene::with_title("Box Scene->Left - Mipmapped, Right - Non Mipmapped");
    for q in 0..2 {
        builder.add(&mut scene, Primitive::Cube, LOCS[q], SIZES[q], MIXED[q], WEIGHTS[q])?;
        builder.add(&mut scene, Primitive::Cube, RIGHT_LOCS[q], RIGHT_SIZES[q], Tex::Preset(3), 1.0)?;
    }
    scenes.push(with_view(scene, FOVY_DEGREES));

    scenes.push(builder.cylinders("cylinderScene2; without custom textures", Tex::Image(0))?);

    Ok(scenes)
}

fn with_view<B: GraphicsBackend>(mut scene: Scene<B>, fovy_degrees: f32) -> Scene<B> {
    scene.set_look_at(EYE, AT, UP);
    scene.set_ortho(-1.0, 1.0, -1.0, 1.0, NEAR, FAR);
    scene.set_perspective(fovy_degrees, 1.0, NEAR, FAR);
    scene
}

struct Builder<'a, B: GraphicsBackend> {
    backend: &'a mut B,
    textures: &'a TextureSet<B>,
    cylinder_faces: u32,
}

impl<B: GraphicsBackend> Builder<'_, B> {
    fn add(
        &mut self,
        scene: &mut Scene<B>,
        primitive: Primitive,
        loc: Vec3,
        size: f32,
        tex: Tex,
        weight: f32,
    ) -> Result<()> {
        let geometry = primitive
            .build()
            .with_context(|| format!("invalid {} for '{}'", primitive.name(), scene.title()))?;
        let mut shape = Shape::with_geometry(self.backend, geometry)
            .with_context(|| format!("failed to create {} for '{}'", primitive.name(), scene.title()))?;

        shape.set_location(loc.x, loc.y, loc.z);
        shape.set_size(size, size, size);
        if matches!(primitive, Primitive::Cylinder { .. }) {
            shape.set_nominal_color(Color::MAGENTA);
            shape.set_rotate(90.0, 0.0, 1.0, 0.0);
        }
        if let Some(texture) = self.textures.get(tex) {
            shape.set_texture(Some(texture));
            shape.set_texture_weight(weight);
        }

        scene.add_shape(shape);
        Ok(())
    }

    fn cylinders(&mut self, title: &str, tex: Tex) -> Result<Scene<B>> {
        let mut scene = Scene::with_title(title);
        for q in 0..CYLINDER_LOCS.len() {
            let cylinder = Primitive::Cylinder { faces: self.cylinder_faces };
            self.add(&mut scene, cylinder, CYLINDER_LOCS[q], CYLINDER_SIZES[q], tex, WEIGHTS[q])?;
        }
        Ok(with_view(scene, FOVY_DEGREES))
    }
}
