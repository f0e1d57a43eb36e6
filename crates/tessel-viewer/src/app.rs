//! Windowed viewer: GPU backend, scene catalog and key handling behind the
//! engine's `App` contract.

use anyhow::{Context, Result};

use tessel_engine::core::{App, AppControl, FrameCtx};
use tessel_engine::input::InputEvent;
use tessel_engine::paint::Color;
use tessel_engine::render::{GpuBackend, GpuBackendInit};
use tessel_engine::scene::Scene;

use crate::catalog::{CatalogConfig, build_catalog};
use crate::controls::{Action, Controls, step};

/// GPU-side state, created on the first frame once a device exists.
struct Loaded {
    backend: GpuBackend,
    scenes: Vec<Scene<GpuBackend>>,
}

impl Loaded {
    fn new(device: &wgpu::Device, queue: &wgpu::Queue, config: &CatalogConfig) -> Result<Self> {
        let mut backend =
            GpuBackend::new(device, queue, GpuBackendInit::default()).context("failed to create GPU backend")?;
        let scenes = build_catalog(&mut backend, config)?;
        if scenes.is_empty() {
            anyhow::bail!("scene catalog is empty");
        }
        Ok(Self { backend, scenes })
    }
}

pub struct Viewer {
    config: CatalogConfig,
    loaded: Option<Loaded>,
    controls: Controls,
    current: usize,
    aspect: f32,
}

impl Viewer {
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            config,
            loaded: None,
            controls: Controls,
            current: 0,
            aspect: 1.0,
        }
    }

    fn switch_to(&mut self, index: usize, ctx: &mut FrameCtx<'_, '_>) {
        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };
        self.current = index;
        let scene = &mut loaded.scenes[index];
        scene.activate();
        log::info!("scene {}: {}", index, scene.title());
        ctx.runtime.set_title(scene.title());
    }
}

impl App for Viewer {
    fn on_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
        if let Some(loaded) = self.loaded.as_mut() {
            for scene in &mut loaded.scenes {
                scene.set_aspect(self.aspect);
            }
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.loaded.is_none() {
            match Loaded::new(ctx.gpu.device(), ctx.gpu.queue(), &self.config) {
                Ok(mut loaded) => {
                    log::info!("adapter: {}", ctx.gpu.adapter_info().name);
                    for scene in &mut loaded.scenes {
                        scene.set_aspect(self.aspect);
                    }
                    self.loaded = Some(loaded);
                    self.switch_to(0, ctx);
                }
                Err(e) => {
                    log::error!("{e:#}");
                    return AppControl::Exit;
                }
            }
        }

        let input_frame = ctx.input_frame;
        for ev in &input_frame.events {
            let InputEvent::Key { key, action, modifiers, .. } = ev else {
                continue;
            };
            let Some(loaded) = self.loaded.as_mut() else {
                return AppControl::Exit;
            };
            let len = loaded.scenes.len();
            let scene = &mut loaded.scenes[self.current];

            match self.controls.handle(scene, *key, *action, *modifiers) {
                Action::Continue => {}
                Action::NextScene => self.switch_to(step(self.current, len, true), ctx),
                Action::PreviousScene => self.switch_to(step(self.current, len, false), ctx),
                Action::PolygonMode(mode) => {
                    loaded.backend.set_polygon_mode(mode);
                }
                Action::Quit => return AppControl::Exit,
            }
        }

        let Some(loaded) = self.loaded.as_mut() else {
            return AppControl::Exit;
        };
        let backend = &mut loaded.backend;
        // A frame whose surface acquisition failed left its draws queued.
        backend.discard_pending();
        loaded.scenes[self.current].redraw(backend);

        ctx.render(Color::BLACK, |rctx, target| backend.encode(rctx, target))
    }
}
