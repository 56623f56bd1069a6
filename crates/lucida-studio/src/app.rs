use std::path::Path;

use anyhow::{Context, Result};
use image::RgbaImage;

use lucida_engine::coords::Viewport;
use lucida_engine::core::{App, AppControl, FrameCtx};
use lucida_engine::input::{InputEvent, KeyState};
use lucida_engine::paint::Color;
use lucida_engine::render::raster::rasterize;
use lucida_engine::render::shapes::image::ImageRenderer;
use lucida_engine::render::shapes::mesh::MeshRenderer;
use lucida_engine::render::ImageStore;
use lucida_engine::window::CursorIcon;
use lucida_grid::export::clip_to_frame;
use lucida_grid::{
    render_frame, Camera, Controller, EventHub, Gesture, GridConfig, GridModel, GridStyle,
    ImageSource, PointerTranslator, StaticImage,
};

use crate::actions::{action_for, Action, Steps};
use crate::config::StudioConfig;
use crate::export;

const CLEAR: Color = Color::from_premul(0.07, 0.07, 0.09, 1.0);

/// Model and controller, created once the first frame tells us the viewport.
struct Session {
    model: GridModel,
    controller: Controller,
}

pub struct StudioApp {
    config: StudioConfig,
    grid_config: GridConfig,
    style: GridStyle,

    session: Option<Session>,
    hub: EventHub,
    translator: PointerTranslator,

    images: ImageStore,
    background: Option<StaticImage>,

    image_renderer: ImageRenderer,
    mesh_renderer: MeshRenderer,

    cursor: CursorIcon,
    title: String,
}

impl StudioApp {
    pub fn new(config: StudioConfig) -> Self {
        let grid_config = GridConfig { color_seed: config.color_seed, ..GridConfig::default() };
        let mut app = Self {
            config,
            grid_config,
            style: GridStyle::default(),
            session: None,
            hub: EventHub::new(),
            translator: PointerTranslator::new(),
            images: ImageStore::new(),
            background: None,
            image_renderer: ImageRenderer::new(),
            mesh_renderer: MeshRenderer::new(),
            cursor: CursorIcon::Default,
            title: String::new(),
        };
        app.load_background();
        app
    }

    fn steps(&self) -> Steps {
        Steps {
            rotation: self.config.rotation_step,
            coarse_rotation: self.config.coarse_rotation_step,
            level: self.config.level_step,
            curvature: self.config.curvature_step,
        }
    }

    fn load_background(&mut self) {
        let Some(path) = self.config.image.clone() else {
            return;
        };
        match load_rgba(&path) {
            Ok(pixels) => {
                log::info!("background {} ({}x{})", path.display(), pixels.width(), pixels.height());
                match &mut self.background {
                    Some(bg) => bg.reload(&mut self.images, pixels),
                    None => self.background = Some(StaticImage::register(&mut self.images, pixels)),
                }
            }
            Err(err) => log::warn!("background unavailable, drawing grid only: {err:#}"),
        }
    }

    fn ensure_session(&mut self, viewport: Viewport) {
        if self.session.is_some() || !viewport.is_valid() {
            return;
        }
        let camera = Camera::centered(&self.grid_config, viewport);
        let model = GridModel::for_view(self.grid_config.clone(), &camera, viewport);
        let mut controller = Controller::new(self.grid_config.clone(), camera);
        controller.attach(&self.hub);
        log::info!("session started at {}x{}", viewport.width, viewport.height);
        self.session = Some(Session { model, controller });
    }

    fn background_source(&self) -> Option<&dyn ImageSource> {
        self.background.as_ref().map(|b| b as &dyn ImageSource)
    }

    fn apply(&mut self, action: Action, viewport: Viewport) -> AppControl {
        if action == Action::ReloadBackground {
            self.load_background();
            return AppControl::Continue;
        }
        if action == Action::Export {
            if let Err(err) = self.export(viewport) {
                log::error!("export failed: {err:#}");
            }
            return AppControl::Continue;
        }

        let Some(session) = self.session.as_mut() else {
            return AppControl::Continue;
        };
        let model = &mut session.model;
        let camera = *session.controller.camera();

        let result = match action {
            Action::AddPoint => {
                model.add_free_point(&camera, viewport);
                Ok(())
            }
            Action::AddHorizonPair => {
                model.add_horizon_pair(viewport.width);
                Ok(())
            }
            Action::AddPerpendicularPair => {
                model.add_perpendicular_pair();
                Ok(())
            }
            Action::RemoveSelected => {
                if let Some(id) = model.selected() {
                    model.remove_point(id);
                }
                Ok(())
            }
            Action::ToggleAnchor => match model.selected() {
                Some(id) => model.toggle_anchor(id).map(|_| ()),
                None => Ok(()),
            },
            Action::Rotate(deg) => model.set_rotation(model.horizon().rotation + deg),
            Action::MoveHorizon(dy) => model.set_horizon_level(model.horizon().level + dy),
            Action::LineCount(delta) => {
                let next = model.settings().line_count.saturating_add_signed(delta);
                model.set_line_count(next);
                Ok(())
            }
            Action::Curvature(delta) => {
                let current = model.selected().and_then(|id| model.point(id)).map(|p| (p.id, p.curvature));
                match current {
                    Some((id, c)) => model.set_curvature(id, c + delta),
                    None => Ok(()),
                }
            }
            Action::CycleAspectRatio => {
                let next = model.settings().aspect_ratio.next();
                model.set_aspect_ratio(next, &camera, viewport)
            }
            Action::ToggleBackground => {
                let on = model.toggle_background();
                if on && self.background.as_ref().is_none_or(|b| !b.is_ready()) {
                    log::warn!("no background image loaded");
                }
                Ok(())
            }
            Action::ToggleParallelGrid => {
                model.toggle_parallel_grid();
                Ok(())
            }
            Action::TogglePerpendicularGrid => {
                model.toggle_perpendicular_grid();
                Ok(())
            }
            Action::LogSnapshot => {
                match serde_json::to_string_pretty(&model.snapshot()) {
                    Ok(json) => log::info!("grid snapshot:\n{json}"),
                    Err(err) => log::error!("snapshot serialization failed: {err}"),
                }
                Ok(())
            }
            Action::Quit => return AppControl::Exit,
            Action::Export | Action::ReloadBackground => Ok(()),
        };

        if let Err(err) = result {
            log::warn!("{action:?} rejected: {err}");
        }
        AppControl::Continue
    }

    /// Rasterizes the current view on the CPU, clips it to the frame (or keeps
    /// the whole view when there is none), then saves and copies it.
    fn export(&self, viewport: Viewport) -> Result<()> {
        let session = self.session.as_ref().context("nothing to export yet")?;
        let camera = session.controller.camera();
        let mut list = render_frame(&session.model, camera, self.background_source(), viewport, &self.style);
        let surface = rasterize(&mut list, viewport, &self.images, CLEAR);

        let image = match session.model.frame() {
            Some(frame) => clip_to_frame(&surface, frame, camera).context("frame is outside the view")?,
            None => surface,
        };

        let path = export::save_png(&image, &self.config.export_dir, chrono::Local::now())?;
        log::info!("exported {} ({}x{})", path.display(), image.width(), image.height());

        if let Err(err) = export::copy_to_clipboard(&image) {
            log::warn!("clipboard copy skipped: {err:#}");
        }
        Ok(())
    }

    fn status_title(&self) -> String {
        let Some(session) = &self.session else {
            return "lucida".to_owned();
        };
        let model = &session.model;
        let settings = model.settings();
        format!(
            "lucida | {} points | {:.0}° | {} lines | frame {} | zoom {:.0}%",
            model.points().len(),
            model.horizon().rotation,
            settings.line_count,
            settings.aspect_ratio.label(),
            session.controller.camera().scale() * 100.0,
        )
    }

    fn cursor_for(&self) -> CursorIcon {
        let gesture = self.session.as_ref().map(|s| s.controller.gesture()).unwrap_or_default();
        match gesture {
            Gesture::Idle => CursorIcon::Default,
            Gesture::PanningView { .. } | Gesture::PinchZooming { .. } => CursorIcon::Grabbing,
            Gesture::DraggingPoint { .. } | Gesture::DraggingFrameBody { .. } => CursorIcon::Move,
            Gesture::DraggingFrameCorner { .. } => CursorIcon::NwseResize,
        }
    }
}

impl App for StudioApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let viewport = ctx.window.viewport();
        self.ensure_session(viewport);

        // ── Input ─────────────────────────────────────────────────────────
        let steps = self.steps();
        let mut actions = Vec::new();
        for event in &ctx.input_frame.events {
            if let InputEvent::Key { key, state: KeyState::Pressed, modifiers, .. } = event
                && let Some(action) = action_for(*key, *modifiers, &steps)
            {
                actions.push(action);
            }
            if let Some(pointer) = self.translator.translate(event) {
                self.hub.publish(pointer);
            }
        }

        if let Some(session) = self.session.as_mut() {
            session.controller.pump(&mut session.model);
        }

        for action in actions {
            if self.apply(action, viewport) == AppControl::Exit {
                ctx.runtime.exit();
                return AppControl::Exit;
            }
        }

        // ── Window chrome ─────────────────────────────────────────────────
        let cursor = self.cursor_for();
        if cursor != self.cursor {
            ctx.window.set_cursor(cursor);
            self.cursor = cursor;
        }
        let title = self.status_title();
        if title != self.title {
            ctx.runtime.set_title(title.clone());
            self.title = title;
        }

        // ── Render ────────────────────────────────────────────────────────
        let Some(session) = self.session.as_ref() else {
            return ctx.render(CLEAR, |_, _| {});
        };
        let mut list = render_frame(
            &session.model,
            session.controller.camera(),
            self.background_source(),
            viewport,
            &self.style,
        );

        let images = &self.images;
        let r_img = &mut self.image_renderer;
        let r_mesh = &mut self.mesh_renderer;
        ctx.render(CLEAR, |rctx, target| {
            r_img.render(rctx, target, &mut list, images);
            r_mesh.render(rctx, target, &mut list);
        })
    }
}

fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).with_context(|| format!("open image {}", path.display()))?;
    Ok(img.to_rgba8())
}
