use galaxy_core::config::{FieldConfig, Viewport};
use galaxy_core::field::{scroll_progress, ParticleField};
use galaxy_core::particle::ParticleLayer;
use galaxy_core::trail::{CursorTrail, TrailConfig, TrailSpark};
use galaxy_core::FieldError;
use wasm_bindgen::prelude::*;

fn to_js(err: FieldError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Scroll fraction helper for pages that drive the progress signal themselves.
#[wasm_bindgen]
pub fn page_scroll_progress(scroll_top: f32, scroll_height: f32, viewport_height: f32) -> f32 {
    scroll_progress(scroll_top, scroll_height, viewport_height)
}

/// Galaxy background handle. Layer buffers are read by index straight out of
/// wasm memory; index order is back to front.
#[wasm_bindgen]
pub struct GalaxyField {
    field: ParticleField,
}

#[wasm_bindgen]
impl GalaxyField {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Result<GalaxyField, JsValue> {
        let viewport = Viewport::new(width, height).map_err(to_js)?;
        let field =
            ParticleField::from_entropy(FieldConfig::default(), viewport).map_err(to_js)?;
        Ok(Self::announce(field))
    }

    /// Reproducible field, e.g. for visual regression screenshots.
    #[wasm_bindgen]
    pub fn with_seed(width: f32, height: f32, seed: u32) -> Result<GalaxyField, JsValue> {
        let viewport = Viewport::new(width, height).map_err(to_js)?;
        let field = ParticleField::with_seed(FieldConfig::default(), viewport, u64::from(seed))
            .map_err(to_js)?;
        Ok(Self::announce(field))
    }

    /// Regenerates every layer for the new surface size.
    #[wasm_bindgen]
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), JsValue> {
        let viewport = Viewport::new(width, height).map_err(to_js)?;
        self.field.resize(viewport).map_err(to_js)
    }

    /// Advances from a `requestAnimationFrame` timestamp. Returns the update time in ms.
    #[wasm_bindgen]
    pub fn tick(&mut self, timestamp_ms: f64) -> f32 {
        let start = js_sys::Date::now();
        self.field.tick(timestamp_ms);
        (js_sys::Date::now() - start) as f32
    }

    /// Advances by an explicit delta in seconds. Returns the update time in ms.
    #[wasm_bindgen]
    pub fn step(&mut self, dt: f32) -> f32 {
        let start = js_sys::Date::now();
        self.field.step(dt);
        (js_sys::Date::now() - start) as f32
    }

    #[wasm_bindgen]
    pub fn pause(&mut self) {
        self.field.pause();
    }

    #[wasm_bindgen]
    pub fn resume(&mut self) {
        self.field.resume();
    }

    #[wasm_bindgen]
    pub fn is_paused(&self) -> bool {
        self.field.is_paused()
    }

    #[wasm_bindgen]
    pub fn set_progress(&mut self, progress: f32) {
        self.field.set_progress(progress);
    }

    #[wasm_bindgen]
    pub fn set_scroll(&mut self, scroll_top: f32, scroll_height: f32, viewport_height: f32) {
        let progress = scroll_progress(scroll_top, scroll_height, viewport_height);
        self.field.set_progress(progress);
    }

    #[wasm_bindgen]
    pub fn zoom(&self) -> f32 {
        self.field.zoom()
    }

    /// Changes one layer's particle count (`"spiral-arm"` covers every arm) and regenerates.
    #[wasm_bindgen]
    pub fn set_layer_count(&mut self, name: &str, count: i32) -> Result<(), JsValue> {
        let mut config = self.field.config().clone();
        config.set_count(name, i64::from(count)).map_err(to_js)?;
        self.field.reconfigure(config).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn layer_count(&self) -> usize {
        self.field.layers().len()
    }

    #[wasm_bindgen]
    pub fn particle_count(&self) -> usize {
        self.field.particle_count()
    }

    #[wasm_bindgen]
    pub fn total_respawns(&self) -> f64 {
        self.field.total_respawns() as f64
    }

    #[wasm_bindgen]
    pub fn layer_name(&self, index: usize) -> Option<String> {
        self.layer(index).map(|l| l.name())
    }

    #[wasm_bindgen]
    pub fn layer_particle_count(&self, index: usize) -> usize {
        self.layer(index).map_or(0, |l| l.count)
    }

    /// `3 * count` floats (xyz).
    #[wasm_bindgen]
    pub fn positions_ptr(&self, index: usize) -> *const f32 {
        self.layer(index).map_or(std::ptr::null(), |l| l.positions_flat().as_ptr())
    }

    /// `3 * count` floats (rgb).
    #[wasm_bindgen]
    pub fn colors_ptr(&self, index: usize) -> *const f32 {
        self.layer(index).map_or(std::ptr::null(), |l| l.colors_flat().as_ptr())
    }

    /// `count` floats.
    #[wasm_bindgen]
    pub fn sizes_ptr(&self, index: usize) -> *const f32 {
        self.layer(index).map_or(std::ptr::null(), |l| l.sizes().as_ptr())
    }

    /// 32-byte `LayerUniform` (rotation xyz, scale, opacity, point size, blend mode, attenuation).
    #[wasm_bindgen]
    pub fn layer_uniform(&self, index: usize) -> Vec<u8> {
        self.layer(index)
            .map(|l| bytemuck::bytes_of(&l.uniform()).to_vec())
            .unwrap_or_default()
    }
}

impl GalaxyField {
    fn announce(field: ParticleField) -> GalaxyField {
        web_sys::console::log_1(
            &format!(
                "WASM GalaxyField created: {} layers, {} particles",
                field.layers().len(),
                field.particle_count()
            )
            .into(),
        );
        GalaxyField { field }
    }

    fn layer(&self, index: usize) -> Option<&ParticleLayer> {
        self.field.layers().get(index)
    }
}

/// Cursor trail handle for the 2D overlay canvas.
#[wasm_bindgen]
pub struct PointerTrail {
    trail: CursorTrail,
}

#[wasm_bindgen]
impl PointerTrail {
    #[wasm_bindgen(constructor)]
    pub fn new(capacity: usize) -> Result<PointerTrail, JsValue> {
        let config = TrailConfig {
            capacity,
            ..TrailConfig::default()
        };
        let trail = CursorTrail::from_entropy(config).map_err(to_js)?;
        Ok(PointerTrail { trail })
    }

    #[wasm_bindgen]
    pub fn emit(&mut self, x: f32, y: f32, timestamp_ms: f64) {
        self.trail.emit(x, y, timestamp_ms);
    }

    /// Moves sparks and repacks the draw buffer. Returns the live spark count.
    #[wasm_bindgen]
    pub fn update(&mut self, dt: f32) -> usize {
        self.trail.update(dt);
        self.trail.sparks().len()
    }

    /// Packed `TrailSpark`s from the last `update`, 8 floats each.
    #[wasm_bindgen]
    pub fn sparks_ptr(&self) -> *const f32 {
        self.trail.packed().as_ptr() as *const f32
    }

    #[wasm_bindgen]
    pub fn sparks_byte_length(&self) -> usize {
        self.trail.packed().len() * std::mem::size_of::<TrailSpark>()
    }

    #[wasm_bindgen]
    pub fn clear(&mut self) {
        self.trail.clear();
    }
}
