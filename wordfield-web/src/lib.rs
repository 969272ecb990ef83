/// Wordfield Web - WASM façade over the sketch runtime
///
/// The browser host owns the WebGL renderer. This crate runs a sketch and
/// hands back flat arrays the host uploads each frame: one column-major
/// 4x4 world matrix per visible mesh, matching colors and material codes,
/// and the camera's view-projection matrix.
use wasm_bindgen::prelude::*;
use wordfield_core::{
    create, FrameTime, Material, OrbitControls, Scene, Sketch, SketchAction, Vertex,
    WordfieldConfig, SKETCH_NAMES,
};

/// Material code bits returned by [`WebSketch::instance_materials`]
pub const MATERIAL_NORMAL: u8 = 0;
pub const MATERIAL_STANDARD: u8 = 1;
pub const MATERIAL_BASIC: u8 = 2;
pub const MATERIAL_WIREFRAME: u8 = 4;

#[wasm_bindgen]
pub struct WebSketch {
    sketch: Box<dyn Sketch>,
    scene: Scene,
    controls: OrbitControls,
    last_elapsed: f32,
}

#[wasm_bindgen]
impl WebSketch {
    /// Create a sketch by name. Invalid config text falls back to the
    /// defaults with a console warning.
    #[wasm_bindgen(constructor)]
    pub fn new(
        name: &str,
        config_toml: Option<String>,
        seed: Option<u64>,
    ) -> Result<WebSketch, JsValue> {
        let mut config = match config_toml.as_deref() {
            Some(text) => WordfieldConfig::from_toml_str(text).unwrap_or_else(|e| {
                web_sys::console::warn_1(&JsValue::from_str(&format!(
                    "wordfield: invalid config, using defaults: {e}"
                )));
                WordfieldConfig::default()
            }),
            None => WordfieldConfig::default(),
        };
        if seed.is_some() {
            config.seed = seed;
        }

        Self::from_config(name, &config).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn name(&self) -> String {
        self.sketch.name().to_string()
    }

    pub fn status(&self) -> String {
        self.sketch.status()
    }

    /// Move the term field to its next stage
    pub fn advance(&mut self) -> bool {
        self.sketch.apply(&mut self.scene, SketchAction::Advance)
    }

    /// Apply a named command such as `term-1`, `change-3` or `speed+`
    pub fn apply(&mut self, command: &str) -> Result<bool, JsValue> {
        self.apply_command(command)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Advance the animation to `elapsed` seconds. Pending orbit motion is
    /// applied first, so a sketch that places the camera keeps it.
    pub fn tick(&mut self, elapsed: f32) {
        if self.sketch.orbit_enabled() {
            self.controls.update(&mut self.scene.camera);
        }

        let time = FrameTime {
            elapsed,
            delta: (elapsed - self.last_elapsed).max(0.0),
        };
        self.last_elapsed = elapsed;
        self.sketch.tick(&mut self.scene, time);
    }

    /// Queue an orbit step in radians
    pub fn orbit(&mut self, left: f32, up: f32) {
        if self.sketch.orbit_enabled() {
            self.controls.rotate_left(left);
            self.controls.rotate_up(up);
        }
    }

    /// Queue a pan of the orbit target in the screen plane
    pub fn pan(&mut self, right: f32, up: f32) {
        if self.sketch.orbit_enabled() {
            self.controls.pan(right, up, &self.scene.camera);
        }
    }

    pub fn zoom(&mut self, zoom_in: bool) {
        if !self.sketch.orbit_enabled() {
            return;
        }
        if zoom_in {
            self.controls.dolly_in();
        } else {
            self.controls.dolly_out();
        }
    }

    pub fn mesh_count(&self) -> usize {
        self.scene.visible_meshes().len()
    }

    /// World matrices of the visible meshes, 16 floats each
    pub fn instance_matrices(&self) -> Vec<f32> {
        self.scene
            .visible_meshes()
            .iter()
            .flat_map(|mesh| mesh.world.as_slice().to_vec())
            .collect()
    }

    /// RGB per visible mesh; normal-shaded meshes report white
    pub fn instance_colors(&self) -> Vec<f32> {
        self.scene
            .visible_meshes()
            .iter()
            .flat_map(|mesh| {
                let color = match *mesh.material {
                    Material::Standard { color } | Material::Basic { color, .. } => color,
                    Material::Normal { .. } => wordfield_core::Color::WHITE,
                };
                [color.r, color.g, color.b]
            })
            .collect()
    }

    /// Material code per visible mesh
    pub fn instance_materials(&self) -> Vec<u8> {
        self.scene
            .visible_meshes()
            .iter()
            .map(|mesh| material_code(mesh.material))
            .collect()
    }

    /// Triangle positions of the visible mesh at `index`, 9 floats per face
    pub fn mesh_positions(&self, index: usize) -> Vec<f32> {
        self.vertex_attribute(index, |v| [v.position.x, v.position.y, v.position.z])
    }

    /// Vertex normals matching [`WebSketch::mesh_positions`], for smooth
    /// shading in the browser
    pub fn mesh_normals(&self, index: usize) -> Vec<f32> {
        self.vertex_attribute(index, |v| [v.normal.x, v.normal.y, v.normal.z])
    }

    /// Camera view-projection for the given canvas aspect ratio
    pub fn view_projection(&mut self, aspect: f32) -> Vec<f32> {
        self.scene.camera.set_aspect(aspect);
        self.scene.camera.view_projection().as_slice().to_vec()
    }

    /// Clear color, or `None` for a transparent canvas
    pub fn background(&self) -> Option<Vec<f32>> {
        self.scene.background.map(|c| vec![c.r, c.g, c.b])
    }
}

impl WebSketch {
    fn from_config(name: &str, config: &WordfieldConfig) -> wordfield_core::Result<Self> {
        let mut sketch = create(name, config)?;
        let scene = sketch.build();

        let mut controls = OrbitControls::new(scene.camera.target);
        controls.enable_damping = config.controls.enable_damping;
        controls.damping_factor = config.controls.damping;

        Ok(Self {
            sketch,
            scene,
            controls,
            last_elapsed: 0.0,
        })
    }

    fn vertex_attribute(&self, index: usize, attribute: impl Fn(&Vertex) -> [f32; 3]) -> Vec<f32> {
        self.scene
            .visible_meshes()
            .get(index)
            .map(|mesh| {
                mesh.geometry
                    .triangles
                    .iter()
                    .flat_map(|t| t.vertices.iter())
                    .flat_map(&attribute)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn apply_command(&mut self, command: &str) -> wordfield_core::Result<bool> {
        let action: SketchAction = command.parse()?;
        Ok(self.sketch.apply(&mut self.scene, action))
    }
}

fn material_code(material: &Material) -> u8 {
    let kind = match material {
        Material::Normal { .. } => MATERIAL_NORMAL,
        Material::Standard { .. } => MATERIAL_STANDARD,
        Material::Basic { .. } => MATERIAL_BASIC,
    };
    if material.wireframe() {
        kind | MATERIAL_WIREFRAME
    } else {
        kind
    }
}

/// Comma-separated sketch names
#[wasm_bindgen]
pub fn sketch_names() -> String {
    SKETCH_NAMES.join(",")
}
