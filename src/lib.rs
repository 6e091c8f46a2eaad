#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod controls;
pub mod display;
pub mod geom;

use std::fmt;

use controls::{ControlError, ParameterKind, SliderConfig, SliderSpec, SliderState};
use display::{DisplayState, SceneConfig};
use geom::{
    RingBuild, RingMesh, RingMeshDiagnostics, ShapeError, ShapeParameters, Tolerance, build_ring,
    diagnose_ring_mesh,
};
use thiserror::Error;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    // een tweede initialisatie laat de bestaande logger staan
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// Fouten die de engine naar de UI doorgeeft.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Control(#[from] ControlError),
    #[error("ongeldige ringparameters: {0}")]
    Shape(#[from] ShapeError),
}

/// Public entry point for consumers.
///
/// Houdt de huidige parameters en de laatst gegenereerde ring bij. Elke
/// geslaagde wijziging bouwt de ring volledig opnieuw op en verhoogt
/// [`RingEngine::revision`]; bij een fout blijft de vorige toestand staan.
#[wasm_bindgen]
pub struct RingEngine {
    params: ShapeParameters,
    sliders: SliderConfig,
    scene: SceneConfig,
    display: DisplayState,
    ring: RingBuild,
    revision: u64,
}

#[wasm_bindgen]
impl RingEngine {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> RingEngine {
        let params = ShapeParameters::default();
        let ring = build_ring(&params).unwrap_or_else(|err| {
            log::warn!("standaardring kon niet worden opgebouwd: {err}");
            RingBuild::default()
        });
        RingEngine::from_parts(params, ring)
    }

    /// Stel een sliderwaarde in op basis van id of naam.
    ///
    /// De waarde wordt begrensd en afgerond volgens de slider; de ring wordt
    /// direct opnieuw opgebouwd.
    #[wasm_bindgen]
    pub fn set_slider_value(&mut self, id_or_name: &str, value: f64) -> Result<(), JsValue> {
        self.apply_slider(id_or_name, value)
            .map(|_| ())
            .map_err(to_js_error)
    }

    /// Vervang alle parameters in één keer vanuit een JavaScript-object.
    /// Ontbrekende velden krijgen hun standaardwaarde.
    #[wasm_bindgen]
    pub fn set_parameters(&mut self, value: JsValue) -> Result<(), JsValue> {
        let params: ShapeParameters = serde_wasm_bindgen::from_value(value)
            .map_err(|err| js_error(&format!("ongeldig parameterobject: {err}")))?;
        self.replace_parameters(params).map_err(to_js_error)
    }

    /// Haal slider-specificaties op voor UI-generatie.
    #[wasm_bindgen]
    pub fn get_sliders(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.slider_states()).map_err(|err| JsError::new(&err.to_string()).into())
    }

    #[wasm_bindgen]
    pub fn get_parameters(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.params).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Camera-, licht- en materiaalinstellingen voor de host.
    #[wasm_bindgen]
    pub fn get_scene_config(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.scene).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Topologie- en oriëntatiecontrole van de huidige ring.
    #[wasm_bindgen]
    pub fn get_diagnostics(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.diagnostics()).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Posities als `Float32Array`, drie vertices per driehoek.
    #[wasm_bindgen]
    #[must_use]
    pub fn vertex_buffer(&self) -> Vec<f32> {
        self.ring.mesh.to_f32_vec()
    }

    /// Vlakke normalen, uitgelijnd met [`RingEngine::vertex_buffer`].
    #[wasm_bindgen]
    #[must_use]
    pub fn normal_buffer(&self) -> Vec<f32> {
        self.ring.normals.iter().map(|&v| v as f32).collect()
    }

    #[wasm_bindgen]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.ring.mesh.vertex_count()
    }

    /// Eén animatieframe.
    #[wasm_bindgen]
    pub fn tick(&mut self) {
        self.display.advance(&self.scene.animation);
    }

    #[wasm_bindgen]
    #[must_use]
    pub fn rotation_x(&self) -> f64 {
        self.display.rotation_x
    }

    #[wasm_bindgen]
    #[must_use]
    pub fn rotation_y(&self) -> f64 {
        self.display.rotation_y
    }

    /// Teller die bij elke geslaagde regeneratie met één ophoogt. De host
    /// uploadt alleen een nieuwe buffer wanneer deze verandert.
    #[wasm_bindgen]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl Default for RingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RingEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingEngine")
            .field("params", &self.params)
            .field("display", &self.display)
            .field("floats", &self.ring.mesh.len())
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl RingEngine {
    /// Engine met eigen beginparameters; faalt wanneer die ongeldig zijn.
    pub fn with_parameters(params: ShapeParameters) -> Result<Self, EngineError> {
        let ring = build_ring(&params)?;
        Ok(Self::from_parts(params, ring))
    }

    fn from_parts(params: ShapeParameters, ring: RingBuild) -> Self {
        Self {
            params,
            sliders: SliderConfig::default(),
            scene: SceneConfig::default(),
            display: DisplayState::default(),
            ring,
            revision: 1,
        }
    }

    #[must_use]
    pub fn parameters(&self) -> ShapeParameters {
        self.params
    }

    #[must_use]
    pub fn mesh(&self) -> &RingMesh {
        &self.ring.mesh
    }

    #[must_use]
    pub fn scene_config(&self) -> &SceneConfig {
        &self.scene
    }

    #[must_use]
    pub fn display_state(&self) -> DisplayState {
        self.display
    }

    #[must_use]
    pub fn slider_states(&self) -> Vec<SliderState> {
        self.sliders.states(&self.params)
    }

    /// Pas het bereik van één slider aan. De huidige waarde blijft staan.
    pub fn set_slider_spec(&mut self, kind: ParameterKind, spec: SliderSpec) {
        self.sliders.set_spec(kind, spec);
    }

    #[must_use]
    pub fn diagnostics(&self) -> RingMeshDiagnostics {
        let mut diagnostics = diagnose_ring_mesh(&self.ring.mesh, Tolerance::WELD);
        if let (Some(timing), Some(build)) =
            (diagnostics.timing.as_mut(), self.ring.timing.as_ref())
        {
            timing.merge(build);
        }
        for warning in &diagnostics.warnings {
            log::warn!("ring revisie {}: {warning}", self.revision);
        }
        diagnostics
    }

    /// Verwerk een sliderwaarde en geef de uiteindelijk toegepaste waarde terug.
    pub fn apply_slider(&mut self, id_or_name: &str, value: f64) -> Result<f64, EngineError> {
        let kind = ParameterKind::find(id_or_name)
            .ok_or_else(|| ControlError::UnknownSlider(id_or_name.trim().to_owned()))?;

        let resolved = self.sliders.spec(kind).resolve(kind, value).inspect_err(|err| {
            log::warn!("sliderwaarde geweigerd: {err}");
        })?;

        self.replace_parameters(self.params.with_value(kind, resolved))?;
        Ok(resolved)
    }

    /// Vervang alle parameters. Bij een fout blijven parameters en ring
    /// ongewijzigd.
    pub fn replace_parameters(&mut self, params: ShapeParameters) -> Result<(), EngineError> {
        let ring = build_ring(&params).inspect_err(|err| {
            log::warn!("ring niet opnieuw opgebouwd: {err}");
        })?;

        self.params = params;
        self.ring = ring;
        self.revision = self.revision.wrapping_add(1);

        log::debug!(
            "ring revisie {}: {} driehoeken",
            self.revision,
            self.ring.mesh.triangle_count()
        );
        debug_log!("ring opnieuw opgebouwd: {:?}", self.params);
        Ok(())
    }
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
