//! Slider-specificaties en waardeverwerking voor de zes ringparameters.

use serde::Serialize;
use thiserror::Error;

use crate::geom::ShapeParameters;

/// Fouten bij het verwerken van sliderinvoer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    /// Geen parameter gevonden voor de opgegeven id of naam.
    #[error("onbekende sliderreferentie `{0}`")]
    UnknownSlider(String),
    /// De waarde is NaN of oneindig.
    #[error("sliderwaarde voor `{id}` moet een eindig getal zijn")]
    NonFiniteValue { id: &'static str },
}

/// De parameters die via een slider instelbaar zijn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterKind {
    RadialSubdivisions,
    Depth,
    NumSamples,
    InnerRadius,
    Thickness,
    CurvatureMagnitude,
}

impl ParameterKind {
    /// Alle parameters in de volgorde waarin de UI ze toont.
    pub const ALL: [Self; 6] = [
        Self::RadialSubdivisions,
        Self::Depth,
        Self::NumSamples,
        Self::InnerRadius,
        Self::Thickness,
        Self::CurvatureMagnitude,
    ];

    /// Stabiele id, gelijk aan de veldnaam aan JavaScript-zijde.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::RadialSubdivisions => "radialSubdivisions",
            Self::Depth => "depth",
            Self::NumSamples => "numSamples",
            Self::InnerRadius => "innerRadius",
            Self::Thickness => "thickness",
            Self::CurvatureMagnitude => "curvatureMagnitude",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RadialSubdivisions => "Radial subdivisions",
            Self::Depth => "Depth",
            Self::NumSamples => "Samples",
            Self::InnerRadius => "Inner radius",
            Self::Thickness => "Thickness",
            Self::CurvatureMagnitude => "Curvature",
        }
    }

    /// Geeft `true` voor parameters die als geheel getal worden opgeslagen.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::RadialSubdivisions | Self::NumSamples)
    }

    /// Standaardbereik van de slider.
    #[must_use]
    pub const fn default_slider(self) -> SliderSpec {
        match self {
            Self::RadialSubdivisions => SliderSpec::new(3.0, 128.0, 1.0),
            Self::Depth => SliderSpec::new(0.1, 5.0, 0.1),
            Self::NumSamples => SliderSpec::new(0.0, 64.0, 1.0),
            Self::InnerRadius => SliderSpec::new(0.1, 5.0, 0.1),
            Self::Thickness => SliderSpec::new(0.0, 2.0, 0.05),
            Self::CurvatureMagnitude => SliderSpec::new(-1.0, 1.0, 0.05),
        }
    }

    /// Zoek een parameter op id of weergavenaam, zonder op hoofdletters of
    /// omringende witruimte te letten.
    #[must_use]
    pub fn find(id_or_name: &str) -> Option<Self> {
        let trimmed = id_or_name.trim();
        if trimmed.is_empty() {
            return None;
        }

        Self::ALL.into_iter().find(|kind| {
            kind.id().eq_ignore_ascii_case(trimmed) || kind.name().eq_ignore_ascii_case(trimmed)
        })
    }

    /// Huidige waarde van deze parameter in `params`.
    #[must_use]
    pub fn value_of(self, params: &ShapeParameters) -> f64 {
        match self {
            Self::RadialSubdivisions => params.radial_subdivisions as f64,
            Self::Depth => params.depth,
            Self::NumSamples => params.num_samples as f64,
            Self::InnerRadius => params.inner_radius,
            Self::Thickness => params.thickness,
            Self::CurvatureMagnitude => params.curvature_magnitude,
        }
    }
}

/// Bereik en stapgrootte van een slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SliderSpec {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderSpec {
    #[must_use]
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Begrens `value` tot `[min, max]` en rond af op `min + k * step`.
    pub fn resolve(&self, kind: ParameterKind, value: f64) -> Result<f64, ControlError> {
        if !value.is_finite() {
            return Err(ControlError::NonFiniteValue { id: kind.id() });
        }

        let mut clamped = clamp(value, self.min, self.max);
        if self.step > 0.0 {
            clamped = self.min + ((clamped - self.min) / self.step).round() * self.step;
            clamped = clamp(clamped, self.min, self.max);
        }

        Ok(clamped)
    }
}

/// Sliderbereiken voor alle parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderConfig {
    specs: [SliderSpec; 6],
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            specs: ParameterKind::ALL.map(ParameterKind::default_slider),
        }
    }
}

impl SliderConfig {
    #[must_use]
    pub fn spec(&self, kind: ParameterKind) -> SliderSpec {
        self.specs[index_of(kind)]
    }

    pub fn set_spec(&mut self, kind: ParameterKind, spec: SliderSpec) {
        self.specs[index_of(kind)] = spec;
    }

    /// Momentopname van alle sliders voor de UI.
    #[must_use]
    pub fn states(&self, params: &ShapeParameters) -> Vec<SliderState> {
        ParameterKind::ALL
            .into_iter()
            .map(|kind| {
                let spec = self.spec(kind);
                SliderState {
                    id: kind.id(),
                    name: kind.name(),
                    min: spec.min,
                    max: spec.max,
                    step: spec.step,
                    value: kind.value_of(params),
                }
            })
            .collect()
    }
}

/// Sliderbeschrijving zoals die naar JavaScript gaat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderState {
    pub id: &'static str,
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
}

impl ShapeParameters {
    /// Kopie met één veld vervangen. Gehele parameters worden afgerond en
    /// negatieve waarden daarvoor worden 0.
    #[must_use]
    pub fn with_value(self, kind: ParameterKind, value: f64) -> Self {
        let mut next = self;
        match kind {
            ParameterKind::RadialSubdivisions => next.radial_subdivisions = to_count(value),
            ParameterKind::Depth => next.depth = value,
            ParameterKind::NumSamples => next.num_samples = to_count(value),
            ParameterKind::InnerRadius => next.inner_radius = value,
            ParameterKind::Thickness => next.thickness = value,
            ParameterKind::CurvatureMagnitude => next.curvature_magnitude = value,
        }
        next
    }
}

fn index_of(kind: ParameterKind) -> usize {
    match kind {
        ParameterKind::RadialSubdivisions => 0,
        ParameterKind::Depth => 1,
        ParameterKind::NumSamples => 2,
        ParameterKind::InnerRadius => 3,
        ParameterKind::Thickness => 4,
        ParameterKind::CurvatureMagnitude => 5,
    }
}

fn to_count(value: f64) -> usize {
    // `as` saturates; NaN becomes 0
    value.round().max(0.0) as usize
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}
