use ring_engine::RingEngine;
use ring_engine::controls::{ParameterKind, SliderSpec};
use ring_engine::geom::{ShapeParameters, generate_ring};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn engine_starts_with_default_ring() {
    let engine = RingEngine::new();
    assert_eq!(engine.parameters(), ShapeParameters::default());
    assert_eq!(engine.vertex_buffer().len(), 30 * 7 * 18);
    assert_eq!(engine.vertex_count(), 30 * 7 * 6);
    assert_eq!(engine.revision(), 1);
}

#[test]
fn slider_updates_require_existing_identifier() {
    let mut engine = RingEngine::new();

    engine
        .set_slider_value("Depth", 3.0)
        .expect("valid slider name");
    assert!(engine.set_slider_value("onbekend", 1.0).is_err());
    assert!(engine.set_slider_value("", 1.0).is_err());
}

#[test]
fn slider_values_are_clamped_and_quantized() {
    let mut engine = RingEngine::new();

    engine.set_slider_value("radialSubdivisions", 1.0).unwrap();
    assert_eq!(engine.parameters().radial_subdivisions, 3);

    engine.set_slider_value("radialSubdivisions", 1000.0).unwrap();
    assert_eq!(engine.parameters().radial_subdivisions, 128);

    engine.set_slider_value("depth", 2.04).unwrap();
    assert!((engine.parameters().depth - 2.0).abs() < 1e-9);

    engine.set_slider_value("thickness", -3.0).unwrap();
    assert_eq!(engine.parameters().thickness, 0.0);
}

#[test]
fn rejected_input_keeps_previous_state() {
    let mut engine = RingEngine::new();
    engine.set_slider_value("numSamples", 8.0).unwrap();

    let params = engine.parameters();
    let buffer = engine.vertex_buffer();
    let revision = engine.revision();

    assert!(engine.set_slider_value("depth", f64::NAN).is_err());
    assert!(engine.set_slider_value("depth", f64::INFINITY).is_err());
    assert!(engine.set_slider_value("twist", 0.5).is_err());

    let invalid = ShapeParameters {
        radial_subdivisions: 1,
        ..params
    };
    assert!(engine.replace_parameters(invalid).is_err());

    for oversized in [
        ShapeParameters {
            num_samples: usize::MAX,
            ..params
        },
        ShapeParameters {
            radial_subdivisions: usize::MAX / 8,
            ..params
        },
    ] {
        assert!(engine.replace_parameters(oversized).is_err());
    }

    assert_eq!(engine.parameters(), params);
    assert_eq!(engine.vertex_buffer(), buffer);
    assert_eq!(engine.revision(), revision);
}

#[test]
fn widened_slider_can_reach_invalid_values_and_is_rejected() {
    let mut engine = RingEngine::new();
    engine.set_slider_spec(ParameterKind::RadialSubdivisions, SliderSpec::new(0.0, 10.0, 1.0));

    let err = engine.apply_slider("radialSubdivisions", 1.0).unwrap_err();
    assert!(err.to_string().contains("radialSubdivisions"));
    assert_eq!(engine.parameters().radial_subdivisions, 30);
}

#[test]
fn revision_increments_on_every_regeneration() {
    let mut engine = RingEngine::new();
    let start = engine.revision();

    engine.set_slider_value("innerRadius", 1.5).unwrap();
    engine.set_slider_value("innerRadius", 1.5).unwrap();
    engine.set_slider_value("curvature", -0.3).unwrap();

    assert_eq!(engine.revision(), start + 3);
}

#[test]
fn last_write_wins() {
    let mut engine = RingEngine::new();
    engine.set_slider_value("numSamples", 2.0).unwrap();
    engine.set_slider_value("numSamples", 11.0).unwrap();

    let expected = generate_ring(&engine.parameters()).unwrap().to_f32_vec();
    assert_eq!(engine.parameters().num_samples, 11);
    assert_eq!(engine.vertex_buffer(), expected);
}

#[test]
fn rotation_survives_regeneration() {
    let mut engine = RingEngine::new();
    for _ in 0..25 {
        engine.tick();
    }
    let rotation_y = engine.rotation_y();
    assert!((rotation_y - 0.25).abs() < 1e-12);
    assert!((engine.rotation_x() + std::f64::consts::PI / 16.0).abs() < 1e-15);

    engine.set_slider_value("thickness", 1.0).unwrap();
    assert_eq!(engine.rotation_y(), rotation_y);

    engine.tick();
    assert!((engine.rotation_y() - 0.26).abs() < 1e-12);
}

#[test]
fn flat_single_sample_ring_lies_on_unit_cylinder() {
    let params = ShapeParameters {
        radial_subdivisions: 4,
        depth: 2.0,
        num_samples: 1,
        inner_radius: 1.0,
        thickness: 0.0,
        curvature_magnitude: 0.0,
    };
    let engine = RingEngine::with_parameters(params).expect("valid parameters");
    let buffer = engine.vertex_buffer();

    assert_eq!(buffer.len(), 4 * 3 * 18);
    for v in buffer.chunks_exact(3) {
        let radius = (v[0] * v[0] + v[1] * v[1]).sqrt();
        assert!((radius - 1.0).abs() < 1e-6);
        assert!(v[2].abs() <= 1.0);
    }
}

#[test]
fn single_subdivision_is_rejected() {
    let params = ShapeParameters {
        radial_subdivisions: 1,
        ..ShapeParameters::default()
    };
    let err = RingEngine::with_parameters(params).unwrap_err();
    assert!(err.to_string().contains("radialSubdivisions"));
}

#[test]
fn normal_buffer_is_aligned_with_positions() {
    let engine = RingEngine::new();
    let positions = engine.vertex_buffer();
    let normals = engine.normal_buffer();
    assert_eq!(positions.len(), normals.len());

    for n in normals.chunks_exact(3) {
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        assert!((len - 1.0).abs() < 1e-5);
    }
}

#[test]
fn slider_states_follow_updates() {
    let mut engine = RingEngine::new();
    engine.set_slider_value("samples", 12.0).unwrap();

    let states = engine.slider_states();
    let samples = states
        .iter()
        .find(|s| s.id == "numSamples")
        .expect("numSamples slider");
    assert_eq!(samples.value, 12.0);
    assert_eq!(samples.min, 0.0);
    assert_eq!(samples.max, 64.0);
}

#[test]
fn diagnostics_report_clean_default_ring() {
    let engine = RingEngine::new();
    let diagnostics = engine.diagnostics();
    assert!(diagnostics.is_clean(), "{diagnostics}");
    assert_eq!(diagnostics.triangle_count, 30 * 7 * 2);
}

#[test]
fn random_slider_sequences_keep_engine_consistent() {
    let mut rng = StdRng::seed_from_u64(0x0051_1de5);
    let mut engine = RingEngine::new();

    for _ in 0..200 {
        let kind = ParameterKind::ALL[rng.random_range(0..ParameterKind::ALL.len())];
        let value = rng.random_range(-10.0..200.0);
        engine.set_slider_value(kind.id(), value).unwrap();

        let spec = kind.default_slider();
        let applied = kind.value_of(&engine.parameters());
        assert!(applied >= spec.min - 1e-9 && applied <= spec.max + 1e-9);

        let params = engine.parameters();
        assert_eq!(
            engine.vertex_buffer().len(),
            params.radial_subdivisions * (params.num_samples + 2) * 18
        );
    }
}

#[test]
fn identical_parameters_give_bit_identical_buffers() {
    let mut a = RingEngine::new();
    let mut b = RingEngine::new();
    for engine in [&mut a, &mut b] {
        engine.set_slider_value("radialSubdivisions", 17.0).unwrap();
        engine.set_slider_value("curvatureMagnitude", 0.65).unwrap();
    }
    let same_bits = a
        .vertex_buffer()
        .iter()
        .zip(b.vertex_buffer().iter())
        .all(|(x, y)| x.to_bits() == y.to_bits());
    assert!(same_bits);
}
