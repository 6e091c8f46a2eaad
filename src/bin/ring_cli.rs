#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("ring_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use ring_engine::controls::ParameterKind;
    use ring_engine::geom::{
        GeomMesh, ProfilePoint, RingMesh, RingMeshDiagnostics, ShapeParameters, Tolerance,
        build_profile, build_ring_mesh, diagnose_ring_mesh, weld_ring_mesh,
    };
    use std::fmt::Write as _;
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};

    const SNAPSHOT_QUANTIZE: f64 = 1e-6;
    const SNAPSHOT_DECIMALS: usize = 6;

    const USAGE: &str = r#"ring_cli (ring-engine)

USAGE:
  ring_cli list
  ring_cli run <scenario|all> [options]

SCENARIOS:
  default_ring
  single_sample
  coarse_ring
  flat_cylinder
  high_curvature
  negative_curvature

OPTIONS (run):
  --out-dir <dir>      Write <scenario>.obj and/or <scenario>.snap to this dir (required for `all`)
  --obj <path>         Write OBJ (single scenario only)
  --snap <path>        Write golden-style snapshot (single scenario only)
  --no-obj             Skip OBJ when using --out-dir
  --no-snap            Skip snapshot when using --out-dir
  --overwrite          Overwrite existing output files
  --param <key=value>  Override a shape parameter (repeatable), e.g. --param depth=3
  -h, --help           Show this help
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => {
                print_scenarios();
                Ok(())
            }
            "run" => cmd_run(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn print_scenarios() {
        for scenario in Scenario::ALL {
            println!("{}", scenario.name());
        }
    }

    fn cmd_run(args: &mut Args) -> Result<(), String> {
        let scenario_name = args.next().ok_or("missing scenario name")?;

        let mut out_dir: Option<PathBuf> = None;
        let mut obj_path: Option<PathBuf> = None;
        let mut snap_path: Option<PathBuf> = None;
        let mut overwrite = false;
        let mut write_obj = true;
        let mut write_snap = true;
        let mut overrides: Vec<(ParameterKind, f64)> = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out-dir" => out_dir = Some(PathBuf::from(args.value("--out-dir")?)),
                "--obj" => obj_path = Some(PathBuf::from(args.value("--obj")?)),
                "--snap" => snap_path = Some(PathBuf::from(args.value("--snap")?)),
                "--param" => overrides.push(parse_override(&args.value("--param")?)?),
                "--overwrite" => overwrite = true,
                "--no-obj" => write_obj = false,
                "--no-snap" => write_snap = false,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        if let Some(dir) = out_dir.as_ref() {
            if obj_path.is_some() || snap_path.is_some() {
                return Err("use either --out-dir or --obj/--snap (not both)".to_string());
            }
            if !write_obj && !write_snap {
                return Err("nothing to write (both --no-obj and --no-snap set)".to_string());
            }

            fs::create_dir_all(dir).map_err(|e| format!("create out dir: {e}"))?;

            if scenario_name == "all" {
                for scenario in Scenario::ALL {
                    let output = run_scenario(*scenario, &overrides)?;
                    write_output_to_dir(&output, dir, write_obj, write_snap, overwrite)?;
                }
                return Ok(());
            }

            let scenario = Scenario::from_str(scenario_name.as_str())
                .ok_or_else(|| unknown_scenario(&scenario_name))?;
            let output = run_scenario(scenario, &overrides)?;
            return write_output_to_dir(&output, dir, write_obj, write_snap, overwrite);
        }

        if scenario_name == "all" {
            return Err("`run all` requires --out-dir".to_string());
        }

        let scenario =
            Scenario::from_str(scenario_name.as_str()).ok_or_else(|| unknown_scenario(&scenario_name))?;
        let output = run_scenario(scenario, &overrides)?;

        if let Some(path) = snap_path.as_deref() {
            write_text_file(path, &output.snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        } else {
            print!("{}", output.snapshot);
        }

        if let Some(path) = obj_path.as_deref() {
            write_obj_file(path, &output.indexed, output.name, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        print_summary(&output);
        Ok(())
    }

    fn write_output_to_dir(
        output: &ScenarioOutput,
        dir: &Path,
        write_obj: bool,
        write_snap: bool,
        overwrite: bool,
    ) -> Result<(), String> {
        if write_snap {
            let path = dir.join(format!("{}.snap", output.name));
            write_text_file(&path, &output.snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        if write_obj {
            let path = dir.join(format!("{}.obj", output.name));
            write_obj_file(&path, &output.indexed, output.name, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        print_summary(output);
        Ok(())
    }

    fn print_summary(output: &ScenarioOutput) {
        let extent = output.mesh.bounds().map_or_else(
            || "-".to_string(),
            |b| {
                let size = b.size();
                format!("{:.3}x{:.3}x{:.3}", size.x, size.y, size.z)
            },
        );
        eprintln!(
            "{}: floats={} triangles={} extent={extent} | {}",
            output.name,
            output.mesh.len(),
            output.mesh.triangle_count(),
            output.diagnostics.summary()
        );
    }

    fn parse_override(text: &str) -> Result<(ParameterKind, f64), String> {
        let (key, value) = text
            .split_once('=')
            .ok_or_else(|| format!("expected key=value for --param, got `{text}`"))?;
        let kind = ParameterKind::find(key).ok_or_else(|| format!("unknown parameter `{key}`"))?;
        let value: f64 = value
            .trim()
            .parse()
            .map_err(|e| format!("invalid value for `{key}`: {e}"))?;
        Ok((kind, value))
    }

    fn unknown_scenario(name: &str) -> String {
        let mut msg = format!("unknown scenario `{name}`\n\navailable scenarios:\n");
        for scenario in Scenario::ALL {
            let _ = writeln!(msg, "  {}", scenario.name());
        }
        msg
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        fs::write(path, normalize_snapshot_text(text)).map_err(|e| format!("write {}: {e}", path.display()))
    }

    fn write_obj_file(path: &Path, mesh: &GeomMesh, name: &str, overwrite: bool) -> Result<(), String> {
        mesh.validate().map_err(|e| format!("mesh validation failed: {e}"))?;

        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }

        let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
        let mut w = BufWriter::new(file);

        writeln!(w, "# ring-engine ring_cli").map_err(|e| format!("write obj: {e}"))?;
        writeln!(w, "o {name}").map_err(|e| format!("write obj: {e}"))?;

        for p in mesh.positions.iter().copied() {
            writeln!(w, "v {} {} {}", p[0], p[1], p[2]).map_err(|e| format!("write obj: {e}"))?;
        }

        if let Some(normals) = mesh.normals.as_ref() {
            for n in normals.iter().copied() {
                writeln!(w, "vn {} {} {}", n[0], n[1], n[2]).map_err(|e| format!("write obj: {e}"))?;
            }
        }

        let has_normals = mesh.normals.is_some();
        for tri in mesh.indices.chunks_exact(3) {
            let a = tri[0] + 1;
            let b = tri[1] + 1;
            let c = tri[2] + 1;

            if has_normals {
                writeln!(w, "f {a}//{a} {b}//{b} {c}//{c}")
            } else {
                writeln!(w, "f {a} {b} {c}")
            }
            .map_err(|e| format!("write obj: {e}"))?;
        }

        w.flush().map_err(|e| format!("flush {}: {e}", path.display()))
    }

    fn normalize_snapshot_text(text: &str) -> String {
        let normalized = text.replace("\r\n", "\n");
        if normalized.ends_with('\n') {
            normalized
        } else {
            format!("{normalized}\n")
        }
    }

    fn quantize_f64(value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let value = if value == -0.0 { 0.0 } else { value };
        let q = (value / SNAPSHOT_QUANTIZE).round() * SNAPSHOT_QUANTIZE;
        if q == -0.0 { 0.0 } else { q }
    }

    fn write_f64(out: &mut String, value: f64) {
        let value = quantize_f64(value);
        let _ = write!(out, "{value:.SNAPSHOT_DECIMALS$}");
    }

    fn write_f64_line(out: &mut String, key: &str, value: f64) {
        let _ = write!(out, "{key} ");
        write_f64(out, value);
        out.push('\n');
    }

    fn write_parameters(out: &mut String, params: &ShapeParameters) {
        let _ = writeln!(out, "params.radial_subdivisions {}", params.radial_subdivisions);
        write_f64_line(out, "params.depth", params.depth);
        let _ = writeln!(out, "params.num_samples {}", params.num_samples);
        write_f64_line(out, "params.inner_radius", params.inner_radius);
        write_f64_line(out, "params.thickness", params.thickness);
        write_f64_line(out, "params.curvature_magnitude", params.curvature_magnitude);
    }

    fn write_profile(out: &mut String, profile: &[ProfilePoint]) {
        let _ = writeln!(out, "profile.count {}", profile.len());
        for point in profile {
            out.push_str("pp ");
            write_f64(out, point.axial);
            out.push(' ');
            write_f64(out, point.radial);
            out.push('\n');
        }
    }

    fn write_ring_diagnostics(out: &mut String, diag: &RingMeshDiagnostics) {
        let _ = writeln!(out, "ring_diag.vertex_count {}", diag.vertex_count);
        let _ = writeln!(out, "ring_diag.triangle_count {}", diag.triangle_count);
        let _ = writeln!(out, "ring_diag.welded_vertex_count {}", diag.welded_vertex_count);
        let _ = writeln!(
            out,
            "ring_diag.degenerate_triangle_count {}",
            diag.degenerate_triangle_count
        );
        let _ = writeln!(out, "ring_diag.open_edge_count {}", diag.open_edge_count);
        let _ = writeln!(
            out,
            "ring_diag.non_manifold_edge_count {}",
            diag.non_manifold_edge_count
        );
        write_f64_line(out, "ring_diag.signed_volume", diag.signed_volume);
        match diag.seam_gap {
            Some(gap) => write_f64_line(out, "ring_diag.seam_gap", gap),
            None => {
                let _ = writeln!(out, "ring_diag.seam_gap none");
            }
        }
        let _ = writeln!(out, "ring_diag.warning_count {}", diag.warnings.len());
        for (idx, warning) in diag.warnings.iter().enumerate() {
            let _ = writeln!(out, "ring_diag.warning.{idx} {warning}");
        }
    }

    fn write_ring(out: &mut String, mesh: &RingMesh) {
        let _ = writeln!(out, "ring.float_count {}", mesh.len());
        let _ = writeln!(out, "ring.triangle_count {}", mesh.triangle_count());
        for v in mesh.vertices() {
            out.push_str("v ");
            write_f64(out, v.x);
            out.push(' ');
            write_f64(out, v.y);
            out.push(' ');
            write_f64(out, v.z);
            out.push('\n');
        }
    }

    fn snapshot(op: &str, sections: impl FnOnce(&mut String)) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# ring-engine golden v1");
        let _ = writeln!(out, "op {op}");
        let _ = writeln!(out, "quantize {SNAPSHOT_QUANTIZE:.1e}");
        sections(&mut out);
        normalize_snapshot_text(&out)
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Scenario {
        DefaultRing,
        SingleSample,
        CoarseRing,
        FlatCylinder,
        HighCurvature,
        NegativeCurvature,
    }

    impl Scenario {
        const ALL: &'static [Scenario] = &[
            Scenario::DefaultRing,
            Scenario::SingleSample,
            Scenario::CoarseRing,
            Scenario::FlatCylinder,
            Scenario::HighCurvature,
            Scenario::NegativeCurvature,
        ];

        fn name(self) -> &'static str {
            match self {
                Scenario::DefaultRing => "default_ring",
                Scenario::SingleSample => "single_sample",
                Scenario::CoarseRing => "coarse_ring",
                Scenario::FlatCylinder => "flat_cylinder",
                Scenario::HighCurvature => "high_curvature",
                Scenario::NegativeCurvature => "negative_curvature",
            }
        }

        fn from_str(name: &str) -> Option<Self> {
            Self::ALL.iter().copied().find(|scenario| scenario.name() == name)
        }

        fn parameters(self) -> ShapeParameters {
            let base = ShapeParameters::default();
            match self {
                Scenario::DefaultRing => base,
                Scenario::SingleSample => ShapeParameters {
                    radial_subdivisions: 4,
                    depth: 2.0,
                    num_samples: 1,
                    inner_radius: 1.0,
                    thickness: 0.0,
                    curvature_magnitude: 0.0,
                },
                Scenario::CoarseRing => ShapeParameters {
                    radial_subdivisions: 6,
                    depth: 1.0,
                    num_samples: 3,
                    inner_radius: 1.0,
                    thickness: 0.5,
                    curvature_magnitude: 0.25,
                },
                Scenario::FlatCylinder => ShapeParameters {
                    thickness: 0.0,
                    curvature_magnitude: 0.0,
                    ..base
                },
                Scenario::HighCurvature => ShapeParameters {
                    num_samples: 16,
                    curvature_magnitude: 1.0,
                    ..base
                },
                Scenario::NegativeCurvature => ShapeParameters {
                    thickness: 0.6,
                    curvature_magnitude: -0.5,
                    ..base
                },
            }
        }
    }

    struct ScenarioOutput {
        name: &'static str,
        mesh: RingMesh,
        indexed: GeomMesh,
        diagnostics: RingMeshDiagnostics,
        snapshot: String,
    }

    fn run_scenario(
        scenario: Scenario,
        overrides: &[(ParameterKind, f64)],
    ) -> Result<ScenarioOutput, String> {
        let params = overrides
            .iter()
            .fold(scenario.parameters(), |params, (kind, value)| params.with_value(*kind, *value));

        let profile = build_profile(&params).map_err(|e| e.to_string())?;
        let mesh = build_ring_mesh(&profile, params.radial_subdivisions).map_err(|e| e.to_string())?;
        let diagnostics = diagnose_ring_mesh(&mesh, Tolerance::WELD);
        let (indexed, _) = weld_ring_mesh(&mesh, Tolerance::WELD);

        let snap = snapshot(scenario.name(), |out| {
            write_parameters(out, &params);
            write_profile(out, &profile);
            write_ring_diagnostics(out, &diagnostics);
            write_ring(out, &mesh);
        });

        Ok(ScenarioOutput {
            name: scenario.name(),
            mesh,
            indexed: indexed.with_smooth_normals(),
            diagnostics,
            snapshot: snap,
        })
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn scratch_dir(tag: &str) -> PathBuf {
            let dir = std::env::temp_dir().join(format!("ring_cli_{}_{tag}", std::process::id()));
            let _ = fs::remove_dir_all(&dir);
            fs::create_dir_all(&dir).expect("create scratch dir");
            dir
        }

        #[test]
        fn parse_override_accepts_ids_and_names() {
            assert_eq!(parse_override("depth=3").unwrap(), (ParameterKind::Depth, 3.0));
            assert_eq!(
                parse_override(" Samples = 12 ").unwrap(),
                (ParameterKind::NumSamples, 12.0)
            );
            assert_eq!(
                parse_override("curvatureMagnitude=-0.5").unwrap(),
                (ParameterKind::CurvatureMagnitude, -0.5)
            );
        }

        #[test]
        fn parse_override_rejects_malformed_input() {
            assert!(parse_override("depth").unwrap_err().contains("key=value"));
            assert!(parse_override("twist=1").unwrap_err().contains("unknown parameter"));
            assert!(parse_override("depth=abc").unwrap_err().contains("invalid value"));
            assert!(parse_override("depth=").is_err());
        }

        #[test]
        fn scenario_names_round_trip() {
            for scenario in Scenario::ALL {
                assert_eq!(Scenario::from_str(scenario.name()), Some(*scenario));
            }
            assert_eq!(Scenario::from_str("Default_Ring"), None);

            let msg = unknown_scenario("nope");
            assert!(msg.contains("`nope`"));
            assert!(Scenario::ALL.iter().all(|s| msg.contains(s.name())));
        }

        #[test]
        fn snapshots_match_golden_fixtures() {
            let fixtures = Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("tests")
                .join("fixtures")
                .join("ring");
            for scenario in Scenario::ALL {
                let output = run_scenario(*scenario, &[]).expect("scenario should build");
                let path = fixtures.join(format!("{}.snap", scenario.name()));
                let expected = fs::read_to_string(&path).expect("fixture should exist");
                assert_eq!(
                    output.snapshot,
                    normalize_snapshot_text(&expected),
                    "snapshot drift for `{}`",
                    scenario.name()
                );
            }
        }

        #[test]
        fn overrides_change_the_generated_ring() {
            let output =
                run_scenario(Scenario::CoarseRing, &[(ParameterKind::NumSamples, 4.0)]).unwrap();
            assert_eq!(output.mesh.len(), 6 * 6 * 18);
            assert!(output.snapshot.contains("params.num_samples 4\n"));

            let err = run_scenario(Scenario::CoarseRing, &[(ParameterKind::RadialSubdivisions, 1.0)])
                .err()
                .expect("one subdivision is invalid");
            assert!(err.contains("radialSubdivisions"));
        }

        #[test]
        fn obj_faces_use_one_based_indices_in_range() {
            let dir = scratch_dir("obj");
            let output = run_scenario(Scenario::CoarseRing, &[]).unwrap();
            let path = dir.join("coarse_ring.obj");
            write_obj_file(&path, &output.indexed, output.name, false).unwrap();

            let text = fs::read_to_string(&path).unwrap();
            let vertex_count = text.lines().filter(|l| l.starts_with("v ")).count();
            let normal_count = text.lines().filter(|l| l.starts_with("vn ")).count();
            assert_eq!(vertex_count, output.indexed.vertex_count());
            assert_eq!(normal_count, vertex_count);

            let faces: Vec<&str> = text.lines().filter(|l| l.starts_with("f ")).collect();
            assert_eq!(faces.len(), output.mesh.triangle_count());
            for face in faces {
                for corner in face.split_whitespace().skip(1) {
                    let (v, n) = corner.split_once("//").expect("v//vn corner");
                    assert_eq!(v, n);
                    let index: usize = v.parse().unwrap();
                    assert!((1..=vertex_count).contains(&index));
                }
            }

            let _ = fs::remove_dir_all(&dir);
        }

        #[test]
        fn existing_files_require_overwrite() {
            let dir = scratch_dir("overwrite");
            let output = run_scenario(Scenario::SingleSample, &[]).unwrap();
            let snap = dir.join("single_sample.snap");
            let obj = dir.join("single_sample.obj");

            write_text_file(&snap, "old", false).unwrap();
            let err = write_text_file(&snap, &output.snapshot, false).unwrap_err();
            assert!(err.contains("--overwrite"));
            assert_eq!(fs::read_to_string(&snap).unwrap(), "old\n");

            write_obj_file(&obj, &output.indexed, output.name, false).unwrap();
            assert!(write_obj_file(&obj, &output.indexed, output.name, false).is_err());

            write_text_file(&snap, &output.snapshot, true).unwrap();
            assert_eq!(fs::read_to_string(&snap).unwrap(), output.snapshot);

            let _ = fs::remove_dir_all(&dir);
        }

        #[test]
        fn out_dir_receives_every_scenario() {
            let dir = scratch_dir("all");
            for scenario in Scenario::ALL {
                let output = run_scenario(*scenario, &[]).unwrap();
                write_output_to_dir(&output, &dir, true, true, false).unwrap();
            }
            for scenario in Scenario::ALL {
                assert!(dir.join(format!("{}.snap", scenario.name())).is_file());
                assert!(dir.join(format!("{}.obj", scenario.name())).is_file());
            }

            let again = run_scenario(Scenario::DefaultRing, &[]).unwrap();
            assert!(write_output_to_dir(&again, &dir, false, true, false).is_err());
            write_output_to_dir(&again, &dir, false, true, true).unwrap();

            let _ = fs::remove_dir_all(&dir);
        }

        #[test]
        fn args_report_missing_values() {
            let mut args = Args::new(vec!["--out-dir".to_string()]);
            assert_eq!(args.next().as_deref(), Some("--out-dir"));
            assert!(args.value("--out-dir").unwrap_err().contains("--out-dir"));

            let mut args = Args::new(vec!["coarse_ring".to_string(), "--bogus".to_string()]);
            let err = cmd_run(&mut args).unwrap_err();
            assert!(err.contains("unknown option `--bogus`"));

            let mut args = Args::new(vec!["all".to_string()]);
            assert!(cmd_run(&mut args).unwrap_err().contains("requires --out-dir"));
        }
    }
}
