#[cfg(target_arch = "wasm32")]
fn main() {
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("rig_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use ribbon_rig::graph::node::NetworkKind;
    use ribbon_rig::params::{Axis, RigParameters, RigParametersBuilder};
    use ribbon_rig::scene::{PreconditionError, RecordingScene, SceneCall};
    use ribbon_rig::{build_curve, build_rig};
    use serde::Serialize;
    use std::fs::File;
    use std::io::{self, BufWriter, Write};
    use std::path::PathBuf;

    const USAGE: &str = r#"rig_cli (ribbon-rig)

USAGE:
  rig_cli curve   [options]
  rig_cli plan    [options]
  rig_cli realize [options]
  rig_cli stats   [options]

COMMANDS:
  curve      Print the curve-only plan (driving curve, offset copy, loft) as JSON
  plan       Print the full rig plan as JSON
  realize    Run the plan against an in-memory scene and print the call log
  stats      Print node and wire counts per effect network

OPTIONS:
  --joints <n>            Joint count (default 18)
  --length <len>          Tentacle length (default 500)
  --axes <p,s,r>          Primary, secondary and roll axis (default y,z,x)
  --model <name>          Model name used in every node name
  --mesh <name>           Target mesh for the model skin binding
  --no-auto-measure       Use the full length as joint spacing
  --with-mesh             Register the target mesh in the scene (realize only)
  --out <path>            Write JSON to this file instead of stdout
  -h, --help              Show this help
"#;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Command {
        Curve,
        Plan,
        Realize,
        Stats,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct RealizeReport<'a> {
        calls: &'a [SceneCall],
        skipped: &'a [PreconditionError],
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct NetworkReport {
        network: &'static str,
        nodes: usize,
        wires: usize,
    }

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        let command = match command.as_str() {
            "curve" => Command::Curve,
            "plan" => Command::Plan,
            "realize" => Command::Realize,
            "stats" => Command::Stats,
            "-h" | "--help" | "help" => {
                print_usage();
                return Ok(());
            }
            other => return Err(format!("unknown command `{other}`\n\n{USAGE}")),
        };

        let mut builder = RigParameters::builder();
        let mut with_mesh = false;
        let mut out: Option<PathBuf> = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--joints" => {
                    let value = args.value("--joints")?;
                    let count = value
                        .parse::<usize>()
                        .map_err(|e| format!("invalid --joints `{value}`: {e}"))?;
                    builder = builder.joint_count(count);
                }
                "--length" => {
                    let value = args.value("--length")?;
                    let length = value
                        .parse::<f64>()
                        .map_err(|e| format!("invalid --length `{value}`: {e}"))?;
                    builder = builder.tentacle_length(length);
                }
                "--axes" => builder = parse_axes(builder, &args.value("--axes")?)?,
                "--model" => builder = builder.model_name(args.value("--model")?),
                "--mesh" => builder = builder.target_mesh(args.value("--mesh")?),
                "--no-auto-measure" => builder = builder.auto_measure_length(false),
                "--with-mesh" => with_mesh = true,
                "--out" => out = Some(PathBuf::from(args.value("--out")?)),
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let parameters = builder.build().map_err(|e| e.to_string())?;

        match command {
            Command::Curve => {
                let curve = build_curve(&parameters).map_err(|e| e.to_string())?;
                write_json(&curve, out.as_ref())
            }
            Command::Plan => {
                let rig = build_rig(&parameters).map_err(|e| e.to_string())?;
                write_json(&rig, out.as_ref())
            }
            Command::Realize => {
                let rig = build_rig(&parameters).map_err(|e| e.to_string())?;
                let mut scene = RecordingScene::new();
                if with_mesh {
                    scene.register_mesh(parameters.target_mesh.clone());
                }
                let realization = rig.realize(&mut scene).map_err(|e| e.to_string())?;
                for skipped in &realization.skipped {
                    eprintln!("warning: {skipped}");
                }
                let report = RealizeReport {
                    calls: scene.calls(),
                    skipped: &realization.skipped,
                };
                write_json(&report, out.as_ref())
            }
            Command::Stats => {
                let rig = build_rig(&parameters).map_err(|e| e.to_string())?;
                let report: Vec<NetworkReport> = NetworkKind::ALL
                    .iter()
                    .map(|network| {
                        let stats = rig.network_stats(*network);
                        NetworkReport {
                            network: network.label(),
                            nodes: stats.nodes,
                            wires: stats.wires,
                        }
                    })
                    .collect();
                write_json(&report, out.as_ref())
            }
        }
    }

    fn parse_axes(builder: RigParametersBuilder, value: &str) -> Result<RigParametersBuilder, String> {
        let axes = value
            .split(',')
            .map(|axis| axis.parse::<Axis>().map_err(|e| e.to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        match axes.as_slice() {
            [primary, secondary, roll] => Ok(builder.axes(*primary, *secondary, *roll)),
            _ => Err(format!("--axes expects three comma-separated axes, got `{value}`")),
        }
    }

    fn write_json<T: Serialize>(value: &T, out: Option<&PathBuf>) -> Result<(), String> {
        match out {
            Some(path) => {
                let file = File::create(path)
                    .map_err(|e| format!("create {}: {e}", path.display()))?;
                let mut writer = BufWriter::new(file);
                serde_json::to_writer_pretty(&mut writer, value)
                    .map_err(|e| format!("write json: {e}"))?;
                writer.flush().map_err(|e| format!("flush: {e}"))
            }
            None => {
                let stdout = io::stdout();
                let mut writer = stdout.lock();
                serde_json::to_writer_pretty(&mut writer, value)
                    .map_err(|e| format!("write json: {e}"))?;
                writeln!(writer).map_err(|e| format!("write stdout: {e}"))
            }
        }
    }

    fn print_usage() {
        println!("{USAGE}");
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
}
