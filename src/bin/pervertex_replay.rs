//! Replays a script of per-vertex commands against a scene file.
//!
//! Run with: cargo run --bin pervertex_replay -- scene.json script.json
//!
//! The script is a JSON array of steps:
//!   {"op": "select", "names": ["pCube1"]}
//!   {"op": "set", "plugName": "thicknessPerVertex", "vertexWeights": [0.1, 0.2]}
//!   {"op": "get", "plugName": "thicknessPerVertex"}
//!   {"op": "undo"} / {"op": "redo"}
//! and one JSON line is printed per step.

use std::path::PathBuf;
use std::process::ExitCode;

use serde::Deserialize;
use serde_json::{json, Value};

use ncloth_pervertex_lib::commands::per_vertex as commands;
use ncloth_pervertex_lib::models::per_vertex::{GetPerVertexArgs, SetPerVertexArgs};
use ncloth_pervertex_lib::scene::loader::load_scene_file;
use ncloth_pervertex_lib::PerVertexState;

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Step {
    Get(GetPerVertexArgs),
    Set(SetPerVertexArgs),
    Undo,
    Redo,
    Select { names: Vec<String> },
}

fn run_step(state: &PerVertexState, step: Step) -> Result<Value, String> {
    match step {
        Step::Get(args) => {
            commands::get_n_cloth_per_vertex(state, args.target, args.plug_name).map(|w| json!(w))
        }
        Step::Set(args) => commands::set_n_cloth_per_vertex(
            state,
            args.target,
            args.plug_name,
            args.vertex_weights,
        )
        .map(|_| Value::Null),
        Step::Undo => commands::undo(state).map(|done| json!(done)),
        Step::Redo => commands::redo(state).map(|done| json!(done)),
        Step::Select { names } => commands::select(state, names).map(|_| Value::Null),
    }
}

fn run(scene_path: PathBuf, script_path: PathBuf) -> Result<usize, String> {
    let scene = load_scene_file(&scene_path).map_err(|e| e.to_string())?;
    let state = ncloth_pervertex_lib::setup(scene)?;

    let script = std::fs::read_to_string(&script_path)
        .map_err(|e| format!("Failed to read {}: {}", script_path.display(), e))?;
    let steps: Vec<Step> = serde_json::from_str(&script)
        .map_err(|e| format!("Failed to parse {}: {}", script_path.display(), e))?;

    let mut failures = 0;
    for (index, step) in steps.into_iter().enumerate() {
        let line = match run_step(&state, step) {
            Ok(result) => json!({ "step": index, "ok": true, "result": result }),
            Err(error) => {
                failures += 1;
                json!({ "step": index, "ok": false, "error": error })
            }
        };
        println!("{}", line);
    }
    Ok(failures)
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [scene_path, script_path] = args.as_slice() else {
        eprintln!("usage: pervertex_replay <scene.json> <script.json>");
        return ExitCode::from(2);
    };

    match run(PathBuf::from(scene_path), PathBuf::from(script_path)) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failures) => {
            eprintln!("{} step(s) failed", failures);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(2)
        }
    }
}
