//! This example starts the relay with a stand-in pipeline that copies the
//! downloaded model to `<name>_rigged.glb` instead of rigging it.
//!
//! Settings come from the environment (see `Settings::from_env`); point
//! `RIG_RELAY_UPLOAD_URL` at a backend you control before trying it.
//!
//! Usage:
//! `cargo run --example serve_stub`
//!
//! Then:
//! `curl -X POST localhost:8000/api/rig-from-url -H 'content-type: application/json' -d '{"url": "https://example.com/robot.glb"}'`

use rig_relay::{logging, start_server, RigOptions, RigOutputs, RigPipeline, Settings};

struct CopyPipeline;

impl RigPipeline for CopyPipeline {
    type Record = RigOutputs;

    fn run(&self, options: &RigOptions, record: &mut RigOutputs) -> anyhow::Result<()> {
        let stem = options
            .input_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model");
        let output = options.input_path.with_file_name(format!("{stem}_rigged.glb"));
        std::fs::copy(&options.input_path, &output)?;
        record.anim_vis_path = Some(output);
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    logging::init()?;

    let settings = Settings::from_env()?;
    println!("Serving on http://{}", settings.bind_addr());

    let handle = start_server(settings, CopyPipeline, RigOutputs::default)?;
    match handle.join() {
        Ok(result) => result?,
        Err(_) => anyhow::bail!("server thread panicked"),
    }
    Ok(())
}
