//! `driftfield` — renders flow-field advection animations to PNG frames.
//!
//! `render` composes a scene, bakes its flow map, and advects the image
//! for a full cycle, writing one PNG per frame. `bake` writes a single
//! PNG visualizing the baked flow directions instead of advecting.

use clap::{Args, Parser, Subcommand};
use driftfield_anim::scene::{compose, SceneParams};
use driftfield_anim::{run, Driver, FlowParams, FrameQueue, GenerationCycle, TickScheduler};
use driftfield_core::{Raster, Recipe, Srgb, Xorshift64};
use serde_json::json;
use std::path::PathBuf;
use std::process;

mod error;

use error::CliError;

#[derive(Parser)]
#[command(name = "driftfield", version, about = "Flow-field pixel advection renderer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a full generation cycle as numbered PNG frames.
    Render(RenderArgs),
    /// Write one PNG visualizing the baked flow directions.
    Bake(BakeArgs),
}

#[derive(Args)]
struct CanvasArgs {
    /// Canvas width in pixels.
    #[arg(long, default_value_t = 640)]
    width: usize,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 480)]
    height: usize,

    /// PRNG seed; the same seed replays the same run bit for bit.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Palette as comma-separated #rrggbb colors (first pick is eligible
    /// as background). Defaults to the built-in five-color palette.
    #[arg(long, value_delimiter = ',')]
    palette: Vec<String>,

    /// Extra parameters as a JSON object; flags below override its keys.
    #[arg(long)]
    params: Option<String>,

    /// Influence falloff constant.
    #[arg(long)]
    base_force: Option<f64>,

    /// Share of coherent noise mixed into the flow (0 disables).
    #[arg(long)]
    error_rate: Option<f64>,

    /// Pixels of displacement per frame.
    #[arg(long)]
    step_len: Option<f64>,

    /// Blend RGB in gamma-2 linear light during advection.
    #[arg(long)]
    linear: bool,
}

#[derive(Args)]
struct RenderArgs {
    #[command(flatten)]
    canvas: CanvasArgs,

    /// Fixed frame count; omit to let the driver pick 4..=25 at random.
    #[arg(long)]
    frames: Option<u32>,

    /// Directory for the output frames (created if missing).
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Frame filename prefix; frames land as <prefix>_0000.png onward.
    #[arg(long, default_value = "frame")]
    prefix: String,

    /// Print the replayable recipe as JSON on stdout.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct BakeArgs {
    #[command(flatten)]
    canvas: CanvasArgs,

    /// Output path for the flow visualization.
    #[arg(long, default_value = "flow.png")]
    output: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Render(args) => render(args),
        Command::Bake(args) => bake(args),
    };
    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(e.exit_code());
    }
}

/// Builds the replayable recipe from the canvas flags.
fn recipe_from(canvas: &CanvasArgs, frames: Option<u32>) -> Result<Recipe, CliError> {
    let mut params = match &canvas.params {
        Some(text) => serde_json::from_str(text)?,
        None => json!({}),
    };
    let obj = params
        .as_object_mut()
        .ok_or_else(|| CliError::Input("--params must be a JSON object".into()))?;
    if let Some(v) = canvas.base_force {
        obj.insert("base_force".into(), json!(v));
    }
    if let Some(v) = canvas.error_rate {
        obj.insert("error_rate".into(), json!(v));
    }
    if let Some(v) = canvas.step_len {
        obj.insert("step_len".into(), json!(v));
    }
    if canvas.linear {
        obj.insert("linear_blend".into(), json!(true));
    }

    let mut recipe = Recipe::new(canvas.width, canvas.height, canvas.seed);
    recipe.params = params;
    recipe.frames = frames;
    recipe.validate()?;
    Ok(recipe)
}

/// Scene params from the recipe dimensions plus any palette override.
fn scene_params(recipe: &Recipe, palette: &[String]) -> Result<SceneParams, CliError> {
    let mut params = SceneParams::new(recipe.width, recipe.height)?;
    if !palette.is_empty() {
        params.palette = palette
            .iter()
            .map(|hex| Srgb::from_hex(hex))
            .collect::<Result<Vec<_>, _>>()?;
    }
    Ok(params)
}

fn render(args: RenderArgs) -> Result<(), CliError> {
    let recipe = recipe_from(&args.canvas, args.frames)?;
    let flow_params = FlowParams::from_json(&recipe.params);
    let scene_params = scene_params(&recipe, &args.canvas.palette)?;

    let mut rng = Xorshift64::new(recipe.seed);
    let scene = compose(&scene_params, &mut rng)?;
    eprintln!(
        "composed {}x{} scene with {} sites (seed {})",
        recipe.width,
        recipe.height,
        scene.sites.len(),
        recipe.seed
    );

    std::fs::create_dir_all(&args.out_dir)?;

    let mut driver = Driver::new(flow_params, rng.next_u64());
    if let Some(frames) = recipe.frames {
        driver = driver.with_lifetime(frames);
    }
    let token = driver.trigger(scene)?;

    let mut queue = FrameQueue::new();
    queue.schedule(token);

    let mut written = 0u32;
    let mut write_err: Option<CliError> = None;
    run(&mut driver, &mut queue, |raster: &Raster| {
        if write_err.is_some() {
            return;
        }
        let path = args.out_dir.join(format!("{}_{written:04}.png", args.prefix));
        match driftfield_anim::snapshot::write_png(raster, &path) {
            Ok(()) => written += 1,
            Err(e) => write_err = Some(e.into()),
        }
    })?;
    if let Some(e) = write_err {
        return Err(e);
    }

    eprintln!("wrote {written} frames to {}", args.out_dir.display());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
    }
    Ok(())
}

fn bake(args: BakeArgs) -> Result<(), CliError> {
    let recipe = recipe_from(&args.canvas, None)?;
    let flow_params = FlowParams::from_json(&recipe.params);
    let scene_params = scene_params(&recipe, &args.canvas.palette)?;

    let mut rng = Xorshift64::new(recipe.seed);
    let scene = compose(&scene_params, &mut rng)?;
    eprintln!(
        "baking {}x{} flow map over {} sites",
        recipe.width,
        recipe.height,
        scene.sites.len()
    );

    // Lifetime 0: bake without ever advecting.
    let cycle = GenerationCycle::new(scene, &flow_params, 0, &mut rng)?;

    let mut viz = Raster::new(recipe.width, recipe.height)?;
    for y in 0..recipe.height {
        for x in 0..recipe.width {
            let v = cycle.flow().get(x, y);
            let r = ((v.x * 0.5 + 0.5) * 255.0).round() as u8;
            let g = ((v.y * 0.5 + 0.5) * 255.0).round() as u8;
            let b = (v.length() * 255.0).round().min(255.0) as u8;
            viz.set(x as isize, y as isize, [r, g, b, 255]);
        }
    }

    driftfield_anim::snapshot::write_png(&viz, &args.output)?;
    eprintln!("wrote {}", args.output.display());
    Ok(())
}
