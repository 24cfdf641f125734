use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Label Sim - Replays a JSON tile scene through the label placement pipeline
pub struct Settings {
    /// Scene file describing the view, styles and tiles
    #[clap(short, long, value_name = "FILE")]
    pub scene: PathBuf,

    /// Number of frames to simulate
    #[clap(short, long, default_value = "1")]
    pub frames: usize,

    /// Seconds elapsed per frame
    #[clap(long, default_value_t = 1.0 / 60.0)]
    pub dt: f32,

    /// Zoom level per frame, repeated (the last one holds for the remaining frames)
    #[clap(short, long, value_name = "Z")]
    pub zoom: Vec<f32>,

    /// Hit-test the labels at this screen position after the last frame
    #[clap(short, long, value_name = "X,Y", value_parser = parse_point)]
    pub query: Option<[f32; 2]>,

    /// Include interactive labels that are not currently visible in the hit-test
    #[clap(long, default_value = "false")]
    pub all: bool,

    /// Print the outcome as JSON instead of a table
    #[clap(long, default_value = "false")]
    pub json: bool,

    /// Collect the debug overlay primitives of the last frame
    #[clap(long, default_value = "false")]
    pub debug_overlay: bool,
}

impl Settings {
    pub fn from_cli() -> Self {
        match Settings::try_parse() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    /// Zoom of `frame`, if given on the command line
    pub fn zoom_at(&self, frame: usize) -> Option<f32> {
        self.zoom.get(frame).or(self.zoom.last()).copied()
    }
}

fn parse_point(value: &str) -> Result<[f32; 2], String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{value}'"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f32>()
            .map_err(|e| format!("invalid coordinate '{s}': {e}"))
    };
    Ok([parse(x)?, parse(y)?])
}
