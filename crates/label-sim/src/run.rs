//! Frame loop and result reporting

use crate::error::Result;
use crate::scene::{Scene, World};
use crate::settings::Settings;
use serde::Serialize;
use tile_labels::{DebugOverlay, FrameStats, LabelId, LabelState, Labels, TouchItem};

/// Outcome of a simulated run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub frames: usize,
    pub zoom: f32,
    pub needs_update: bool,
    pub stats: FrameStats,
    pub labels: Vec<LabelReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hits: Option<Vec<TouchItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_primitives: Option<usize>,
}

/// Final state of one label
#[derive(Debug, Clone, Serialize)]
pub struct LabelReport {
    pub tile: String,
    pub style: String,
    pub id: LabelId,
    pub state: LabelState,
    pub alpha: f32,
    pub position: [f32; 2],
}

pub fn run(settings: &Settings) -> Result<Report> {
    let scene = Scene::load(&settings.scene)?;
    tracing::info!(scene = %settings.scene.display(), "Scene loaded");
    simulate(&scene, settings)
}

/// Run the pipeline over `scene` for the configured frames
pub fn simulate(scene: &Scene, settings: &Settings) -> Result<Report> {
    let mut config = scene.config.clone();
    config.debug_overlay |= settings.debug_overlay;

    let mut world = scene.build(&config)?;
    let mut labels = Labels::new(config);

    let frames = settings.frames.max(1);
    if settings.frames == 0 {
        tracing::warn!("At least one frame is simulated");
    }

    let mut view = scene.view(scene.view.zoom);
    for frame in 0..frames {
        profiling::scope!("frame");
        let zoom = settings
            .zoom_at(frame)
            .unwrap_or_else(|| scene.zoom_at(frame));
        view = scene.view(zoom);
        labels.update(
            &view,
            settings.dt,
            &world.styles,
            &mut world.tiles,
            &world.cache,
        );
        tracing::debug!(
            frame,
            zoom,
            needs_update = labels.needs_update(),
            "Frame simulated"
        );
        profiling::finish_frame!();
    }

    let hits = settings.query.map(|[x, y]| {
        labels
            .query_at(&view, &world.styles, &world.tiles, x, y, !settings.all)
            .to_vec()
    });

    let debug_primitives = labels.config().debug_overlay.then(|| {
        let mut overlay = DebugOverlay::new();
        labels.draw_debug(&view, &world.tiles, &mut overlay);
        overlay.primitives().len()
    });

    Ok(Report {
        frames,
        zoom: view.zoom,
        needs_update: labels.needs_update(),
        stats: labels.stats(),
        labels: label_reports(&world),
        hits,
        debug_primitives,
    })
}

fn label_reports(world: &World) -> Vec<LabelReport> {
    let mut reports = Vec::new();
    for tile in &world.tiles {
        for (style_id, mesh) in tile.meshes() {
            let style = world
                .styles
                .iter()
                .find(|s| s.id == *style_id)
                .map(|s| s.name.clone())
                .unwrap_or_default();
            for label in mesh.labels() {
                let position = label.transform().state.screen_pos;
                reports.push(LabelReport {
                    tile: tile.id().to_string(),
                    style: style.clone(),
                    id: label.id(),
                    state: label.state(),
                    alpha: label.alpha(),
                    position: [position.x, position.y],
                });
            }
        }
    }
    reports
}

pub fn print(report: &Report, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    let stats = &report.stats;
    println!(
        "frames: {}  zoom: {:.2}  collected: {}  pairs: {}  occluded: {}  repeat dropped: {}  proxy skips: {}",
        report.frames,
        report.zoom,
        stats.collected,
        stats.pairs,
        stats.occluded,
        stats.repeat_dropped,
        stats.proxy_skips
    );
    println!(
        "{:<12} {:<14} {:>6} {:<15} {:>5} {:>16}",
        "tile", "style", "id", "state", "alpha", "position"
    );
    for label in &report.labels {
        println!(
            "{:<12} {:<14} {:>6} {:<15} {:>5.2} {:>7.1},{:>8.1}",
            label.tile,
            label.style,
            label.id.0,
            format!("{:?}", label.state),
            label.alpha,
            label.position[0],
            label.position[1]
        );
    }

    if let Some(hits) = &report.hits {
        println!("hits: {}", hits.len());
        for hit in hits {
            let properties = hit
                .properties
                .as_deref()
                .map(|p| {
                    p.iter()
                        .map(|(k, v)| format!("{k}={v}"))
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .unwrap_or_default();
            println!(
                "  {:>7.1},{:>7.1}  d={:<6.1} {}",
                hit.position[0], hit.position[1], hit.distance, properties
            );
        }
    }
    if let Some(count) = report.debug_primitives {
        println!("debug primitives: {count}");
    }
    Ok(())
}
