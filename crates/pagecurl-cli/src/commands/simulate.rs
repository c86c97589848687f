use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use pagecurl_core::geometry::{Point, Size};
use pagecurl_core::gesture::{GesturePhase, PointerEvent};
use pagecurl_core::{AppConfig, CurlCarousel, CurlPhaseKind, Page};

/// Frames to wait for a settle before giving up
const MAX_SETTLE_FRAMES: usize = 10_000;

/// Changed reports in a synthetic drag
const DRAG_STEPS: usize = 5;

const DEFAULT_TINTS: [&str; 4] = ["red", "green", "yellow", "orange"];

pub struct SimulateOptions {
    pub pages: Option<usize>,
    pub index: usize,
    pub velocity: f64,
    pub width: f64,
    pub height: f64,
    pub script: Option<PathBuf>,
    pub frame_ms: u64,
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct FrameRecord {
    pub frame: usize,
    pub page_index: usize,
    pub phase: CurlPhaseKind,
    /// SVG path data of the page clip
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub committed: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub start_index: usize,
    pub final_index: usize,
    pub commits: Vec<usize>,
    pub frames: Vec<FrameRecord>,
}

pub fn run(config: &AppConfig, options: SimulateOptions) -> Result<()> {
    let size = Size::new(options.width, options.height)?;
    let pages = match options.pages {
        Some(count) => tinted_pages(count),
        None => config.pages(),
    };

    let events = match &options.script {
        Some(path) => load_script(path)?,
        None => synthetic_drag(size, options.velocity),
    };

    let mut deck = CurlCarousel::new(pages, options.index, size)?;
    let report = simulate(&mut deck, &events, Duration::from_millis(options.frame_ms.max(1)))?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn tinted_pages(count: usize) -> Vec<Page> {
    (0..count)
        .map(|index| Page::new(index, DEFAULT_TINTS[index % DEFAULT_TINTS.len()]))
        .collect()
}

fn load_script(path: &Path) -> Result<Vec<PointerEvent>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading pointer script {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing pointer script {}", path.display()))
}

/// Press near the corner the velocity sign moves, drag towards the middle,
/// release with `velocity`
pub fn synthetic_drag(size: Size, velocity: f64) -> Vec<PointerEvent> {
    let (w, h) = (size.width, size.height);
    let (start, end) = if velocity < 0.0 {
        (Point::new(w * 0.95, h * 0.95), Point::new(w * 0.4, h * 0.7))
    } else {
        (Point::new(w * 0.05, h * 0.05), Point::new(w * 0.6, h * 0.3))
    };

    let mut events = Vec::with_capacity(DRAG_STEPS + 2);
    events.push(PointerEvent::new(GesturePhase::Began, start, 0.0));
    for step in 1..=DRAG_STEPS {
        let t = step as f64 / DRAG_STEPS as f64;
        let position = Point::new(start.x + (end.x - start.x) * t, start.y + (end.y - start.y) * t);
        events.push(PointerEvent::new(GesturePhase::Changed, position, velocity));
    }
    events.push(PointerEvent::new(GesturePhase::Ended, end, velocity));
    events
}

/// Feed one pointer report per frame, then tick until every page is idle
pub fn simulate(deck: &mut CurlCarousel, events: &[PointerEvent], dt: Duration) -> Result<SimulationReport> {
    let start_index = deck.current_index();
    let mut frames = Vec::new();
    let mut commits = Vec::new();
    let mut frame_no = 0;

    let mut record = |deck: &mut CurlCarousel, frames: &mut Vec<FrameRecord>, frame_no: &mut usize| {
        for frame in deck.tick(dt) {
            commits.extend(frame.committed);
            frames.push(FrameRecord {
                frame: *frame_no,
                page_index: frame.page_index,
                phase: frame.phase,
                path: frame.path.to_string(),
                committed: frame.committed,
            });
        }
        *frame_no += 1;
    };

    for event in events {
        deck.handle_pointer(*event);
        record(deck, &mut frames, &mut frame_no);
    }

    let mut settle_frames = 0;
    while deck.is_animating() {
        if settle_frames >= MAX_SETTLE_FRAMES {
            bail!("curl did not settle within {} frames", MAX_SETTLE_FRAMES);
        }
        record(deck, &mut frames, &mut frame_no);
        settle_frames += 1;
    }

    Ok(SimulationReport {
        start_index,
        final_index: deck.current_index(),
        commits,
        frames,
    })
}

fn print_report(report: &SimulationReport) {
    for frame in &report.frames {
        let commit = frame
            .committed
            .map(|index| format!(" -> jump_to_index({})", index))
            .unwrap_or_default();
        println!(
            "frame {:04} page {} {:<10} {}{}",
            frame.frame,
            frame.page_index,
            frame.phase.to_string(),
            frame.path,
            commit
        );
    }
    println!(
        "start page {} -> final page {} ({} commit{})",
        report.start_index,
        report.final_index,
        report.commits.len(),
        if report.commits.len() == 1 { "" } else { "s" }
    );
}
