use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use foundation::math::GeoPoint;
use overlay::feed::StaticFeed;
use overlay::orientation::SpinningOrientation;
use overlay::track::ReplayTrack;
use overlay::{OverlayApp, OverlayConfig, Viewport};
use poi::HttpPoiSource;
use render::HeadlessRenderer;
use tokio::task::LocalSet;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Places POI markers around a replayed GPS track")]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(long, env = "POI_OVERLAY_CONFIG")]
    config: Option<PathBuf>,

    /// POI lookup endpoint
    #[arg(long, env = "POI_ENDPOINT")]
    endpoint: Option<String>,

    /// Track position as lon,lat (repeatable)
    #[arg(long = "track", value_name = "LON,LAT", allow_hyphen_values = true)]
    track: Vec<GeoPoint>,

    /// File with one lon,lat[,accuracy_m] per line
    #[arg(long, env = "POI_TRACK_FILE", conflicts_with = "track")]
    track_file: Option<PathBuf>,

    /// Delay between replayed track positions
    #[arg(long, env = "POI_GPS_INTERVAL_MS", default_value_t = 1000)]
    gps_interval_ms: u64,

    /// Render loop rate
    #[arg(long, env = "POI_FPS")]
    fps: Option<f64>,

    #[arg(long, env = "POI_WIDTH")]
    width: Option<u32>,

    #[arg(long, env = "POI_HEIGHT")]
    height: Option<u32>,

    /// Movement (meters) that triggers a new lookup
    #[arg(long, env = "POI_FETCH_THRESHOLD_M")]
    fetch_threshold_m: Option<f64>,

    /// Half-width (degrees) of the lookup box
    #[arg(long, env = "POI_BBOX_HALF_WIDTH_DEG")]
    bbox_half_width_deg: Option<f64>,

    /// Drop GPS positions closer than this to the last fix
    #[arg(long, env = "POI_GPS_MIN_DISTANCE_M")]
    gps_min_distance_m: Option<f64>,

    /// Simulated heading change per frame, degrees
    #[arg(long, default_value_t = 0.5)]
    spin_deg: f64,

    /// Exit once the track is replayed instead of waiting for Ctrl-C
    #[arg(long, env = "POI_EXIT_AFTER_TRACK")]
    exit_after_track: bool,
}

impl Args {
    fn overlay_config(&self) -> anyhow::Result<OverlayConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                OverlayConfig::from_json_str(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => OverlayConfig::default(),
        };

        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(fps) = self.fps {
            config.frame_rate_hz = fps;
        }
        if self.width.is_some() || self.height.is_some() {
            config.viewport = Viewport::new(
                self.width.unwrap_or(config.viewport.width),
                self.height.unwrap_or(config.viewport.height),
            );
        }
        if let Some(threshold) = self.fetch_threshold_m {
            config.fetch_threshold_m = threshold;
        }
        if let Some(half_width) = self.bbox_half_width_deg {
            config.bbox_half_width_deg = half_width;
        }
        if let Some(min_distance) = self.gps_min_distance_m {
            config.gps_min_distance_m = min_distance;
        }
        config.validate()?;
        Ok(config)
    }

    fn track(&self) -> anyhow::Result<ReplayTrack> {
        let interval = Duration::from_millis(self.gps_interval_ms);
        let track = match &self.track_file {
            Some(path) => ReplayTrack::from_file(path, interval)?,
            None => ReplayTrack::from_points("cli", &self.track, interval),
        };
        if track.remaining() == 0 {
            bail!("no track positions: pass --track lon,lat or --track-file");
        }
        Ok(track)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = args.overlay_config()?;
    let track = args.track()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    LocalSet::new().block_on(&runtime, run(args, config, track))
}

async fn run(args: Args, config: OverlayConfig, track: ReplayTrack) -> anyhow::Result<()> {
    let source = HttpPoiSource::new(config.endpoint.clone())?;
    let app = OverlayApp::bootstrap(config, HeadlessRenderer::new())?;

    let controller = app.spawn_controller(source)?;
    let controls = app.orientation_controls(SpinningOrientation::new(0.0, args.spin_deg));
    let render = app.spawn_render_loop(StaticFeed::new(), controls);
    let gps = app.start_gps(track);

    if args.exit_after_track {
        gps.await?;
    } else {
        tokio::signal::ctrl_c().await?;
        info!("interrupted");
        gps.abort();
    }
    app.location().stop_updates();
    let controller = controller.await?;
    render.abort();

    let ahead = app.click_handler().raycast(0.0, 0.0);
    let renderer = app.renderer().borrow();
    info!(
        fixes = app.location().fix_count(),
        lookups = controller.attempts(),
        failed = controller.failures(),
        markers = controller.index().len(),
        frames = renderer.frames_rendered(),
        marker_ahead = ?ahead.map(|hit| hit.entity.to_string()),
        "overlay finished"
    );
    Ok(())
}
