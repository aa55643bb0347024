//! Camera wall walkthrough
//!
//! Run with: cargo run --example wall_walkthrough [STATE_FILE]
//!
//! Drives a viewer through the usual user actions against the in-memory
//! platform, printing the view after each step. The front camera's endpoint
//! answers 404 so the failure path is visible too. State is persisted to
//! STATE_FILE (default: `wall-state.json` in the temp dir); run it twice to
//! see the layout restored.
//!
//! Set RUST_LOG=whep_wall=debug for session-level logs.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use whep_wall::layout::TileStatus;
use whep_wall::testing::{RecordingPlatform, ScriptedTransport};
use whep_wall::{CameraDescriptor, LayoutCoordinator, LayoutMode, SlotKey, ViewerConfig};

fn print_view(step: &str, viewer: &LayoutCoordinator) {
    let view = viewer.view();
    println!(
        "== {} [{} | page {} | {} cameras | {} sessions]",
        step,
        view.layout,
        view.page_info(),
        view.camera_count,
        viewer.live_sessions()
    );
    for tile in view.all_tiles() {
        let status = match tile.status {
            TileStatus::NoSource => "no source",
            TileStatus::Negotiating => "negotiating",
            TileStatus::Live => "live",
            TileStatus::Failed => "failed",
        };
        println!("   {:<16} {:<12} {}", tile.slot.to_string(), tile.label, status);
    }
}

async fn settle(viewer: &mut LayoutCoordinator) {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
    viewer.drain_events();
}

#[tokio::main]
async fn main() -> whep_wall::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("whep_wall=info")),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .map(Into::into)
        .unwrap_or_else(|| std::env::temp_dir().join("wall-state.json"));
    println!("State file: {}", path.display());

    let platform = Arc::new(RecordingPlatform::new());
    let transport = Arc::new(ScriptedTransport::new());
    transport.fail("http://localhost:8889/front_cam/whep", 404);

    let mut viewer = LayoutCoordinator::with_file_store(
        ViewerConfig::default().page_size(4),
        platform.clone(),
        transport.clone(),
        &path,
    )?;

    viewer.start();
    settle(&mut viewer).await;
    print_view("start", &viewer);

    viewer.swap_to_main("door_cam");
    settle(&mut viewer).await;
    print_view("door_cam to main", &viewer);

    viewer.toggle_mute(&SlotKey::Main);

    let mut cameras: Vec<CameraDescriptor> = viewer.cameras().cameras().to_vec();
    for i in 1..=4 {
        cameras.push(CameraDescriptor::with_url(
            format!("yard_{i}"),
            format!("Yard {i}"),
            format!("http://localhost:8889/yard_{i}/whep"),
        ));
    }
    viewer.replace_cameras(cameras)?;
    viewer.set_layout(LayoutMode::Grid2);
    settle(&mut viewer).await;
    print_view("grid2", &viewer);

    viewer.next_page();
    settle(&mut viewer).await;
    print_view("next page", &viewer);

    println!("Exported cameras:\n{}", viewer.export_json());

    viewer.shutdown();
    println!(
        "Peers created: {}, still open: {}, stats: {:?}",
        platform.peers_created(),
        platform.open_peers(),
        viewer.stats()
    );
    Ok(())
}
