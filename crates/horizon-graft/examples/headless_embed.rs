//! Horizon Graft headless walkthrough
//!
//! Creates a window on the in-memory host, grafts a recording surface into
//! it and drives a few resizes, printing what the toolkit sees.
//!
//! Run with: RUST_LOG=horizon_graft=trace cargo run -p horizon-graft --example headless_embed

use horizon_graft::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), GraftError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("horizon_graft=debug")),
        )
        .init();
    horizon_graft::thread_check::set_ui_thread();

    let mut host = HeadlessHost::new().with_scale_factor(2.0);
    let mut window = create_native_window(&mut host, "Demo", 1600, 1200)?;

    let toolkit = HeadlessSurface::new(ToolkitSize::new(0, 0));
    let probe = toolkit.probe();
    let surface = EmbeddedSurface::new(toolkit);

    let config = BridgeConfig::new()
        .with_origins(Origin::TopLeft, Origin::BottomLeft)
        .with_forward_input(true);
    let bridge = EmbeddingBridge::new(config)?;
    bridge.embed(&mut window, &surface)?;
    window.show()?;

    for size in [HostSize::new(800, 600), HostSize::new(1024, 768), HostSize::new(1601, 1201)] {
        window.notify_content_resized(size);
    }
    window.dispatch_input(&HostInput::PointerMoved(HostPoint::new(100.0, 100.0)));

    println!("window:  {:?} at scale {}", window.content_size(), window.scale_factor());
    println!("resizes: {:?}", probe.resizes());
    println!("inputs:  {:?}", probe.inputs());

    surface.destroy();
    println!("after destroy: {:?}", window.embedding_state());
    Ok(())
}
