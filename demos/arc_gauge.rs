use dialgauge::{ArcGauge, ArcGaugeConfig, Viewer, ViewerConfig, WidgetCommand};
use rand::Rng;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dialgauge=info"));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging();

    let config = ArcGaugeConfig::builder()
        .val_start(0.0)
        .val_end(60.0)
        .colors("viridis")
        .title("Speed")
        .animation_steps(12)
        .build();
    let mut gauge = ArcGauge::new(config)?;

    let viewer = Viewer::new(
        ViewerConfig::builder()
            .title("dialgauge: arc gauge")
            .maybe_font_path(std::env::var_os("DIALGAUGE_FONT"))
            .build(),
    );

    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        let mut rng = rand::rng();
        for _ in 0..40 {
            let value = rng.random_range(0.0..60.0);
            if sender.send(WidgetCommand::Set(value)).is_err() {
                return;
            }
            thread::sleep(Duration::from_millis(800));
        }
        let _ = sender.send(WidgetCommand::Close);
    });

    info!("arc animates towards a random value every 800 ms, window closes after 40 updates");
    viewer.show_with_commands(&mut gauge, receiver)?;
    Ok(())
}
