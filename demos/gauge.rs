use dialgauge::{Gauge, GaugeConfig, Viewer, ViewerConfig, WidgetCommand};
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

    let config = GaugeConfig::builder()
        .val_start(0.0)
        .val_end(100.0)
        .tick_step(10.0)
        .title("Pressure")
        .build();
    let mut gauge = Gauge::new(config)?;

    let viewer = Viewer::new(
        ViewerConfig::builder()
            .title("dialgauge: wedge gauge")
            .maybe_font_path(std::env::var_os("DIALGAUGE_FONT"))
            .build(),
    );

    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            // Occasionally overshoot to show extrapolation past the dial
            let value = rng.random_range(-5.0..105.0);
            if sender.send(WidgetCommand::Set(value)).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(500));
        }
    });

    info!("pointer moves to a random value every 500 ms, close the window to exit");
    viewer.show_with_commands(&mut gauge, receiver)?;
    Ok(())
}
