use dialgauge::{Status, StatusConfig, Viewer, ViewerConfig, WidgetCommand};
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

    let mut status = Status::new(StatusConfig::builder().mid(50.0).high(80.0).build())?;

    let viewer = Viewer::new(
        ViewerConfig::builder()
            .title("dialgauge: status")
            .window_width(360)
            .window_height(200)
            .maybe_font_path(std::env::var_os("DIALGAUGE_FONT"))
            .build(),
    );

    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            let value = rng.random_range(0.0..100.0);
            if sender.send(WidgetCommand::Set(value)).is_err() {
                break;
            }
            thread::sleep(Duration::from_secs(1));
        }
    });

    info!("green below 50, yellow below 80, red above; close the window to exit");
    viewer.show_with_commands(&mut status, receiver)?;
    Ok(())
}
