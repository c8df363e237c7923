//! Backend connectivity check.

use crate::app::{App, CONFIGURE_HINT};
use crate::output::CliRenderer;
use quadboard_core::{ConnectionMonitor, ConnectionStatus};
use std::sync::Arc;

pub async fn run(watch: bool) -> Result<(), Box<dyn std::error::Error>> {
    let app = App::bootstrap()?;
    let Some(gateway) = app.gateway.clone() else {
        return Err(CONFIGURE_HINT.into());
    };

    let mut monitor = ConnectionMonitor::new(
        Some(gateway),
        Arc::clone(&app.store),
        Arc::new(CliRenderer),
        app.probe_interval(),
    );

    if watch {
        println!(
            "probing every {}s, ctrl-c to stop",
            app.probe_interval().as_secs()
        );
        monitor.start();
        tokio::signal::ctrl_c().await?;
        monitor.stop();
        return Ok(());
    }

    let reachable = monitor.probe_once().await;
    let status = app.store.lock().unwrap().connection;
    match status {
        ConnectionStatus::Connected => println!("connected"),
        ConnectionStatus::Connecting => println!("connecting"),
        ConnectionStatus::Disconnected => println!("disconnected"),
    }
    if reachable {
        Ok(())
    } else {
        Err("backend unreachable".into())
    }
}
