use clap::Parser;
use log::{error, info};

use serialtap::capture::{RelayConfig, RelayEngine};
use serialtap::configuration::SniffArgs;
use serialtap::display::RecordLogger;
use serialtap::endpoint::EndpointPair;
use serialtap::storage::FileStorage;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .init();

    let args = SniffArgs::parse();
    if let Err(e) = args.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let endpoints = match EndpointPair::open(&args.port, args.baudrate) {
        Ok(endpoints) => endpoints,
        Err(e) => {
            error!("Unable to open endpoints: {}", e);
            std::process::exit(1);
        }
    };

    let mut logger = RecordLogger::new(args.columns);
    if let Some(ref path) = args.file {
        match FileStorage::create(path) {
            Ok(storage) => logger = logger.with_storage(Box::new(storage)),
            Err(e) => {
                error!("Unable to open capture file: {}", e);
                std::process::exit(1);
            }
        }
    }

    let mode = args.mode();
    let (mut session, records) = RelayEngine::start(RelayConfig::new(endpoints, mode));

    logger.emit("serialtap\n\n");
    logger.emit(&format!("port:\t\t{}\n", args.port));
    logger.emit(&format!("baudrate:\t{}\n", args.baudrate));
    logger.emit(&format!(
        "proxy:\t\t{}\n\n",
        session.proxy_path().unwrap_or("<unnamed>")
    ));
    info!(
        "[{}] sniffing {:?}; point the host application at the proxy port",
        session.id(),
        mode
    );

    let logger_task = tokio::spawn(logger.run(records));

    let joined = tokio::select! {
        res = session.join() => Some(res),
        _ = tokio::signal::ctrl_c() => None,
    };
    let result = match joined {
        Some(result) => result,
        None => {
            info!("Interrupt received, stopping session");
            session.stop();
            session.join().await
        }
    };

    match result {
        Ok(stats) => info!(
            "Relay finished: {} byte(s) host->device, {} byte(s) device->host",
            stats.bytes_incoming, stats.bytes_outgoing
        ),
        Err(e) => error!("Session ended with error: {}", e),
    }

    let _ = logger_task.await;
}
