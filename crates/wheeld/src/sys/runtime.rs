use crate::config;
use crate::events::AppEvent;
use async_channel::Sender;
use std::io;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use tokio::runtime::Builder;

/// Where the background services listen and what they watch.
#[derive(Debug, Clone)]
pub struct Services {
    pub socket: PathBuf,
    pub config_path: PathBuf,
}

impl Services {
    /// Runs the control socket and the config watcher on a dedicated thread.
    /// The thread ends once both have stopped.
    pub fn start(self, tx: Sender<AppEvent>) -> io::Result<JoinHandle<()>> {
        let rt = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("wheeld-io")
            .enable_all()
            .build()?;

        let Services {
            socket,
            config_path,
        } = self;

        thread::Builder::new()
            .name("wheeld-services".into())
            .spawn(move || {
                rt.block_on(async move {
                    let server = crate::sys::server::run_server(tx.clone(), socket);
                    let watcher = async move {
                        if let Err(e) = config::watch_config(tx, config_path).await {
                            log::error!("Config watcher stopped: {}", e);
                        }
                    };
                    tokio::join!(server, watcher);
                });
            })
    }
}
