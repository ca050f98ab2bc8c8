use std::{
    num::NonZeroU8,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use tiny_http::{Response, Server};

/// Path the list is served at, mimicking the published one
pub const LIST_PATH: &str = "/lists/list-one.xml";

#[derive(Debug, Clone)]
pub struct Config {
    /// The path answering with the list, anything else is a 404.
    pub path: String,
    /// The list served on success.
    pub body: Vec<u8>,
    /// Status code of the failing answers.
    pub failure_status: u16,
    /// How many requests, from the first, get the failure status.
    pub failures: usize,
    /// The number of threads to use for serving requests.
    pub num_threads: NonZeroU8,
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::builder().build()
    }
}

pub struct ConfigBuilder {
    path: String,
    body: Vec<u8>,
    failure_status: u16,
    failures: usize,
    num_threads: NonZeroU8,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Answer the first `failures` requests with `status`
    pub fn with_failures(mut self, status: u16, failures: usize) -> Self {
        self.failure_status = status;
        self.failures = failures;
        self
    }

    pub fn with_num_threads(mut self, num: NonZeroU8) -> Self {
        self.num_threads = num;
        self
    }

    pub fn build(self) -> Config {
        Config {
            path: self.path,
            body: self.body,
            failure_status: self.failure_status,
            failures: self.failures,
            num_threads: self.num_threads,
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            path: LIST_PATH.to_string(),
            body: Vec::new(),
            failure_status: 500,
            failures: 0,
            num_threads: NonZeroU8::new(1).expect("non-zero"),
        }
    }
}

/// A local HTTP server playing the host of the remote currency list.
///
/// Stops when dropped.
pub struct ListServer {
    server: Arc<Server>,
    handles: Vec<JoinHandle<()>>,
    running: Arc<AtomicBool>,
    hits: Arc<AtomicUsize>,
    config: Config,
}

impl ListServer {
    pub fn new(config: Config) -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").expect("bind list server"));
        let running = Arc::new(AtomicBool::new(true));
        let hits = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::with_capacity(config.num_threads.get() as usize);

        for _ in 0..config.num_threads.get() {
            let server = server.clone();
            let running = running.clone();
            let hits = hits.clone();
            let config = config.clone();
            let handle = thread::spawn(move || loop {
                let request = match server.recv_timeout(Duration::from_millis(100)) {
                    Ok(Some(request)) => request,
                    Ok(None) => {
                        // timeout, checks we aren't stopped
                        if running.load(Ordering::SeqCst) {
                            continue;
                        } else {
                            break;
                        }
                    }
                    Err(err) => {
                        log::error!("recv error: {err}");
                        continue;
                    }
                };

                let hit = hits.fetch_add(1, Ordering::SeqCst);
                log::debug!("GET {} (request {hit})", request.url());

                let result = if request.url() != config.path {
                    request.respond(Response::from_string("404: File not found").with_status_code(404))
                } else if hit < config.failures {
                    let status = config.failure_status;
                    request.respond(Response::from_string(format!("{status}")).with_status_code(status))
                } else {
                    request.respond(Response::from_data(config.body.clone()))
                };
                if let Err(err) = result {
                    log::error!("send_response error: {err}");
                }
            });
            handles.push(handle);
        }

        Self {
            server,
            handles,
            running,
            hits,
            config,
        }
    }

    /// Serve `body` at [`LIST_PATH`]
    pub fn serving(body: impl Into<Vec<u8>>) -> Self {
        Self::new(Config::builder().with_body(body).build())
    }

    /// Answer every request with `status`
    pub fn failing(status: u16) -> Self {
        Self::new(Config::builder().with_failures(status, usize::MAX).build())
    }

    pub fn port(&self) -> u16 {
        self.server
            .server_addr()
            .to_ip()
            .expect("ip listener")
            .port()
    }

    /// Full URL of the served list
    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}{}", self.port(), self.config.path)
    }

    /// Number of requests received so far
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for ListServer {
    fn drop(&mut self) {
        self.stop();
    }
}
