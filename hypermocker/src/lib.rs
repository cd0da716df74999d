//! HTTP server which answers only the requests it was told to anticipate. Each anticipated request
//! is held until the test decides how to respond, which makes it possible to check what the
//! client does while waiting.

use http_body_util::Full;
use hyper::{Request, Response, server::conn::http1, service::Service};
use hyper_util::rt::TokioIo;
use std::{
    collections::HashMap,
    future::Future,
    net::SocketAddr,
    pin::Pin,
    sync::{Arc, Mutex},
};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub use hyper::{self, StatusCode, body::Bytes};

/// Requests seen by the server, headers only.
pub type ReceivedRequest = Request<()>;

/// Server side of an anticipated request.
struct Anticipation {
    request_tx: oneshot::Sender<ReceivedRequest>,
    response_rx: oneshot::Receiver<Response<Full<Bytes>>>,
}

#[derive(Default)]
struct State {
    /// Made by [`Server::anticipate`], keyed by path.
    anticipated: HashMap<String, Anticipation>,

    unexpected: Vec<String>,
}

pub struct Server {
    port: u16,
    state: Arc<Mutex<State>>,
}

impl Server {
    /// Create new [`Server`], and bind it to a random port.
    pub async fn bind() -> Self {
        let state = Arc::new(Mutex::new(State::default()));

        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = TcpListener::bind(addr).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        log::info!("Listening on port {port}.");

        let state_clone = Arc::clone(&state);
        tokio::spawn(async move {
            loop {
                let (stream, _) = listener.accept().await.unwrap();
                let io = TokioIo::new(stream);

                let state = Arc::clone(&state_clone);
                tokio::task::spawn(async move {
                    if let Err(error) = http1::Builder::new()
                        .serve_connection(io, Connection { state })
                        .await
                    {
                        log::warn!("Connection failed: {error}.");
                    }
                });
            }
        });

        Self { port, state }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Anticipate a single request of the given path. Query is not taken into account.
    pub fn anticipate(&self, path: impl Into<String>) -> AnticipatedRequest {
        let path = path.into();
        log::info!("Anticipating '{path}'.");

        let (request_tx, request_rx) = oneshot::channel();
        let (response_tx, response_rx) = oneshot::channel();

        self.state.lock().unwrap().anticipated.insert(
            path,
            Anticipation {
                request_tx,
                response_rx,
            },
        );

        AnticipatedRequest {
            request_rx,
            response_tx,
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let state = self.state.lock().unwrap();
        if !state.unexpected.is_empty() && !std::thread::panicking() {
            panic!("there are unexpected requests: {:?}", state.unexpected);
        }
    }
}

/// Test side of an anticipated request.
pub struct AnticipatedRequest {
    request_rx: oneshot::Receiver<ReceivedRequest>,
    response_tx: oneshot::Sender<Response<Full<Bytes>>>,
}

impl AnticipatedRequest {
    /// Wait for the request to arrive.
    pub async fn expect(&mut self) -> ReceivedRequest {
        (&mut self.request_rx).await.unwrap()
    }

    /// Respond with `200 OK` and the given body.
    pub fn respond(self, payload: impl Into<Bytes>) {
        log::info!("Responding.");
        self.send(Response::new(Full::new(payload.into())));
    }

    /// Respond with an empty body.
    pub fn respond_with_status(self, status: StatusCode) {
        log::info!("Responding with {status}.");
        let mut response = Response::new(Full::default());
        *response.status_mut() = status;
        self.send(response);
    }

    fn send(self, response: Response<Full<Bytes>>) {
        if self.response_tx.send(response).is_err() {
            log::warn!("Client is gone, response will not be delivered.");
        }
    }
}

struct Connection {
    state: Arc<Mutex<State>>,
}

impl Service<Request<hyper::body::Incoming>> for Connection {
    type Response = Response<Full<Bytes>>;
    type Error = hyper::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, request: Request<hyper::body::Incoming>) -> Self::Future {
        log::info!("Incoming request '{}'.", request.uri());
        let state = Arc::clone(&self.state);
        Box::pin(async move {
            let anticipation = state
                .lock()
                .unwrap()
                .anticipated
                .remove(request.uri().path());

            if let Some(anticipation) = anticipation {
                let (parts, _) = request.into_parts();
                let _ = anticipation
                    .request_tx
                    .send(Request::from_parts(parts, ()));

                match anticipation.response_rx.await {
                    Ok(response) => Ok(response),
                    Err(_) => {
                        log::warn!("Request was anticipated, but never responded to.");
                        let mut response = Response::new(Full::default());
                        *response.status_mut() = StatusCode::GONE;
                        Ok(response)
                    }
                }
            } else {
                log::warn!("Unexpected '{}'.", request.uri());
                state
                    .lock()
                    .unwrap()
                    .unexpected
                    .push(request.uri().to_string());

                let mut response = Response::new(Full::new(Bytes::from_static(b"unexpected")));
                *response.status_mut() = StatusCode::IM_A_TEAPOT;
                Ok(response)
            }
        })
    }
}
