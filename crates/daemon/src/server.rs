use crate::router::{PARSE_ERROR, Request, Response, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

#[derive(Error, Debug)]
pub enum ServerError {
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
  #[error("Connection closed before a response arrived")]
  Closed,
}

/// Line-delimited JSON-RPC server over TCP
pub struct Server {
  listener: TcpListener,
  router: Arc<Router>,
  shutdown_tx: broadcast::Sender<()>,
}

impl Server {
  /// Bind `addr` (`host:port`). Port 0 picks a free port; see [`Server::local_addr`].
  pub async fn bind(addr: &str, router: Arc<Router>) -> Result<Self, ServerError> {
    let listener = TcpListener::bind(addr).await?;
    let (shutdown_tx, _) = broadcast::channel(1);
    Ok(Self {
      listener,
      router,
      shutdown_tx,
    })
  }

  /// Get a shutdown handle to signal server shutdown
  pub fn shutdown_handle(&self) -> ShutdownHandle {
    ShutdownHandle {
      tx: self.shutdown_tx.clone(),
    }
  }

  pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
    Ok(self.listener.local_addr()?)
  }

  /// Accept connections until a shutdown is signalled
  pub async fn run(&self) -> Result<(), ServerError> {
    info!("Daemon listening on {}", self.local_addr()?);

    let mut shutdown_rx = self.shutdown_tx.subscribe();

    loop {
      tokio::select! {
          result = self.listener.accept() => {
              match result {
                  Ok((stream, peer)) => {
                      debug!("Connection from {}", peer);
                      let router = Arc::clone(&self.router);
                      tokio::spawn(async move {
                          if let Err(e) = handle_connection(stream, router).await {
                              error!("Connection error: {}", e);
                          }
                      });
                  }
                  Err(e) => {
                      error!("Accept error: {}", e);
                  }
              }
          }
          _ = shutdown_rx.recv() => {
              info!("Shutdown signal received");
              break;
          }
      }
    }

    Ok(())
  }
}

/// Handle to signal server shutdown
#[derive(Clone)]
pub struct ShutdownHandle {
  tx: broadcast::Sender<()>,
}

impl ShutdownHandle {
  pub fn shutdown(&self) {
    let _ = self.tx.send(());
  }
}

async fn write_response<W: AsyncWrite + Unpin>(writer: &mut W, response: &Response) -> Result<(), ServerError> {
  let json = serde_json::to_string(response)?;
  writer.write_all(json.as_bytes()).await?;
  writer.write_all(b"\n").await?;
  writer.flush().await?;
  Ok(())
}

/// Serve requests from one client until it disconnects
async fn handle_connection(stream: TcpStream, router: Arc<Router>) -> Result<(), ServerError> {
  let (reader, mut writer) = stream.into_split();
  let mut reader = BufReader::new(reader);
  let mut line = String::new();

  loop {
    line.clear();
    let n = reader.read_line(&mut line).await?;

    if n == 0 {
      debug!("Client disconnected");
      break;
    }

    let trimmed = line.trim();
    if trimmed.is_empty() {
      continue;
    }

    let request: Request = match serde_json::from_str(trimmed) {
      Ok(r) => r,
      Err(e) => {
        warn!("Invalid request JSON: {}", e);
        let response = Response::error(None, PARSE_ERROR, &format!("Parse error: {}", e));
        write_response(&mut writer, &response).await?;
        continue;
      }
    };

    debug!("Request: {} (id={:?})", request.method, request.id);

    let response = router.handle(request).await;
    write_response(&mut writer, &response).await?;
  }

  Ok(())
}

/// Client for a running daemon
pub struct Client {
  stream: TcpStream,
}

impl Client {
  pub async fn connect(addr: &str) -> Result<Self, ServerError> {
    let stream = TcpStream::connect(addr).await?;
    Ok(Self { stream })
  }

  /// Send a request and receive response
  pub async fn request(&mut self, request: Request) -> Result<Response, ServerError> {
    let (reader, mut writer) = self.stream.split();

    let json = serde_json::to_string(&request)?;
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;

    let mut reader = BufReader::new(reader);
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
      return Err(ServerError::Closed);
    }

    let response: Response = serde_json::from_str(&line)?;
    Ok(response)
  }

  /// Send a request with a method and params
  pub async fn call(&mut self, method: &str, params: serde_json::Value) -> Result<Response, ServerError> {
    static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
    let id = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);

    let request = Request {
      id: Some(serde_json::Value::Number(id.into())),
      method: method.to_string(),
      params,
    };

    self.request(request).await
  }
}
