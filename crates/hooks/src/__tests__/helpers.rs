//! Test helpers: a one-shot HTTP responder and an in-memory hook source.

use crate::{HookError, HookSource, RawHookResponse};
use async_trait::async_trait;
use sentiment_core::HookDescriptor;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// How long a silent server holds its connection
pub const STALL: Duration = Duration::from_secs(5);

/// A listener that answers exactly one request with a canned response.
pub struct OneShotServer {
  pub base_url: String,
  handle: JoinHandle<String>,
}

impl OneShotServer {
  /// The raw request head the server received.
  pub async fn request(self) -> String {
    self.handle.await.expect("server task panicked")
  }
}

pub async fn serve_once(status: &str, body: &str) -> OneShotServer {
  let response = format!(
    "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
    status,
    body.len(),
    body
  );
  serve_raw(Some(response)).await
}

/// Answer one request with exactly `response`, or with nothing at all.
///
/// With `None` the connection is held open without a reply until [`STALL`] passes.
pub async fn serve_raw(response: Option<String>) -> OneShotServer {
  let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
  let addr = listener.local_addr().expect("listener addr");

  let handle = tokio::spawn(async move {
    let (mut stream, _) = listener.accept().await.expect("accept");
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
      let n = stream.read(&mut chunk).await.expect("read request");
      if n == 0 {
        break;
      }
      head.extend_from_slice(&chunk[..n]);
      if head.windows(4).any(|w| w == b"\r\n\r\n") {
        break;
      }
    }
    match response {
      Some(response) => {
        // The client may already have given up on a short body
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
      }
      None => tokio::time::sleep(STALL).await,
    }
    String::from_utf8_lossy(&head).into_owned()
  });

  OneShotServer {
    base_url: format!("http://{}", addr),
    handle,
  }
}

/// Hook source returning a fixed body and recording what it was asked for.
pub struct StubSource {
  body: Vec<u8>,
  calls: AtomicUsize,
  records: Mutex<Vec<String>>,
}

impl StubSource {
  pub fn new(body: &str) -> Self {
    Self {
      body: body.as_bytes().to_vec(),
      calls: AtomicUsize::new(0),
      records: Mutex::new(Vec::new()),
    }
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  pub fn records(&self) -> Vec<String> {
    self.records.lock().expect("records lock").clone()
  }
}

#[async_trait]
impl HookSource for StubSource {
  async fn fetch(&self, _hook: &HookDescriptor, record_id: &str) -> Result<RawHookResponse, HookError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.records.lock().expect("records lock").push(record_id.to_string());
    Ok(RawHookResponse::from_body(self.body.clone()))
  }
}
