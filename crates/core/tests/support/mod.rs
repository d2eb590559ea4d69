//! Scripted HTTP server for driving the client without a browser.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Clone)]
pub struct Recorded {
	pub method: String,
	pub path: String,
	pub body: String,
}

impl Recorded {
	pub fn json(&self) -> serde_json::Value {
		serde_json::from_str(&self.body).expect("recorded body is JSON")
	}
}

/// Answers each request with the next queued JSON body, or
/// `{"value":null}` once the queue runs dry, recording every request
/// it sees.
#[derive(Clone)]
pub struct MockServer {
	pub base: String,
	requests: Arc<Mutex<Vec<Recorded>>>,
	replies: Arc<Mutex<VecDeque<String>>>,
}

impl MockServer {
	pub async fn start(replies: &[&str]) -> Self {
		let _ = tracing_subscriber::fmt().compact().try_init();

		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let base = format!("http://{}", listener.local_addr().unwrap());
		let server = Self {
			base,
			requests: Arc::new(Mutex::new(Vec::new())),
			replies: Arc::new(Mutex::new(replies.iter().map(|s| s.to_string()).collect())),
		};

		let state = server.clone();
		tokio::spawn(async move {
			while let Ok((mut stream, _)) = listener.accept().await {
				let recorded = read_request(&mut stream).await;
				state.requests.lock().unwrap().push(recorded);
				let reply = state
					.replies
					.lock()
					.unwrap()
					.pop_front()
					.unwrap_or_else(|| r#"{"value":null}"#.to_string());
				let response = format!(
					"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
					reply.len(),
					reply,
				);
				let _ = stream.write_all(response.as_bytes()).await;
				let _ = stream.shutdown().await;
			}
		});

		server
	}

	/// Queues another canned reply body.
	pub fn enqueue(&self, body: &str) {
		self.replies.lock().unwrap().push_back(body.to_string());
	}

	pub fn requests(&self) -> Vec<Recorded> {
		self.requests.lock().unwrap().clone()
	}
}

async fn read_request(stream: &mut TcpStream) -> Recorded {
	let mut buf = Vec::new();
	let mut chunk = [0u8; 2048];
	let header_end = loop {
		if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
			break pos + 4;
		}
		match stream.read(&mut chunk).await {
			Ok(0) | Err(_) => break buf.len(),
			Ok(n) => buf.extend_from_slice(&chunk[..n]),
		}
	};

	let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
	let mut parts = head.lines().next().unwrap_or_default().split_whitespace();
	let method = parts.next().unwrap_or_default().to_string();
	let path = parts.next().unwrap_or_default().to_string();

	let content_length = head
		.lines()
		.find_map(|line| {
			let (name, value) = line.split_once(':')?;
			name.eq_ignore_ascii_case("content-length")
				.then(|| value.trim().parse::<usize>().ok())?
		})
		.unwrap_or(0);

	let mut body = buf[header_end..].to_vec();
	while body.len() < content_length {
		match stream.read(&mut chunk).await {
			Ok(0) | Err(_) => break,
			Ok(n) => body.extend_from_slice(&chunk[..n]),
		}
	}
	body.truncate(content_length);

	Recorded {
		method,
		path,
		body: String::from_utf8_lossy(&body).into_owned(),
	}
}
