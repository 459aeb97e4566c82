//! Standalone users and echo service for trying generated clients by hand.
//!
//! `MOCK_HOST` and `MOCK_PORT` pick the bind address (default
//! `127.0.0.1:3000`); port 0 asks the OS for a free one.

use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let host = std::env::var("MOCK_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("MOCK_PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(3000);
    let listener = TcpListener::bind((host.as_str(), port)).await?;
    let addr = listener.local_addr()?;
    println!("mock users service on http://{addr}");
    println!("  /users  /users/{{id}}  /users/{{id}}/bio  /echo/*");
    mock_server::run(listener).await
}
