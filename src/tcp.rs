use crate::err::{AppliesTo, IoErrorExt};
use std::io;
use tokio::net::{TcpListener, TcpStream};

pub async fn accept(listener: &mut TcpListener) -> Result<TcpStream, io::Error> {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                log::debug!("Accepted connection from {}", addr);
                stream.set_nodelay(true)?;
                return Ok(stream);
            }
            Err(e) => match e.applies_to() {
                AppliesTo::Connection => log::debug!("Aborted connection dropped: {}", e),
                AppliesTo::Listener => return Err(e),
            },
        }
    }
}
