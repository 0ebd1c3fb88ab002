//! # Handle de Conexión
//! src/server/connection.rs
//!
//! Una conexión aceptada viaja por valor: accept loop → cola → un worker.
//! El worker la consume en el handler y el socket se cierra al soltarla, así
//! que se cierra exactamente una vez en cualquier camino.

use std::io;
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

/// Conexión aceptada junto con la dirección del peer
#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
}

impl Connection {
    pub fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        Self { stream, peer }
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Aplica el mismo timeout a lectura y escritura (`None` = bloqueante)
    pub fn set_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        self.stream.set_read_timeout(timeout)?;
        self.stream.set_write_timeout(timeout)
    }

    /// Separa el socket de la dirección del peer
    pub fn into_parts(self) -> (TcpStream, SocketAddr) {
        (self.stream, self.peer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpListener;

    #[test]
    fn test_new_keeps_accepted_peer() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let client = TcpStream::connect(addr).unwrap();
        let (stream, peer) = listener.accept().unwrap();

        let conn = Connection::new(stream, peer);
        assert_eq!(conn.peer(), peer);
        assert_eq!(conn.peer(), client.local_addr().unwrap());
    }

    #[test]
    fn test_drop_closes_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let mut client = TcpStream::connect(addr).unwrap();
        let (stream, peer) = listener.accept().unwrap();

        drop(Connection::new(stream, peer));

        // El peer ve EOF
        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_set_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let _client = TcpStream::connect(addr).unwrap();
        let (stream, peer) = listener.accept().unwrap();
        let conn = Connection::new(stream, peer);

        conn.set_timeout(Some(Duration::from_millis(250))).unwrap();
        let (stream, _) = conn.into_parts();
        // El kernel redondea al tick, así que puede volver un poco mayor
        let read = stream.read_timeout().unwrap().unwrap();
        let write = stream.write_timeout().unwrap().unwrap();
        assert!(read >= Duration::from_millis(250) && read < Duration::from_secs(1));
        assert!(write >= Duration::from_millis(250) && write < Duration::from_secs(1));
    }
}
