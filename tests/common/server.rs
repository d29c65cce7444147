//! Loopback smart-HTTP fixture server
//!
//! Serves a canned ref advertisement and upload-pack response over a real
//! TCP socket so clone tests exercise the actual HTTP client.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};

/// Start a server answering the two smart-protocol requests with the given
/// bodies. Returns the base URL to clone from.
pub fn spawn_smart_http_server(advertisement: Vec<u8>, pack_response: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("binding fixture server");
    let port = listener.local_addr().expect("fixture server address").port();

    std::thread::spawn(move || {
        // one connection per exchange; the pack response ends the server
        for stream in listener.incoming().flatten().take(8) {
            match handle_connection(stream, &advertisement, &pack_response) {
                Ok(true) => break,
                _ => continue,
            }
        }
    });

    format!("http://127.0.0.1:{port}/fixture.git")
}

fn handle_connection(
    stream: TcpStream,
    advertisement: &[u8],
    pack_response: &[u8],
) -> std::io::Result<bool> {
    let mut reader = BufReader::new(stream.try_clone()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;

    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header)?;
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some(value) = header
            .to_ascii_lowercase()
            .strip_prefix("content-length:")
            .map(str::trim)
        {
            content_length = value.parse().unwrap_or(0);
        }
    }

    if content_length > 0 {
        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body)?;
    }

    let mut stream = stream;
    if request_line.starts_with("GET") && request_line.contains("/info/refs") {
        write_response(
            &mut stream,
            "application/x-git-upload-pack-advertisement",
            advertisement,
        )?;
        Ok(false)
    } else if request_line.starts_with("POST") && request_line.contains("/git-upload-pack") {
        write_response(
            &mut stream,
            "application/x-git-upload-pack-result",
            pack_response,
        )?;
        Ok(true)
    } else {
        stream.write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")?;
        Ok(false)
    }
}

fn write_response(
    stream: &mut TcpStream,
    content_type: &str,
    body: &[u8],
) -> std::io::Result<()> {
    write!(
        stream,
        "HTTP/1.1 200 OK\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    )?;
    stream.write_all(body)?;
    stream.flush()
}

/// Frame a payload as a pkt-line
pub fn pkt_line(payload: &str) -> Vec<u8> {
    let mut line = format!("{:04x}", payload.len() + 4).into_bytes();
    line.extend_from_slice(payload.as_bytes());
    line
}

pub fn flush_pkt() -> Vec<u8> {
    b"0000".to_vec()
}

/// Standard two-ref advertisement pointing HEAD and master at one commit
pub fn advertisement_for(commit_oid: &str) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend(pkt_line("# service=git-upload-pack\n"));
    body.extend(flush_pkt());
    body.extend(pkt_line(&format!(
        "{commit_oid} HEAD\0multi_ack side-band-64k agent=fixture\n"
    )));
    body.extend(pkt_line(&format!("{commit_oid} refs/heads/master\n")));
    body.extend(flush_pkt());
    body
}

/// Upload-pack response: NAK then the bare pack bytes
pub fn pack_response_for(pack: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend(pkt_line("NAK\n"));
    body.extend_from_slice(pack);
    body
}
