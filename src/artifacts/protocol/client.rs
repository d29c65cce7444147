//! Smart-HTTP client
//!
//! Two blocking exchanges against a repository URL, both pkt-line framed:
//! ref discovery (`GET .../info/refs?service=git-upload-pack`) and pack
//! negotiation (`POST .../git-upload-pack`). Any transport error or
//! malformed framing is fatal; nothing is retried.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::protocol::pkt_line::{self, PktLine, PktLineReader};
use crate::errors::GitError;
use bytes::Bytes;
use derive_new::new;

const UPLOAD_PACK_SERVICE: &str = "git-upload-pack";
const UPLOAD_PACK_CONTENT_TYPE: &str = "application/x-git-upload-pack-request";

/// Refuse to buffer responses beyond this size
const RESPONSE_SIZE_LIMIT: u64 = 256 * 1024 * 1024;

/// Side-band channel tags
const SIDE_BAND_DATA: u8 = 1;
const SIDE_BAND_PROGRESS: u8 = 2;
const SIDE_BAND_ERROR: u8 = 3;

/// One advertised ref: a name pointing at a commit hash
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Reference {
    pub oid: ObjectId,
    pub name: String,
}

/// Blocking smart-HTTP client for one remote repository
pub struct GitClient {
    url: String,
}

impl GitClient {
    pub fn new(url: &str) -> Self {
        GitClient {
            url: url.trim_end_matches('/').to_string(),
        }
    }

    /// Discover the remote's refs. The first entry is the clone target.
    pub fn fetch_references(&self) -> Result<Vec<Reference>, GitError> {
        let url = format!("{}/info/refs?service={UPLOAD_PACK_SERVICE}", self.url);
        let body = read_response(ureq::get(&url).call())?;

        parse_advertisement(&body)
    }

    /// Negotiate and download the pack for the wanted commit.
    pub fn fetch_pack(&self, want: &ObjectId) -> Result<Bytes, GitError> {
        let url = format!("{}/{UPLOAD_PACK_SERVICE}", self.url);

        let mut request_body = Vec::new();
        pkt_line::write_pkt_line(&mut request_body, &format!("want {want}\n"));
        pkt_line::write_flush(&mut request_body);
        pkt_line::write_pkt_line(&mut request_body, "done\n");

        let body = read_response(
            ureq::post(&url)
                .header("Content-Type", UPLOAD_PACK_CONTENT_TYPE)
                .send(&request_body[..]),
        )?;

        extract_pack_bytes(&body)
    }
}

fn read_response(
    result: Result<ureq::http::Response<ureq::Body>, ureq::Error>,
) -> Result<Vec<u8>, GitError> {
    let mut response =
        result.map_err(|err| GitError::TransportFailure(err.to_string()))?;

    response
        .body_mut()
        .with_config()
        .limit(RESPONSE_SIZE_LIMIT)
        .read_to_vec()
        .map_err(|err| GitError::TransportFailure(err.to_string()))
}

/// Parse a ref advertisement into `(hash, name)` pairs, skipping the leading
/// service announcement line and stopping at the terminating flush.
fn parse_advertisement(body: &[u8]) -> Result<Vec<Reference>, GitError> {
    let mut reader = PktLineReader::new(body);
    let mut references = Vec::new();

    while let Some(line) = reader.next_line()? {
        let payload = match line {
            PktLine::Data(payload) => payload,
            PktLine::Flush => {
                if references.is_empty() {
                    continue; // flush after the service announcement
                }
                break;
            }
        };

        if payload.starts_with(b"# service=") {
            continue;
        }

        // capabilities trail the first ref line after a NUL
        let payload = match payload.iter().position(|b| *b == 0) {
            Some(position) => &payload[..position],
            None => &payload[..],
        };
        let line = std::str::from_utf8(payload)
            .map_err(|_| GitError::TransportFailure("ref line is not UTF-8".to_string()))?
            .trim_end_matches('\n');

        let (hash, name) = line.split_once(' ').ok_or_else(|| {
            GitError::TransportFailure(format!("malformed ref line: {line}"))
        })?;
        references.push(Reference::new(
            ObjectId::try_parse(hash.to_string())
                .map_err(|_| GitError::TransportFailure(format!("malformed ref hash: {hash}")))?,
            name.to_string(),
        ));
    }

    Ok(references)
}

/// Strip the negotiation framing from an upload-pack response, leaving the
/// raw pack bytes: an optional leading `NAK`, then either the bare pack or
/// side-band frames multiplexing pack data with progress chatter.
fn extract_pack_bytes(body: &[u8]) -> Result<Bytes, GitError> {
    let mut reader = PktLineReader::new(body);
    let mut pack = Vec::new();

    loop {
        if pack.is_empty() && reader.remaining().starts_with(b"PACK") {
            pack.extend_from_slice(reader.remaining());
            break;
        }

        let Some(line) = reader.next_line()? else {
            break;
        };
        let payload = match line {
            PktLine::Data(payload) => payload,
            PktLine::Flush => continue,
        };

        if payload.as_ref() == b"NAK\n" || payload.as_ref() == b"NAK" {
            continue;
        }

        match payload.first() {
            Some(&SIDE_BAND_DATA) => pack.extend_from_slice(&payload[1..]),
            Some(&SIDE_BAND_PROGRESS) => continue,
            Some(&SIDE_BAND_ERROR) => {
                return Err(GitError::TransportFailure(format!(
                    "remote error: {}",
                    String::from_utf8_lossy(&payload[1..]).trim_end()
                )));
            }
            _ => {
                return Err(GitError::TransportFailure(
                    "unexpected frame in pack response".to_string(),
                ));
            }
        }
    }

    if !pack.starts_with(b"PACK") {
        return Err(GitError::TransportFailure(
            "response carries no pack data".to_string(),
        ));
    }

    Ok(Bytes::from(pack))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::protocol::pkt_line::{write_flush, write_pkt_line};

    fn sample_oid(tag: &[u8]) -> ObjectId {
        ObjectId::digest(tag)
    }

    #[test]
    fn advertisement_skips_announcement_and_collects_refs() {
        let head = sample_oid(b"head");
        let branch = sample_oid(b"branch");

        let mut body = Vec::new();
        write_pkt_line(&mut body, "# service=git-upload-pack\n");
        write_flush(&mut body);
        write_pkt_line(
            &mut body,
            &format!("{head} HEAD\0multi_ack side-band-64k\n"),
        );
        write_pkt_line(&mut body, &format!("{branch} refs/heads/master\n"));
        write_flush(&mut body);

        let references = parse_advertisement(&body).unwrap();
        pretty_assertions::assert_eq!(
            references,
            vec![
                Reference::new(head, "HEAD".to_string()),
                Reference::new(branch, "refs/heads/master".to_string()),
            ]
        );
    }

    #[test]
    fn advertisement_with_garbage_hash_fails() {
        let mut body = Vec::new();
        write_pkt_line(&mut body, "nothex HEAD\n");
        write_flush(&mut body);

        assert!(matches!(
            parse_advertisement(&body),
            Err(GitError::TransportFailure(_))
        ));
    }

    #[test]
    fn pack_after_nak_is_extracted() {
        let mut body = Vec::new();
        write_pkt_line(&mut body, "NAK\n");
        body.extend_from_slice(b"PACKcontents");

        let pack = extract_pack_bytes(&body).unwrap();
        pretty_assertions::assert_eq!(&pack[..], b"PACKcontents");
    }

    #[test]
    fn side_band_frames_are_demultiplexed() {
        let mut body = Vec::new();
        write_pkt_line(&mut body, "NAK\n");

        let mut data_frame = vec![1u8];
        data_frame.extend_from_slice(b"PACKcon");
        body.extend_from_slice(format!("{:04x}", data_frame.len() + 4).as_bytes());
        body.extend_from_slice(&data_frame);

        let mut progress_frame = vec![2u8];
        progress_frame.extend_from_slice(b"Counting objects\r");
        body.extend_from_slice(format!("{:04x}", progress_frame.len() + 4).as_bytes());
        body.extend_from_slice(&progress_frame);

        let mut data_frame = vec![1u8];
        data_frame.extend_from_slice(b"tents");
        body.extend_from_slice(format!("{:04x}", data_frame.len() + 4).as_bytes());
        body.extend_from_slice(&data_frame);

        write_flush(&mut body);

        let pack = extract_pack_bytes(&body).unwrap();
        pretty_assertions::assert_eq!(&pack[..], b"PACKcontents");
    }

    #[test]
    fn side_band_error_channel_is_fatal() {
        let mut body = Vec::new();
        let mut error_frame = vec![3u8];
        error_frame.extend_from_slice(b"access denied");
        body.extend_from_slice(format!("{:04x}", error_frame.len() + 4).as_bytes());
        body.extend_from_slice(&error_frame);

        assert!(matches!(
            extract_pack_bytes(&body),
            Err(GitError::TransportFailure(_))
        ));
    }

    #[test]
    fn response_without_pack_fails() {
        let mut body = Vec::new();
        write_pkt_line(&mut body, "NAK\n");
        write_flush(&mut body);

        assert!(matches!(
            extract_pack_bytes(&body),
            Err(GitError::TransportFailure(_))
        ));
    }
}
