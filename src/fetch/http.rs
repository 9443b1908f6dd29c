use reqwest::blocking::Client;

use super::{decode_records, FetchError, FetchGateway, FetchResult};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Fetches the record array from a JSON endpoint with a single GET.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    url: String,
}

impl HttpGateway {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    fn transport_error(&self, source: reqwest::Error) -> FetchError {
        FetchError::Transport {
            url: self.url.clone(),
            source,
        }
    }
}

impl FetchGateway for HttpGateway {
    fn fetch_records(&self) -> FetchResult {
        // Built per fetch: the blocking client owns a runtime and must live on
        // the worker thread.
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| self.transport_error(err))?;

        let response = client
            .get(&self.url)
            .send()
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status,
            });
        }

        let body = response.bytes().map_err(|err| self.transport_error(err))?;
        decode_records(&self.url, &body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one canned HTTP response on a random local port.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
        });
        format!("http://{addr}/hiring.json")
    }

    #[test]
    fn test_fetches_record_array() {
        let url = serve_once(
            "HTTP/1.1 200 OK",
            r#"[{"id": 684, "listId": 1, "name": "Item 684"}, {"id": 7, "listId": 1, "name": null}]"#,
        );
        let records = HttpGateway::new(url).fetch_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name.as_deref(), Some("Item 684"));
        assert_eq!(records[1].name, None);
    }

    #[test]
    fn test_non_success_status_is_error() {
        let url = serve_once("HTTP/1.1 503 Service Unavailable", "");
        let err = HttpGateway::new(url).fetch_records().unwrap_err();
        match err {
            FetchError::Status { status, .. } => assert_eq!(status.as_u16(), 503),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_null_body_is_empty() {
        let url = serve_once("HTTP/1.1 200 OK", "null");
        assert!(HttpGateway::new(url).fetch_records().unwrap().is_empty());
    }

    #[test]
    fn test_unreachable_host_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = HttpGateway::new(format!("http://{addr}/"))
            .fetch_records()
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }
}
