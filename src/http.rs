/// Shared HTTP client construction

use reqwest::blocking::{Client, Response};
use std::time::Duration;

use crate::error::{SuiteError, SuiteResult};

const USER_AGENT: &str = concat!("image-suite/", env!("CARGO_PKG_VERSION"));

/// Blocking client with a fixed per-request timeout
pub fn client(timeout: Duration) -> SuiteResult<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(SuiteError::from)
}

/// Pass 200 responses through; anything else becomes an API error carrying the body
pub fn expect_ok(service: &'static str, response: Response) -> SuiteResult<Response> {
    if response.status() == reqwest::StatusCode::OK {
        return Ok(response);
    }
    let status = response.status();
    let body = response
        .text()
        .unwrap_or_else(|_| format!("HTTP {}", status));
    Err(SuiteError::Api { service, body })
}

/// Join a base URL and a path without doubling slashes
pub fn join(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// One-shot local HTTP server for tests
#[cfg(test)]
pub(crate) mod stub {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Drain one request (headers plus a sized or chunked body)
    fn read_request(reader: &mut impl BufRead) -> std::io::Result<()> {
        let mut content_length = 0usize;
        let mut chunked = false;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 || line == "\r\n" {
                break;
            }
            let lower = line.to_ascii_lowercase();
            if let Some(value) = lower.strip_prefix("content-length:") {
                content_length = value.trim().parse().unwrap_or(0);
            } else if lower.starts_with("transfer-encoding:") && lower.contains("chunked") {
                chunked = true;
            }
        }

        if chunked {
            loop {
                let mut size = String::new();
                reader.read_line(&mut size)?;
                let size = usize::from_str_radix(size.trim(), 16).unwrap_or(0);
                let mut chunk = vec![0; size + 2];
                reader.read_exact(&mut chunk)?;
                if size == 0 {
                    break;
                }
            }
        } else {
            let mut body = vec![0; content_length];
            reader.read_exact(&mut body)?;
        }
        Ok(())
    }

    /// Answer the first request with `status` (e.g. "402 Payment Required") and `body`;
    /// returns the base URL
    pub fn respond_once(status: &'static str, body: impl Into<Vec<u8>>) -> String {
        let body = body.into();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                let mut reader = BufReader::new(stream);
                let _ = read_request(&mut reader);
                let mut stream = reader.into_inner();
                let _ = write!(
                    stream,
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status,
                    body.len()
                );
                let _ = stream.write_all(&body);
                let _ = stream.flush();
            }
        });
        format!("http://{}", addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join() {
        assert_eq!(
            join("https://api.openai.com/", "/v1/images/generations"),
            "https://api.openai.com/v1/images/generations"
        );
        assert_eq!(join("http://localhost:8080", "v1/messages"), "http://localhost:8080/v1/messages");
    }

    #[test]
    fn test_client_builds() {
        assert!(client(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_expect_ok_carries_error_body() {
        let base = stub::respond_once("429 Too Many Requests", "slow down");
        let response = client(Duration::from_secs(5))
            .unwrap()
            .get(join(&base, "/anything"))
            .send()
            .unwrap();

        let err = expect_ok("OpenAI", response).unwrap_err();
        assert!(
            matches!(&err, SuiteError::Api { service: "OpenAI", body } if body == "slow down"),
            "{:?}",
            err
        );
    }

    #[test]
    fn test_expect_ok_passes_success() {
        let base = stub::respond_once("200 OK", "fine");
        let response = client(Duration::from_secs(5))
            .unwrap()
            .get(&base)
            .send()
            .unwrap();
        assert_eq!(expect_ok("OpenAI", response).unwrap().text().unwrap(), "fine");
    }
}
