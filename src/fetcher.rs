use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::StatusCode;
use std::time::Duration;
use log::{info, warn, error};

use crate::config::{self, Config};
use crate::delay_manager::DelayRange;
use crate::error::{Error, FetchError};

/// Anything that can hand the pipeline the raw markup of a page.
pub trait PageSource {
    fn fetch(&self, identifier: &str) -> Result<String, FetchError>;
}

/// Fetches script-reference pages over HTTP, one candidate URL at a time.
pub struct DocsFetcher {
    client: Client,
    base_url: String,
    namespace_prefix: String,
    delay: DelayRange,
}

impl DocsFetcher {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(headers)
            .cookie_store(true)
            .build()?;

        Ok(DocsFetcher {
            client,
            base_url: config.base_url.clone(),
            namespace_prefix: config.namespace_prefix.clone(),
            delay: config.delay,
        })
    }

    /// URLs to try for `identifier`, in order.
    ///
    /// A namespaced identifier is tried with the namespace prefix stripped
    /// first, then as given.
    pub fn candidate_urls(&self, identifier: &str) -> Vec<String> {
        let mut urls = Vec::new();
        if identifier.contains('.') && !self.namespace_prefix.is_empty() {
            if let Some(stripped) = identifier.strip_prefix(self.namespace_prefix.as_str()) {
                if !stripped.is_empty() {
                    urls.push(config::page_url(&self.base_url, stripped));
                }
            }
        }
        let full = config::page_url(&self.base_url, identifier);
        if !urls.contains(&full) {
            urls.push(full);
        }
        urls
    }

    fn try_candidates(&self, identifier: &str) -> Result<String, FetchError> {
        let mut last_error = FetchError::NotFound {
            identifier: identifier.to_string(),
        };

        for url in self.candidate_urls(identifier) {
            info!("Fetching: {}", url);
            match self.visit_page(&url) {
                Ok(html) => return Ok(html),
                Err(FetchError::Status { status, .. })
                    if status == StatusCode::NOT_FOUND.as_u16() =>
                {
                    warn!("URL not found: {}", url);
                }
                Err(e) => {
                    error!("Error fetching {}: {}", url, e);
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    fn visit_page(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.client.get(url).send().map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        resp.text().map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })
    }
}

impl PageSource for DocsFetcher {
    /// Every call waits out a sampled delay before returning, whatever the outcome.
    fn fetch(&self, identifier: &str) -> Result<String, FetchError> {
        let result = self.try_candidates(identifier);
        if let Err(e) = &result {
            warn!("Giving up on {}: {}", identifier, e);
        }
        self.delay.wait();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Instant;

    type SeenPaths = Arc<Mutex<Vec<String>>>;

    /// Serves `routes` (path -> status, body) on a local port; everything
    /// else is a 404. Records every requested path.
    fn serve(routes: Vec<(&'static str, u16, &'static str)>) -> (String, SeenPaths) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_by_server = Arc::clone(&seen);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut chunk) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&buf);
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                seen_by_server.lock().unwrap().push(path.clone());

                let (status, body) = routes
                    .iter()
                    .find(|(p, _, _)| *p == path)
                    .map(|(_, s, b)| (*s, *b))
                    .unwrap_or((404, "missing"));
                let response = format!(
                    "HTTP/1.1 {} X\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        (format!("http://{}/ref", addr), seen)
    }

    fn fetcher(base_url: &str) -> DocsFetcher {
        fetcher_with_delay(base_url, DelayRange::none())
    }

    fn fetcher_with_delay(base_url: &str, delay: DelayRange) -> DocsFetcher {
        let config = Config {
            base_url: base_url.to_string(),
            delay,
            ..Config::default()
        };
        DocsFetcher::new(&config).unwrap()
    }

    fn closed_port_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/ref", addr)
    }

    const FIXED_DELAY: Duration = Duration::from_millis(50);

    fn fixed_delay() -> DelayRange {
        DelayRange::new(0.05, 0.05)
    }

    #[test]
    fn plain_identifier_has_one_candidate() {
        let f = fetcher("https://docs.unity3d.com/ScriptReference");
        assert_eq!(
            f.candidate_urls("Camera"),
            vec!["https://docs.unity3d.com/ScriptReference/Camera.html"]
        );
    }

    #[test]
    fn namespaced_identifier_tries_stripped_form_first() {
        let f = fetcher("https://docs.unity3d.com/ScriptReference");
        assert_eq!(
            f.candidate_urls("UnityEngine.Accessibility.AccessibilityNode"),
            vec![
                "https://docs.unity3d.com/ScriptReference/Accessibility.AccessibilityNode.html",
                concat!(
                    "https://docs.unity3d.com/ScriptReference/",
                    "UnityEngine.Accessibility.AccessibilityNode.html"
                ),
            ]
        );
        assert_eq!(
            f.candidate_urls("Rendering.CommandBuffer"),
            vec!["https://docs.unity3d.com/ScriptReference/Rendering.CommandBuffer.html"]
        );
    }

    #[test]
    fn falls_through_not_found_to_next_candidate() {
        let (base, seen) = serve(vec![("/ref/UnityEngine.Foo.Bar.html", 200, "<p>ok</p>")]);
        let html = fetcher(&base).fetch("UnityEngine.Foo.Bar").unwrap();
        assert_eq!(html, "<p>ok</p>");
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["/ref/Foo.Bar.html".to_string(), "/ref/UnityEngine.Foo.Bar.html".to_string()]
        );
    }

    #[test]
    fn server_error_is_swallowed_for_next_candidate() {
        let (base, _) = serve(vec![
            ("/ref/Foo.Bar.html", 500, "boom"),
            ("/ref/UnityEngine.Foo.Bar.html", 200, "second"),
        ]);
        assert_eq!(fetcher(&base).fetch("UnityEngine.Foo.Bar").unwrap(), "second");
    }

    #[test]
    fn all_missing_is_not_found() {
        let (base, _) = serve(vec![]);
        match fetcher(&base).fetch("Nope") {
            Err(FetchError::NotFound { identifier }) => assert_eq!(identifier, "Nope"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn last_non_404_failure_is_reported() {
        let (base, _) = serve(vec![("/ref/Broken.html", 503, "down")]);
        match fetcher(&base).fetch("Broken") {
            Err(FetchError::Status { status, .. }) => assert_eq!(status, 503),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn transport_failure_is_an_error_not_a_panic() {
        let result = fetcher(&closed_port_url()).fetch("Camera");
        assert!(matches!(result, Err(FetchError::Transport { .. })));
    }

    #[test]
    fn successful_fetch_waits_before_returning() {
        let (base, _) = serve(vec![("/ref/Camera.html", 200, "ok")]);
        let f = fetcher_with_delay(&base, fixed_delay());
        let started = Instant::now();
        assert_eq!(f.fetch("Camera").unwrap(), "ok");
        assert!(started.elapsed() >= FIXED_DELAY);
    }

    #[test]
    fn not_found_fetch_still_waits() {
        let (base, _) = serve(vec![]);
        let f = fetcher_with_delay(&base, fixed_delay());
        let started = Instant::now();
        assert!(matches!(f.fetch("Nope"), Err(FetchError::NotFound { .. })));
        assert!(started.elapsed() >= FIXED_DELAY);
    }

    #[test]
    fn unreachable_host_still_waits() {
        let f = fetcher_with_delay(&closed_port_url(), fixed_delay());
        let started = Instant::now();
        assert!(f.fetch("Camera").is_err());
        assert!(started.elapsed() >= FIXED_DELAY);
    }

    #[test]
    fn invalid_user_agent_is_rejected() {
        let config = Config {
            user_agent: "bad\nagent".to_string(),
            ..Config::default()
        };
        assert!(matches!(DocsFetcher::new(&config), Err(Error::InvalidHeader(_))));
    }
}
