//! HTTP access to the music server.

use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use crate::config::ServerSettings;
use crate::error::{CatalogError, CatalogResult};

/// Read-only access to paths on the music server.
///
/// Paths are absolute server paths such as `/songs/Anuv/info.json`, already
/// percent-encoded.
pub trait Fetch: Send + Sync {
    /// Absolute URL for `path`, used to resolve relative links in listings.
    fn url_for(&self, path: &str) -> CatalogResult<Url>;

    fn get_text(&self, path: &str) -> CatalogResult<String>;

    /// Whole body of an audio file.
    fn get_bytes(&self, path: &str) -> CatalogResult<Vec<u8>>;
}

/// [`Fetch`] over blocking `reqwest` clients.
///
/// Listings and metadata share one total timeout. Audio downloads can take
/// far longer, so they only get a connect timeout unless
/// `audio_timeout_ms` is set.
pub struct HttpFetcher {
    client: Client,
    audio_client: Client,
    base: Url,
}

impl HttpFetcher {
    pub fn new(settings: &ServerSettings) -> CatalogResult<Self> {
        let mut base = Url::parse(&settings.base_url)?;
        // `Url::join` drops the last segment unless the base ends with a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let timeout = Duration::from_millis(settings.timeout_ms);
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(settings.user_agent.clone())
            .build()?;
        let audio_client = Client::builder()
            .connect_timeout(timeout)
            .timeout(settings.audio_timeout_ms.map(Duration::from_millis))
            .user_agent(settings.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            audio_client,
            base,
        })
    }

    fn get(&self, client: &Client, path: &str) -> CatalogResult<reqwest::blocking::Response> {
        let url = self.url_for(path)?;
        tracing::debug!(%url, "GET");
        let resp = client.get(url.clone()).send()?;
        if !resp.status().is_success() {
            return Err(CatalogError::Status {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }
        Ok(resp)
    }
}

impl Fetch for HttpFetcher {
    fn url_for(&self, path: &str) -> CatalogResult<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    fn get_text(&self, path: &str) -> CatalogResult<String> {
        Ok(self.get(&self.client, path)?.text()?)
    }

    fn get_bytes(&self, path: &str) -> CatalogResult<Vec<u8>> {
        Ok(self.get(&self.audio_client, path)?.bytes()?.to_vec())
    }
}

/// In-memory [`Fetch`] used by tests. Unknown paths answer `NotFound`.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryFetcher {
    files: std::collections::HashMap<String, Vec<u8>>,
    requests: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MemoryFetcher {
    pub fn with(mut self, path: &str, body: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.to_string(), body.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Fetch for MemoryFetcher {
    fn url_for(&self, path: &str) -> CatalogResult<Url> {
        Ok(Url::parse("http://music.test/")?.join(path.trim_start_matches('/'))?)
    }

    fn get_text(&self, path: &str) -> CatalogResult<String> {
        let bytes = self.get_bytes(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn get_bytes(&self, path: &str) -> CatalogResult<Vec<u8>> {
        self.requests.lock().unwrap().push(path.to_string());
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn settings(base: &str) -> ServerSettings {
        ServerSettings {
            base_url: base.to_string(),
            ..ServerSettings::default()
        }
    }

    #[test]
    fn url_for_joins_onto_base_with_or_without_trailing_slash() {
        let f = HttpFetcher::new(&settings("http://localhost:5500/music")).unwrap();
        assert_eq!(
            f.url_for("/songs/Anuv/info.json").unwrap().as_str(),
            "http://localhost:5500/music/songs/Anuv/info.json"
        );

        let f = HttpFetcher::new(&settings("http://localhost:5500/")).unwrap();
        assert_eq!(
            f.url_for("/songs/").unwrap().as_str(),
            "http://localhost:5500/songs/"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            HttpFetcher::new(&settings("not a url")),
            Err(CatalogError::Url(_))
        ));
    }

    /// Serve `requests` connections, each answering with a six-byte body
    /// sent in three chunks `gap` apart.
    fn slow_server(requests: usize, gap: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            for stream in listener.incoming().take(requests) {
                let mut stream = stream.unwrap();
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 6\r\n\r\n");
                for chunk in [b"ab", b"cd", b"ef"] {
                    let _ = stream.flush();
                    thread::sleep(gap);
                    if stream.write_all(chunk).is_err() {
                        break;
                    }
                }
            }
        });
        format!("http://{addr}/")
    }

    #[test]
    fn audio_downloads_outlive_the_listing_timeout() {
        let base = slow_server(2, Duration::from_millis(250));
        let f = HttpFetcher::new(&ServerSettings {
            base_url: base,
            timeout_ms: 300,
            ..ServerSettings::default()
        })
        .unwrap();

        assert_eq!(f.get_bytes("/songs/A/slow.mp3").unwrap(), b"abcdef".to_vec());
        assert!(f.get_text("/songs/A/info.json").is_err());
    }

    #[test]
    fn audio_timeout_bounds_downloads_when_set() {
        let base = slow_server(1, Duration::from_millis(250));
        let f = HttpFetcher::new(&ServerSettings {
            base_url: base,
            timeout_ms: 300,
            audio_timeout_ms: Some(300),
            ..ServerSettings::default()
        })
        .unwrap();

        assert!(f.get_bytes("/songs/A/slow.mp3").is_err());
    }

    #[test]
    fn memory_fetcher_records_requests_and_misses() {
        let f = MemoryFetcher::default().with("/a", "x");
        assert_eq!(f.get_text("/a").unwrap(), "x");
        assert!(matches!(f.get_text("/b"), Err(CatalogError::NotFound(_))));
        assert_eq!(f.requests(), vec!["/a".to_string(), "/b".to_string()]);
    }
}
