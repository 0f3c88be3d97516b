//! Network throughput test
//!
//! Picks the configured server with the lowest latency, then times a
//! download and an upload of a fixed payload size against it. Servers are
//! expected to expose `/__down?bytes=N` and `/__up`.

use std::io::{self, Read};
use std::time::{Duration, Instant};

use reqwest::blocking::{Body, Client};
use tracing::{debug, info, warn};

use crate::config::SpeedTestSettings;
use crate::error::SpeedTestError;

const PING_SAMPLES: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct SpeedTestResult {
    pub server: String,
    pub ping_ms: f64,
    pub download_bps: f64,
    pub upload_bps: f64,
}

impl SpeedTestResult {
    pub fn download_mbps(&self) -> f64 {
        bps_to_mbps(self.download_bps)
    }

    pub fn upload_mbps(&self) -> f64 {
        bps_to_mbps(self.upload_bps)
    }
}

/// Bits per second to megabits per second, rounded to one decimal.
pub fn bps_to_mbps(bps: f64) -> f64 {
    (bps / 100_000.0).round() / 10.0
}

/// Bits per second for `bytes` moved in `elapsed`.
pub fn throughput_bps(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    bytes as f64 * 8.0 / secs
}

/// `bytes` zeroes, read lazily as the upload body.
pub fn zero_payload(bytes: u64) -> io::Take<io::Repeat> {
    io::repeat(0).take(bytes)
}

/// The reachable server with the lowest latency. Ties keep the first.
pub fn pick_best(latencies: &[(String, Option<f64>)]) -> Option<(&str, f64)> {
    latencies
        .iter()
        .filter_map(|(server, ms)| ms.map(|ms| (server.as_str(), ms)))
        .fold(None, |best, candidate| match best {
            Some((_, best_ms)) if best_ms <= candidate.1 => best,
            _ => Some(candidate),
        })
}

pub struct SpeedTest {
    client: Client,
    settings: SpeedTestSettings,
}

impl SpeedTest {
    pub fn new(settings: SpeedTestSettings) -> Result<Self, SpeedTestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(SpeedTestError::Client)?;
        Ok(Self { client, settings })
    }

    /// Run the full test: server selection, download, upload.
    pub fn run(&self) -> Result<SpeedTestResult, SpeedTestError> {
        if self.settings.servers.is_empty() {
            return Err(SpeedTestError::NoServers);
        }

        let latencies: Vec<(String, Option<f64>)> = self
            .settings
            .servers
            .iter()
            .map(|server| (server.clone(), self.latency_ms(server)))
            .collect();
        let (server, ping_ms) = pick_best(&latencies)
            .ok_or(SpeedTestError::Unreachable(self.settings.servers.len()))?;
        info!(server, ping_ms, "selected speed test server");

        let download_bps = self.download(server)?;
        let upload_bps = self.upload(server)?;

        Ok(SpeedTestResult {
            server: server.to_string(),
            ping_ms,
            download_bps,
            upload_bps,
        })
    }

    /// Best of a few round trips, or `None` if the server never answered.
    fn latency_ms(&self, server: &str) -> Option<f64> {
        let url = format!("{}/__down?bytes=0", server.trim_end_matches('/'));
        let mut best: Option<f64> = None;
        for _ in 0..PING_SAMPLES {
            let start = Instant::now();
            match self.client.get(&url).send().and_then(|r| r.error_for_status()) {
                Ok(_) => {
                    let ms = start.elapsed().as_secs_f64() * 1000.0;
                    best = Some(best.map_or(ms, |b| b.min(ms)));
                }
                Err(e) => {
                    warn!(server, error = %e, "latency check failed");
                    return None;
                }
            }
        }
        debug!(server, ?best, "latency measured");
        best.map(|ms| (ms * 1000.0).round() / 1000.0)
    }

    fn download(&self, server: &str) -> Result<f64, SpeedTestError> {
        let url = format!(
            "{}/__down?bytes={}",
            server.trim_end_matches('/'),
            self.settings.download_bytes
        );
        let http_err = |source| SpeedTestError::Http {
            url: url.clone(),
            source,
        };

        let start = Instant::now();
        let mut response = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(http_err)?;

        let mut buf = [0u8; 64 * 1024];
        let mut received = 0u64;
        loop {
            match response.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => received += n as u64,
                Err(e) => {
                    warn!(error = %e, "download interrupted");
                    break;
                }
            }
        }
        let bps = throughput_bps(received, start.elapsed());
        debug!(received, bps, "download finished");
        Ok(bps)
    }

    fn upload(&self, server: &str) -> Result<f64, SpeedTestError> {
        let url = format!("{}/__up", server.trim_end_matches('/'));
        let sent = self.settings.upload_bytes;

        let start = Instant::now();
        self.client
            .post(&url)
            .body(Body::sized(zero_payload(sent), sent))
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|source| SpeedTestError::Http {
                url: url.clone(),
                source,
            })?;
        let bps = throughput_bps(sent, start.elapsed());
        debug!(sent, bps, "upload finished");
        Ok(bps)
    }
}
