// Raw TCP reachability probe for the management server

use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::{Instant, timeout};
use tracing::debug;
use url::Url;

use crate::config::PingConfig;
use crate::error::CoreError;

/// Average connect latency to the server in milliseconds (at least 1).
///
/// An attempt that exceeds `cfg.timeout` ends the probe and yields the
/// timeout itself in milliseconds. A refused connection or unresolvable
/// host is an error.
pub async fn ping(url: &Url, cfg: &PingConfig) -> Result<u64, CoreError> {
    let host = url.host_str().ok_or_else(|| CoreError::Config {
        message: format!("server URL has no host: {url}"),
    })?;
    let port = cfg
        .port
        .or_else(|| url.port_or_known_default())
        .ok_or_else(|| CoreError::Config {
            message: format!("no port for {url}"),
        })?;
    let target = format!("{host}:{port}");
    let attempts = cfg.attempts.max(1);

    let mut total = Duration::ZERO;
    for attempt in 1..=attempts {
        let started = Instant::now();
        match timeout(cfg.timeout, TcpStream::connect((host, port))).await {
            Err(_) => {
                debug!(%target, attempt, "ping timed out");
                return Ok(millis(cfg.timeout));
            }
            Ok(Err(e)) => {
                return Err(CoreError::TransportTimeout {
                    target,
                    reason: e.to_string(),
                });
            }
            Ok(Ok(_stream)) => total += started.elapsed(),
        }
    }

    let average = millis(total) / u64::from(attempts);
    debug!(%target, attempts, average_ms = average, "ping complete");
    Ok(average.max(1))
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio::net::TcpListener;

    use super::*;

    #[tokio::test]
    async fn reachable_listener_reports_latency() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = Url::parse("https://127.0.0.1").unwrap();
        let cfg = PingConfig {
            port: Some(port),
            attempts: 3,
            timeout: Duration::from_secs(2),
        };
        let ms = ping(&url, &cfg).await.unwrap();
        assert!(ms >= 1);
        assert!(ms < 2000);
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let url = Url::parse(&format!("http://127.0.0.1:{port}")).unwrap();
        let err = ping(&url, &PingConfig::default()).await.unwrap_err();
        assert!(matches!(err, CoreError::TransportTimeout { .. }));
    }

    #[tokio::test]
    async fn url_without_host_is_config_error() {
        let url = Url::parse("mailto:nobody@example.com").unwrap();
        let err = ping(&url, &PingConfig::default()).await.unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));
    }
}
