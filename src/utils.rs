use std::{io::ErrorKind, path::Path};

use chrono::{FixedOffset, Offset, Utc};

use crate::{
    constants::{DISPLAY_UTC_OFFSET_SECS, TIMESTAMP_FORMAT},
    errors::{Error, Result},
    proxy::ProxyDescriptor,
};

/// Non-empty, trimmed lines of a text file.
pub async fn read_file_lines(path: impl AsRef<Path>) -> std::io::Result<Vec<String>> {
    let contents = tokio::fs::read_to_string(path).await?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

pub async fn read_tokens(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let tokens = read_file_lines(path).await.map_err(|e| {
        Error::Startup(format!("failed to read tokens file {}: {e}", path.display()))
    })?;

    if tokens.is_empty() {
        return Err(Error::Startup(format!(
            "no valid tokens found in {}",
            path.display()
        )));
    }

    Ok(tokens)
}

/// A missing proxies file means direct connection mode. Any malformed line aborts.
pub async fn read_proxies(path: impl AsRef<Path>) -> Result<Vec<ProxyDescriptor>> {
    let path = path.as_ref();
    let lines = match read_file_lines(path).await {
        Ok(lines) => lines,
        Err(e) => {
            if e.kind() == ErrorKind::NotFound {
                tracing::info!("{} not found, using direct connection mode", path.display());
            } else {
                tracing::warn!(
                    "Failed to read {}: {e}. Using direct connection mode",
                    path.display()
                );
            }
            return Ok(vec![]);
        }
    };

    lines
        .iter()
        .map(String::as_str)
        .map(ProxyDescriptor::parse)
        .collect()
}

pub fn display_offset() -> FixedOffset {
    FixedOffset::east_opt(DISPLAY_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Current UTC+8 time of day, e.g. `21:04:59`.
pub fn timestamp() -> String {
    Utc::now()
        .with_timezone(&display_offset())
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

#[cfg(test)]
pub(crate) fn is_timestamp(s: &str) -> bool {
    chrono::NaiveTime::parse_from_str(s, TIMESTAMP_FORMAT).is_ok() && s.len() == 8
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn file_with(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn reads_tokens_skipping_blank_lines() {
        let file = file_with("tok-a\n\n  tok-b  \r\n\n");
        let tokens = read_tokens(file.path()).await.unwrap();

        assert_eq!(tokens, vec!["tok-a", "tok-b"]);
    }

    #[tokio::test]
    async fn blank_tokens_file_is_startup_error() {
        let file = file_with("\n \n");
        let err = read_tokens(file.path()).await.unwrap_err();

        assert!(matches!(err, Error::Startup(_)));
    }

    #[tokio::test]
    async fn missing_tokens_file_is_startup_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_tokens(dir.path().join("tokens.txt")).await.unwrap_err();

        assert!(matches!(err, Error::Startup(_)));
    }

    #[tokio::test]
    async fn missing_proxies_file_means_direct_mode() {
        let dir = tempfile::tempdir().unwrap();
        let proxies = read_proxies(dir.path().join("proxies.txt")).await.unwrap();

        assert!(proxies.is_empty());
    }

    #[tokio::test]
    async fn reads_proxies_in_order() {
        let file = file_with("http://u:p@10.0.0.1:8080\n\nsocks5://10.0.0.2:1080\n");
        let proxies = read_proxies(file.path()).await.unwrap();

        assert_eq!(proxies.len(), 2);
        assert_eq!(proxies[0].scheme, "http");
        assert_eq!(proxies[1].host, "10.0.0.2");
    }

    #[tokio::test]
    async fn malformed_proxy_line_aborts() {
        let file = file_with("http://10.0.0.1:8080\n10.0.0.2:1080\n");
        let err = read_proxies(file.path()).await.unwrap_err();

        assert!(matches!(err, Error::Parse(_)));
        assert!(err.to_string().contains("10.0.0.2:1080"));
    }

    #[test]
    fn timestamp_is_24_hour_time_of_day() {
        assert!(is_timestamp(&timestamp()));
        assert_eq!(display_offset().local_minus_utc(), 8 * 3600);
    }
}
