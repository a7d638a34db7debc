//! CLI argument validation functions
//!
//! Value parsers for arguments whose format clap cannot check on its own.

use std::fs;
use std::net::IpAddr;
use std::path::PathBuf;

const MAX_HOSTNAME_LEN: usize = 253;

/// Port to listen on; 0 would pick a random port, which the form can't find.
pub fn validate_port(port_str: &str) -> Result<u16, String> {
    match port_str.trim().parse::<u16>() {
        Ok(0) => Err("Port 0 is not allowed, pick a port between 1 and 65535".to_string()),
        Ok(port) => Ok(port),
        Err(_) => Err(format!(
            "Invalid port '{}', expected a number between 1 and 65535",
            port_str
        )),
    }
}

/// Config file given with `--config`: must be an existing, readable file.
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    let metadata = fs::metadata(&path)
        .map_err(|_| format!("Configuration file does not exist: '{}'", path_str))?;
    if !metadata.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    fs::File::open(&path)
        .map(|_| path)
        .map_err(|e| format!("Cannot read configuration file '{}': {}", path_str, e))
}

/// Bind address: an IP literal or a hostname.
pub fn validate_host_address(host_str: &str) -> Result<String, String> {
    let host = host_str.trim();

    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }
    if host.parse::<IpAddr>().is_ok() {
        return Ok(host.to_string());
    }
    // dotted digits that failed IP parsing, e.g. 999.1.1.1
    if host.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(format!("Invalid IPv4 address: '{}'", host_str));
    }
    if host.len() > MAX_HOSTNAME_LEN {
        return Err(format!(
            "Host name is longer than {} characters",
            MAX_HOSTNAME_LEN
        ));
    }
    if !host.split('.').all(is_hostname_label) {
        return Err(format!("Invalid host name: '{}'", host_str));
    }

    Ok(host.to_string())
}

fn is_hostname_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Base URL of a running relay, returned without trailing slashes.
pub fn validate_base_url(url_str: &str) -> Result<String, String> {
    let url = url_str.trim().trim_end_matches('/');

    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .ok_or_else(|| format!("URL must start with http:// or https://, got: '{}'", url_str))?;

    let authority = rest.split('/').next().unwrap_or_default();
    if authority.is_empty() {
        return Err(format!("URL has no host: '{}'", url_str));
    }

    // [::1]:3000 keeps its colons inside the brackets
    let host = match authority.strip_prefix('[') {
        Some(bracketed) => bracketed.split(']').next().unwrap_or_default(),
        None => authority.split(':').next().unwrap_or_default(),
    };
    validate_host_address(host).map_err(|e| format!("Invalid URL '{}': {}", url_str, e))?;

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_validation() {
        for port in ["1", "80", "3000", " 8080 ", "65535"] {
            assert!(validate_port(port).is_ok(), "port {:?} should be valid", port);
        }
        for port in ["0", "65536", "abc", "-1", ""] {
            assert!(validate_port(port).is_err(), "port {:?} should be invalid", port);
        }
    }

    #[test]
    fn test_host_validation_accepts_ips_and_names() {
        for host in [
            "localhost",
            "127.0.0.1",
            "0.0.0.0",
            "::1",
            "192.168.1.1",
            "relay.example.com",
            "my-server.local",
        ] {
            assert!(validate_host_address(host).is_ok(), "{} should be valid", host);
        }
    }

    #[test]
    fn test_host_validation_rejects_garbage() {
        let too_long = "a".repeat(300);
        for host in [
            "",
            "   ",
            "host with spaces",
            "999.999.999.999",
            "-leading.example.com",
            "double..dot",
            too_long.as_str(),
        ] {
            assert!(validate_host_address(host).is_err(), "{:?} should be invalid", host);
        }
    }

    #[test]
    fn test_config_file_path_validation() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("relay.toml");
        std::fs::write(&file, "").unwrap();

        assert!(validate_config_file_path(file.to_str().unwrap()).is_ok());
        assert!(validate_config_file_path(dir.path().to_str().unwrap()).is_err());
        assert!(validate_config_file_path("/definitely/not/here.toml").is_err());
    }

    #[test]
    fn test_base_url_validation() {
        assert_eq!(
            validate_base_url("http://localhost:3000/").unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(
            validate_base_url("http://[::1]:3000").unwrap(),
            "http://[::1]:3000"
        );
        assert!(validate_base_url("https://relay.example.com/base").is_ok());
        assert!(validate_base_url("localhost:3000").is_err());
        assert!(validate_base_url("http://").is_err());
        assert!(validate_base_url("http://bad host:3000").is_err());
    }
}
