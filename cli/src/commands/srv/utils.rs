//! # Site Server Utilities
//!
//! File: cli/src/commands/srv/utils.rs
//!
//! Helpers for the startup banner: a summary of what is being served and
//! the machine's LAN address for the network URL.
//!
use std::net::{IpAddr, UdpSocket};
use std::path::Path;
use tracing::{debug, info, warn};

/// Logs the top-level entries of the site directory at debug level.
pub fn log_directory_contents(path: &Path) {
    let entries = match std::fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Could not read directory contents for '{}': {}", path.display(), e);
            return;
        }
    };

    let mut count = 0;
    for entry in entries.filter_map(|entry| entry.ok()) {
        count += 1;
        let kind = match entry.file_type() {
            Ok(t) if t.is_dir() => "DIR ",
            Ok(_) => "FILE",
            Err(_) => "????",
        };
        debug!("  - {} : {}", kind, entry.file_name().to_string_lossy());
    }
    if count == 0 {
        warn!("Site directory {} is empty", path.display());
    } else {
        info!("Serving {} top-level entries from {}", count, path.display());
    }
}

/// The address this machine would use to reach the network, if any.
///
/// Connecting a UDP socket sends nothing; it only asks the OS to pick a
/// route and source address.
pub fn get_local_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    let ip = socket.local_addr().ok()?.ip();
    if ip.is_loopback() || ip.is_unspecified() {
        None
    } else {
        Some(ip)
    }
}
