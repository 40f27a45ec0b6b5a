use std::net::{IpAddr, Ipv4Addr};

/// Non-loopback IPv4 addresses of all local interfaces. Only used for display.
pub fn local_ipv4() -> Vec<Ipv4Addr> {
    match if_addrs::get_if_addrs() {
        Ok(ifaces) => ifaces
            .into_iter()
            .filter_map(|iface| match iface.ip() {
                IpAddr::V4(ip) if !ip.is_loopback() => Some(ip),
                _ => None,
            })
            .collect(),
        Err(e) => {
            log::debug!("Failed to enumerate interfaces: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excludes_loopback() {
        assert!(local_ipv4().iter().all(|ip| !ip.is_loopback()));
    }
}
