//! Default-route reachability.
//!
//! Mirrors the usual "reachable" / "connection required" flag pair: the host
//! counts as connected only when a default route exists AND the link behind it
//! does not still need bringing up.

use std::io;

/// Raw reachability flags for the default route
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReachabilityFlags {
    /// A default route exists
    pub reachable: bool,
    /// The route exists but its link must be established first
    pub connection_required: bool,
}

impl ReachabilityFlags {
    pub fn is_reachable(&self) -> bool {
        self.reachable && !self.connection_required
    }
}

/// Snapshot connectivity check, re-run every tick.
pub trait ConnectivityProbe {
    fn flags(&mut self) -> io::Result<ReachabilityFlags>;

    /// A failed query counts as "not connected".
    fn is_reachable(&mut self) -> bool {
        match self.flags() {
            Ok(flags) => flags.is_reachable(),
            Err(err) => {
                log::debug!("reachability query failed: {err}");
                false
            }
        }
    }
}

/// Probe backed by the host's routing table.
#[derive(Debug, Default)]
pub struct DefaultRouteProbe;

impl ConnectivityProbe for DefaultRouteProbe {
    fn flags(&mut self) -> io::Result<ReachabilityFlags> {
        query_default_route()
    }
}

#[cfg(target_os = "linux")]
fn query_default_route() -> io::Result<ReachabilityFlags> {
    let v4 = std::fs::read_to_string("/proc/net/route")?;
    let iface = match default_route_v4(&v4) {
        Some(iface) => Some(iface),
        // IPv6-only hosts have no entry in the v4 table
        None => std::fs::read_to_string("/proc/net/ipv6_route")
            .ok()
            .and_then(|v6| default_route_v6(&v6)),
    };

    let Some(iface) = iface else {
        return Ok(ReachabilityFlags::default());
    };

    let operstate = std::fs::read_to_string(format!("/sys/class/net/{iface}/operstate"))
        .unwrap_or_default();
    Ok(ReachabilityFlags {
        reachable: true,
        connection_required: operstate_requires_connection(operstate.trim()),
    })
}

#[cfg(not(target_os = "linux"))]
fn query_default_route() -> io::Result<ReachabilityFlags> {
    use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};

    // TEST-NET-1: only ever routed via the default route. A UDP connect just
    // performs the route lookup, nothing is sent.
    const PROBE: SocketAddrV4 = SocketAddrV4::new(Ipv4Addr::new(192, 0, 2, 1), 9);

    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
    if let Err(err) = socket.connect(PROBE) {
        log::debug!("no route to probe address: {err}");
        return Ok(ReachabilityFlags::default());
    }
    let local = socket.local_addr()?;
    Ok(ReachabilityFlags {
        reachable: true,
        connection_required: local.ip().is_unspecified(),
    })
}

const RTF_UP: u32 = 0x0001;

/// Interface carrying the IPv4 default route in a `/proc/net/route` dump.
pub fn default_route_v4(table: &str) -> Option<String> {
    table.lines().skip(1).find_map(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 8 {
            return None;
        }
        let flags = u32::from_str_radix(fields[3], 16).ok()?;
        let is_default = fields[1] == "00000000" && fields[7] == "00000000";
        (is_default && flags & RTF_UP != 0).then(|| fields[0].to_string())
    })
}

/// Interface carrying the IPv6 default route in a `/proc/net/ipv6_route` dump.
pub fn default_route_v6(table: &str) -> Option<String> {
    table.lines().find_map(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 10 {
            return None;
        }
        let flags = u32::from_str_radix(fields[8], 16).ok()?;
        let iface = fields[9];
        let is_default = fields[0].bytes().all(|b| b == b'0') && fields[1] == "00";
        (is_default && flags & RTF_UP != 0 && iface != "lo").then(|| iface.to_string())
    })
}

/// `operstate` values meaning the link exists but is not carrying traffic yet.
pub fn operstate_requires_connection(state: &str) -> bool {
    matches!(state, "down" | "dormant" | "lowerlayerdown" | "notpresent")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTE_TABLE: &str = "\
Iface\tDestination\tGateway \tFlags\tRefCnt\tUse\tMetric\tMask\t\tMTU\tWindow\tIRTT
wlan0\t0000A8C0\t00000000\t0001\t0\t0\t600\t00FFFFFF\t0\t0\t0
wlan0\t00000000\t0100A8C0\t0003\t0\t0\t600\t00000000\t0\t0\t0
";

    const ROUTE_TABLE_NO_DEFAULT: &str = "\
Iface\tDestination\tGateway \tFlags\tRefCnt\tUse\tMetric\tMask\t\tMTU\tWindow\tIRTT
eth0\t0000A8C0\t00000000\t0001\t0\t0\t100\t00FFFFFF\t0\t0\t0
";

    const IPV6_ROUTE_TABLE: &str = "\
fe800000000000000000000000000000 40 00000000000000000000000000000000 00 00000000000000000000000000000000 00000100 00000001 00000000 00000001     eth0
00000000000000000000000000000000 00 00000000000000000000000000000000 00 fe800000000000000000000000000001 00000400 00000003 00000000 00450003     eth0
";

    struct FixedProbe(io::Result<ReachabilityFlags>);

    impl ConnectivityProbe for FixedProbe {
        fn flags(&mut self) -> io::Result<ReachabilityFlags> {
            match &self.0 {
                Ok(flags) => Ok(*flags),
                Err(err) => Err(io::Error::new(err.kind(), err.to_string())),
            }
        }
    }

    #[test]
    fn reachable_without_connection_required() {
        let flags = ReachabilityFlags {
            reachable: true,
            connection_required: false,
        };
        assert!(flags.is_reachable());
    }

    #[test]
    fn connection_required_overrides_reachable() {
        let mut probe = FixedProbe(Ok(ReachabilityFlags {
            reachable: true,
            connection_required: true,
        }));
        assert!(!probe.is_reachable());
    }

    #[test]
    fn unreachable_is_false() {
        let mut probe = FixedProbe(Ok(ReachabilityFlags::default()));
        assert!(!probe.is_reachable());
    }

    #[test]
    fn query_failure_is_false() {
        let mut probe = FixedProbe(Err(io::Error::new(io::ErrorKind::NotFound, "gone")));
        assert!(!probe.is_reachable());
    }

    #[test]
    fn finds_ipv4_default_route() {
        assert_eq!(default_route_v4(ROUTE_TABLE).as_deref(), Some("wlan0"));
        assert_eq!(default_route_v4(ROUTE_TABLE_NO_DEFAULT), None);
        assert_eq!(default_route_v4(""), None);
    }

    #[test]
    fn ignores_default_route_that_is_not_up() {
        let table = "\
Iface\tDestination\tGateway \tFlags\tRefCnt\tUse\tMetric\tMask\t\tMTU\tWindow\tIRTT
eth0\t00000000\t0100A8C0\t0002\t0\t0\t100\t00000000\t0\t0\t0
";
        assert_eq!(default_route_v4(table), None);
    }

    #[test]
    fn finds_ipv6_default_route() {
        assert_eq!(default_route_v6(IPV6_ROUTE_TABLE).as_deref(), Some("eth0"));
    }

    #[test]
    fn operstate_mapping() {
        assert!(!operstate_requires_connection("up"));
        assert!(!operstate_requires_connection("unknown"));
        assert!(operstate_requires_connection("dormant"));
        assert!(operstate_requires_connection("down"));
    }
}
