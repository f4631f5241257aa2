use std::fmt;

use pkg_constants::discovery::{
    MAX_ADDRESSES_PER_ENDPOINT, MAX_ENDPOINTS_PER_SLICE, MAX_FOR_ZONES, MAX_PORT_NAME_LEN,
    MAX_PORTS_PER_SLICE,
};
use pkg_slim::EndpointSlice;
use tracing::warn;

/// Per-slice view printed by `slimctl inspect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub name: String,
    pub service: Option<String>,
    pub address_type: String,
    pub endpoints: usize,
    pub ready: usize,
    pub serving: usize,
    pub terminating: usize,
    pub ports: Vec<String>,
}

impl Summary {
    pub fn of(slice: &EndpointSlice) -> Self {
        let meta = &slice.metadata;
        let name = match (&meta.namespace, &meta.name) {
            (Some(ns), Some(name)) => format!("{ns}/{name}"),
            (None, Some(name)) => name.clone(),
            _ => "<unnamed>".to_string(),
        };
        let ports = slice
            .ports
            .iter()
            .map(|p| {
                let name = match p.name_or_default() {
                    "" => "<unnamed>",
                    n => n,
                };
                let number = p.port.map_or_else(|| "*".to_string(), |n| n.to_string());
                format!("{name} {number}/{}", p.protocol_or_default())
            })
            .collect();

        Summary {
            name,
            service: slice.service_name().map(str::to_string),
            address_type: slice.address_type.to_string(),
            endpoints: slice.endpoints.len(),
            ready: slice.endpoints.iter().filter(|e| e.is_ready()).count(),
            serving: slice.endpoints.iter().filter(|e| e.is_serving()).count(),
            terminating: slice.endpoints.iter().filter(|e| e.is_terminating()).count(),
            ports,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Slice:        {}", self.name)?;
        writeln!(
            f,
            "Service:      {}",
            self.service.as_deref().unwrap_or("<none>")
        )?;
        writeln!(f, "Address type: {}", self.address_type)?;
        writeln!(
            f,
            "Endpoints:    {} (ready {}, serving {}, terminating {})",
            self.endpoints, self.ready, self.serving, self.terminating
        )?;
        if self.ports.is_empty() {
            write!(f, "Ports:        (none)")
        } else {
            write!(f, "Ports:        {}", self.ports.join(", "))
        }
    }
}

/// Warn about values the API server would reject. Never fails: the schema
/// carries whatever it is given.
pub fn check_documented_limits(slice: &EndpointSlice) -> usize {
    let name = slice.metadata.name.as_deref().unwrap_or("<unnamed>");
    let mut findings = 0;

    if !slice.address_type.is_known() {
        warn!(slice = name, address_type = %slice.address_type, "unrecognized address type");
        findings += 1;
    }
    if slice.endpoints.len() > MAX_ENDPOINTS_PER_SLICE {
        warn!(
            slice = name,
            count = slice.endpoints.len(),
            "more than {} endpoints",
            MAX_ENDPOINTS_PER_SLICE
        );
        findings += 1;
    }
    if slice.ports.len() > MAX_PORTS_PER_SLICE {
        warn!(
            slice = name,
            count = slice.ports.len(),
            "more than {} ports",
            MAX_PORTS_PER_SLICE
        );
        findings += 1;
    }
    for endpoint in &slice.endpoints {
        let count = endpoint.addresses.len();
        if count == 0 || count > MAX_ADDRESSES_PER_ENDPOINT {
            warn!(
                slice = name,
                count,
                "endpoint address count outside 1..={}",
                MAX_ADDRESSES_PER_ENDPOINT
            );
            findings += 1;
        }
        if endpoint
            .conditions
            .is_some_and(|c| c.ready == Some(true) && c.is_terminating())
        {
            warn!(slice = name, addresses = ?endpoint.addresses, "ready endpoint is terminating");
            findings += 1;
        }
        let zones = endpoint.hinted_zones().count();
        if zones > MAX_FOR_ZONES {
            warn!(slice = name, zones, "more than {} zone hints", MAX_FOR_ZONES);
            findings += 1;
        }
    }
    for port in &slice.ports {
        if let Some(problem) = port_name_problem(port.name_or_default()) {
            warn!(slice = name, port = port.name_or_default(), "port name {}", problem);
            findings += 1;
        }
        if port.protocol.as_ref().is_some_and(|p| !p.is_known()) {
            warn!(slice = name, protocol = %port.protocol_or_default(), "unrecognized protocol");
            findings += 1;
        }
    }
    findings
}

/// Port names are empty or a DNS label: lowercase `[a-z0-9-]`, at most 63
/// characters, no leading/trailing hyphens.
fn port_name_problem(name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    if name.len() > MAX_PORT_NAME_LEN {
        return Some(format!("exceeds {} characters", MAX_PORT_NAME_LEN));
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Some("starts or ends with a hyphen".to_string());
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Some("contains characters outside [a-z0-9-]".to_string());
    }
    None
}
