// ── Protocol registry ──
//
// Describes the `map` protocol the way the host application registers it:
// a descriptor plus the backend error-code table. The registry is a plain
// value built once by the caller and handed to whatever needs it.

use std::collections::BTreeMap;

use serde::Serialize;

/// Static facts about a protocol handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtocolDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    /// Package providing the backend handler.
    pub package: &'static str,
    /// Interface-name prefix of the virtual devices the handler creates.
    pub device_prefix: &'static str,
    pub floating: bool,
    #[serde(rename = "virtual")]
    pub is_virtual: bool,
}

impl ProtocolDescriptor {
    /// True for device names of the form `<prefix>-<something>`.
    pub fn is_virtual_name(&self, name: &str) -> bool {
        name.strip_prefix(self.device_prefix)
            .and_then(|rest| rest.strip_prefix('-'))
            .is_some_and(|rest| !rest.is_empty())
    }

    /// Name of the L3 device for an interface section: the reported device
    /// when there is one, otherwise `<prefix>-<section>`.
    pub fn interface_name(&self, l3_device: Option<&str>, section: &str) -> String {
        match l3_device.filter(|d| !d.is_empty()) {
            Some(device) => device.to_owned(),
            None => format!("{}-{section}", self.device_prefix),
        }
    }
}

/// A backend error code and its description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorCode {
    pub code: &'static str,
    pub description: &'static str,
}

pub const INVALID_MAP_RULE: &str = "INVALID_MAP_RULE";
pub const NO_MATCHING_PD: &str = "NO_MATCHING_PD";
pub const UNSUPPORTED_TYPE: &str = "UNSUPPORTED_TYPE";

/// Registered protocols and error codes.
#[derive(Debug, Clone, Default)]
pub struct ProtocolRegistry {
    protocols: BTreeMap<&'static str, ProtocolDescriptor>,
    error_codes: BTreeMap<&'static str, ErrorCode>,
}

impl ProtocolRegistry {
    /// A registry with the `map` protocol and its error codes registered.
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register_protocol(ProtocolDescriptor {
            name: "map",
            label: "MAP / LW4over6",
            package: "map-t",
            device_prefix: "map",
            floating: true,
            is_virtual: true,
        });
        registry.register_error_code(INVALID_MAP_RULE, "MAP rule is invalid");
        registry.register_error_code(NO_MATCHING_PD, "No matching prefix delegation");
        registry.register_error_code(UNSUPPORTED_TYPE, "Unsupported MAP type");
        registry
    }

    pub fn register_protocol(&mut self, descriptor: ProtocolDescriptor) {
        tracing::trace!(protocol = descriptor.name, "registering protocol");
        self.protocols.insert(descriptor.name, descriptor);
    }

    pub fn register_error_code(&mut self, code: &'static str, description: &'static str) {
        self.error_codes
            .insert(code, ErrorCode { code, description });
    }

    pub fn protocol(&self, name: &str) -> Option<&ProtocolDescriptor> {
        self.protocols.get(name)
    }

    /// The protocol whose virtual-device pattern matches `device`.
    pub fn protocol_for_device(&self, device: &str) -> Option<&ProtocolDescriptor> {
        self.protocols
            .values()
            .find(|p| p.is_virtual && p.is_virtual_name(device))
    }

    /// Description of a backend error code, if registered.
    pub fn describe(&self, code: &str) -> Option<&'static str> {
        self.error_codes.get(code).map(|e| e.description)
    }

    /// All registered error codes, sorted by code.
    pub fn error_codes(&self) -> impl Iterator<Item = &ErrorCode> {
        self.error_codes.values()
    }
}
