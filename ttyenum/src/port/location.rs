//! Conversions between short port names and device node paths.

/// Conventional directory holding device nodes.
pub const DEVICE_DIR: &str = "/dev/";

/// Map a port name to its device node path.
///
/// Names that already look like a path (starting with `/`, `./` or `../`)
/// are returned unchanged; anything else is placed under `/dev/`.
pub fn port_name_to_system_location(name: &str) -> String {
    if name.starts_with('/') || name.starts_with("./") || name.starts_with("../") {
        name.to_string()
    } else {
        format!("{DEVICE_DIR}{name}")
    }
}

/// Map a device node path back to its short port name.
///
/// Strips a leading `/dev/`; any other input is returned unchanged.
pub fn port_name_from_system_location(path: &str) -> String {
    path.strip_prefix(DEVICE_DIR)
        .unwrap_or(path)
        .to_string()
}
