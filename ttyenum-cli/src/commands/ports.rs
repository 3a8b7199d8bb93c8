//! Port listing, port info, lock check and baud rate command implementations.

use {
    crate::Settings,
    anyhow::{Result, bail},
    console::style,
    log::debug,
    ttyenum::{
        PortInfo, Strategy, lock::lock_file_is_held, port_name_from_system_location,
        standard_baud_rates,
    },
};

/// Print a `{"ok": true, "data": ...}` envelope to stdout.
fn print_json(data: serde_json::Value) -> Result<()> {
    let output = serde_json::json!({
        "ok": true,
        "data": data,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&output)?
    );
    Ok(())
}

/// JSON form of a port record, with its resolved system location.
fn port_json(port: &PortInfo) -> Result<serde_json::Value> {
    let mut value = serde_json::to_value(port)?;
    value["system_location"] = serde_json::Value::String(port.system_location());
    Ok(value)
}

/// `VVVV:PPPP` when both IDs are known.
fn format_ids(port: &PortInfo) -> Option<String> {
    match (port.vendor_id, port.product_id) {
        (Some(vid), Some(pid)) => Some(format!("{vid:04X}:{pid:04X}")),
        _ => None,
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

/// Run the configured strategy, or the full cascade when none is forced.
fn scan(settings: &Settings) -> Result<(Option<Strategy>, Vec<PortInfo>)> {
    let enumerator = settings.enumerator()?;
    Ok(match settings.strategy {
        Some(strategy) => (Some(strategy), enumerator.run_strategy(strategy)),
        None => {
            let discovery = enumerator.discover();
            (discovery.strategy, discovery.ports)
        },
    })
}

/// List ports command implementation.
pub(crate) fn cmd_list(settings: &Settings, json: bool, quiet: bool) -> Result<()> {
    let (strategy, ports) = scan(settings)?;
    debug!(
        "{} port(s) via {}",
        ports.len(),
        strategy.map_or("none", |s| s.name())
    );

    if json {
        let ports = ports
            .iter()
            .map(port_json)
            .collect::<Result<Vec<_>>>()?;
        return print_json(serde_json::json!({
            "strategy": strategy,
            "ports": ports,
        }));
    }

    if !quiet {
        eprintln!(
            "{}",
            style("Serial ports")
                .bold()
                .underlined()
        );
    }

    if ports.is_empty() {
        eprintln!("  {}", style("No serial ports found").dim());
        return Ok(());
    }

    for port in &ports {
        let ids = format_ids(port)
            .map(|ids| format!(" ({ids})"))
            .unwrap_or_default();
        let description = if port.description.is_empty() {
            String::new()
        } else {
            format!(" - {}", style(&port.description).dim())
        };
        eprintln!(
            "  {} {} {}{}{}",
            style("•").green(),
            style(&port.port_name).cyan(),
            port.device,
            ids,
            description
        );
    }

    if !quiet {
        if let Some(strategy) = strategy {
            eprintln!(
                "\n{} {} port(s) found by {}",
                style("→").green().bold(),
                ports.len(),
                style(strategy).yellow()
            );
        }
    }
    Ok(())
}

/// Port info command implementation.
pub(crate) fn cmd_info(settings: &Settings, port: &str, json: bool) -> Result<()> {
    let wanted = port_name_from_system_location(port);
    let (_, ports) = scan(settings)?;
    let Some(info) = ports
        .into_iter()
        .find(|p| p.port_name == wanted || p.device == port)
    else {
        bail!("Serial port '{port}' not found");
    };
    let busy = settings
        .lock_checker()
        .is_busy(&info.port_name);

    if json {
        let mut data = port_json(&info)?;
        data["valid"] = serde_json::Value::Bool(info.is_valid());
        data["busy"] = serde_json::Value::Bool(busy);
        return print_json(data);
    }

    eprintln!("{}", style(&info.port_name).cyan().bold());
    eprintln!("  Device:        {}", info.device);
    eprintln!("  Description:   {}", or_dash(&info.description));
    eprintln!("  Manufacturer:  {}", or_dash(&info.manufacturer));
    eprintln!("  Serial number: {}", or_dash(&info.serial_number));
    eprintln!(
        "  Vendor ID:     {}",
        info.vendor_id
            .map_or_else(|| "-".to_string(), |vid| format!("{vid:04X}"))
    );
    eprintln!(
        "  Product ID:    {}",
        info.product_id
            .map_or_else(|| "-".to_string(), |pid| format!("{pid:04X}"))
    );
    eprintln!(
        "  Valid:         {}",
        if info.is_valid() { "yes" } else { "no" }
    );
    eprintln!(
        "  Busy:          {}",
        if busy {
            style("yes").red()
        } else {
            style("no").green()
        }
    );
    Ok(())
}

/// Lock check command implementation. Succeeds whether or not the port is busy.
pub(crate) fn cmd_busy(settings: &Settings, port: &str, json: bool) -> Result<()> {
    let name = port_name_from_system_location(port);
    let checker = settings.lock_checker();
    let lock_file = checker.lock_file_path(&name);
    let busy = lock_file
        .as_deref()
        .is_some_and(lock_file_is_held);

    if json {
        return print_json(serde_json::json!({
            "port_name": name,
            "busy": busy,
            "lock_file": lock_file.map(|path| path.display().to_string()),
        }));
    }

    if busy {
        eprintln!(
            "{} {} is locked by a running process",
            style("●").red().bold(),
            style(&name).cyan()
        );
    } else {
        eprintln!(
            "{} {} is free",
            style("○").green().bold(),
            style(&name).cyan()
        );
    }
    if let Some(path) = lock_file {
        eprintln!("  Lock file: {}", style(path.display()).dim());
    }
    Ok(())
}

/// Baud rates command implementation.
pub(crate) fn cmd_baud_rates(json: bool) -> Result<()> {
    let rates = standard_baud_rates();

    if json {
        return print_json(serde_json::json!({
            "platform": ttyenum::Platform::current(),
            "baud_rates": rates,
        }));
    }

    for rate in rates {
        eprintln!("  {rate}");
    }
    Ok(())
}
