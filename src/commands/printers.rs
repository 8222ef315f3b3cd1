use ps_core::ports::AccessState;
use ps_core::{PrinterDevice, TransportKind};

use crate::bootstrap::AppDeps;
use crate::cli::PrinterCommands;

pub async fn execute(deps: &AppDeps, command: PrinterCommands) -> anyhow::Result<()> {
    match command {
        PrinterCommands::List => list(deps).await,
        PrinterCommands::Test { kind, address } => {
            let kind = TransportKind::from(kind);
            let device = PrinterDevice {
                name: address.clone(),
                address,
                transport_kind: kind,
            };
            test(deps, &device).await
        }
    }
}

async fn list(deps: &AppDeps) -> anyhow::Result<()> {
    let catalog = deps.discovery.discover().await;
    if catalog.devices.is_empty() {
        println!("No printers found.");
    }
    print_devices(&catalog.devices);
    if catalog.permission_missing {
        println!("Bluetooth access is not granted; run `pos-setup request-access`.");
    }
    Ok(())
}

pub fn print_devices(devices: &[PrinterDevice]) {
    for (index, device) in devices.iter().enumerate() {
        println!(
            "{:>3}  {:<9}  {:<24}  {}",
            index + 1,
            device.transport_kind,
            device.name,
            device.address
        );
    }
}

async fn test(deps: &AppDeps, device: &PrinterDevice) -> anyhow::Result<()> {
    let outcome = deps.test_print.send_test_page(device).await;
    match outcome {
        ps_app::TestPrintOutcome::Printed => {
            println!("Test page sent to {}.", device.address);
            Ok(())
        }
        ps_app::TestPrintOutcome::Failed(err) => {
            anyhow::bail!("test print failed ({}): {err}", err.code())
        }
    }
}

pub async fn request_access(deps: &AppDeps) -> anyhow::Result<()> {
    match deps.request_access.execute().await {
        AccessState::Granted => println!("Peripheral access already granted."),
        state => println!("Peripheral access is {state:?}; request sent to the host."),
    }
    Ok(())
}
