//! Interactive wizard on the terminal.
//!
//! Each loop iteration asks for the input of the current step. Re-triable
//! failures are printed and the step is asked again; persistence and
//! internal failures end the run.

use ps_app::{PrinterCatalog, SetupOrchestrator, TestPrintOutcome};
use ps_core::locale::SUPPORTED_LANGUAGES;
use ps_core::setup::ErrorFamily;
use ps_core::{PrinterDevice, SetupError, WizardStep};
use tracing::info_span;
use tracing::Instrument;

use crate::bootstrap::AppDeps;
use crate::commands::printers::print_devices;
use crate::commands::prompt::Prompt;

pub async fn run(deps: &AppDeps) -> anyhow::Result<()> {
    let span = info_span!("command.wizard.run", record = %deps.record_path.display());
    async {
        let mut prompt = Prompt::new();
        let orchestrator = deps.orchestrator.as_ref();

        loop {
            let step = orchestrator.current_step().await;
            let result = match step {
                WizardStep::LanguageSelect => {
                    let language = prompt
                        .ask(&format!("Language [{}]", SUPPORTED_LANGUAGES.join("/")))
                        .await?;
                    orchestrator.select_language(language).await
                }
                WizardStep::AdminSetup => {
                    let name = prompt.ask("Administrator name").await?;
                    let password = prompt.ask_secret("Password").await?;
                    let confirmation = prompt.ask_secret("Confirm password").await?;
                    orchestrator.submit_admin(name, password, confirmation).await
                }
                WizardStep::StoreInfo => {
                    let name = prompt.ask("Store name").await?;
                    let sector = ask_sector(&mut prompt, orchestrator).await?;
                    orchestrator.submit_store_info(name, sector).await
                }
                WizardStep::LogoUpload => {
                    let reference = prompt.ask("Logo image path").await?;
                    orchestrator
                        .submit_logo(Some(reference).filter(|r| !r.is_empty()))
                        .await
                }
                WizardStep::PrinterSelect => {
                    let device = choose_printer(&mut prompt, deps).await?;
                    orchestrator.select_printer(device).await
                }
                WizardStep::Complete => {
                    println!(
                        "Setup complete. Configuration saved to {}.",
                        deps.record_path.display()
                    );
                    return Ok(());
                }
            };

            if let Err(err) = result {
                report(&err);
                if matches!(err.family(), ErrorFamily::Persistence | ErrorFamily::Internal) {
                    return Err(err.into());
                }
            }
        }
    }
    .instrument(span)
    .await
}

fn report(err: &SetupError) {
    println!("  ! {} ({})", err, err.code());
}

async fn ask_sector(
    prompt: &mut Prompt,
    orchestrator: &SetupOrchestrator,
) -> anyhow::Result<String> {
    let sectors = orchestrator.sector_choices().await;
    for (index, sector) in sectors.iter().enumerate() {
        println!("{:>3}  {sector}", index + 1);
    }
    let answer = prompt.ask("Business sector (number)").await?;
    Ok(answer
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| sectors.get(i))
        .map(|s| s.to_string())
        .unwrap_or(answer))
}

async fn discover(deps: &AppDeps) -> PrinterCatalog {
    let catalog = deps.orchestrator.discover_printers().await;
    if catalog.permission_missing {
        deps.request_access.execute().await;
        println!("Bluetooth access is not granted; only usb printers are listed.");
    }
    catalog
}

/// `N` selects printer N, `t N` prints a test page, `r` rescans, empty selects nothing.
async fn choose_printer(
    prompt: &mut Prompt,
    deps: &AppDeps,
) -> anyhow::Result<Option<PrinterDevice>> {
    let mut catalog = discover(deps).await;
    loop {
        if catalog.devices.is_empty() {
            println!("No printers found.");
        }
        print_devices(&catalog.devices);

        let answer = prompt.ask("Printer (N select, t N test, r rescan)").await?;
        let pick = |text: &str| {
            text.trim()
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| catalog.devices.get(i))
                .cloned()
        };

        if answer.is_empty() {
            return Ok(None);
        }
        if answer.eq_ignore_ascii_case("r") {
            catalog = discover(deps).await;
            continue;
        }
        if let Some(rest) = answer.strip_prefix(['t', 'T']) {
            match pick(rest) {
                Some(device) => match deps.test_print.send_test_page(&device).await {
                    TestPrintOutcome::Printed => println!("  test page sent"),
                    TestPrintOutcome::Failed(err) => {
                        println!("  ! test print failed ({})", err.code())
                    }
                },
                None => println!("  ! no such printer"),
            }
            continue;
        }
        match pick(&answer) {
            Some(device) => return Ok(Some(device)),
            None => println!("  ! no such printer"),
        }
    }
}
