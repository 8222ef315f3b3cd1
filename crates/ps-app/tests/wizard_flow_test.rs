mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::*;
use mockall::predicate::always;
use ps_core::ports::{AccessState, PasswordHasherPort, TransportError};
use ps_core::setup::{ErrorFamily, ValidationError, WizardInput};
use ps_core::{SecretString, SetupConfiguration, SetupError, WizardStep};
use ps_infra::{FileSetupConfigRepository, Sha256PasswordHasher};
use tempfile::TempDir;

mockall::mock! {
    pub Hasher {}

    impl PasswordHasherPort for Hasher {
        fn hash_password(&self, password: &SecretString) -> anyhow::Result<String>;
    }
}

#[tokio::test]
async fn wizard_flow_persists_every_step_to_disk() {
    init_test_tracing();
    let temp_dir = TempDir::new().unwrap();
    let repo = Arc::new(FileSetupConfigRepository::with_defaults(
        temp_dir.path().to_path_buf(),
    ));
    let (orchestrator, _access, events) = harness_with(
        repo.clone(),
        Arc::new(Sha256PasswordHasher),
        vec![bt_printer("TM-m30", "AA:BB:CC:DD:EE:01")],
        vec![usb_printer("TM-T20", 0x04b8, 0x0e15)],
    );

    advance_to(&orchestrator, WizardStep::PrinterSelect).await;
    let catalog = orchestrator.discover_printers().await;
    assert_eq!(catalog.devices.len(), 2);

    let chosen = catalog.devices[1].clone();
    let step = orchestrator.select_printer(Some(chosen)).await.unwrap();
    assert_eq!(step, WizardStep::Complete);

    let stored = ps_app::GetSetupConfiguration::new(repo)
        .execute()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.language, "fr");
    assert_eq!(stored.admin_name, "Amina");
    assert_eq!(stored.admin_password_hash.len(), 64);
    assert_ne!(stored.admin_password_hash, STRONG_PASSWORD);
    assert_eq!(stored.store_name, "Acme");
    assert_eq!(stored.store_sector, "Boulangerie");
    assert_eq!(
        stored.logo_image_reference.as_deref(),
        Some("file:///srv/logo.png")
    );
    assert_eq!(stored.default_printer_name.as_deref(), Some("TM-T20"));
    assert_eq!(stored.default_printer_address.as_deref(), Some("04b8:0e15"));
    assert!(stored.is_complete());

    assert_eq!(events.completed.lock().unwrap().as_slice(), &[stored]);
    assert_eq!(
        events.steps.lock().unwrap().as_slice(),
        &[
            WizardStep::AdminSetup,
            WizardStep::StoreInfo,
            WizardStep::LogoUpload,
            WizardStep::PrinterSelect,
            WizardStep::Complete,
        ]
    );
}

#[tokio::test]
async fn language_step_does_not_persist() {
    let h = harness();

    let step = h.orchestrator.select_language(" es ".into()).await.unwrap();

    assert_eq!(step, WizardStep::AdminSetup);
    assert_eq!(h.store.save_count(), 0);
    assert_eq!(h.orchestrator.sector_choices().await[0], "Tienda");
}

#[tokio::test]
async fn store_info_merges_without_touching_admin_fields() {
    let h = harness();
    advance_to(&h.orchestrator, WizardStep::StoreInfo).await;
    let after_admin = h.store.snapshot().unwrap();
    assert_eq!(after_admin.store_name, "");

    h.orchestrator
        .submit_store_info("Acme".into(), "Épicerie".into())
        .await
        .unwrap();

    let after_store = h.store.snapshot().unwrap();
    assert_eq!(after_store.admin_name, after_admin.admin_name);
    assert_eq!(after_store.admin_password_hash, after_admin.admin_password_hash);
    assert_eq!(after_store.language, "fr");
    assert_eq!(after_store.store_name, "Acme");
    assert_eq!(after_store.logo_image_reference, None);
}

#[tokio::test]
async fn store_info_without_record_reports_missing_configuration() {
    let h = harness();
    advance_to(&h.orchestrator, WizardStep::StoreInfo).await;
    *h.store.record.lock().unwrap() = None;
    let saves = h.store.save_count();

    let err = h
        .orchestrator
        .submit_store_info("Acme".into(), "Store".into())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SetupError::ConfigurationMissing {
            step: WizardStep::StoreInfo
        }
    ));
    assert_eq!(err.code(), "config_missing");
    assert_eq!(err.family(), ErrorFamily::MissingPrerequisite);
    assert!(h.store.snapshot().is_none(), "no default record is created");
    assert_eq!(h.store.save_count(), saves);
    assert_eq!(h.orchestrator.current_step().await, WizardStep::StoreInfo);
}

#[tokio::test]
async fn printer_step_missing_configuration_uses_the_same_code() {
    let h = harness();
    advance_to(&h.orchestrator, WizardStep::PrinterSelect).await;
    let catalog = h.orchestrator.discover_printers().await;
    *h.store.record.lock().unwrap() = None;

    let err = h
        .orchestrator
        .select_printer(catalog.devices.first().cloned())
        .await
        .unwrap_err();

    assert_eq!(err.code(), "config_missing");
    assert!(h.events.completed.lock().unwrap().is_empty());
    assert_eq!(h.orchestrator.current_step().await, WizardStep::PrinterSelect);
}

#[tokio::test]
async fn weak_or_mismatched_password_does_not_advance() {
    let h = harness();
    advance_to(&h.orchestrator, WizardStep::AdminSetup).await;

    let err = h
        .orchestrator
        .submit_admin("Amina".into(), "abcdef1!".into(), "abcdef1!".into())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SetupError::Validation(ValidationError::PasswordWeak)
    ));

    let err = h
        .orchestrator
        .submit_admin("Amina".into(), STRONG_PASSWORD.into(), "Abcdef1?".into())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "password_mismatch");

    assert_eq!(h.orchestrator.current_step().await, WizardStep::AdminSetup);
    assert_eq!(h.store.save_count(), 0);

    // Re-triable on the same step.
    let step = h
        .orchestrator
        .submit_admin("Amina".into(), STRONG_PASSWORD.into(), STRONG_PASSWORD.into())
        .await
        .unwrap();
    assert_eq!(step, WizardStep::StoreInfo);
}

#[tokio::test]
async fn admin_step_hashes_through_the_port_exactly_once() {
    let store = Arc::new(MemoryConfigStore::default());
    let mut hasher = MockHasher::new();
    hasher
        .expect_hash_password()
        .with(always())
        .times(1)
        .returning(|password| {
            assert_eq!(password.expose(), STRONG_PASSWORD);
            Ok("d".repeat(64))
        });
    let (orchestrator, _, _) = harness_with(store.clone(), Arc::new(hasher), vec![], vec![]);

    advance_to(&orchestrator, WizardStep::StoreInfo).await;

    assert_eq!(store.snapshot().unwrap().admin_password_hash, "d".repeat(64));
}

#[tokio::test]
async fn hashing_failure_is_internal_and_persists_nothing() {
    let store = Arc::new(MemoryConfigStore::default());
    let mut hasher = MockHasher::new();
    hasher
        .expect_hash_password()
        .returning(|_| Err(anyhow::anyhow!("digest unavailable")));
    let (orchestrator, _, _) = harness_with(store.clone(), Arc::new(hasher), vec![], vec![]);
    orchestrator.select_language("en".into()).await.unwrap();

    let err = orchestrator
        .submit_admin("Sam".into(), STRONG_PASSWORD.into(), STRONG_PASSWORD.into())
        .await
        .unwrap_err();

    assert_eq!(err.family(), ErrorFamily::Internal);
    assert!(store.snapshot().is_none());
    assert_eq!(orchestrator.current_step().await, WizardStep::AdminSetup);
}

#[tokio::test]
async fn input_claiming_a_later_step_is_rejected() {
    let h = harness();
    advance_to(&h.orchestrator, WizardStep::StoreInfo).await;
    let catalog = h.orchestrator.discover_printers().await;

    let err = h
        .orchestrator
        .attempt_transition(
            WizardStep::PrinterSelect,
            WizardInput::SubmitPrinter {
                device: catalog.devices.first().cloned(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SetupError::UnexpectedInput {
            step: WizardStep::StoreInfo
        }
    ));
    assert!(h.events.completed.lock().unwrap().is_empty());
    assert_eq!(h.orchestrator.current_step().await, WizardStep::StoreInfo);
    let stored = h.store.snapshot().unwrap();
    assert_eq!(stored.store_name, "");
    assert!(!stored.has_default_printer());
}

#[tokio::test]
async fn input_claiming_an_earlier_step_is_rejected() {
    let h = harness();
    advance_to(&h.orchestrator, WizardStep::AdminSetup).await;

    let err = h
        .orchestrator
        .attempt_transition(
            WizardStep::LanguageSelect,
            WizardInput::SelectLanguage {
                language: "en".into(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SetupError::UnexpectedInput {
            step: WizardStep::AdminSetup
        }
    ));
    assert_eq!(h.orchestrator.sector_choices().await[0], "Épicier");
}

#[tokio::test]
async fn persistence_failure_stops_the_flow() {
    let h = harness();
    advance_to(&h.orchestrator, WizardStep::StoreInfo).await;
    h.store.fail_saves.store(true, Ordering::SeqCst);

    let err = h
        .orchestrator
        .submit_store_info("Acme".into(), "Store".into())
        .await
        .unwrap_err();

    assert_eq!(err.family(), ErrorFamily::Persistence);
    assert_eq!(err.code(), "persistence_failed");
    assert_eq!(h.orchestrator.current_step().await, WizardStep::StoreInfo);
    assert_eq!(h.store.snapshot().unwrap().store_name, "");
}

#[tokio::test]
async fn logo_step_requires_a_reference() {
    let h = harness();
    advance_to(&h.orchestrator, WizardStep::LogoUpload).await;

    let err = h.orchestrator.submit_logo(None).await.unwrap_err();
    assert_eq!(err.code(), "logo_not_selected");

    let step = h
        .orchestrator
        .submit_logo(Some("content://media/7".into()))
        .await
        .unwrap();
    assert_eq!(step, WizardStep::PrinterSelect);
    assert_eq!(
        h.store.snapshot().unwrap().logo_image_reference.as_deref(),
        Some("content://media/7")
    );
}

#[tokio::test]
async fn printer_must_be_offered_by_discovery() {
    let h = harness();
    advance_to(&h.orchestrator, WizardStep::PrinterSelect).await;
    let device = usb_printer("TM-T20", 0x04b8, 0x0e15);

    let err = h
        .orchestrator
        .select_printer(Some(device.clone()))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "printer_not_offered");

    h.orchestrator.discover_printers().await;
    let step = h.orchestrator.select_printer(Some(device)).await.unwrap();
    assert_eq!(step, WizardStep::Complete);
}

#[tokio::test]
async fn wireless_printer_requires_granted_access() {
    let h = harness();
    advance_to(&h.orchestrator, WizardStep::PrinterSelect).await;
    h.orchestrator.discover_printers().await;
    h.access.set(AccessState::Denied);
    let device = bt_printer("TM-m30", "AA:BB:CC:DD:EE:01");

    let err = h
        .orchestrator
        .select_printer(Some(device.clone()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SetupError::PeripheralUnavailable(TransportError::PermissionMissing)
    ));
    assert_eq!(err.family(), ErrorFamily::PeripheralUnavailable);
    assert!(!h.store.snapshot().unwrap().has_default_printer());

    h.access.set(AccessState::Granted);
    let step = h.orchestrator.select_printer(Some(device)).await.unwrap();
    assert_eq!(step, WizardStep::Complete);
}

#[tokio::test]
async fn completed_flow_rejects_further_input() {
    let h = harness();
    advance_to(&h.orchestrator, WizardStep::PrinterSelect).await;
    let catalog = h.orchestrator.discover_printers().await;
    h.orchestrator
        .select_printer(catalog.devices.first().cloned())
        .await
        .unwrap();

    let err = h
        .orchestrator
        .select_language("en".into())
        .await
        .unwrap_err();

    assert!(matches!(err, SetupError::AlreadyComplete));
}

#[tokio::test]
async fn completed_flow_cannot_be_reopened_at_an_earlier_step() {
    let h = harness();
    advance_to(&h.orchestrator, WizardStep::PrinterSelect).await;
    let catalog = h.orchestrator.discover_printers().await;
    h.orchestrator
        .select_printer(catalog.devices.first().cloned())
        .await
        .unwrap();
    let before = h.store.snapshot().unwrap();
    let saves = h.store.save_count();

    let err = h
        .orchestrator
        .attempt_transition(
            WizardStep::AdminSetup,
            WizardInput::SubmitAdmin {
                admin_name: "Mallory".into(),
                password: SecretString::new(STRONG_PASSWORD),
                confirmation: SecretString::new(STRONG_PASSWORD),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, SetupError::AlreadyComplete));
    assert_eq!(h.store.snapshot().unwrap(), before);
    assert_eq!(h.store.save_count(), saves);
    assert_eq!(before.admin_name, "Amina");
    assert_eq!(before.store_name, "Acme");
    assert!(before.has_default_printer());
    assert_eq!(h.events.completed.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn stored_complete_record_resumes_at_complete() {
    let store = Arc::new(MemoryConfigStore::default());
    let record = SetupConfiguration::new_admin("ar", "Amina", "0".repeat(64))
        .merged(&ps_core::setup::ConfigPatch::StoreInfo {
            store_name: "Acme".into(),
            store_sector: "مخبز".into(),
        })
        .merged(&ps_core::setup::ConfigPatch::DefaultPrinter {
            name: "TM-T20".into(),
            address: "04b8:0e15".into(),
        });
    *store.record.lock().unwrap() = Some(record);
    let (orchestrator, _, events) =
        harness_with(store.clone(), Arc::new(ReversingHasher), vec![], vec![]);

    assert_eq!(orchestrator.current_step().await, WizardStep::Complete);
    assert_eq!(orchestrator.sector_choices().await[6], "مخبز");
    assert_eq!(events.steps.lock().unwrap().as_slice(), &[WizardStep::Complete]);

    let err = orchestrator.select_language("en".into()).await.unwrap_err();
    assert!(matches!(err, SetupError::AlreadyComplete));
}

#[tokio::test]
async fn partial_record_starts_from_the_first_step() {
    let store = Arc::new(MemoryConfigStore::default());
    *store.record.lock().unwrap() =
        Some(SetupConfiguration::new_admin("en", "Sam", "0".repeat(64)));
    let (orchestrator, _, _) = harness_with(store, Arc::new(ReversingHasher), vec![], vec![]);

    assert_eq!(orchestrator.current_step().await, WizardStep::LanguageSelect);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_inputs_for_one_step_advance_once() {
    let h = Arc::new(harness());

    let a = {
        let h = h.clone();
        tokio::spawn(async move { h.orchestrator.select_language("en".into()).await })
    };
    let b = {
        let h = h.clone();
        tokio::spawn(async move { h.orchestrator.select_language("fr".into()).await })
    };
    let results = [a.await.unwrap(), b.await.unwrap()];

    let advanced = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(advanced, 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(SetupError::UnexpectedInput { step: WizardStep::AdminSetup }))));
    assert_eq!(h.orchestrator.current_step().await, WizardStep::AdminSetup);
}
