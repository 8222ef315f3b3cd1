use serde::{Deserialize, Serialize};

use crate::printer::PrinterDevice;
use crate::validation::is_blank;

/// The single persisted setup record.
///
/// Optional fields are serialized as explicit `null` so that "absent" stays
/// distinguishable from an empty string on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupConfiguration {
    pub language: String,
    pub admin_name: String,
    pub admin_password_hash: String,
    pub store_name: String,
    pub store_sector: String,
    #[serde(default, alias = "logoUri")]
    pub logo_image_reference: Option<String>,
    #[serde(default)]
    pub default_printer_name: Option<String>,
    #[serde(default)]
    pub default_printer_address: Option<String>,
}

/// Field-level update applied by one wizard step.
///
/// Each variant touches only its own fields; `admin_password_hash` has no patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigPatch {
    StoreInfo {
        store_name: String,
        store_sector: String,
    },
    Logo {
        image_reference: String,
    },
    DefaultPrinter {
        name: String,
        address: String,
    },
}

impl ConfigPatch {
    pub fn default_printer(device: &PrinterDevice) -> Self {
        ConfigPatch::DefaultPrinter {
            name: device.name.clone(),
            address: device.address.clone(),
        }
    }
}

impl SetupConfiguration {
    /// Record created by the administrator step: store, logo and printer fields empty.
    pub fn new_admin(
        language: impl Into<String>,
        admin_name: impl Into<String>,
        admin_password_hash: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            admin_name: admin_name.into(),
            admin_password_hash: admin_password_hash.into(),
            store_name: String::new(),
            store_sector: String::new(),
            logo_image_reference: None,
            default_printer_name: None,
            default_printer_address: None,
        }
    }

    /// Merge `patch` onto this snapshot, leaving every other field untouched.
    pub fn merged(mut self, patch: &ConfigPatch) -> Self {
        match patch {
            ConfigPatch::StoreInfo {
                store_name,
                store_sector,
            } => {
                self.store_name = store_name.clone();
                self.store_sector = store_sector.clone();
            }
            ConfigPatch::Logo { image_reference } => {
                self.logo_image_reference = Some(image_reference.clone());
            }
            ConfigPatch::DefaultPrinter { name, address } => {
                self.default_printer_name = Some(name.clone());
                self.default_printer_address = Some(address.clone());
            }
        }
        self
    }

    pub fn has_default_printer(&self) -> bool {
        self.default_printer_name.is_some() && self.default_printer_address.is_some()
    }

    /// Every required field is non-blank and the printer pair is either both set or both absent.
    pub fn is_complete(&self) -> bool {
        let required = [
            &self.language,
            &self.admin_name,
            &self.admin_password_hash,
            &self.store_name,
            &self.store_sector,
        ];
        let printer_pair_consistent =
            self.default_printer_name.is_some() == self.default_printer_address.is_some();

        required.iter().all(|field| !is_blank(field)) && printer_pair_consistent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::TransportKind;

    fn admin_record() -> SetupConfiguration {
        SetupConfiguration::new_admin("fr", "Amina", "a".repeat(64))
    }

    #[test]
    fn new_admin_leaves_later_fields_empty() {
        let record = admin_record();
        assert_eq!(record.store_name, "");
        assert_eq!(record.store_sector, "");
        assert!(record.logo_image_reference.is_none());
        assert!(!record.has_default_printer());
        assert!(!record.is_complete());
    }

    #[test]
    fn merges_only_touch_their_own_fields() {
        let record = admin_record()
            .merged(&ConfigPatch::StoreInfo {
                store_name: "Acme".into(),
                store_sector: "Bakery".into(),
            })
            .merged(&ConfigPatch::Logo {
                image_reference: "content://media/42".into(),
            });

        assert_eq!(record.admin_name, "Amina");
        assert_eq!(record.admin_password_hash, "a".repeat(64));
        assert_eq!(record.store_name, "Acme");
        assert_eq!(record.logo_image_reference.as_deref(), Some("content://media/42"));
        assert!(record.is_complete());

        let device = PrinterDevice {
            name: "TM-T20".into(),
            address: "04b8:0e15".into(),
            transport_kind: TransportKind::Wired,
        };
        let record = record.merged(&ConfigPatch::default_printer(&device));
        assert_eq!(record.store_name, "Acme");
        assert_eq!(record.default_printer_name.as_deref(), Some("TM-T20"));
        assert_eq!(record.default_printer_address.as_deref(), Some("04b8:0e15"));
        assert!(record.is_complete());
    }

    #[test]
    fn half_set_printer_pair_is_incomplete() {
        let mut record = admin_record().merged(&ConfigPatch::StoreInfo {
            store_name: "Acme".into(),
            store_sector: "Café".into(),
        });
        record.default_printer_name = Some("orphan".into());
        assert!(!record.is_complete());
    }

    #[test]
    fn absent_optionals_serialize_as_explicit_null() {
        let json = serde_json::to_value(admin_record()).unwrap();
        assert!(json.get("logoImageReference").unwrap().is_null());
        assert!(json.get("defaultPrinterName").unwrap().is_null());
        assert!(json.get("defaultPrinterAddress").unwrap().is_null());
        assert_eq!(json.get("storeName").unwrap(), "");
    }

    #[test]
    fn reads_legacy_logo_key_and_missing_printer_address() {
        let json = r#"{
            "language": "en",
            "adminName": "Sam",
            "adminPasswordHash": "h",
            "storeName": "Acme",
            "storeSector": "Store",
            "logoUri": "file:///logo.png",
            "defaultPrinterName": null
        }"#;
        let record: SetupConfiguration = serde_json::from_str(json).unwrap();
        assert_eq!(record.logo_image_reference.as_deref(), Some("file:///logo.png"));
        assert!(record.default_printer_address.is_none());
    }
}
