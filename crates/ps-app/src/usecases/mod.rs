pub mod get_setup_configuration;
pub mod printer;
pub mod request_peripheral_access;
pub mod setup;

pub use get_setup_configuration::GetSetupConfiguration;
pub use request_peripheral_access::RequestPeripheralAccess;
