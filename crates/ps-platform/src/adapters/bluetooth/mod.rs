mod bluez;
mod transport;

pub use bluez::BluezHost;
pub use transport::BluetoothTransport;
