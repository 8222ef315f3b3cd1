mod setup_event;

pub use setup_event::ConsoleSetupEventPort;
