pub mod log_sender;

pub use log_sender::LogCodeSender;
