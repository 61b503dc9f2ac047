pub mod init;
pub mod message;
pub mod session;
