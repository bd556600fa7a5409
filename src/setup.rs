pub mod init;

pub use init::{setup, setup_from_matrix};
