pub mod activation;
pub mod config;
pub mod download;
pub mod link;
pub mod registry;
pub mod remote;
pub mod version;
