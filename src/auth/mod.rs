pub mod credentials;
pub mod store;
