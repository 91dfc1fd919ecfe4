pub mod static_credentials;
