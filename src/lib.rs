pub mod config;
pub mod controller;
pub mod fit_api;
pub mod http_client;
pub mod labels;
pub mod provider;
pub mod state;
