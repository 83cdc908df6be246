// src/lib.rs
pub mod alert;
pub mod backend;
pub mod banner;
pub mod cancel;
pub mod config;
pub mod errors;
pub mod export;
pub mod form;
pub mod models;
pub mod normalize;
pub mod observe;
pub mod present;
pub mod runner;
pub mod session;
