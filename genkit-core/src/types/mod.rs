//! Core types used throughout the GenKit library

pub mod message;
pub mod request;
pub mod stream;
pub mod tool;
