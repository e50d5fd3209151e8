#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod board;
pub mod chat;
pub mod client;
pub mod event;
pub mod game;
