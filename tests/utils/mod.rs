#![allow(dead_code)]

pub mod logging;
pub mod mock;
pub mod rand;
