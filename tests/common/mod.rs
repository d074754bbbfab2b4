// Shared helpers; not every integration test target uses every helper
#![allow(dead_code)]

pub mod fixtures;
pub mod wiremock_helpers;
