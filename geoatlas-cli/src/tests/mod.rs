//! Shared test harness modules for the geoatlas CLI.
use super::*;

mod helpers;
