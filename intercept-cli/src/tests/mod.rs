//! Shared test harness modules for the intercept CLI.

use super::*;

mod candidates_unit;
mod feature_flags;
mod helpers;
mod select_steps;
