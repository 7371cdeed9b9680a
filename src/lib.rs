//! Indicator tracking for a provincial health office.
//!
//! Indicator records hold a sparse timeframe x area matrix of result cells.
//! The crate derives pass/fail status from scores, rolls cells up into
//! dashboard and executive statistics, filters and sorts the indicator table,
//! and applies single-cell edits that are persisted through an
//! [`store::IndicatorStore`].

pub mod catalog;
pub mod config;
pub mod edit;
pub mod error;
pub mod evaluate;
pub mod loader;
pub mod notify;
pub mod output;
pub mod reports;
pub mod seed;
pub mod session;
pub mod store;
pub mod types;
pub mod util;
pub mod view;
