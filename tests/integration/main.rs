//! Integration tests for poly-streak

mod backtest_test;
mod config_test;
mod fetch_test;
