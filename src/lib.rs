//! poly-streak: Streak-reversal backtester for Polymarket up/down rounds
//!
//! This library provides the core components for:
//! - Round slug encoding and window arithmetic
//! - Resilient JSON fetching with timeout, retry and backoff
//! - Market lookup via Gamma API and token prices via CLOB API
//! - Tiered resolution of round outcomes
//! - Bounded-concurrency resolution of round batches
//! - Streak signal detection, win-rate summaries and next-round prediction
//! - Discord notifications and a full observability stack

pub mod backtest;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod market;
pub mod notify;
pub mod resolver;
pub mod signal;
pub mod telemetry;
