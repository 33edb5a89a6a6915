//! Integration tests for Twiggy

mod cli_binary;
mod config_loading;
mod ignore_rules;
mod scan_scenarios;
mod watch_loop;
