pub mod run_council;
