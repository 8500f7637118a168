pub mod graphml;
pub mod jsonl;
pub mod save_all;
