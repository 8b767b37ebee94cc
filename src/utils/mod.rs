pub mod ip;
pub mod uptime;

pub use ip::{clean_forwarded_ip, extract_forwarded_ip, is_private_or_local, is_valid_ip_literal};
pub use uptime::{format_duration_human, uptime_seconds};
