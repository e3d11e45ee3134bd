//! `diaglog message` – print the user-facing message for a kind.

use anyhow::Result;
use diaglog_core::reporter::user_facing_message;
use diaglog_core::retry::ErrorKind;

pub fn run_message(kind: ErrorKind, cause: Option<&str>, key: bool) -> Result<()> {
    let msg = user_facing_message(kind, cause);
    if key {
        println!("{}", msg.key());
    } else {
        println!("{msg}");
    }
    Ok(())
}
