//! Configuration section definitions.
//!
//! Each module corresponds to a section in `bionic.toml`:
//!
//! | Module    | TOML Section | Purpose                                   |
//! |-----------|--------------|-------------------------------------------|
//! | `monitor` | `[monitor]`  | Debounce, chunking and rate budget        |
//! | `ledger`  | `[ledger]`   | Restoration ledger capacity               |
//! | `pdf`     | `[pdf]`      | Viewer polling, sweeps, script injection  |
//! | `store`   | `[store]`    | Preference persistence                    |

mod ledger;
mod monitor;
mod pdf;
mod store;

pub use ledger::LedgerConfig;
pub use monitor::MonitorConfig;
pub use pdf::PdfConfig;
pub use store::StoreConfig;
