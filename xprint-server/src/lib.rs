//! xprint server - HTTP gateway for USB receipt printers
//!
//! # Overview
//!
//! Accepts print jobs over HTTP and sends them to a receipt printer found
//! on the local USB bus:
//!
//! - **API** (`api`): `POST /print`, `GET /health`
//! - **Printing** (`printing`): discovery → connection → formatting for
//!   each job, with no printer handle cached between jobs
//! - **Core** (`core`): configuration, state, errors, server lifecycle
//!
//! # Module layout
//!
//! ```text
//! xprint-server/src/
//! ├── core/          # config, state, errors, server
//! ├── api/           # HTTP routes and handlers
//! ├── printing/      # dispatcher and async print service
//! └── utils/         # logging
//! ```

pub mod api;
pub mod core;
pub mod printing;
pub mod utils;

// Re-export public types
pub use core::{Config, Server, ServerError, ServerState};
pub use printing::{DispatchError, PrintDispatcher, PrintService};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

/// Load `.env`, read configuration and start logging
pub fn setup_environment() -> Config {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    init_logger_with_file(&config.log_level, config.log_dir.as_deref());
    config
}

pub fn print_banner() {
    println!(
        r#"
 __  ___ __  _ __(_)_ __ | |_
 \ \/ / '_ \| '__| | '_ \| __|
  >  <| |_) | |  | | | | | |_
 /_/\_\ .__/|_|  |_|_| |_|\__|
      |_|
    "#
    );
}
