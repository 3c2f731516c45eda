//! # market-client
//!
//! Headless view controller for the campus-market client.
//!
//! Owns the session/view state machine, the command layer a rendering layer
//! invokes, and the bridge tasks that keep local state in step with the
//! live listing subscription and the identity provider. Rendering itself is
//! out of scope; consumers read [`Screen`](state::Screen) projections and
//! the [`AppEvent`](events::AppEvent) stream.

pub mod app;
pub mod bridge;
pub mod commands;
pub mod events;
pub mod filter;
pub mod state;

mod error;

pub use app::MarketApp;
pub use error::MarketError;
pub use events::AppEvent;
pub use filter::ListingFilter;
pub use state::{AppState, AuthScreen, Page, Screen, ViewState};

use tracing_subscriber::{fmt, EnvFilter};

/// Initialise structured logging for a client process. Call once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("market_client=debug,market_store=info,market_auth=info,warn")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
