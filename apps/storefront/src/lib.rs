//! # Lounge Storefront Library
//!
//! Composition root of the lounge ordering app: builds the state objects,
//! wires cart persistence and runs the requested command.
//!
//! ## Module Organization
//! ```text
//! lounge_storefront_lib/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── cli.rs          ◄─── clap definitions, dispatch, printing
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── cart.rs     ◄─── CartStore (cart + persistence subscriber)
//! │   ├── menu.rs     ◄─── Catalog loaded from the menu file
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── menu.rs     ◄─── Menu listing
//! │   ├── cart.rs     ◄─── Cart manipulation commands
//! │   ├── checkout.rs ◄─── Validation gate + order submission
//! │   ├── coupon.rs   ◄─── Coupon lookup
//! │   └── orders.rs   ◄─── Order history
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## State Management
//! No globals. [`AppState::init`] builds every state object once and the
//! commands borrow only the pieces they need:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Storefront State                                     │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────┐  │
//! │  │ ConfigState  │ │   DbState    │ │  MenuState   │ │  CartStore   │  │
//! │  │              │ │              │ │              │ │              │  │
//! │  │ • Store name │ │ • SQLite pool│ │ • Products   │ │ • Live cart  │  │
//! │  │ • Currency   │ │ • Migrations │ │ • Categories │ │ • Persisted  │  │
//! │  │ • Coupons    │ │ • Order log  │ │              │ │   on change  │  │
//! │  └──────────────┘ └──────────────┘ └──────────────┘ └──────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use error::ApiError;
use lounge_db::{Database, DbConfig};
use state::{CartStore, ConfigState, DbState, MenuState};

/// Everything a command may need, built once per process.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: ConfigState,
    pub db: DbState,
    pub menu: MenuState,
    pub cart: CartStore,
}

impl AppState {
    /// ## Startup Sequence
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────────┐
    /// │                       Application Startup                               │
    /// │                                                                         │
    /// │  1. Connect to Database ──────────────────────────────────────────────► │
    /// │     • SQLite with WAL mode (file databases)                             │
    /// │     • Run pending migrations                                            │
    /// │                                                                         │
    /// │  2. Load Menu ────────────────────────────────────────────────────────► │
    /// │     • JSON file, bad entries skipped                                    │
    /// │                                                                         │
    /// │  3. Rehydrate Cart ───────────────────────────────────────────────────► │
    /// │     • `lounge-cart` from storage, empty if missing or corrupt           │
    /// └─────────────────────────────────────────────────────────────────────────┘
    /// ```
    pub async fn init(config: ConfigState) -> Result<Self, ApiError> {
        debug!(path = %config.database_path.display(), "Database path determined");

        let db = Database::new(DbConfig::new(config.database_path.clone())).await?;
        let menu = MenuState::load(&config.menu_path).await?;
        let cart = CartStore::load(&db).await?;

        info!(store = %config.store_name, "Storefront ready");

        Ok(AppState {
            config,
            db: DbState::new(db),
            menu,
            cart,
        })
    }
}

/// Runs one CLI invocation: logging, configuration, state, command.
pub async fn run(cli: Cli) -> Result<(), ApiError> {
    init_tracing();

    let config = ConfigState::from_env()?;
    let app = AppState::init(config).await?;

    let result = cli.run(&app).await;

    app.db.inner().close().await;
    result
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so command output on stdout stays clean.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=lounge=trace` - Show trace for lounge crates only
/// - Default: INFO, debug for lounge crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lounge=debug,sqlx=warn"));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .with_writer(std::io::stderr)
        .try_init();
}
