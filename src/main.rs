use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use warden::identity::{LocalAuthProvider, SessionManager};
use warden::roles::RoleRegistry;
use warden::store::DocumentStore;
use warden::users::UserRegistry;

fn main() -> anyhow::Result<()> {
    println!(
        r"                      _
 __      ____ _ _ __ __| | ___ _ __
 \ \ /\ / / _` | '__/ _` |/ _ \ '_ \
  \ V  V / (_| | | | (_| |  __/ | | |
   \_/\_/ \__,_|_|  \__,_|\___|_| |_|
       user & role management console"
    );

    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    // Startup banner at info level so something always prints at default verbosity
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    let db_folder = std::env::var("WARDEN_DB_FOLDER").unwrap_or_else(|_| "dbs".to_string());
    info!(
        target: "warden",
        "warden starting: RUST_LOG='{}', db_root='{}'",
        rust_log, db_folder
    );

    let store = DocumentStore::new(&db_folder)?;
    warden::seed::ensure_defaults(&store)?;

    let users = UserRegistry::open(store.clone());
    let roles = RoleRegistry::open(store);
    let provider = LocalAuthProvider::new(users.clone(), SessionManager::new());

    warden::cli::run_console(users, roles, provider)
}
