//! D-Bus connection management and player discovery.

use std::sync::Arc;
use tokio::sync::OnceCell;

/// Errors that can occur while talking to the host player.
#[derive(thiserror::Error, Debug)]
pub enum PlayerError {
    #[error("D-Bus error: {0}")]
    ZBus(#[from] zbus::Error),
    #[error("failed to establish D-Bus connection")]
    NoConnection,
}

/// Global D-Bus connection singleton
static DBUS_CONNECTION: OnceCell<Arc<zbus::Connection>> = OnceCell::const_new();

/// Get or create a shared D-Bus session connection
pub async fn get_dbus_conn() -> Result<Arc<zbus::Connection>, PlayerError> {
    DBUS_CONNECTION
        .get_or_try_init(|| async {
            let conn = zbus::Connection::session()
                .await
                .map_err(|_| PlayerError::NoConnection)?;
            Ok(Arc::new(conn))
        })
        .await
        .cloned()
}

const MPRIS_PREFIX: &str = "org.mpris.MediaPlayer2.";

/// Find the first MPRIS player on the bus that isn't blocked. `preferred`
/// short-circuits discovery when the user pinned a service name.
pub async fn find_player_service(
    preferred: Option<&str>,
    block_list: &[String],
) -> Result<Option<String>, PlayerError> {
    if let Some(service) = preferred {
        return Ok(Some(service.to_string()));
    }
    let conn = get_dbus_conn().await?;
    let proxy = zbus::fdo::DBusProxy::new(&conn).await?;
    let names = proxy
        .list_names()
        .await
        .map_err(zbus::Error::from)?;
    Ok(names
        .into_iter()
        .map(|n| n.to_string())
        .filter(|n| n.starts_with(MPRIS_PREFIX))
        .find(|n| !is_blocked(n, block_list)))
}

/// Returns true if the service name (case-insensitive) contains any blocked string.
pub fn is_blocked(service: &str, block_list: &[String]) -> bool {
    let service_lower = service.to_lowercase();
    block_list
        .iter()
        .any(|blocked| service_lower.contains(&blocked.to_lowercase()))
}
