//! Playback position and status queries.

use crate::player::connection::{PlayerError, get_dbus_conn};
use zbus::Proxy;
use zvariant::OwnedValue;

fn parse_position_ms(val: &OwnedValue) -> Option<i64> {
    if let Ok(i) = i64::try_from(val.clone()) {
        return Some(i / 1_000);
    }
    if let Ok(u) = u64::try_from(val.clone()) {
        return Some((u / 1_000) as i64);
    }
    None
}

/// Query the playback position (milliseconds) for an MPRIS player service.
/// Players report microseconds; unparseable answers count as position zero.
pub async fn get_position_ms(service: &str) -> Result<i64, PlayerError> {
    if service.is_empty() {
        return Ok(0);
    }
    let conn = get_dbus_conn().await?;
    // Targeted Properties.Get avoids triggering GetAll on some players
    let props_proxy = Proxy::new(
        &conn,
        service,
        "/org/mpris/MediaPlayer2",
        "org.freedesktop.DBus.Properties",
    )
    .await?;
    if let Ok(reply) = props_proxy
        .call_method("Get", &("org.mpris.MediaPlayer2.Player", "Position"))
        .await
        && let Ok(val) = reply.body().deserialize::<OwnedValue>()
        && let Some(pos) = parse_position_ms(&val)
    {
        return Ok(pos);
    }
    Ok(0)
}

/// Query the playback status ("Playing", "Paused", "Stopped") for a service.
pub async fn get_playback_status(service: &str) -> Result<String, PlayerError> {
    if service.is_empty() {
        return Ok("Stopped".to_string());
    }
    let conn = get_dbus_conn().await?;
    let props_proxy = Proxy::new(
        &conn,
        service,
        "/org/mpris/MediaPlayer2",
        "org.freedesktop.DBus.Properties",
    )
    .await?;
    if let Ok(reply) = props_proxy
        .call_method("Get", &("org.mpris.MediaPlayer2.Player", "PlaybackStatus"))
        .await
        && let Ok(val) = reply.body().deserialize::<OwnedValue>()
        && let Ok(status) = String::try_from(val)
    {
        return Ok(status);
    }
    Ok("Stopped".to_string())
}
