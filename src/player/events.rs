//! Host player event watching.
//!
//! A background task subscribes to the active player's property changes and
//! `Seeked` signal and forwards them as [`PlayerEvent`]s over a channel.
//! The subscription lives for as long as the task; dropping the receiver
//! ends the task, which is how the UI disconnects on teardown.

use crate::player::connection::{PlayerError, find_player_service, get_dbus_conn};
use crate::player::metadata::{TrackMetadata, extract_metadata};
use futures_util::StreamExt;
use std::collections::HashMap;
use tokio::sync::mpsc;
use zbus::proxy;
use zvariant::OwnedValue;

/// MPRIS MediaPlayer2.Player interface proxy
#[proxy(
    interface = "org.mpris.MediaPlayer2.Player",
    default_path = "/org/mpris/MediaPlayer2"
)]
trait MediaPlayer2Player {
    #[zbus(property)]
    fn metadata(&self) -> zbus::Result<HashMap<String, OwnedValue>>;

    #[zbus(property)]
    fn position(&self) -> zbus::Result<i64>;

    #[zbus(property)]
    fn playback_status(&self) -> zbus::Result<String>;

    #[zbus(signal)]
    fn seeked(&self, position: i64) -> zbus::Result<()>;
}

#[derive(Debug, Clone)]
pub enum PlayerEvent {
    /// A (possibly new) track is current; carries fresh metadata.
    TrackChanged {
        meta: TrackMetadata,
        position_ms: i64,
        playing: bool,
        service: String,
    },
    Seeked {
        position_ms: i64,
    },
    PlaybackChanged {
        playing: bool,
        position_ms: i64,
    },
    /// No unblocked player is on the bus right now.
    PlayerGone,
}

/// Watch the host player, forwarding events until the receiver is dropped.
pub async fn watch_player(
    tx: mpsc::Sender<PlayerEvent>,
    preferred: Option<String>,
    block_list: Vec<String>,
) -> Result<(), PlayerError> {
    let conn = get_dbus_conn().await?;
    loop {
        let service = match find_player_service(preferred.as_deref(), &block_list).await? {
            Some(service) => service,
            None => {
                if tx.send(PlayerEvent::PlayerGone).await.is_err() {
                    return Ok(());
                }
                tokio::time::sleep(std::time::Duration::from_secs(2)).await;
                continue;
            }
        };

        tracing::debug!(service = %service, "watching player");
        let proxy = MediaPlayer2PlayerProxy::builder(&conn)
            .destination(service.as_str())?
            .build()
            .await?;

        // Announce the current track before streaming changes.
        let mut last_meta = proxy
            .metadata()
            .await
            .map(|map| extract_metadata(&map))
            .unwrap_or_default();
        let position_ms = proxy.position().await.map(|us| us / 1_000).unwrap_or(0);
        let mut last_status = proxy
            .playback_status()
            .await
            .unwrap_or_else(|_| "Stopped".to_string());
        let announce = PlayerEvent::TrackChanged {
            meta: last_meta.clone(),
            position_ms,
            playing: last_status == "Playing",
            service: service.clone(),
        };
        if tx.send(announce).await.is_err() {
            return Ok(());
        }

        let mut seeked_stream = proxy.receive_seeked().await?;
        let mut metadata_stream = proxy.receive_metadata_changed().await;
        let mut status_stream = proxy.receive_playback_status_changed().await;

        loop {
            let event = tokio::select! {
                Some(signal) = seeked_stream.next() => {
                    match signal.args() {
                        Ok(args) => Some(PlayerEvent::Seeked { position_ms: args.position / 1_000 }),
                        Err(_) => None,
                    }
                }

                Some(_) = metadata_stream.next() => {
                    match proxy.metadata().await {
                        Ok(map) => {
                            let meta = extract_metadata(&map);
                            if meta == last_meta {
                                None
                            } else {
                                last_meta = meta.clone();
                                let position_ms =
                                    proxy.position().await.map(|us| us / 1_000).unwrap_or(0);
                                Some(PlayerEvent::TrackChanged {
                                    meta,
                                    position_ms,
                                    playing: last_status == "Playing",
                                    service: service.clone(),
                                })
                            }
                        }
                        Err(_) => None,
                    }
                }

                Some(_) = status_stream.next() => {
                    match proxy.playback_status().await {
                        Ok(status) if status != last_status => {
                            last_status = status.clone();
                            let position_ms =
                                proxy.position().await.map(|us| us / 1_000).unwrap_or(0);
                            Some(PlayerEvent::PlaybackChanged {
                                playing: status == "Playing",
                                position_ms,
                            })
                        }
                        _ => None,
                    }
                }

                // The player may vanish without closing its streams; probe it.
                _ = tokio::time::sleep(std::time::Duration::from_secs(2)) => {
                    if proxy.playback_status().await.is_err() {
                        if tx.send(PlayerEvent::PlayerGone).await.is_err() {
                            return Ok(());
                        }
                        break;
                    }
                    None
                }
            };

            if let Some(event) = event
                && tx.send(event).await.is_err()
            {
                return Ok(());
            }
        }
    }
}
