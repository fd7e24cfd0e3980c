//! Registry actor: one Tokio task that owns a `PlayerRegistry`.
//!
//! The registry itself is single-owner. When a host delivers lifecycle
//! callbacks or lookups from several tasks, it spawns the registry here
//! and talks to it through a [`RegistryHandle`]. Every command goes
//! through one channel and is applied in arrival order, which makes the
//! task the single point where registry state is touched.

use std::sync::Arc;

use rollcall_protocol::PlayerId;
use rollcall_registry::{GameEntity, Player, PlayerRegistry, RegistryError};
use rollcall_storage::RecordStore;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

type Reply<T> = oneshot::Sender<T>;

/// Commands sent to the registry actor through its channel.
///
/// Every variant carries a `oneshot` reply channel, so callers can await
/// the result of their own command.
enum RegistryCommand<E> {
    Join {
        entity: Arc<E>,
        reply: Reply<Player<E>>,
    },
    Connect {
        entity: Arc<E>,
        reply: Reply<Player<E>>,
    },
    Disconnect {
        entity: Arc<E>,
        reply: Reply<Option<Player<E>>>,
    },
    GetPlayer {
        id: PlayerId,
        reply: Reply<Option<Player<E>>>,
    },
    GetConnectedPlayer {
        id: PlayerId,
        reply: Reply<Option<Player<E>>>,
    },
    AllPlayers {
        reply: Reply<Vec<Player<E>>>,
    },
    ConnectedPlayers {
        reply: Reply<Vec<Player<E>>>,
    },
    FindPlayer {
        partial: String,
        reply: Reply<Option<Player<E>>>,
    },
    FindPlayers {
        partial: String,
        reply: Reply<Vec<Player<E>>>,
    },
    FindConnectedPlayer {
        partial: String,
        reply: Reply<Option<Player<E>>>,
    },
    FindConnectedPlayers {
        partial: String,
        reply: Reply<Vec<Player<E>>>,
    },
    Save {
        reply: Reply<Result<(), RegistryError>>,
    },
    /// Save one last time and stop.
    Shutdown {
        reply: Reply<Result<(), RegistryError>>,
    },
}

/// Handle to a running registry actor.
///
/// Cheap to clone: it's an `mpsc::Sender` wrapper. Every method returns
/// [`RegistryError::Unavailable`] once the actor has stopped.
pub struct RegistryHandle<E> {
    sender: mpsc::Sender<RegistryCommand<E>>,
}

impl<E> Clone for RegistryHandle<E> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<E: GameEntity> RegistryHandle<E> {
    /// Sends a command built around a fresh reply channel and waits for
    /// the answer.
    async fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> RegistryCommand<E>,
    ) -> Result<T, RegistryError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| RegistryError::Unavailable)?;
        reply_rx.await.map_err(|_| RegistryError::Unavailable)
    }

    /// See [`PlayerRegistry::on_join`].
    pub async fn join(&self, entity: Arc<E>) -> Result<Player<E>, RegistryError> {
        self.request(|reply| RegistryCommand::Join { entity, reply }).await
    }

    /// See [`PlayerRegistry::on_connect`].
    pub async fn connect(&self, entity: Arc<E>) -> Result<Player<E>, RegistryError> {
        self.request(|reply| RegistryCommand::Connect { entity, reply })
            .await
    }

    /// See [`PlayerRegistry::on_disconnect`].
    pub async fn disconnect(
        &self,
        entity: Arc<E>,
    ) -> Result<Option<Player<E>>, RegistryError> {
        self.request(|reply| RegistryCommand::Disconnect { entity, reply })
            .await
    }

    /// See [`PlayerRegistry::get_player`].
    pub async fn get_player(
        &self,
        id: impl Into<PlayerId>,
    ) -> Result<Option<Player<E>>, RegistryError> {
        let id = id.into();
        self.request(|reply| RegistryCommand::GetPlayer { id, reply })
            .await
    }

    /// See [`PlayerRegistry::get_connected_player`].
    pub async fn get_connected_player(
        &self,
        id: impl Into<PlayerId>,
    ) -> Result<Option<Player<E>>, RegistryError> {
        let id = id.into();
        self.request(|reply| RegistryCommand::GetConnectedPlayer { id, reply })
            .await
    }

    /// See [`PlayerRegistry::all_players`].
    pub async fn all_players(&self) -> Result<Vec<Player<E>>, RegistryError> {
        self.request(|reply| RegistryCommand::AllPlayers { reply }).await
    }

    /// See [`PlayerRegistry::connected_players`].
    pub async fn connected_players(&self) -> Result<Vec<Player<E>>, RegistryError> {
        self.request(|reply| RegistryCommand::ConnectedPlayers { reply })
            .await
    }

    /// See [`PlayerRegistry::find_player`].
    pub async fn find_player(
        &self,
        partial: &str,
    ) -> Result<Option<Player<E>>, RegistryError> {
        let partial = partial.to_owned();
        self.request(|reply| RegistryCommand::FindPlayer { partial, reply })
            .await
    }

    /// See [`PlayerRegistry::find_players`].
    pub async fn find_players(
        &self,
        partial: &str,
    ) -> Result<Vec<Player<E>>, RegistryError> {
        let partial = partial.to_owned();
        self.request(|reply| RegistryCommand::FindPlayers { partial, reply })
            .await
    }

    /// See [`PlayerRegistry::find_connected_player`].
    pub async fn find_connected_player(
        &self,
        partial: &str,
    ) -> Result<Option<Player<E>>, RegistryError> {
        let partial = partial.to_owned();
        self.request(|reply| RegistryCommand::FindConnectedPlayer { partial, reply })
            .await
    }

    /// See [`PlayerRegistry::find_connected_players`].
    pub async fn find_connected_players(
        &self,
        partial: &str,
    ) -> Result<Vec<Player<E>>, RegistryError> {
        let partial = partial.to_owned();
        self.request(|reply| RegistryCommand::FindConnectedPlayers { partial, reply })
            .await
    }

    /// See [`PlayerRegistry::save`].
    pub async fn save(&self) -> Result<(), RegistryError> {
        self.request(|reply| RegistryCommand::Save { reply }).await?
    }

    /// Saves the records one last time and stops the actor.
    ///
    /// The outer error means the actor was already gone; the inner
    /// result is the final save.
    pub async fn shutdown(&self) -> Result<(), RegistryError> {
        self.request(|reply| RegistryCommand::Shutdown { reply })
            .await?
    }
}

/// Moves `registry` into a new Tokio task and returns a handle to it.
///
/// The task stops after [`RegistryHandle::shutdown`] or once every
/// handle has been dropped. The `JoinHandle` yields the registry back so
/// the caller can inspect or reuse it.
pub fn spawn_registry<E, S>(
    registry: PlayerRegistry<E, S>,
    channel_size: usize,
) -> (RegistryHandle<E>, JoinHandle<PlayerRegistry<E, S>>)
where
    E: GameEntity,
    S: RecordStore + Send + 'static,
{
    let (sender, receiver) = mpsc::channel(channel_size.max(1));
    let actor = RegistryActor { registry, receiver };
    let task = tokio::spawn(actor.run());
    (RegistryHandle { sender }, task)
}

/// The internal actor state. Runs inside a Tokio task.
struct RegistryActor<E, S> {
    registry: PlayerRegistry<E, S>,
    receiver: mpsc::Receiver<RegistryCommand<E>>,
}

impl<E: GameEntity, S: RecordStore> RegistryActor<E, S> {
    /// Processes commands until shutdown or until all handles are gone.
    async fn run(mut self) -> PlayerRegistry<E, S> {
        tracing::info!(
            namespace = %self.registry.namespace(),
            "registry actor started"
        );

        // A dropped reply receiver just means the caller stopped
        // waiting, so send failures are ignored.
        while let Some(cmd) = self.receiver.recv().await {
            let reg = &mut self.registry;
            match cmd {
                RegistryCommand::Join { entity, reply } => {
                    let _ = reply.send(reg.on_join(&entity).clone());
                }
                RegistryCommand::Connect { entity, reply } => {
                    let _ = reply.send(reg.on_connect(&entity).clone());
                }
                RegistryCommand::Disconnect { entity, reply } => {
                    let _ = reply.send(reg.on_disconnect(&entity));
                }
                RegistryCommand::GetPlayer { id, reply } => {
                    let _ = reply.send(reg.get_player(id).cloned());
                }
                RegistryCommand::GetConnectedPlayer { id, reply } => {
                    let _ = reply.send(reg.get_connected_player(id).cloned());
                }
                RegistryCommand::AllPlayers { reply } => {
                    let _ = reply.send(reg.all_players().cloned().collect());
                }
                RegistryCommand::ConnectedPlayers { reply } => {
                    let _ = reply.send(reg.connected_players().cloned().collect());
                }
                RegistryCommand::FindPlayer { partial, reply } => {
                    let _ = reply.send(reg.find_player(&partial).cloned());
                }
                RegistryCommand::FindPlayers { partial, reply } => {
                    let _ = reply.send(owned(reg.find_players(&partial)));
                }
                RegistryCommand::FindConnectedPlayer { partial, reply } => {
                    let _ = reply.send(reg.find_connected_player(&partial).cloned());
                }
                RegistryCommand::FindConnectedPlayers { partial, reply } => {
                    let _ = reply.send(owned(reg.find_connected_players(&partial)));
                }
                RegistryCommand::Save { reply } => {
                    let _ = reply.send(reg.save());
                }
                RegistryCommand::Shutdown { reply } => {
                    let result = reg.save();
                    if let Err(e) = &result {
                        tracing::error!(error = %e, "final save failed");
                    }
                    let _ = reply.send(result);
                    break;
                }
            }
        }

        tracing::info!(
            namespace = %self.registry.namespace(),
            "registry actor stopped"
        );
        self.registry
    }
}

fn owned<E>(players: Vec<&Player<E>>) -> Vec<Player<E>> {
    players.into_iter().cloned().collect()
}
