//! Plugin session
//!
//! Drives one plugin run: announces the launch command, then serves UI
//! requests from an `mpsc` channel until the UI asks to close. Fatal
//! migration errors are turned into `notify` messages; the session itself
//! keeps running.

use crate::error::SessionError;
use crate::export::export_library;
use crate::orchestrator::Migrator;
use crate::protocol::{PluginCommand, PluginMessage, UiRequest};
use libswap_document::DocumentStore;
use libswap_mapping::KeyMapping;
use tokio::sync::mpsc;

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closed,
}

/// One plugin session
pub struct PluginSession<D: ?Sized, M: ?Sized> {
    command: PluginCommand,
    migrator: Migrator<D, M>,
    outbox: mpsc::Sender<PluginMessage>,
    state: SessionState,
}

impl<D, M> PluginSession<D, M>
where
    D: DocumentStore + ?Sized,
    M: KeyMapping + ?Sized,
{
    /// Start a session and send `init`
    ///
    /// # Errors
    /// Returns [`SessionError::UiDisconnected`] if the UI channel is closed
    pub async fn start(
        command: PluginCommand,
        migrator: Migrator<D, M>,
        outbox: mpsc::Sender<PluginMessage>,
    ) -> Result<Self, SessionError> {
        let session = Self {
            command,
            migrator,
            outbox,
            state: SessionState::Open,
        };
        tracing::info!("Plugin session started: {}", command);
        session.send(PluginMessage::Init { command }).await?;
        Ok(session)
    }

    /// Launch command
    #[inline]
    #[must_use]
    pub fn command(&self) -> PluginCommand {
        self.command
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Handle one UI request
    ///
    /// # Errors
    /// Returns error if the session is closed or the UI channel is gone
    pub async fn handle(&mut self, request: UiRequest) -> Result<SessionState, SessionError> {
        if self.state == SessionState::Closed {
            return Err(SessionError::Closed);
        }

        match request {
            UiRequest::RequestExportData => {
                let message = match export_library(self.migrator.document()).await {
                    Ok(payload) => PluginMessage::ExportData { payload },
                    Err(err) => {
                        tracing::warn!("Library export failed: {}", err);
                        PluginMessage::error(format!("Export failed: {err}"))
                    }
                };
                self.send(message).await?;
            }
            UiRequest::RunMigration { direction } => {
                let Some(direction) = direction.or_else(|| self.command.direction()) else {
                    self.send(PluginMessage::error("No migration direction given"))
                        .await?;
                    return Ok(self.state);
                };
                let message = match self.migrator.migrate_selection(direction).await {
                    Ok(report) => PluginMessage::MigrationComplete(report),
                    Err(err) => PluginMessage::error(err.notice()),
                };
                self.send(message).await?;
            }
            UiRequest::ClosePlugin => {
                self.state = SessionState::Closed;
                tracing::info!("Plugin session closed");
                self.send(PluginMessage::Closed).await?;
            }
        }
        Ok(self.state)
    }

    /// Serve requests until the UI closes the plugin
    ///
    /// # Errors
    /// Returns [`SessionError::UiDisconnected`] if the request channel ends
    /// before `close-plugin`
    pub async fn run(mut self, mut inbox: mpsc::Receiver<UiRequest>) -> Result<(), SessionError> {
        while let Some(request) = inbox.recv().await {
            tracing::debug!("UI request: {:?}", request);
            if self.handle(request).await? == SessionState::Closed {
                return Ok(());
            }
        }
        Err(SessionError::UiDisconnected)
    }

    async fn send(&self, message: PluginMessage) -> Result<(), SessionError> {
        self.outbox
            .send(message)
            .await
            .map_err(|_| SessionError::UiDisconnected)
    }
}
