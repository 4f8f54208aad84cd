//! Single-writer mailbox for the weight editor
//!
//! A tokio task owns the [`WeightEditor`]; every [`EditorHandle`] clone
//! sends commands through one bounded channel, so all mutations land in a
//! single total order no matter how many threads issue them.

use crate::editor::{EditorCommand, WeightEditor, WeightSummary};
use crate::error::EditorError;
use rand::Rng;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use weightmix_engine::{Item, ItemId, StrategyKind};

/// Messages handled by the owning task
#[derive(Debug)]
enum Message {
    /// Run a command and reply with the new snapshot
    Command {
        command: EditorCommand,
        reply: oneshot::Sender<Result<Vec<Item>, EditorError>>,
    },
    /// Reply with the current snapshot
    Snapshot { reply: oneshot::Sender<Vec<Item>> },
    /// Reply with the current summary
    Summary { reply: oneshot::Sender<WeightSummary> },
    /// Stop the task
    Shutdown,
}

/// Cloneable handle to an editor running on its own task
#[derive(Debug, Clone)]
pub struct EditorHandle {
    sender: mpsc::Sender<Message>,
}

impl EditorHandle {
    /// Move `editor` onto a new task
    ///
    /// The join handle yields the editor back once the task stops, either
    /// through [`EditorHandle::shutdown`] or when every handle is dropped.
    pub fn spawn<R>(editor: WeightEditor<R>) -> (Self, JoinHandle<WeightEditor<R>>)
    where
        R: Rng + Send + 'static,
    {
        let capacity = editor.config().mailbox_capacity.max(1);
        let (sender, receiver) = mpsc::channel(capacity);
        let task = tokio::spawn(run(editor, receiver));
        (Self { sender }, task)
    }

    /// Run one command
    ///
    /// # Errors
    /// The command's own rejection, or `MailboxClosed` when the task is gone.
    pub async fn execute(&self, command: EditorCommand) -> Result<Vec<Item>, EditorError> {
        let (reply, response) = oneshot::channel();
        self.send(Message::Command { command, reply }).await?;
        response.await.map_err(|_| EditorError::MailboxClosed)?
    }

    /// Append a default-named item
    ///
    /// # Errors
    /// `MailboxClosed`.
    pub async fn add_item(&self) -> Result<Vec<Item>, EditorError> {
        self.execute(EditorCommand::AddItem).await
    }

    /// Delete an item
    ///
    /// # Errors
    /// See [`WeightEditor::remove_item`].
    pub async fn remove_item(&self, id: ItemId) -> Result<Vec<Item>, EditorError> {
        self.execute(EditorCommand::RemoveItem { id }).await
    }

    /// Rename an item
    ///
    /// # Errors
    /// See [`WeightEditor::rename_item`].
    pub async fn rename_item(
        &self,
        id: ItemId,
        name: impl Into<String>,
    ) -> Result<Vec<Item>, EditorError> {
        self.execute(EditorCommand::RenameItem {
            id,
            name: name.into(),
        })
        .await
    }

    /// Set an item's weight
    ///
    /// # Errors
    /// See [`WeightEditor::set_weight`].
    pub async fn set_weight(&self, id: ItemId, value: i64) -> Result<Vec<Item>, EditorError> {
        self.execute(EditorCommand::SetWeight { id, value }).await
    }

    /// Set an item's weight from text
    ///
    /// # Errors
    /// See [`WeightEditor::set_weight_input`].
    pub async fn set_weight_input(
        &self,
        id: ItemId,
        input: impl Into<String>,
    ) -> Result<Vec<Item>, EditorError> {
        self.execute(EditorCommand::SetWeightInput {
            id,
            input: input.into(),
        })
        .await
    }

    /// Flip an item's lock
    ///
    /// # Errors
    /// See [`WeightEditor::toggle_lock`].
    pub async fn toggle_lock(&self, id: ItemId) -> Result<Vec<Item>, EditorError> {
        self.execute(EditorCommand::ToggleLock { id }).await
    }

    /// Move an item
    ///
    /// # Errors
    /// See [`WeightEditor::reorder`].
    pub async fn reorder(&self, source: ItemId, target: ItemId) -> Result<Vec<Item>, EditorError> {
        self.execute(EditorCommand::Reorder { source, target }).await
    }

    /// Apply a distribution strategy
    ///
    /// # Errors
    /// See [`WeightEditor::apply_strategy`].
    pub async fn apply_strategy(&self, kind: StrategyKind) -> Result<Vec<Item>, EditorError> {
        self.execute(EditorCommand::ApplyStrategy { kind }).await
    }

    /// Current snapshot
    ///
    /// # Errors
    /// `MailboxClosed`.
    pub async fn snapshot(&self) -> Result<Vec<Item>, EditorError> {
        let (reply, response) = oneshot::channel();
        self.send(Message::Snapshot { reply }).await?;
        response.await.map_err(|_| EditorError::MailboxClosed)
    }

    /// Current summary
    ///
    /// # Errors
    /// `MailboxClosed`.
    pub async fn summary(&self) -> Result<WeightSummary, EditorError> {
        let (reply, response) = oneshot::channel();
        self.send(Message::Summary { reply }).await?;
        response.await.map_err(|_| EditorError::MailboxClosed)
    }

    /// Ask the owning task to stop after the messages already queued
    ///
    /// # Errors
    /// `MailboxClosed` when the task already stopped.
    pub async fn shutdown(&self) -> Result<(), EditorError> {
        self.send(Message::Shutdown).await
    }

    async fn send(&self, message: Message) -> Result<(), EditorError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| EditorError::MailboxClosed)
    }
}

async fn run<R: Rng>(
    mut editor: WeightEditor<R>,
    mut receiver: mpsc::Receiver<Message>,
) -> WeightEditor<R> {
    tracing::debug!("Editor task started with {} items", editor.len());

    while let Some(message) = receiver.recv().await {
        match message {
            Message::Command { command, reply } => {
                let result = editor.execute(command).map(<[Item]>::to_vec);
                // receiver may have given up; the command still happened
                let _ = reply.send(result);
            }
            Message::Snapshot { reply } => {
                let _ = reply.send(editor.items().to_vec());
            }
            Message::Summary { reply } => {
                let _ = reply.send(editor.summary());
            }
            Message::Shutdown => break,
        }
    }

    tracing::debug!("Editor task stopped");
    editor
}
