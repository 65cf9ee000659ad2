//! Single-task message loop around the controller.
//!
//! Events are queued on an mpsc channel and applied one at a time, so
//! storage mutations never overlap no matter how quickly the host fires
//! them. After each event the new view is published on a watch channel.

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::controller::PopupController;
use crate::error::ControllerError;
use crate::event::UiEvent;
use crate::view::ViewState;

const QUEUE_DEPTH: usize = 64;

struct Envelope {
    event: UiEvent,
    reply: oneshot::Sender<Result<(), ControllerError>>,
}

/// Cloneable handle used to feed events into a running loop.
#[derive(Clone)]
pub struct UiHandle {
    tx: mpsc::Sender<Envelope>,
    view: watch::Receiver<ViewState>,
}

impl UiHandle {
    /// Queue an event and wait until it has been applied.
    pub async fn dispatch(&self, event: UiEvent) -> Result<ViewState, ControllerError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Envelope { event, reply })
            .await
            .map_err(|_| ControllerError::LoopClosed)?;

        rx.await.map_err(|_| ControllerError::LoopClosed)??;
        Ok(self.view())
    }

    /// The most recently published view.
    pub fn view(&self) -> ViewState {
        self.view.borrow().clone()
    }

    /// Receiver that is notified after every processed event.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view.clone()
    }
}

pub struct EventLoop;

impl EventLoop {
    /// Spawn the loop on the current runtime.
    ///
    /// The loop stops once every [`UiHandle`] is dropped and hands the
    /// controller back through the join handle.
    pub fn spawn(controller: PopupController) -> (UiHandle, JoinHandle<PopupController>) {
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        let (view_tx, view_rx) = watch::channel(controller.view().clone());

        let task = tokio::spawn(Self::run(controller, rx, view_tx));
        (UiHandle { tx, view: view_rx }, task)
    }

    async fn run(
        mut controller: PopupController,
        mut rx: mpsc::Receiver<Envelope>,
        view_tx: watch::Sender<ViewState>,
    ) -> PopupController {
        while let Some(Envelope { event, reply }) = rx.recv().await {
            let name = event.name();
            let result = controller.handle(event).await;
            if let Err(ref e) = result {
                error!(event = name, error = %e, "Event failed");
            }

            view_tx.send_replace(controller.view().clone());
            if reply.send(result).is_err() {
                debug!(event = name, "Dispatcher went away before the reply");
            }
        }

        debug!("Event loop stopped");
        controller
    }
}
