use crate::command::{Command, CommandInner};
use crate::component::Component;
use crate::subscription::SubscriptionManager;
use tokio::sync::mpsc;

/// A headless event loop for one [`Component`].
///
/// The driver owns the component, executes the [`Command`]s it returns
/// (spawning futures on the current tokio runtime and feeding their results
/// back as messages) and reconciles its [`Subscription`](crate::Subscription)s
/// after every update. It does not touch the terminal: the embedding
/// application renders the component itself.
///
/// Must be created inside a tokio runtime.
///
/// # Example
///
/// ```rust,ignore
/// use trellis_core::Driver;
///
/// let mut driver = Driver::new(tooltip);
/// let (cmd, settled) = driver.component_mut().show();
/// driver.execute(cmd);
/// driver.run_until_settled(settled).await;
/// ```
pub struct Driver<C: Component> {
    component: C,
    msg_tx: mpsc::UnboundedSender<C::Message>,
    msg_rx: mpsc::UnboundedReceiver<C::Message>,
    subscriptions: SubscriptionManager<C::Message>,
    #[allow(clippy::type_complexity)]
    inspector: Option<Box<dyn FnMut(&C::Message) + Send>>,
}

impl<C: Component> Driver<C> {
    /// Wrap `component` and start its initial subscriptions.
    pub fn new(component: C) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let subscriptions = SubscriptionManager::new(msg_tx.clone());
        let mut driver = Self {
            component,
            msg_tx,
            msg_rx,
            subscriptions,
            inspector: None,
        };
        driver.reconcile();
        driver
    }

    /// Observe every message before it reaches `update`.
    ///
    /// Parents use this to intercept outward notifications; tests use it to
    /// record them.
    pub fn with_inspector(mut self, inspector: impl FnMut(&C::Message) + Send + 'static) -> Self {
        self.inspector = Some(Box::new(inspector));
        self
    }

    /// The driven component.
    pub fn component(&self) -> &C {
        &self.component
    }

    /// Mutable access for calling widget methods directly. Hand any command
    /// they return to [`execute`](Driver::execute).
    pub fn component_mut(&mut self) -> &mut C {
        &mut self.component
    }

    /// Number of running subscriptions.
    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.active_count()
    }

    /// Run one update cycle for `msg`.
    pub fn dispatch(&mut self, msg: C::Message) {
        if let Some(inspector) = self.inspector.as_mut() {
            inspector(&msg);
        }
        let cmd = self.component.update(msg);
        self.execute(cmd);
    }

    /// Execute a command and reconcile subscriptions.
    pub fn execute(&mut self, cmd: Command<C::Message>) {
        execute_command(cmd, &self.msg_tx);
        self.reconcile();
    }

    /// Wait for the next message and dispatch it. Returns `false` once no
    /// message can arrive any more.
    pub async fn step(&mut self) -> bool {
        match self.msg_rx.recv().await {
            Some(msg) => {
                self.dispatch(msg);
                true
            }
            None => false,
        }
    }

    /// Dispatch every message that is already queued, without waiting.
    pub fn drain(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch(msg);
        }
    }

    /// Keep dispatching until `done` holds for the component.
    pub async fn run_until(&mut self, mut done: impl FnMut(&C) -> bool) {
        while !done(&self.component) {
            if !self.step().await {
                break;
            }
        }
    }

    /// Keep dispatching until `future` completes, then dispatch whatever was
    /// queued meanwhile.
    pub async fn run_until_settled<F: std::future::Future>(&mut self, future: F) -> F::Output {
        tokio::pin!(future);
        loop {
            tokio::select! {
                biased;
                output = &mut future => {
                    self.drain();
                    return output;
                }
                Some(msg) = self.msg_rx.recv() => self.dispatch(msg),
            }
        }
    }

    /// Stop all subscriptions and return the component.
    pub fn shutdown(mut self) -> C {
        self.subscriptions.shutdown();
        self.component
    }

    fn reconcile(&mut self) {
        let subs = self.component.subscriptions();
        self.subscriptions.reconcile(subs);
    }
}

fn execute_command<Msg: Send + 'static>(cmd: Command<Msg>, tx: &mpsc::UnboundedSender<Msg>) {
    match cmd.inner {
        CommandInner::None => {}
        CommandInner::Message(msg) => {
            let _ = tx.send(msg);
        }
        CommandInner::Future(fut) => {
            let tx = tx.clone();
            tokio::spawn(async move {
                let _ = tx.send(fut.await);
            });
        }
        CommandInner::Batch(cmds) => {
            for cmd in cmds {
                execute_command(cmd, tx);
            }
        }
    }
}
