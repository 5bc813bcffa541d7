//! Owns lifecycle instances on dedicated threads and hands out remote-call handles to them.

use std::any::{Any, type_name};
use std::fmt;
use std::num::NonZero;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, mpsc};
use std::thread::{self, JoinHandle};

use tracing::{debug, error};

use crate::panic_message;

type Factory<C> = Arc<dyn Fn() -> C + Send + Sync>;
type Call<C> = Box<dyn FnOnce(&mut C) + Send>;

enum Command<C> {
    Create(Factory<C>),
    Call { slot: usize, call: Call<C> },
    Shutdown,
}

/// A registry of objects that each live on one server thread and are only reachable through
/// [`ContextHandle`]s.
///
/// Every object is created by the registry's factory on the thread that will own it, and it
/// never moves from there. All reads and writes, from any thread, are shipped to the owning
/// thread as closures and answered over a oneshot channel. Objects therefore need not be
/// `Send`, and no two calls to the same object ever overlap.
///
/// Objects are spread over a fixed number of server threads ("shards") so that calls to
/// different objects can proceed in parallel.
///
/// # Lifecycle
///
/// Dropping the registry drops all objects and waits for the server threads to exit. Handles
/// that outlive the registry report every call as failed.
pub struct ContextRegistry<C: 'static> {
    shards: Vec<Shard<C>>,
    factory: Factory<C>,
    created: usize,
}

struct Shard<C> {
    command_tx: mpsc::Sender<Command<C>>,
    join_handle: Option<JoinHandle<()>>,
}

impl<C: 'static> ContextRegistry<C> {
    /// Creates a registry with `shards` server threads whose objects are created by `factory`.
    #[must_use]
    pub fn new<F>(shards: NonZero<usize>, factory: F) -> Self
    where
        F: Fn() -> C + Send + Sync + 'static,
    {
        let shards = (0..shards.get())
            .map(|shard_index| {
                let (command_tx, command_rx) = mpsc::channel();

                let join_handle = thread::Builder::new()
                    .name(format!("process-sweep-registry-{shard_index}"))
                    .spawn(move || {
                        debug!(shard_index, "registry shard started");
                        serve(&command_rx);
                        debug!(shard_index, "registry shard exiting");
                    })
                    .expect(
                        "failed to spawn registry thread: thread spawning failure is not supported",
                    );

                Shard {
                    command_tx,
                    join_handle: Some(join_handle),
                }
            })
            .collect();

        Self {
            shards,
            factory: Arc::new(factory),
            created: 0,
        }
    }

    /// Creates a new object on its owning thread and returns a handle to it.
    ///
    /// Requires `&mut self` because the slot of each object is derived from creation order.
    pub fn create(&mut self) -> ContextHandle<C> {
        let id = self.created;
        self.created = self.created.saturating_add(1);

        // Objects are dealt round-robin, so each shard sees its creations in order and the
        // slot of an object in its shard is the number of objects created there before it.
        let shard_count = self.shards.len();
        let shard = self
            .shards
            .get(id.checked_rem(shard_count).unwrap_or_default())
            .expect("type invariant - registry always has at least one shard");
        let slot = id.checked_div(shard_count).unwrap_or_default();

        // If the shard is gone the handle reports failure on first use.
        _ = shard
            .command_tx
            .send(Command::Create(Arc::clone(&self.factory)));

        ContextHandle {
            command_tx: shard.command_tx.clone(),
            slot,
            id,
        }
    }

    /// Number of objects created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.created
    }

    /// Whether no objects have been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.created == 0
    }
}

impl<C: 'static> fmt::Debug for ContextRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("shards", &self.shards.len())
            .field("created", &self.created)
            .finish_non_exhaustive()
    }
}

impl<C: 'static> Drop for ContextRegistry<C> {
    #[cfg_attr(test, mutants::skip)] // Impractical to test that stuff stops happening.
    fn drop(&mut self) {
        for shard in &self.shards {
            _ = shard.command_tx.send(Command::Shutdown);
        }

        if thread::panicking() {
            // Joining could block on a hook that is stuck. Do not make an unwinding thread
            // wait for that, the server threads exit once their channel is closed.
            return;
        }

        for shard in &mut self.shards {
            if let Some(join_handle) = shard.join_handle.take() {
                // Server threads catch every panic of the objects they serve.
                _ = join_handle.join();
            }
        }
    }
}

fn serve<C>(command_rx: &mpsc::Receiver<Command<C>>) {
    // A slot is `None` if the factory panicked for it.
    let mut objects: Vec<Option<C>> = Vec::new();

    while let Ok(command) = command_rx.recv() {
        match command {
            Command::Create(factory) => {
                let object = panic::catch_unwind(AssertUnwindSafe(|| factory()))
                    .inspect_err(|payload| {
                        error!(
                            panic_message = %panic_message(payload.as_ref()),
                            "context factory panicked"
                        );
                    })
                    .ok();

                objects.push(object);
            }
            Command::Call { slot, call } => {
                // Dropping the call without running it closes its reply channel, which the
                // caller observes as a failed call.
                if let Some(object) = objects.get_mut(slot).and_then(Option::as_mut) {
                    call(object);
                }
            }
            Command::Shutdown => break,
        }
    }
}

/// A cloneable remote-call stub for one object owned by a [`ContextRegistry`].
///
/// Handles are `Send` and `Sync` even when the object is not, because the object itself never
/// leaves its owning thread.
pub struct ContextHandle<C> {
    command_tx: mpsc::Sender<Command<C>>,
    slot: usize,
    id: usize,
}

impl<C> ContextHandle<C> {
    /// Runs `f` against the object on its owning thread and returns the result.
    ///
    /// Blocks until the call completes.
    ///
    /// # Errors
    ///
    /// Returns the panic payload if `f` panicked. Returns a payload describing the failure if
    /// the object does not exist because its registry was dropped or its factory panicked.
    pub fn call<R, F>(&self, f: F) -> thread::Result<R>
    where
        F: FnOnce(&mut C) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (result_tx, result_rx) = oneshot::channel();

        let call: Call<C> = Box::new(move |object| {
            let result = panic::catch_unwind(AssertUnwindSafe(|| f(object)));

            // The caller may have given up waiting, in which case nobody needs the result.
            _ = result_tx.send(result);
        });

        if self
            .command_tx
            .send(Command::Call {
                slot: self.slot,
                call,
            })
            .is_err()
        {
            return Err(unavailable(self.id));
        }

        result_rx.recv().unwrap_or_else(|_| Err(unavailable(self.id)))
    }

    /// Creation index of the object within its registry, starting from 0.
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }
}

impl<C> Clone for ContextHandle<C> {
    fn clone(&self) -> Self {
        Self {
            command_tx: self.command_tx.clone(),
            slot: self.slot,
            id: self.id,
        }
    }
}

impl<C> fmt::Debug for ContextHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

fn unavailable(id: usize) -> Box<dyn Any + Send> {
    Box::new(format!(
        "context {id} is unavailable: its registry was dropped or its factory panicked"
    ))
}
