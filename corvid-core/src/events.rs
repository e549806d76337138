use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use twilight_model::gateway::event::Event;

use crate::corvid::ThreadSafeCorvid;

/// The body of an event listener. A plain function value, not a virtual
/// method; listeners are registered and dispatched by name.
pub type EventRun = Arc<dyn Fn(ThreadSafeCorvid, Arc<Event>) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// An event listener declared as a value: a name and a run function.
#[derive(Clone)]
pub struct EventListener {
    pub name: String,
    pub run: EventRun,
}

impl EventListener {
    pub fn new(name: &str, run: EventRun) -> Self {
        Self {
            name: name.to_owned(),
            run,
        }
    }
}

impl fmt::Debug for EventListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListener").field("name", &self.name).finish()
    }
}

/// Wraps an async function into an [EventRun].
pub fn event_run<F, Fut>(f: F) -> EventRun
where
    F: Fn(ThreadSafeCorvid, Arc<Event>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move |corvid, event| Box::pin(f(corvid, event)))
}

/// Runs the listener registered under `name`, if any, with a gateway
/// event payload. An unregistered name is a no-op, not an error.
pub async fn dispatch_event(corvid: &ThreadSafeCorvid, name: &str, event: Arc<Event>) -> anyhow::Result<()> {
    let Some(listener) = corvid.find_event(name) else {
        return Ok(());
    };
    (listener.run)(corvid.clone(), event).await
}
