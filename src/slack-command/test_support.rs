use std::sync::{Arc, Mutex};

use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// Records the level of every event emitted by this crate.
#[derive(Clone, Default)]
pub(crate) struct LevelRecorder(Arc<Mutex<Vec<Level>>>);

impl LevelRecorder {
    pub(crate) fn set_default(&self) -> DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    pub(crate) fn recorded(&self) -> Vec<Level> {
        self.0.lock().unwrap().clone()
    }

    pub(crate) fn all_debug_or_lower(&self) -> bool {
        self.recorded()
            .iter()
            .all(|level| *level == Level::DEBUG || *level == Level::TRACE)
    }
}

impl<S: Subscriber> Layer<S> for LevelRecorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target().starts_with("slack_command") {
            self.0.lock().unwrap().push(*event.metadata().level());
        }
    }
}
