//! Priority-ordered in-process event manager.
//!
//! Events are created with a dispatch priority (lower fires first);
//! listeners bound to the same event run in bind order. Binding to an
//! event that was never registered creates it at the default priority, so
//! casual use needs no ceremony.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use tracing::debug;

use appspace_core::{
    application::{
        ApplicationError,
        ports::{EventBus, Listener},
    },
    error::AppspaceResult,
    prelude::{Label, Object},
};

const DEFAULT_PRIORITY: i32 = 1;

struct Event {
    priority: i32,
    listeners: Vec<Listener>,
}

/// Thread-safe event manager with per-event priorities.
#[derive(Clone, Default)]
pub struct SimpleEventBus {
    inner: Arc<RwLock<HashMap<Label, Event>>>,
}

impl SimpleEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of listeners bound to an event.
    pub fn listener_count(&self, label: &Label) -> usize {
        self.inner
            .read()
            .map(|events| events.get(label).map(|e| e.listeners.len()).unwrap_or(0))
            .unwrap_or(0)
    }

    /// Events in dispatch order (priority, then label).
    pub fn ordered_events(&self) -> Vec<Label> {
        let Ok(events) = self.inner.read() else {
            return Vec::new();
        };
        let mut labels: Vec<_> = events
            .iter()
            .map(|(label, event)| (event.priority, label.clone()))
            .collect();
        labels.sort();
        labels.into_iter().map(|(_, label)| label).collect()
    }
}

impl EventBus for SimpleEventBus {
    fn register(&self, label: &Label, priority: i32) -> AppspaceResult<()> {
        let mut events = self.inner.write().map_err(|_| ApplicationError::StoreLock)?;
        let event = events.entry(label.clone()).or_insert_with(|| Event {
            priority,
            listeners: Vec::new(),
        });
        event.priority = priority;
        debug!(%label, priority, "event registered");
        Ok(())
    }

    fn bind(&self, label: &Label, listener: Listener) -> AppspaceResult<()> {
        let mut events = self.inner.write().map_err(|_| ApplicationError::StoreLock)?;
        events
            .entry(label.clone())
            .or_insert_with(|| Event {
                priority: DEFAULT_PRIORITY,
                listeners: Vec::new(),
            })
            .listeners
            .push(listener);
        Ok(())
    }

    fn fire(&self, label: &Label, args: &[Object]) -> AppspaceResult<()> {
        // clone the listener list out so listeners can bind/fire re-entrantly
        let listeners = self.react(label)?;
        for listener in listeners {
            listener(args);
        }
        Ok(())
    }

    fn react(&self, label: &Label) -> AppspaceResult<Vec<Listener>> {
        let events = self.inner.read().map_err(|_| ApplicationError::StoreLock)?;
        Ok(events
            .get(label)
            .map(|event| event.listeners.clone())
            .unwrap_or_default())
    }

    fn burst(&self, label: &Label, batches: &[Vec<Object>]) -> AppspaceResult<()> {
        for batch in batches {
            self.fire(label, batch)?;
        }
        Ok(())
    }

    fn unbind(&self, label: &Label) -> AppspaceResult<()> {
        let mut events = self.inner.write().map_err(|_| ApplicationError::StoreLock)?;
        events.remove(label);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn label(s: &str) -> Label {
        Label::new(s).unwrap()
    }

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> Listener) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let make = {
            let seen = Arc::clone(&seen);
            move |tag: &str| {
                let seen = Arc::clone(&seen);
                let tag = tag.to_string();
                Arc::new(move |_args: &[Object]| {
                    seen.lock().unwrap().push(tag.clone());
                }) as Listener
            }
        };
        (seen, make)
    }

    #[test]
    fn listeners_fire_in_bind_order() {
        let bus = SimpleEventBus::new();
        let (seen, make) = recorder();

        bus.bind(&label("boot"), make("first")).unwrap();
        bus.bind(&label("boot"), make("second")).unwrap();
        bus.fire(&label("boot"), &[]).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn firing_an_unknown_event_is_a_no_op() {
        let bus = SimpleEventBus::new();
        bus.fire(&label("never-bound"), &[]).unwrap();
    }

    #[test]
    fn listeners_receive_the_arguments() {
        let bus = SimpleEventBus::new();
        let got = Arc::new(Mutex::new(None::<i64>));
        let sink = Arc::clone(&got);
        bus.bind(
            &label("tick"),
            Arc::new(move |args: &[Object]| {
                if let Some(n) = args.first().and_then(|a| a.clone().downcast::<i64>().ok()) {
                    *sink.lock().unwrap() = Some(*n);
                }
            }) as Listener,
        )
        .unwrap();

        bus.fire(&label("tick"), &[Arc::new(7_i64) as Object]).unwrap();
        assert_eq!(*got.lock().unwrap(), Some(7));
    }

    #[test]
    fn burst_runs_each_batch() {
        let bus = SimpleEventBus::new();
        let (seen, make) = recorder();
        bus.bind(&label("drain"), make("hit")).unwrap();

        bus.burst(
            &label("drain"),
            &[vec![], vec![], vec![]],
        )
        .unwrap();

        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn events_order_by_priority() {
        let bus = SimpleEventBus::new();
        bus.register(&label("late"), 10).unwrap();
        bus.register(&label("early"), 0).unwrap();
        bus.register(&label("middle"), 5).unwrap();

        assert_eq!(
            bus.ordered_events(),
            vec![label("early"), label("middle"), label("late")]
        );
    }

    #[test]
    fn unbind_drops_listeners() {
        let bus = SimpleEventBus::new();
        let (seen, make) = recorder();
        bus.bind(&label("gone"), make("hit")).unwrap();
        bus.unbind(&label("gone")).unwrap();
        bus.fire(&label("gone"), &[]).unwrap();

        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(bus.listener_count(&label("gone")), 0);
    }
}
