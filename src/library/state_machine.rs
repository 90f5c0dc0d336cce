use std::marker::PhantomData;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Elm-style runtime: a pure `transition`, a `render` of the whole state after
/// every step, and effects that run on worker threads and report back events.
///
/// `run` returns once `is_done` holds for the state, after the effects of that
/// final step have finished.
pub struct StateMachine<TState, TEvent, TEffect, T, R, E>
where
    T: Fn(TState, TEvent) -> (TState, Vec<TEffect>) + Send + Sync,
    R: Fn(&TState) + Send + Sync,
    E: Fn(TEffect, Sender<TEvent>) + Send + Sync,
{
    pub init: (TState, Vec<TEffect>),
    pub transition_fn: Arc<T>,
    pub render_fn: Arc<R>,
    pub run_effect_fn: Arc<E>,
    pub is_done_fn: fn(&TState) -> bool,
    event_sender: Sender<TEvent>,
    event_receiver: Receiver<TEvent>,
    _effect: PhantomData<TEffect>,
}

impl<TState, TEvent, TEffect, T, R, E> StateMachine<TState, TEvent, TEffect, T, R, E>
where
    TState: Send + 'static,
    TEvent: Send + 'static,
    TEffect: Send + 'static,
    T: Fn(TState, TEvent) -> (TState, Vec<TEffect>) + Send + Sync + 'static,
    R: Fn(&TState) + Send + Sync + 'static,
    E: Fn(TEffect, Sender<TEvent>) + Send + Sync + 'static,
{
    pub fn new(
        init: (TState, Vec<TEffect>),
        transition_fn: T,
        render_fn: R,
        run_effect_fn: E,
        is_done_fn: fn(&TState) -> bool,
    ) -> Self {
        let (event_sender, event_receiver) = channel();
        Self {
            init,
            transition_fn: Arc::new(transition_fn),
            render_fn: Arc::new(render_fn),
            run_effect_fn: Arc::new(run_effect_fn),
            is_done_fn,
            event_sender,
            event_receiver,
            _effect: PhantomData,
        }
    }

    /// Handle for feeding user events into the loop.
    pub fn sender(&self) -> Sender<TEvent> {
        self.event_sender.clone()
    }

    pub fn run(self) -> TState {
        let (mut state, effects) = self.init;
        (self.render_fn)(&state);
        spawn_effects(&self.run_effect_fn, &self.event_sender, effects);

        loop {
            let event = match self.event_receiver.recv() {
                Ok(event) => event,
                Err(_) => return state,
            };

            let (new_state, new_effects) = (self.transition_fn)(state, event);
            state = new_state;
            (self.render_fn)(&state);

            let handles = spawn_effects(&self.run_effect_fn, &self.event_sender, new_effects);

            if (self.is_done_fn)(&state) {
                for handle in handles {
                    let _ = handle.join();
                }
                return state;
            }
        }
    }
}

fn spawn_effects<TEvent, TEffect, E>(
    run_effect_fn: &Arc<E>,
    event_sender: &Sender<TEvent>,
    effects: Vec<TEffect>,
) -> Vec<JoinHandle<()>>
where
    TEvent: Send + 'static,
    TEffect: Send + 'static,
    E: Fn(TEffect, Sender<TEvent>) + Send + Sync + 'static,
{
    effects
        .into_iter()
        .map(|effect| {
            let effect_sender = event_sender.clone();
            let run_effect_fn = Arc::clone(run_effect_fn);
            std::thread::spawn(move || {
                run_effect_fn(effect, effect_sender);
            })
        })
        .collect()
}
