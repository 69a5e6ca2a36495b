use std::time::{Duration, Instant};

use intake_core::{update, AppState, AppViewModel, Msg, UploadConfig};
use intake_engine::PreviewRegistry;
use intake_logging::{intake_debug, intake_warn};

use super::effects::{EffectRunner, HostCallbacks};
use super::render;

const POLL_INTERVAL: Duration = Duration::from_millis(75);

/// One uploader component: core state, the effect runner and the host callbacks.
///
/// Dropping the host tears the component down, which revokes every preview it
/// still holds.
pub(crate) struct Host<C: HostCallbacks> {
    state: AppState,
    runner: EffectRunner,
    callbacks: C,
}

impl<C: HostCallbacks> Host<C> {
    pub fn new(config: UploadConfig, runner: EffectRunner, callbacks: C) -> Self {
        Self {
            state: AppState::new(config),
            runner,
            callbacks,
        }
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.runner.run(effects, &mut self.callbacks);

        if was_dirty {
            for line in render::render_view(&self.state.view(), self.runner.previews()) {
                intake_debug!("{}", line);
            }
        }
    }

    /// Pump engine events into the core until the current submission settles.
    /// Returns `false` if it is still in flight after `timeout`.
    pub fn wait_for_submission(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.state.is_in_flight() {
            let now = Instant::now();
            if now >= deadline {
                intake_warn!("Submission still in flight after {:?}", timeout);
                return false;
            }
            if let Some(msg) = self.runner.poll(POLL_INTERVAL.min(deadline - now)) {
                self.dispatch(msg);
            }
        }
        true
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn previews(&self) -> &PreviewRegistry {
        self.runner.previews()
    }

    pub fn callbacks(&self) -> &C {
        &self.callbacks
    }
}

impl<C: HostCallbacks> Drop for Host<C> {
    fn drop(&mut self) {
        self.dispatch(Msg::Teardown);
        let previews = self.runner.previews();
        intake_debug!(
            "Host closed: previews created={} revoked={} live={}",
            previews.created_count(),
            previews.revoked_count(),
            previews.live_count()
        );
    }
}
