//! Per-terminal profile watching.
//!
//! [`HostWatch`] is the plugin instance. It is built once when the host
//! loads the plugin, keeps one content-change subscription per live
//! terminal, and on every change notification re-reads the prompt and
//! switches the terminal's profile. The host unloads it with
//! [`HostWatch::detach`].

use std::collections::{HashMap, HashSet};
use std::ops::ControlFlow;

use host_watch_config::{HostWatchConfig, ReapplyPolicy};

use crate::host::{TargetHost, WatchTarget};
use crate::matcher::HostMatcher;

/// Last profile applied to one terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatcherState {
    last_profile: Option<String>,
}

impl MatcherState {
    pub fn last_profile(&self) -> Option<&str> {
        self.last_profile.as_deref()
    }

    fn record(&mut self, profile: &str) {
        if self.last_profile.as_deref() != Some(profile) {
            self.last_profile = Some(profile.to_string());
        }
    }
}

/// A registered terminal: its subscription handle and matching state.
struct Watch<S> {
    subscription: S,
    state: MatcherState,
}

/// Plugin instance watching every terminal of one host.
pub struct HostWatch<H: TargetHost> {
    matcher: HostMatcher,
    reapply: ReapplyPolicy,
    watches: HashMap<H::Id, Watch<H::Subscription>>,
}

impl<H: TargetHost> HostWatch<H> {
    /// Build from configuration and the host's profile names.
    pub fn new(config: &HostWatchConfig, profile_names: &[String]) -> Self {
        Self::with_matcher(HostMatcher::from_config(config, profile_names), config.reapply)
    }

    pub fn with_matcher(matcher: HostMatcher, reapply: ReapplyPolicy) -> Self {
        Self {
            matcher,
            reapply,
            watches: HashMap::new(),
        }
    }

    /// Build from configuration, reading profile names from `host`, and
    /// register every live terminal.
    pub fn attach(config: &HostWatchConfig, host: &mut H) -> Self {
        log::info!("loading host watch");
        let mut watch = Self::new(config, &host.profile_names());
        watch.update_watches(host);
        watch
    }

    pub fn matcher(&self) -> &HostMatcher {
        &self.matcher
    }

    pub fn reapply_policy(&self) -> ReapplyPolicy {
        self.reapply
    }

    pub fn is_registered(&self, id: H::Id) -> bool {
        self.watches.contains_key(&id)
    }

    pub fn registered_count(&self) -> usize {
        self.watches.len()
    }

    /// Last profile this watcher applied to `id`.
    pub fn last_profile(&self, id: H::Id) -> Option<&str> {
        self.watches.get(&id)?.state.last_profile()
    }

    /// Subscribe to every live terminal that is not yet registered and drop
    /// registrations of terminals that are gone. Returns how many terminals
    /// were newly registered.
    pub fn update_watches(&mut self, host: &mut H) -> usize {
        let live = host.target_ids();
        let live_set: HashSet<H::Id> = live.iter().copied().collect();

        let stale: Vec<H::Id> = self
            .watches
            .keys()
            .filter(|id| !live_set.contains(*id))
            .copied()
            .collect();
        for id in stale {
            if let Some(watch) = self.watches.remove(&id) {
                log::debug!("terminal {:?} closed, releasing its watch", id);
                host.unsubscribe(id, watch.subscription);
            }
        }

        let mut added = 0;
        for id in live {
            if self.watches.contains_key(&id) {
                continue;
            }
            match host.subscribe(id) {
                Ok(subscription) => {
                    log::debug!("watching terminal {:?}", id);
                    self.watches.insert(
                        id,
                        Watch {
                            subscription,
                            state: MatcherState::default(),
                        },
                    );
                    added += 1;
                }
                Err(e) => log::warn!("Failed to watch terminal {:?}: {}", id, e),
            }
        }
        added
    }

    /// Content-change handler for terminal `id`.
    ///
    /// Never fails and always asks to keep observing: a missing prompt or an
    /// unmatched host leaves the profile alone, and host errors are logged.
    pub fn on_contents_changed(&mut self, host: &mut H, id: H::Id) -> ControlFlow<()> {
        self.update_watches(host);

        let Some(target) = host.target_mut(id) else {
            log::trace!("terminal {:?} vanished before its check", id);
            return ControlFlow::Continue(());
        };
        let Some(detection) = self.matcher.detect(&*target) else {
            return ControlFlow::Continue(());
        };

        if self.reapply == ReapplyPolicy::OnChange {
            let last = match self.watches.get(&id).and_then(|w| w.state.last_profile()) {
                Some(profile) => Some(profile.to_string()),
                None => target.current_profile(),
            };
            if last.as_deref() == Some(detection.profile.as_str()) {
                log::trace!("profile '{}' already active on {:?}", detection.profile, id);
                return ControlFlow::Continue(());
            }
        }

        log::debug!(
            "switching to profile {}, because line '{}' matches pattern '{}'",
            detection.profile,
            detection.prompt_line,
            detection.prompt_pattern
        );
        match target.set_profile(&detection.profile) {
            Ok(()) => {
                if let Some(watch) = self.watches.get_mut(&id) {
                    watch.state.record(&detection.profile);
                }
            }
            Err(e) => log::warn!(
                "Failed to apply profile '{}' to terminal {:?}: {}",
                detection.profile,
                id,
                e
            ),
        }

        ControlFlow::Continue(())
    }

    /// Release every subscription. Call when the host unloads the plugin.
    pub fn detach(&mut self, host: &mut H) {
        log::info!("unloading host watch ({} terminals)", self.watches.len());
        for (id, watch) in self.watches.drain() {
            host.unsubscribe(id, watch.subscription);
        }
    }
}
