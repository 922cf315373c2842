use std::collections::HashMap;

use statig::blocking::{IntoStateMachineExt as _, StateMachine};

use super::{config::ScrollIntentConfig, hsm::SurfaceHsm, types::SurfaceId};

pub(crate) type SurfaceMachine = StateMachine<SurfaceHsm>;

/// Owns every surface machine, and through them every session and guard.
#[derive(Default)]
pub(crate) struct SessionStore {
    surfaces: HashMap<SurfaceId, SurfaceMachine>,
}

impl SessionStore {
    pub(crate) fn get_or_create(
        &mut self,
        surface: SurfaceId,
        config: &'static ScrollIntentConfig,
    ) -> &mut SurfaceMachine {
        self.surfaces
            .entry(surface)
            .or_insert_with(|| SurfaceHsm::new(surface, config).state_machine())
    }

    pub(crate) fn get(&self, surface: SurfaceId) -> Option<&SurfaceHsm> {
        self.surfaces.get(&surface).map(|machine| machine.inner())
    }

    /// Drops surfaces with no session and no live guard.
    pub(crate) fn prune(&mut self, now_ms: u64) -> usize {
        let before = self.surfaces.len();
        self.surfaces
            .retain(|_, machine| !machine.inner().is_dormant(now_ms));
        before - self.surfaces.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.surfaces.len()
    }
}
