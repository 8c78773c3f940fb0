/// Turns changes of the app's refresh token into list reloads.
///
/// The token starts at 0, which means "no refresh yet". Any later change of
/// value requests exactly one reload, but only once the list has issued its
/// own first load.
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    last_seen: u64,
    mounted: bool,
}

impl RefreshCoordinator {
    pub fn mark_mounted(&mut self) {
        self.mounted = true;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Returns true when `token` asks for a reload.
    pub fn observe(&mut self, token: u64) -> bool {
        if token == self.last_seen {
            return false;
        }
        self.last_seen = token;
        if !self.mounted {
            tracing::debug!(token, "refresh before first load, skipping");
            return false;
        }
        true
    }
}
