/// Frame pacer: decides on each tick whether a compositor pass is worth running.
///
/// The fingerprint is any value that changes whenever the scene does; the
/// event loop passes the widget tree's generation.
#[derive(Debug, Clone)]
pub struct RenderThrottle {
    min_static_interval_ms: u64,
    last_render_ms: u64,
    last_fingerprint: u64,
    has_rendered: bool,
}

impl RenderThrottle {
    pub fn new(min_static_interval_ms: u64) -> Self {
        Self {
            min_static_interval_ms,
            last_render_ms: 0,
            last_fingerprint: 0,
            has_rendered: false,
        }
    }

    pub fn min_static_interval_ms(&self) -> u64 {
        self.min_static_interval_ms
    }

    /// Decide whether to render a new frame.
    ///
    /// - `force=true` (e.g. after a resize): always render.
    /// - Otherwise render immediately on fingerprint change, and at most once
    ///   per `min_static_interval_ms` while nothing changes.
    pub fn should_render(&mut self, now_ms: u64, fingerprint: u64, force: bool) -> bool {
        if !self.has_rendered || force || fingerprint != self.last_fingerprint {
            self.has_rendered = true;
            self.last_render_ms = now_ms;
            self.last_fingerprint = fingerprint;
            return true;
        }

        if now_ms.saturating_sub(self.last_render_ms) >= self.min_static_interval_ms {
            self.last_render_ms = now_ms;
            return true;
        }

        false
    }
}
