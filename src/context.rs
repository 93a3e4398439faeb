/// Knobs for a [`ContextStore`](crate::ContextStore).
#[derive(Debug, Clone)]
pub struct BufferOptions {
    /// After `clear`, re-read the slot (recreating it empty) and log its size.
    pub report_size_after_clear: bool,
}

impl Default for BufferOptions {
    fn default() -> Self {
        Self { report_size_after_clear: true }
    }
}

impl BufferOptions {
    pub fn quiet() -> Self {
        Self { report_size_after_clear: false }
    }
}
