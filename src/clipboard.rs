use anyhow::Context;

/// Destination for the "Copy time" action.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> anyhow::Result<()>;
}

/// System clipboard via `arboard`. The handle is kept open once created;
/// on X11 the contents disappear when it is dropped.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> anyhow::Result<()> {
        let cb = match self.inner.take() {
            Some(cb) => cb,
            None => arboard::Clipboard::new().context("clipboard unavailable")?,
        };
        self.inner
            .insert(cb)
            .set_text(text).context("can't set clipboard text")?;
        Ok(())
    }
}
