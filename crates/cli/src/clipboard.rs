use gallery_core::clipboard::Clipboard;

/// System clipboard via `arboard`. A handle is opened per copy so the type stays `Send`.
///
/// On Linux the selection is served by the process that set it, so `set_text`
/// blocks until another program takes ownership of the clipboard.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    #[cfg(target_os = "linux")]
    fn set_text(&mut self, text: &str) -> anyhow::Result<()> {
        use arboard::SetExtLinux;

        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set().wait().text(text)?;
        Ok(())
    }

    #[cfg(not(target_os = "linux"))]
    fn set_text(&mut self, text: &str) -> anyhow::Result<()> {
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }
}
