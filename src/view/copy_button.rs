// src/view/copy_button.rs
// =============================================================================
// Copy-to-clipboard buttons.
//
// Clicking a button:
// 1. cancels that button's pending icon reset, if any
// 2. writes the button's content to the clipboard
// 3. on success shows the "copied" icon and schedules the reset
//
// Every button owns its own reset timer, so clicking one button never
// shortens or cancels another button's "copied" state.
//
// A failed clipboard write (e.g. no display server) only logs at debug
// level and leaves the icon as it was.
//
// CopyButton is a cheap handle (an Arc), so the same button can sit in a
// page's blocks and in the action list the renderer hands out.
// =============================================================================

use crate::view::icon::Icon;
use anyhow::{Context, Result};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::debug;

// Something text can be written to
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<()>;

    // Called once before the process exits
    fn finish(&self) {}
}

// The real system clipboard via arboard
//
// On X11 and Wayland the copied text is served by the process that owns the
// selection, so it disappears with the handle (or with the process). There
// every write goes to a holder thread that keeps serving the text until
// another program takes the clipboard over, and finish() waits for it.
// Elsewhere one handle is kept for the whole session.
pub struct SystemClipboard {
    hold: bool,
    handle: Mutex<Option<arboard::Clipboard>>,
    holder: Mutex<Option<JoinHandle<()>>>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self {
            hold: cfg!(target_os = "linux"),
            handle: Mutex::new(None),
            holder: Mutex::new(None),
        }
    }

    fn write_with_handle(&self, text: &str) -> Result<()> {
        let mut handle = lock(&self.handle);
        if handle.is_none() {
            *handle = Some(arboard::Clipboard::new().context("Failed to access clipboard")?);
        }
        let clipboard = handle.as_mut().context("Failed to access clipboard")?;
        clipboard
            .set_text(text)
            .context("Failed to set clipboard text")?;
        Ok(())
    }

    #[cfg(target_os = "linux")]
    fn write_and_hold(&self, text: &str) -> Result<()> {
        use arboard::SetExtLinux;
        use std::sync::mpsc;
        use std::thread;

        let text = text.to_string();
        let (ready_tx, ready_rx) = mpsc::channel();
        let holder = thread::spawn(move || {
            let mut clipboard = match arboard::Clipboard::new() {
                Ok(clipboard) => {
                    let _ = ready_tx.send(Ok(()));
                    clipboard
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };
            // Returns once another program owns the clipboard
            if let Err(e) = clipboard.set().wait().text(text) {
                debug!(error = %e, "clipboard hold ended");
            }
        });

        ready_rx
            .recv()
            .context("Clipboard thread exited")?
            .context("Failed to access clipboard")?;
        *lock(&self.holder) = Some(holder);
        Ok(())
    }

    #[cfg(not(target_os = "linux"))]
    fn write_and_hold(&self, text: &str) -> Result<()> {
        self.write_with_handle(text)
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        if self.hold {
            self.write_and_hold(text)
        } else {
            self.write_with_handle(text)
        }
    }

    fn finish(&self) {
        let Some(holder) = lock(&self.holder).take() else {
            return;
        };
        eprintln!("(keeping the copied text until something else is copied)");
        if holder.join().is_err() {
            debug!("clipboard thread panicked");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyState {
    Idle,
    Copied,
}

#[derive(Clone)]
pub struct CopyButton {
    inner: Arc<Inner>,
}

struct Inner {
    label: String,
    content: String,
    reset_after: Duration,
    state: Arc<Mutex<CopyState>>,
    timer: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

// A poisoned lock only means a reset task panicked; the state is still usable
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CopyButton {
    pub fn new(label: impl Into<String>, content: impl Into<String>, reset_after: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                label: label.into(),
                content: content.into(),
                reset_after,
                state: Arc::new(Mutex::new(CopyState::Idle)),
                timer: Mutex::new(None),
            }),
        }
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    pub fn content(&self) -> &str {
        &self.inner.content
    }

    pub fn state(&self) -> CopyState {
        *lock(&self.inner.state)
    }

    pub fn icon(&self) -> Icon {
        match self.state() {
            CopyState::Idle => Icon::Clipboard,
            CopyState::Copied => Icon::ClipboardCheck,
        }
    }

    // Must be called from inside a tokio runtime (the reset is a spawned task)
    pub fn click(&self, clipboard: &dyn Clipboard) {
        let mut timer = lock(&self.inner.timer);
        if let Some(pending) = timer.take() {
            pending.abort();
        }
        *lock(&self.inner.state) = CopyState::Idle;

        if let Err(e) = clipboard.write_text(&self.inner.content) {
            debug!(error = %e, label = %self.inner.label, "clipboard write failed");
            return;
        }

        *lock(&self.inner.state) = CopyState::Copied;

        let state = Arc::clone(&self.inner.state);
        let delay = self.inner.reset_after;
        *timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            *lock(&state) = CopyState::Idle;
        }));
    }
}

impl fmt::Debug for CopyButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyButton")
            .field("label", &self.inner.label)
            .field("state", &self.state())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Arc<Mutex<CopyState>>?
//    - The reset task runs on its own and needs to write the state later
//    - Arc lets the button and the task share one value
//    - Mutex makes sure only one of them touches it at a time
//
// 2. What does JoinHandle::abort() do?
//    - Cancels a spawned tokio task that hasn't finished yet
//    - A second click aborts the pending reset before scheduling a new one
//
// 3. What is `let ... else`?
//    - `let Some(x) = value else { return; };` binds x or leaves the function
//    - It keeps the happy path unindented
//
// 4. What is #[cfg(target_os = "linux")]?
//    - The item only exists when compiling for Linux
//    - arboard's SetExtLinux (the "wait until replaced" option) is Linux only
// -----------------------------------------------------------------------------
